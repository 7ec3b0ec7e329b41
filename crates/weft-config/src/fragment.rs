//! Configuration fragments and the providers that produce them.

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConfigError, Result};
use crate::merge::{merge_maps, MergeRules};
use crate::options::Options;

/// A partial bundler configuration. Absent keys mean "no opinion".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fragment(Map<String, Value>);

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to the serialized form of `value`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Serialize) -> Result<&mut Self> {
        let key = key.into();
        let value = serde_json::to_value(value).map_err(|e| ConfigError::InvalidFragment {
            key: key.clone(),
            message: e.to_string(),
        })?;
        self.0.insert(key, value);
        Ok(self)
    }

    /// Builder form of [`Fragment::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Serialize) -> Result<Self> {
        self.set(key, value)?;
        Ok(self)
    }

    /// Build a fragment from a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ConfigError::InvalidFragment {
                key: "<root>".to_string(),
                message: format!("expected an object, found {}", kind_of(&other)),
            }),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

/// The single configuration produced by merging every fragment.
///
/// There is no mutating API: a composed configuration is handed to the bundler as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ComposedConfig(Map<String, Value>);

impl ComposedConfig {
    /// Merge fragments left to right.
    pub fn from_fragments(fragments: impl IntoIterator<Item = Fragment>, rules: &MergeRules) -> Self {
        let mut merged = Map::new();
        for fragment in fragments {
            merge_maps(&mut merged, fragment.into_map(), rules);
        }
        Self(merged)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Look up a nested value by JSON pointer (`/optimization/splitChunks`).
    ///
    /// Follows `serde_json::Value::pointer`: anything not starting with `/` is `None`.
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        let rest = pointer.strip_prefix('/')?;
        let (head, tail) = match rest.split_once('/') {
            Some((head, tail)) => (head, Some(tail)),
            None => (rest, None),
        };
        let value = self.0.get(&head.replace("~1", "/").replace("~0", "~"))?;
        match tail {
            Some(tail) => value.pointer(&format!("/{tail}")),
            None => Some(value),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.0)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.0)?)
    }
}

/// A unit that contributes one fragment to the composed configuration.
///
/// Providers must be independent of each other: the composer runs them
/// concurrently and only their merge order is fixed.
#[async_trait]
pub trait FragmentProvider: Send + Sync {
    /// Human-readable name (used in logs and error attribution).
    fn name(&self) -> &str;

    /// Produce this provider's fragment for the given options.
    async fn provide(&self, options: &Options) -> Result<Fragment>;
}

type ProvideFn = dyn Fn(&Options) -> Result<Fragment> + Send + Sync;

/// Adapter turning a synchronous closure into a [`FragmentProvider`].
///
/// ```
/// use weft_config::{provider_fn, Fragment};
///
/// let provider = provider_fn("mode", |options| {
///     Fragment::new().with("mode", options.mode().as_str())
/// });
/// ```
pub struct FnProvider {
    name: String,
    func: Box<ProvideFn>,
}

pub fn provider_fn<F>(name: impl Into<String>, func: F) -> FnProvider
where
    F: Fn(&Options) -> Result<Fragment> + Send + Sync + 'static,
{
    FnProvider {
        name: name.into(),
        func: Box::new(func),
    }
}

#[async_trait]
impl FragmentProvider for FnProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn provide(&self, options: &Options) -> Result<Fragment> {
        (self.func)(options)
    }
}

/// Boxed future returned by asynchronous closure providers.
pub type FragmentFuture<'a> = Pin<Box<dyn Future<Output = Result<Fragment>> + Send + 'a>>;

type ProvideAsyncFn = dyn for<'a> Fn(&'a Options) -> FragmentFuture<'a> + Send + Sync;

/// Adapter turning an asynchronous closure into a [`FragmentProvider`].
pub struct AsyncFnProvider {
    name: String,
    func: Box<ProvideAsyncFn>,
}

pub fn provider_async_fn<F>(name: impl Into<String>, func: F) -> AsyncFnProvider
where
    F: for<'a> Fn(&'a Options) -> FragmentFuture<'a> + Send + Sync + 'static,
{
    AsyncFnProvider {
        name: name.into(),
        func: Box::new(func),
    }
}

#[async_trait]
impl FragmentProvider for AsyncFnProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn provide(&self, options: &Options) -> Result<Fragment> {
        (self.func)(options).await
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
