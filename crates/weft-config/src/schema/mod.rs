//! Typed pieces of the bundler configuration schema.
//!
//! Providers build these values and insert them into fragments. Field names
//! serialize to the bundler's own (camelCase) keys.

mod optimization;
mod terser;

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::{ConfigError, Result};

pub use optimization::{
    CacheGroup, CacheGroupEntry, ChunkSelector, Hints, Performance, SplitChunks,
};
pub use terser::{CompressOptions, TerserOptions, TerserPluginOptions};

/// Regular expression handed to the bundler as its source string.
///
/// Compiled with the `regex` crate on construction, so a pattern that reaches
/// the bundler is at least syntactically valid.
#[derive(Debug, Clone)]
pub struct Pattern(regex::Regex);

impl Pattern {
    pub fn new(source: impl AsRef<str>) -> Result<Self> {
        let source = source.as_ref();
        regex::Regex::new(source)
            .map(Self)
            .map_err(|e| ConfigError::InvalidPattern {
                pattern: source.to_string(),
                message: e.to_string(),
            })
    }

    /// Pattern matching any path segment that names one of `packages` under `node_modules`.
    ///
    /// Returns `None` for an empty package list.
    pub fn node_modules_any_of<S: AsRef<str>>(packages: &[S]) -> Result<Option<Self>> {
        if packages.is_empty() {
            return Ok(None);
        }
        let alternatives = packages
            .iter()
            .map(|p| regex::escape(p.as_ref()))
            .collect::<Vec<_>>()
            .join("|");
        Self::new(format!(r"[\\/]node_modules[\\/](?:{alternatives})[\\/]")).map(Some)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        self.0.is_match(haystack)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Pattern {}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Descriptor for a bundler plugin instance: constructor name plus options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginSpec {
    pub plugin: String,
    pub options: Value,
}

impl PluginSpec {
    pub fn new(plugin: impl Into<String>, options: impl Serialize) -> Result<Self> {
        let plugin = plugin.into();
        let options = serde_json::to_value(options).map_err(|e| ConfigError::InvalidFragment {
            key: format!("plugins[{plugin}]"),
            message: e.to_string(),
        })?;
        Ok(Self { plugin, options })
    }
}

/// One entry of `module.rules`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test: Option<Pattern>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Pattern>,

    /// Single loader shorthand
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loader: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub r#use: Vec<LoaderSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parser: Option<Value>,
}

/// A loader reference inside a rule's `use` list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoaderSpec {
    pub loader: String,

    #[serde(skip_serializing_if = "Value::is_null")]
    pub options: Value,
}

/// `module` section holding the rule list.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ModuleOptions {
    pub rules: Vec<ModuleRule>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveOptions {
    pub extensions: Vec<String>,
    pub main_fields: Vec<String>,
    pub alias: BTreeMap<String, PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputOptions {
    pub path: PathBuf,
    pub filename: String,
    pub chunk_filename: String,
    pub public_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pattern_rejects_invalid_regex() {
        let err = Pattern::new("(unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
    }

    #[test]
    fn node_modules_pattern_escapes_package_names() {
        let pattern = Pattern::node_modules_any_of(&["zone.js", "@babel/runtime"])
            .unwrap()
            .unwrap();
        assert!(pattern.is_match("/app/node_modules/zone.js/fesm2015/zone.js"));
        assert!(pattern.is_match(r"C:\app\node_modules\@babel/runtime\helpers.js"));
        assert!(!pattern.is_match("/app/node_modules/zoneXjs/index.js"));
        assert!(!pattern.is_match("/app/src/zone.js/index.js"));
    }

    #[test]
    fn empty_package_list_has_no_pattern() {
        let none: &[&str] = &[];
        assert_eq!(Pattern::node_modules_any_of(none).unwrap(), None);
    }

    #[test]
    fn pattern_round_trips_its_source() {
        let pattern = Pattern::new(r"\.m?js$").unwrap();
        assert_eq!(pattern.as_str(), r"\.m?js$");
        assert_eq!(pattern, Pattern::new(r"\.m?js$").unwrap());
        assert_eq!(serde_json::to_value(&pattern).unwrap(), json!(r"\.m?js$"));
        assert!(pattern.is_match("/app/main.mjs"));
        assert!(!pattern.is_match("/app/main.ts"));
    }

    #[test]
    fn rule_serializes_only_present_fields() {
        let rule = ModuleRule {
            test: Some(Pattern::new(r"\.ts$").unwrap()),
            loader: Some("ts-loader".to_string()),
            ..ModuleRule::default()
        };
        assert_eq!(
            serde_json::to_value(rule).unwrap(),
            json!({ "test": r"\.ts$", "loader": "ts-loader" })
        );
    }

    #[test]
    fn loader_options_are_omitted_when_null() {
        let spec = LoaderSpec {
            loader: "raw-loader".to_string(),
            options: Value::Null,
        };
        assert_eq!(
            serde_json::to_value(spec).unwrap(),
            json!({ "loader": "raw-loader" })
        );
    }
}
