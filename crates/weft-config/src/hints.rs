//! Global-constant substitution hints for the minifier.
//!
//! The framework's compiler-support library publishes a map of global
//! constants (`ngDevMode` and friends) that the minifier replaces with
//! literals so development-only branches become dead code. Obtaining that map
//! is asynchronous, so it sits behind [`GlobalDefsLookup`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// A literal the minifier can substitute for a global identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Null,
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_string())
    }
}

pub type GlobalDefs = BTreeMap<String, Literal>;

#[async_trait]
pub trait GlobalDefsLookup: Send + Sync {
    async fn lookup(&self) -> Result<GlobalDefs>;
}

/// The framework compiler's ahead-of-time definitions.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompilerGlobalDefs;

impl CompilerGlobalDefs {
    pub fn defs() -> GlobalDefs {
        BTreeMap::from([
            ("ngDevMode".to_string(), Literal::Bool(false)),
            ("ngI18nClosureMode".to_string(), Literal::Bool(false)),
            ("ngJitMode".to_string(), Literal::Bool(false)),
        ])
    }
}

#[async_trait]
impl GlobalDefsLookup for CompilerGlobalDefs {
    async fn lookup(&self) -> Result<GlobalDefs> {
        Ok(Self::defs())
    }
}

/// Definitions read from a JSON object on disk.
#[derive(Debug, Clone)]
pub struct JsonGlobalDefs {
    path: PathBuf,
}

impl JsonGlobalDefs {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl GlobalDefsLookup for JsonGlobalDefs {
    async fn lookup(&self) -> Result<GlobalDefs> {
        tracing::debug!(path = %self.path.display(), "reading global definitions");

        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            ConfigError::GlobalDefsUnavailable(format!("{}: {e}", self.path.display()))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            ConfigError::GlobalDefsUnavailable(format!(
                "{} is not an object of literals: {e}",
                self.path.display()
            ))
        })
    }
}

/// Fixed definitions, mostly useful to pin the lookup in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticGlobalDefs(pub GlobalDefs);

#[async_trait]
impl GlobalDefsLookup for StaticGlobalDefs {
    async fn lookup(&self) -> Result<GlobalDefs> {
        Ok(self.0.clone())
    }
}
