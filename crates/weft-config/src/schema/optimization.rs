//! `performance` and `optimization.splitChunks` sections.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use super::Pattern;

/// Size-budget policy (`performance` section).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Performance {
    /// `false` disables budget checks, `"error"` fails the build on overrun
    pub hints: Hints,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_asset_size: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_entrypoint_size: Option<u64>,
}

impl Performance {
    pub fn unbounded() -> Self {
        Self {
            hints: Hints::Off,
            max_asset_size: None,
            max_entrypoint_size: None,
        }
    }

    pub fn bounded(max_asset_size: u64, max_entrypoint_size: u64) -> Self {
        Self {
            hints: Hints::Error,
            max_asset_size: Some(max_asset_size),
            max_entrypoint_size: Some(max_entrypoint_size),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hints {
    Off,
    Error,
}

impl Serialize for Hints {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Hints::Off => serializer.serialize_bool(false),
            Hints::Error => serializer.serialize_str("error"),
        }
    }
}

/// `optimization.splitChunks`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitChunks {
    pub cache_groups: BTreeMap<String, CacheGroupEntry>,
}

impl SplitChunks {
    /// Disable the bundler's built-in `default` and `defaultVendors` groups.
    pub fn without_heuristics() -> Self {
        let mut cache_groups = BTreeMap::new();
        cache_groups.insert("default".to_string(), CacheGroupEntry::Disabled);
        cache_groups.insert("defaultVendors".to_string(), CacheGroupEntry::Disabled);
        Self { cache_groups }
    }

    pub fn with_group(mut self, key: impl Into<String>, group: CacheGroup) -> Self {
        self.cache_groups
            .insert(key.into(), CacheGroupEntry::Group(group));
        self
    }
}

/// A cache group slot: either `false` (disabled) or a group definition.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheGroupEntry {
    Disabled,
    Group(CacheGroup),
}

impl Serialize for CacheGroupEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CacheGroupEntry::Disabled => serializer.serialize_bool(false),
            CacheGroupEntry::Group(group) => group.serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheGroup {
    pub name: String,
    pub test: Pattern,
    pub chunks: ChunkSelector,
    pub enforce: bool,
}

/// Restricts a cache group to the chunk of one named entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkSelector {
    pub entry: String,
}

impl ChunkSelector {
    pub fn entry(name: impl Into<String>) -> Self {
        Self { entry: name.into() }
    }
}
