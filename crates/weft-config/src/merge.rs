//! Structural merge of configuration values.
//!
//! Rules applied when a later value meets an earlier one at the same path:
//! - object + object: merged key by key, recursively
//! - array + array: later elements appended after earlier ones
//! - anything else: the later value replaces the earlier one
//!
//! [`MergeRules`] can override the behaviour for specific dotted paths. The
//! default rules are empty, which keeps merging associative: merging
//! `(a, b)` then `c` gives the same result as merging `a` with `(b, c)`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// How two values meeting at one path are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    /// Objects merge structurally, arrays append, scalars are replaced
    #[default]
    Merge,
    /// The later value replaces the earlier one wholesale
    Replace,
    /// Like `Merge`, but later array elements go before earlier ones
    Prepend,
}

/// Per-path strategy overrides, keyed by dotted path (`optimization.minimizer`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeRules {
    overrides: BTreeMap<String, MergeStrategy>,
}

impl MergeRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: impl Into<String>, strategy: MergeStrategy) -> Self {
        self.overrides.insert(path.into(), strategy);
        self
    }

    pub fn strategy_for(&self, path: &str) -> MergeStrategy {
        self.overrides.get(path).copied().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

/// Merge `update` into `target` using the default rules.
pub fn merge_values(target: &mut Value, update: Value) {
    merge_at(target, update, &MergeRules::default(), "");
}

/// Merge `update` into `target`, honouring per-path overrides.
pub fn merge_values_with(target: &mut Value, update: Value, rules: &MergeRules) {
    merge_at(target, update, rules, "");
}

/// Merge two JSON objects key by key.
pub fn merge_maps(target: &mut Map<String, Value>, update: Map<String, Value>, rules: &MergeRules) {
    merge_map_at(target, update, rules, "");
}

fn merge_map_at(
    target: &mut Map<String, Value>,
    update: Map<String, Value>,
    rules: &MergeRules,
    prefix: &str,
) {
    for (key, value) in update {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        match target.get_mut(&key) {
            Some(existing) => merge_at(existing, value, rules, &path),
            None => {
                target.insert(key, value);
            }
        }
    }
}

fn merge_at(target: &mut Value, update: Value, rules: &MergeRules, path: &str) {
    let strategy = rules.strategy_for(path);
    if strategy == MergeStrategy::Replace {
        *target = update;
        return;
    }

    match (target, update) {
        (Value::Object(target_map), Value::Object(update_map)) => {
            merge_map_at(target_map, update_map, rules, path);
        }
        (Value::Array(target_items), Value::Array(mut update_items)) => {
            if strategy == MergeStrategy::Prepend {
                update_items.append(target_items);
                *target_items = update_items;
            } else {
                target_items.extend(update_items);
            }
        }
        (target_slot, update) => {
            *target_slot = update;
        }
    }
}
