//! Pluggable validation of composed configurations
//!
//! Separates schema checks (pure, usable on any composed value) from
//! filesystem checks (entry files and template must exist).

use std::path::PathBuf;

use serde_json::Value;

use crate::error::{ConfigError, Result};
use crate::fragment::ComposedConfig;
use crate::providers::HTML_PLUGIN;
use crate::schema::Pattern;

/// Trait for pluggable config validation strategies
pub trait ConfigValidator {
    fn validate(&self, config: &ComposedConfig) -> Result<()>;
}

/// Schema-only validation (no filesystem checks)
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use weft_config::{ComposedConfig, ConfigValidator, Fragment, MergeRules, SchemaValidator};
///
/// let fragment = Fragment::from_value(json!({
///     "entry": { "main": "/app/src/main.ts" },
///     "output": { "path": "/app/dist" }
/// }))
/// .unwrap();
/// let config = ComposedConfig::from_fragments([fragment], &MergeRules::default());
///
/// SchemaValidator.validate(&config).unwrap();
/// ```
pub struct SchemaValidator;

impl ConfigValidator for SchemaValidator {
    fn validate(&self, config: &ComposedConfig) -> Result<()> {
        match config.get("entry") {
            Some(Value::Object(entries)) if !entries.is_empty() => {}
            _ => {
                return Err(schema_error(
                    "no entries specified",
                    "Declare at least one entry point under 'entries'",
                ));
            }
        }

        if !config
            .pointer("/output/path")
            .is_some_and(|path| path.as_str().is_some_and(|p| !p.is_empty()))
        {
            return Err(schema_error(
                "output.path is missing",
                "Check the dist_dir layout setting",
            ));
        }

        if let Some(rules) = config.pointer("/module/rules") {
            let rules = rules.as_array().ok_or_else(|| {
                schema_error("module.rules must be an array", "Fix the merge rules for module.rules")
            })?;
            for rule in rules {
                for key in ["test", "exclude"] {
                    if let Some(Value::String(source)) = rule.get(key) {
                        Pattern::new(source.as_str())?;
                    }
                }
            }
        }

        if let Some(Value::Object(groups)) = config.pointer("/optimization/splitChunks/cacheGroups") {
            for (key, group) in groups {
                if let Some(name) = group.get("name") {
                    if name.as_str().is_none_or(|n| n.trim().is_empty()) {
                        return Err(schema_error(
                            &format!("cache group '{key}' has an empty name"),
                            "Set vendor_chunk to a non-empty chunk name",
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}

/// Filesystem validator (for CLI use)
///
/// Runs schema validation, then checks that entry files and the HTML
/// template exist on disk.
pub struct FsValidator;

impl ConfigValidator for FsValidator {
    fn validate(&self, config: &ComposedConfig) -> Result<()> {
        SchemaValidator.validate(config)?;

        if let Some(Value::Object(entries)) = config.get("entry") {
            for path in entries.values().filter_map(Value::as_str) {
                let path = PathBuf::from(path);
                if !path.is_file() {
                    return Err(ConfigError::EntryNotFound(path));
                }
            }
        }

        for template in html_templates(config) {
            if !template.is_file() {
                return Err(ConfigError::TemplateNotFound(template));
            }
        }

        Ok(())
    }
}

fn html_templates(config: &ComposedConfig) -> Vec<PathBuf> {
    let Some(Value::Array(plugins)) = config.get("plugins") else {
        return Vec::new();
    };

    plugins
        .iter()
        .filter(|plugin| plugin.get("plugin").and_then(Value::as_str) == Some(HTML_PLUGIN))
        .filter_map(|plugin| plugin.pointer("/options/template").and_then(Value::as_str))
        .map(PathBuf::from)
        .collect()
}

fn schema_error(message: &str, hint: &str) -> ConfigError {
    ConfigError::SchemaValidation {
        message: message.to_string(),
        hint: Some(hint.to_string()),
    }
}

/// Convenience function for schema-only validation
pub fn validate_schema(config: &ComposedConfig) -> Result<()> {
    SchemaValidator.validate(config)
}

/// Convenience function for filesystem validation
pub fn validate_fs(config: &ComposedConfig) -> Result<()> {
    FsValidator.validate(config)
}
