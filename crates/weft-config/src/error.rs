//! Error types for option resolution, fragment composition and validation.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Startup preconditions
    #[error("project root not found: no {marker} in {} or any parent directory", .start.display())]
    ProjectRootNotFound { start: PathBuf, marker: String },

    #[error("type-check configuration not found: {}", .0.display())]
    TypeConfigNotFound(PathBuf),

    // Composition errors
    #[error("fragment provider '{provider}' failed: {source}")]
    ProviderFailed {
        provider: String,
        #[source]
        source: Box<ConfigError>,
    },

    #[error("global definitions lookup failed: {0}")]
    GlobalDefsUnavailable(String),

    #[error("invalid fragment value for '{key}': {message}")]
    InvalidFragment { key: String, message: String },

    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    // Settings loading
    #[error("invalid project settings: {0}")]
    Settings(#[from] Box<figment::Error>),

    // Composed configuration validation
    #[error("schema validation failed: {message}")]
    SchemaValidation {
        message: String,
        hint: Option<String>,
    },

    #[error("entry file not found: {}", .0.display())]
    EntryNotFound(PathBuf),

    #[error("HTML template not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Attribute a failure to the provider that produced it.
    pub fn provider(name: impl Into<String>, source: ConfigError) -> Self {
        ConfigError::ProviderFailed {
            provider: name.into(),
            source: Box::new(source),
        }
    }

    /// The innermost error, skipping provider attribution.
    pub fn root_cause(&self) -> &ConfigError {
        match self {
            ConfigError::ProviderFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Settings(Box::new(err))
    }
}
