//! Error handling for the weft CLI.
//!
//! Library failures arrive as [`weft_config::ConfigError`]; everything the
//! CLI adds on top (writing output) lives in [`CliError`].
//! `main` converts the final error into a miette report.

use std::path::PathBuf;

use miette::Report;
use thiserror::Error;
use weft_config::ConfigError;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Option resolution, composition or validation failed
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Could not write the composed configuration
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Config(e) => config_error_to_miette(e),
        other => miette::miette!("{}", other),
    }
}

fn config_error_to_miette(err: ConfigError) -> Report {
    match err {
        ConfigError::ProjectRootNotFound { start, marker } => miette::miette!(
            help = "Run weft inside a project, or pass --root <DIR> pointing at one",
            "No {} found in {} or any parent directory",
            marker,
            start.display()
        ),
        ConfigError::ProviderFailed { provider, source } => {
            let hint = hint_for(source.root_cause());
            match hint {
                Some(hint) => miette::miette!(
                    help = hint,
                    "Fragment provider '{}' failed: {}",
                    provider,
                    source
                ),
                None => miette::miette!("Fragment provider '{}' failed: {}", provider, source),
            }
        }
        ConfigError::SchemaValidation {
            message,
            hint: Some(hint),
        } => miette::miette!(help = hint, "Schema validation failed: {}", message),
        other => miette::miette!("{}", other),
    }
}

fn hint_for(err: &ConfigError) -> Option<String> {
    match err {
        ConfigError::TypeConfigNotFound(_) => {
            Some("Create the type-check config or set layout.type_config in weft.toml".to_string())
        }
        ConfigError::GlobalDefsUnavailable(_) => {
            Some("Check the --global-defs file; it must hold a JSON object of literals".to_string())
        }
        _ => None,
    }
}
