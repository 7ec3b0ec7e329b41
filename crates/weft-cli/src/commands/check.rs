//! Check command implementation.
//!
//! Composes the configuration without writing it, then validates the result
//! against the project on disk.

use weft_config::{ConfigValidator, Environment, FsValidator, Mode};

use crate::cli::{CheckArgs, ComposeArgs};
use crate::commands::compose::compose_project;
use crate::error::Result;

/// Execute the check command.
///
/// # Validation Steps
///
/// 1. Resolve the project and compose the configuration for `--mode`
/// 2. Check the composed shape (entries, output path, patterns)
/// 3. Check every entry file and the HTML template exist
///
/// # Errors
///
/// Returns the first composition or validation failure.
pub async fn execute(args: CheckArgs) -> Result<()> {
    let compose_args = ComposeArgs {
        project: args.project,
        output: None,
        compact: false,
    };
    let config = compose_project(&compose_args).await?;

    FsValidator.validate(&config)?;

    let entries = config
        .get("entry")
        .and_then(|e| e.as_object())
        .map_or(0, |e| e.len());
    tracing::info!(
        mode = %Mode::from(Environment::from(compose_args.project.mode)),
        entries,
        "configuration is valid"
    );

    Ok(())
}
