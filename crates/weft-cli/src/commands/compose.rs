//! Compose command implementation.

use std::path::Path;

use weft_config::{compose, ComposedConfig};

use crate::cli::ComposeArgs;
use crate::commands::global_defs_lookup;
use crate::config::Project;
use crate::error::{CliError, Result};

/// Execute the compose command.
///
/// Writes the composed configuration to `--output`, or stdout when absent.
///
/// # Errors
///
/// Returns errors when the project cannot be resolved, any provider fails,
/// or the output cannot be written.
pub async fn execute(args: ComposeArgs) -> Result<()> {
    let config = compose_project(&args).await?;
    let rendered = if args.compact {
        config.to_json()
    } else {
        config.to_json_pretty()
    }?;

    match &args.output {
        Some(path) => write_output(path, &rendered).await?,
        None => println!("{rendered}"),
    }

    Ok(())
}

pub(crate) async fn compose_project(args: &ComposeArgs) -> Result<ComposedConfig> {
    let project = Project::load(&args.project)?;
    let lookup = global_defs_lookup(args.project.global_defs.as_deref());

    tracing::info!(mode = %project.options.mode(), "composing configuration");
    Ok(compose(&project.options, &project.settings, lookup).await?)
}

async fn write_output(path: &Path, rendered: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| CliError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    tokio::fs::write(path, format!("{rendered}\n"))
        .await
        .map_err(|source| CliError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::info!(path = %path.display(), "wrote configuration");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn write_output_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out/nested/webpack.json");

        write_output(&path, "{}").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}\n");
    }
}
