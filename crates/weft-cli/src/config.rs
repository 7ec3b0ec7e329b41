//! Project settings and build options for a CLI invocation.
//!
//! Priority: environment variables > `weft.toml` profile > defaults.
//! Environment variables use the `WEFT_` prefix with `__` separating nested
//! keys, e.g. `WEFT_LAYOUT__DIST_DIR=build` or `WEFT_VENDOR_CHUNK=libs`.
//!
//! figment parses values, so `WEFT_VENDOR_CHUNK=2024` arrives as a number.
//! Name settings (`alias`, `vendor_chunk`) accept that; path settings need
//! the value quoted: `WEFT_LAYOUT__DIST_DIR='"2024"'`.

use std::path::Path;

use figment::providers::Env;
use figment::Figment;
use weft_config::{Environment, Options, OptionsResolver, ProjectSettings};

use crate::cli::ProjectArgs;
use crate::error::Result;

pub const ENV_PREFIX: &str = "WEFT_";

/// Settings and options resolved for one command.
#[derive(Debug, Clone)]
pub struct Project {
    pub settings: ProjectSettings,
    pub options: Options,
}

impl Project {
    /// Locate the project root from `args.root`, load its settings and derive options.
    pub fn load(args: &ProjectArgs) -> Result<Self> {
        let env = Environment::from(args.mode);
        let root = OptionsResolver::default().locate_root(&args.root)?;
        let settings = load_settings(&root, env)?;

        // Layout may be overridden by settings, so resolve with the loaded one.
        let options = OptionsResolver::new(settings.layout.clone()).resolve(&root, env)?;

        tracing::debug!(
            root = %options.root.display(),
            mode = %options.mode(),
            entries = settings.entries.len(),
            "loaded project"
        );

        Ok(Self { settings, options })
    }
}

/// Figment for a project root, with environment overrides layered on top.
pub fn settings_figment(root: &Path, env: Environment) -> Figment {
    ProjectSettings::figment(root, env.mode()).merge(Env::prefixed(ENV_PREFIX).split("__").global())
}

pub fn load_settings(root: &Path, env: Environment) -> Result<ProjectSettings> {
    Ok(ProjectSettings::from_figment(&settings_figment(root, env))?)
}
