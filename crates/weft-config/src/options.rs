//! Resolution of the per-invocation [`Options`] record.
//!
//! Every fragment provider reads paths and the environment flag from
//! `Options` only. The record is built once by [`OptionsResolver`] and then
//! shared by immutable reference.

use std::path::{Path, PathBuf};

use path_clean::PathClean;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::settings::LayoutSettings;

/// File whose presence marks the project root.
pub const DEFAULT_ROOT_MARKER: &str = "package.json";

/// Environment signal supplied by the invoking build driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Environment {
    #[serde(default)]
    pub production: bool,
}

impl Environment {
    pub fn development() -> Self {
        Self { production: false }
    }

    pub fn production() -> Self {
        Self { production: true }
    }

    pub fn mode(&self) -> Mode {
        Mode::from_production(self.production)
    }
}

/// Build mode as understood by the bundler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Development,
    Production,
}

impl Mode {
    pub fn from_production(production: bool) -> Self {
        if production {
            Mode::Production
        } else {
            Mode::Development
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Development => "development",
            Mode::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Mode::Production)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Environment> for Mode {
    fn from(env: Environment) -> Self {
        env.mode()
    }
}

/// Immutable inputs shared by all fragment providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Options {
    /// Project root (directory containing the root marker)
    pub root: PathBuf,
    pub source_root: PathBuf,
    pub cache_root: PathBuf,
    pub type_config_path: PathBuf,
    pub dist_root: PathBuf,
    pub production: bool,
}

impl Options {
    /// Build options from an already-located project root.
    ///
    /// No filesystem access happens here; a relative `root` is kept relative
    /// only if the caller passes one, so resolvers should pass absolute roots.
    pub fn from_root(root: impl AsRef<Path>, layout: &LayoutSettings, production: bool) -> Self {
        let root = root.as_ref().clean();
        Self {
            source_root: root.join(&layout.source_dir).clean(),
            cache_root: root.join(&layout.cache_dir).clean(),
            type_config_path: root.join(&layout.type_config).clean(),
            dist_root: root.join(&layout.dist_dir).clean(),
            root,
            production,
        }
    }

    pub fn mode(&self) -> Mode {
        Mode::from_production(self.production)
    }

    /// Resolve a path relative to the source root.
    pub fn source_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.source_root.join(relative).clean()
    }
}

/// Derives [`Options`] from a base directory and an environment signal.
#[derive(Debug, Clone)]
pub struct OptionsResolver {
    layout: LayoutSettings,
    marker: String,
}

impl OptionsResolver {
    pub fn new(layout: LayoutSettings) -> Self {
        Self {
            layout,
            marker: DEFAULT_ROOT_MARKER.to_string(),
        }
    }

    /// Use a different root marker file.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Find the nearest ancestor of `base_dir` (inclusive) containing the root marker.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ProjectRootNotFound` when no ancestor has the marker.
    pub fn locate_root(&self, base_dir: &Path) -> Result<PathBuf> {
        let start = absolute(base_dir)?;

        start
            .ancestors()
            .find(|dir| dir.join(&self.marker).is_file())
            .map(Path::to_path_buf)
            .ok_or_else(|| ConfigError::ProjectRootNotFound {
                start: start.clone(),
                marker: self.marker.clone(),
            })
    }

    /// Locate the project root and build the options record.
    pub fn resolve(&self, base_dir: &Path, env: Environment) -> Result<Options> {
        let root = self.locate_root(base_dir)?;
        let options = Options::from_root(&root, &self.layout, env.production);
        tracing::debug!(
            root = %options.root.display(),
            mode = %options.mode(),
            "resolved build options"
        );
        Ok(options)
    }
}

impl Default for OptionsResolver {
    fn default() -> Self {
        Self::new(LayoutSettings::default())
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.clean())
    } else {
        Ok(std::env::current_dir()?.join(path).clean())
    }
}
