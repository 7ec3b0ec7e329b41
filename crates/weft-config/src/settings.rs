//! Project settings shared by the options resolver and the fragment providers.
//!
//! Settings are read once per invocation from `weft.toml` at the project root.
//! The file uses nested profiles: values under `[default]` apply to every
//! mode, values under `[development]` or `[production]` apply to that mode only.
//!
//! ```toml
//! [default]
//! vendor_chunk = "vendor"
//!
//! [default.layout]
//! source_dir = "src"
//!
//! [production.budgets]
//! max_asset_size = 750000
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use figment::providers::{Format as _, Serialized, Toml};
use figment::{Figment, Profile};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;
use crate::merge::{MergeRules, MergeStrategy};
use crate::options::Mode;

/// Name of the settings file looked up at the project root.
pub const SETTINGS_FILE: &str = "weft.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSettings {
    #[serde(default)]
    pub layout: LayoutSettings,

    /// Entry name to source file, relative to the source root
    #[serde(default = "default_entries")]
    pub entries: BTreeMap<String, PathBuf>,

    /// HTML template, relative to the source root
    #[serde(default = "default_template")]
    pub template: PathBuf,

    /// Symbolic import prefix that maps to the source root
    #[serde(default = "default_alias", deserialize_with = "name_from_scalar")]
    pub alias: String,

    /// Name of the chunk holding all third-party code reachable from `main`
    #[serde(default = "default_vendor_chunk", deserialize_with = "name_from_scalar")]
    pub vendor_chunk: String,

    #[serde(default)]
    pub budgets: BudgetSettings,

    /// Environment constants file, relative to the source root
    #[serde(default = "default_environment_file")]
    pub environment_file: PathBuf,

    /// Packages that ship already-optimized code and must skip the downlevel pass
    #[serde(default = "default_optimized_libraries")]
    pub optimized_libraries: Vec<String>,

    /// Per-path merge strategy overrides, keyed by dotted path
    #[serde(default)]
    pub merge: BTreeMap<String, MergeStrategy>,
}

/// Where the project keeps its sources, caches and build output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSettings {
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    #[serde(default = "default_type_config")]
    pub type_config: PathBuf,

    #[serde(default = "default_dist_dir")]
    pub dist_dir: PathBuf,
}

/// Production size budgets in bytes. Development builds are never bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetSettings {
    #[serde(default = "default_max_asset_size")]
    pub max_asset_size: u64,

    #[serde(default = "default_max_entrypoint_size")]
    pub max_entrypoint_size: u64,
}

impl ProjectSettings {
    /// Figment with the built-in defaults and `weft.toml` from `root`, if present.
    ///
    /// The active profile follows the build mode. Callers may merge further
    /// providers (environment variables, CLI overrides) before extracting.
    pub fn figment(root: &Path, mode: Mode) -> Figment {
        Figment::from(Serialized::defaults(ProjectSettings::default()))
            .merge(Toml::file(root.join(SETTINGS_FILE)).nested())
            .select(Profile::new(mode.as_str()))
    }

    /// Load settings for `root` in the given mode.
    pub fn load(root: &Path, mode: Mode) -> Result<Self> {
        Self::from_figment(&Self::figment(root, mode))
    }

    pub fn from_figment(figment: &Figment) -> Result<Self> {
        let settings: ProjectSettings = figment.extract()?;
        tracing::debug!(profile = %figment.profile(), "loaded project settings");
        Ok(settings)
    }

    /// Merge rules derived from the `[merge]` table.
    pub fn merge_rules(&self) -> MergeRules {
        self.merge
            .iter()
            .fold(MergeRules::new(), |rules, (path, strategy)| {
                rules.with(path.clone(), *strategy)
            })
    }
}

/// Accept a bare number where a name is expected (`WEFT_VENDOR_CHUNK=2024`).
fn name_from_scalar<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Name {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Name::deserialize(deserializer)? {
        Name::Text(text) => text,
        Name::Number(number) => number.to_string(),
    })
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            layout: LayoutSettings::default(),
            entries: default_entries(),
            template: default_template(),
            alias: default_alias(),
            vendor_chunk: default_vendor_chunk(),
            budgets: BudgetSettings::default(),
            environment_file: default_environment_file(),
            optimized_libraries: default_optimized_libraries(),
            merge: BTreeMap::new(),
        }
    }
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            cache_dir: default_cache_dir(),
            type_config: default_type_config(),
            dist_dir: default_dist_dir(),
        }
    }
}

impl Default for BudgetSettings {
    fn default() -> Self {
        Self {
            max_asset_size: default_max_asset_size(),
            max_entrypoint_size: default_max_entrypoint_size(),
        }
    }
}

fn default_entries() -> BTreeMap<String, PathBuf> {
    BTreeMap::from([
        ("main".to_string(), PathBuf::from("main.ts")),
        ("polyfills".to_string(), PathBuf::from("polyfills.ts")),
    ])
}

fn default_template() -> PathBuf {
    PathBuf::from("index.html")
}

fn default_alias() -> String {
    "@app".to_string()
}

fn default_vendor_chunk() -> String {
    "vendor".to_string()
}

fn default_environment_file() -> PathBuf {
    PathBuf::from("environments/environment.ts")
}

fn default_optimized_libraries() -> Vec<String> {
    ["core-js", "tslib", "@babel/runtime", "web-animations-js", "zone.js"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("src")
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("node_modules/.cache")
}

fn default_type_config() -> PathBuf {
    PathBuf::from("tsconfig.app.json")
}

fn default_dist_dir() -> PathBuf {
    PathBuf::from("dist")
}

fn default_max_asset_size() -> u64 {
    1024 * 1024
}

fn default_max_entrypoint_size() -> u64 {
    2 * 1024 * 1024
}
