//! Framework ahead-of-time compiler integration.
//!
//! Contributes three module rules, in this order:
//! 1. the framework runtime package is parsed with the stricter `System` module protocol
//! 2. template-bearing sources go through the AOT compiler loader
//! 3. emitted scripts go through the downlevel loader, except packages that
//!    ship already-optimized code and break when processed twice
//!
//! and the compiler plugin itself.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{ConfigError, Result};
use crate::fragment::{Fragment, FragmentProvider};
use crate::options::Options;
use crate::providers::minify::ECMA_TARGET;
use crate::schema::{LoaderSpec, ModuleOptions, ModuleRule, Pattern, PluginSpec};
use crate::settings::ProjectSettings;

pub const COMPILER_PLUGIN: &str = "AngularWebpackPlugin";
pub const COMPILER_LOADER: &str = "@ngtools/webpack";
pub const DOWNLEVEL_LOADER: &str = "babel-loader";

const FRAMEWORK_RUNTIME: &str = r"[/\\]@angular[/\\]core[/\\].+\.m?js$";
const COMPILED_SOURCES: &str = r"(?:\.ngfactory\.js|\.ngstyle\.js|\.tsx?)$";
const SCRIPTS: &str = r"\.m?js$";

#[derive(Debug, Clone)]
pub struct FrameworkProvider {
    environment_file: PathBuf,
    optimized_libraries: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CompilerPluginOptions {
    tsconfig: PathBuf,
    jit_mode: bool,
    direct_template_loading: bool,
    emit_ng_module_scope: bool,
    file_replacements: BTreeMap<PathBuf, PathBuf>,
}

impl FrameworkProvider {
    pub fn new(environment_file: impl Into<PathBuf>, optimized_libraries: Vec<String>) -> Self {
        Self {
            environment_file: environment_file.into(),
            optimized_libraries,
        }
    }

    pub fn from_settings(settings: &ProjectSettings) -> Self {
        Self::new(
            settings.environment_file.clone(),
            settings.optimized_libraries.clone(),
        )
    }

    /// The environment-constants file and the file that replaces it in this build.
    ///
    /// Production swaps in the `.prod`-suffixed sibling; otherwise the file maps to itself.
    pub fn environment_substitution(&self, options: &Options) -> (PathBuf, PathBuf) {
        let source = options.source_path(&self.environment_file);
        let selected = if options.production {
            production_variant(&source)
        } else {
            source.clone()
        };
        (source, selected)
    }

    fn rules(&self, options: &Options) -> Result<Vec<ModuleRule>> {
        let strict_modules = ModuleRule {
            test: Some(Pattern::new(FRAMEWORK_RUNTIME)?),
            parser: Some(json!({ "system": true })),
            ..ModuleRule::default()
        };

        let compiler = ModuleRule {
            test: Some(Pattern::new(COMPILED_SOURCES)?),
            loader: Some(COMPILER_LOADER.to_string()),
            ..ModuleRule::default()
        };

        // No loader cache in production.
        let cache_directory = if options.production {
            Value::Bool(false)
        } else {
            serde_json::to_value(options.cache_root.join(DOWNLEVEL_LOADER))?
        };

        let downlevel = ModuleRule {
            test: Some(Pattern::new(SCRIPTS)?),
            exclude: Pattern::node_modules_any_of(&self.optimized_libraries)?,
            r#use: vec![LoaderSpec {
                loader: DOWNLEVEL_LOADER.to_string(),
                options: json!({
                    "cacheDirectory": cache_directory,
                    "compact": false,
                    "scriptTarget": script_target(),
                    "optimize": true
                }),
            }],
            ..ModuleRule::default()
        };

        Ok(vec![strict_modules, compiler, downlevel])
    }

    fn plugin(&self, options: &Options) -> Result<PluginSpec> {
        let (source, selected) = self.environment_substitution(options);
        PluginSpec::new(
            COMPILER_PLUGIN,
            CompilerPluginOptions {
                tsconfig: options.type_config_path.clone(),
                jit_mode: false,
                direct_template_loading: true,
                emit_ng_module_scope: !options.production,
                file_replacements: BTreeMap::from([(source, selected)]),
            },
        )
    }
}

impl Default for FrameworkProvider {
    fn default() -> Self {
        Self::from_settings(&ProjectSettings::default())
    }
}

#[async_trait]
impl FragmentProvider for FrameworkProvider {
    fn name(&self) -> &str {
        "framework"
    }

    async fn provide(&self, options: &Options) -> Result<Fragment> {
        let tsconfig = &options.type_config_path;
        if !tokio::fs::try_exists(tsconfig).await? {
            return Err(ConfigError::TypeConfigNotFound(tsconfig.clone()));
        }

        let module = ModuleOptions {
            rules: self.rules(options)?,
        };

        Fragment::new()
            .with("module", module)?
            .with("plugins", vec![self.plugin(options)?])
    }
}

/// Fixed output language level of the downlevel pass, e.g. `ES2015`.
fn script_target() -> String {
    format!("ES{ECMA_TARGET}")
}

/// `environment.ts` -> `environment.prod.ts`, in the same directory.
pub fn production_variant(path: &Path) -> PathBuf {
    let Some(stem) = path.file_stem() else {
        return path.to_path_buf();
    };

    let mut name = OsString::from(stem);
    name.push(".prod");
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::LayoutSettings;

    #[test]
    fn production_variant_inserts_suffix_before_extension() {
        assert_eq!(
            production_variant(Path::new("/app/src/environments/environment.ts")),
            PathBuf::from("/app/src/environments/environment.prod.ts")
        );
        assert_eq!(
            production_variant(Path::new("/app/config")),
            PathBuf::from("/app/config.prod")
        );
    }

    #[test]
    fn substitution_is_identity_in_development() {
        let options = Options::from_root("/app", &LayoutSettings::default(), false);
        let (source, selected) = FrameworkProvider::default().environment_substitution(&options);
        assert_eq!(source, selected);
        assert_eq!(
            selected,
            PathBuf::from("/app/src/environments/environment.ts")
        );
    }

    #[test]
    fn substitution_selects_prod_sibling_in_production() {
        let options = Options::from_root("/app", &LayoutSettings::default(), true);
        let (source, selected) = FrameworkProvider::default().environment_substitution(&options);
        assert_eq!(source, PathBuf::from("/app/src/environments/environment.ts"));
        assert_eq!(
            selected,
            PathBuf::from("/app/src/environments/environment.prod.ts")
        );
    }

    #[test]
    fn downlevel_rule_skips_optimized_libraries() {
        let options = Options::from_root("/app", &LayoutSettings::default(), false);
        let rules = FrameworkProvider::default().rules(&options).unwrap();
        assert_eq!(rules.len(), 3);

        let exclude = rules[2].exclude.as_ref().unwrap();
        assert!(exclude.is_match("/app/node_modules/core-js/modules/es.array.js"));
        assert!(exclude.is_match("/app/node_modules/tslib/tslib.es6.js"));
        assert!(!exclude.is_match("/app/node_modules/rxjs/dist/esm/index.js"));
    }

    #[test]
    fn cache_directory_only_in_development() {
        let provider = FrameworkProvider::default();

        let dev = Options::from_root("/app", &LayoutSettings::default(), false);
        let rules = provider.rules(&dev).unwrap();
        assert_eq!(
            rules[2].r#use[0].options["cacheDirectory"],
            json!("/app/node_modules/.cache/babel-loader")
        );

        let prod = Options::from_root("/app", &LayoutSettings::default(), true);
        let rules = provider.rules(&prod).unwrap();
        assert_eq!(rules[2].r#use[0].options["cacheDirectory"], json!(false));
    }

    #[test]
    fn downlevel_pass_has_fixed_target_and_optimizes() {
        let provider = FrameworkProvider::default();

        for production in [false, true] {
            let options = Options::from_root("/app", &LayoutSettings::default(), production);
            let rules = provider.rules(&options).unwrap();
            let loader_options = &rules[2].r#use[0].options;

            assert_eq!(loader_options["scriptTarget"], json!("ES2015"));
            assert_eq!(loader_options["optimize"], json!(true));
            assert!(loader_options.get("presets").is_none());
        }
    }

    #[test]
    fn no_optimized_libraries_means_no_exclude() {
        let options = Options::from_root("/app", &LayoutSettings::default(), false);
        let rules = FrameworkProvider::new("environments/environment.ts", Vec::new())
            .rules(&options)
            .unwrap();

        assert!(rules[2].exclude.is_none());
        let serialized = serde_json::to_value(&rules[2]).unwrap();
        assert!(serialized.get("exclude").is_none());
    }

    #[test]
    fn strict_module_protocol_only_for_framework_runtime() {
        let options = Options::from_root("/app", &LayoutSettings::default(), false);
        let rules = FrameworkProvider::default().rules(&options).unwrap();
        let runtime = rules[0].test.as_ref().unwrap();

        assert_eq!(rules[0].parser, Some(json!({ "system": true })));
        assert!(runtime.is_match("/app/node_modules/@angular/core/fesm2015/core.mjs"));
        assert!(runtime.is_match(r"C:\app\node_modules\@angular\core\bundles\core.js"));
        assert!(!runtime.is_match("/app/node_modules/@angular/common/fesm2015/http.mjs"));
        assert!(!runtime.is_match("/app/node_modules/@angular/router/fesm2015/router.mjs"));
    }
}
