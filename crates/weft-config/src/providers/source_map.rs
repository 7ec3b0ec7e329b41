//! Source-map strategy, chosen once per build from the environment flag.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;
use crate::fragment::{Fragment, FragmentProvider};
use crate::options::Options;
use crate::schema::{Pattern, PluginSpec};

pub const SOURCE_MAP_PLUGIN: &str = "SourceMapDevToolPlugin";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMapStrategy {
    WithMaps,
    WithoutMaps,
}

impl SourceMapStrategy {
    pub fn for_options(options: &Options) -> Self {
        if options.production {
            SourceMapStrategy::WithoutMaps
        } else {
            SourceMapStrategy::WithMaps
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SourceMapPluginOptions {
    filename: &'static str,
    test: Pattern,
    source_root: &'static str,
    module_filename_template: &'static str,
    append: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SourceMapProvider;

impl SourceMapProvider {
    fn fragment(strategy: SourceMapStrategy) -> Result<Fragment> {
        match strategy {
            SourceMapStrategy::WithoutMaps => Ok(Fragment::new()),
            SourceMapStrategy::WithMaps => {
                // `devtool` off: the plugin below owns source-map emission.
                let plugin = PluginSpec::new(
                    SOURCE_MAP_PLUGIN,
                    SourceMapPluginOptions {
                        filename: "[file].map",
                        test: Pattern::new(r"\.(js|css)($|\?)")?,
                        source_root: "webpack:///",
                        module_filename_template: "[resource-path]",
                        append: false,
                    },
                )?;

                Fragment::new()
                    .with("devtool", false)?
                    .with("plugins", vec![plugin])
            }
        }
    }
}

#[async_trait]
impl FragmentProvider for SourceMapProvider {
    fn name(&self) -> &str {
        "source-map"
    }

    async fn provide(&self, options: &Options) -> Result<Fragment> {
        let strategy = SourceMapStrategy::for_options(options);
        tracing::debug!(?strategy, "selected source-map strategy");
        Self::fragment(strategy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::LayoutSettings;
    use serde_json::json;

    #[tokio::test]
    async fn development_emits_maps_for_styles_and_scripts() {
        let options = Options::from_root("/app", &LayoutSettings::default(), false);
        let fragment = SourceMapProvider.provide(&options).await.unwrap();

        assert_eq!(fragment.get("devtool"), Some(&json!(false)));
        let plugin = &fragment.get("plugins").unwrap()[0];
        assert_eq!(plugin["plugin"], json!(SOURCE_MAP_PLUGIN));
        assert_eq!(plugin["options"]["moduleFilenameTemplate"], json!("[resource-path]"));
        assert_eq!(plugin["options"]["sourceRoot"], json!("webpack:///"));
        assert_eq!(plugin["options"]["append"], json!(false));

        let test = Pattern::new(plugin["options"]["test"].as_str().unwrap()).unwrap();
        assert!(test.is_match("main.js"));
        assert!(test.is_match("styles.css?v=1"));
        assert!(!test.is_match("index.html"));
    }

    #[tokio::test]
    async fn production_emits_nothing() {
        let options = Options::from_root("/app", &LayoutSettings::default(), true);
        let fragment = SourceMapProvider.provide(&options).await.unwrap();
        assert!(fragment.is_empty());
    }
}
