//! Entry points and HTML artifact injection.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;
use crate::fragment::{Fragment, FragmentProvider};
use crate::options::Options;
use crate::schema::PluginSpec;
use crate::settings::ProjectSettings;

pub const HTML_PLUGIN: &str = "HtmlWebpackPlugin";

#[derive(Debug, Clone)]
pub struct EntryProvider {
    entries: BTreeMap<String, PathBuf>,
    template: PathBuf,
}

#[derive(Serialize)]
struct HtmlOptions {
    template: PathBuf,
    filename: &'static str,
}

impl EntryProvider {
    pub fn new(entries: BTreeMap<String, PathBuf>, template: impl Into<PathBuf>) -> Self {
        Self {
            entries,
            template: template.into(),
        }
    }

    pub fn from_settings(settings: &ProjectSettings) -> Self {
        Self::new(settings.entries.clone(), settings.template.clone())
    }

    fn fragment(&self, options: &Options) -> Result<Fragment> {
        let entry: BTreeMap<&str, PathBuf> = self
            .entries
            .iter()
            .map(|(name, file)| (name.as_str(), options.source_path(file)))
            .collect();

        let html = PluginSpec::new(
            HTML_PLUGIN,
            HtmlOptions {
                template: options.source_path(&self.template),
                filename: "index.html",
            },
        )?;

        Fragment::new()
            .with("entry", entry)?
            .with("plugins", vec![html])
    }
}

impl Default for EntryProvider {
    fn default() -> Self {
        Self::from_settings(&ProjectSettings::default())
    }
}

#[async_trait]
impl FragmentProvider for EntryProvider {
    fn name(&self) -> &str {
        "entry"
    }

    async fn provide(&self, options: &Options) -> Result<Fragment> {
        self.fragment(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::LayoutSettings;
    use serde_json::json;

    #[tokio::test]
    async fn entries_resolve_against_source_root() {
        let options = Options::from_root("/app", &LayoutSettings::default(), false);
        let fragment = EntryProvider::default().provide(&options).await.unwrap();

        assert_eq!(
            fragment.get("entry"),
            Some(&json!({ "main": "/app/src/main.ts", "polyfills": "/app/src/polyfills.ts" }))
        );
        assert_eq!(
            fragment.get("plugins"),
            Some(&json!([{
                "plugin": "HtmlWebpackPlugin",
                "options": { "template": "/app/src/index.html", "filename": "index.html" }
            }]))
        );
    }
}
