//! The composition engine.
//!
//! A [`Composer`] holds an ordered list of fragment providers. `compose` runs
//! all of them concurrently against one [`Options`] value, then merges their
//! fragments in declaration order. Any provider failure aborts the whole
//! composition: there is no partial configuration.

use std::sync::Arc;

use futures::future::try_join_all;

use crate::error::{ConfigError, Result};
use crate::fragment::{ComposedConfig, FragmentProvider};
use crate::hints::GlobalDefsLookup;
use crate::merge::MergeRules;
use crate::options::Options;
use crate::providers::standard_providers;
use crate::settings::ProjectSettings;

#[derive(Default)]
pub struct Composer {
    providers: Vec<Box<dyn FragmentProvider>>,
    rules: MergeRules,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Composer with the five standard providers and the merge rules from `settings`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::sync::Arc;
    /// use weft_config::{CompilerGlobalDefs, Composer, Environment, OptionsResolver, ProjectSettings};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> weft_config::Result<()> {
    /// let settings = ProjectSettings::default();
    /// let options = OptionsResolver::new(settings.layout.clone())
    ///     .resolve(std::path::Path::new("."), Environment::production())?;
    /// let config = Composer::standard(&settings, Arc::new(CompilerGlobalDefs))
    ///     .compose(&options)
    ///     .await?;
    /// println!("{}", config.to_json_pretty()?);
    /// # Ok(())
    /// # }
    /// ```
    pub fn standard(settings: &ProjectSettings, lookup: Arc<dyn GlobalDefsLookup>) -> Self {
        Self {
            providers: standard_providers(settings, lookup),
            rules: settings.merge_rules(),
        }
    }

    /// Append a provider; it merges after every provider added before it.
    pub fn with_provider(mut self, provider: impl FragmentProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn with_rules(mut self, rules: MergeRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn provider_names(&self) -> impl Iterator<Item = &str> {
        self.providers.iter().map(|p| p.name())
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Run every provider and merge the results.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ProviderFailed` naming the first provider that
    /// failed. No configuration is produced in that case.
    pub async fn compose(&self, options: &Options) -> Result<ComposedConfig> {
        tracing::debug!(
            providers = self.providers.len(),
            mode = %options.mode(),
            "composing configuration"
        );

        let pending = self.providers.iter().map(|provider| async move {
            let fragment = provider
                .provide(options)
                .await
                .map_err(|err| ConfigError::provider(provider.name(), err))?;
            tracing::debug!(
                provider = provider.name(),
                keys = ?fragment.keys().collect::<Vec<_>>(),
                "fragment ready"
            );
            Ok::<_, ConfigError>(fragment)
        });

        // Output order follows declaration order regardless of completion order.
        let fragments = try_join_all(pending).await?;
        let config = ComposedConfig::from_fragments(fragments, &self.rules);

        tracing::info!(
            mode = %options.mode(),
            keys = config.as_map().len(),
            "configuration composed"
        );
        Ok(config)
    }
}

/// Compose the standard configuration for `options` in one call.
pub async fn compose(
    options: &Options,
    settings: &ProjectSettings,
    lookup: Arc<dyn GlobalDefsLookup>,
) -> Result<ComposedConfig> {
    Composer::standard(settings, lookup).compose(options).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::{provider_fn, Fragment};
    use crate::settings::LayoutSettings;
    use serde_json::json;

    fn options() -> Options {
        Options::from_root("/app", &LayoutSettings::default(), false)
    }

    #[tokio::test]
    async fn empty_composer_yields_empty_config() {
        let config = Composer::new().compose(&options()).await.unwrap();
        assert!(config.as_map().is_empty());
    }

    #[tokio::test]
    async fn failure_is_attributed_to_provider() {
        let composer = Composer::new()
            .with_provider(provider_fn("ok", |_| Fragment::new().with("mode", "x")))
            .with_provider(provider_fn("broken", |_| {
                Err(ConfigError::GlobalDefsUnavailable("nope".to_string()))
            }));

        let err = composer.compose(&options()).await.unwrap_err();
        match &err {
            ConfigError::ProviderFailed { provider, .. } => assert_eq!(provider, "broken"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(
            err.root_cause(),
            ConfigError::GlobalDefsUnavailable(_)
        ));
    }

    #[tokio::test]
    async fn rules_apply_during_merge() {
        let composer = Composer::new()
            .with_provider(provider_fn("a", |_| {
                Fragment::new().with("resolve", json!({ "extensions": [".ts"] }))
            }))
            .with_provider(provider_fn("b", |_| {
                Fragment::new().with("resolve", json!({ "extensions": [".js"] }))
            }))
            .with_rules(MergeRules::new().with("resolve.extensions", crate::MergeStrategy::Replace));

        let config = composer.compose(&options()).await.unwrap();
        assert_eq!(config.pointer("/resolve/extensions"), Some(&json!([".js"])));
    }

    #[test]
    fn standard_composer_declares_five_providers_in_order() {
        let composer = Composer::standard(
            &ProjectSettings::default(),
            Arc::new(crate::hints::CompilerGlobalDefs),
        );
        let names: Vec<_> = composer.provider_names().collect();
        assert_eq!(
            names,
            vec!["entry", "common", "source-map", "framework", "minify"]
        );
    }
}
