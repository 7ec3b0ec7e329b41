//! Mode, module resolution, output, size budgets and chunk splitting.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::fragment::{Fragment, FragmentProvider};
use crate::options::Options;
use crate::schema::{
    CacheGroup, ChunkSelector, OutputOptions, Pattern, Performance, ResolveOptions, SplitChunks,
};
use crate::settings::{BudgetSettings, ProjectSettings};

/// Matches any module that lives under `node_modules`.
pub const THIRD_PARTY_PATTERN: &str = r"[\\/]node_modules[\\/]";

/// Entry whose third-party imports form the vendor chunk.
pub const MAIN_ENTRY: &str = "main";

const EXTENSIONS: [&str; 3] = [".ts", ".mjs", ".js"];

// Dual-format packages: prefer the ES2015 build over the legacy ones.
const MAIN_FIELDS: [&str; 4] = ["es2015", "browser", "module", "main"];

#[derive(Debug, Clone)]
pub struct CommonProvider {
    alias: String,
    vendor_chunk: String,
    budgets: BudgetSettings,
}

impl CommonProvider {
    pub fn new(alias: impl Into<String>, vendor_chunk: impl Into<String>, budgets: BudgetSettings) -> Self {
        Self {
            alias: alias.into(),
            vendor_chunk: vendor_chunk.into(),
            budgets,
        }
    }

    pub fn from_settings(settings: &ProjectSettings) -> Self {
        Self::new(
            settings.alias.clone(),
            settings.vendor_chunk.clone(),
            settings.budgets,
        )
    }

    /// Splitting policy: built-in heuristics off, one stably named vendor chunk.
    pub fn split_chunks(&self) -> Result<SplitChunks> {
        Ok(SplitChunks::without_heuristics().with_group(
            "vendor",
            CacheGroup {
                name: self.vendor_chunk.clone(),
                test: Pattern::new(THIRD_PARTY_PATTERN)?,
                chunks: ChunkSelector::entry(MAIN_ENTRY),
                enforce: true,
            },
        ))
    }

    fn performance(&self, options: &Options) -> Performance {
        if options.production {
            Performance::bounded(self.budgets.max_asset_size, self.budgets.max_entrypoint_size)
        } else {
            Performance::unbounded()
        }
    }

    fn fragment(&self, options: &Options) -> Result<Fragment> {
        let resolve = ResolveOptions {
            extensions: EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            main_fields: MAIN_FIELDS.iter().map(|s| s.to_string()).collect(),
            alias: BTreeMap::from([(self.alias.clone(), options.source_root.clone())]),
        };

        let output = OutputOptions {
            path: options.dist_root.clone(),
            filename: "[name].js".to_string(),
            chunk_filename: "[name].chunk.js".to_string(),
            public_path: "/".to_string(),
        };

        let mut optimization = serde_json::Map::new();
        optimization.insert(
            "splitChunks".to_string(),
            serde_json::to_value(self.split_chunks()?)?,
        );

        Fragment::new()
            .with("mode", options.mode().as_str())?
            .with("resolve", resolve)?
            .with("output", output)?
            .with("performance", self.performance(options))?
            .with("optimization", optimization)
    }
}

impl Default for CommonProvider {
    fn default() -> Self {
        Self::from_settings(&ProjectSettings::default())
    }
}

#[async_trait]
impl FragmentProvider for CommonProvider {
    fn name(&self) -> &str {
        "common"
    }

    async fn provide(&self, options: &Options) -> Result<Fragment> {
        self.fragment(options)
    }
}
