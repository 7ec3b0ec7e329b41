//! Production minification.
//!
//! Development builds get an empty fragment and never touch the hint lookup.
//! Production builds first await the global-definition hints, then configure
//! the minifier with them.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::error::Result;
use crate::fragment::{Fragment, FragmentProvider};
use crate::hints::{GlobalDefs, GlobalDefsLookup};
use crate::options::Options;
use crate::schema::{CompressOptions, PluginSpec, TerserOptions, TerserPluginOptions};

pub const MINIFIER_PLUGIN: &str = "TerserPlugin";

/// Output language floor; combined with `safari10` this keeps Safari 10 working.
/// Language level floor shared by the minifier and the downlevel pass.
pub(crate) const ECMA_TARGET: u16 = 2015;

const COMPRESS_PASSES: u8 = 3;

/// Identity helper whose calls are dropped when the result is unused.
const PURE_IDENTITY_FN: &str = "forwardRef";

pub struct MinifyProvider {
    lookup: Arc<dyn GlobalDefsLookup>,
}

impl MinifyProvider {
    pub fn new(lookup: Arc<dyn GlobalDefsLookup>) -> Self {
        Self { lookup }
    }

    pub fn terser_options(global_defs: GlobalDefs) -> TerserPluginOptions {
        TerserPluginOptions {
            parallel: true,
            terser_options: TerserOptions {
                ecma: ECMA_TARGET,
                safari10: true,
                compress: CompressOptions {
                    passes: COMPRESS_PASSES,
                    global_defs,
                    pure_getters: true,
                    pure_funcs: vec![PURE_IDENTITY_FN.to_string()],
                    // Rewrites comparisons in ways the framework runtime does not expect.
                    comparisons: false,
                },
            },
        }
    }
}

#[async_trait]
impl FragmentProvider for MinifyProvider {
    fn name(&self) -> &str {
        "minify"
    }

    async fn provide(&self, options: &Options) -> Result<Fragment> {
        if !options.production {
            return Ok(Fragment::new());
        }

        let global_defs = self.lookup.lookup().await?;
        tracing::debug!(count = global_defs.len(), "obtained global definitions");

        let minimizer = PluginSpec::new(MINIFIER_PLUGIN, Self::terser_options(global_defs))?;
        Fragment::new().with(
            "optimization",
            json!({ "minimize": true, "minimizer": [minimizer] }),
        )
    }
}
