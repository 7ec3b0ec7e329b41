//! Minifier plugin options.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::hints::Literal;

/// Options for the minifier plugin descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TerserPluginOptions {
    pub parallel: bool,
    pub terser_options: TerserOptions,
}

/// Options forwarded to the minifier itself. Keys keep the minifier's
/// snake_case spelling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TerserOptions {
    /// Highest language version the output may use
    pub ecma: u16,
    /// Work around Safari 10 loop-scoping and `await` bugs
    pub safari10: bool,
    pub compress: CompressOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompressOptions {
    pub passes: u8,
    pub global_defs: BTreeMap<String, Literal>,
    pub pure_getters: bool,
    pub pure_funcs: Vec<String>,
    pub comparisons: bool,
}
