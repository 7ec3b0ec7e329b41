//! The built-in fragment providers.

mod common;
mod entry;
mod framework;
mod minify;
mod source_map;

use std::sync::Arc;

use crate::fragment::FragmentProvider;
use crate::hints::GlobalDefsLookup;
use crate::settings::ProjectSettings;

pub use common::{CommonProvider, MAIN_ENTRY, THIRD_PARTY_PATTERN};
pub use entry::{EntryProvider, HTML_PLUGIN};
pub use framework::{
    production_variant, FrameworkProvider, COMPILER_LOADER, COMPILER_PLUGIN, DOWNLEVEL_LOADER,
};
pub use minify::{MinifyProvider, MINIFIER_PLUGIN};
pub use source_map::{SourceMapProvider, SourceMapStrategy, SOURCE_MAP_PLUGIN};

/// The five standard providers in merge order.
///
/// Order matters only for merging: plugin and rule lists are concatenated in
/// this order, and later scalars win.
pub fn standard_providers(
    settings: &ProjectSettings,
    lookup: Arc<dyn GlobalDefsLookup>,
) -> Vec<Box<dyn FragmentProvider>> {
    vec![
        Box::new(EntryProvider::from_settings(settings)),
        Box::new(CommonProvider::from_settings(settings)),
        Box::new(SourceMapProvider),
        Box::new(FrameworkProvider::from_settings(settings)),
        Box::new(MinifyProvider::new(lookup)),
    ]
}
