//! Command implementations for the weft CLI.
//!
//! - [`compose`] - Compose the configuration and write it as JSON
//! - [`check`] - Compose, then validate against the filesystem
//!
//! Each command provides an `execute` function taking its parsed arguments.

pub mod check;
pub mod compose;

use std::path::Path;
use std::sync::Arc;

use weft_config::{CompilerGlobalDefs, GlobalDefsLookup, JsonGlobalDefs};

pub use check::execute as check_execute;
pub use compose::execute as compose_execute;

/// Global definitions lookup selected by `--global-defs`.
pub(crate) fn global_defs_lookup(path: Option<&Path>) -> Arc<dyn GlobalDefsLookup> {
    match path {
        Some(path) => Arc::new(JsonGlobalDefs::new(path)),
        None => Arc::new(CompilerGlobalDefs),
    }
}
