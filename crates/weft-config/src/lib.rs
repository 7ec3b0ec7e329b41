//! Composition of bundler configuration from independent fragments.
//!
//! ```text
//! OptionsResolver -> [FragmentProviders, concurrently] -> Composer -> ComposedConfig
//! ```
//!
//! Providers receive the same immutable [`Options`] and may run in any order;
//! only their merge order is fixed. See [`merge`] for the merge rules.

pub mod compose;
pub mod error;
pub mod fragment;
pub mod hints;
pub mod merge;
pub mod options;
pub mod providers;
pub mod schema;
pub mod settings;
pub mod validation;

pub use compose::{compose, Composer};
pub use error::*;
pub use fragment::{
    provider_async_fn, provider_fn, AsyncFnProvider, ComposedConfig, FnProvider, Fragment,
    FragmentFuture, FragmentProvider,
};
pub use hints::{
    CompilerGlobalDefs, GlobalDefs, GlobalDefsLookup, JsonGlobalDefs, Literal, StaticGlobalDefs,
};
pub use merge::{merge_values, merge_values_with, MergeRules, MergeStrategy};
pub use options::{Environment, Mode, Options, OptionsResolver, DEFAULT_ROOT_MARKER};
pub use settings::{BudgetSettings, LayoutSettings, ProjectSettings, SETTINGS_FILE};

pub use validation::{validate_fs, validate_schema, ConfigValidator, FsValidator, SchemaValidator};
