//! Tests for default values and edge cases.

use std::path::PathBuf;

use weft_config::{
    BudgetSettings, Environment, LayoutSettings, Mode, MergeRules, MergeStrategy, Options,
    ProjectSettings,
};

#[test]
fn project_settings_defaults() {
    let settings = ProjectSettings::default();
    assert_eq!(settings.entries.get("main"), Some(&PathBuf::from("main.ts")));
    assert_eq!(
        settings.entries.get("polyfills"),
        Some(&PathBuf::from("polyfills.ts"))
    );
    assert_eq!(settings.template, PathBuf::from("index.html"));
    assert_eq!(settings.alias, "@app");
    assert_eq!(settings.vendor_chunk, "vendor");
    assert_eq!(
        settings.environment_file,
        PathBuf::from("environments/environment.ts")
    );
    assert!(settings.optimized_libraries.contains(&"core-js".to_string()));
    assert!(settings.merge.is_empty());
    assert!(settings.merge_rules().is_empty());
}

#[test]
fn layout_defaults() {
    let layout = LayoutSettings::default();
    assert_eq!(layout.source_dir, PathBuf::from("src"));
    assert_eq!(layout.cache_dir, PathBuf::from("node_modules/.cache"));
    assert_eq!(layout.type_config, PathBuf::from("tsconfig.app.json"));
    assert_eq!(layout.dist_dir, PathBuf::from("dist"));
}

#[test]
fn budget_defaults() {
    let budgets = BudgetSettings::default();
    assert_eq!(budgets.max_asset_size, 1024 * 1024);
    assert_eq!(budgets.max_entrypoint_size, 2 * 1024 * 1024);
}

#[test]
fn environment_defaults_to_development() {
    assert_eq!(Environment::default(), Environment::development());
    assert_eq!(Mode::default(), Mode::Development);
    assert!(!Mode::Development.is_production());
}

#[test]
fn options_mode_tracks_flag() {
    let layout = LayoutSettings::default();
    assert_eq!(Options::from_root("/p", &layout, true).mode(), Mode::Production);
    assert_eq!(Options::from_root("/p", &layout, false).mode(), Mode::Development);
}

#[test]
fn unknown_paths_use_default_strategy() {
    let rules = MergeRules::new().with("plugins", MergeStrategy::Prepend);
    assert_eq!(rules.strategy_for("plugins"), MergeStrategy::Prepend);
    assert_eq!(rules.strategy_for("module.rules"), MergeStrategy::Merge);
}

#[test]
fn settings_deserialize_from_partial_json() {
    let settings: ProjectSettings =
        serde_json::from_str(r#"{ "vendor_chunk": "libs" }"#).expect("deserialize");
    assert_eq!(settings.vendor_chunk, "libs");
    assert_eq!(settings.alias, "@app");
    assert_eq!(settings.layout, LayoutSettings::default());
}
