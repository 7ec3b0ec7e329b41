//! Integration tests for the `weft` binary.
//!
//! Each test builds a throwaway project on disk and runs the real binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn project() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    fs::write(root.join("package.json"), r#"{ "name": "demo" }"#).unwrap();
    fs::write(root.join("tsconfig.app.json"), "{}").unwrap();
    fs::create_dir_all(root.join("src/environments")).unwrap();
    for file in [
        "src/main.ts",
        "src/polyfills.ts",
        "src/environments/environment.ts",
        "src/environments/environment.prod.ts",
    ] {
        fs::write(root.join(file), "export {};").unwrap();
    }
    fs::write(root.join("src/index.html"), "<app-root></app-root>").unwrap();

    temp
}

fn weft(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("weft").unwrap();
    cmd.env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .arg("--quiet")
        .current_dir(root);
    cmd
}

fn compose_json(root: &Path, mode: &str) -> Value {
    let output = weft(root)
        .args(["compose", "--mode", mode])
        .output()
        .unwrap();
    assert!(output.status.success(), "compose failed: {output:?}");
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn production_output_has_minimizer() {
    let temp = project();
    let config = compose_json(temp.path(), "production");

    assert_eq!(config["mode"], "production");
    assert_eq!(config["optimization"]["minimize"], true);
    assert_eq!(config["optimization"]["minimizer"][0]["plugin"], "TerserPlugin");
    assert_eq!(
        config["optimization"]["minimizer"][0]["options"]["terserOptions"]["compress"]
            ["global_defs"]["ngDevMode"],
        false
    );
    assert!(config.get("devtool").is_none());
}

#[test]
fn development_output_has_source_maps_and_no_minimizer() {
    let temp = project();
    let config = compose_json(temp.path(), "development");

    assert_eq!(config["mode"], "development");
    assert!(config["optimization"].get("minimizer").is_none());
    assert_eq!(config["devtool"], false);
    assert_eq!(config["performance"]["hints"], false);
}

#[test]
fn output_is_identical_across_runs() {
    let temp = project();
    let first = weft(temp.path())
        .args(["compose", "--mode", "production"])
        .output()
        .unwrap();
    let second = weft(temp.path())
        .args(["compose", "--mode", "production"])
        .output()
        .unwrap();

    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn compose_writes_output_file() {
    let temp = project();
    let out = temp.path().join("build/webpack.json");

    weft(temp.path())
        .args(["compose", "--compact", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = fs::read_to_string(&out).unwrap();
    assert_eq!(written.lines().count(), 1);
    let config: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(config["output"]["filename"], "[name].js");
}

#[test]
fn compose_runs_from_a_subdirectory() {
    let temp = project();
    let config = compose_json(&temp.path().join("src/environments"), "development");

    let main = config["entry"]["main"].as_str().unwrap();
    assert!(main.ends_with("main.ts"));
}

#[test]
fn missing_type_config_fails() {
    let temp = project();
    fs::remove_file(temp.path().join("tsconfig.app.json")).unwrap();

    weft(temp.path())
        .args(["compose"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("framework"));
}

#[test]
fn unreadable_global_defs_fail_production_only() {
    let temp = project();
    let missing = temp.path().join("no-such-defs.json");

    weft(temp.path())
        .args(["compose", "--mode", "production", "--global-defs"])
        .arg(&missing)
        .assert()
        .failure()
        .stderr(predicate::str::contains("minify"));

    weft(temp.path())
        .args(["compose", "--mode", "development", "--global-defs"])
        .arg(&missing)
        .assert()
        .success();
}

#[test]
fn global_defs_file_feeds_minifier() {
    let temp = project();
    let defs = temp.path().join("defs.json");
    fs::write(&defs, r#"{ "ngDevMode": false, "BUILD_ID": "abc" }"#).unwrap();

    let output = weft(temp.path())
        .args(["compose", "--mode", "production", "--global-defs"])
        .arg(&defs)
        .output()
        .unwrap();
    assert!(output.status.success());

    let config: Value = serde_json::from_slice(&output.stdout).unwrap();
    let global_defs =
        &config["optimization"]["minimizer"][0]["options"]["terserOptions"]["compress"]["global_defs"];
    assert_eq!(global_defs["BUILD_ID"], "abc");
}

#[test]
fn settings_file_and_environment_override() {
    let temp = project();
    fs::write(
        temp.path().join("weft.toml"),
        "[default]\nvendor_chunk = \"from-file\"\n",
    )
    .unwrap();

    let config = compose_json(temp.path(), "development");
    assert_eq!(
        config["optimization"]["splitChunks"]["cacheGroups"]["vendor"]["name"],
        "from-file"
    );

    let output = weft(temp.path())
        .env("WEFT_VENDOR_CHUNK", "from-env")
        .args(["compose"])
        .output()
        .unwrap();
    let config: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        config["optimization"]["splitChunks"]["cacheGroups"]["vendor"]["name"],
        "from-env"
    );
}

#[test]
fn check_passes_for_complete_project() {
    let temp = project();
    for mode in ["development", "production"] {
        weft(temp.path())
            .args(["check", "--mode", mode])
            .assert()
            .success();
    }
}

#[test]
fn check_fails_when_template_is_missing() {
    let temp = project();
    fs::remove_file(temp.path().join("src/index.html")).unwrap();

    weft(temp.path())
        .args(["check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("index.html"));
}
