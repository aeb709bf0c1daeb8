use std::fs;
use tempfile::TempDir;

use pkgchain_core::config::{Config, ConfigFile, PackageManagerKind};
use pkgchain_core::error::Error;

#[test]
fn test_nearest_file_first_and_ancestor_overrides() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let project = root.join("work").join("app");
    fs::create_dir_all(&project).unwrap();

    fs::write(
        root.join("pkgchain.toml"),
        r#"
main_branch = "main"
exclude = ["legacy"]

[items]
core = "libs/core"
legacy = "libs/legacy"
"#,
    )
    .unwrap();
    fs::write(
        project.join("pkgchain.json"),
        r#"{ "items": { "ui": "../ui", "core": "/elsewhere/core" }, "include": ["ui", "core", "legacy"], "package_manager": "npm" }"#,
    )
    .unwrap();

    let config = Config::discover_with(&project, None).unwrap();

    assert_eq!(config.sources.len(), 2);
    assert_eq!(config.sources[0], project.join("pkgchain.json"));
    assert_eq!(config.sources[1], root.join("pkgchain.toml"));

    assert_eq!(config.items["ui"], project.join("../ui"));
    assert_eq!(config.items["core"], root.join("libs/core"));
    assert_eq!(config.package_manager, PackageManagerKind::Npm);
    assert_eq!(config.main_branch, "main");
    assert_eq!(config.package_names(), vec!["ui", "core"]);

    let symbolic = config.resolve_symbolic_names();
    let resolved: Vec<&str> = symbolic
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(resolved, vec!["ui", "core"]);
}

#[test]
fn test_include_defaults_to_every_item() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("pkgchain.toml"),
        r#"
[items]
b = "b"
a = "a"
"#,
    )
    .unwrap();

    let config = Config::discover_with(temp_dir.path(), None).unwrap();
    assert_eq!(config.include, vec!["b", "a"]);
    assert_eq!(config.package_manager, PackageManagerKind::Pnpm);
    assert_eq!(config.main_branch, "master");
    assert_eq!(config.location_of("a").unwrap(), temp_dir.path().join("a"));
}

#[test]
fn test_suffixed_file_and_extra_path() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("project");
    let shared = temp_dir.path().join("shared");
    fs::create_dir_all(&project).unwrap();
    fs::create_dir_all(&shared).unwrap();

    fs::write(project.join("pkgchain.local.toml"), "[items]\napp = \".\"\n").unwrap();
    fs::write(shared.join("extra.toml"), "[items]\nkit = \"kit\"\n").unwrap();

    let extra = shared.join("extra.toml");
    let config = Config::discover_with(&project, Some(&extra)).unwrap();

    assert_eq!(config.sources.last(), Some(&extra));
    assert_eq!(config.items["app"], project.join("."));
    assert_eq!(config.items["kit"], shared.join("kit"));
}

#[test]
fn test_missing_config_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let paths = Config::find_config_paths(temp_dir.path(), None).unwrap();
    if paths.is_empty() {
        let err = Config::discover_with(temp_dir.path(), None).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound(_)));
    }
}

#[test]
fn test_invalid_file_reports_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("pkgchain.toml");
    fs::write(&path, "items = [").unwrap();

    match Config::discover_with(temp_dir.path(), None) {
        Err(Error::Config { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected a config error, got {:?}", other),
    }
}

#[test]
fn test_unknown_package_manager_is_rejected() {
    let path = std::path::Path::new("pkgchain.json");
    assert!(ConfigFile::parse(path, r#"{ "package_manager": "yarn" }"#).is_err());
    assert_eq!(PackageManagerKind::from_str("NPM"), Some(PackageManagerKind::Npm));
}

#[test]
fn test_unknown_package_is_reported_with_alternatives() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("pkgchain.toml"), "[items]\ncore = \"core\"\n").unwrap();
    let config = Config::discover_with(temp_dir.path(), None).unwrap();

    match config.location_of("ui") {
        Err(Error::PackageNotFound { name, available }) => {
            assert_eq!(name, "ui");
            assert_eq!(available, "core");
        }
        other => panic!("expected PackageNotFound, got {:?}", other),
    }
}
