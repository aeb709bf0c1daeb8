use std::fs;
use tempfile::TempDir;

use pkgchain_adapters::PackageJsonReader;
use pkgchain_core::adapter::ManifestReader;
use pkgchain_core::error::Error;

fn write_package(dir: &std::path::Path, content: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("package.json"), content).unwrap();
}

#[test]
fn test_reads_all_dependency_kinds() {
    let temp_dir = TempDir::new().unwrap();
    write_package(
        temp_dir.path(),
        r#"{
  "name": "@acme/ui",
  "version": "1.4.2",
  "dependencies": { "@acme/core": "^1.0.0" },
  "devDependencies": { "@acme/tooling": "~2.1.0" },
  "peerDependencies": { "react": "^18.0.0" },
  "scripts": { "build": "tsc", "watch": "tsc -w" },
  "repository": { "type": "git", "url": "git+https://github.com/acme/ui.git" }
}"#,
    );

    let manifest = PackageJsonReader.read_manifest(temp_dir.path()).unwrap();

    assert_eq!(manifest.name, "@acme/ui");
    assert_eq!(manifest.version.as_deref(), Some("1.4.2"));
    assert_eq!(manifest.runtime.get("@acme/core").map(String::as_str), Some("^1.0.0"));
    assert_eq!(manifest.development.get("@acme/tooling").map(String::as_str), Some("~2.1.0"));
    assert_eq!(manifest.peer.get("react").map(String::as_str), Some("^18.0.0"));
    assert!(manifest.has_script("watch"));
    assert_eq!(
        manifest.repository.as_deref(),
        Some("git+https://github.com/acme/ui.git")
    );
    assert!(!manifest.exemptions.self_version_accuracy_exempt);
}

#[test]
fn test_reads_exemptions_and_string_repository() {
    let temp_dir = TempDir::new().unwrap();
    write_package(
        temp_dir.path(),
        r#"{
  "name": "app",
  "repository": "https://github.com/acme/app",
  "pkgchain": {
    "selfVersionAccuracyExempt": true,
    "depsVersionAccuracyExempt": ["@acme/core"]
  }
}"#,
    );

    let manifest = PackageJsonReader.read_manifest(temp_dir.path()).unwrap();

    assert_eq!(manifest.version, None);
    assert_eq!(manifest.repository.as_deref(), Some("https://github.com/acme/app"));
    assert!(manifest.exemptions.self_version_accuracy_exempt);
    assert!(manifest.exempts_dependency("@acme/core"));
    assert!(!manifest.exempts_dependency("@acme/ui"));
}

#[test]
fn test_missing_manifest_is_unreadable() {
    let temp_dir = TempDir::new().unwrap();
    let err = PackageJsonReader.read_manifest(temp_dir.path()).unwrap_err();
    assert!(matches!(err, Error::ManifestUnreadable { .. }));
    assert!(!PackageJsonReader.detect(temp_dir.path()));
}

#[test]
fn test_invalid_json_is_unreadable() {
    let temp_dir = TempDir::new().unwrap();
    write_package(temp_dir.path(), "{ \"name\": ");
    let err = PackageJsonReader.read_manifest(temp_dir.path()).unwrap_err();
    assert!(matches!(err, Error::ManifestUnreadable { .. }));
}

#[test]
fn test_nameless_project_keeps_its_dependencies() {
    let temp_dir = TempDir::new().unwrap();
    write_package(
        temp_dir.path(),
        r#"{ "private": true, "dependencies": { "core": "^1.0.0" } }"#,
    );

    let manifest = PackageJsonReader.read_manifest(temp_dir.path()).unwrap();
    assert!(manifest.name.is_empty());
    assert_eq!(manifest.declared_range("core"), Some("^1.0.0"));
}
