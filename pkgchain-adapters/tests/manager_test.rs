use pkgchain_adapters::get_package_manager;
use pkgchain_core::config::PackageManagerKind;
use pkgchain_core::manifest::DependencyKind;
use pkgchain_core::release::BumpType;

fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_pnpm_commands() {
    let pnpm = get_package_manager(PackageManagerKind::Pnpm);
    assert_eq!(pnpm.name(), "pnpm");

    let packages = names(&["@acme/core", "@acme/ui"]);
    assert_eq!(
        pnpm.link_global(&packages).to_string(),
        "pnpm link -g @acme/core @acme/ui"
    );
    assert_eq!(
        pnpm.install_latest(&packages, DependencyKind::Runtime).to_string(),
        "pnpm install --color @acme/core@latest @acme/ui@latest"
    );
    assert_eq!(
        pnpm.install_latest(&packages[..1], DependencyKind::Development).to_string(),
        "pnpm install --color -D @acme/core@latest"
    );
    assert_eq!(
        pnpm.run_script("lint", &names(&["--fix"])).to_string(),
        "pnpm run lint --fix"
    );
    assert_eq!(pnpm.version_bump(BumpType::Patch).to_string(), "pnpm version patch");
    assert_eq!(pnpm.list_package("react").to_string(), "pnpm list react --json");
    assert_eq!(
        pnpm.view_repository_url("@acme/ui").to_string(),
        "npm view @acme/ui repository.url"
    );
}

#[test]
fn test_npm_separates_script_arguments() {
    let npm = get_package_manager(PackageManagerKind::Npm);
    assert_eq!(npm.name(), "npm");
    assert_eq!(npm.run_script("build", &[]).to_string(), "npm run build");
    assert_eq!(
        npm.run_script("lint", &names(&["--fix"])).to_string(),
        "npm run lint -- --fix"
    );
    assert_eq!(
        npm.install_latest(&names(&["a"]), DependencyKind::Development).to_string(),
        "npm install --color=always --save-dev a@latest"
    );
    assert_eq!(npm.version_bump(BumpType::Minor).to_string(), "npm version minor");
}

#[test]
fn test_listed_path_from_pnpm_output() {
    let pnpm = get_package_manager(PackageManagerKind::Pnpm);
    let output = r#"[{"name":"app","dependencies":{"react":{"version":"18.2.0","path":"/work/app/node_modules/react"}}}]"#;
    assert_eq!(
        pnpm.parse_listed_path(output, "react"),
        Some(std::path::PathBuf::from("/work/app/node_modules/react"))
    );
}
