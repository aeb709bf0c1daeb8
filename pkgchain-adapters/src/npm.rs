use pkgchain_core::adapter::PackageManager;
use pkgchain_core::manifest::DependencyKind;
use pkgchain_core::release::BumpType;
use pkgchain_core::shell::Invocation;

pub struct NpmManager;

impl PackageManager for NpmManager {
    fn name(&self) -> &'static str {
        "npm"
    }

    fn link_global(&self, packages: &[String]) -> Invocation {
        Invocation::new("npm", ["link"]).args(packages.iter().cloned())
    }

    fn unlink_global(&self, packages: &[String]) -> Invocation {
        Invocation::new("npm", ["unlink", "--no-save"]).args(packages.iter().cloned())
    }

    fn install_latest(&self, packages: &[String], kind: DependencyKind) -> Invocation {
        let flag = match kind {
            DependencyKind::Development => "--save-dev",
            DependencyKind::Runtime | DependencyKind::Peer => "--save",
        };
        Invocation::new("npm", ["install", "--color=always", flag])
            .args(packages.iter().map(|name| format!("{}@latest", name)))
    }

    // npm needs `--` before arguments meant for the script.
    fn run_script(&self, script: &str, args: &[String]) -> Invocation {
        let invocation = Invocation::new("npm", ["run", script]);
        if args.is_empty() {
            invocation
        } else {
            invocation.arg("--").args(args.iter().cloned())
        }
    }

    fn version_bump(&self, bump: BumpType) -> Invocation {
        Invocation::new("npm", ["version", bump.as_str()])
    }

    fn publish(&self) -> Invocation {
        Invocation::new("npm", ["publish"])
    }

    fn list_package(&self, package: &str) -> Invocation {
        Invocation::new("npm", ["ls", package, "--json", "--long"])
    }

    fn view_repository_url(&self, package: &str) -> Invocation {
        Invocation::new("npm", ["view", package, "repository.url"])
    }
}
