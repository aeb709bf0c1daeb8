use pkgchain_core::adapter::PackageManager;
use pkgchain_core::manifest::DependencyKind;
use pkgchain_core::release::BumpType;
use pkgchain_core::shell::Invocation;

pub struct PnpmManager;

fn latest(packages: &[String]) -> impl Iterator<Item = String> + '_ {
    packages.iter().map(|name| format!("{}@latest", name))
}

impl PackageManager for PnpmManager {
    fn name(&self) -> &'static str {
        "pnpm"
    }

    fn link_global(&self, packages: &[String]) -> Invocation {
        Invocation::new("pnpm", ["link", "-g"]).args(packages.iter().cloned())
    }

    fn unlink_global(&self, packages: &[String]) -> Invocation {
        Invocation::new("pnpm", ["unlink", "-g"]).args(packages.iter().cloned())
    }

    fn install_latest(&self, packages: &[String], kind: DependencyKind) -> Invocation {
        let mut invocation = Invocation::new("pnpm", ["install", "--color"]);
        if kind == DependencyKind::Development {
            invocation = invocation.arg("-D");
        }
        invocation.args(latest(packages))
    }

    fn run_script(&self, script: &str, args: &[String]) -> Invocation {
        Invocation::new("pnpm", ["run", script]).args(args.iter().cloned())
    }

    fn version_bump(&self, bump: BumpType) -> Invocation {
        Invocation::new("pnpm", ["version", bump.as_str()])
    }

    fn publish(&self) -> Invocation {
        Invocation::new("pnpm", ["publish"])
    }

    fn list_package(&self, package: &str) -> Invocation {
        Invocation::new("pnpm", ["list", package, "--json"])
    }

    fn view_repository_url(&self, package: &str) -> Invocation {
        Invocation::new("npm", ["view", package, "repository.url"])
    }
}
