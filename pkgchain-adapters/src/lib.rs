pub mod npm;
pub mod package_json;
pub mod pnpm;

pub use npm::NpmManager;
pub use package_json::{parse_package_json, PackageJsonReader};
pub use pnpm::PnpmManager;

use pkgchain_core::adapter::PackageManager;
use pkgchain_core::config::PackageManagerKind;

pub fn get_package_manager(kind: PackageManagerKind) -> Box<dyn PackageManager> {
    match kind {
        PackageManagerKind::Pnpm => Box::new(PnpmManager),
        PackageManagerKind::Npm => Box::new(NpmManager),
    }
}
