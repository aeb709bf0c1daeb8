//! Which configured packages a project actually consumes.

use serde::Serialize;

use crate::manifest::{DependencyKind, ManifestSnapshot};

/// Configured package names split by how a project declares them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuitablePackages {
    /// Declared as runtime or development dependency.
    pub all: Vec<String>,
    pub runtime: Vec<String>,
    pub development: Vec<String>,
    /// Configured but not declared by the project.
    pub unsuitable: Vec<String>,
}

impl SuitablePackages {
    /// Splits `configured` names against `project`'s declarations, keeping
    /// the configured order.
    pub fn select(configured: &[String], project: &ManifestSnapshot) -> Self {
        let runtime = project.dependencies(DependencyKind::Runtime);
        let development = project.dependencies(DependencyKind::Development);

        let mut selection = SuitablePackages::default();
        for name in configured {
            let in_runtime = runtime.contains_key(name);
            let in_development = development.contains_key(name);
            if in_runtime {
                selection.runtime.push(name.clone());
            }
            if in_development {
                selection.development.push(name.clone());
            }
            if in_runtime || in_development {
                selection.all.push(name.clone());
            } else {
                selection.unsuitable.push(name.clone());
            }
        }
        selection
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}
