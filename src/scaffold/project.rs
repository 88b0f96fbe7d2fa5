//! TL-011: Project skeleton.

use super::{base_or_default, Scaffold};
use crate::core::error::Result;
use crate::core::types::{Artifact, EntityKind};
use std::path::{Path, PathBuf};

/// Creates `<base>/<name>` with one folder per nested entity kind.
#[derive(Debug, Clone)]
pub struct ProjectMaker {
    name: String,
    base: PathBuf,
}

impl ProjectMaker {
    pub fn new(name: impl Into<String>, base: Option<PathBuf>) -> Self {
        Self {
            name: name.into(),
            base: base_or_default(base),
        }
    }
}

impl Scaffold for ProjectMaker {
    fn name(&self) -> &str {
        &self.name
    }

    fn base(&self) -> &Path {
        &self.base
    }

    fn artifacts(&self) -> Result<Vec<Artifact>> {
        let root = self.root();
        let mut artifacts = vec![Artifact::dir(&root)];
        for kind in [
            EntityKind::Package,
            EntityKind::Site,
            EntityKind::Instance,
            EntityKind::Resource,
        ] {
            artifacts.push(Artifact::dir(root.join(kind.plural())));
        }
        Ok(artifacts)
    }
}
