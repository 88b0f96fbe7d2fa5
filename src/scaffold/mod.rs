//! TL-010: Entity scaffolders.
//!
//! Each maker describes the skeleton of one entity as an ordered list of
//! [`Artifact`]s (parents before children). [`Scaffold::plan`] diffs it
//! against the disk without side effects and [`Scaffold::apply`] creates
//! only what is missing, so running a maker twice is a no-op the second
//! time.

pub mod instance;
pub mod package;
pub mod project;
pub mod resource;
pub mod site;
pub mod templates;

pub use instance::{DbOptions, InstanceMaker, InstanceOptions};
pub use package::{PackageMaker, PackageOptions, SqlPrefix};
pub use project::ProjectMaker;
pub use resource::ResourceMaker;
pub use site::{SiteMaker, SiteOptions, WsgiOptions};

use crate::core::error::Result;
use crate::core::types::{ApplyResult, Artifact, ScaffoldPlan};
use crate::core::{executor, planner};
use std::path::{Path, PathBuf};

/// Folder used when no base path is given.
pub const DEFAULT_BASE: &str = ".";

/// Common contract of every maker.
pub trait Scaffold {
    /// Entity name, also the name of its root folder.
    fn name(&self) -> &str;

    /// Folder the entity root is created in.
    fn base(&self) -> &Path;

    /// Desired directories and files, parents first.
    fn artifacts(&self) -> Result<Vec<Artifact>>;

    fn root(&self) -> PathBuf {
        self.base().join(self.name())
    }

    fn plan(&self) -> Result<ScaffoldPlan> {
        Ok(planner::plan(&self.root(), &self.artifacts()?))
    }

    fn apply(&self) -> Result<ApplyResult> {
        executor::apply(&self.plan()?)
    }
}

pub(crate) fn base_or_default(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(|| PathBuf::from(DEFAULT_BASE))
}

#[cfg(test)]
pub(crate) mod test_util {
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};

    /// Every path under `root` with file contents (`None` for directories).
    pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, Option<String>> {
        let mut out = BTreeMap::new();
        let mut stack = vec![root.to_path_buf()];
        while let Some(dir) = stack.pop() {
            for entry in std::fs::read_dir(&dir).unwrap() {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    out.insert(path.clone(), None);
                    stack.push(path);
                } else {
                    out.insert(path.clone(), Some(std::fs::read_to_string(&path).unwrap()));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tl010_default_base() {
        assert_eq!(base_or_default(None), PathBuf::from("."));
        assert_eq!(base_or_default(Some("/srv".into())), PathBuf::from("/srv"));
        let maker = ResourceMaker::new("common", None);
        assert_eq!(maker.root(), PathBuf::from("./common"));
    }
}
