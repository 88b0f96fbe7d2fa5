//! TL-015: Resource folder.

use super::{base_or_default, Scaffold};
use crate::core::error::Result;
use crate::core::types::Artifact;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ResourceMaker {
    name: String,
    base: PathBuf,
}

impl ResourceMaker {
    pub fn new(name: impl Into<String>, base: Option<PathBuf>) -> Self {
        Self {
            name: name.into(),
            base: base_or_default(base),
        }
    }
}

impl Scaffold for ResourceMaker {
    fn name(&self) -> &str {
        &self.name
    }

    fn base(&self) -> &Path {
        &self.base
    }

    fn artifacts(&self) -> Result<Vec<Artifact>> {
        Ok(vec![Artifact::dir(self.root())])
    }
}
