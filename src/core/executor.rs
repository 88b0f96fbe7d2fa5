//! TL-008: Executor that converges a plan onto the filesystem.
//!
//! Only `Create` changes touch the disk. Directories are created one level
//! at a time (plans list parents first) and files are written only when
//! absent, so a re-run never alters existing content. Errors propagate with
//! no rollback of what was already created.

use super::error::{Error, Result};
use super::types::*;
use std::fs;
use std::io::Write;
use tracing::{debug, info};

/// Apply every `Create` change of `plan`.
pub fn apply(plan: &ScaffoldPlan) -> Result<ApplyResult> {
    let mut result = ApplyResult::default();

    for change in &plan.changes {
        let path = &change.artifact.path;
        // re-check: the plan may be stale
        if change.action == PlanAction::NoOp || change.artifact.exists() {
            debug!(path = %path.display(), "unchanged");
            result.unchanged.push(path.clone());
            continue;
        }
        apply_artifact(&change.artifact)?;
        info!(path = %path.display(), "created");
        result.created.push(path.clone());
    }

    Ok(result)
}

fn apply_artifact(artifact: &Artifact) -> Result<()> {
    let path = &artifact.path;
    match &artifact.kind {
        ArtifactKind::Directory => fs::create_dir(path).map_err(|e| Error::io(path, e)),
        ArtifactKind::File { content } => {
            let mut file = fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(path)
                .map_err(|e| Error::io(path, e))?;
            file.write_all(content.as_bytes())
                .map_err(|e| Error::io(path, e))
        }
    }
}
