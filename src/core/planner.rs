//! TL-007: Plan generation by diffing desired artifacts against the filesystem.

use super::types::*;
use std::path::Path;

/// Generate a scaffolding plan. Artifacts that already exist become
/// `NoOp`; everything else is `Create`. Nothing is touched on disk.
pub fn plan(root: &Path, artifacts: &[Artifact]) -> ScaffoldPlan {
    let mut changes = Vec::with_capacity(artifacts.len());
    let mut to_create = 0u32;
    let mut unchanged = 0u32;

    for artifact in artifacts {
        let action = determine_action(artifact);
        match action {
            PlanAction::Create => to_create += 1,
            PlanAction::NoOp => unchanged += 1,
        }
        changes.push(PlannedChange {
            artifact: artifact.clone(),
            action,
        });
    }

    ScaffoldPlan {
        root: root.to_path_buf(),
        changes,
        to_create,
        unchanged,
    }
}

fn determine_action(artifact: &Artifact) -> PlanAction {
    if artifact.exists() {
        PlanAction::NoOp
    } else {
        PlanAction::Create
    }
}

/// Human-readable one-liner for a planned change.
pub fn describe(change: &PlannedChange) -> String {
    let what = if change.artifact.is_dir() {
        "directory"
    } else {
        "file"
    };
    match change.action {
        PlanAction::Create => format!("{}: create {}", change.artifact.label(), what),
        PlanAction::NoOp => format!("{}: exists", change.artifact.label()),
    }
}
