//! TL-001: Shared types for entity kinds, entry references, artifacts and plans.
//!
//! Scaffolders describe the desired state of an entity as an ordered list of
//! [`Artifact`]s. The planner diffs that list against the filesystem and the
//! executor converges it, creating only what is missing.

use super::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

// ============================================================================
// Entity kinds
// ============================================================================

/// The closed set of entities trellis knows how to locate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Instance,
    Site,
    Resource,
    Package,
    Project,
}

impl EntityKind {
    /// Every kind, in declaration order.
    pub const ALL: [EntityKind; 5] = [
        Self::Instance,
        Self::Site,
        Self::Resource,
        Self::Package,
        Self::Project,
    ];

    /// Root folder name holding entities of this kind.
    pub fn plural(self) -> &'static str {
        match self {
            Self::Instance => "instances",
            Self::Site => "sites",
            Self::Resource => "resources",
            Self::Package => "packages",
            Self::Project => "projects",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance => write!(f, "instance"),
            Self::Site => write!(f, "site"),
            Self::Resource => write!(f, "resource"),
            Self::Package => write!(f, "package"),
            Self::Project => write!(f, "project"),
        }
    }
}

impl FromStr for EntityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.to_string() == s)
            .ok_or_else(|| Error::UnknownEntityType(s.to_string()))
    }
}

// ============================================================================
// Entry references
// ============================================================================

/// A resource or package given either by name or by name plus source path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryRef {
    Name(String),
    NameWithPath { name: String, path: String },
}

impl EntryRef {
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) | Self::NameWithPath { name, .. } => name,
        }
    }

    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Name(_) => None,
            Self::NameWithPath { path, .. } => Some(path),
        }
    }
}

impl From<&str> for EntryRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

/// Parses `name` or `name=path`. `=` is used because package codes may
/// themselves contain `:`.
impl FromStr for EntryRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((name, _)) if name.is_empty() => Err(format!("missing name in '{}'", s)),
            Some((name, path)) if !path.is_empty() => Ok(Self::NameWithPath {
                name: name.to_string(),
                path: path.to_string(),
            }),
            Some((name, _)) => Ok(Self::Name(name.to_string())),
            None if s.is_empty() => Err("empty entry".to_string()),
            None => Ok(Self::Name(s.to_string())),
        }
    }
}

// ============================================================================
// Artifacts
// ============================================================================

/// What a scaffolder wants to exist at a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactKind {
    Directory,
    File { content: String },
}

/// A single desired directory or file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub kind: ArtifactKind,
}

impl Artifact {
    pub fn dir(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: ArtifactKind::Directory,
        }
    }

    pub fn file(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: ArtifactKind::File {
                content: content.into(),
            },
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.kind, ArtifactKind::Directory)
    }

    /// True when something already occupies the artifact's slot.
    pub fn exists(&self) -> bool {
        match self.kind {
            ArtifactKind::Directory => self.path.is_dir(),
            ArtifactKind::File { .. } => self.path.exists(),
        }
    }

    pub fn label(&self) -> String {
        let suffix = if self.is_dir() { "/" } else { "" };
        format!("{}{}", self.path.display(), suffix)
    }
}

// ============================================================================
// Plan
// ============================================================================

/// Action to take on an artifact. Existing artifacts are never updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanAction {
    Create,
    NoOp,
}

impl fmt::Display for PlanAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "CREATE"),
            Self::NoOp => write!(f, "NO-OP"),
        }
    }
}

/// A single planned change.
#[derive(Debug, Clone)]
pub struct PlannedChange {
    pub artifact: Artifact,
    pub action: PlanAction,
}

/// Full scaffolding plan for one entity.
#[derive(Debug, Clone)]
pub struct ScaffoldPlan {
    /// Entity root directory
    pub root: PathBuf,

    /// Changes in creation order (parents before children)
    pub changes: Vec<PlannedChange>,

    pub to_create: u32,
    pub unchanged: u32,
}

impl ScaffoldPlan {
    pub fn is_converged(&self) -> bool {
        self.to_create == 0
    }
}

/// Result of applying a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyResult {
    pub created: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
}

impl ApplyResult {
    pub fn was_created(&self, path: &Path) -> bool {
        self.created.iter().any(|p| p == path)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tl001_kind_plural_total() {
        let plurals: Vec<_> = EntityKind::ALL.iter().map(|k| k.plural()).collect();
        assert_eq!(
            plurals,
            vec!["instances", "sites", "resources", "packages", "projects"]
        );
    }

    #[test]
    fn test_tl001_kind_parse() {
        assert_eq!("site".parse::<EntityKind>().unwrap(), EntityKind::Site);
        assert_eq!(
            "project".parse::<EntityKind>().unwrap(),
            EntityKind::Project
        );
    }

    #[test]
    fn test_tl001_kind_parse_unknown() {
        let err = "widget".parse::<EntityKind>().unwrap_err();
        assert!(matches!(err, Error::UnknownEntityType(ref k) if k == "widget"));
        // plural folder names are not kinds
        assert!("sites".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_tl001_entry_ref_parse() {
        assert_eq!("sys".parse::<EntryRef>().unwrap(), EntryRef::Name("sys".into()));
        assert_eq!(
            "gnrcore:sys=/opt/pkgs".parse::<EntryRef>().unwrap(),
            EntryRef::NameWithPath {
                name: "gnrcore:sys".into(),
                path: "/opt/pkgs".into()
            }
        );
        assert_eq!("sys=".parse::<EntryRef>().unwrap(), EntryRef::Name("sys".into()));
        assert!("=x".parse::<EntryRef>().is_err());
        assert!("".parse::<EntryRef>().is_err());
    }

    #[test]
    fn test_tl001_entry_ref_yaml() {
        let refs: Vec<EntryRef> =
            serde_yaml_ng::from_str("[adm, {name: shop, path: /srv/shop}]").unwrap();
        assert_eq!(refs[0].name(), "adm");
        assert_eq!(refs[0].path(), None);
        assert_eq!(refs[1].name(), "shop");
        assert_eq!(refs[1].path(), Some("/srv/shop"));
    }

    #[test]
    fn test_tl001_artifact_exists() {
        let dir = tempfile::tempdir().unwrap();
        let d = Artifact::dir(dir.path());
        assert!(d.exists());
        let f = Artifact::file(dir.path().join("a.txt"), "x");
        assert!(!f.exists());
        std::fs::write(dir.path().join("a.txt"), "y").unwrap();
        assert!(f.exists());
        // a file where a directory is wanted does not count
        assert!(!Artifact::dir(dir.path().join("a.txt")).exists());
    }

    #[test]
    fn test_tl001_plan_action_display() {
        assert_eq!(PlanAction::Create.to_string(), "CREATE");
        assert_eq!(PlanAction::NoOp.to_string(), "NO-OP");
    }

    #[test]
    fn test_tl001_artifact_label() {
        assert_eq!(Artifact::dir("/p/sites").label(), "/p/sites/");
        assert_eq!(Artifact::file("/p/root.py", "").label(), "/p/root.py");
    }
}
