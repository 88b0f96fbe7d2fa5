//! TL-006: Entity path resolution.
//!
//! Locates a named entity by searching, in declaration order, every root
//! configured under the entity's plural key (`sites`, `packages`, ...). When
//! nothing matches it falls back to project folders: each configured
//! project root is globbed for `*/<plural>/<name>`. First hit wins; nothing
//! is cached, every call hits the filesystem again.
//!
//! Names must be a single folder name, so a lookup never leaves its root.

use super::error::{Error, Result};
use super::tree::ConfigTree;
use super::types::EntityKind;
use regex::{Captures, Regex};
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Default javascript library name for [`PathResolver::js_path`].
pub const DEFAULT_JS_LIB: &str = "gnr";

/// Default javascript library version for [`PathResolver::js_path`].
pub const DEFAULT_JS_VERSION: &str = "11";

/// Resolves logical entity names against an environment tree.
#[derive(Debug, Clone, Default)]
pub struct PathResolver {
    env: ConfigTree,
}

impl PathResolver {
    pub fn new(env: ConfigTree) -> Self {
        Self { env }
    }

    pub fn environment(&self) -> &ConfigTree {
        &self.env
    }

    /// Resolve `name` of `kind` to an absolute existing directory.
    pub fn resolve(&self, name: &str, kind: EntityKind, look_in_projects: bool) -> Result<PathBuf> {
        let plural = kind.plural();
        let not_found = || Error::EntityNotFound {
            kind: kind.to_string(),
            name: name.to_string(),
        };
        if name.is_empty() {
            return Err(not_found());
        }
        if !is_plain_name(name) {
            return Err(Error::InvalidName {
                kind: kind.to_string(),
                name: name.to_string(),
            });
        }

        if self.env.contains(plural) {
            for root in self.existing_roots(plural) {
                let candidate = root.join(name);
                debug!(kind = %kind, candidate = %candidate.display(), "probing root");
                if candidate.is_dir() {
                    return Ok(candidate);
                }
            }
        }

        if look_in_projects && self.env.contains(EntityKind::Project.plural()) {
            for project_root in self.existing_roots(EntityKind::Project.plural()) {
                if let Some(found) = search_project(&project_root, plural, name) {
                    return Ok(found);
                }
            }
        }

        Err(not_found())
    }

    /// Like [`resolve`](Self::resolve) but with the kind given as text.
    pub fn resolve_named(&self, name: &str, kind: &str, look_in_projects: bool) -> Result<PathBuf> {
        let kind: EntityKind = kind.parse()?;
        self.resolve(name, kind, look_in_projects)
    }

    pub fn site_path(&self, name: &str) -> Result<PathBuf> {
        self.resolve(name, EntityKind::Site, true)
    }

    pub fn instance_path(&self, name: &str) -> Result<PathBuf> {
        self.resolve(name, EntityKind::Instance, true)
    }

    pub fn package_path(&self, name: &str) -> Result<PathBuf> {
        self.resolve(name, EntityKind::Package, true)
    }

    pub fn resource_path(&self, name: &str) -> Result<PathBuf> {
        self.resolve(name, EntityKind::Resource, true)
    }

    /// Projects are only searched in the `projects` roots themselves.
    pub fn project_path(&self, name: &str) -> Result<PathBuf> {
        self.resolve(name, EntityKind::Project, false)
    }

    /// `siteconfig.xml` of a resolved site.
    pub fn site_config_path(&self, name: &str) -> Result<PathBuf> {
        Ok(self.site_path(name)?.join("siteconfig.xml"))
    }

    /// Path of the `projects.<name>` repository entry.
    ///
    /// Strict lookups fail when the entry is missing; lenient lookups return
    /// `None` for a missing entry or an entry without a path.
    pub fn project_repository_path(&self, name: &str, strict: bool) -> Result<Option<PathBuf>> {
        let key = format!("{}.{}", EntityKind::Project.plural(), name);
        if strict && !self.env.contains(&key) {
            return Err(Error::EntityNotFound {
                kind: "project repository".to_string(),
                name: name.to_string(),
            });
        }
        Ok(self
            .env
            .attr(&key, "path")
            .filter(|p| !p.is_empty())
            .map(expand_path))
    }

    /// Static javascript folder for a library build, if configured.
    pub fn js_path(&self, lib_type: &str, version: &str) -> Option<PathBuf> {
        let key = format!("static.js.{}_{}", lib_type, version);
        self.env
            .attr(&key, "path")
            .filter(|p| !p.is_empty())
            .map(|p| expand_path(p).join("js"))
    }

    /// Expanded `path` attributes under `key` that are existing directories.
    fn existing_roots(&self, key: &str) -> Vec<PathBuf> {
        self.env
            .digest_attr(key, "path")
            .into_iter()
            .map(expand_path)
            .filter(|root| {
                let keep = root.is_dir();
                if !keep {
                    debug!(root = %root.display(), "skipping missing root");
                }
                keep
            })
            .collect()
    }
}

/// Exactly one normal path component: no separators, no `.`/`..`, not
/// absolute.
fn is_plain_name(name: &str) -> bool {
    if name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Search `<project_root>/*/<plural>/<name>`.
fn search_project(project_root: &Path, plural: &str, name: &str) -> Option<PathBuf> {
    let pattern = format!(
        "{}/*/{}",
        glob::Pattern::escape(&project_root.to_string_lossy()),
        plural
    );
    let matches = match glob::glob(&pattern) {
        Ok(paths) => paths,
        Err(e) => {
            warn!(pattern = %pattern, error = %e, "invalid project glob");
            return None;
        }
    };
    matches.flatten().map(|m| m.join(name)).find(|candidate| {
        debug!(candidate = %candidate.display(), "probing project folder");
        candidate.is_dir()
    })
}

/// Expand `~`, `$VAR` and `${VAR}` and make the result absolute.
///
/// Unset variables are left untouched.
pub fn expand_path(raw: &str) -> PathBuf {
    static VAR: OnceLock<Regex> = OnceLock::new();
    let var = VAR.get_or_init(|| {
        Regex::new(r"\$(?:\{([A-Za-z_][A-Za-z0-9_]*)\}|([A-Za-z_][A-Za-z0-9_]*))")
            .expect("static pattern is valid")
    });

    let expanded = var.replace_all(raw, |caps: &Captures| {
        let name = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
        std::env::var(name).unwrap_or_else(|_| caps[0].to_string())
    });

    let path = match expanded.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => match dirs::home_dir() {
            Some(home) => home.join(rest.trim_start_matches('/')),
            None => PathBuf::from(&*expanded),
        },
        _ => PathBuf::from(&*expanded),
    };

    if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(&path))
            .unwrap_or(path)
    }
}
