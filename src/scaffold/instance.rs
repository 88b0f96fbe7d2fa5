//! TL-013: Instance skeleton with custom/data folders and `instanceconfig.xml`.

use super::{base_or_default, Scaffold};
use crate::core::error::Result;
use crate::core::tree::ConfigTree;
use crate::core::types::{Artifact, EntryRef};
use crate::core::xml;
use std::path::{Path, PathBuf};

/// Package used for authentication when nothing else applies.
pub const DEFAULT_AUTH_PACKAGE: &str = "adm";

/// Database connection options. Unset or empty values are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DbOptions {
    /// Defaults to the instance name.
    pub dbname: Option<String>,
    pub implementation: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct InstanceOptions {
    pub packages: Vec<EntryRef>,
    pub authentication: bool,
    pub authentication_pkg: Option<String>,
    pub db: DbOptions,
    pub use_dbstores: bool,
    /// Written verbatim instead of the generated configuration.
    pub config: Option<ConfigTree>,
}

impl Default for InstanceOptions {
    fn default() -> Self {
        Self {
            packages: Vec::new(),
            authentication: true,
            authentication_pkg: None,
            db: DbOptions::default(),
            use_dbstores: false,
            config: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InstanceMaker {
    name: String,
    base: PathBuf,
    options: InstanceOptions,
}

impl InstanceMaker {
    pub fn new(name: impl Into<String>, base: Option<PathBuf>, options: InstanceOptions) -> Self {
        Self {
            name: name.into(),
            base: base_or_default(base),
            options,
        }
    }

    /// Package handling authentication: explicit, else the first package,
    /// else `adm`. `None` when authentication is off.
    pub fn authentication_package(&self) -> Option<&str> {
        if !self.options.authentication {
            return None;
        }
        let explicit = self
            .options
            .authentication_pkg
            .as_deref()
            .filter(|p| !p.is_empty());
        Some(
            explicit
                .or_else(|| self.options.packages.first().map(EntryRef::name))
                .unwrap_or(DEFAULT_AUTH_PACKAGE),
        )
    }

    fn db_attributes(&self) -> Vec<(&'static str, String)> {
        let db = &self.options.db;
        let dbname = db
            .dbname
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| self.name.clone());
        let candidates = [
            ("dbname", Some(dbname)),
            ("implementation", db.implementation.clone()),
            ("host", db.host.clone()),
            ("port", db.port.filter(|p| *p != 0).map(|p| p.to_string())),
            ("user", db.user.clone()),
            ("password", db.password.clone()),
        ];
        candidates
            .into_iter()
            .filter_map(|(key, value)| value.filter(|v| !v.is_empty()).map(|v| (key, v)))
            .collect()
    }

    /// The `instanceconfig.xml` document.
    pub fn instance_config(&self) -> ConfigTree {
        if let Some(config) = &self.options.config {
            return config.clone();
        }
        let mut config = ConfigTree::new();
        config.set_item("db", None, self.db_attributes());
        config.touch("packages");
        for package in &self.options.packages {
            let key = format!("packages.{}", package.name().replace(':', "_"));
            let mut attrs = vec![("pkgcode", package.name())];
            if let Some(path) = package.path() {
                attrs.push(("path", path));
            }
            config.set_item(&key, None, attrs);
        }
        if let Some(pkg) = self.authentication_package() {
            config.set_item("authentication", None, [("pkg", pkg)]);
            config.set_item(
                "authentication.py_auth",
                None,
                [
                    ("defaultTags", "user"),
                    ("pkg", DEFAULT_AUTH_PACKAGE),
                    ("method", "authenticate"),
                ],
            );
        }
        config
    }
}

impl Scaffold for InstanceMaker {
    fn name(&self) -> &str {
        &self.name
    }

    fn base(&self) -> &Path {
        &self.base
    }

    fn artifacts(&self) -> Result<Vec<Artifact>> {
        let root = self.root();
        let mut artifacts = vec![
            Artifact::dir(&root),
            Artifact::dir(root.join("custom")),
            Artifact::dir(root.join("data")),
        ];
        if self.options.use_dbstores {
            artifacts.push(Artifact::dir(root.join("dbstores")));
        }
        artifacts.push(Artifact::file(
            root.join("instanceconfig.xml"),
            xml::to_xml(&self.instance_config()),
        ));
        Ok(artifacts)
    }
}
