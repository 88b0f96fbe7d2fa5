//! TL-012: Site skeleton with pages folder, WSGI bootstrap and `siteconfig.xml`.

use super::templates::ROOT_PY;
use super::{base_or_default, Scaffold};
use crate::core::error::Result;
use crate::core::tree::ConfigTree;
use crate::core::types::{Artifact, EntryRef};
use crate::core::xml;
use std::path::{Path, PathBuf};

/// Dojo toolkit version written when none is given.
pub const DEFAULT_DOJO_VERSION: &str = "11";

/// WSGI server options. Only truthy values reach `siteconfig.xml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WsgiOptions {
    pub reload: bool,
    pub debug: bool,
    pub port: Option<u16>,
    pub mainpackage: Option<String>,
}

impl WsgiOptions {
    fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut attrs = Vec::new();
        if self.reload {
            attrs.push(("reload", "True".to_string()));
        }
        if self.debug {
            attrs.push(("debug", "True".to_string()));
        }
        if let Some(port) = self.port.filter(|p| *p != 0) {
            attrs.push(("port", port.to_string()));
        }
        if let Some(main) = self.mainpackage.as_deref().filter(|m| !m.is_empty()) {
            attrs.push(("mainpackage", main.to_string()));
        }
        attrs
    }
}

#[derive(Debug, Clone)]
pub struct SiteOptions {
    pub resources: Vec<EntryRef>,
    pub instance: Option<String>,
    pub dojo_version: String,
    pub wsgi: WsgiOptions,
    /// Written verbatim instead of the generated configuration.
    pub config: Option<ConfigTree>,
}

impl Default for SiteOptions {
    fn default() -> Self {
        Self {
            resources: Vec::new(),
            instance: None,
            dojo_version: DEFAULT_DOJO_VERSION.to_string(),
            wsgi: WsgiOptions::default(),
            config: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SiteMaker {
    name: String,
    base: PathBuf,
    options: SiteOptions,
}

impl SiteMaker {
    pub fn new(name: impl Into<String>, base: Option<PathBuf>, options: SiteOptions) -> Self {
        Self {
            name: name.into(),
            base: base_or_default(base),
            options,
        }
    }

    /// The `siteconfig.xml` document.
    pub fn site_config(&self) -> ConfigTree {
        if let Some(config) = &self.options.config {
            return config.clone();
        }
        let opts = &self.options;
        let mut config = ConfigTree::new();
        if let Some(instance) = opts.instance.as_deref().filter(|i| !i.is_empty()) {
            config.touch(&format!("instances.{}", instance));
        }
        for resource in &opts.resources {
            let path = format!("resources.{}", resource.name());
            match resource.path() {
                Some(p) => {
                    config.set_item(&path, None, [("path", p)]);
                }
                None => {
                    config.touch(&path);
                }
            }
        }
        config.set_item("wsgi", None, opts.wsgi.attributes());
        config.touch("connection_timeout");
        config.touch("connection_refresh");
        config.set_item("dojo", None, [("version", opts.dojo_version.as_str())]);
        config
    }
}

impl Scaffold for SiteMaker {
    fn name(&self) -> &str {
        &self.name
    }

    fn base(&self) -> &Path {
        &self.base
    }

    fn artifacts(&self) -> Result<Vec<Artifact>> {
        let root = self.root();
        Ok(vec![
            Artifact::dir(&root),
            Artifact::dir(root.join("pages")),
            Artifact::file(root.join("root.py"), ROOT_PY),
            Artifact::file(root.join("siteconfig.xml"), xml::to_xml(&self.site_config())),
        ])
    }
}
