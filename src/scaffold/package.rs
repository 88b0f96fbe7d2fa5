//! TL-014: Package skeleton with model/lib/webpages/resources and `main.py`.
//!
//! Display names, sql schema, comment and login url all derive from the
//! package name unless given explicitly.

use super::templates::{HELLO_WORLD_PY, INDEX_PY, MAIN_PY};
use super::{base_or_default, Scaffold};
use crate::core::error::Result;
use crate::core::template::{self, capitalize, py_quote, Vars};
use crate::core::types::Artifact;
use std::path::{Path, PathBuf};

/// How the package declares its sql table prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SqlPrefix {
    /// `sqlprefix=True`
    #[default]
    Default,
    /// `sqlprefix=False`
    Disabled,
    /// `sqlprefix='<prefix>'`
    Custom(String),
    /// No `sqlprefix` argument at all.
    Omit,
}

impl SqlPrefix {
    /// Keyword fragment for the `config_attributes` call, trailing comma
    /// included.
    pub fn fragment(&self) -> String {
        match self {
            Self::Default => "sqlprefix=True,".to_string(),
            Self::Disabled => "sqlprefix=False,".to_string(),
            Self::Custom(prefix) => format!("sqlprefix='{}',", py_quote(prefix)),
            Self::Omit => String::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PackageOptions {
    pub sqlschema: Option<String>,
    pub sqlprefix: SqlPrefix,
    pub name_short: Option<String>,
    pub name_long: Option<String>,
    pub name_full: Option<String>,
    pub login_url: Option<String>,
    pub comment: Option<String>,
    pub hello_world: bool,
}

#[derive(Debug, Clone)]
pub struct PackageMaker {
    name: String,
    base: PathBuf,
    options: PackageOptions,
}

fn or_derived(explicit: &Option<String>, derive: impl FnOnce() -> String) -> String {
    explicit
        .clone()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(derive)
}

impl PackageMaker {
    pub fn new(name: impl Into<String>, base: Option<PathBuf>, options: PackageOptions) -> Self {
        Self {
            name: name.into(),
            base: base_or_default(base),
            options,
        }
    }

    pub fn name_short(&self) -> String {
        or_derived(&self.options.name_short, || capitalize(&self.name))
    }

    pub fn name_long(&self) -> String {
        or_derived(&self.options.name_long, || capitalize(&self.name))
    }

    pub fn name_full(&self) -> String {
        or_derived(&self.options.name_full, || capitalize(&self.name))
    }

    pub fn sqlschema(&self) -> String {
        or_derived(&self.options.sqlschema, || self.name.to_lowercase())
    }

    pub fn comment(&self) -> String {
        or_derived(&self.options.comment, || format!("{} package", self.name))
    }

    pub fn login_url(&self) -> String {
        or_derived(&self.options.login_url, || format!("{}/login", self.name))
    }

    /// Rendered `main.py`.
    pub fn main_py(&self) -> Result<String> {
        let vars = Vars::from([
            ("comment", py_quote(&self.comment())),
            ("sqlschema", py_quote(&self.sqlschema())),
            ("sqlprefix", self.options.sqlprefix.fragment()),
            ("name_short", py_quote(&self.name_short())),
            ("name_long", py_quote(&self.name_long())),
            ("name_full", py_quote(&self.name_full())),
            ("login_url", py_quote(&self.login_url())),
        ]);
        template::render(MAIN_PY, &vars)
    }
}

impl Scaffold for PackageMaker {
    fn name(&self) -> &str {
        &self.name
    }

    fn base(&self) -> &Path {
        &self.base
    }

    fn artifacts(&self) -> Result<Vec<Artifact>> {
        let root = self.root();
        let webpages = root.join("webpages");
        let mut artifacts = vec![
            Artifact::dir(&root),
            Artifact::dir(root.join("model")),
            Artifact::dir(root.join("lib")),
            Artifact::dir(&webpages),
            Artifact::dir(root.join("resources")),
            Artifact::file(root.join("main.py"), self.main_py()?),
            Artifact::file(webpages.join("index.py"), INDEX_PY),
        ];
        if self.options.hello_world {
            artifacts.push(Artifact::file(webpages.join("hello_world.py"), HELLO_WORLD_PY));
        }
        Ok(artifacts)
    }
}
