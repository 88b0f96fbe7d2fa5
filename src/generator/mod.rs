//! TL-030: Admin resource generation from schema metadata.
//!
//! For each selected table of a package writes
//! `<package>/resources/tables/<table>/th_<table>.py`, and optionally the
//! package `menu.py`. Existing table files are left alone unless `force`
//! is set; the menu is regenerated on every request so it tracks the
//! current table list.
//! Every file produces a [`GenerationReport`]; skips are reports, not
//! errors.

pub mod columns;
pub mod menu;
pub mod th;
pub mod writer;

use crate::core::error::{Error, Result};
use crate::core::template::capitalize;
use crate::schema::{Introspector, PackageMeta, TableMeta};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Generation switches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Replace existing files
    pub force: bool,
    /// Also (re)write `menu.py`
    pub menu: bool,
    /// Formbuilder column count
    pub columns: usize,
    /// Emit cell widths in the view
    pub guess_size: bool,
    /// Spaces per indent level
    pub indent: usize,
    /// Tables to generate; empty means every table of the package
    pub tables: Vec<String>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            force: false,
            menu: false,
            columns: 2,
            guess_size: false,
            indent: 4,
            tables: Vec::new(),
        }
    }
}

/// What happened to one output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationOutcome {
    Created,
    /// File exists and `force` is off
    Skipped,
    /// Table has no column to show
    SkippedEmpty,
}

impl fmt::Display for GenerationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Skipped => write!(f, "exists: skipped, use -f/--force to replace"),
            Self::SkippedEmpty => write!(f, "no columns: skipped"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub file: PathBuf,
    pub outcome: GenerationOutcome,
}

impl GenerationReport {
    fn new(file: PathBuf, outcome: GenerationOutcome) -> Self {
        Self { file, outcome }
    }
}

/// Writes resource files for one package.
pub struct ResourceGenerator<'a> {
    schema: &'a dyn Introspector,
    package: String,
    package_dir: PathBuf,
    options: GeneratorOptions,
}

impl<'a> ResourceGenerator<'a> {
    pub fn new(
        schema: &'a dyn Introspector,
        package: impl Into<String>,
        package_dir: impl Into<PathBuf>,
        options: GeneratorOptions,
    ) -> Self {
        Self {
            schema,
            package: package.into(),
            package_dir: package_dir.into(),
            options,
        }
    }

    fn package_meta(&self) -> Result<&'a PackageMeta> {
        self.schema
            .package(&self.package)
            .ok_or_else(|| Error::UnknownPackage(self.package.clone()))
    }

    fn table_meta(&self, table: &str) -> Result<&'a TableMeta> {
        self.schema
            .table(&self.package, table)
            .ok_or_else(|| Error::UnknownTable {
                package: self.package.clone(),
                table: table.to_string(),
            })
    }

    /// Selected tables in generation order, all validated.
    pub fn tables(&self) -> Result<Vec<&'a TableMeta>> {
        let pkg = self.package_meta()?;
        if self.options.tables.is_empty() {
            return Ok(pkg.tables.values().collect());
        }
        self.options
            .tables
            .iter()
            .map(|name| self.table_meta(name))
            .collect()
    }

    /// Generate every selected table, then the menu when requested.
    /// Unknown package or tables fail before anything is written.
    pub fn make_resources(&self) -> Result<Vec<GenerationReport>> {
        let tables = self.tables()?;
        let mut reports = Vec::with_capacity(tables.len() + 1);
        for table in &tables {
            reports.push(self.write_table(table)?);
        }
        if self.options.menu {
            reports.push(self.write_menu(&tables)?);
        }
        Ok(reports)
    }

    /// Generate the resource module of a single table.
    pub fn create_resource_file(&self, table: &str) -> Result<GenerationReport> {
        self.package_meta()?;
        let meta = self.table_meta(table)?;
        self.write_table(meta)
    }

    /// Generate `menu.py` for the selected tables, replacing any existing
    /// one.
    pub fn make_menu(&self) -> Result<GenerationReport> {
        let tables = self.tables()?;
        self.write_menu(&tables)
    }

    pub fn resource_path(&self, table: &str) -> PathBuf {
        self.package_dir
            .join("resources")
            .join("tables")
            .join(table)
            .join(format!("th_{}.py", table))
    }

    pub fn menu_path(&self) -> PathBuf {
        self.package_dir.join("menu.py")
    }

    fn write_table(&self, table: &TableMeta) -> Result<GenerationReport> {
        let path = self.resource_path(&table.name);
        if self.blocked(&path) {
            return Ok(GenerationReport::new(path, GenerationOutcome::Skipped));
        }
        let specs = columns::column_specs(table);
        if specs.is_empty() {
            warn!(table = %table.name, "no generable columns, skipping");
            return Ok(GenerationReport::new(path, GenerationOutcome::SkippedEmpty));
        }
        let source = th::render(
            self.schema,
            table,
            &specs,
            th::RenderOptions {
                columns: self.options.columns,
                guess_size: self.options.guess_size,
                indent: self.options.indent,
            },
        );
        write_file(&path, &source)?;
        Ok(GenerationReport::new(path, GenerationOutcome::Created))
    }

    fn write_menu(&self, tables: &[&TableMeta]) -> Result<GenerationReport> {
        let path = self.menu_path();
        let pkg = self.package_meta()?;
        let label = pkg
            .name_long
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| capitalize(&self.package));
        let source = menu::render(&self.package, &label, tables, self.options.indent);
        write_file(&path, &source)?;
        Ok(GenerationReport::new(path, GenerationOutcome::Created))
    }

    /// Existing table file without `force`.
    fn blocked(&self, path: &Path) -> bool {
        let blocked = path.exists() && !self.options.force;
        if blocked {
            warn!(path = %path.display(), "exists: will be skipped, use -f/--force to force replace");
        }
        blocked
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    std::fs::write(path, content).map_err(|e| Error::io(path, e))?;
    info!(path = %path.display(), "created");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaModel;

    const SCHEMA: &str = r#"
packages:
  shop:
    name_long: Online shop
    tables:
      orders:
        name_plural: Orders
        columns:
          id: { dtype: A, _sysfield: true }
          code: { dtype: A, size: 12 }
      statuses:
        lookup: true
        columns:
          label: { dtype: A }
      blobs:
        columns:
          id: { dtype: A, _sysfield: true }
          data: { dtype: O }
  bare:
    tables: {}
"#;

    fn model() -> SchemaModel {
        SchemaModel::from_yaml(SCHEMA).unwrap()
    }

    fn outcomes(reports: &[GenerationReport]) -> Vec<GenerationOutcome> {
        reports.iter().map(|r| r.outcome).collect()
    }

    #[test]
    fn test_tl030_generates_all_tables() {
        let dir = tempfile::tempdir().unwrap();
        let model = model();
        let gen = ResourceGenerator::new(&model, "shop", dir.path(), GeneratorOptions::default());
        let reports = gen.make_resources().unwrap();
        assert_eq!(
            outcomes(&reports),
            vec![
                GenerationOutcome::Created,
                GenerationOutcome::Created,
                GenerationOutcome::SkippedEmpty
            ]
        );
        assert!(dir.path().join("resources/tables/orders/th_orders.py").is_file());
        assert!(dir.path().join("resources/tables/statuses/th_statuses.py").is_file());
        assert!(!dir.path().join("resources/tables/blobs").exists());
        assert!(!dir.path().join("menu.py").exists());
    }

    #[test]
    fn test_tl030_existing_skipped_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let model = model();
        let options = GeneratorOptions {
            tables: vec!["orders".into()],
            ..GeneratorOptions::default()
        };
        let gen = ResourceGenerator::new(&model, "shop", dir.path(), options);
        let path = gen.resource_path("orders");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "# mine").unwrap();

        let reports = gen.make_resources().unwrap();
        assert_eq!(outcomes(&reports), vec![GenerationOutcome::Skipped]);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine");
    }

    #[test]
    fn test_tl030_force_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let model = model();
        let options = GeneratorOptions {
            force: true,
            ..GeneratorOptions::default()
        };
        let gen = ResourceGenerator::new(&model, "shop", dir.path(), options);
        let path = gen.resource_path("orders");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "# mine").unwrap();

        let report = gen.create_resource_file("orders").unwrap();
        assert_eq!(report.outcome, GenerationOutcome::Created);
        assert!(std::fs::read_to_string(&path).unwrap().contains("class View"));
    }

    #[test]
    fn test_tl030_menu() {
        let dir = tempfile::tempdir().unwrap();
        let model = model();
        let options = GeneratorOptions {
            menu: true,
            ..GeneratorOptions::default()
        };
        let gen = ResourceGenerator::new(&model, "shop", dir.path(), options);
        let reports = gen.make_resources().unwrap();
        assert_eq!(reports.last().unwrap().file, dir.path().join("menu.py"));
        let menu = std::fs::read_to_string(dir.path().join("menu.py")).unwrap();
        assert!(menu.contains("shop = root.branch('Online shop')"));
        assert!(menu.contains("shop.thpage('Orders',table='shop.orders')"));
        assert!(menu.contains("shop.thpage('Blobs',table='shop.blobs')"));
        assert_eq!(menu.matches("lookups(").count(), 1);

        // the menu is always rewritten, even without force
        std::fs::write(dir.path().join("menu.py"), "# stale").unwrap();
        assert_eq!(gen.make_menu().unwrap().outcome, GenerationOutcome::Created);
        let menu = std::fs::read_to_string(dir.path().join("menu.py")).unwrap();
        assert!(menu.contains("shop.thpage('Orders',table='shop.orders')"));
    }

    #[test]
    fn test_tl030_menu_refreshed_keeps_custom_tables() {
        let dir = tempfile::tempdir().unwrap();
        let v1 = SchemaModel::from_yaml(
            r#"
packages:
  shop:
    tables:
      orders:
        name_plural: Orders
        columns:
          code: { dtype: A }
"#,
        )
        .unwrap();
        let options = GeneratorOptions {
            menu: true,
            ..GeneratorOptions::default()
        };
        ResourceGenerator::new(&v1, "shop", dir.path(), options.clone())
            .make_resources()
            .unwrap();
        let orders = dir.path().join("resources/tables/orders/th_orders.py");
        std::fs::write(&orders, "# customised").unwrap();

        let v2 = SchemaModel::from_yaml(
            r#"
packages:
  shop:
    tables:
      orders:
        name_plural: Orders
        columns:
          code: { dtype: A }
      items:
        name_plural: Items
        columns:
          sku: { dtype: A }
"#,
        )
        .unwrap();
        let reports = ResourceGenerator::new(&v2, "shop", dir.path(), options)
            .make_resources()
            .unwrap();
        assert_eq!(
            outcomes(&reports),
            vec![
                GenerationOutcome::Skipped,
                GenerationOutcome::Created,
                GenerationOutcome::Created
            ]
        );
        assert_eq!(std::fs::read_to_string(&orders).unwrap(), "# customised");
        let menu = std::fs::read_to_string(dir.path().join("menu.py")).unwrap();
        assert!(menu.contains("shop.thpage('Orders',table='shop.orders')"));
        assert!(menu.contains("shop.thpage('Items',table='shop.items')"));
    }

    #[test]
    fn test_tl030_menu_label_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let model = model();
        let gen = ResourceGenerator::new(&model, "bare", dir.path(), GeneratorOptions::default());
        gen.make_menu().unwrap();
        let menu = std::fs::read_to_string(dir.path().join("menu.py")).unwrap();
        assert!(menu.contains("bare = root.branch('Bare')"));
    }

    #[test]
    fn test_tl030_unknown_package() {
        let dir = tempfile::tempdir().unwrap();
        let model = model();
        let gen = ResourceGenerator::new(&model, "ghost", dir.path(), GeneratorOptions::default());
        let err = gen.make_resources().unwrap_err();
        assert!(matches!(err, Error::UnknownPackage(ref p) if p == "ghost"));
    }

    #[test]
    fn test_tl030_unknown_table_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let model = model();
        let options = GeneratorOptions {
            tables: vec!["orders".into(), "ghost".into()],
            menu: true,
            ..GeneratorOptions::default()
        };
        let gen = ResourceGenerator::new(&model, "shop", dir.path(), options);
        let err = gen.make_resources().unwrap_err();
        assert!(matches!(err, Error::UnknownTable { ref table, .. } if table == "ghost"));
        assert!(!dir.path().join("resources").exists());
        assert!(!dir.path().join("menu.py").exists());
    }

    #[test]
    fn test_tl030_report_json() {
        let report = GenerationReport::new(
            PathBuf::from("/p/menu.py"),
            GenerationOutcome::SkippedEmpty,
        );
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(json, r#"{"file":"/p/menu.py","outcome":"skipped_empty"}"#);
    }
}
