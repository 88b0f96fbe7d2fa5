//! TL-020: Read-only schema introspection.
//!
//! The running application exports its database model as YAML; the
//! generator only ever reads it through [`Introspector`].
//!
//! ```yaml
//! packages:
//!   shop:
//!     name_long: Online shop
//!     tables:
//!       order:
//!         name_plural: Orders
//!         caption_field: code
//!         columns:
//!           id: { dtype: A, size: 22, _sysfield: true }
//!           code: { dtype: A, size: "0:12" }
//!         relations:
//!           "@lines":
//!             related_table: shop.order_line
//!             joiner: { mode: M, on_delete: cascade }
//! ```

use crate::core::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;

/// Read access to package and table metadata.
pub trait Introspector {
    fn package(&self, name: &str) -> Option<&PackageMeta>;

    fn table(&self, package: &str, table: &str) -> Option<&TableMeta> {
        self.package(package).and_then(|pkg| pkg.tables.get(table))
    }

    /// Look up `<package>.<table>`.
    fn table_by_fullname(&self, fullname: &str) -> Option<&TableMeta> {
        let (package, table) = fullname.split_once('.')?;
        self.table(package, table)
    }
}

// ============================================================================
// Model
// ============================================================================

/// Schema description deserialized from YAML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaModel {
    #[serde(default)]
    pub packages: IndexMap<String, PackageMeta>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageMeta {
    #[serde(default)]
    pub name_long: Option<String>,

    /// Tables in declaration order
    #[serde(default)]
    pub tables: IndexMap<String, TableMeta>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableMeta {
    /// Filled from the mapping key when loading
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub name_long: Option<String>,

    #[serde(default)]
    pub name_plural: Option<String>,

    /// Column shown when the record is referenced
    #[serde(default)]
    pub caption_field: Option<String>,

    #[serde(default)]
    pub lookup: bool,

    #[serde(default)]
    pub columns: IndexMap<String, ColumnMeta>,

    #[serde(default)]
    pub relations: IndexMap<String, RelationMeta>,
}

impl TableMeta {
    /// Plural name, else long name.
    pub fn display_plural(&self) -> Option<&str> {
        non_empty(&self.name_plural).or_else(|| non_empty(&self.name_long))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnMeta {
    #[serde(default)]
    pub name: String,

    /// Falls back to `A` when a size is given, else `T`
    #[serde(default)]
    pub dtype: Option<DataType>,

    /// `"n"` or `"lo:hi"`
    #[serde(default, deserialize_with = "deserialize_size")]
    pub size: Option<String>,

    /// Framework-managed column (id, timestamps, ...)
    #[serde(default, rename = "_sysfield", alias = "sysfield")]
    pub sysfield: bool,
}

impl ColumnMeta {
    pub fn dtype(&self) -> DataType {
        match (&self.dtype, &self.size) {
            (Some(dtype), _) => dtype.clone(),
            (None, Some(_)) => DataType::Varchar,
            (None, None) => DataType::Text,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelationMeta {
    /// `<package>.<table>` on the other side
    #[serde(default)]
    pub related_table: Option<String>,

    #[serde(default)]
    pub joiner: Option<Joiner>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Joiner {
    /// `O` one, `M` many
    pub mode: String,

    #[serde(default, alias = "onDelete")]
    pub on_delete: Option<String>,
}

impl Joiner {
    /// Many-side relation whose rows die with the parent.
    pub fn is_cascade_many(&self) -> bool {
        self.mode == "M" && self.on_delete.as_deref() == Some("cascade")
    }
}

/// Column data type codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    #[serde(rename = "A")]
    Varchar,
    #[serde(rename = "T")]
    Text,
    #[serde(rename = "C")]
    Char,
    #[serde(rename = "I")]
    Integer,
    #[serde(rename = "L")]
    Long,
    #[serde(rename = "R")]
    Real,
    #[serde(rename = "N")]
    Numeric,
    #[serde(rename = "B")]
    Boolean,
    #[serde(rename = "D")]
    Date,
    #[serde(rename = "DH")]
    DateTime,
    #[serde(rename = "H")]
    Time,
    /// Bag/XML payload
    #[serde(rename = "X")]
    Bag,
    /// Binary blob
    #[serde(rename = "O")]
    Blob,
    #[serde(other)]
    Other,
}

impl DataType {
    /// Types that never get a view or form cell.
    pub fn is_excluded(&self) -> bool {
        matches!(self, Self::Bag | Self::Blob)
    }

    /// Types eligible as default search column.
    pub fn is_textual(&self) -> bool {
        matches!(self, Self::Varchar | Self::Text | Self::Char)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Self::Varchar => "A",
            Self::Text => "T",
            Self::Char => "C",
            Self::Integer => "I",
            Self::Long => "L",
            Self::Real => "R",
            Self::Numeric => "N",
            Self::Boolean => "B",
            Self::Date => "D",
            Self::DateTime => "DH",
            Self::Time => "H",
            Self::Bag => "X",
            Self::Blob => "O",
            Self::Other => "?",
        };
        write!(f, "{}", code)
    }
}

/// Sizes arrive either as YAML numbers or as `"lo:hi"` strings.
fn deserialize_size<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Size {
        Number(u64),
        Text(String),
    }
    Ok(Option::<Size>::deserialize(deserializer)?.map(|size| match size {
        Size::Number(n) => n.to_string(),
        Size::Text(s) => s,
    }))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

// ============================================================================
// Loading
// ============================================================================

impl SchemaModel {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let mut model: SchemaModel = serde_yaml_ng::from_str(yaml)?;
        model.fill_names();
        Ok(model)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_yaml(&content).map_err(|e| Error::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn fill_names(&mut self) {
        for pkg in self.packages.values_mut() {
            for (key, table_meta) in pkg.tables.iter_mut() {
                if table_meta.name.is_empty() {
                    table_meta.name = key.clone();
                }
                for (col_key, column) in table_meta.columns.iter_mut() {
                    if column.name.is_empty() {
                        column.name = col_key.clone();
                    }
                }
            }
        }
    }
}

impl Introspector for SchemaModel {
    fn package(&self, name: &str) -> Option<&PackageMeta> {
        self.packages.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"
packages:
  shop:
    name_long: Online shop
    tables:
      order:
        name_plural: Orders
        caption_field: code
        columns:
          id: { dtype: A, size: 22, _sysfield: true }
          code: { dtype: A, size: "0:12" }
          notes: {}
          sized: { size: 10 }
          payload: { dtype: X }
          kind: { dtype: ZZ }
        relations:
          "@lines":
            related_table: shop.order_line
            joiner: { mode: M, onDelete: cascade }
          "@customer_id":
            joiner: { mode: O }
      order_line:
        name_long: Order line
"#;

    #[test]
    fn test_tl020_load_and_names() {
        let model = SchemaModel::from_yaml(SCHEMA).unwrap();
        let order = model.table("shop", "order").unwrap();
        assert_eq!(order.name, "order");
        assert_eq!(order.columns["code"].name, "code");
        let keys: Vec<_> = order.columns.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "code", "notes", "sized", "payload", "kind"]);
        assert_eq!(model.package("shop").unwrap().name_long.as_deref(), Some("Online shop"));
    }

    #[test]
    fn test_tl020_column_fields() {
        let model = SchemaModel::from_yaml(SCHEMA).unwrap();
        let cols = &model.table("shop", "order").unwrap().columns;
        assert!(cols["id"].sysfield);
        assert_eq!(cols["id"].size.as_deref(), Some("22"));
        assert_eq!(cols["code"].size.as_deref(), Some("0:12"));
        assert_eq!(cols["notes"].dtype(), DataType::Text);
        assert_eq!(cols["sized"].dtype(), DataType::Varchar);
        assert!(cols["payload"].dtype().is_excluded());
        assert_eq!(cols["kind"].dtype(), DataType::Other);
    }

    #[test]
    fn test_tl020_relations() {
        let model = SchemaModel::from_yaml(SCHEMA).unwrap();
        let rels = &model.table("shop", "order").unwrap().relations;
        assert!(rels["@lines"].joiner.as_ref().unwrap().is_cascade_many());
        assert!(!rels["@customer_id"].joiner.as_ref().unwrap().is_cascade_many());
    }

    #[test]
    fn test_tl020_lookup_by_fullname() {
        let model = SchemaModel::from_yaml(SCHEMA).unwrap();
        let line = model.table_by_fullname("shop.order_line").unwrap();
        assert_eq!(line.display_plural(), Some("Order line"));
        assert!(model.table_by_fullname("shop").is_none());
        assert!(model.table_by_fullname("other.order").is_none());
    }

    #[test]
    fn test_tl020_display_plural_prefers_plural() {
        let model = SchemaModel::from_yaml(SCHEMA).unwrap();
        assert_eq!(
            model.table("shop", "order").unwrap().display_plural(),
            Some("Orders")
        );
    }

    #[test]
    fn test_tl020_from_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.yaml");
        std::fs::write(&path, "packages: [not, a, map]\n").unwrap();
        let err = SchemaModel::from_file(&path).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
        let missing = SchemaModel::from_file(&dir.path().join("none.yaml")).unwrap_err();
        assert!(matches!(missing, Error::Io { .. }));
    }

    #[test]
    fn test_tl020_empty_document() {
        let model = SchemaModel::from_yaml("{}").unwrap();
        assert!(model.packages.is_empty());
    }
}
