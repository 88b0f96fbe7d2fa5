//! TL-031: Column selection and sizing for generated views and forms.

use crate::schema::{ColumnMeta, DataType, TableMeta};
use serde::Serialize;

/// Minimum width (em) of a varchar cell, also used when no size is known.
pub const MIN_VARCHAR_WIDTH: u32 = 35;

/// Width (em) of every non-varchar cell.
pub const FIXED_WIDTH: u32 = 7;

/// A generated column and its cell width in em.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
    pub name: String,
    pub width: u32,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, width: u32) -> Self {
        Self {
            name: name.into(),
            width,
        }
    }
}

/// Columns that get a cell, in declaration order. System fields and
/// bag/blob columns are dropped.
pub fn column_specs(table: &TableMeta) -> Vec<ColumnSpec> {
    table
        .columns
        .values()
        .filter(|col| !col.sysfield && !col.dtype().is_excluded())
        .map(|col| ColumnSpec::new(col.name.clone(), column_width(col)))
        .collect()
}

/// Cell width of one column.
pub fn column_width(column: &ColumnMeta) -> u32 {
    if column.dtype() != DataType::Varchar {
        return FIXED_WIDTH;
    }
    column
        .size
        .as_deref()
        .and_then(size_upper_bound)
        .map_or(MIN_VARCHAR_WIDTH, |size| size.max(MIN_VARCHAR_WIDTH))
}

/// `"n"` gives n, `"lo:hi"` gives hi.
fn size_upper_bound(size: &str) -> Option<u32> {
    let upper = match size.split_once(':') {
        Some((_, hi)) => hi,
        None => size,
    };
    upper.trim().parse().ok()
}

/// Column used by the default quick search.
///
/// The caption field when set, else the first non-system textual column,
/// else the first generated column.
pub fn search_column<'a>(table: &'a TableMeta, specs: &'a [ColumnSpec]) -> Option<&'a str> {
    if let Some(caption) = table.caption_field.as_deref().filter(|c| !c.is_empty()) {
        return Some(caption);
    }
    table
        .columns
        .values()
        .find(|col| !col.sysfield && col.dtype().is_textual())
        .map(|col| col.name.as_str())
        .or_else(|| specs.first().map(|spec| spec.name.as_str()))
}
