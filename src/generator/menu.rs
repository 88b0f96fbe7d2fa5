//! TL-034: Package menu module (`menu.py`).

use super::writer::{identifier, PyWriter};
use crate::core::template::{capitalize, py_quote};
use crate::schema::TableMeta;

/// Menu label of a table: plural, else long, else capitalized name.
pub fn table_label(table: &TableMeta) -> String {
    table
        .display_plural()
        .map(str::to_string)
        .unwrap_or_else(|| capitalize(&table.name))
}

/// Render `menu.py`: one branch for the package, one page per regular
/// table and a single aggregated entry for all lookup tables.
pub fn render(package: &str, package_label: &str, tables: &[&TableMeta], indent: usize) -> String {
    let var = identifier(package);
    let mut w = PyWriter::new(indent);
    w.headers();
    w.line(0, "def config(root,application=None):");
    w.line(1, format!("{} = root.branch('{}')", var, py_quote(package_label)));

    let mut has_lookups = false;
    for table in tables {
        if table.lookup {
            has_lookups = true;
            continue;
        }
        w.line(
            1,
            format!(
                "{}.thpage('{}',table='{}.{}')",
                var,
                py_quote(&table_label(table)),
                py_quote(package),
                py_quote(&table.name)
            ),
        );
    }
    if has_lookups {
        w.line(
            1,
            format!(
                "{}.lookups('Lookup tables',lookup_manager='{}')",
                var,
                py_quote(package)
            ),
        );
    }
    w.finish()
}
