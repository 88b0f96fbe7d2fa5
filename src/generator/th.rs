//! TL-033: Table handler resource module (`th_<table>.py`).
//!
//! One `View` class (list columns, default order, quick search) and one
//! `Form` class whose layout depends on how many cascade-many relations
//! hang off the table.

use super::columns::{search_column, ColumnSpec};
use super::writer::{identifier, PyWriter};
use crate::core::template::py_quote;
use crate::schema::{Introspector, TableMeta};
use std::collections::HashSet;

/// Form shape chosen from the table's child relations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormLayout {
    /// Plain formbuilder on the record.
    Flat,
    /// Record on top, one inline table handler below.
    Single(String),
    /// Record on top, one tab per child relation.
    Tabbed(Vec<String>),
}

impl FormLayout {
    pub fn for_table(table: &TableMeta) -> Self {
        let mut children = child_relations(table);
        match children.len() {
            0 => Self::Flat,
            1 => Self::Single(children.remove(0)),
            _ => Self::Tabbed(children),
        }
    }
}

/// Relations whose joiner is many-side with cascading delete.
pub fn child_relations(table: &TableMeta) -> Vec<String> {
    table
        .relations
        .iter()
        .filter(|(_, rel)| rel.joiner.as_ref().is_some_and(|j| j.is_cascade_many()))
        .map(|(name, _)| name.clone())
        .collect()
}

/// Render parameters shared by every table.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub columns: usize,
    pub guess_size: bool,
    pub indent: usize,
}

/// Full `th_<table>.py` source. `specs` must not be empty.
pub fn render(
    schema: &dyn Introspector,
    table: &TableMeta,
    specs: &[ColumnSpec],
    opts: RenderOptions,
) -> String {
    let mut w = PyWriter::new(opts.indent);
    w.headers();
    w.line(0, "from gnr.web.gnrbaseclasses import BaseComponent");
    w.line(0, "from gnr.core.gnrdecorator import public_method");
    w.blank();
    write_view(&mut w, table, specs, opts);
    write_form(&mut w, schema, table, specs, opts);
    w.finish()
}

fn write_view(w: &mut PyWriter, table: &TableMeta, specs: &[ColumnSpec], opts: RenderOptions) {
    w.line(0, "class View(BaseComponent):");
    w.blank();
    w.line(1, "def th_struct(self,struct):");
    w.line(2, "r = struct.view().rows()");
    for spec in specs {
        if opts.guess_size {
            w.line(
                2,
                format!("r.fieldcell('{}', width='{}em')", py_quote(&spec.name), spec.width),
            );
        } else {
            w.line(2, format!("r.fieldcell('{}')", py_quote(&spec.name)));
        }
    }
    w.blank();
    w.line(1, "def th_order(self):");
    let order = specs.first().map_or("", |s| s.name.as_str());
    w.line(2, format!("return '{}'", py_quote(order)));
    w.blank();
    w.line(1, "def th_query(self):");
    let search = search_column(table, specs).unwrap_or_default();
    w.line(
        2,
        format!("return dict(column='{}', op='contains', val='')", py_quote(search)),
    );
    w.blank();
    w.blank();
    w.blank();
}

fn write_fields(w: &mut PyWriter, specs: &[ColumnSpec]) {
    for spec in specs {
        w.line(2, format!("fb.field('{}')", py_quote(&spec.name)));
    }
}

fn write_form(
    w: &mut PyWriter,
    schema: &dyn Introspector,
    table: &TableMeta,
    specs: &[ColumnSpec],
    opts: RenderOptions,
) {
    w.line(0, "class Form(BaseComponent):");
    w.blank();
    w.line(1, "def th_form(self, form):");
    match FormLayout::for_table(table) {
        FormLayout::Flat => {
            w.line(2, "pane = form.record");
            w.line(
                2,
                format!("fb = pane.formbuilder(cols={}, border_spacing='4px')", opts.columns),
            );
            write_fields(w, specs);
        }
        layout => {
            w.line(2, "bc = form.center.borderContainer()");
            w.line(2, "top = bc.contentPane(region='top',datapath='.record')");
            w.line(
                2,
                format!("fb = top.formbuilder(cols={}, border_spacing='4px')", opts.columns),
            );
            write_fields(w, specs);
            match layout {
                FormLayout::Single(relation) => {
                    w.line(2, "center = bc.contentPane(region='center')");
                    w.line(
                        2,
                        format!("center.plainTableHandler(relation='{}')", py_quote(&relation)),
                    );
                }
                FormLayout::Tabbed(relations) => {
                    w.line(2, "tc = bc.tabContainer(region='center',margin='2px')");
                    for (relation, var) in relations.iter().zip(tab_variables(&relations)) {
                        let title = tab_title(schema, table, relation);
                        w.line(
                            2,
                            format!("{} = tc.contentPane(title='{}')", var, py_quote(&title)),
                        );
                        w.line(
                            2,
                            format!("{}.dialogTableHandler(relation='{}')", var, py_quote(relation)),
                        );
                    }
                }
                FormLayout::Flat => {}
            }
        }
    }
    w.blank();
    w.blank();
    w.line(1, "def th_options(self):");
    w.line(2, "return dict(dialog_height='400px', dialog_width='600px')");
}

/// One distinct `tab_<relation>` variable per relation; a name already
/// taken gets a `_2`, `_3`, ... suffix.
pub fn tab_variables(relations: &[String]) -> Vec<String> {
    let mut taken = HashSet::new();
    relations
        .iter()
        .map(|relation| {
            let base = format!("tab_{}", identifier(relation));
            let mut var = base.clone();
            let mut n = 2;
            while !taken.insert(var.clone()) {
                var = format!("{}_{}", base, n);
                n += 1;
            }
            var
        })
        .collect()
}

/// Related table's plural or long name, else the bare relation name.
pub fn tab_title(schema: &dyn Introspector, table: &TableMeta, relation: &str) -> String {
    table
        .relations
        .get(relation)
        .and_then(|rel| rel.related_table.as_deref())
        .and_then(|full| schema.table_by_fullname(full))
        .and_then(TableMeta::display_plural)
        .map(str::to_string)
        .unwrap_or_else(|| relation.trim_start_matches('@').to_string())
}
