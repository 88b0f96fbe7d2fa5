//! TL-003: Pretty XML rendering of configuration documents.
//!
//! Site and instance configuration files are written in the framework's
//! bag format: a `GenRoBag` root element, one element per node, attributes
//! as XML attributes and scalar values as text. Keys that are not valid
//! element names are sanitized and keep their original spelling in a
//! `_tag` attribute.

use super::tree::{ConfigTree, Node};
use std::borrow::Cow;
use std::fmt::Write;

/// Attribute carrying the original key of a sanitized element.
pub const TAG_ATTRIBUTE: &str = "_tag";

/// Root element expected by the framework's configuration reader.
pub const ROOT_ELEMENT: &str = "GenRoBag";

const INDENT: &str = "    ";

/// Render a tree as a complete XML document.
pub fn to_xml(tree: &ConfigTree) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let root = tree.root();
    if root.children.is_empty() {
        let _ = writeln!(out, "<{}/>", ROOT_ELEMENT);
        return out;
    }
    let _ = writeln!(out, "<{}>", ROOT_ELEMENT);
    for (key, child) in &root.children {
        write_node(&mut out, key, child, 1);
    }
    let _ = writeln!(out, "</{}>", ROOT_ELEMENT);
    out
}

fn write_node(out: &mut String, key: &str, node: &Node, depth: usize) {
    let pad = INDENT.repeat(depth);
    let tag = tag_name(key);
    let mut open = format!("{}<{}", pad, tag);
    if tag != key {
        let _ = write!(open, " {}=\"{}\"", TAG_ATTRIBUTE, escape(key));
    }
    for (name, value) in &node.attrs {
        let _ = write!(open, " {}=\"{}\"", name, escape(value));
    }

    match (&node.value, node.children.is_empty()) {
        (None, true) => {
            let _ = writeln!(out, "{}/>", open);
        }
        (Some(value), true) => {
            let _ = writeln!(out, "{}>{}</{}>", open, escape(value), tag);
        }
        (value, false) => {
            let _ = writeln!(out, "{}>", open);
            if let Some(value) = value {
                let _ = writeln!(out, "{}{}{}", pad, INDENT, escape(value));
            }
            for (child_key, child) in &node.children {
                write_node(out, child_key, child, depth + 1);
            }
            let _ = writeln!(out, "{}</{}>", pad, tag);
        }
    }
}

/// Element name for a node key: characters outside `[A-Za-z0-9_.-]` (and
/// non-ASCII letters) become `_`, and a leading digit, `.` or `-` gets a `_`
/// prefix.
pub fn tag_name(key: &str) -> Cow<'_, str> {
    let valid_first = key
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');
    let valid_rest = key
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid_first && valid_rest {
        return Cow::Borrowed(key);
    }
    let mut tag: String = key
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if !tag.starts_with(|c: char| c.is_alphabetic() || c == '_') {
        tag.insert(0, '_');
    }
    Cow::Owned(tag)
}

/// Escape text for use in element content or double-quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
