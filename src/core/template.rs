//! TL-004: `{{key}}` placeholder rendering for boilerplate files.

use super::error::{Error, Result};
use indexmap::IndexMap;

/// Template variables.
pub type Vars = IndexMap<&'static str, String>;

/// Substitute every `{{key}}` in `template` with its value from `vars`.
///
/// Substituted text is not rescanned, so values may safely contain braces.
pub fn render(template: &str, vars: &Vars) -> Result<String> {
    let mut result = template.to_string();
    let mut start = 0;

    while let Some(open) = result[start..].find("{{") {
        let open = start + open;
        let close = result[open..]
            .find("}}")
            .ok_or_else(|| Error::Template(format!("unclosed template at position {}", open)))?;
        let close = open + close + 2;
        let key = result[open + 2..close - 2].trim();

        let value = vars
            .get(key)
            .ok_or_else(|| Error::Template(format!("unknown template variable: {}", key)))?
            .clone();

        result.replace_range(open..close, &value);
        start = open + value.len();
    }

    Ok(result)
}

/// First character upper-cased, the rest lower-cased.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Escape text for a single-quoted Python string literal.
pub fn py_quote(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('\'', "\\'")
}
