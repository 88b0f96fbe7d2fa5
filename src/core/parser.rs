//! TL-005: Environment file parsing.
//!
//! The environment file is YAML. Every mapping becomes a node: mapping- or
//! null-valued keys are children, scalar-valued keys are attributes, and
//! sequences of scalars are comma-joined attributes.
//!
//! ```yaml
//! packages:
//!   core: { path: ~/trellis/packages }
//! projects:
//!   main: { path: $WORK/projects }
//! ```

use super::error::{Error, Result};
use super::tree::{ConfigTree, Node};
use serde_yaml_ng::Value;
use std::path::Path;

/// Parse an environment file from disk.
pub fn parse_environment_file(path: &Path) -> Result<ConfigTree> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_environment(&content).map_err(|e| Error::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Parse an environment document from a string. An empty document is an
/// empty tree.
pub fn parse_environment(yaml: &str) -> Result<ConfigTree> {
    let value: Value = serde_yaml_ng::from_str(yaml)?;
    match value {
        Value::Null => Ok(ConfigTree::new()),
        Value::Mapping(_) => Ok(ConfigTree::from_root(value_to_node("", &value)?)),
        _ => Err(Error::Parse {
            path: "<inline>".into(),
            message: "environment root must be a mapping".to_string(),
        }),
    }
}

fn value_to_node(key: &str, value: &Value) -> Result<Node> {
    let mut node = Node::default();
    let mapping = match value {
        Value::Null => return Ok(node),
        Value::Mapping(m) => m,
        Value::Tagged(tagged) => return value_to_node(key, &tagged.value),
        _ => {
            return Err(Error::Parse {
                path: "<inline>".into(),
                message: format!("'{}' must be a mapping", key),
            })
        }
    };

    for (k, v) in mapping {
        let name = yaml_value_to_string(k);
        match v {
            Value::Null | Value::Mapping(_) => {
                node.children.insert(name.clone(), value_to_node(&name, v)?);
            }
            Value::Tagged(tagged) if matches!(tagged.value, Value::Mapping(_)) => {
                node.children.insert(name.clone(), value_to_node(&name, v)?);
            }
            Value::Sequence(items) => {
                let mut parts = Vec::with_capacity(items.len());
                for item in items {
                    if matches!(item, Value::Mapping(_) | Value::Sequence(_)) {
                        return Err(Error::Parse {
                            path: "<inline>".into(),
                            message: format!("'{}.{}' must be a list of scalars", key, name),
                        });
                    }
                    parts.push(yaml_value_to_string(item));
                }
                node.attrs.insert(name, parts.join(","));
            }
            scalar => {
                node.attrs.insert(name, yaml_value_to_string(scalar));
            }
        }
    }
    Ok(node)
}

/// Convert a serde_yaml_ng::Value scalar to a string.
pub fn yaml_value_to_string(val: &Value) -> String {
    match val {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Tagged(tagged) => yaml_value_to_string(&tagged.value),
        other => format!("{:?}", other),
    }
}
