//! TL-002: Hierarchical configuration tree.
//!
//! Ordered nodes carrying an optional value, an attribute bag and children,
//! addressed by dotted paths (`projects.main`). Used both as the query
//! surface over the environment file and as the in-memory form of the
//! configuration documents written by scaffolders.

use indexmap::IndexMap;

/// Ordered attribute bag.
pub type Attributes = IndexMap<String, String>;

/// One node of a [`ConfigTree`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    pub value: Option<String>,
    pub attrs: Attributes,
    pub children: IndexMap<String, Node>,
}

impl Node {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }
}

/// One `(key, attributes)` pair returned by [`ConfigTree::digest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigestEntry<'a> {
    pub key: &'a str,
    pub attrs: &'a Attributes,
}

/// Root of a configuration tree. The root node itself has no key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigTree {
    root: Node,
}

impl ConfigTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_root(root: Node) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    /// Look up a node by dotted path. An empty path is the root.
    pub fn get(&self, path: &str) -> Option<&Node> {
        split_path(path).try_fold(&self.root, |node, key| node.children.get(key))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Attribute `name` of the node at `path`.
    pub fn attr(&self, path: &str, name: &str) -> Option<&str> {
        self.get(path).and_then(|node| node.attr(name))
    }

    pub fn value(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|node| node.value.as_deref())
    }

    /// Children of the node matched by `pattern`, in declaration order.
    ///
    /// The last segment of `pattern` may be `*` (same as omitting it) or a
    /// glob-like `prefix*` filter on child keys. Missing nodes digest to an
    /// empty sequence.
    pub fn digest(&self, pattern: &str) -> Vec<DigestEntry<'_>> {
        let (parent, filter) = match pattern.rsplit_once('.') {
            Some((parent, last)) if last.ends_with('*') => (parent, Some(last)),
            _ if pattern == "*" => ("", None),
            _ if pattern.ends_with('*') && !pattern.contains('.') => ("", Some(pattern)),
            _ => (pattern, None),
        };
        let prefix = filter.map(|f| f.trim_end_matches('*'));
        self.get(parent)
            .map(|node| {
                node.children
                    .iter()
                    .filter(|(key, _)| prefix.is_none_or(|p| key.starts_with(p)))
                    .map(|(key, child)| DigestEntry {
                        key,
                        attrs: &child.attrs,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every present `attr` value among the children matched by `pattern`.
    pub fn digest_attr(&self, pattern: &str, attr: &str) -> Vec<&str> {
        self.digest(pattern)
            .into_iter()
            .filter_map(|entry| entry.attrs.get(attr).map(String::as_str))
            .collect()
    }

    /// Create or update the node at `path`, creating intermediate nodes.
    /// Attributes are merged; a `None` value leaves the current value.
    pub fn set_item<I, K, V>(&mut self, path: &str, value: Option<&str>, attrs: I) -> &mut Node
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let node = split_path(path).fold(&mut self.root, |node, key| {
            node.children.entry(key.to_string()).or_default()
        });
        if let Some(v) = value {
            node.value = Some(v.to_string());
        }
        for (k, v) in attrs {
            node.attrs.insert(k.into(), v.into());
        }
        node
    }

    /// Ensure an empty node exists at `path`.
    pub fn touch(&mut self, path: &str) -> &mut Node {
        self.set_item(path, None, std::iter::empty::<(String, String)>())
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('.').filter(|segment| !segment.is_empty())
}
