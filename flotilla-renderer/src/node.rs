//! Document Model: an annotated YAML node tree.
//!
//! Nodes are built explicitly by the workflow builder and handed to the
//! [`Renderer`](crate::Renderer) unchanged. Mapping entries keep insertion
//! order; that order is the output order.

use serde_yaml::{Mapping, Value};

/// How a scalar (or a mapping key) is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalarStyle {
    /// Plain when the text is unambiguous, double-quoted otherwise.
    #[default]
    Auto,
    /// Always `"..."`, even when plain would parse identically.
    DoubleQuoted,
}

/// Node variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Scalar(String),
    Sequence(Vec<Node>),
    Mapping(Vec<Entry>),
}

/// One `key: value` pair of a mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub key_style: ScalarStyle,
    pub value: Node,
}

/// A document node with optional comment and style annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    /// Rendered on its own line immediately above the node.
    pub leading_comment: Option<String>,
    /// Rendered after the node's block.
    pub trailing_comment: Option<String>,
    /// Only meaningful for scalars.
    pub style: ScalarStyle,
}

impl Node {
    fn with_kind(kind: NodeKind) -> Self {
        Self {
            kind,
            leading_comment: None,
            trailing_comment: None,
            style: ScalarStyle::Auto,
        }
    }

    pub fn scalar(value: impl Into<String>) -> Self {
        Self::with_kind(NodeKind::Scalar(value.into()))
    }

    /// Scalar rendered as `"..."`.
    pub fn quoted(value: impl Into<String>) -> Self {
        Self::scalar(value).styled(ScalarStyle::DoubleQuoted)
    }

    pub fn sequence(items: impl IntoIterator<Item = Node>) -> Self {
        Self::with_kind(NodeKind::Sequence(items.into_iter().collect()))
    }

    pub fn mapping() -> Self {
        Self::with_kind(NodeKind::Mapping(Vec::new()))
    }

    /// Append an entry. Builder-style; no effect on non-mapping nodes.
    pub fn entry(mut self, key: impl Into<String>, value: Node) -> Self {
        if let NodeKind::Mapping(entries) = &mut self.kind {
            entries.push(Entry {
                key: key.into(),
                key_style: ScalarStyle::Auto,
                value,
            });
        }
        self
    }

    pub fn styled(mut self, style: ScalarStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_leading_comment(mut self, comment: impl Into<String>) -> Self {
        self.leading_comment = Some(comment.into());
        self
    }

    pub fn with_trailing_comment(mut self, comment: impl Into<String>) -> Self {
        self.trailing_comment = Some(comment.into());
        self
    }

    /// Look up a mapping value by key.
    pub fn get(&self, key: &str) -> Option<&Node> {
        match &self.kind {
            NodeKind::Mapping(entries) => entries.iter().find(|e| e.key == key).map(|e| &e.value),
            _ => None,
        }
    }

    /// Plain-data projection, dropping comments and styles.
    ///
    /// Every scalar becomes a string: the model has no other scalar type.
    pub fn to_value(&self) -> Value {
        match &self.kind {
            NodeKind::Scalar(s) => Value::String(s.clone()),
            NodeKind::Sequence(items) => {
                Value::Sequence(items.iter().map(Node::to_value).collect())
            }
            NodeKind::Mapping(entries) => {
                let mut map = Mapping::new();
                for e in entries {
                    map.insert(Value::String(e.key.clone()), e.value.to_value());
                }
                Value::Mapping(map)
            }
        }
    }
}
