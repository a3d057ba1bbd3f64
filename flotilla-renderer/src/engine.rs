//! Block-style YAML emitter for the Document Model: [`Renderer`].
//!
//! # Layout rules
//!
//! | Construct            | Output                                              |
//! |----------------------|-----------------------------------------------------|
//! | mapping entry        | `key: scalar`, or `key:` then children at +2        |
//! | sequence item        | `- scalar`, or `- first: entry` then rest at +2     |
//! | empty collection     | `key: {}` / `key: []`                               |
//! | leading comment      | `# text` above the node, set off by a blank line    |
//! | trailing comment     | deferred; blank line, then `# text` at the next line's column |
//!
//! A trailing comment on the last node of the document is flushed at column 0.
//!
//! Scalars and keys are plain when unambiguous under the YAML 1.2 core schema
//! and double-quoted otherwise. Keys listed with [`Renderer::quote_key`] are
//! always double-quoted at the document root.
//!
//! Comment placement is what [`fixup`](crate::fixup) repairs; [`Renderer::render`]
//! runs the full serialize → fix → verify pipeline.

use std::collections::HashSet;

use flotilla_core::WorkflowSettings;

use crate::error::RenderError;
use crate::fixup::fix_misplaced_comments;
use crate::node::{Entry, Node, NodeKind, ScalarStyle};

/// Document-start marker prefixed to every rendered document.
pub const DOCUMENT_START: &str = "---\n";

const INDENT: usize = 2;

/// Words the YAML 1.2 core schema (or common loaders) read as non-strings.
const RESERVED_WORDS: &[&str] = &["true", "false", "null", "inf", "nan", "infinity"];

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Serializes a [`Node`] tree, applying root key style overrides.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    quoted_keys: Vec<String>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renderer configured with the workflow's quoted root keys.
    pub fn from_settings(settings: &WorkflowSettings) -> Self {
        settings
            .quoted_keys
            .iter()
            .fold(Self::new(), |r, key| r.quote_key(key.clone()))
    }

    /// Force `key` to render double-quoted when it appears at the root.
    pub fn quote_key(mut self, key: impl Into<String>) -> Self {
        self.quoted_keys.push(key.into());
        self
    }

    /// Raw serialization: no document marker, no fixups.
    pub fn serialize(&self, root: &Node) -> Result<String, RenderError> {
        let mut emitter = Emitter::new(&self.quoted_keys);
        emitter.emit_root(root)?;
        Ok(emitter.finish())
    }

    /// Rendered Output: marker + fixed serialization, verified to parse back
    /// to the tree's data.
    pub fn render(&self, root: &Node) -> Result<String, RenderError> {
        let raw = self.serialize(root)?;
        let rendered = format!("{DOCUMENT_START}{}", fix_misplaced_comments(&raw));
        verify_shape(&rendered, root)?;
        Ok(rendered)
    }
}

fn verify_shape(rendered: &str, root: &Node) -> Result<(), RenderError> {
    let parsed: serde_yaml::Value = serde_yaml::from_str(rendered)?;
    if parsed != root.to_value() {
        return Err(RenderError::ShapeMismatch);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

struct Emitter<'a> {
    lines: Vec<String>,
    deferred: Vec<String>,
    quoted_keys: &'a [String],
}

impl<'a> Emitter<'a> {
    fn new(quoted_keys: &'a [String]) -> Self {
        Self {
            lines: Vec::new(),
            deferred: Vec::new(),
            quoted_keys,
        }
    }

    fn finish(mut self) -> String {
        self.flush_deferred(0);
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }

    fn line(&mut self, col: usize, text: &str) {
        self.flush_deferred(col);
        self.lines.push(format!("{:col$}{text}", ""));
    }

    fn flush_deferred(&mut self, col: usize) {
        for comment in std::mem::take(&mut self.deferred) {
            self.lines.push(String::new());
            self.comment_lines(col, &comment);
        }
    }

    fn leading_comment(&mut self, col: usize, comment: &str) {
        self.flush_deferred(col);
        if self.lines.last().is_some_and(|l| !l.is_empty()) {
            self.lines.push(String::new());
        }
        self.comment_lines(col, comment);
    }

    fn comment_lines(&mut self, col: usize, comment: &str) {
        for text in comment.lines() {
            self.lines.push(format!("{:col$}# {text}", ""));
        }
    }

    fn emit_root(&mut self, node: &Node) -> Result<(), RenderError> {
        if let Some(c) = &node.leading_comment {
            self.leading_comment(0, c);
        }
        match &node.kind {
            NodeKind::Scalar(s) => self.line(0, &scalar_text(s, node.style)),
            NodeKind::Sequence(items) if items.is_empty() => self.line(0, "[]"),
            NodeKind::Mapping(entries) if entries.is_empty() => self.line(0, "{}"),
            NodeKind::Sequence(items) => self.emit_items(items, 0, "$")?,
            NodeKind::Mapping(entries) => self.emit_entries(entries, 0, "", "$", true)?,
        }
        if let Some(c) = &node.trailing_comment {
            self.deferred.push(c.clone());
        }
        Ok(())
    }

    /// Entries of a mapping whose keys sit at column `indent`. The first
    /// entry's line is written with `first_prefix` in front of the key
    /// (`"- "` for a mapping that opens a sequence item).
    fn emit_entries(
        &mut self,
        entries: &[Entry],
        indent: usize,
        first_prefix: &str,
        path: &str,
        root: bool,
    ) -> Result<(), RenderError> {
        let mut seen = HashSet::new();
        for (i, entry) in entries.iter().enumerate() {
            if !seen.insert(entry.key.as_str()) {
                return Err(RenderError::DuplicateKey {
                    key: entry.key.clone(),
                    path: path.to_string(),
                });
            }
            let prefix = if i == 0 { first_prefix } else { "" };
            self.emit_entry(entry, indent, prefix, path, root)?;
        }
        Ok(())
    }

    fn emit_entry(
        &mut self,
        entry: &Entry,
        indent: usize,
        prefix: &str,
        path: &str,
        root: bool,
    ) -> Result<(), RenderError> {
        let key = self.key_text(entry, path, root)?;
        let child_path = format!("{path}.{}", entry.key);
        let value = &entry.value;
        let col = indent - prefix.len();

        if let Some(c) = &value.leading_comment {
            self.leading_comment(indent, c);
        }

        let head = format!("{prefix}{key}:");
        match &value.kind {
            NodeKind::Scalar(s) => {
                self.line(col, &format!("{head} {}", scalar_text(s, value.style)))
            }
            NodeKind::Sequence(items) if items.is_empty() => self.line(col, &format!("{head} []")),
            NodeKind::Mapping(entries) if entries.is_empty() => {
                self.line(col, &format!("{head} {{}}"))
            }
            NodeKind::Sequence(items) => {
                self.line(col, &head);
                self.emit_items(items, indent + INDENT, &child_path)?;
            }
            NodeKind::Mapping(entries) => {
                self.line(col, &head);
                self.emit_entries(entries, indent + INDENT, "", &child_path, false)?;
            }
        }

        if let Some(c) = &value.trailing_comment {
            self.deferred.push(c.clone());
        }
        Ok(())
    }

    /// Items of a sequence whose dashes sit at column `indent`.
    fn emit_items(&mut self, items: &[Node], indent: usize, path: &str) -> Result<(), RenderError> {
        for (i, item) in items.iter().enumerate() {
            let item_path = format!("{path}[{i}]");
            if let Some(c) = &item.leading_comment {
                self.leading_comment(indent, c);
            }
            match &item.kind {
                NodeKind::Scalar(s) => {
                    self.line(indent, &format!("- {}", scalar_text(s, item.style)))
                }
                NodeKind::Sequence(inner) if inner.is_empty() => self.line(indent, "- []"),
                NodeKind::Mapping(entries) if entries.is_empty() => self.line(indent, "- {}"),
                NodeKind::Mapping(entries) => {
                    self.emit_entries(entries, indent + INDENT, "- ", &item_path, false)?;
                }
                NodeKind::Sequence(inner) => {
                    self.line(indent, "-");
                    self.emit_items(inner, indent + INDENT, &item_path)?;
                }
            }
            if let Some(c) = &item.trailing_comment {
                self.deferred.push(c.clone());
            }
        }
        Ok(())
    }

    fn key_text(&self, entry: &Entry, path: &str, root: bool) -> Result<String, RenderError> {
        let invalid = |reason| RenderError::InvalidKey {
            key: entry.key.clone(),
            path: path.to_string(),
            reason,
        };
        if entry.key.is_empty() {
            return Err(invalid("key is empty"));
        }
        if entry.key.contains(['\n', '\r']) {
            return Err(invalid("key spans multiple lines"));
        }
        let style = if root && self.quoted_keys.iter().any(|k| *k == entry.key) {
            ScalarStyle::DoubleQuoted
        } else {
            entry.key_style
        };
        Ok(scalar_text(&entry.key, style))
    }
}

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

fn scalar_text(value: &str, style: ScalarStyle) -> String {
    match style {
        ScalarStyle::Auto if is_plain_safe(value) => value.to_string(),
        ScalarStyle::Auto | ScalarStyle::DoubleQuoted => double_quoted(value),
    }
}

/// Conservative: letters first, a small punctuation set, no reserved words.
fn is_plain_safe(value: &str) -> bool {
    let Some(first) = value.chars().next() else {
        return false;
    };
    if !first.is_ascii_alphabetic() || value.ends_with(' ') {
        return false;
    }
    if RESERVED_WORDS.iter().any(|w| w.eq_ignore_ascii_case(value)) {
        return false;
    }
    value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | '@' | ' '))
}

fn double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\x{:02X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
