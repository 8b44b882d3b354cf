// Minimal ordered YAML emitter for Helm values files.
//
// Keys keep insertion order, strings are always double-quoted, and multi-line
// payloads go out as literal block scalars.

use std::fmt::Write as _;

const INDENT: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Str(String),
    Bool(bool),
    Int(u64),
    /// Emitted as a `|` block scalar
    Literal(String),
    Map(Mapping),
    Seq(Vec<Node>),
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Str(s.to_string())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Str(s)
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Bool(b)
    }
}

impl From<u32> for Node {
    fn from(n: u32) -> Self {
        Node::Int(u64::from(n))
    }
}

impl From<u16> for Node {
    fn from(n: u16) -> Self {
        Node::Int(u64::from(n))
    }
}

impl From<Mapping> for Node {
    fn from(m: Mapping) -> Self {
        Node::Map(m)
    }
}

/// Insertion-ordered mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    entries: Vec<(String, Node)>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<Node>) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: &str, value: impl Into<Node>) {
        self.entries.push((key.to_string(), value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A group of top-level keys printed together, separated from the next group by a blank line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub comment: Option<String>,
    pub body: Mapping,
}

impl Section {
    pub fn new(body: Mapping) -> Self {
        Self {
            comment: None,
            body,
        }
    }

    pub fn commented(comment: &str, body: Mapping) -> Self {
        Self {
            comment: Some(comment.to_string()),
            body,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub header: Vec<String>,
    pub sections: Vec<Section>,
}

impl Document {
    pub fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    pub fn to_yaml(&self) -> String {
        let mut out = String::new();
        for line in &self.header {
            write_comment(&mut out, line);
        }
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 || !self.header.is_empty() {
                out.push('\n');
            }
            if let Some(comment) = &section.comment {
                write_comment(&mut out, comment);
            }
            write_mapping(&mut out, &section.body, 0);
        }
        out
    }
}

fn write_comment(out: &mut String, text: &str) {
    for line in text.lines() {
        out.push_str("# ");
        out.push_str(line);
        out.push('\n');
    }
}

fn pad(out: &mut String, indent: usize) {
    out.extend(std::iter::repeat(' ').take(indent));
}

fn write_mapping(out: &mut String, map: &Mapping, indent: usize) {
    for (key, value) in &map.entries {
        pad(out, indent);
        out.push_str(key);
        out.push(':');
        write_value(out, value, indent);
    }
}

// Writes everything after `key:` including the trailing newline.
fn write_value(out: &mut String, value: &Node, indent: usize) {
    match value {
        Node::Map(m) if m.is_empty() => out.push_str(" {}\n"),
        Node::Map(m) => {
            out.push('\n');
            write_mapping(out, m, indent + INDENT);
        }
        Node::Seq(items) if items.is_empty() => out.push_str(" []\n"),
        Node::Seq(items) => {
            out.push('\n');
            write_sequence(out, items, indent + INDENT);
        }
        Node::Literal(text) if fits_block(text) => {
            out.push_str(" |\n");
            write_literal(out, text, indent + INDENT);
        }
        Node::Literal(text) => {
            out.push(' ');
            write_quoted(out, text.trim());
            out.push('\n');
        }
        scalar => {
            out.push(' ');
            write_scalar(out, scalar);
            out.push('\n');
        }
    }
}

fn write_sequence(out: &mut String, items: &[Node], indent: usize) {
    for item in items {
        match item {
            Node::Map(m) if !m.is_empty() => {
                // Render the entry one level deeper, then fold its first line onto the dash.
                let mut nested = String::new();
                write_mapping(&mut nested, m, indent + INDENT);
                pad(out, indent);
                out.push_str("- ");
                out.push_str(&nested[indent + INDENT..]);
            }
            Node::Seq(inner) if !inner.is_empty() => {
                pad(out, indent);
                out.push_str("-\n");
                write_sequence(out, inner, indent + INDENT);
            }
            Node::Literal(text) if fits_block(text) => {
                pad(out, indent);
                out.push_str("- |\n");
                write_literal(out, text, indent + INDENT);
            }
            other => {
                pad(out, indent);
                out.push('-');
                write_value(out, other, indent);
            }
        }
    }
}

// Characters YAML treats as line breaks inside a block scalar.
const LINE_BREAKS: [char; 5] = ['\n', '\r', '\u{85}', '\u{2028}', '\u{2029}'];

// Characters that cannot appear raw anywhere in a YAML stream.
fn is_unprintable(c: char) -> bool {
    (c.is_control() && c != '\t' && !LINE_BREAKS.contains(&c)) || c == '\u{feff}'
}

// Block scalars cannot escape, so text with unprintable characters goes out quoted.
fn fits_block(text: &str) -> bool {
    !text.chars().any(is_unprintable)
}

fn write_literal(out: &mut String, text: &str, indent: usize) {
    let text = text.replace("\r\n", "\n");
    for line in text.trim().split(LINE_BREAKS) {
        let line = line.trim_end();
        if !line.is_empty() {
            pad(out, indent);
            out.push_str(line);
        }
        out.push('\n');
    }
}

fn write_scalar(out: &mut String, node: &Node) {
    match node {
        Node::Str(s) => write_quoted(out, s),
        Node::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Node::Int(n) => {
            let _ = write!(out, "{n}");
        }
        Node::Literal(_) | Node::Map(_) | Node::Seq(_) => {}
    }
}

/// YAML double-quoted scalar.
///
/// A JSON string literal is a valid YAML double-quoted scalar, except that JSON
/// leaves DEL, C1 controls, U+2028/U+2029 and the BOM raw. Those get `\u` escapes.
pub fn write_quoted(out: &mut String, s: &str) {
    let json = serde_json::to_string(s).unwrap_or_else(|_| String::from("\"\""));
    for c in json.chars() {
        if is_unprintable(c) || matches!(c, '\u{85}' | '\u{2028}' | '\u{2029}') {
            let _ = write!(out, "\\u{:04X}", u32::from(c));
        } else {
            out.push(c);
        }
    }
}
