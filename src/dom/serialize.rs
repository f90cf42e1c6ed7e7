//! Owned tree → HTML text.

use super::node::{Document, Element, Node};

/// Elements that never have an end tag.
fn is_void(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Elements whose text is written without escaping.
fn is_raw_text(tag: &str) -> bool {
    matches!(
        tag,
        "script" | "style" | "xmp" | "iframe" | "noembed" | "noframes" | "plaintext"
    )
}

/// Elements whose first newline is dropped by the parser.
fn drops_leading_newline(tag: &str) -> bool {
    matches!(tag, "pre" | "textarea" | "listing")
}

/// Escape text content; non-breaking spaces are written as `&nbsp;`.
pub(crate) fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a double-quoted attribute value.
pub(crate) fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
    out
}

impl Document {
    /// Serialize the fragment back to HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            write_node(&mut out, node, false);
        }
        out
    }
}

impl Element {
    /// Serialize this element and its subtree.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_element(&mut out, self);
        out
    }
}

fn write_node(out: &mut String, node: &Node, raw: bool) {
    match node {
        Node::Text(t) if raw => out.push_str(t),
        Node::Text(t) => out.push_str(&escape_text(t)),
        Node::Comment(c) => {
            out.push_str("<!--");
            out.push_str(c);
            out.push_str("-->");
        }
        Node::Element(el) => write_element(out, el),
    }
}

fn write_element(out: &mut String, el: &Element) {
    out.push('<');
    out.push_str(&el.tag);
    for (k, v) in &el.attrs {
        out.push(' ');
        out.push_str(k);
        out.push_str("=\"");
        out.push_str(&escape_attr(v));
        out.push('"');
    }
    out.push('>');
    if is_void(&el.tag) {
        return;
    }

    if drops_leading_newline(&el.tag) {
        if let Some(Node::Text(t)) = el.children.first() {
            if t.starts_with('\n') {
                out.push('\n');
            }
        }
    }

    let raw = is_raw_text(&el.tag);
    for child in &el.children {
        write_node(out, child, raw);
    }
    out.push_str("</");
    out.push_str(&el.tag);
    out.push('>');
}
