//! HTML → owned tree, through html5ever's RcDom.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use super::node::{Document, Element, Node};

impl Document {
    /// Parse an HTML document or fragment and keep the children of `<body>`.
    ///
    /// Parsing never fails; html5ever repairs malformed markup the way a
    /// browser would.
    pub fn parse(html: &str) -> Self {
        let dom = parse_document(RcDom::default(), Default::default()).one(html);
        let children = match find_elem(&dom.document, "body") {
            Some(body) => convert_children(&body),
            None => convert_children(&dom.document),
        };
        Document::new(children)
    }
}

fn find_elem(node: &Handle, tag: &str) -> Option<Handle> {
    if let NodeData::Element { name, .. } = &node.data {
        if name.local.as_ref().eq_ignore_ascii_case(tag) {
            return Some(node.clone());
        }
    }
    node.children
        .borrow()
        .iter()
        .find_map(|child| find_elem(child, tag))
}

fn convert_children(node: &Handle) -> Vec<Node> {
    node.children.borrow().iter().filter_map(convert).collect()
}

fn convert(node: &Handle) -> Option<Node> {
    match &node.data {
        NodeData::Text { contents } => Some(Node::Text(contents.borrow().to_string())),
        NodeData::Comment { contents } => Some(Node::Comment(contents.to_string())),
        NodeData::Element { name, attrs, .. } => {
            let attrs = attrs
                .borrow()
                .iter()
                .map(|a| {
                    let key = match &a.name.prefix {
                        Some(prefix) => format!("{}:{}", prefix, a.name.local),
                        None => a.name.local.to_string(),
                    };
                    (key, a.value.to_string())
                })
                .collect();
            Some(Node::Element(Element {
                tag: name.local.to_string(),
                attrs,
                children: convert_children(node),
            }))
        }
        NodeData::Document | NodeData::Doctype { .. } | NodeData::ProcessingInstruction { .. } => {
            None
        }
    }
}
