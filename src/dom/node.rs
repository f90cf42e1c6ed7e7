//! Owned HTML nodes.

use crate::model::HeadingLevel;

/// A node of the owned HTML tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

impl Node {
    /// Create a text node.
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(t),
            Node::Element(el) => {
                for child in &el.children {
                    child.collect_text(out);
                }
            }
            Node::Comment(_) => {}
        }
    }
}

/// An HTML element with ordered attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lower-case tag name
    pub tag: String,
    /// Attributes in source order
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element with no attributes or children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder-style child appender.
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    /// Heading level of `h1`-`h6`, `None` for anything else.
    pub fn heading_level(&self) -> HeadingLevel {
        HeadingLevel::from_tag(&self.tag)
    }

    pub fn is_heading(&self) -> bool {
        self.heading_level().is_heading()
    }

    /// Attribute value by (case-insensitive) name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Attribute value if present and not blank.
    pub fn non_blank_attr(&self, name: &str) -> Option<&str> {
        self.attr(name).filter(|v| !v.trim().is_empty())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .attrs
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let idx = self
            .attrs
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(name))?;
        Some(self.attrs.remove(idx).1)
    }

    /// Tokens of the `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Add a class once. Returns whether it was added.
    pub fn add_class(&mut self, class: &str) -> bool {
        if self.has_class(class) {
            return false;
        }
        let value = match self.attr("class").map(str::trim).filter(|c| !c.is_empty()) {
            Some(existing) => format!("{} {}", existing, class),
            None => class.to_string(),
        };
        self.set_attr("class", value);
        true
    }

    /// Declarations of the inline `style` attribute, property names lower-cased.
    pub fn style_declarations(&self) -> Vec<(String, String)> {
        parse_style(self.attr("style").unwrap_or_default())
    }

    /// Value of one inline style property.
    pub fn style(&self, property: &str) -> Option<String> {
        self.style_declarations()
            .into_iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v)
    }

    /// Whether any inline style property satisfies the predicate.
    pub fn has_style_matching(&self, pred: impl Fn(&str) -> bool) -> bool {
        self.style_declarations().iter().any(|(k, _)| pred(k.as_str()))
    }

    /// Set one inline style property, keeping the other declarations in order.
    pub fn set_style(&mut self, property: &str, value: &str) {
        let mut decls = self.style_declarations();
        match decls.iter_mut().find(|(k, _)| k == property) {
            Some((_, v)) => *v = value.to_string(),
            None => decls.push((property.to_string(), value.to_string())),
        }
        self.set_attr("style", format_style(&decls));
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }

    /// Whether the element contains no text and no embedded content.
    pub fn is_empty_content(&self) -> bool {
        self.children.iter().all(|child| match child {
            Node::Text(t) => t.trim_matches(|c: char| c.is_whitespace()).is_empty(),
            Node::Comment(_) => true,
            Node::Element(el) => {
                !matches!(
                    el.tag.as_str(),
                    "img" | "table" | "hr" | "iframe" | "object" | "embed" | "video" | "svg"
                ) && el.is_empty_content()
            }
        })
    }

    /// Visit this element and its descendants in document order.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Element)) {
        f(self);
        for child in &self.children {
            if let Node::Element(el) = child {
                el.walk(f);
            }
        }
    }

    /// Mutably visit this element and its descendants in document order.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        f(self);
        for child in &mut self.children {
            if let Node::Element(el) = child {
                el.walk_mut(f);
            }
        }
    }
}

/// Split a `style` attribute into `(property, value)` pairs.
pub fn parse_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (prop, value) = decl.split_once(':')?;
            let prop = prop.trim().to_ascii_lowercase();
            let value = value.trim();
            (!prop.is_empty() && !value.is_empty()).then(|| (prop, value.to_string()))
        })
        .collect()
}

/// Join declarations back into a `style` attribute.
pub fn format_style(decls: &[(String, String)]) -> String {
    decls
        .iter()
        .map(|(k, v)| format!("{}: {};", k, v))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Root of a parsed fragment: the children of `<body>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub children: Vec<Node>,
}

impl Document {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    /// Visit every element in document order.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Element)) {
        for child in &self.children {
            if let Node::Element(el) = child {
                el.walk(f);
            }
        }
    }

    /// Mutably visit every element in document order.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        for child in &mut self.children {
            if let Node::Element(el) = child {
                el.walk_mut(f);
            }
        }
    }

    /// All elements in document order.
    pub fn elements(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        self.walk(&mut |el| out.push(el));
        out
    }

    /// Whether some element carries this id.
    pub fn has_id(&self, id: &str) -> bool {
        self.elements().iter().any(|el| el.attr("id") == Some(id))
    }

    /// Text of the whole fragment.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }

    /// Child-index path of the first element matching the predicate.
    pub fn find_path(&self, pred: impl Fn(&Element) -> bool) -> Option<Vec<usize>> {
        fn search(
            nodes: &[Node],
            pred: &dyn Fn(&Element) -> bool,
            path: &mut Vec<usize>,
        ) -> bool {
            for (i, node) in nodes.iter().enumerate() {
                if let Node::Element(el) = node {
                    path.push(i);
                    if pred(el) || search(&el.children, pred, path) {
                        return true;
                    }
                    path.pop();
                }
            }
            false
        }

        let mut path = Vec::new();
        search(&self.children, &pred, &mut path).then_some(path)
    }

    /// Children of the node at `path` (the root's children for `[]`).
    pub fn children_at_mut(&mut self, path: &[usize]) -> Option<&mut Vec<Node>> {
        let mut nodes = &mut self.children;
        for &i in path {
            nodes = &mut nodes.get_mut(i)?.as_element_mut()?.children;
        }
        Some(nodes)
    }

    /// Element at a child-index path.
    pub fn element_at(&self, path: &[usize]) -> Option<&Element> {
        let (&last, parents) = path.split_last()?;
        let mut nodes = &self.children;
        for &i in parents {
            nodes = &nodes.get(i)?.as_element()?.children;
        }
        nodes.get(last)?.as_element()
    }

    /// Mutable element at a child-index path.
    pub fn element_at_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        let (&last, parents) = path.split_last()?;
        self.children_at_mut(parents)?
            .get_mut(last)?
            .as_element_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document::new(vec![
            Node::Element(
                Element::new("h1")
                    .with_attr("id", "top")
                    .with_child(Node::text("Title")),
            ),
            Node::text("\n"),
            Node::Element(
                Element::new("div").with_child(Node::Element(
                    Element::new("p")
                        .with_attr("class", "note")
                        .with_child(Node::text("Hello "))
                        .with_child(Node::Element(
                            Element::new("b").with_child(Node::text("world")),
                        )),
                )),
            ),
        ])
    }

    #[test]
    fn test_attributes() {
        let mut el = Element::new("td").with_attr("Align", "center");
        assert_eq!(el.attr("align"), Some("center"));
        el.set_attr("align", "left");
        assert_eq!(el.attrs.len(), 1);
        assert_eq!(el.remove_attr("ALIGN").as_deref(), Some("left"));
        assert!(!el.has_attr("align"));
    }

    #[test]
    fn test_classes() {
        let mut el = Element::new("p").with_attr("class", "  MsoNormal ");
        assert!(el.has_class("MsoNormal"));
        assert!(el.add_class("text-center"));
        assert!(!el.add_class("text-center"));
        assert_eq!(el.attr("class"), Some("MsoNormal text-center"));
    }

    #[test]
    fn test_styles() {
        let mut el = Element::new("td").with_attr("style", "Padding:4px;color: red ;;bad");
        assert_eq!(el.style("padding").as_deref(), Some("4px"));
        assert_eq!(el.style("color").as_deref(), Some("red"));
        el.set_style("padding", "8px");
        el.set_style("border", "1px solid #000");
        assert_eq!(
            el.attr("style"),
            Some("padding: 8px; color: red; border: 1px solid #000;")
        );
        assert!(el.has_style_matching(|k| k.starts_with("border")));
    }

    #[test]
    fn test_text_content() {
        let doc = sample();
        assert_eq!(doc.text_content(), "Title\nHello world");
    }

    #[test]
    fn test_walk_order() {
        let doc = sample();
        let tags: Vec<_> = doc.elements().iter().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, ["h1", "div", "p", "b"]);
        assert!(doc.has_id("top"));
        assert!(!doc.has_id("missing"));
    }

    #[test]
    fn test_paths() {
        let mut doc = sample();
        let path = doc.find_path(|el| el.is("b")).unwrap();
        assert_eq!(path, vec![2, 0, 1]);
        assert_eq!(doc.element_at(&path).unwrap().text_content(), "world");

        doc.element_at_mut(&path[..2]).unwrap().add_class("lead");
        assert!(doc.element_at(&[2, 0]).unwrap().has_class("lead"));
        assert_eq!(doc.children_at_mut(&[]).unwrap().len(), 3);
        assert!(doc.element_at(&[1]).is_none());
    }

    #[test]
    fn test_empty_content() {
        let empty = Element::new("p")
            .with_child(Node::text(" \u{a0} "))
            .with_child(Node::Element(Element::new("br")));
        assert!(empty.is_empty_content());

        let image = Element::new("p").with_child(Node::Element(Element::new("img")));
        assert!(!image.is_empty_content());
    }
}
