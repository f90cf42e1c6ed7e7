//! Table-of-contents link resolution.
//!
//! Converted documents keep TOC hyperlinks that point at bookmarks which
//! never made it into the HTML. Each broken link is re-pointed at the
//! heading carrying the same text.

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::dom::{Document, Element, Node};

/// Trailing page number and dot leaders of a TOC entry.
static PAGE_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:[\s.·…_\-]*\d+)?[\s.·…_\-]*$").unwrap());

/// Lowercase with whitespace runs collapsed.
fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn strip_page_suffix(text: &str) -> String {
    PAGE_SUFFIX.replace(text, "").trim().to_string()
}

/// Depth-first walk that passes each element's child-index path.
/// Returning `false` from `f` skips the element's descendants.
fn walk_paths<'a>(
    nodes: &'a [Node],
    path: &mut Vec<usize>,
    f: &mut impl FnMut(&[usize], &'a Element) -> bool,
) {
    for (i, node) in nodes.iter().enumerate() {
        if let Node::Element(el) = node {
            path.push(i);
            if f(path, el) {
                walk_paths(&el.children, path, f);
            }
            path.pop();
        }
    }
}

struct HeadingRef {
    path: Vec<usize>,
    text: String,
    id: Option<String>,
}

struct LinkRef {
    path: Vec<usize>,
    target: String,
    text: String,
}

/// Paths of the elements making up the TOC region around the marker.
///
/// The region is the marker plus its following element siblings up to the
/// next heading. A marker with no such siblings stands for its parent.
fn region_paths(doc: &Document, marker: &[usize]) -> Vec<Vec<usize>> {
    let mut anchor = marker.to_vec();
    loop {
        let Some((&index, parent)) = anchor.split_last() else {
            return Vec::new();
        };
        let siblings = if parent.is_empty() {
            &doc.children
        } else {
            match doc.element_at(parent) {
                Some(el) => &el.children,
                None => return Vec::new(),
            }
        };

        let mut region = vec![anchor.clone()];
        for (i, node) in siblings.iter().enumerate().skip(index + 1) {
            if let Node::Element(el) = node {
                if el.is_heading() {
                    break;
                }
                let mut path = parent.to_vec();
                path.push(i);
                region.push(path);
            }
        }
        if region.len() > 1 || parent.is_empty() {
            return region;
        }
        anchor.pop();
    }
}

/// Re-point broken in-document TOC links at matching headings.
///
/// Returns the number of links resolved.
pub(crate) fn resolve_toc_links(doc: &mut Document, marker_text: &str) -> usize {
    let marker_text = marker_text.to_lowercase();
    let Some(marker) = doc.find_path(|el| {
        (el.is_heading() || el.is("p")) && el.text_content().to_lowercase().contains(&marker_text)
    }) else {
        return 0;
    };

    let region = region_paths(doc, &marker);
    let in_region = |path: &[usize]| region.iter().any(|r| path.starts_with(r));

    let mut links = Vec::new();
    let mut headings = Vec::new();
    walk_paths(&doc.children, &mut Vec::new(), &mut |path, el| {
        if in_region(path) {
            if el.is("a") {
                if let Some(target) = el.attr("href").and_then(|h| h.strip_prefix('#')) {
                    links.push(LinkRef {
                        path: path.to_vec(),
                        target: target.to_string(),
                        text: normalize_text(&el.text_content()),
                    });
                }
            }
        } else if el.is_heading() {
            headings.push(HeadingRef {
                path: path.to_vec(),
                text: normalize_text(&el.text_content()),
                id: el.non_blank_attr("id").map(str::to_string),
            });
        }
        true
    });

    for path in &region {
        if let Some(el) = doc.element_at_mut(path) {
            el.add_class("toc");
        }
    }

    let mut resolved = 0;
    let mut unresolved = 0;
    for link in links {
        if link.target.is_empty() || doc.has_id(&link.target) {
            continue;
        }

        let stripped = strip_page_suffix(&link.text);
        let found = headings
            .iter()
            .position(|h| h.text == link.text)
            .or_else(|| {
                headings
                    .iter()
                    .position(|h| !stripped.is_empty() && h.text == stripped)
            });
        let Some(index) = found else {
            unresolved += 1;
            continue;
        };
        let heading = &mut headings[index];

        match &heading.id {
            Some(id) => {
                let href = format!("#{}", id);
                if let Some(a) = doc.element_at_mut(&link.path) {
                    a.set_attr("href", href);
                }
            }
            None => {
                if let Some(h) = doc.element_at_mut(&heading.path) {
                    h.set_attr("id", link.target.clone());
                }
                heading.id = Some(link.target);
            }
        }
        resolved += 1;
    }

    if unresolved > 0 {
        warn!("{} table-of-contents link(s) left unresolved", unresolved);
    }
    resolved
}
