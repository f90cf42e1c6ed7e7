//! Heading id assignment.

use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;

use crate::dom::Document;

/// Turn heading text into an id-safe slug.
///
/// NFC-normalized and lower-cased; anything that is not alphanumeric,
/// `_`, `-` or whitespace is dropped and whitespace runs become one `-`.
pub fn slugify(text: &str) -> String {
    let lowered = text.nfc().collect::<String>().to_lowercase();
    let kept: String = lowered
        .chars()
        .filter(|&c| c.is_alphanumeric() || c == '_' || c == '-' || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join("-")
}

/// Preferred id for the heading at `index` (0-based, document order).
fn base_id(text: &str, index: usize) -> String {
    let slug = slugify(text);
    if slug.is_empty() {
        format!("heading-{}", index)
    } else {
        format!("heading-{}-{}", slug, index)
    }
}

/// Give every `h1`-`h6` without a usable id a generated one.
///
/// An explicit id is kept unless it is blank or repeats the id of an
/// element earlier in the document. Generated ids avoid every id present
/// in the document. Returns the number of headings that got a new id.
pub(crate) fn assign_heading_ids(doc: &mut Document) -> usize {
    let mut taken: HashSet<String> = HashSet::new();
    doc.walk(&mut |el| {
        if let Some(id) = el.non_blank_attr("id") {
            taken.insert(id.to_string());
        }
    });

    let mut seen: HashSet<String> = HashSet::new();
    let mut index = 0;
    let mut assigned = 0;

    doc.walk_mut(&mut |el| {
        let explicit = el.non_blank_attr("id").map(str::to_string);

        if el.is_heading() {
            let position = index;
            index += 1;

            let keep = explicit.as_ref().is_some_and(|id| !seen.contains(id));
            if !keep {
                let base = base_id(&el.text_content(), position);
                let mut candidate = base.clone();
                let mut n = 1;
                while taken.contains(&candidate) {
                    candidate = format!("{}-{}", base, n);
                    n += 1;
                }
                taken.insert(candidate.clone());
                seen.insert(candidate.clone());
                el.set_attr("id", candidate);
                assigned += 1;
                return;
            }
        }

        if let Some(id) = explicit {
            seen.insert(id);
        }
    });

    assigned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(doc: &Document) -> Vec<String> {
        doc.elements()
            .iter()
            .filter(|e| e.is_heading())
            .map(|e| e.attr("id").unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  1.2  Scope &  Goals "), "12-scope-goals");
        assert_eq!(slugify("snake_case - dash"), "snake_case---dash");
        assert_eq!(slugify("Café Ünïcode"), "café-ünïcode");
        assert_eq!(slugify("?!"), "");
    }

    #[test]
    fn test_nfc_slug() {
        // "e" + combining acute composes to "é"
        assert_eq!(slugify("Cafe\u{301}"), "café");
    }

    #[test]
    fn test_assign_ids() {
        let mut doc = Document::parse(
            "<h1>Intro</h1><p>x</p><h2>Intro</h2><h3 id=\"keep\">Kept</h3><h2>  </h2>",
        );
        assert_eq!(assign_heading_ids(&mut doc), 3);
        assert_eq!(
            ids(&doc),
            ["heading-intro-0", "heading-intro-1", "keep", "heading-3"]
        );
    }

    #[test]
    fn test_duplicate_explicit_id_reassigned() {
        let mut doc = Document::parse("<p id=\"dup\">para</p><h1 id=\"dup\">Dup</h1><h1 id=\"\">Blank</h1>");
        assert_eq!(assign_heading_ids(&mut doc), 2);
        assert_eq!(ids(&doc), ["heading-dup-0", "heading-blank-1"]);
    }

    #[test]
    fn test_generated_ids_avoid_existing() {
        let mut doc = Document::parse(
            "<h1>Intro</h1><div id=\"heading-intro-0\"></div><div id=\"heading-intro-0-1\"></div>",
        );
        assign_heading_ids(&mut doc);
        assert_eq!(ids(&doc), ["heading-intro-0-2"]);
    }

    #[test]
    fn test_assignment_is_idempotent() {
        let mut doc = Document::parse("<h1>A</h1><h2>B</h2><h2>B</h2>");
        assign_heading_ids(&mut doc);
        let first = ids(&doc);
        assert_eq!(assign_heading_ids(&mut doc), 0);
        assert_eq!(ids(&doc), first);
    }
}
