//! Inline alignment → utility classes.

use crate::dom::{Document, Element};

/// Word-processor class markers that mean "centered title".
const TITLE_CLASSES: [&str; 4] = ["Title", "Subtitle", "MsoTitle", "MsoSubtitle"];

fn alignment_class(el: &Element) -> Option<&'static str> {
    let align = el.style("text-align")?.to_ascii_lowercase();
    match align.as_str() {
        "left" => Some("text-left"),
        "center" => Some("text-center"),
        "right" => Some("text-right"),
        "justify" => Some("text-justify"),
        _ => None,
    }
}

/// Mirror `text-align` and title markers as alignment classes.
///
/// Returns the number of elements that gained a class.
pub(crate) fn translate_alignment(doc: &mut Document) -> usize {
    let mut touched = 0;
    doc.walk_mut(&mut |el| {
        let mut changed = false;
        if let Some(class) = alignment_class(el) {
            changed |= el.add_class(class);
        }
        if TITLE_CLASSES.iter().any(|c| el.has_class(c)) {
            changed |= el.add_class("text-center");
        }
        if changed {
            touched += 1;
        }
    });
    touched
}
