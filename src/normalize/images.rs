//! Image alt text and unit repair.

use crate::dom::{Document, Element};

const PX_PER_INCH: f64 = 96.0;

/// Pixel count for an inch length such as `2in` or `1.25 in`.
fn inches_to_px(value: &str) -> Option<i64> {
    let value = value.trim().to_ascii_lowercase();
    let inches: f64 = value.strip_suffix("in")?.trim().parse().ok()?;
    Some((inches * PX_PER_INCH).round() as i64)
}

/// Add missing alt text and turn inch sizes into pixels.
///
/// Returns the number of images changed.
pub(crate) fn repair_images(doc: &mut Document, alt_placeholder: &str) -> usize {
    let mut touched = 0;
    doc.walk_mut(&mut |el| {
        if el.is("img") && repair_image(el, alt_placeholder) {
            touched += 1;
        }
    });
    touched
}

fn repair_image(img: &mut Element, alt_placeholder: &str) -> bool {
    let mut changed = false;

    if img.non_blank_attr("alt").is_none() {
        img.set_attr("alt", alt_placeholder);
        changed = true;
    }

    for dim in ["width", "height"] {
        if let Some(px) = img.attr(dim).and_then(inches_to_px) {
            img.set_attr(dim, px.to_string());
            changed = true;
        }
        if let Some(px) = img.style(dim).as_deref().and_then(inches_to_px) {
            img.set_style(dim, &format!("{}px", px));
            changed = true;
        }
    }

    changed
}
