//! Page-size inference from declared content widths.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dom::Document;

/// Paper size chosen for the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    Letter,
    A4,
}

impl PageSize {
    /// Width and height as CSS lengths.
    pub fn dimensions(&self) -> (&'static str, &'static str) {
        match self {
            PageSize::Letter => ("8.5in", "11in"),
            PageSize::A4 => ("8.27in", "11.69in"),
        }
    }

    /// Pick a page size for a content width in pixels.
    pub fn for_width(width_px: f64) -> Self {
        // Wider than 800px goes back to Letter
        if width_px > 600.0 && width_px <= 800.0 {
            PageSize::A4
        } else {
            PageSize::Letter
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSize::Letter => write!(f, "Letter"),
            PageSize::A4 => write!(f, "A4"),
        }
    }
}

/// Pixels for a CSS length; `None` for percentages and unknown units.
fn length_to_px(value: &str) -> Option<f64> {
    let value = value.trim().to_ascii_lowercase();
    let (number, factor) = if let Some(n) = value.strip_suffix("px") {
        (n, 1.0)
    } else if let Some(n) = value.strip_suffix("in") {
        (n, 96.0)
    } else if let Some(n) = value.strip_suffix("pt") {
        (n, 96.0 / 72.0)
    } else if let Some(n) = value.strip_suffix("cm") {
        (n, 96.0 / 2.54)
    } else {
        (value.as_str(), 1.0)
    };
    let number: f64 = number.trim().parse().ok()?;
    (number.is_finite() && number >= 0.0).then_some(number * factor)
}

/// Largest declared width among all elements, in pixels.
pub(crate) fn content_width(doc: &Document) -> f64 {
    let mut widest: f64 = 0.0;
    doc.walk(&mut |el| {
        let declared = el
            .attr("width")
            .and_then(length_to_px)
            .into_iter()
            .chain(el.style("width").as_deref().and_then(length_to_px));
        for px in declared {
            widest = widest.max(px);
        }
    });
    widest
}

/// Infer the page size of a parsed document.
pub(crate) fn infer_page_size(doc: &Document) -> PageSize {
    PageSize::for_width(content_width(doc))
}
