//! HTML normalization.
//!
//! Converter output (or pasted/imported HTML) is parsed into a
//! [`dom::Document`], run through a fixed sequence of repair steps and
//! serialized again. Every step is best-effort per element and
//! idempotent, so normalizing already-normalized HTML is a no-op.
//!
//! ```
//! use redoc::normalize;
//!
//! let doc = normalize("<h1>Intro</h1><img src=\"a.png\" style=\"width: 2in\">");
//! assert_eq!(doc.outline[0].id, "heading-intro-0");
//! assert!(doc.html.contains("width: 192px;"));
//! ```

mod alignment;
mod headings;
mod images;
mod page;
mod tables;
mod toc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::dom;
use crate::outline::{extract_outline, HeadingEntry};

pub(crate) use headings::assign_heading_ids;
pub use headings::slugify;
pub use page::PageSize;

/// Options for [`normalize_with_options`].
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Alt text given to images without one
    pub image_alt_placeholder: String,

    /// Minimum table-cell padding in pixels
    pub min_cell_padding_px: u32,

    /// Text identifying the table-of-contents heading (case-insensitive)
    pub toc_marker: String,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            image_alt_placeholder: "Document image".to_string(),
            min_cell_padding_px: 8,
            toc_marker: "table of contents".to_string(),
        }
    }
}

impl NormalizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image_alt_placeholder(mut self, alt: impl Into<String>) -> Self {
        self.image_alt_placeholder = alt.into();
        self
    }

    pub fn with_min_cell_padding(mut self, px: u32) -> Self {
        self.min_cell_padding_px = px;
        self
    }

    pub fn with_toc_marker(mut self, marker: impl Into<String>) -> Self {
        self.toc_marker = marker.into();
        self
    }
}

/// Result of normalizing an HTML fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedDocument {
    /// Normalized HTML fragment
    pub html: String,

    /// Headings in document order
    pub outline: Vec<HeadingEntry>,

    /// Inferred paper size
    pub page_size: PageSize,
}

/// Normalize HTML with default options.
pub fn normalize(html: &str) -> NormalizedDocument {
    normalize_with_options(html, &NormalizeOptions::default())
}

/// Normalize HTML. Never fails; malformed markup is repaired by the parser.
pub fn normalize_with_options(html: &str, options: &NormalizeOptions) -> NormalizedDocument {
    let mut doc = dom::Document::parse(html);
    normalize_document(&mut doc, options);

    let page_size = page::infer_page_size(&doc);
    let outline = extract_outline(&mut doc);

    debug!(
        "Normalized document: {} headings, page size {}",
        outline.len(),
        page_size
    );

    NormalizedDocument {
        html: doc.to_html(),
        outline,
        page_size,
    }
}

/// Apply every repair step to a parsed document in place.
pub fn normalize_document(doc: &mut dom::Document, options: &NormalizeOptions) {
    let ids = assign_heading_ids(doc);
    debug!("Assigned {} heading id(s)", ids);

    let tables = tables::repair_tables(doc, options.min_cell_padding_px);
    debug!("Repaired {} table element(s)", tables);

    let images = images::repair_images(doc, &options.image_alt_placeholder);
    debug!("Repaired {} image(s)", images);

    let aligned = alignment::translate_alignment(doc);
    debug!("Added alignment classes to {} element(s)", aligned);

    let links = toc::resolve_toc_links(doc, &options.toc_marker);
    debug!("Resolved {} table-of-contents link(s)", links);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HeadingLevel;

    const CONVERTED: &str = "<p class=\"Title\" style=\"text-align: center;\">Annual Report</p>\
        <h1>Table of Contents</h1>\
        <p><a href=\"#_Toc100\">Overview</a></p>\
        <p><a href=\"#_Toc101\">Financials ..... 7</a></p>\
        <h1>Overview</h1>\
        <p>Text with <img src=\"data:image/png;base64,AAAA\" width=\"2in\"></p>\
        <h2>Financials</h2>\
        <table><tr><td align=\"right\">42</td></tr></table>";

    #[test]
    fn test_full_pipeline() {
        let doc = normalize(CONVERTED);

        let ids: Vec<_> = doc.outline.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(
            ids,
            [
                "heading-table-of-contents-0",
                "heading-overview-1",
                "heading-financials-2"
            ]
        );
        assert_eq!(doc.outline[2].level, HeadingLevel::H2);

        assert!(doc.html.contains("href=\"#heading-overview-1\""));
        assert!(doc.html.contains("href=\"#heading-financials-2\""));
        assert!(doc.html.contains("class=\"Title text-center\""));
        assert!(doc.html.contains("alt=\"Document image\""));
        assert!(doc.html.contains("width=\"192\""));
        assert!(doc.html.contains("<table width=\"100%\" border=\"1\">"));
        assert!(doc.html.contains(
            "<td align=\"right\" style=\"border: 1px solid #000; padding: 8px;\" class=\"text-right\">"
        ));
        assert_eq!(doc.page_size, PageSize::Letter);
    }

    #[test]
    fn test_idempotent() {
        let once = normalize(CONVERTED);
        let twice = normalize(&once.html);
        assert_eq!(once.html, twice.html);
        assert_eq!(once.outline, twice.outline);
    }

    #[test]
    fn test_idempotent_edge_markup() {
        let inputs = [
            "<pre>\n\nline</pre>",
            "<pre>\ncode\n</pre><textarea>\n\nnotes</textarea>",
            "<p>a&nbsp;&lt;b&gt;</p><!-- kept --><script>if (a < b) {}</script>",
            "<div class=\"WordSection1\"><h1>Intro</h1><pre>  indented</pre></div>",
        ];
        for input in inputs {
            let once = normalize(input);
            let twice = normalize(&once.html);
            assert_eq!(once, twice, "unstable for {:?}", input);
        }
        assert_eq!(normalize("<pre>\n\nline</pre>").html, "<pre>\n\nline</pre>");
    }

    #[test]
    fn test_toc_inside_wrapper() {
        let doc = normalize(
            "<div><h1>Table of Contents</h1><p><a href=\"#_Toc1\">Intro</a></p>\
             <h1>Intro</h1><p>body</p></div>",
        );
        assert_eq!(doc.outline[1].id, "heading-intro-1");
        assert!(doc.html.contains("<a href=\"#heading-intro-1\">Intro</a>"));
        assert!(!doc.html.contains("_Toc1"));
    }

    #[test]
    fn test_options() {
        let opts = NormalizeOptions::new()
            .with_image_alt_placeholder("Figure")
            .with_min_cell_padding(4)
            .with_toc_marker("contents");
        let doc = normalize_with_options(
            "<table><tr><td style=\"padding: 3px\">x</td></tr></table><img src=\"a.png\">",
            &opts,
        );
        assert!(doc.html.contains("alt=\"Figure\""));
        assert!(doc.html.contains("padding: 4px;"));
    }

    #[test]
    fn test_empty_input() {
        let doc = normalize("");
        assert_eq!(doc.html, "");
        assert!(doc.outline.is_empty());
        assert_eq!(doc.page_size, PageSize::Letter);
    }
}
