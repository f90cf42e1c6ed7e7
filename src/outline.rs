//! Heading outline extraction and change-driven re-indexing.
//!
//! The editing surface reports every batch of edits as a
//! [`ContentChanged`] event. [`HeadingIndexer`] consumes those events in
//! revision order, writes heading ids back into the content and keeps
//! the latest [`Outline`].

use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::dom;
use crate::model::HeadingLevel;
use crate::normalize::assign_heading_ids;

/// How long a navigated-to heading stays highlighted.
pub const HIGHLIGHT_DURATION: Duration = Duration::from_secs(2);

/// Label used for headings with no text.
const UNTITLED: &str = "(Untitled)";

/// One heading of the outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingEntry {
    pub id: String,
    pub level: HeadingLevel,
    pub text: String,
}

impl HeadingEntry {
    /// Indented label that fits in `max_width` terminal columns.
    pub fn display_label(&self, max_width: usize) -> String {
        let indent = "  ".repeat(usize::from(self.level.level().saturating_sub(1)));
        let label = format!("{}{}", indent, self.text);
        if label.width() <= max_width {
            return label;
        }

        let mut out = String::new();
        let mut width = 0;
        let budget = max_width.saturating_sub(1);
        for c in label.chars() {
            let w = c.width().unwrap_or(0);
            if width + w > budget {
                break;
            }
            out.push(c);
            width += w;
        }
        if max_width > 0 {
            out.push('…');
        }
        out
    }
}

/// Give headings ids and list them in document order.
pub fn extract_outline(doc: &mut dom::Document) -> Vec<HeadingEntry> {
    assign_heading_ids(doc);

    let mut entries = Vec::new();
    doc.walk(&mut |el| {
        let level = el.heading_level();
        if !level.is_heading() {
            return;
        }
        let text = el
            .text_content()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        entries.push(HeadingEntry {
            id: el.attr("id").unwrap_or_default().to_string(),
            level,
            text: if text.is_empty() {
                UNTITLED.to_string()
            } else {
                text
            },
        });
    });
    entries
}

/// Outline of an HTML string; ids are generated but not written back.
pub fn outline_of(html: &str) -> Vec<HeadingEntry> {
    extract_outline(&mut dom::Document::parse(html))
}

/// What produced a content change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeSource {
    Input,
    Paste,
    Import,
    Normalize,
}

/// Emitted by the editing surface after each batch of edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentChanged {
    pub revision: u64,
    pub source: ChangeSource,
}

/// Outline as of one content revision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    pub revision: u64,
    pub entries: Vec<HeadingEntry>,
}

/// Visual cue for a heading the user navigated to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub id: String,
    pub duration: Duration,
}

impl Outline {
    /// Highlight for the heading with this id.
    pub fn locate(&self, id: &str) -> Option<Highlight> {
        self.entries.iter().find(|e| e.id == id).map(|e| Highlight {
            id: e.id.clone(),
            duration: HIGHLIGHT_DURATION,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Content with heading ids written back, plus its outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedContent {
    pub html: String,
    pub outline: Outline,
}

/// Re-extracts the outline whenever the content changes.
#[derive(Debug, Default)]
pub struct HeadingIndexer {
    outline: Outline,
    consumed: Option<u64>,
}

impl HeadingIndexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest outline.
    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    /// Re-index `html` for a change event.
    ///
    /// Events older than the last one consumed are ignored and return
    /// `None`. An event with the same revision is re-indexed.
    pub fn on_content_changed(
        &mut self,
        event: &ContentChanged,
        html: &str,
    ) -> Option<IndexedContent> {
        if self.consumed.is_some_and(|last| event.revision < last) {
            debug!(
                "Ignoring stale content change {} (at {})",
                event.revision,
                self.outline.revision
            );
            return None;
        }

        let mut doc = dom::Document::parse(html);
        let entries = extract_outline(&mut doc);
        debug!(
            "Indexed {} heading(s) at revision {} ({:?})",
            entries.len(),
            event.revision,
            event.source
        );

        self.consumed = Some(event.revision);
        self.outline = Outline {
            revision: event.revision,
            entries,
        };
        Some(IndexedContent {
            html: doc.to_html(),
            outline: self.outline.clone(),
        })
    }
}
