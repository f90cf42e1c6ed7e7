//! Paragraph and text run models.

use serde::{Deserialize, Serialize};

/// Text alignment within a paragraph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlignment {
    /// CSS `text-align` keyword.
    pub fn css(&self) -> &'static str {
        match self {
            TextAlignment::Left => "left",
            TextAlignment::Center => "center",
            TextAlignment::Right => "right",
            TextAlignment::Justify => "justify",
        }
    }
}

/// Heading level (h1-h6 or none).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingLevel {
    #[default]
    None,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl HeadingLevel {
    /// Create a heading level from a number (1-6).
    pub fn from_number(n: u8) -> Self {
        match n {
            1 => HeadingLevel::H1,
            2 => HeadingLevel::H2,
            3 => HeadingLevel::H3,
            4 => HeadingLevel::H4,
            5 => HeadingLevel::H5,
            6 => HeadingLevel::H6,
            _ => HeadingLevel::None,
        }
    }

    /// Parse an HTML tag name (`h1`..`h6`, any case).
    pub fn from_tag(tag: &str) -> Self {
        let bytes = tag.as_bytes();
        if bytes.len() == 2 && bytes[0].eq_ignore_ascii_case(&b'h') {
            return Self::from_number(bytes[1].wrapping_sub(b'0'));
        }
        HeadingLevel::None
    }

    /// Get the numeric level (0 for none, 1-6 for headings).
    pub fn level(&self) -> u8 {
        match self {
            HeadingLevel::None => 0,
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
            HeadingLevel::H4 => 4,
            HeadingLevel::H5 => 5,
            HeadingLevel::H6 => 6,
        }
    }

    /// HTML tag name, `p` for non-headings.
    pub fn tag(&self) -> &'static str {
        match self {
            HeadingLevel::None => "p",
            HeadingLevel::H1 => "h1",
            HeadingLevel::H2 => "h2",
            HeadingLevel::H3 => "h3",
            HeadingLevel::H4 => "h4",
            HeadingLevel::H5 => "h5",
            HeadingLevel::H6 => "h6",
        }
    }

    /// Check if this is a heading (not None).
    pub fn is_heading(&self) -> bool {
        !matches!(self, HeadingLevel::None)
    }

    fn is_none(&self) -> bool {
        matches!(self, HeadingLevel::None)
    }
}

/// List type for paragraphs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    #[default]
    Bullet,
    Numbered,
}

/// List membership of a paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListInfo {
    /// Type of list
    pub list_type: ListType,
    /// Nesting level (0 = top level)
    pub level: u8,
    /// Numbering instance the paragraph belongs to
    pub num_id: String,
}

/// Character formatting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStyle {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub underline: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub strikethrough: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub superscript: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub subscript: bool,
}

impl TextStyle {
    /// Create a bold style.
    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Default::default()
        }
    }

    /// Create an italic style.
    pub fn italic() -> Self {
        Self {
            italic: true,
            ..Default::default()
        }
    }

    /// Check if style has any formatting.
    pub fn has_formatting(&self) -> bool {
        *self != TextStyle::default()
    }
}

/// A run of text with consistent styling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Text styling
    #[serde(default, skip_serializing_if = "is_default_style")]
    pub style: TextStyle,

    /// Link target: an external URL, or `#name` for an in-document anchor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hyperlink: Option<String>,
}

fn is_default_style(style: &TextStyle) -> bool {
    !style.has_formatting()
}

impl TextRun {
    /// Create a plain text run with no styling.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Create a styled text run.
    pub fn styled(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
            hyperlink: None,
        }
    }

    /// Create a hyperlink text run.
    pub fn link(text: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::default(),
            hyperlink: Some(target.into()),
        }
    }
}

/// An inline image within text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineImage {
    /// Relationship ID of the image part
    pub resource_id: String,

    /// Alt text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,

    /// Width in EMUs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u64>,

    /// Height in EMUs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u64>,
}

/// EMUs per CSS pixel (914400 per inch / 96 px per inch).
pub const EMU_PER_PIXEL: u64 = 9525;

impl InlineImage {
    /// Width in CSS pixels.
    pub fn width_px(&self) -> Option<u64> {
        self.width.map(|w| (w + EMU_PER_PIXEL / 2) / EMU_PER_PIXEL)
    }

    /// Height in CSS pixels.
    pub fn height_px(&self) -> Option<u64> {
        self.height.map(|h| (h + EMU_PER_PIXEL / 2) / EMU_PER_PIXEL)
    }
}

/// Inline content of a paragraph, in reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Inline {
    Text(TextRun),
    Image(InlineImage),
    Break,
}

/// A paragraph of text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Paragraph {
    /// Inline content
    #[serde(default)]
    pub content: Vec<Inline>,

    /// Heading level
    #[serde(default, skip_serializing_if = "HeadingLevel::is_none")]
    pub heading: HeadingLevel,

    /// Text alignment
    #[serde(default, skip_serializing_if = "is_default_alignment")]
    pub alignment: TextAlignment,

    /// List information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_info: Option<ListInfo>,

    /// Style ID reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_id: Option<String>,

    /// Display name of the paragraph style
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_name: Option<String>,
}

fn is_default_alignment(a: &TextAlignment) -> bool {
    *a == TextAlignment::Left
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph with the given text.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Inline::Text(TextRun::plain(text))],
            ..Default::default()
        }
    }

    /// Create a heading paragraph.
    pub fn heading(level: HeadingLevel, text: impl Into<String>) -> Self {
        Self {
            content: vec![Inline::Text(TextRun::plain(text))],
            heading: level,
            ..Default::default()
        }
    }

    /// Append a text run.
    pub fn add_run(&mut self, run: TextRun) {
        self.content.push(Inline::Text(run));
    }

    /// Get the plain text content.
    pub fn plain_text(&self) -> String {
        self.content
            .iter()
            .filter_map(|inline| match inline {
                Inline::Text(run) => Some(run.text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Check if this paragraph has neither text nor images.
    pub fn is_empty(&self) -> bool {
        self.content.iter().all(|inline| match inline {
            Inline::Text(run) => run.text.is_empty(),
            Inline::Image(_) => false,
            Inline::Break => true,
        })
    }

    /// Check if this paragraph is a heading.
    pub fn is_heading(&self) -> bool {
        self.heading.is_heading()
    }

    /// `Title` or `Subtitle` when the paragraph uses one of those styles.
    pub fn title_marker(&self) -> Option<&'static str> {
        match self.style_name.as_deref() {
            Some(name) if name.eq_ignore_ascii_case("title") => Some("Title"),
            Some(name) if name.eq_ignore_ascii_case("subtitle") => Some("Subtitle"),
            _ => None,
        }
    }

    /// Merge consecutive text runs with the same style and link.
    ///
    /// Word often splits a word across runs (spell-check marks, revision
    /// ids); merging keeps the HTML free of redundant `<strong>` pairs.
    pub fn merge_adjacent_runs(&mut self) {
        if self.content.len() <= 1 {
            return;
        }

        let mut merged: Vec<Inline> = Vec::with_capacity(self.content.len());
        for inline in self.content.drain(..) {
            if let (Some(Inline::Text(last)), Inline::Text(run)) = (merged.last_mut(), &inline) {
                if last.style == run.style && last.hyperlink == run.hyperlink {
                    last.text.push_str(&run.text);
                    continue;
                }
            }
            merged.push(inline);
        }
        self.content = merged;
    }
}
