//! Editing session state.

use log::{debug, info};

use crate::detect::FileKind;
use crate::dom::escape_text;
use crate::error::{Error, Result};
use crate::export::{export_document, ExportBlob, ExportFormat};
use crate::normalize::{normalize, PageSize};
use crate::outline::{ChangeSource, ContentChanged, HeadingIndexer, Outline};

/// Content shown before anything is imported or typed.
pub const PLACEHOLDER_CONTENT: &str = "<p>Start typing your document here...</p>";

/// Font used for Word export unless the user picks another.
pub const DEFAULT_FONT: &str = "Arial";

/// One open document: its content, where it came from and its outline.
#[derive(Debug)]
pub struct DocumentSession {
    file_name: Option<String>,
    original_kind: FileKind,
    font_family: String,
    content: String,
    page_size: PageSize,
    revision: u64,
    indexer: HeadingIndexer,
}

impl Default for DocumentSession {
    fn default() -> Self {
        Self {
            file_name: None,
            original_kind: FileKind::Html,
            font_family: DEFAULT_FONT.to_string(),
            content: PLACEHOLDER_CONTENT.to_string(),
            page_size: PageSize::default(),
            revision: 0,
            indexer: HeadingIndexer::new(),
        }
    }
}

impl DocumentSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn set_file_name(&mut self, name: impl Into<String>) {
        self.file_name = Some(name.into());
    }

    pub fn original_kind(&self) -> FileKind {
        self.original_kind
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    /// Font used by Word export; validated when exporting.
    pub fn set_font_family(&mut self, font: impl Into<String>) {
        self.font_family = font.into();
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn outline(&self) -> &Outline {
        self.indexer.outline()
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Number of content changes so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Load a file into the session.
    ///
    /// Word documents go through conversion and normalization; HTML and
    /// plain text are normalized as they are. The session is left
    /// untouched when the import fails.
    pub fn import(&mut self, file_name: &str, mime: Option<&str>, bytes: &[u8]) -> Result<()> {
        let kind = FileKind::detect(file_name, mime);
        let html = match kind {
            FileKind::Docx => crate::convert(bytes)?,
            FileKind::Html => String::from_utf8_lossy(bytes).into_owned(),
            FileKind::Text => text_to_html(&String::from_utf8_lossy(bytes)),
            FileKind::Doc | FileKind::Unsupported => {
                return Err(Error::UnsupportedFileType(file_name.to_string()));
            }
        };

        let normalized = normalize(&html);
        info!(
            "Imported {} as {} ({} headings)",
            file_name,
            kind,
            normalized.outline.len()
        );

        self.file_name = Some(file_name.to_string());
        self.original_kind = kind;
        self.page_size = normalized.page_size;
        self.replace_content(normalized.html, ChangeSource::Import);
        Ok(())
    }

    /// Replace the content after an edit batch and re-index headings.
    pub fn apply_edit(&mut self, html: &str, source: ChangeSource) -> &Outline {
        self.replace_content(html.to_string(), source);
        self.indexer.outline()
    }

    fn replace_content(&mut self, html: String, source: ChangeSource) {
        self.revision += 1;
        let event = ContentChanged {
            revision: self.revision,
            source,
        };
        self.content = match self.indexer.on_content_changed(&event, &html) {
            Some(indexed) => indexed.html,
            None => html,
        };
        debug!("Content at revision {}", self.revision);
    }

    /// Export the current content.
    pub fn export(&self, format: ExportFormat) -> Result<ExportBlob> {
        export_document(&self.content, format, self)
    }

    /// Export in the format matching the imported file.
    pub fn export_default(&self) -> Result<ExportBlob> {
        self.export(ExportFormat::for_original(self.original_kind))
    }

    /// Raw content as an HTML download.
    pub fn save_snapshot(&self) -> ExportBlob {
        ExportBlob {
            file_name: self
                .file_name
                .clone()
                .unwrap_or_else(|| "document.html".to_string()),
            mime_type: "text/html".to_string(),
            bytes: self.content.clone().into_bytes(),
        }
    }
}

/// One escaped `<p>` per line of plain text.
fn text_to_html(text: &str) -> String {
    text.lines()
        .map(|line| format!("<p>{}</p>", escape_text(line)))
        .collect()
}
