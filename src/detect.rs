//! Format detection for imported files.

use crate::container::decode_xml_bytes;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::io::{Cursor, Read};
use std::path::Path;

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Content type for the DOCX main document part.
const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";

/// MIME type browsers report for .docx files.
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// MIME type browsers report for legacy .doc files.
pub const DOC_MIME: &str = "application/msword";

/// Kind of file offered for import, decided from its name and MIME type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// Office Open XML word-processing document (.docx)
    Docx,
    /// Legacy binary Word document (.doc)
    Doc,
    /// HTML document
    #[default]
    Html,
    /// Plain text
    Text,
    /// Anything else
    Unsupported,
}

impl FileKind {
    /// Classify a file from its name and an optional MIME type.
    ///
    /// The extension wins; the MIME type is only consulted when the
    /// extension says nothing.
    pub fn detect(file_name: &str, mime: Option<&str>) -> Self {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("docx") => return FileKind::Docx,
            Some("doc") => return FileKind::Doc,
            Some("html") | Some("htm") => return FileKind::Html,
            Some("txt") => return FileKind::Text,
            _ => {}
        }

        let mime = mime.map(|m| {
            m.split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase()
        });
        match mime.as_deref() {
            Some(DOCX_MIME) => FileKind::Docx,
            Some(DOC_MIME) => FileKind::Doc,
            Some("text/html") => FileKind::Html,
            Some("text/plain") => FileKind::Text,
            _ => FileKind::Unsupported,
        }
    }

    /// Whether the file is a Word document, which exports back as Word HTML.
    pub fn is_word(&self) -> bool {
        matches!(self, FileKind::Docx | FileKind::Doc)
    }

    /// Human-readable name for messages.
    pub fn name(&self) -> &'static str {
        match self {
            FileKind::Docx => "Word Document",
            FileKind::Doc => "Word 97-2003 Document",
            FileKind::Html => "HTML Document",
            FileKind::Text => "Plain Text",
            FileKind::Unsupported => "Unsupported",
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Check that bytes hold a DOCX package.
///
/// Verifies the ZIP signature, then looks for the word-processing main
/// part in `[Content_Types].xml`, falling back to the `word/` folder.
pub fn is_docx_bytes(data: &[u8]) -> Result<()> {
    if !is_zip_file(data) {
        return Err(Error::UnknownFormat);
    }

    let mut archive = zip::ZipArchive::new(Cursor::new(data))?;
    let content_types = match archive.by_name("[Content_Types].xml") {
        Ok(mut file) => {
            let mut bytes = Vec::new();
            file.read_to_end(&mut bytes)?;
            Some(decode_xml_bytes(&bytes)?)
        }
        Err(_) => None,
    };

    if content_types.is_some_and(|ct| ct.contains(DOCX_CONTENT_TYPE)) {
        return Ok(());
    }
    if archive.file_names().any(|n| n.starts_with("word/")) {
        return Ok(());
    }
    Err(Error::UnknownFormat)
}

/// Check if data starts with ZIP magic bytes.
pub fn is_zip_file(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == ZIP_MAGIC
}
