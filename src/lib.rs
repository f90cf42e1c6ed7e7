//! # redoc
//!
//! Word document import, HTML normalization, heading outlines and
//! Word-compatible export for a browser-style document editor.
//!
//! ## Quick Start
//!
//! ```no_run
//! use redoc::{convert, normalize, DocumentSession, ExportFormat};
//!
//! // DOCX bytes to an HTML fragment
//! let data = std::fs::read("report.docx")?;
//! let html = convert(&data)?;
//!
//! // Repair the markup and collect the heading outline
//! let doc = normalize(&html);
//! for heading in &doc.outline {
//!     println!("{} {}", heading.id, heading.text);
//! }
//!
//! // Or drive the whole flow through a session
//! let mut session = DocumentSession::new();
//! session.import("report.docx", None, &data)?;
//! let blob = session.export(ExportFormat::Doc)?;
//! std::fs::write(&blob.file_name, &blob.bytes)?;
//! # Ok::<(), redoc::Error>(())
//! ```
//!
//! ## Modules
//!
//! - [`docx`] and [`render`]: DOCX → document model → HTML
//! - [`normalize`](mod@normalize): HTML repair (heading ids, tables, images, TOC links)
//! - [`outline`]: heading extraction driven by content-change events
//! - [`export`]: HTML and Word-compatible downloads
//! - [`store`]: on-disk upload store

pub mod container;
pub mod detect;
pub mod docx;
pub mod dom;
pub mod error;
pub mod export;
pub mod model;
pub mod normalize;
pub mod outline;
pub mod render;
pub mod session;
pub mod store;

// Re-exports
pub use container::{OoxmlContainer, Relationship, Relationships};
pub use detect::{is_docx_bytes, FileKind, DOCX_MIME, DOC_MIME};
pub use error::{Error, ErrorKind, Result};
pub use export::{export_document, export_to_writer, ExportBlob, ExportFormat};
pub use model::{
    Block, Cell, CellAlignment, Document, HeadingLevel, ListInfo, ListType, Metadata, Paragraph,
    Resource, Row, Table, TextAlignment, TextRun, TextStyle,
};
pub use normalize::{normalize, normalize_with_options, NormalizeOptions, NormalizedDocument, PageSize};
pub use outline::{
    extract_outline, outline_of, ChangeSource, ContentChanged, HeadingEntry, HeadingIndexer,
    Highlight, Outline, HIGHLIGHT_DURATION,
};
pub use render::ConvertOptions;
pub use session::DocumentSession;
pub use store::{FileRecord, StoreConfig, UploadReceipt, UploadStore};

use std::path::Path;

/// Parse DOCX bytes into the document model.
///
/// # Example
///
/// ```no_run
/// let data = std::fs::read("document.docx")?;
/// let doc = redoc::parse_bytes(&data)?;
/// println!("Headings: {}", doc.heading_count());
/// # Ok::<(), redoc::Error>(())
/// ```
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    is_docx_bytes(data)?;
    docx::DocxParser::from_bytes(data.to_vec())?.parse()
}

/// Convert DOCX bytes to an HTML fragment.
///
/// Anything that is not a readable word-processing package fails with
/// [`Error::Conversion`].
///
/// # Example
///
/// ```no_run
/// let data = std::fs::read("document.docx")?;
/// let html = redoc::convert(&data)?;
/// std::fs::write("document.html", html)?;
/// # Ok::<(), redoc::Error>(())
/// ```
pub fn convert(data: &[u8]) -> Result<String> {
    convert_with_options(data, &ConvertOptions::default())
}

/// Convert DOCX bytes to HTML with options.
///
/// # Example
///
/// ```no_run
/// use redoc::{convert_with_options, ConvertOptions};
///
/// let data = std::fs::read("document.docx")?;
/// let options = ConvertOptions::new().with_embed_images(false).with_title(true);
/// let html = convert_with_options(&data, &options)?;
/// # Ok::<(), redoc::Error>(())
/// ```
pub fn convert_with_options(data: &[u8], options: &ConvertOptions) -> Result<String> {
    let doc = parse_bytes(data).map_err(Error::into_conversion)?;
    render::to_html(&doc, options).map_err(Error::into_conversion)
}

/// Read and convert a DOCX file.
///
/// An unreadable path is reported as [`Error::Conversion`], like any other
/// input that cannot be converted.
pub fn convert_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let data = std::fs::read(path)
        .map_err(|e| Error::Conversion(format!("{}: {}", path.display(), e)))?;
    convert(&data)
}
