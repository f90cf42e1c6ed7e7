//! Output rendering for documents.
//!
//! Turns the parsed [`Document`](crate::model::Document) into the HTML
//! fragment the editor loads.
//!
//! # Example
//!
//! ```no_run
//! use redoc::docx::DocxParser;
//! use redoc::render::{to_html, ConvertOptions};
//!
//! let doc = DocxParser::open("document.docx")?.parse()?;
//! let html = to_html(&doc, &ConvertOptions::default())?;
//! # Ok::<(), redoc::Error>(())
//! ```

mod html;
mod options;

pub use html::to_html;
pub use options::ConvertOptions;
