//! Intermediate document model for Word documents.
//!
//! The DOCX parser turns WordprocessingML into these structures and the
//! HTML renderer turns them into markup for the editor.

mod document;
mod paragraph;
mod resource;
mod table;

pub use document::*;
pub use paragraph::*;
pub use resource::*;
pub use table::*;
