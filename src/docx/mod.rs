//! DOCX (Word) document parser.
//!
//! Reads the Office Open XML word-processing package into the
//! intermediate [`Document`](crate::model::Document) model.

mod numbering;
mod parser;
mod styles;

pub use parser::DocxParser;
