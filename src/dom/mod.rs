//! Owned HTML document tree.
//!
//! HTML is parsed once into plain values ([`Document`], [`Element`],
//! [`Node`]), transformed in place and serialized back. Nothing here
//! shares ownership, so transforms are ordinary `&mut` functions.

mod node;
mod parse;
mod serialize;

pub use node::{format_style, parse_style, Document, Element, Node};
pub(crate) use serialize::{escape_attr, escape_text};
