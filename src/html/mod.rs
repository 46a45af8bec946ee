//! Markup encoding and decoding.
//!
//! The markup uses `p`, `span` and `a` elements with single-quoted `style`
//! and `href` attributes. The writer emits nothing else; the reader also
//! copes with whatever foreign or broken markup it is handed.

pub mod entities;
mod reader;
mod tokenizer;
mod writer;

pub use reader::{HtmlReader, ReadReport};
pub use writer::HtmlWriter;
