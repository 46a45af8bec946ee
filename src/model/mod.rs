//! Styled text model.
//!
//! This module defines the value types the codec reads when encoding and
//! builds when decoding: colors, fonts, attribute sets and styled text.

mod attributes;
mod color;
mod font;
mod styled_text;

pub use attributes::*;
pub use color::*;
pub use font::*;
pub use styled_text::*;
