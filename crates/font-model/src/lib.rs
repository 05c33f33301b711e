//! Glyph-level editing of TrueType fonts.
//!
//! [`TrueTypeFont`] decodes the outline, metric, naming and character map
//! tables of a font into an editable model, implements
//! [`mongfont_core::FontModel`] on it, and writes the result back with every
//! other table copied unchanged.

mod error;
mod font;
mod outline;
mod write;

pub use error::{Error, Result};
pub use font::TrueTypeFont;
