//! # FEA Composer
//!
//! Build OpenType feature files out of named glyph classes and GSUB lookups,
//! and emit them as text for a feature compiler.
//!
//! ## Example
//!
//! ```
//! use fea_composer::{FeaBuilder, GlyphSet, Lookup, Substitution};
//!
//! let mut fea = FeaBuilder::new();
//! fea.language_system("mong", "dflt");
//! let vowels = fea.define_class("vowel", GlyphSet::from_iter(["a".to_string(), "e".to_string()]));
//!
//! let mut lookup = Lookup::new("isolate").feature("isol");
//! lookup.push(Substitution::new().slot(vowels).by("a.isol"));
//! fea.add_lookup(lookup);
//!
//! assert!(fea.emit_text().contains("sub @vowel by a.isol;"));
//! ```

#[cfg(any(test, feature = "test"))]
pub mod apply;
mod builder;
mod glyphs;
mod lookup;
mod rule;

#[cfg(any(test, feature = "test"))]
pub use apply::Shaper;
pub use builder::{FeaBuilder, GdefClasses};
pub use glyphs::{GlyphSet, Member};
pub use lookup::{Lookup, LookupFlags};
pub use rule::{LookupRef, Replacement, ReverseSubstitution, Rule, Slot, Substitution};
