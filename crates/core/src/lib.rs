//! Mongfont Core - glyph set construction and shaping rule compilation for
//! Mongolian-family fonts.
//!
//! A build takes the glyph names of a source font, the reference data and the
//! requested locales, and produces a [`BuildPlan`] (glyphs to synthesize, code
//! points to remap, glyph categories) together with the feature rules as a
//! [`FeaBuilder`].

pub mod config;
pub mod data;
mod error;
pub mod glyph_name;
pub mod glyph_set;
pub mod otl;
pub mod plan;
pub mod position;
pub mod written;

pub use data::{LocaleId, ReferenceData, normalize_locales};
pub use error::{Error, Result};
pub use fea_composer::FeaBuilder;
pub use glyph_name::GlyphDescriptor;
pub use plan::{BuildPlan, FontModel, GlyphCategory, GlyphSpec, Padding};
pub use position::JoiningPosition;

use log::info;

/// Output of a build.
#[derive(Debug)]
pub struct Build {
    pub plan: BuildPlan,
    pub fea: FeaBuilder,
}

/// Plan glyphs and compile rules for `locales` on top of the glyphs named in
/// `glyphs`.
pub fn build(data: &ReferenceData, glyphs: &[String], locales: &[LocaleId]) -> Result<Build> {
    let locales = normalize_locales(locales)?;
    info!(
        "Building for {} over {} source glyphs",
        locales.iter().map(ToString::to_string).collect::<Vec<_>>().join(" "),
        glyphs.len()
    );
    let plan = glyph_set::construct_glyph_set(data, glyphs, &locales)?;
    let (plan, fea) = otl::compile(data, glyphs, &locales, plan)?;
    Ok(Build { plan, fea })
}
