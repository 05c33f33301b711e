//! Phase IIa: cursive joining.
//!
//! Each joining feature maps a nominal glyph to its default variant at that
//! position.

use fea_composer::{Lookup, Substitution};

use super::Composer;
use crate::{Result, glyph_name::{GlyphDescriptor, u_name}, position::JoiningPosition};

pub(super) fn compose(c: &mut Composer<'_>) -> Result<()> {
    let data = c.data;
    for position in JoiningPosition::ALL {
        let mut lookup = Lookup::new(format!("IIa.{position}")).feature(position.as_str());
        for character in &data.characters {
            let Some((_, variant, locale)) = data.default_variant(character, position, &c.locales) else {
                continue;
            };
            let glyph = GlyphDescriptor::from_variant(data, character, position, variant, Some(locale))?;
            lookup.push(
                Substitution::new()
                    .slot(c.glyph(&u_name(character.code_point)))
                    .by(c.glyph(&glyph.to_string())),
            );
        }
        c.add(lookup);
    }
    Ok(())
}
