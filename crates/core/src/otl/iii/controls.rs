//! III.0: control preprocessing.
//!
//! Joiners, nirugu and FVS become ignorable marks, MVS is preserved as an
//! invalid separator until a later pass validates it, and Todo letters
//! followed by the long vowel sign are ligated so the sign stops affecting
//! joining.

use fea_composer::{GlyphSet, Substitution};

use crate::{
    Result,
    config::{LVS_ALIAS, MVS, NIRUGU, ZWJ, ZWNJ},
    data::LocaleId,
    glyph_name::ligate_parts,
    otl::{Composer, rclt},
    plan::{GlyphCategory, GlyphSpec},
    position::{Fina, Init, Medi},
};

pub(super) fn compose(c: &mut Composer<'_>) -> Result<()> {
    let mut lookup = rclt("III.controls.preprocessing");
    let controls = GlyphSet::union([c.glyphs([ZWNJ, ZWJ, NIRUGU]), c.class("fvs")]);
    lookup.push(Substitution::new().input_with(controls, "_.ignored"));
    c.add(lookup);

    let wide = format!("{MVS}.wide");
    let mut lookup = rclt("III.mvs.preserving.A");
    lookup.push(Substitution::new().slot(c.glyph(MVS)).by_sequence([c.glyph(&wide), c.glyph(&wide)]));
    c.add(lookup);

    let mut lookup = rclt("III.mvs.preserving.B");
    lookup.push(Substitution::new().slot(c.glyph(&wide)).slot(c.glyph(&wide)).by(c.glyph(MVS)));
    c.add(lookup);

    for locale in c.among(&[LocaleId::Tod, LocaleId::TodX]) {
        lvs_preprocessing(c, locale)?;
    }
    Ok(())
}

/// `letter lvs` → one ligature glyph, so a final sign leaves its letter
/// isolated or final.
fn lvs_preprocessing(c: &mut Composer<'_>, locale: LocaleId) -> Result<()> {
    let mut lookup = rclt(format!("III.lvs.preprocessing.{locale}")).ignore_marks();
    for alias in c.category(locale, LVS_ALIAS) {
        for position in [Init, Medi] {
            let Some(letter) = c.default_glyph(locale, alias, position)? else {
                continue;
            };
            for sign_position in [Medi, Fina] {
                let Some(sign) = c.default_glyph(locale, LVS_ALIAS, sign_position)? else {
                    continue;
                };
                let ligature = ligate_parts(&[letter.clone(), sign.clone()])?.to_string();
                let (letter, sign) = (letter.to_string(), sign.to_string());
                if !c.available(&letter) || !c.available(&sign) {
                    continue;
                }
                c.add_glyph(&ligature, GlyphSpec::composite([letter.clone(), sign.clone()]), GlyphCategory::Ligature);
                lookup.push(Substitution::new().slot(c.glyph(&letter)).slot(c.glyph(&sign)).by(c.glyph(&ligature)));
            }
        }
    }
    c.add(lookup);
    Ok(())
}
