//! III.6: variants selected by FVS.
//!
//! An FVS that names an existing variant of the preceding letter selects it
//! and becomes valid. Any other FVS stays ignored.

use fea_composer::{Lookup, Substitution};
use indexmap::IndexMap;

use crate::{
    Result,
    data::{Fvs, LocaleId},
    glyph_name::GlyphDescriptor,
    otl::{Composer, rclt},
    position::JoiningPosition,
};

pub(super) fn compose(c: &mut Composer<'_>) -> Result<()> {
    for locale in c.locales().to_vec() {
        let mut selected: IndexMap<(String, JoiningPosition), Vec<(Fvs, GlyphDescriptor)>> = IndexMap::new();
        for alias in c.letters(locale) {
            for v in c.letter_variants(locale, alias)? {
                if v.fvs != 0 {
                    selected.entry((alias.to_string(), v.position)).or_default().push((v.fvs, v.glyph));
                }
            }
        }
        manual(c, locale, "", &selected);

        if matches!(locale, LocaleId::Tod | LocaleId::TodX) {
            let mut selected: IndexMap<(String, JoiningPosition), Vec<(Fvs, GlyphDescriptor)>> = IndexMap::new();
            for alias in c.letters(locale) {
                for position in JoiningPosition::ALL {
                    for (fvs, glyph) in c.lvs_variants(locale, alias, position) {
                        if *fvs != 0 {
                            selected
                                .entry((format!("{alias}_lvs"), position))
                                .or_default()
                                .push((*fvs, glyph.clone()));
                        }
                    }
                }
            }
            manual(c, locale, "lvs.", &selected);
        }
    }
    Ok(())
}

/// `_.manual.{prefix}{locale}` picks the variant for a letter and the FVS
/// after it; `III.fvs.{prefix}{locale}` runs it and validates the FVS.
fn manual(
    c: &mut Composer<'_>,
    locale: LocaleId,
    prefix: &str,
    selected: &IndexMap<(String, JoiningPosition), Vec<(Fvs, GlyphDescriptor)>>,
) {
    let manual_name = format!("_.manual.{prefix}{locale}");
    let mut manual = Lookup::new(manual_name.as_str());
    let mut apply = rclt(format!("III.fvs.{prefix}{locale}"));
    for ((letter, position), variants) in selected {
        let class = c.letter(locale, &format!("{letter}.{position}"));
        for (fvs, glyph) in variants {
            let selector = c.glyph(&format!("fvs{fvs}.ignored"));
            manual.push(
                Substitution::new()
                    .input(class.clone())
                    .slot(selector.clone())
                    .by(c.glyph(&glyph.to_string())),
            );
            apply.push(
                Substitution::new()
                    .input_with(class.clone(), manual_name.as_str())
                    .input_with(selector, "_.valid"),
            );
        }
    }
    c.add(manual);
    c.add(apply);
}
