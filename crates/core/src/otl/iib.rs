//! Phase IIb: ligatures and control cleanup.

use fea_composer::{GlyphSet, Lookup, Substitution};
use indexmap::IndexMap;
use log::{debug, warn};

use super::{Composer, rclt};
use crate::{
    Error, Result,
    config::NIRUGU,
    data::{
        LigatureCategory,
        LocaleId::{self, Mch, MngX},
    },
    glyph_name::{GlyphDescriptor, ligate_parts},
    plan::{GlyphCategory, GlyphSpec},
    written::{Segment, split_written_units, written_combinations},
};

/// Ligatures drawn by some Ali Gali and Manchu fonts that no written form
/// describes: locale, parts and ligature.
const FIXED_LIGATURES: [(LocaleId, [&str; 2], &str); 5] = [
    (MngX, ["u18A6.Wp.medi", "u1820.A.fina"], "u18A6_u1820.WpA.fina"),
    (MngX, ["u188A.NG.init", "u1820.Aa.fina"], "u188A_u1820.NGAa.isol"),
    (MngX, ["u188A.NG.medi", "u1820.Aa.fina"], "u188A_u1820.NGAa.fina"),
    (Mch, ["u186F.Zs.init", "u1873.I.fina"], "u186F_u1873.Zs.isol"),
    (Mch, ["u186F.Zs.medi", "u1873.I.fina"], "u186F_u1873.Zs.fina"),
];

pub(super) fn compose(c: &mut Composer<'_>) -> Result<()> {
    ligatures(c)?;

    let controls = GlyphSet::union([c.glyph(&format!("{NIRUGU}.ignored")), c.class("fvs.ignored")]);
    let mut lookup = rclt("IIb.controls.postprocessing");
    lookup.push(Substitution::new().input_with(controls, "_.reset"));
    c.add(lookup);
    Ok(())
}

/// Two-part ligatures of every listed written form, keyed by their parts.
fn collect(c: &Composer<'_>) -> Result<IndexMap<Vec<GlyphDescriptor>, (GlyphDescriptor, LigatureCategory)>> {
    let mut found = IndexMap::new();
    let data = c.data();
    for &locale in c.locales() {
        let vowels = c.vowels(locale);
        for rule in &data.ligatures {
            let units = split_written_units(&rule.units);
            for &position in &rule.positions {
                for segments in written_combinations(&units, position) {
                    let [first, second] = segments.as_slice() else {
                        continue;
                    };
                    let parts = |segment: &Segment| -> Result<Vec<GlyphDescriptor>> {
                        let written = segment.written();
                        let glyphs = c.written_glyphs(locale, &[written.as_str()], &[segment.position], None)?;
                        Ok(glyphs.into_iter().filter(|g| g.suffixes.is_empty()).collect())
                    };
                    let seconds: Vec<GlyphDescriptor> = parts(second)?
                        .into_iter()
                        .filter(|g| rule.category != LigatureCategory::Required || starts_with_vowel(c, locale, g, &vowels))
                        .collect();
                    for head in parts(first)? {
                        for tail in &seconds {
                            let pair = vec![head.clone(), tail.clone()];
                            let ligature = ligate_parts(&pair)?;
                            found.insert(pair, (ligature, rule.category));
                        }
                    }
                }
            }
        }
    }
    Ok(found)
}

fn starts_with_vowel(c: &Composer<'_>, locale: LocaleId, glyph: &GlyphDescriptor, vowels: &[&str]) -> bool {
    glyph
        .code_points
        .first()
        .and_then(|cp| c.data().character_by_code_point(*cp))
        .and_then(|character| character.alias.for_locale(locale))
        .is_some_and(|alias| vowels.contains(&alias))
}

fn ligatures(c: &mut Composer<'_>) -> Result<()> {
    let found = collect(c)?;
    let filter = GlyphSet::union([c.glyph(&format!("{NIRUGU}.ignored")), c.class("fvs.ignored")]);
    let mut lookup = rclt("IIb.ligature").mark_filtering_set(filter);

    for (parts, (ligature, category)) in found {
        let name = ligature.to_string();
        if c.available(&name) {
            c.add_glyph(&name, GlyphSpec::empty(), GlyphCategory::Ligature);
        } else if category == LigatureCategory::Required {
            let Some(source) = c.sources().find_written(&ligature).map(ToString::to_string) else {
                return Err(Error::RequiredLigature(name));
            };
            debug!("{name}: drawn as {source}");
            c.add_glyph(&name, GlyphSpec::composite([source]), GlyphCategory::Ligature);
        } else {
            warn!("Optional ligature {name} has no glyph, skipping");
            continue;
        }
        let rule = parts
            .iter()
            .fold(Substitution::new(), |rule, part| rule.slot(c.glyph(&part.to_string())));
        lookup.push(rule.by(c.glyph(&name)));
    }

    for (locale, parts, ligature) in FIXED_LIGATURES {
        if !c.requested(locale) || !c.available(ligature) {
            continue;
        }
        if let Some(missing) = parts.iter().find(|part| !c.available(part)) {
            debug!("{ligature}: no {missing}, skipping");
            continue;
        }
        c.add_glyph(ligature, GlyphSpec::empty(), GlyphCategory::Ligature);
        let rule = parts.iter().fold(Substitution::new(), |rule, part| rule.slot(c.glyph(part)));
        lookup.push(rule.by(c.glyph(ligature)));
    }
    c.add(lookup);
    Ok(())
}
