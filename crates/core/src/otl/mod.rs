//! Shaping rule compilation.
//!
//! Rules are generated phase by phase in the order a shaper applies them:
//! Ia (`ccmp` preprocessing), IIa (cursive joining), III (contextual passes
//! under `rclt`), IIb (ligatures and control cleanup) and Ib. Classes and
//! lookups are always referenced through the [`FeaBuilder`], which drops
//! anything that ends up empty, so every phase can be written against the
//! full data and still emit a valid file for any subset of locales.

mod ia;
mod iia;
mod iib;
mod iii;
mod ib;

use std::collections::HashMap;

use fea_composer::{FeaBuilder, GlyphSet, Lookup, LookupRef, Substitution};
use indexmap::IndexMap;
use log::{debug, info};

use crate::{
    Result,
    config::{
        DEFAULT_LANGUAGE, FEATURE_RCLT, FVSES, LVS_ALIAS, LVS_UNIT, MARKED_SUFFIX, MVS, NIRUGU,
        NNBSP, SCRIPT_TAG, ZWJ, ZWNJ,
    },
    data::{Fvs, LocaleId, ReferenceData, Variant, gender_neutral},
    glyph_name::GlyphDescriptor,
    glyph_set::SourceGlyphs,
    plan::{BuildPlan, GlyphCategory, GlyphSpec},
    position::{Fina, Isol, JoiningPosition, Medi},
};

/// Compile the shaping rules for `locales` on top of a glyph set plan.
///
/// Glyphs the rules introduce (marked letters, lvs ligatures, particle
/// forms) are added to the returned plan.
pub fn compile(
    data: &ReferenceData,
    existing: &[String],
    locales: &[LocaleId],
    plan: BuildPlan,
) -> Result<(BuildPlan, FeaBuilder)> {
    let mut composer = Composer {
        data,
        locales: locales.to_vec(),
        sources: SourceGlyphs::new(data, existing),
        plan,
        fea: FeaBuilder::new(),
        lvs: HashMap::new(),
    };
    composer.compose()?;
    info!(
        "Compiled {} classes and {} lookups for {}",
        composer.fea.classes().len(),
        composer.fea.lookups().count(),
        composer.locales.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
    );
    Ok((composer.plan, composer.fea))
}

/// A variant of a letter as used by one locale.
#[derive(Debug, Clone)]
pub(crate) struct LetterVariant<'a> {
    pub position: JoiningPosition,
    pub fvs: Fvs,
    pub variant: &'a Variant,
    pub glyph: GlyphDescriptor,
}

pub(crate) struct Composer<'a> {
    data: &'a ReferenceData,
    locales: Vec<LocaleId>,
    sources: SourceGlyphs,
    plan: BuildPlan,
    fea: FeaBuilder,
    /// Letter + lvs ligature glyphs by locale, letter alias and shaping
    /// position, with the selector of the variant they extend.
    lvs: HashMap<(LocaleId, String, JoiningPosition), Vec<(Fvs, GlyphDescriptor)>>,
}

/// Lookup registered under the contextual feature.
pub(crate) fn rclt(name: impl Into<String>) -> Lookup {
    Lookup::new(name).feature(FEATURE_RCLT)
}

/// Reference to a per-locale condition lookup (`MNG:chachlag`).
pub(crate) fn condition(locale: LocaleId, name: &str) -> LookupRef {
    LookupRef::new(format!("{locale}:{name}"))
}

fn or_all(positions: &[JoiningPosition]) -> &[JoiningPosition] {
    if positions.is_empty() { &JoiningPosition::ALL } else { positions }
}

impl<'a> Composer<'a> {
    fn compose(&mut self) -> Result<()> {
        self.init_language_systems();
        self.init_controls();
        self.init_variants()?;
        self.init_conditions()?;

        ia::compose(self);
        iia::compose(self)?;
        iii::compose(self)?;
        iib::compose(self)?;
        ib::compose(self);

        self.fea.set_gdef(self.plan.gdef_classes());
        Ok(())
    }

    pub(crate) fn locales(&self) -> &[LocaleId] {
        &self.locales
    }

    pub(crate) fn requested(&self, locale: LocaleId) -> bool {
        self.locales.contains(&locale)
    }

    /// The requested locales among `candidates`.
    pub(crate) fn among(&self, candidates: &[LocaleId]) -> Vec<LocaleId> {
        candidates.iter().copied().filter(|l| self.requested(*l)).collect()
    }

    pub(crate) fn available(&self, name: &str) -> bool {
        self.sources.contains(name) || self.plan.contains(name)
    }

    /// `name` if the font will have it, else nothing.
    pub(crate) fn glyph(&self, name: &str) -> GlyphSet {
        if self.available(name) { GlyphSet::glyph(name) } else { GlyphSet::new() }
    }

    pub(crate) fn glyphs<S: AsRef<str>>(&self, names: impl IntoIterator<Item = S>) -> GlyphSet {
        names
            .into_iter()
            .filter(|name| self.available(name.as_ref()))
            .map(|name| name.as_ref().to_string())
            .collect()
    }

    pub(crate) fn class(&self, name: &str) -> GlyphSet {
        self.fea.class(name)
    }

    /// A per-locale class such as `MNG-a.isol` or `MNG-consonant.init`.
    pub(crate) fn letter(&self, locale: LocaleId, name: &str) -> GlyphSet {
        self.fea.class(&format!("{locale}-{name}"))
    }

    /// Positional classes of `aliases`. Without positions, the whole-letter
    /// classes are used.
    pub(crate) fn variants(
        &self,
        locale: LocaleId,
        aliases: &[&str],
        positions: &[JoiningPosition],
    ) -> GlyphSet {
        let mut glyphs = GlyphSet::new();
        for alias in aliases {
            if positions.is_empty() {
                glyphs.extend(self.letter(locale, alias));
            }
            for position in positions {
                glyphs.extend(self.letter(locale, &format!("{alias}.{position}")));
            }
        }
        glyphs
    }

    pub(crate) fn category(&self, locale: LocaleId, name: &str) -> Vec<&'a str> {
        let data = self.data;
        data.category(locale, name).iter().map(String::as_str).collect()
    }

    /// Union of several categories, keeping the first occurrence of an alias.
    pub(crate) fn categories(&self, locale: LocaleId, names: &[&str]) -> Vec<&'a str> {
        let mut aliases: Vec<&'a str> = vec![];
        for name in names {
            for alias in self.category(locale, name) {
                if !aliases.contains(&alias) {
                    aliases.push(alias);
                }
            }
        }
        aliases
    }

    pub(crate) fn letters(&self, locale: LocaleId) -> Vec<&'a str> {
        let data = self.data;
        data.letters(locale)
    }

    pub(crate) fn vowels(&self, locale: LocaleId) -> Vec<&'a str> {
        let data = self.data;
        data.vowels(locale)
    }

    pub(crate) fn add(&mut self, lookup: Lookup) -> Option<LookupRef> {
        self.fea.add_lookup(lookup)
    }

    pub(crate) fn define_class(&mut self, name: impl Into<String>, members: impl Into<GlyphSet>) -> GlyphSet {
        self.fea.define_class(name, members)
    }

    /// Plan `name` unless the font already has it, then record its category.
    pub(crate) fn add_glyph(&mut self, name: &str, spec: GlyphSpec, category: GlyphCategory) {
        if !self.available(name) {
            self.plan.add_glyph(name, spec);
        }
        self.plan.set_category(name, category);
    }

    pub(crate) fn data(&self) -> &'a ReferenceData {
        self.data
    }

    pub(crate) fn sources(&self) -> &SourceGlyphs {
        &self.sources
    }

    /// Letter + lvs glyphs of `alias` at `position`, with their selectors.
    pub(crate) fn lvs_variants(&self, locale: LocaleId, alias: &str, position: JoiningPosition) -> &[(Fvs, GlyphDescriptor)] {
        self.lvs.get(&(locale, alias.to_string(), position)).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every variant of the letter `alias` that `locale` uses.
    pub(crate) fn letter_variants(&self, locale: LocaleId, alias: &str) -> Result<Vec<LetterVariant<'a>>> {
        let data = self.data;
        let Some(character) = data.character(locale, alias) else {
            return Ok(vec![]);
        };
        let mut found = vec![];
        for (&position, variants) in &character.variants {
            for (&fvs, variant) in variants {
                if variant.in_locale(locale) {
                    let glyph = GlyphDescriptor::from_variant(data, character, position, variant, Some(locale))?;
                    found.push(LetterVariant { position, fvs, variant, glyph });
                }
            }
        }
        Ok(found)
    }

    /// Default glyph of the letter `alias` at `position` in `locale`.
    pub(crate) fn default_glyph(
        &self,
        locale: LocaleId,
        alias: &str,
        position: JoiningPosition,
    ) -> Result<Option<GlyphDescriptor>> {
        let data = self.data;
        let Some(character) = data.character(locale, alias) else {
            return Ok(None);
        };
        match data.default_variant(character, position, &[locale]) {
            Some((_, variant, used)) => {
                Ok(Some(GlyphDescriptor::from_variant(data, character, position, variant, Some(used))?))
            }
            None => Ok(None),
        }
    }

    /// Name of a default glyph, as a set usable in a rule.
    pub(crate) fn default_set(&self, locale: LocaleId, alias: &str, position: JoiningPosition) -> Result<GlyphSet> {
        Ok(match self.default_glyph(locale, alias, position)? {
            Some(glyph) => self.glyph(&glyph.to_string()),
            None => GlyphSet::new(),
        })
    }

    /// Gender-marked copy of a Hudum default glyph, planned on first use.
    pub(crate) fn marked_glyph(&mut self, alias: &str, position: JoiningPosition) -> Result<GlyphSet> {
        let Some(unmarked) = self.default_glyph(LocaleId::Mng, alias, position)? else {
            return Ok(GlyphSet::new());
        };
        let base = unmarked.to_string();
        if !self.available(&base) {
            return Ok(GlyphSet::new());
        }
        let name = unmarked.with_suffix(MARKED_SUFFIX).to_string();
        self.add_glyph(&name, GlyphSpec::composite([base]), GlyphCategory::Base);
        Ok(GlyphSet::glyph(name))
    }

    /// Variant and lvs ligature glyphs of `aliases` (all letters when
    /// `None`) whose written form is one of `writtens`.
    pub(crate) fn written_glyphs(
        &self,
        locale: LocaleId,
        writtens: &[&str],
        positions: &[JoiningPosition],
        aliases: Option<&[&str]>,
    ) -> Result<Vec<GlyphDescriptor>> {
        let letters = self.letters(locale);
        let aliases = aliases.unwrap_or(letters.as_slice());
        let mut glyphs: Vec<GlyphDescriptor> = vec![];
        for alias in aliases {
            let variants = self.letter_variants(locale, alias)?;
            for &position in or_all(positions) {
                let lvs = self.lvs_variants(locale, alias, position);
                for written in writtens {
                    let matching = variants
                        .iter()
                        .filter(|v| v.position == position)
                        .map(|v| &v.glyph)
                        .chain(lvs.iter().map(|(_, glyph)| glyph))
                        .filter(|glyph| glyph.written() == *written && self.available(&glyph.to_string()));
                    for glyph in matching {
                        if !glyphs.contains(glyph) {
                            glyphs.push(glyph.clone());
                        }
                    }
                }
            }
        }
        Ok(glyphs)
    }

    /// [`Composer::written_glyphs`] as a glyph set.
    pub(crate) fn writtens(
        &self,
        locale: LocaleId,
        writtens: &[&str],
        positions: &[JoiningPosition],
        aliases: Option<&[&str]>,
    ) -> Result<GlyphSet> {
        let glyphs = self.written_glyphs(locale, writtens, positions, aliases)?;
        Ok(glyphs.iter().map(ToString::to_string).collect())
    }

    /// Variant glyphs of `aliases` whose written units satisfy `keep`.
    pub(crate) fn writtens_where(
        &self,
        locale: LocaleId,
        positions: &[JoiningPosition],
        aliases: &[&str],
        keep: impl Fn(&[String]) -> bool,
    ) -> Result<GlyphSet> {
        let mut glyphs = GlyphSet::new();
        for alias in aliases {
            let variants = self.letter_variants(locale, alias)?;
            for &position in or_all(positions) {
                for v in variants.iter().filter(|v| v.position == position && keep(&v.glyph.units)) {
                    glyphs.extend(self.glyph(&v.glyph.to_string()));
                }
            }
        }
        Ok(glyphs)
    }

    /// [`Composer::writtens`] for the letter encoded at `code_point`.
    pub(crate) fn code_point_writtens(
        &self,
        locale: LocaleId,
        code_point: u32,
        written: &str,
        position: JoiningPosition,
    ) -> Result<GlyphSet> {
        let data = self.data;
        let Some(alias) = data.character_by_code_point(code_point).and_then(|c| c.alias.for_locale(locale)) else {
            return Ok(GlyphSet::new());
        };
        self.writtens(locale, &[written], &[position], Some(&[alias][..]))
    }

    fn init_language_systems(&mut self) {
        self.fea.language_system(SCRIPT_TAG, DEFAULT_LANGUAGE);
        for locale in &self.locales {
            self.fea.language_system(SCRIPT_TAG, locale.namespace().as_str());
        }
    }

    /// Control classes and the state-switching lookups other phases nest.
    fn init_controls(&mut self) {
        let mut fvs = GlyphSet::new();
        for selector in FVSES {
            let members = self.glyphs([selector.to_string(), format!("{selector}.valid"), format!("{selector}.ignored")]);
            fvs.extend(self.fea.define_class(selector, members));
        }
        let narrow = format!("{MVS}.narrow");
        let wide = format!("{MVS}.wide");
        let (narrow, wide) = (narrow.as_str(), wide.as_str());
        let classes = [
            ("mvs", self.glyphs([MVS, narrow, wide, NNBSP])),
            ("mvs.invalid", self.glyphs([MVS, NNBSP])),
            ("mvs.valid", self.glyphs([narrow, wide])),
            ("fvs.invalid", self.glyphs(FVSES)),
            ("fvs.valid", self.glyphs(FVSES.map(|s| format!("{s}.valid")))),
            ("fvs.ignored", self.glyphs(FVSES.map(|s| format!("{s}.ignored")))),
        ];
        for (name, members) in classes {
            self.fea.define_class(name, members);
        }
        self.fea.define_class("fvs", fvs);

        let mut ignored = Lookup::new("_.ignored");
        for control in [NIRUGU, ZWJ, ZWNJ] {
            ignored.push(self.substitution(control, &format!("{control}.ignored")));
        }
        for selector in FVSES {
            let target = format!("{selector}.ignored");
            ignored.push(self.substitution(selector, &target));
            ignored.push(self.substitution(&format!("{selector}.valid"), &target));
        }
        self.add(ignored);

        let mut valid = Lookup::new("_.valid");
        for selector in FVSES {
            let target = format!("{selector}.valid");
            valid.push(self.substitution(selector, &target));
            valid.push(self.substitution(&format!("{selector}.ignored"), &target));
        }
        self.add(valid);

        let mut reset = Lookup::new("_.reset");
        reset.push(self.substitution(narrow, MVS));
        reset.push(self.substitution(wide, MVS));
        reset.push(self.substitution(&format!("{NIRUGU}.ignored"), NIRUGU));
        for selector in FVSES {
            reset.push(self.substitution(&format!("{selector}.ignored"), selector));
            reset.push(self.substitution(&format!("{selector}.valid"), selector));
        }
        self.add(reset);

        for (name, target, others) in [("_.narrow", narrow, [MVS, wide, NNBSP]), ("_.wide", wide, [MVS, narrow, NNBSP])] {
            let mut lookup = Lookup::new(name);
            for source in others {
                lookup.push(self.substitution(source, target));
            }
            self.add(lookup);
        }
    }

    /// `sub from by to`, empty unless both glyphs exist.
    fn substitution(&self, from: &str, to: &str) -> Substitution {
        Substitution::new().slot(self.glyph(from)).by(self.glyph(to))
    }

    /// Letter classes per locale: positional, whole-letter, lvs and category
    /// classes (`MNG-a.isol`, `MNG-a`, `TOD-a_lvs.init`, `MNG-vowel.fina`).
    fn init_variants(&mut self) -> Result<()> {
        let data = self.data;
        for locale in self.locales.clone() {
            let mut grouped: IndexMap<String, GlyphSet> = IndexMap::new();
            for alias in self.letters(locale) {
                let Some(category) = data.letter_category(locale, alias) else {
                    continue;
                };
                let neutral = gender_neutral(category);
                let letter = format!("{locale}-{alias}");
                let variants = self.letter_variants(locale, alias)?;

                let mut whole = GlyphSet::new();
                let mut whole_lvs = GlyphSet::new();
                for position in JoiningPosition::ALL {
                    let at: Vec<&LetterVariant> = variants.iter().filter(|v| v.position == position).collect();
                    let members = self.glyphs(at.iter().map(|v| v.glyph.to_string()));
                    let class = self.fea.define_class(format!("{letter}.{position}"), members);
                    grouped.entry(format!("{locale}-{neutral}.{position}")).or_default().extend(class.clone());
                    whole.extend(class);

                    let mut lvs = GlyphSet::new();
                    for v in at.iter().filter(|v| v.variant.locales.get(&locale).is_some_and(|d| d.lvs)) {
                        if let Some(glyph) = self.lvs_glyph(locale, alias, position, v.fvs, &v.glyph)? {
                            lvs.push_glyph(glyph);
                        }
                    }
                    whole_lvs.extend(self.fea.define_class(format!("{letter}_lvs.{position}"), lvs));
                }

                let class = self.fea.define_class(letter.clone(), whole);
                if neutral != category {
                    grouped.entry(format!("{locale}-{neutral}")).or_default().extend(class.clone());
                }
                grouped.entry(format!("{locale}-{category}")).or_default().extend(class);
                self.fea.define_class(format!("{letter}_lvs"), whole_lvs);
            }
            for (name, members) in grouped {
                self.fea.define_class(name, members);
            }
        }
        Ok(())
    }

    /// Letter followed by the long vowel sign, drawn as the variant glyph
    /// plus the sign's default glyph.
    fn lvs_glyph(
        &mut self,
        locale: LocaleId,
        alias: &str,
        position: JoiningPosition,
        fvs: Fvs,
        base: &GlyphDescriptor,
    ) -> Result<Option<String>> {
        let data = self.data;
        let Some(sign) = data.character(locale, LVS_ALIAS) else {
            return Ok(None);
        };
        let mut code_points = base.code_points.clone();
        code_points.push(sign.code_point);
        let mut units = base.units.clone();
        units.push(LVS_UNIT.to_string());
        let glyph = GlyphDescriptor::new(code_points, units, base.position);
        let name = glyph.to_string();

        let sign_position = if matches!(base.position, Isol | Fina) { Fina } else { Medi };
        let mut components = vec![base.to_string()];
        if let Some(sign_glyph) = self.default_glyph(locale, LVS_ALIAS, sign_position)? {
            components.push(sign_glyph.to_string());
        }
        self.add_glyph(&name, GlyphSpec::composite(components), GlyphCategory::Ligature);
        self.lvs.entry((locale, alias.to_string(), position)).or_default().push((fvs, glyph));
        Ok(Some(name))
    }

    /// One lookup per declared condition, mapping each positional class to
    /// the variant carrying the condition, plus `MNG:reset` back to defaults.
    fn init_conditions(&mut self) -> Result<()> {
        let data = self.data;
        for locale in self.locales.clone() {
            let Some(declared) = data.locale(locale) else {
                continue;
            };
            for name in &declared.conditions {
                let mut lookup = Lookup::new(format!("{locale}:{name}"));
                for alias in self.letters(locale) {
                    for v in self.letter_variants(locale, alias)? {
                        if v.variant.has_condition(locale, name) {
                            let class = self.letter(locale, &format!("{alias}.{}", v.position));
                            lookup.push(Substitution::new().slot(class).by(self.glyph(&v.glyph.to_string())));
                        }
                    }
                }
                if self.add(lookup).is_none() {
                    debug!("{locale}:{name} has no variants");
                }
            }
        }

        if self.requested(LocaleId::Mng) {
            let mut reset = Lookup::new("MNG:reset");
            for position in JoiningPosition::ALL {
                for alias in self.letters(LocaleId::Mng) {
                    let class = self.letter(LocaleId::Mng, &format!("{alias}.{position}"));
                    reset.push(Substitution::new().slot(class).by(self.default_set(LocaleId::Mng, alias, position)?));
                }
            }
            self.add(reset);
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use fea_composer::Shaper;
    use serde_json::json;

    use super::*;
    use crate::glyph_set::construct_glyph_set;

    /// A small Hudum, Ali Gali and Todo catalog exercising every phase.
    pub(crate) fn data() -> ReferenceData {
        ReferenceData::from_value(json!({
            "writtenUnits": { "A": {}, "Aa": {}, "I": {}, "O": {}, "N": {}, "G": {}, "Gx": {}, "Lv": {}, "W": {} },
            "locales": {
                "MNG": {
                    "conditions": ["chachlag", "marked", "particle"],
                    "categories": {
                        "vowelMasculine": ["a", "o"],
                        "vowelNeuter": ["i"],
                        "consonant": ["n", "g"]
                    }
                },
                "MNGx": {
                    "categories": { "vowelMasculine": ["a"], "consonant": ["waX"] }
                },
                "TOD": {
                    "categories": { "vowel": ["a"], "consonant": ["n"], "lvs": ["a"] }
                }
            },
            "characters": [
                {
                    "name": "MONGOLIAN LETTER A",
                    "codePoint": 0x1820,
                    "alias": "a",
                    "variants": {
                        "isol": {
                            "0": { "written": ["A", "A"], "locales": { "MNG": {}, "TOD": {} } },
                            "1": { "written": ["Aa"], "locales": { "MNG": { "conditions": ["chachlag"] } } }
                        },
                        "init": { "0": { "written": ["A"], "locales": { "MNG": {}, "TOD": { "lvs": true } } } },
                        "medi": { "0": { "written": ["A"], "locales": { "MNG": {}, "TOD": { "lvs": true } } } },
                        "fina": { "0": { "written": ["A"], "locales": { "MNG": {}, "MNGx": {}, "TOD": {} } } }
                    }
                },
                {
                    "name": "MONGOLIAN LETTER I",
                    "codePoint": 0x1822,
                    "alias": "i",
                    "variants": {
                        "init": { "0": { "written": ["I"], "locales": { "MNG": {} } } },
                        "medi": { "0": { "written": ["I"], "locales": { "MNG": {} } } },
                        "fina": { "0": { "written": ["I"], "locales": { "MNG": {} } } }
                    }
                },
                {
                    "name": "MONGOLIAN LETTER O",
                    "codePoint": 0x1823,
                    "alias": "o",
                    "variants": {
                        "medi": {
                            "0": { "written": ["O"], "locales": { "MNG": {} } },
                            "1": { "written": ["A"], "locales": { "MNG": { "conditions": ["marked"] } } }
                        },
                        "fina": { "0": { "written": ["O"], "locales": { "MNG": {} } } }
                    }
                },
                {
                    "name": "MONGOLIAN LETTER NA",
                    "codePoint": 0x1828,
                    "alias": "n",
                    "variants": {
                        "init": {
                            "0": { "written": ["N"], "locales": { "MNG": {}, "TOD": {} } },
                            "1": { "written": ["I"], "locales": { "MNG": { "conditions": ["particle"] } } }
                        },
                        "medi": { "0": { "written": ["N"], "locales": { "MNG": {}, "TOD": {} } } },
                        "fina": { "0": { "written": ["N"], "locales": { "MNG": {}, "TOD": {} } } }
                    }
                },
                {
                    "name": "MONGOLIAN LETTER GA",
                    "codePoint": 0x182D,
                    "alias": "g",
                    "variants": {
                        "init": { "0": { "written": ["G"], "locales": { "MNG": {} } } },
                        "medi": {
                            "0": { "written": ["G"], "locales": { "MNG": {} } },
                            "1": { "written": ["Gx"], "locales": { "MNG": {} } }
                        },
                        "fina": { "0": { "written": ["G"], "locales": { "MNG": {} } } }
                    }
                },
                {
                    "name": "MONGOLIAN LETTER WA",
                    "codePoint": 0x1838,
                    "alias": "waX",
                    "variants": {
                        "init": { "0": { "written": ["W"], "locales": { "MNGx": {} } } },
                        "medi": { "0": { "written": ["W"], "locales": { "MNGx": {} } } }
                    }
                },
                {
                    "name": "MONGOLIAN LETTER TODO LONG VOWEL SIGN",
                    "codePoint": 0x1843,
                    "alias": "lvs",
                    "variants": {
                        "medi": { "0": { "written": ["Lv"], "locales": { "TOD": {} } } },
                        "fina": { "0": { "written": ["Lv"], "locales": { "TOD": {} } } }
                    }
                }
            ],
            "particles": { "MNG": { "mvs n i": [1] } },
            "ligatures": { "optional": { "NI": ["init"] } }
        }))
        .unwrap()
    }

    /// Written-unit glyphs for every unit and position, plus the controls.
    pub(crate) fn sources() -> Vec<String> {
        let mut names: Vec<String> = ["mvs", "nnbsp", "nirugu", "zwj", "zwnj", "fvs1", "fvs2", "fvs3", "fvs4"]
            .iter()
            .map(|n| n.to_string())
            .collect();
        for unit in ["A", "Aa", "I", "O", "N", "G", "Gx", "Lv", "W"] {
            for position in JoiningPosition::ALL {
                names.push(format!("_{unit}.{position}"));
            }
        }
        names
    }

    pub(crate) fn compose(locales: &[LocaleId]) -> (BuildPlan, FeaBuilder) {
        let data = data();
        let existing = sources();
        let plan = construct_glyph_set(&data, &existing, locales).unwrap();
        compile(&data, &existing, locales, plan).unwrap()
    }

    pub(crate) fn shape(fea: &FeaBuilder, glyphs: &[&str]) -> Vec<String> {
        let mut buffer: Vec<String> = glyphs.iter().map(|g| g.to_string()).collect();
        Shaper::new(fea).apply_features(&["rclt"], &mut buffer);
        buffer
    }

    #[test]
    fn test_letter_classes() {
        let (_, fea) = compose(&[LocaleId::Mng]);
        let flat = |name: &str| fea.flatten(&GlyphSet::class(name));
        assert_eq!(flat("MNG-a.isol"), ["u1820.AA.isol", "u1820.Aa.isol"]);
        assert_eq!(flat("MNG-o.medi"), ["u1823.O.medi", "u1823.A.medi"]);
        assert!(flat("MNG-vowel.fina").contains(&"u1822.I.fina".to_string()));
        assert!(fea.has_class("MNG-vowelMasculine"));
        assert!(fea.has_class("MNG-vowel"));
        assert!(fea.has_class("MNG-consonant.init"));
        assert!(!fea.has_class("TOD-a"));
    }

    #[test]
    fn test_control_classes() {
        let (_, fea) = compose(&[LocaleId::Mng]);
        assert_eq!(fea.flatten(&GlyphSet::class("mvs")), ["mvs", "mvs.narrow", "mvs.wide", "nnbsp"]);
        assert_eq!(fea.flatten(&GlyphSet::class("fvs")).len(), 12);
        assert!(fea.has_lookup("_.ignored"));
        assert!(fea.has_lookup("_.reset"));
    }

    #[test]
    fn test_condition_lookups() {
        let (_, fea) = compose(&[LocaleId::Mng]);
        let shaper = Shaper::new(&fea);
        let mut buffer = vec!["u1820.AA.isol".to_string()];
        assert!(shaper.apply_named("MNG:chachlag", &mut buffer));
        assert_eq!(buffer, ["u1820.Aa.isol"]);
        assert!(shaper.apply_named("MNG:reset", &mut buffer));
        assert_eq!(buffer, ["u1820.AA.isol"]);
    }

    #[test]
    fn test_writtens() {
        let data = data();
        let existing = sources();
        let plan = construct_glyph_set(&data, &existing, &[LocaleId::Mng]).unwrap();
        let composer = Composer {
            data: &data,
            locales: vec![LocaleId::Mng],
            sources: SourceGlyphs::new(&data, &existing),
            plan,
            fea: FeaBuilder::new(),
            lvs: HashMap::new(),
        };
        let found = composer.writtens(LocaleId::Mng, &["A"], &[Medi], None).unwrap();
        assert_eq!(found.to_string(), "[u1820.A.medi u1823.A.medi]");
        let found = composer.writtens(LocaleId::Mng, &["A"], &[], Some(&["o"])).unwrap();
        assert_eq!(found.to_string(), "u1823.A.medi");
        assert!(composer.writtens(LocaleId::Tod, &["A"], &[], None).unwrap().is_empty());
    }

    #[test]
    fn test_lvs_glyphs() {
        let (plan, fea) = compose(&[LocaleId::Tod]);
        let ligature = &plan.new_glyphs["u1820_u1843.ALv.init"];
        assert_eq!(ligature.components, ["u1820.A.init", "u1843.Lv.medi"]);
        assert_eq!(plan.categories["u1820_u1843.ALv.init"], GlyphCategory::Ligature);
        assert_eq!(fea.flatten(&GlyphSet::class("TOD-a_lvs")), ["u1820_u1843.ALv.init", "u1820_u1843.ALv.medi"]);
    }

    #[test]
    fn test_language_systems() {
        let (_, fea) = compose(&[LocaleId::Mng, LocaleId::Tod]);
        let text = fea.emit_text();
        assert!(text.starts_with("languagesystem mong dflt;\nlanguagesystem mong MNG;\nlanguagesystem mong TOD;\n"));
    }
}
