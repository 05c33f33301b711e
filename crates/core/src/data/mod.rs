//! Reference data: written units, locales, characters and their variants,
//! particle and ligature tables.
//!
//! Loaded once and never mutated. Every table iterates in declared order.

mod load;
mod locale;
mod model;

use std::collections::BTreeMap;

use indexmap::IndexMap;

pub use locale::{LocaleId, normalize_locales};
pub use model::{
    Alias, Character, Fvs, LigatureCategory, LigatureRule, Locale, ParticleRule, Variant,
    VariantLocaleData, VariantReference, Written, WrittenUnitVariant,
};

use crate::{Error, Result, position::JoiningPosition};

/// Immutable catalog driving glyph set construction and rule compilation.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub written_units: IndexMap<String, BTreeMap<JoiningPosition, WrittenUnitVariant>>,
    pub locales: BTreeMap<LocaleId, Locale>,
    pub characters: Vec<Character>,
    pub particles: Vec<ParticleRule>,
    pub ligatures: Vec<LigatureRule>,
}

/// A written form resolved to literal units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedWritten {
    pub units: Vec<String>,
    /// Position of the referenced variant when the form was borrowed.
    pub position: Option<JoiningPosition>,
}

impl ReferenceData {
    pub fn is_unit(&self, id: &str) -> bool {
        self.written_units.contains_key(id)
    }

    pub fn locale(&self, locale: LocaleId) -> Option<&Locale> {
        self.locales.get(&locale)
    }

    /// The character known as `alias` in `locale`.
    pub fn character(&self, locale: LocaleId, alias: &str) -> Option<&Character> {
        self.characters
            .iter()
            .find(|c| c.alias.for_locale(locale) == Some(alias))
    }

    pub fn character_by_alias(&self, locale: LocaleId, alias: &str) -> Result<&Character> {
        self.character(locale, alias).ok_or_else(|| Error::UnknownAlias {
            locale: locale.to_string(),
            alias: alias.to_string(),
        })
    }

    pub fn character_by_code_point(&self, code_point: u32) -> Option<&Character> {
        self.characters.iter().find(|c| c.code_point == code_point)
    }

    /// Aliases listed under `category`, or nothing.
    pub fn category(&self, locale: LocaleId, category: &str) -> &[String] {
        self.locale(locale)
            .and_then(|l| l.categories.get(category))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// First vowel or consonant category listing `alias`.
    pub fn letter_category(&self, locale: LocaleId, alias: &str) -> Option<&str> {
        self.locale(locale)?
            .categories
            .iter()
            .filter(|(name, _)| is_letter_category(name))
            .find(|(_, aliases)| aliases.iter().any(|a| a == alias))
            .map(|(name, _)| name.as_str())
    }

    /// Vowels and consonants of `locale`, in category order.
    pub fn letters(&self, locale: LocaleId) -> Vec<&str> {
        self.aliases_where(locale, |neutral| is_letter_category(neutral))
    }

    /// Vowels of every gender.
    pub fn vowels(&self, locale: LocaleId) -> Vec<&str> {
        self.aliases_where(locale, |neutral| neutral == "vowel")
    }

    fn aliases_where(&self, locale: LocaleId, keep: impl Fn(&str) -> bool) -> Vec<&str> {
        let mut aliases: Vec<&str> = Vec::new();
        let Some(data) = self.locale(locale) else {
            return aliases;
        };
        for (category, listed) in &data.categories {
            if !keep(&gender_neutral(category)) {
                continue;
            }
            for alias in listed {
                if !aliases.contains(&alias.as_str()) {
                    aliases.push(alias);
                }
            }
        }
        aliases
    }

    pub fn declares_condition(&self, locale: LocaleId, condition: &str) -> bool {
        self.locale(locale)
            .is_some_and(|l| l.conditions.iter().any(|c| c == condition))
    }

    /// Resolve `written` to literal units, following at most one reference.
    pub fn resolve_written(&self, character: &Character, written: &Written) -> Result<ResolvedWritten> {
        let reference = match written {
            Written::Units(units) => {
                return Ok(ResolvedWritten { units: units.clone(), position: None });
            }
            Written::Reference(reference) => reference,
        };
        let unresolved = |reason: String| Error::UnresolvedReference {
            character: character.name.clone(),
            reason,
        };

        let target = character.variant(reference.position, reference.fvs).ok_or_else(|| {
            unresolved(format!("no variant {} {}", reference.position, reference.fvs))
        })?;
        let target_written = match reference.locale {
            None => &target.written,
            Some(locale) => {
                if !self.locales.contains_key(&locale) {
                    return Err(unresolved(format!("undeclared locale {locale}")));
                }
                target
                    .locales
                    .get(&locale)
                    .and_then(|data| data.written.as_ref())
                    .ok_or_else(|| {
                        unresolved(format!(
                            "variant {} {} has no {locale} written form",
                            reference.position, reference.fvs
                        ))
                    })?
            }
        };
        match target_written {
            Written::Units(units) => {
                Ok(ResolvedWritten { units: units.clone(), position: Some(reference.position) })
            }
            Written::Reference(_) => Err(unresolved(format!(
                "variant {} {} is itself a reference",
                reference.position, reference.fvs
            ))),
        }
    }

    /// Written form of a variant as used by `locale`, applying its override.
    pub fn variant_written(
        &self,
        character: &Character,
        variant: &Variant,
        locale: Option<LocaleId>,
    ) -> Result<ResolvedWritten> {
        let written = locale
            .and_then(|l| variant.locales.get(&l))
            .and_then(|data| data.written.as_ref())
            .unwrap_or(&variant.written);
        self.resolve_written(character, written)
    }

    /// Default variant of `character` at `position` for the requested locales,
    /// together with the locale whose written form names it.
    pub fn default_variant<'a>(
        &'a self,
        character: &'a Character,
        position: JoiningPosition,
        locales: &[LocaleId],
    ) -> Option<(Fvs, &'a Variant, LocaleId)> {
        for locale in locales {
            let flagged = character
                .variants_at(position)
                .find(|(_, v)| v.locales.get(locale).is_some_and(|data| data.default));
            if let Some((fvs, variant)) = flagged {
                return Some((fvs, variant, *locale));
            }
        }
        let available = |variant: &Variant| locales.iter().copied().find(|l| variant.in_locale(*l));
        if let Some(variant) = character.variant(position, 0) {
            if let Some(locale) = available(variant) {
                return Some((0, variant, locale));
            }
        }
        character
            .variants_at(position)
            .find_map(|(fvs, variant)| available(variant).map(|locale| (fvs, variant, locale)))
    }

    pub fn particles_of(&self, locale: LocaleId) -> impl Iterator<Item = &ParticleRule> {
        self.particles.iter().filter(move |p| p.locale == locale)
    }
}

fn is_letter_category(category: &str) -> bool {
    matches!(gender_neutral(category).as_str(), "vowel" | "consonant")
}

/// Category name with capitalised words removed (`vowelMasculine` → `vowel`).
///
/// A word is an upper-case letter followed by at least one lower-case letter,
/// so a trailing single capital survives (`vowelNeuterI` → `vowelI`).
pub fn gender_neutral(category: &str) -> String {
    let chars: Vec<char> = category.chars().collect();
    let mut neutral = String::with_capacity(category.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i].is_ascii_uppercase() && chars.get(i + 1).is_some_and(char::is_ascii_lowercase) {
            i += 1;
            while chars.get(i).is_some_and(char::is_ascii_lowercase) {
                i += 1;
            }
            continue;
        }
        neutral.push(chars[i]);
        i += 1;
    }
    neutral
}
