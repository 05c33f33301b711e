//! Reference data records.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Deserialize;

use super::locale::LocaleId;
use crate::position::JoiningPosition;

/// Free variation selector index; 0 is the default variant.
pub type Fvs = u8;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WrittenUnitVariant {
    pub archaic: bool,
}

/// A character's alias, shared by every locale or given per locale namespace.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Alias {
    Common(String),
    Localized(BTreeMap<LocaleId, String>),
}

impl Alias {
    pub fn for_locale(&self, locale: LocaleId) -> Option<&str> {
        match self {
            Alias::Common(alias) => Some(alias),
            Alias::Localized(aliases) => aliases.get(&locale.namespace()).map(String::as_str),
        }
    }
}

/// "Reuse the written form of that variant."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantReference {
    pub position: JoiningPosition,
    pub fvs: Fvs,
    /// Take the locale's written override of the referenced variant.
    pub locale: Option<LocaleId>,
}

/// A written form: literal unit ids or a reference to another variant.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawWritten")]
pub enum Written {
    Units(Vec<String>),
    Reference(VariantReference),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawWritten {
    Units(Vec<String>),
    Reference(JoiningPosition, Fvs),
    LocalizedReference(JoiningPosition, Fvs, LocaleId),
}

impl From<RawWritten> for Written {
    fn from(raw: RawWritten) -> Self {
        match raw {
            RawWritten::Units(units) => Written::Units(units),
            RawWritten::Reference(position, fvs) => {
                Written::Reference(VariantReference { position, fvs, locale: None })
            }
            RawWritten::LocalizedReference(position, fvs, locale) => {
                Written::Reference(VariantReference { position, fvs, locale: Some(locale) })
            }
        }
    }
}

impl Written {
    pub fn units<S: Into<String>>(units: impl IntoIterator<Item = S>) -> Self {
        Written::Units(units.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VariantLocaleData {
    /// Locale-specific written form.
    pub written: Option<Written>,
    pub conditions: Vec<String>,
    /// Default variant of its position for this locale.
    pub default: bool,
    /// Takes part in long vowel sign ligation.
    pub lvs: bool,
    /// GB coding index.
    pub gb: Option<String>,
    /// EAC coding index.
    pub eac: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Variant {
    pub written: Written,
    #[serde(default)]
    pub locales: BTreeMap<LocaleId, VariantLocaleData>,
}

impl Variant {
    pub fn in_locale(&self, locale: LocaleId) -> bool {
        self.locales.contains_key(&locale)
    }

    pub fn in_any(&self, locales: &[LocaleId]) -> bool {
        locales.iter().any(|l| self.in_locale(*l))
    }

    pub fn has_condition(&self, locale: LocaleId, condition: &str) -> bool {
        self.locales
            .get(&locale)
            .is_some_and(|data| data.conditions.iter().any(|c| c == condition))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    /// Unicode character name.
    pub name: String,
    pub code_point: u32,
    pub alias: Alias,
    #[serde(default)]
    pub variants: BTreeMap<JoiningPosition, BTreeMap<Fvs, Variant>>,
}

impl Character {
    pub fn variant(&self, position: JoiningPosition, fvs: Fvs) -> Option<&Variant> {
        self.variants.get(&position)?.get(&fvs)
    }

    pub fn variants_at(&self, position: JoiningPosition) -> impl Iterator<Item = (Fvs, &Variant)> {
        self.variants.get(&position).into_iter().flatten().map(|(fvs, v)| (*fvs, v))
    }

    /// Whether any variant is used by one of `locales`.
    pub fn in_any(&self, locales: &[LocaleId]) -> bool {
        self.variants.values().flat_map(|m| m.values()).any(|v| v.in_any(locales))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Locale {
    pub conditions: Vec<String>,
    /// Category name to aliases, in declared order.
    pub categories: IndexMap<String, Vec<String>>,
}

/// Letters of a particle that take the `particle` condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticleRule {
    pub locale: LocaleId,
    /// The particle is introduced by a vowel separator.
    pub after_mvs: bool,
    pub aliases: Vec<String>,
    /// Indices into `aliases`; the table counts a leading separator.
    pub indices: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LigatureCategory {
    Required,
    Optional,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LigatureRule {
    pub category: LigatureCategory,
    /// Concatenated written units of the ligature.
    pub units: String,
    pub positions: Vec<JoiningPosition>,
}

/// On-disk shape of the reference data document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawReferenceData {
    pub written_units: IndexMap<String, BTreeMap<JoiningPosition, WrittenUnitVariant>>,
    pub locales: BTreeMap<LocaleId, Locale>,
    pub characters: Vec<Character>,
    #[serde(default)]
    pub particles: BTreeMap<LocaleId, IndexMap<String, Vec<usize>>>,
    #[serde(default)]
    pub ligatures: IndexMap<LigatureCategory, IndexMap<String, Vec<JoiningPosition>>>,
}
