//! Locale identifiers.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A writing tradition. Declaration order is the iteration order of every
/// per-locale pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum LocaleId {
    /// Hudum
    #[serde(rename = "MNG")]
    #[cfg_attr(feature = "clap", value(name = "MNG"))]
    Mng,
    /// Hudum Ali Gali
    #[serde(rename = "MNGx")]
    #[cfg_attr(feature = "clap", value(name = "MNGx"))]
    MngX,
    /// Todo
    #[serde(rename = "TOD")]
    #[cfg_attr(feature = "clap", value(name = "TOD"))]
    Tod,
    /// Todo Ali Gali
    #[serde(rename = "TODx")]
    #[cfg_attr(feature = "clap", value(name = "TODx"))]
    TodX,
    /// Sibe
    #[serde(rename = "SIB")]
    #[cfg_attr(feature = "clap", value(name = "SIB"))]
    Sib,
    /// Manchu
    #[serde(rename = "MCH")]
    #[cfg_attr(feature = "clap", value(name = "MCH"))]
    Mch,
    /// Manchu Ali Gali
    #[serde(rename = "MCHx")]
    #[cfg_attr(feature = "clap", value(name = "MCHx"))]
    MchX,
}

impl LocaleId {
    pub const ALL: [LocaleId; 7] = [
        LocaleId::Mng,
        LocaleId::MngX,
        LocaleId::Tod,
        LocaleId::TodX,
        LocaleId::Sib,
        LocaleId::Mch,
        LocaleId::MchX,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LocaleId::Mng => "MNG",
            LocaleId::MngX => "MNGx",
            LocaleId::Tod => "TOD",
            LocaleId::TodX => "TODx",
            LocaleId::Sib => "SIB",
            LocaleId::Mch => "MCH",
            LocaleId::MchX => "MCHx",
        }
    }

    /// The base locale sharing this locale's aliases (`MNGx` → `MNG`).
    pub fn namespace(self) -> LocaleId {
        match self {
            LocaleId::MngX => LocaleId::Mng,
            LocaleId::TodX => LocaleId::Tod,
            LocaleId::MchX => LocaleId::Mch,
            other => other,
        }
    }

    /// Ali Gali locales transcribe foreign sounds on top of a base locale.
    pub fn is_ali_gali(self) -> bool {
        self.namespace() != self
    }
}

impl Display for LocaleId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocaleId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        LocaleId::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| Error::UnknownLocale(s.to_string()))
    }
}

/// Sort `locales` into declared order, drop duplicates and check that every
/// Ali Gali locale comes with its base locale.
pub fn normalize_locales(locales: &[LocaleId]) -> Result<Vec<LocaleId>> {
    let mut sorted = locales.to_vec();
    sorted.sort();
    sorted.dedup();
    for locale in &sorted {
        let base = locale.namespace();
        if !sorted.contains(&base) {
            return Err(Error::MissingBaseLocale(locale.to_string(), base.to_string()));
        }
    }
    Ok(sorted)
}
