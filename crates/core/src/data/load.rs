//! Reading and validating reference data.

use std::{fs, path::Path};

use log::{debug, info};

use super::{
    LigatureRule, ParticleRule, ReferenceData, Written,
    model::{Character, RawReferenceData, Variant},
};
use crate::{Error, Result, config::MVS, written::split_written_units};

impl ReferenceData {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let data = Self::from_json(&text)?;
        info!(
            "Loaded {} characters and {} locales from {}",
            data.characters.len(),
            data.locales.len(),
            path.display()
        );
        Ok(data)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Self::from_raw(serde_json::from_str(text)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Self::from_raw(serde_json::from_value(value)?)
    }

    fn from_raw(raw: RawReferenceData) -> Result<Self> {
        let particles = raw
            .particles
            .into_iter()
            .flat_map(|(locale, table)| {
                table.into_iter().map(move |(sequence, indices)| {
                    let mut aliases: Vec<String> =
                        sequence.split_whitespace().map(str::to_string).collect();
                    let after_mvs = aliases.first().is_some_and(|a| a == MVS);
                    let indices = if after_mvs {
                        aliases.remove(0);
                        indices.iter().filter_map(|i| i.checked_sub(1)).collect()
                    } else {
                        indices
                    };
                    ParticleRule { locale, after_mvs, aliases, indices }
                })
            })
            .collect();

        let ligatures = raw
            .ligatures
            .into_iter()
            .flat_map(|(category, table)| {
                table
                    .into_iter()
                    .map(move |(units, positions)| LigatureRule { category, units, positions })
            })
            .collect();

        let data = ReferenceData {
            written_units: raw.written_units,
            locales: raw.locales,
            characters: raw.characters,
            particles,
            ligatures,
        };
        data.validate()?;
        Ok(data)
    }

    /// Check the cross references a build relies on.
    pub fn validate(&self) -> Result<()> {
        for character in &self.characters {
            for (position, variants) in &character.variants {
                if !variants.is_empty() && !variants.contains_key(&0) {
                    return Err(Error::InvalidData(format!(
                        "{} has no default selector at {position}",
                        character.name
                    )));
                }
                for variant in variants.values() {
                    self.validate_variant(character, variant)?;
                }
            }
        }

        for (locale, data) in &self.locales {
            for (category, aliases) in &data.categories {
                for alias in aliases {
                    let matches = self
                        .characters
                        .iter()
                        .filter(|c| c.alias.for_locale(*locale) == Some(alias.as_str()))
                        .count();
                    if matches != 1 {
                        return Err(Error::InvalidData(format!(
                            "{locale} category {category}: alias {alias} names {matches} characters"
                        )));
                    }
                }
            }
        }

        for particle in &self.particles {
            if !self.locales.contains_key(&particle.locale) {
                return Err(Error::InvalidData(format!(
                    "particles declared for undeclared locale {}",
                    particle.locale
                )));
            }
            if let Some(index) = particle.indices.iter().find(|i| **i >= particle.aliases.len()) {
                return Err(Error::InvalidData(format!(
                    "particle {} has no letter at index {index}",
                    particle.aliases.join(" ")
                )));
            }
        }

        for ligature in &self.ligatures {
            if let Some(unit) = split_written_units(&ligature.units).into_iter().find(|u| !self.is_unit(u)) {
                return Err(Error::InvalidData(format!(
                    "ligature {} uses unknown written unit {unit}",
                    ligature.units
                )));
            }
        }

        debug!("reference data validated");
        Ok(())
    }

    fn validate_variant(&self, character: &Character, variant: &Variant) -> Result<()> {
        self.validate_written(character, &variant.written)?;
        for (locale, data) in &variant.locales {
            if !self.locales.contains_key(locale) {
                return Err(Error::UnresolvedReference {
                    character: character.name.clone(),
                    reason: format!("override for undeclared locale {locale}"),
                });
            }
            if let Some(written) = &data.written {
                self.validate_written(character, written)?;
            }
        }
        Ok(())
    }

    fn validate_written(&self, character: &Character, written: &Written) -> Result<()> {
        let resolved = self.resolve_written(character, written)?;
        if resolved.units.is_empty() {
            return Err(Error::InvalidData(format!("{} has an empty written form", character.name)));
        }
        if let Some(unit) = resolved.units.iter().find(|u| !self.is_unit(u)) {
            return Err(Error::InvalidData(format!(
                "{} uses unknown written unit {unit}",
                character.name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::data::LocaleId;

    fn document(variants: serde_json::Value) -> serde_json::Value {
        json!({
            "writtenUnits": { "A": {}, "Aa": {} },
            "locales": { "MNG": { "categories": { "vowel": ["a"] } } },
            "characters": [
                { "name": "MONGOLIAN LETTER A", "codePoint": 6176, "alias": "a", "variants": variants }
            ],
            "particles": { "MNG": { "mvs a a": [1, 2] } },
            "ligatures": { "required": { "AAa": ["init"] } }
        })
    }

    #[test]
    fn test_load_tables() {
        let data = ReferenceData::from_value(document(json!({
            "isol": { "0": { "written": ["A"], "locales": { "MNG": {} } } }
        })))
        .unwrap();
        assert_eq!(data.particles.len(), 1);
        assert!(data.particles[0].after_mvs);
        assert_eq!(data.particles[0].aliases, ["a", "a"]);
        assert_eq!(data.particles[0].indices, [0, 1]);
        assert_eq!(data.particles[0].locale, LocaleId::Mng);
        assert_eq!(data.ligatures[0].units, "AAa");
    }

    #[test]
    fn test_dangling_reference() {
        let result = ReferenceData::from_value(document(json!({
            "isol": { "0": { "written": ["init", 0], "locales": { "MNG": {} } } }
        })));
        assert!(matches!(result, Err(Error::UnresolvedReference { .. })));
    }

    #[test]
    fn test_reference_chain_is_rejected() {
        let result = ReferenceData::from_value(document(json!({
            "isol": { "0": { "written": ["medi", 0], "locales": { "MNG": {} } } },
            "medi": { "0": { "written": ["fina", 0], "locales": { "MNG": {} } } },
            "fina": { "0": { "written": ["A"], "locales": { "MNG": {} } } }
        })));
        assert!(matches!(result, Err(Error::UnresolvedReference { .. })));
    }

    #[test]
    fn test_undeclared_override_locale() {
        let result = ReferenceData::from_value(document(json!({
            "isol": { "0": { "written": ["A"], "locales": { "SIB": {} } } }
        })));
        assert!(matches!(result, Err(Error::UnresolvedReference { .. })));
    }

    #[test]
    fn test_unknown_unit_and_missing_default() {
        let result = ReferenceData::from_value(document(json!({
            "isol": { "0": { "written": ["Zz"], "locales": { "MNG": {} } } }
        })));
        assert!(matches!(result, Err(Error::InvalidData(_))));

        let result = ReferenceData::from_value(document(json!({
            "isol": { "1": { "written": ["A"], "locales": { "MNG": {} } } }
        })));
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(ReferenceData::from_json("{"), Err(Error::Json(_))));
    }
}
