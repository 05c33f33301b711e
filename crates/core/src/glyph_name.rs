//! Canonical glyph names.
//!
//! Grammar: `[codepoints "."] units "." position ("." suffix)*`, where
//! code points are `uXXXX` joined with `_` and a name without code points
//! starts with `_` (`_A.init`).

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use crate::{
    Error, Result,
    data::{Character, LocaleId, ReferenceData, Variant},
    position::JoiningPosition,
    written::{Segment, split_written_units},
};

/// Nominal glyph name of a code point.
pub fn u_name(code_point: u32) -> String {
    format!("u{code_point:04X}")
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlyphDescriptor {
    pub code_points: Vec<u32>,
    pub units: Vec<String>,
    pub position: JoiningPosition,
    pub suffixes: Vec<String>,
}

impl GlyphDescriptor {
    pub fn new(code_points: Vec<u32>, units: Vec<String>, position: JoiningPosition) -> Self {
        Self { code_points, units, position, suffixes: vec![] }
    }

    /// Parse `name`, requiring every unit to exist in `data`.
    pub fn parse(name: &str, data: &ReferenceData) -> Result<Self> {
        let descriptor: Self = name.parse()?;
        if descriptor.units.iter().any(|u| !data.is_unit(u)) {
            return Err(Error::Format(name.to_string()));
        }
        Ok(descriptor)
    }

    /// Glyph of `variant` at `position` as written in `locale`.
    ///
    /// A variant borrowing the written form of another position keeps the
    /// graphic position of that form; the requested position is then recorded
    /// as the pseudo position.
    pub fn from_variant(
        data: &ReferenceData,
        character: &Character,
        position: JoiningPosition,
        variant: &Variant,
        locale: Option<LocaleId>,
    ) -> Result<Self> {
        let resolved = data.variant_written(character, variant, locale)?;
        let graphic = resolved.position.unwrap_or(position);
        let mut descriptor = Self::new(vec![character.code_point], resolved.units, graphic);
        if graphic != position {
            descriptor.suffixes.push(format!("_{position}"));
        }
        Ok(descriptor)
    }

    /// Written-only glyph of a segment (`_A.init`).
    pub fn from_segment(segment: &Segment) -> Self {
        Self::new(vec![], segment.units.clone(), segment.position)
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffixes.push(suffix.into());
        self
    }

    /// Same shape without code points and suffixes.
    pub fn written_only(&self) -> Self {
        Self::new(vec![], self.units.clone(), self.position)
    }

    pub fn without_code_points(&self) -> Self {
        Self { code_points: vec![], ..self.clone() }
    }

    fn without_suffixes(&self) -> Self {
        Self { suffixes: vec![], ..self.clone() }
    }

    pub fn written(&self) -> String {
        self.units.concat()
    }

    /// Join two adjacent glyphs into one.
    pub fn concat(&self, other: &GlyphDescriptor) -> Result<Self> {
        let position = self.position.concat(other.position)?;
        let mut code_points = self.code_points.clone();
        code_points.extend(&other.code_points);
        let mut units = self.units.clone();
        units.extend(other.units.iter().cloned());
        Ok(Self::new(code_points, units, position))
    }

    /// Shaping position recorded in the first suffix, if any.
    pub fn pseudo_position(&self) -> Option<JoiningPosition> {
        self.suffixes.first()?.strip_prefix('_')?.parse().ok()
    }
}

/// Fold [`GlyphDescriptor::concat`] over a glyph sequence.
pub fn ligate_parts(parts: &[GlyphDescriptor]) -> Result<GlyphDescriptor> {
    let (first, rest) = parts
        .split_first()
        .ok_or_else(|| Error::InvalidData("cannot ligate an empty sequence".to_string()))?;
    rest.iter().try_fold(first.without_suffixes(), |acc, part| acc.concat(part))
}

impl Display for GlyphDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if self.code_points.is_empty() {
            f.write_str("_")?;
        } else {
            let names: Vec<String> = self.code_points.iter().map(|cp| u_name(*cp)).collect();
            write!(f, "{}.", names.join("_"))?;
        }
        write!(f, "{}.{}", self.written(), self.position)?;
        for suffix in &self.suffixes {
            write!(f, ".{suffix}")?;
        }
        Ok(())
    }
}

fn is_unit_id(unit: &str) -> bool {
    let mut chars = unit.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
}

fn parse_code_point(token: &str) -> Option<u32> {
    let hex = token.strip_prefix('u')?;
    if hex.len() < 4 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

/// Lexical parse; unit ids are checked for shape but not vocabulary.
impl FromStr for GlyphDescriptor {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        let malformed = || Error::Format(name.to_string());

        let (code_points, rest) = match name.strip_prefix('_') {
            Some(rest) => (vec![], rest),
            None => {
                let (head, rest) = name.split_once('.').ok_or_else(malformed)?;
                let code_points = head
                    .split('_')
                    .map(parse_code_point)
                    .collect::<Option<Vec<u32>>>()
                    .ok_or_else(malformed)?;
                (code_points, rest)
            }
        };

        let mut tokens = rest.split('.');
        let written = tokens.next().filter(|t| !t.is_empty()).ok_or_else(malformed)?;
        let position = tokens.next().ok_or_else(malformed)?.parse().map_err(|_| malformed())?;
        let suffixes: Vec<String> = tokens.map(str::to_string).collect();
        if suffixes.iter().any(String::is_empty) {
            return Err(malformed());
        }

        let units = split_written_units(written);
        if !units.iter().all(|u| is_unit_id(u)) {
            return Err(malformed());
        }

        let descriptor = Self { code_points, units, position, suffixes };
        if descriptor.to_string() != name {
            return Err(malformed());
        }
        Ok(descriptor)
    }
}
