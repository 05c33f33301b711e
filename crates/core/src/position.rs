//! Joining positions.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Position of a glyph within a cursively joined run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoiningPosition {
    Isol,
    Init,
    Medi,
    Fina,
}

pub use JoiningPosition::{Fina, Init, Isol, Medi};

impl JoiningPosition {
    /// All positions in declared order.
    pub const ALL: [JoiningPosition; 4] = [Isol, Init, Medi, Fina];

    pub fn as_str(self) -> &'static str {
        match self {
            Isol => "isol",
            Init => "init",
            Medi => "medi",
            Fina => "fina",
        }
    }

    /// Position of two adjacent glyphs joined into one.
    pub fn concat(self, other: JoiningPosition) -> Result<JoiningPosition> {
        match (self, other) {
            (Init, Fina) => Ok(Isol),
            (Init, Medi) => Ok(Init),
            (Medi, Medi) => Ok(Medi),
            (Medi, Fina) => Ok(Fina),
            _ => Err(Error::InvalidConcatenation(self.to_string(), other.to_string())),
        }
    }

    /// Position of run `index` among `count` runs.
    pub fn of_run(index: usize, count: usize) -> JoiningPosition {
        if count <= 1 {
            Isol
        } else if index == 0 {
            Init
        } else if index + 1 == count {
            Fina
        } else {
            Medi
        }
    }

    /// Whether the glyph joins to a preceding glyph.
    pub fn joins_before(self) -> bool {
        matches!(self, Medi | Fina)
    }

    /// Whether the glyph joins to a following glyph.
    pub fn joins_after(self) -> bool {
        matches!(self, Init | Medi)
    }
}

impl Display for JoiningPosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for JoiningPosition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        JoiningPosition::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| Error::Format(s.to_string()))
    }
}
