//! Written-unit segmentation.
//!
//! A word's written form can be drawn by chaining simpler glyphs. The
//! functions here enumerate the ways a unit sequence splits into runs of
//! joined glyphs, which is how missing glyphs are synthesized and how
//! ligature inputs are discovered.

use std::fmt::{Display, Formatter, Result as FmtResult};

use log::warn;

use crate::{config::LVS_UNIT, position::JoiningPosition};

/// Split concatenated unit ids (`"AAa"` → `["A", "Aa"]`).
///
/// A new unit starts at every upper-case letter.
pub fn split_written_units(text: &str) -> Vec<String> {
    let mut units: Vec<String> = Vec::new();
    for c in text.chars() {
        match units.last_mut() {
            Some(unit) if !c.is_ascii_uppercase() => unit.push(c),
            _ => units.push(c.to_string()),
        }
    }
    units
}

/// One run of a segmentation: units drawn as a single glyph at a position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Segment {
    pub units: Vec<String>,
    pub position: JoiningPosition,
}

impl Segment {
    pub fn written(&self) -> String {
        self.units.concat()
    }
}

impl Display for Segment {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}.{}", self.written(), self.position)
    }
}

/// Every way of drawing `units` at `position` as a chain of joined glyphs.
///
/// A trailing long vowel sign always stays with its predecessor. When the
/// target joins to a neighbour a boundary placeholder stands in for it during
/// partitioning and its run is dropped afterwards; partitions where the
/// placeholder swallowed a real unit are discarded. Candidates are ordered
/// from the finest partition to the coarsest.
pub fn written_combinations(units: &[String], position: JoiningPosition) -> Vec<Vec<Segment>> {
    if units.is_empty() {
        return vec![];
    }

    let mut elements: Vec<Vec<String>> = units.iter().map(|u| vec![u.clone()]).collect();
    if elements.len() > 1 && units.last().is_some_and(|u| u == LVS_UNIT) {
        if let Some(lvs) = elements.pop() {
            if let Some(last) = elements.last_mut() {
                last.extend(lvs);
            }
        }
    }

    let lead = position.joins_before();
    let trail = position.joins_after();
    if lead {
        elements.insert(0, vec![]);
    }
    if trail {
        elements.push(vec![]);
    }

    let boundaries = elements.len() - 1;
    let Some(partitions) = u32::try_from(boundaries).ok().and_then(|b| 1u64.checked_shl(b)) else {
        warn!("Too many written units to partition: {}", units.concat());
        return vec![];
    };
    let mut candidates = Vec::new();
    for mask in 0..partitions {
        let mut runs: Vec<Vec<String>> = vec![elements[0].clone()];
        for (i, element) in elements.iter().enumerate().skip(1) {
            let merge = mask & (1u64 << (i - 1)) != 0;
            match runs.last_mut() {
                Some(run) if merge => run.extend(element.iter().cloned()),
                _ => runs.push(element.clone()),
            }
        }

        let count = runs.len();
        let mut segments: Vec<Segment> = runs
            .into_iter()
            .enumerate()
            .map(|(index, units)| Segment { units, position: JoiningPosition::of_run(index, count) })
            .collect();
        if trail {
            segments.pop();
        }
        if lead && !segments.is_empty() {
            segments.remove(0);
        }

        let surviving: usize = segments.iter().map(|s| s.units.len()).sum();
        if surviving == units.len() && !segments.is_empty() {
            candidates.push(segments);
        }
    }
    candidates
}
