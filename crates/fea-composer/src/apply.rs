//! Execute built lookups against a glyph-name buffer.
//!
//! Only compiled for tests and under the `test` feature; fonts are shaped by
//! a real OpenType engine once the emitted features are compiled.
//!
//! This follows the OpenType GSUB processing model closely enough to check
//! what a rule set does: lookups run one after another over the whole buffer,
//! the first matching rule of a lookup wins at each position, glyphs skipped
//! by the lookup flags are invisible to matching, and after a contextual rule
//! fires processing resumes after its (possibly grown) input. Reverse chaining
//! lookups run from the end of the buffer.

use std::collections::HashSet;

use crate::{
    builder::FeaBuilder,
    glyphs::GlyphSet,
    lookup::{Lookup, LookupFlags},
    rule::{Replacement, ReverseSubstitution, Rule, Substitution},
};

/// Runs the lookups of a [`FeaBuilder`].
pub struct Shaper<'a> {
    fea: &'a FeaBuilder,
    marks: HashSet<String>,
}

impl<'a> Shaper<'a> {
    /// Shaper whose mark glyphs come from the builder's GDEF classes.
    pub fn new(fea: &'a FeaBuilder) -> Self {
        Self { fea, marks: fea.gdef().marks.iter().cloned().collect() }
    }

    pub fn with_marks<S: Into<String>>(fea: &'a FeaBuilder, marks: impl IntoIterator<Item = S>) -> Self {
        Self { fea, marks: marks.into_iter().map(Into::into).collect() }
    }

    /// Apply every lookup registered under one of `features`, in lookup order.
    pub fn apply_features(&self, features: &[&str], glyphs: &mut Vec<String>) {
        for lookup in self.fea.lookups() {
            if lookup.feature.as_deref().is_some_and(|tag| features.contains(&tag)) {
                self.apply_lookup(lookup, glyphs);
            }
        }
    }

    /// Apply one lookup by name. Returns `false` if no such lookup exists.
    pub fn apply_named(&self, name: &str, glyphs: &mut Vec<String>) -> bool {
        match self.fea.lookup(name) {
            Some(lookup) => {
                self.apply_lookup(lookup, glyphs);
                true
            }
            None => false,
        }
    }

    pub fn apply_lookup(&self, lookup: &Lookup, glyphs: &mut Vec<String>) {
        let reverse = lookup.rules.iter().all(|rule| matches!(rule, Rule::Reverse(_)));
        if reverse {
            let mut i = glyphs.len();
            while i > 0 {
                i -= 1;
                self.apply_reverse_at(lookup, glyphs, i);
            }
            return;
        }

        let mut i = 0;
        while i < glyphs.len() {
            let before = glyphs.len();
            match self.apply_at(lookup, glyphs, i) {
                Some(next) if next > i || glyphs.len() < before => i = next,
                _ => i += 1,
            }
        }
    }

    fn skipped(&self, flags: &LookupFlags, glyph: &str, filter: Option<&HashSet<String>>) -> bool {
        if !self.marks.contains(glyph) {
            return false;
        }
        if flags.ignore_marks {
            return true;
        }
        match filter {
            Some(set) => !set.contains(glyph),
            None => false,
        }
    }

    fn filter_set(&self, flags: &LookupFlags) -> Option<HashSet<String>> {
        flags.mark_filtering_set.as_ref().map(|set| self.fea.flatten(set).into_iter().collect())
    }

    fn contains(&self, set: &GlyphSet, glyph: &str) -> bool {
        self.fea.flatten(set).iter().any(|g| g == glyph)
    }

    /// Apply the first matching rule at `i`; returns where processing resumes.
    fn apply_at(&self, lookup: &Lookup, glyphs: &mut Vec<String>, i: usize) -> Option<usize> {
        let filter = self.filter_set(&lookup.flags);
        if self.skipped(&lookup.flags, &glyphs[i], filter.as_ref()) {
            return None;
        }
        for rule in &lookup.rules {
            let Rule::Sub(sub) = rule else { continue };
            if let Some(positions) = self.match_sub(&lookup.flags, filter.as_ref(), sub, glyphs, i) {
                return Some(self.apply_sub(sub, glyphs, &positions));
            }
        }
        None
    }

    /// Buffer positions of the input slots when `sub` matches with its first
    /// input at `i`.
    fn match_sub(
        &self,
        flags: &LookupFlags,
        filter: Option<&HashSet<String>>,
        sub: &Substitution,
        glyphs: &[String],
        i: usize,
    ) -> Option<Vec<usize>> {
        let (start, end) = sub.input_range();
        let visible = |j: usize| !self.skipped(flags, &glyphs[j], filter);

        let mut positions = Vec::with_capacity(end - start);
        let mut j = i;
        for slot in &sub.slots[start..end] {
            while j < glyphs.len() && !visible(j) {
                j += 1;
            }
            if j >= glyphs.len() || !self.contains(&slot.glyphs, &glyphs[j]) {
                return None;
            }
            positions.push(j);
            j += 1;
        }
        if positions.first() != Some(&i) {
            return None;
        }

        let mut k = i;
        for slot in sub.slots[..start].iter().rev() {
            loop {
                if k == 0 {
                    return None;
                }
                k -= 1;
                if visible(k) {
                    break;
                }
            }
            if !self.contains(&slot.glyphs, &glyphs[k]) {
                return None;
            }
        }

        let mut k = j;
        for slot in &sub.slots[end..] {
            while k < glyphs.len() && !visible(k) {
                k += 1;
            }
            if k >= glyphs.len() || !self.contains(&slot.glyphs, &glyphs[k]) {
                return None;
            }
            k += 1;
        }

        Some(positions)
    }

    fn map_glyph(&self, input: &GlyphSet, replacement: &GlyphSet, glyph: &str) -> Option<String> {
        let targets = self.fea.flatten(replacement);
        if targets.len() == 1 {
            return targets.into_iter().next();
        }
        let sources = self.fea.flatten(input);
        let index = sources.iter().position(|g| g == glyph)?;
        targets.get(index).cloned()
    }

    fn sequence(&self, replacement: &[GlyphSet]) -> Vec<String> {
        replacement
            .iter()
            .filter_map(|set| self.fea.flatten(set).into_iter().next())
            .collect()
    }

    fn apply_sub(&self, sub: &Substitution, glyphs: &mut Vec<String>, positions: &[usize]) -> usize {
        let (start, _) = sub.input_range();
        let first = positions[0];
        let last = positions[positions.len() - 1];

        match &sub.replacement {
            Replacement::Null => {
                for &p in positions.iter().rev() {
                    glyphs.remove(p);
                }
                first
            }
            Replacement::Glyphs(replacement) if positions.len() == 1 && replacement.len() == 1 => {
                let slot = &sub.slots[start];
                let mapped = self.map_glyph(&slot.glyphs, &replacement[0], &glyphs[first]);
                if let Some(glyph) = mapped {
                    glyphs[first] = glyph;
                }
                first + 1
            }
            Replacement::Glyphs(replacement) if positions.len() == 1 => {
                let sequence = self.sequence(replacement);
                let count = sequence.len();
                glyphs.splice(first..=first, sequence);
                first + count
            }
            Replacement::Glyphs(replacement) => {
                let ligature = self.sequence(replacement);
                for &p in positions[1..].iter().rev() {
                    glyphs.remove(p);
                }
                if let Some(glyph) = ligature.into_iter().next() {
                    glyphs[first] = glyph;
                }
                first + 1
            }
            Replacement::Keep => {
                let mut delta: isize = 0;
                for (slot, &p) in sub.slots[start..].iter().zip(positions) {
                    for lookup in &slot.lookups {
                        let Some(nested) = self.fea.lookup(lookup.name()) else { continue };
                        let at = (p as isize + delta) as usize;
                        if at >= glyphs.len() {
                            continue;
                        }
                        let before = glyphs.len() as isize;
                        self.apply_at(nested, glyphs, at);
                        delta += glyphs.len() as isize - before;
                    }
                }
                (last as isize + 1 + delta).max(0) as usize
            }
        }
    }

    fn apply_reverse_at(&self, lookup: &Lookup, glyphs: &mut [String], i: usize) {
        let filter = self.filter_set(&lookup.flags);
        let flags = &lookup.flags;
        if self.skipped(flags, &glyphs[i], filter.as_ref()) {
            return;
        }
        for rule in &lookup.rules {
            let Rule::Reverse(rsub) = rule else { continue };
            if self.match_reverse(flags, filter.as_ref(), rsub, glyphs, i) {
                let mapped = self.map_glyph(&rsub.input, &rsub.replacement, &glyphs[i]);
                if let Some(glyph) = mapped {
                    glyphs[i] = glyph;
                }
                return;
            }
        }
    }

    fn match_reverse(
        &self,
        flags: &LookupFlags,
        filter: Option<&HashSet<String>>,
        rsub: &ReverseSubstitution,
        glyphs: &[String],
        i: usize,
    ) -> bool {
        if !self.contains(&rsub.input, &glyphs[i]) {
            return false;
        }
        let visible = |j: usize| !self.skipped(flags, &glyphs[j], filter);

        let mut k = i;
        for set in rsub.backtrack.iter().rev() {
            loop {
                if k == 0 {
                    return false;
                }
                k -= 1;
                if visible(k) {
                    break;
                }
            }
            if !self.contains(set, &glyphs[k]) {
                return false;
            }
        }

        let mut k = i + 1;
        for set in &rsub.lookahead {
            while k < glyphs.len() && !visible(k) {
                k += 1;
            }
            if k >= glyphs.len() || !self.contains(set, &glyphs[k]) {
                return false;
            }
            k += 1;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Substitution;

    fn buffer(glyphs: &[&str]) -> Vec<String> {
        glyphs.iter().map(|g| g.to_string()).collect()
    }

    #[test]
    fn test_single_and_class_mapping() {
        let mut fea = FeaBuilder::new();
        let from = fea.define_class("from", GlyphSet::from_iter(["a".to_string(), "b".to_string()]));
        let to = fea.define_class("to", GlyphSet::from_iter(["A".to_string(), "B".to_string()]));
        let mut lookup = Lookup::new("map");
        lookup.push(Substitution::new().slot(from).by(to));
        fea.add_lookup(lookup);

        let mut glyphs = buffer(&["b", "x", "a"]);
        assert!(Shaper::new(&fea).apply_named("map", &mut glyphs));
        assert_eq!(glyphs, ["B", "x", "A"]);
    }

    #[test]
    fn test_ligature_skips_marks() {
        let mut fea = FeaBuilder::new();
        let mut lookup = Lookup::new("liga").ignore_marks();
        lookup.push(Substitution::new().slot("f").slot("i").by("fi"));
        fea.add_lookup(lookup);

        let mut glyphs = buffer(&["f", "m", "i", "x"]);
        Shaper::with_marks(&fea, ["m"]).apply_named("liga", &mut glyphs);
        assert_eq!(glyphs, ["fi", "m", "x"]);
    }

    #[test]
    fn test_self_priming_chain_propagates() {
        let mut fea = FeaBuilder::new();
        let mut lookup = Lookup::new("propagate").mark_filtering_set("m");
        lookup.push(Substitution::new().slot("m").input("n").by_sequence(["n", "m"]));
        fea.add_lookup(lookup);

        let mut glyphs = buffer(&["v", "m", "n", "n", "n", "e"]);
        Shaper::with_marks(&fea, ["m"]).apply_named("propagate", &mut glyphs);
        assert_eq!(glyphs, ["v", "m", "n", "m", "n", "m", "n", "m", "e"]);
    }

    #[test]
    fn test_nested_lookup_and_deletion() {
        let mut fea = FeaBuilder::new();
        let mut narrow = Lookup::new("_.narrow");
        narrow.push(Substitution::new().slot("mvs").by("mvs.narrow"));
        let narrow = fea.add_lookup(narrow);

        let mut chachlag = Lookup::new("chachlag");
        if let Some(narrow) = &narrow {
            chachlag.push(Substitution::new().input_with("mvs", narrow).slot("a.isol"));
        }
        fea.add_lookup(chachlag);

        let mut cleanup = Lookup::new("cleanup");
        cleanup.push(Substitution::new().slot("zwj").by_null());
        fea.add_lookup(cleanup);

        let mut glyphs = buffer(&["x", "mvs", "a.isol", "mvs", "b", "zwj"]);
        let shaper = Shaper::new(&fea);
        shaper.apply_named("chachlag", &mut glyphs);
        shaper.apply_named("cleanup", &mut glyphs);
        assert_eq!(glyphs, ["x", "mvs.narrow", "a.isol", "mvs", "b"]);
    }

    #[test]
    fn test_reverse_chain_runs_right_to_left() {
        let mut fea = FeaBuilder::new();
        let marked =
            fea.define_class("marked", GlyphSet::from_iter(["n.marked".to_string(), "v".to_string()]));
        let mut lookup = Lookup::new("back");
        lookup.push(ReverseSubstitution::new("n", "n.marked").lookahead(marked));
        fea.add_lookup(lookup);

        let mut glyphs = buffer(&["n", "n", "n", "v"]);
        Shaper::new(&fea).apply_named("back", &mut glyphs);
        assert_eq!(glyphs, ["n.marked", "n.marked", "n.marked", "v"]);
    }
}
