//! Lookup blocks.

use crate::{glyphs::GlyphSet, rule::Rule};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupFlags {
    pub ignore_marks: bool,
    pub mark_filtering_set: Option<GlyphSet>,
}

impl LookupFlags {
    pub fn is_empty(&self) -> bool {
        !self.ignore_marks && self.mark_filtering_set.is_none()
    }
}

/// A named lookup, optionally registered under a feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub name: String,
    pub feature: Option<String>,
    pub flags: LookupFlags,
    pub rules: Vec<Rule>,
}

impl Lookup {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), feature: None, flags: LookupFlags::default(), rules: vec![] }
    }

    pub fn feature(mut self, tag: impl Into<String>) -> Self {
        self.feature = Some(tag.into());
        self
    }

    pub fn ignore_marks(mut self) -> Self {
        self.flags.ignore_marks = true;
        self
    }

    pub fn mark_filtering_set(mut self, glyphs: impl Into<GlyphSet>) -> Self {
        self.flags.mark_filtering_set = Some(glyphs.into());
        self
    }

    pub fn push(&mut self, rule: impl Into<Rule>) {
        self.rules.push(rule.into());
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
