//! Glyph and glyph class references used in rules.

use std::fmt::{Display, Formatter, Result};

/// One entry of a glyph set: a glyph name or a reference to a named class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Member {
    Glyph(String),
    Class(String),
}

impl Display for Member {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Member::Glyph(name) => write!(f, "{name}"),
            Member::Class(name) => write!(f, "@{name}"),
        }
    }
}

/// An ordered, duplicate-free set of glyphs and class references.
///
/// Emitted as a bare glyph, a bare `@class` or an inline `[...]` class
/// depending on how many members it has.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct GlyphSet(Vec<Member>);

impl GlyphSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn glyph(name: impl Into<String>) -> Self {
        Self(vec![Member::Glyph(name.into())])
    }

    /// Reference to a named class, without the leading `@`.
    pub fn class(name: impl Into<String>) -> Self {
        Self(vec![Member::Class(name.into())])
    }

    pub fn push(&mut self, member: Member) {
        if !self.0.contains(&member) {
            self.0.push(member);
        }
    }

    pub fn push_glyph(&mut self, name: impl Into<String>) {
        self.push(Member::Glyph(name.into()));
    }

    pub fn extend(&mut self, other: GlyphSet) {
        for member in other.0 {
            self.push(member);
        }
    }

    /// Union of several sets, keeping first-seen order.
    pub fn union(sets: impl IntoIterator<Item = GlyphSet>) -> Self {
        let mut result = Self::new();
        for set in sets {
            result.extend(set);
        }
        result
    }

    pub fn members(&self) -> &[Member] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn retain(&mut self, f: impl FnMut(&Member) -> bool) {
        self.0.retain(f);
    }
}

impl Display for GlyphSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self.0.as_slice() {
            [single] => write!(f, "{single}"),
            members => {
                write!(f, "[")?;
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{member}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<&str> for GlyphSet {
    fn from(name: &str) -> Self {
        Self::glyph(name)
    }
}

impl From<String> for GlyphSet {
    fn from(name: String) -> Self {
        Self::glyph(name)
    }
}

impl From<&String> for GlyphSet {
    fn from(name: &String) -> Self {
        Self::glyph(name.as_str())
    }
}

impl From<&GlyphSet> for GlyphSet {
    fn from(set: &GlyphSet) -> Self {
        set.clone()
    }
}

impl FromIterator<String> for GlyphSet {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        let mut set = Self::new();
        for name in iter {
            set.push_glyph(name);
        }
        set
    }
}

impl FromIterator<Member> for GlyphSet {
    fn from_iter<T: IntoIterator<Item = Member>>(iter: T) -> Self {
        let mut set = Self::new();
        for member in iter {
            set.push(member);
        }
        set
    }
}

impl FromIterator<GlyphSet> for GlyphSet {
    fn from_iter<T: IntoIterator<Item = GlyphSet>>(iter: T) -> Self {
        Self::union(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_forms() {
        assert_eq!(GlyphSet::glyph("a").to_string(), "a");
        assert_eq!(GlyphSet::class("MNG-a").to_string(), "@MNG-a");

        let mut set = GlyphSet::glyph("a");
        set.push(Member::Class("fvs".into()));
        set.push_glyph("b");
        assert_eq!(set.to_string(), "[a @fvs b]");
        assert_eq!(GlyphSet::new().to_string(), "[]");
    }

    #[test]
    fn test_dedup_keeps_first_order() {
        let set: GlyphSet = ["b", "a", "b", "c", "a"].into_iter().map(String::from).collect();
        assert_eq!(set.to_string(), "[b a c]");
        assert_eq!(set.len(), 3);
    }
}
