//! Substitution statements.

use std::fmt::{Display, Formatter, Result};

use crate::glyphs::GlyphSet;

/// Name of a lookup that a contextual rule invokes on a marked input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupRef(String);

impl LookupRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Display for LookupRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LookupRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<&LookupRef> for LookupRef {
    fn from(lookup: &LookupRef) -> Self {
        lookup.clone()
    }
}

/// One position of a substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub glyphs: GlyphSet,
    /// Marked slots (`'`) form the input of a contextual rule.
    pub marked: bool,
    pub lookups: Vec<LookupRef>,
}

/// What replaces the input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Replacement {
    /// No inline replacement; only nested lookups act.
    #[default]
    Keep,
    /// `by NULL`
    Null,
    Glyphs(Vec<GlyphSet>),
}

/// A forward substitution, plain or contextual.
///
/// Without marked slots every slot is input: one slot replaced by one set is
/// a single substitution, by several a multiple substitution, several slots
/// replaced by one set a ligature. With marked slots the unmarked slots
/// before and after are backtrack and lookahead.
///
/// ```
/// use fea_composer::Substitution;
///
/// let rule = Substitution::new()
///     .slot("marker")
///     .input("n.medi")
///     .by_sequence(["n.medi", "marker"]);
/// assert_eq!(rule.to_string(), "sub marker n.medi' by n.medi marker;");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitution {
    pub slots: Vec<Slot>,
    pub replacement: Replacement,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an unmarked slot.
    pub fn slot(mut self, glyphs: impl Into<GlyphSet>) -> Self {
        self.slots.push(Slot { glyphs: glyphs.into(), marked: false, lookups: vec![] });
        self
    }

    /// Append a marked slot with no nested lookup.
    pub fn input(mut self, glyphs: impl Into<GlyphSet>) -> Self {
        self.slots.push(Slot { glyphs: glyphs.into(), marked: true, lookups: vec![] });
        self
    }

    /// Append a marked slot that runs `lookup` when the rule matches.
    pub fn input_with(mut self, glyphs: impl Into<GlyphSet>, lookup: impl Into<LookupRef>) -> Self {
        self.slots.push(Slot { glyphs: glyphs.into(), marked: true, lookups: vec![lookup.into()] });
        self
    }

    pub fn by(mut self, glyphs: impl Into<GlyphSet>) -> Self {
        self.replacement = Replacement::Glyphs(vec![glyphs.into()]);
        self
    }

    pub fn by_sequence<G: Into<GlyphSet>>(mut self, glyphs: impl IntoIterator<Item = G>) -> Self {
        self.replacement = Replacement::Glyphs(glyphs.into_iter().map(Into::into).collect());
        self
    }

    pub fn by_null(mut self) -> Self {
        self.replacement = Replacement::Null;
        self
    }

    pub fn is_contextual(&self) -> bool {
        self.slots.iter().any(|slot| slot.marked)
    }

    /// Slot index range of the input: the marked run, or every slot.
    pub fn input_range(&self) -> (usize, usize) {
        let first = self.slots.iter().position(|slot| slot.marked);
        let last = self.slots.iter().rposition(|slot| slot.marked);
        match (first, last) {
            (Some(first), Some(last)) => (first, last + 1),
            _ => (0, self.slots.len()),
        }
    }
}

impl Display for Substitution {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "sub")?;
        for slot in &self.slots {
            write!(f, " {}", slot.glyphs)?;
            if slot.marked {
                write!(f, "'")?;
            }
            for lookup in &slot.lookups {
                write!(f, " lookup {lookup}")?;
            }
        }
        match &self.replacement {
            Replacement::Keep => {}
            Replacement::Null => write!(f, " by NULL")?,
            Replacement::Glyphs(glyphs) => {
                write!(f, " by")?;
                for set in glyphs {
                    write!(f, " {set}")?;
                }
            }
        }
        write!(f, ";")
    }
}

/// A reverse chaining single substitution (`rsub`), applied right to left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseSubstitution {
    pub backtrack: Vec<GlyphSet>,
    pub input: GlyphSet,
    pub lookahead: Vec<GlyphSet>,
    pub replacement: GlyphSet,
}

impl ReverseSubstitution {
    pub fn new(input: impl Into<GlyphSet>, replacement: impl Into<GlyphSet>) -> Self {
        Self {
            backtrack: vec![],
            input: input.into(),
            lookahead: vec![],
            replacement: replacement.into(),
        }
    }

    pub fn backtrack(mut self, glyphs: impl Into<GlyphSet>) -> Self {
        self.backtrack.push(glyphs.into());
        self
    }

    pub fn lookahead(mut self, glyphs: impl Into<GlyphSet>) -> Self {
        self.lookahead.push(glyphs.into());
        self
    }
}

impl Display for ReverseSubstitution {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "rsub")?;
        for set in &self.backtrack {
            write!(f, " {set}")?;
        }
        write!(f, " {}'", self.input)?;
        for set in &self.lookahead {
            write!(f, " {set}")?;
        }
        write!(f, " by {};", self.replacement)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Sub(Substitution),
    Reverse(ReverseSubstitution),
}

impl Rule {
    /// Every glyph set the rule mentions.
    pub fn glyph_sets(&self) -> Vec<&GlyphSet> {
        match self {
            Rule::Sub(sub) => {
                let mut sets: Vec<&GlyphSet> = sub.slots.iter().map(|slot| &slot.glyphs).collect();
                if let Replacement::Glyphs(glyphs) = &sub.replacement {
                    sets.extend(glyphs);
                }
                sets
            }
            Rule::Reverse(rsub) => {
                let mut sets: Vec<&GlyphSet> = rsub.backtrack.iter().collect();
                sets.push(&rsub.input);
                sets.extend(&rsub.lookahead);
                sets.push(&rsub.replacement);
                sets
            }
        }
    }

    pub(crate) fn glyph_sets_mut(&mut self) -> Vec<&mut GlyphSet> {
        match self {
            Rule::Sub(sub) => {
                let mut sets: Vec<&mut GlyphSet> =
                    sub.slots.iter_mut().map(|slot| &mut slot.glyphs).collect();
                if let Replacement::Glyphs(glyphs) = &mut sub.replacement {
                    sets.extend(glyphs.iter_mut());
                }
                sets
            }
            Rule::Reverse(rsub) => {
                let mut sets: Vec<&mut GlyphSet> = rsub.backtrack.iter_mut().collect();
                sets.push(&mut rsub.input);
                sets.extend(rsub.lookahead.iter_mut());
                sets.push(&mut rsub.replacement);
                sets
            }
        }
    }

    pub fn nested_lookups(&self) -> Vec<&LookupRef> {
        match self {
            Rule::Sub(sub) => sub.slots.iter().flat_map(|slot| &slot.lookups).collect(),
            Rule::Reverse(_) => vec![],
        }
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Rule::Sub(sub) => sub.fmt(f),
            Rule::Reverse(rsub) => rsub.fmt(f),
        }
    }
}

impl From<Substitution> for Rule {
    fn from(sub: Substitution) -> Self {
        Rule::Sub(sub)
    }
}

impl From<ReverseSubstitution> for Rule {
    fn from(rsub: ReverseSubstitution) -> Self {
        Rule::Reverse(rsub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_forms() {
        assert_eq!(Substitution::new().slot("a").by("b").to_string(), "sub a by b;");
        assert_eq!(
            Substitution::new().slot("a").by_sequence(["a", "m"]).to_string(),
            "sub a by a m;"
        );
        assert_eq!(Substitution::new().slot("a").slot("b").by("ab").to_string(), "sub a b by ab;");
        assert_eq!(Substitution::new().slot("a").by_null().to_string(), "sub a by NULL;");
    }

    #[test]
    fn test_contextual_forms() {
        let rule = Substitution::new()
            .slot(GlyphSet::class("mvs"))
            .input_with("a.isol", "MNG:chachlag")
            .slot("fvs1");
        assert_eq!(rule.to_string(), "sub @mvs a.isol' lookup MNG:chachlag fvs1;");
        assert!(rule.is_contextual());
        assert_eq!(rule.input_range(), (1, 2));

        let plain = Substitution::new().slot("a").slot("b").by("c");
        assert!(!plain.is_contextual());
        assert_eq!(plain.input_range(), (0, 2));
    }

    #[test]
    fn test_reverse_form() {
        let rule = ReverseSubstitution::new("n.medi", "n.medi.marked")
            .lookahead(GlyphSet::class("MNG-marked.A"));
        assert_eq!(rule.to_string(), "rsub n.medi' @MNG-marked.A by n.medi.marked;");
    }
}
