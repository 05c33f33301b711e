//! Feature file assembly and text emission.

use std::{collections::HashSet, fmt::Write};

use indexmap::IndexMap;
use log::debug;

use crate::{
    glyphs::{GlyphSet, Member},
    lookup::Lookup,
    rule::{LookupRef, Replacement, Rule},
};

/// Glyph lists for the four GDEF glyph classes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GdefClasses {
    pub bases: Vec<String>,
    pub ligatures: Vec<String>,
    pub marks: Vec<String>,
    pub components: Vec<String>,
}

impl GdefClasses {
    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
            && self.ligatures.is_empty()
            && self.marks.is_empty()
            && self.components.is_empty()
    }
}

/// Collects classes and lookups in creation order and writes them as FEA text.
///
/// Empty classes and lookups are never stored. Rules that mention an empty
/// glyph set or a lookup that does not exist are dropped when their lookup is
/// added, so a builder fed with partial data still emits a valid file.
#[derive(Debug, Clone, Default)]
pub struct FeaBuilder {
    language_systems: Vec<(String, String)>,
    classes: IndexMap<String, GlyphSet>,
    lookups: IndexMap<String, Lookup>,
    features: IndexMap<String, Vec<String>>,
    gdef: GdefClasses,
}

impl FeaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn language_system(&mut self, script: impl Into<String>, language: impl Into<String>) {
        let entry = (script.into(), language.into());
        if !self.language_systems.contains(&entry) {
            self.language_systems.push(entry);
        }
    }

    /// Define a named class and return a reference to it, or an empty set when
    /// no member survives.
    pub fn define_class(&mut self, name: impl Into<String>, members: impl Into<GlyphSet>) -> GlyphSet {
        let name = name.into();
        let mut members = members.into();
        self.normalize(&mut members);
        if members.is_empty() {
            debug!("skipping empty class @{name}");
            return GlyphSet::new();
        }
        self.classes.insert(name.clone(), members);
        GlyphSet::class(name)
    }

    /// Reference to a defined class, or an empty set.
    pub fn class(&self, name: &str) -> GlyphSet {
        if self.classes.contains_key(name) { GlyphSet::class(name) } else { GlyphSet::new() }
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn classes(&self) -> &IndexMap<String, GlyphSet> {
        &self.classes
    }

    /// Expand class references into glyph names, first occurrence wins.
    pub fn flatten(&self, set: &GlyphSet) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut glyphs = Vec::new();
        self.flatten_into(set, &mut seen, &mut glyphs);
        glyphs
    }

    fn flatten_into(&self, set: &GlyphSet, seen: &mut HashSet<String>, glyphs: &mut Vec<String>) {
        for member in set.members() {
            match member {
                Member::Glyph(name) => {
                    if seen.insert(name.clone()) {
                        glyphs.push(name.clone());
                    }
                }
                Member::Class(name) => {
                    if let Some(inner) = self.classes.get(name) {
                        self.flatten_into(inner, seen, glyphs);
                    }
                }
            }
        }
    }

    fn normalize(&self, set: &mut GlyphSet) {
        set.retain(|member| match member {
            Member::Glyph(_) => true,
            Member::Class(name) => self.classes.contains_key(name),
        });
    }

    fn rule_is_usable(&self, rule: &Rule) -> bool {
        if rule.glyph_sets().iter().any(|set| set.is_empty()) {
            return false;
        }
        if rule.nested_lookups().iter().any(|lookup| !self.lookups.contains_key(lookup.name())) {
            return false;
        }
        match rule {
            Rule::Sub(sub) => {
                !sub.slots.is_empty()
                    && (sub.is_contextual() || sub.replacement != Replacement::Keep)
            }
            Rule::Reverse(_) => true,
        }
    }

    /// Store a lookup. Returns `None` when nothing usable is left in it.
    pub fn add_lookup(&mut self, mut lookup: Lookup) -> Option<LookupRef> {
        if let Some(set) = lookup.flags.mark_filtering_set.as_mut() {
            self.normalize(set);
            if set.is_empty() {
                lookup.flags.mark_filtering_set = None;
                lookup.flags.ignore_marks = true;
            }
        }

        let rules = std::mem::take(&mut lookup.rules);
        for mut rule in rules {
            for set in rule.glyph_sets_mut() {
                self.normalize(set);
            }
            if self.rule_is_usable(&rule) {
                lookup.rules.push(rule);
            } else {
                debug!("{}: dropping rule `{rule}`", lookup.name);
            }
        }

        if lookup.is_empty() {
            debug!("skipping empty lookup {}", lookup.name);
            return None;
        }

        let name = lookup.name.clone();
        if let Some(tag) = &lookup.feature {
            self.features.entry(tag.clone()).or_default().push(name.clone());
        }
        self.lookups.insert(name.clone(), lookup);
        Some(LookupRef::new(name))
    }

    pub fn has_lookup(&self, name: &str) -> bool {
        self.lookups.contains_key(name)
    }

    pub fn lookup(&self, name: &str) -> Option<&Lookup> {
        self.lookups.get(name)
    }

    pub fn lookups(&self) -> impl Iterator<Item = &Lookup> {
        self.lookups.values()
    }

    /// Feature tags mapped to their lookup names, in first-use order.
    pub fn features(&self) -> &IndexMap<String, Vec<String>> {
        &self.features
    }

    pub fn set_gdef(&mut self, gdef: GdefClasses) {
        self.gdef = gdef;
    }

    pub fn gdef(&self) -> &GdefClasses {
        &self.gdef
    }

    /// Every glyph name mentioned by a class, a rule or a lookup flag.
    pub fn referenced_glyphs(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut glyphs = Vec::new();
        for set in self.classes.values() {
            self.flatten_into(set, &mut seen, &mut glyphs);
        }
        for lookup in self.lookups.values() {
            if let Some(set) = &lookup.flags.mark_filtering_set {
                self.flatten_into(set, &mut seen, &mut glyphs);
            }
            for rule in &lookup.rules {
                for set in rule.glyph_sets() {
                    self.flatten_into(set, &mut seen, &mut glyphs);
                }
            }
        }
        glyphs
    }

    pub fn emit_text(&self) -> String {
        let mut out = String::new();

        for (script, language) in &self.language_systems {
            let _ = writeln!(out, "languagesystem {script} {language};");
        }
        if !self.language_systems.is_empty() {
            out.push('\n');
        }

        for (name, members) in &self.classes {
            let _ = writeln!(out, "@{name} = [{}];", join_members(members));
        }
        if !self.classes.is_empty() {
            out.push('\n');
        }

        for lookup in self.lookups.values() {
            let _ = writeln!(out, "lookup {} {{", lookup.name);
            if lookup.flags.ignore_marks {
                let _ = writeln!(out, "    lookupflag IgnoreMarks;");
            } else if let Some(set) = &lookup.flags.mark_filtering_set {
                let _ = writeln!(out, "    lookupflag UseMarkFilteringSet [{}];", join_members(set));
            }
            for rule in &lookup.rules {
                let _ = writeln!(out, "    {rule}");
            }
            let _ = writeln!(out, "}} {};\n", lookup.name);
        }

        for (tag, names) in &self.features {
            let _ = writeln!(out, "feature {tag} {{");
            for name in names {
                let _ = writeln!(out, "    lookup {name};");
            }
            let _ = writeln!(out, "}} {tag};\n");
        }

        if !self.gdef.is_empty() {
            let class = |glyphs: &[String]| {
                if glyphs.is_empty() { String::new() } else { format!("[{}]", glyphs.join(" ")) }
            };
            let _ = writeln!(out, "table GDEF {{");
            let _ = writeln!(
                out,
                "    GlyphClassDef {}, {}, {}, {};",
                class(&self.gdef.bases),
                class(&self.gdef.ligatures),
                class(&self.gdef.marks),
                class(&self.gdef.components)
            );
            let _ = writeln!(out, "}} GDEF;");
        }

        out
    }
}

fn join_members(set: &GlyphSet) -> String {
    set.members().iter().map(|m| m.to_string()).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{ReverseSubstitution, Substitution};

    #[test]
    fn test_empty_class_is_not_defined() {
        let mut fea = FeaBuilder::new();
        assert!(fea.define_class("empty", GlyphSet::new()).is_empty());
        assert!(!fea.has_class("empty"));

        // A class that only references a missing class is empty too.
        assert!(fea.define_class("outer", GlyphSet::class("missing")).is_empty());
    }

    #[test]
    fn test_flatten_nested_classes() {
        let mut fea = FeaBuilder::new();
        let inner = fea.define_class("inner", GlyphSet::from_iter(["a".to_string(), "b".to_string()]));
        let mut outer = inner.clone();
        outer.push_glyph("c");
        outer.push_glyph("a");
        let outer = fea.define_class("outer", outer);
        assert_eq!(fea.flatten(&outer), ["a", "b", "c"]);
    }

    #[test]
    fn test_rules_with_missing_parts_are_dropped() {
        let mut fea = FeaBuilder::new();
        let mut lookup = Lookup::new("test");
        lookup.push(Substitution::new().slot("a").by("b"));
        lookup.push(Substitution::new().slot(GlyphSet::class("missing")).by("b"));
        lookup.push(Substitution::new().input_with("a", "undefined"));
        lookup.push(Substitution::new().slot("a"));
        let lookup = fea.add_lookup(lookup);
        assert_eq!(lookup.map(|l| l.name().to_string()), Some("test".to_string()));
        assert_eq!(fea.lookup("test").map(|l| l.rules.len()), Some(1));

        let mut empty = Lookup::new("empty").feature("rclt");
        empty.push(Substitution::new().slot(GlyphSet::new()).by("b"));
        assert!(fea.add_lookup(empty).is_none());
        assert!(!fea.has_lookup("empty"));
        assert!(fea.features().get("rclt").is_none());
    }

    #[test]
    fn test_empty_filtering_set_becomes_ignore_marks() {
        let mut fea = FeaBuilder::new();
        let mut lookup = Lookup::new("x").mark_filtering_set(GlyphSet::class("missing"));
        lookup.push(Substitution::new().slot("a").by("b"));
        fea.add_lookup(lookup);
        let flags = &fea.lookup("x").map(|l| l.flags.clone()).unwrap_or_default();
        assert!(flags.ignore_marks);
        assert!(flags.mark_filtering_set.is_none());
    }

    #[test]
    fn test_emit_text() {
        let mut fea = FeaBuilder::new();
        fea.language_system("mong", "dflt");
        fea.language_system("mong", "MNG");
        let fvs = fea.define_class("fvs", GlyphSet::from_iter(["fvs1".to_string(), "fvs2".to_string()]));

        let mut reset = Lookup::new("_.reset");
        reset.push(Substitution::new().slot("fvs1.valid").by("fvs1"));
        let reset = fea.add_lookup(reset);

        let mut main = Lookup::new("III.test").feature("rclt").mark_filtering_set(fvs.clone());
        if let Some(reset) = &reset {
            main.push(Substitution::new().slot("a").input_with(fvs.clone(), reset));
        }
        main.push(ReverseSubstitution::new("b", "c").lookahead("d"));
        fea.add_lookup(main);

        fea.set_gdef(GdefClasses {
            bases: vec!["a".into(), "b".into()],
            marks: vec!["fvs1".into()],
            ..Default::default()
        });

        let expected = "\
languagesystem mong dflt;
languagesystem mong MNG;

@fvs = [fvs1 fvs2];

lookup _.reset {
    sub fvs1.valid by fvs1;
} _.reset;

lookup III.test {
    lookupflag UseMarkFilteringSet [@fvs];
    sub a @fvs' lookup _.reset;
    rsub b' d by c;
} III.test;

feature rclt {
    lookup III.test;
} rclt;

table GDEF {
    GlyphClassDef [a b], , [fvs1], ;
} GDEF;
";
        assert_eq!(fea.emit_text(), expected);
        assert_eq!(fea.referenced_glyphs(), ["fvs1", "fvs2", "fvs1.valid", "a", "b", "d", "c"]);
    }
}
