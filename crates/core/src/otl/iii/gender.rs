//! III.0b: gender propagation for Hudum.
//!
//! Masculinity and femininity of a word must reach every letter. Steps A to
//! C carry masculinity forward and D to F femininity forward, each leaving a
//! marker only after _h_ and _g_. Steps G to K carry masculinity backward by
//! marking letters right to left, then turn surviving marks on _h_ and _g_
//! into masculine markers.

use fea_composer::{GlyphSet, Lookup, ReverseSubstitution, Substitution};

use crate::{
    Result,
    config::{GENDERED_LETTERS, MARKER_FEMININE, MARKER_MASCULINE, MVS},
    data::LocaleId::Mng,
    otl::{Composer, rclt},
    position::{Fina, Init, JoiningPosition, Medi},
};

const MARKED: &str = "_.marked.MNG";
const UNMARKED: &str = "_.unmarked.MNG";

pub(super) fn compose(c: &mut Composer<'_>) -> Result<()> {
    forward(c, "vowelMasculine", MARKER_MASCULINE, ["A", "B", "C"])?;
    forward(c, "vowelFeminine", MARKER_FEMININE, ["D", "E", "F"])?;
    backward(c)
}

fn forward(c: &mut Composer<'_>, vowels: &str, marker: &str, steps: [&str; 3]) -> Result<()> {
    let marker_glyph = c.glyph(marker);
    let [insert, carry, drop] = steps;

    let mut lookup = rclt(format!("III.ig.preprocessing.{insert}"));
    for alias in c.category(Mng, vowels) {
        for position in [Init, Medi] {
            let default = c.default_set(Mng, alias, position)?;
            lookup.push(Substitution::new().slot(default.clone()).by_sequence([default, marker_glyph.clone()]));
        }
    }
    c.add(lookup);

    let mut lookup = rclt(format!("III.ig.preprocessing.{carry}")).mark_filtering_set(marker_glyph.clone());
    for alias in c.categories(Mng, &["vowelNeuter", "consonant"]) {
        for position in [Medi, Fina] {
            let default = c.default_set(Mng, alias, position)?;
            lookup.push(
                Substitution::new()
                    .slot(marker_glyph.clone())
                    .input(default.clone())
                    .by_sequence([default, marker_glyph.clone()]),
            );
        }
    }
    c.add(lookup);

    let mut lookup = rclt(format!("III.ig.preprocessing.{drop}"));
    for alias in c.categories(Mng, &[vowels, "vowelNeuter", "consonant"]) {
        if GENDERED_LETTERS.contains(&alias) {
            continue;
        }
        for position in [Init, Medi, Fina] {
            let default = c.default_set(Mng, alias, position)?;
            lookup.push(Substitution::new().slot(default.clone()).slot(marker_glyph.clone()).by(default));
        }
    }
    c.add(lookup);
    Ok(())
}

/// Unmarked and marked default glyphs of `aliases`, index aligned.
pub(super) fn marked_pairs(c: &mut Composer<'_>, aliases: &[&str]) -> Result<(GlyphSet, GlyphSet)> {
    let mut unmarked = GlyphSet::new();
    let mut marked = GlyphSet::new();
    for alias in aliases {
        for position in [Init, Medi, Fina] {
            let default = c.default_set(Mng, alias, position)?;
            let mark = c.marked_glyph(alias, position)?;
            if default.is_empty() || mark.is_empty() {
                continue;
            }
            unmarked.extend(default);
            marked.extend(mark);
        }
    }
    Ok((unmarked, marked))
}

fn backward(c: &mut Composer<'_>) -> Result<()> {
    let letters = c.categories(Mng, &["vowelMasculine", "vowelNeuter", "consonant"]);
    let (unmarked, marked) = marked_pairs(c, &letters)?;
    let unmarked = c.define_class("MNG-unmarked.A", unmarked);
    let marked = c.define_class("MNG-marked.A", marked);

    let mut lookup = Lookup::new(MARKED);
    lookup.push(Substitution::new().slot(unmarked.clone()).by(marked.clone()));
    c.add(lookup);
    let mut lookup = Lookup::new(UNMARKED);
    lookup.push(Substitution::new().slot(marked.clone()).by(unmarked));
    c.add(lookup);

    let masculine = c.glyph(MARKER_MASCULINE);
    let carriers = c.categories(Mng, &["vowelNeuter", "consonant"]);

    let mut lookup = rclt("III.ig.preprocessing.G").ignore_marks();
    for alias in &carriers {
        for position in [Init, Medi] {
            let default = c.default_set(Mng, alias, position)?;
            lookup.push(Substitution::new().input_with(default, MARKED).slot(c.letter(Mng, "vowelMasculine")));
        }
    }
    let a_isol = c.letter(Mng, "a.isol");
    for alias in &letters {
        let default = c.default_set(Mng, alias, Fina)?;
        lookup.push(Substitution::new().input_with(default, MARKED).slot(c.class(MVS)).slot(a_isol.clone()));
    }
    c.add(lookup);

    let mut lookup = rclt("III.ig.preprocessing.H").mark_filtering_set(c.glyph(MARKER_FEMININE));
    for alias in &carriers {
        for position in [Init, Medi] {
            let default = c.default_set(Mng, alias, position)?;
            let mark = c.marked_glyph(alias, position)?;
            lookup.push(ReverseSubstitution::new(default, mark).lookahead(marked.clone()));
        }
    }
    c.add(lookup);

    let gendered: Vec<(&str, JoiningPosition)> =
        GENDERED_LETTERS.iter().flat_map(|alias| [(*alias, Init), (*alias, Medi)]).collect();

    let mut lookup = rclt("III.ig.preprocessing.I");
    for &(alias, position) in &gendered {
        let mark = c.marked_glyph(alias, position)?;
        lookup.push(Substitution::new().input_with(mark, UNMARKED).slot(masculine.clone()));
    }
    c.add(lookup);

    let others: Vec<&str> = letters.iter().copied().filter(|a| !GENDERED_LETTERS.contains(a)).collect();
    let (_, others_marked) = marked_pairs(c, &others)?;
    let others_marked = c.define_class("MNG-marked.B", others_marked);
    let mut lookup = rclt("III.ig.preprocessing.J");
    lookup.push(Substitution::new().input_with(others_marked, UNMARKED));
    c.add(lookup);

    let mut lookup = rclt("III.ig.preprocessing.K");
    for &(alias, position) in &gendered {
        let default = c.default_set(Mng, alias, position)?;
        let mark = c.marked_glyph(alias, position)?;
        lookup.push(Substitution::new().slot(mark).by_sequence([default, masculine.clone()]));
    }
    c.add(lookup);
    Ok(())
}

#[cfg(test)]
mod tests {
    use fea_composer::Shaper;

    use crate::{data::LocaleId, otl::tests::compose};

    fn run(fea: &fea_composer::FeaBuilder, steps: &[&str], glyphs: &[&str]) -> Vec<String> {
        let shaper = Shaper::new(fea);
        let mut buffer: Vec<String> = glyphs.iter().map(|g| g.to_string()).collect();
        for step in steps {
            shaper.apply_named(&format!("III.ig.preprocessing.{step}"), &mut buffer);
        }
        buffer
    }

    #[test]
    fn test_masculinity_reaches_following_g() {
        let (_, fea) = compose(&[LocaleId::Mng]);
        let shaped = run(&fea, &["A", "B", "C"], &["u1820.A.init", "u1828.N.medi", "u182D.G.medi", "u1822.I.fina"]);
        assert_eq!(shaped, ["u1820.A.init", "u1828.N.medi", "u182D.G.medi", "marker.masculine", "u1822.I.fina"]);
    }

    #[test]
    fn test_masculinity_reaches_preceding_g() {
        let (plan, fea) = compose(&[LocaleId::Mng]);
        assert_eq!(plan.new_glyphs["u182D.G.init.marked"].components, ["u182D.G.init"]);
        let steps = ["G", "H", "I", "J", "K"];
        let shaped = run(&fea, &steps, &["u182D.G.init", "u1828.N.medi", "u1822.I.medi", "u1820.A.fina"]);
        assert_eq!(shaped, ["u182D.G.init", "marker.masculine", "u1828.N.medi", "u1822.I.medi", "u1820.A.fina"]);

        let shaped = run(&fea, &steps, &["u182D.G.init", "u1828.N.medi", "u1822.I.fina"]);
        assert_eq!(shaped, ["u182D.G.init", "u1828.N.medi", "u1822.I.fina"]);
    }
}
