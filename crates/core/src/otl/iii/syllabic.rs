//! III.2: syllabic conditions.
//!
//! Vowel marking after initial consonants, onset and devsger forms of
//! consonants, and the gender forms of _t_, _d_, _k_, _g_ and _h_.

use fea_composer::{GlyphSet, Substitution};

use super::gender::marked_pairs;
use crate::{
    Result,
    config::{MARKER_FEMININE, MARKER_MASCULINE},
    data::LocaleId::{self, Mch, MchX, Mng, MngX, Sib, Tod},
    otl::{Composer, condition, rclt},
    position::{Fina, Init, Isol, Medi},
};

pub(super) fn compose(c: &mut Composer<'_>) -> Result<()> {
    marked(c)?;
    z_f_i(c);
    chachlag_onset(c)?;
    feminine(c)?;
    n_onset_and_devsger(c);
    t_d_gender(c);
    k_g_h_gender(c);
    if c.requested(Mng) {
        g_h_gender(c)?;
        t_sh_g(c)?;
    }
    Ok(())
}

/// Hudum _a_ after MVS in its chachlag form, and the same for _e_.
fn chachlag_vowels(c: &Composer<'_>) -> Result<(GlyphSet, GlyphSet)> {
    Ok((
        c.code_point_writtens(Mng, 0x1820, "Aa", Isol)?,
        c.code_point_writtens(Mng, 0x1821, "Aa", Isol)?,
    ))
}

/// _o_, _u_, _oe_ and _ue_ after an initial consonant, and initial _d_
/// before a final vowel, take `marked` unless an FVS is adjacent.
fn marked(c: &mut Composer<'_>) -> Result<()> {
    if !c.among(&[Mng, MngX, Mch, MchX, Sib]).is_empty() {
        let mut lookup = rclt("III.o_u_oe_ue.marked").ignore_marks();
        if c.requested(Mng) {
            lookup.push(
                Substitution::new()
                    .slot(c.letter(Mng, "consonant.init"))
                    .input_with(c.variants(Mng, &["o", "u", "oe", "ue"], &[]), condition(Mng, "marked")),
            );
        }
        if c.requested(MngX) {
            lookup.push(
                Substitution::new()
                    .slot(c.letter(MngX, "consonant.init"))
                    .input_with(c.variants(MngX, &["o", "ue"], &[]), condition(MngX, "marked")),
            );
            lookup.push(
                Substitution::new()
                    .slot(c.letter(MngX, "consonant.init"))
                    .slot(c.letter(MngX, "hX"))
                    .input_with(c.letter(MngX, "ue"), condition(MngX, "marked")),
            );
        }
        for locale in c.among(&[Sib, Mch, MchX]) {
            lookup.push(
                Substitution::new()
                    .slot(c.letter(locale, "consonant.init"))
                    .input_with(c.variants(locale, &["o", "u"], &[]), condition(locale, "marked")),
            );
        }
        c.add(lookup);
    }

    if !c.requested(Mng) {
        return Ok(());
    }
    let fvs = c.class("fvs");
    let reset = condition(Mng, "reset");
    let marked = condition(Mng, "marked");

    let ending = c.variants(Mng, &["o", "u", "oe", "ue"], &[Medi, Fina]);
    let mut lookup = rclt("III.o_u_oe_ue.marked.GB.A").mark_filtering_set(fvs.clone());
    lookup.push(Substitution::new().input_with(ending.clone(), &reset).slot(fvs.clone()));
    lookup.push(Substitution::new().slot(fvs.clone()).input_with(ending, &reset));
    c.add(lookup);

    let mut lookup = rclt("III.o_u_oe_ue.marked.GB.B").mark_filtering_set(fvs.clone());
    lookup.push(
        Substitution::new()
            .slot(c.variants(Mng, &["g", "h"], &[Init]))
            .slot(GlyphSet::union([c.class("fvs2"), c.class("fvs4")]))
            .input_with(c.variants(Mng, &["oe", "ue"], &[Fina]), &marked),
    );
    c.add(lookup);

    let letters = c.categories(Mng, &["vowelMasculine", "vowelNeuter", "consonant"]);
    let (_, marked_letters) = marked_pairs(c, &letters)?;
    let marked_letters = c.define_class("MNG-marked.C", marked_letters);
    let onset = GlyphSet::union([c.letter(Mng, "consonant.init"), marked_letters.clone()]);

    let mut lookup = rclt("III.o_u_oe_ue.initial_marked.GB.A").ignore_marks();
    lookup.push(Substitution::new().slot(onset.clone()).input_with(c.letter(Mng, "consonant.medi"), "_.marked.MNG"));
    c.add(lookup);

    let mut lookup = rclt("III.o_u_oe_ue.initial_marked.GB.B").ignore_marks();
    lookup.push(
        Substitution::new()
            .slot(onset)
            .input_with(c.variants(Mng, &["o", "u", "oe", "ue"], &[Medi]), &marked),
    );
    c.add(lookup);

    let mut lookup = rclt("III.o_u_oe_ue.initial_marked.GB.C");
    lookup.push(Substitution::new().input_with(marked_letters, "_.unmarked.MNG"));
    c.add(lookup);

    let d_init = c.letter(Mng, "d.init");
    let vowel_fina = c.letter(Mng, "vowel.fina");
    let mut lookup = rclt("III.d.marked").ignore_marks();
    lookup.push(Substitution::new().input_with(d_init.clone(), &marked).slot(vowel_fina.clone()));
    c.add(lookup);

    let mut lookup = rclt("III.d.marked.GB").mark_filtering_set(fvs.clone());
    lookup.push(Substitution::new().input_with(d_init.clone(), &reset).slot(vowel_fina.clone()).slot(fvs.clone()));
    lookup.push(Substitution::new().input_with(d_init, &reset).slot(fvs).slot(vowel_fina));
    c.add(lookup);
    Ok(())
}

/// Sibe _z_ before _i_, Manchu _i_ after _z_, Manchu _f_ before rounded
/// vowels and Manchu Ali Gali _i_ after affricates take `marked`.
fn z_f_i(c: &mut Composer<'_>) {
    if c.among(&[Sib, Mch, MchX]).is_empty() {
        return;
    }
    let mut lookup = rclt("III.z_f_i.marked.SIB_MCH_MCHx").ignore_marks();
    if c.requested(Sib) {
        lookup.push(
            Substitution::new()
                .input_with(c.letter(Sib, "z"), condition(Sib, "marked"))
                .slot(c.letter(Sib, "i")),
        );
    }
    if c.requested(Mch) {
        lookup.push(
            Substitution::new()
                .slot(c.letter(Mch, "z"))
                .input_with(c.letter(Mch, "i"), condition(Mch, "marked")),
        );
        lookup.push(
            Substitution::new()
                .input_with(c.letter(Mch, "f"), condition(Mch, "marked"))
                .slot(c.variants(Mch, &["i", "o", "u", "ue"], &[])),
        );
    }
    if c.requested(MchX) {
        lookup.push(
            Substitution::new()
                .slot(c.variants(MchX, &["cX", "z", "jhX"], &[]))
                .input_with(c.letter(MchX, "i"), condition(MchX, "marked")),
        );
    }
    c.add(lookup);
}

/// Consonants before MVS and a chachlag vowel take `chachlag_onset`.
fn chachlag_onset(c: &mut Composer<'_>) -> Result<()> {
    if c.among(&[Mng, MngX]).is_empty() {
        return Ok(());
    }
    let (a, e) = chachlag_vowels(c)?;
    let mvs = c.class("mvs.valid");
    let onset = condition(Mng, "chachlag_onset");

    let mut lookup = rclt("III.n_j_w_h_g_a.chachlag_onset.MNG_MNGx").ignore_marks();
    if c.requested(Mng) {
        lookup.push(
            Substitution::new()
                .input_with(c.variants(Mng, &["n.fina", "j.isol", "j.fina", "w.fina"], &[]), &onset)
                .slot(mvs.clone())
                .slot(GlyphSet::union([a.clone(), e.clone()])),
        );
        lookup.push(
            Substitution::new()
                .input_with(c.variants(Mng, &["h", "g"], &[Fina]), &onset)
                .slot(mvs.clone())
                .slot(a.clone()),
        );
    }
    if c.requested(MngX) {
        lookup.push(
            Substitution::new()
                .input_with(c.letter(MngX, "a.fina"), &onset)
                .slot(mvs.clone())
                .slot(a),
        );
    }
    c.add(lookup);

    if c.requested(Mng) {
        let mut lookup = rclt("III.g.chachlag_onset.MNG.GB").ignore_marks();
        lookup.push(
            Substitution::new()
                .input_with(c.letter(Mng, "g.fina"), condition(Mng, "chachlag_onset_gb"))
                .slot(mvs)
                .slot(e),
        );
        c.add(lookup);
    }
    Ok(())
}

/// _e_ and _u_ after _t_, _d_, _k_, _g_ or _h_ take `feminine`.
fn feminine(c: &mut Composer<'_>) -> Result<()> {
    let locales = c.among(&[Sib, Mch, MchX]);
    if locales.is_empty() {
        return Ok(());
    }
    let mut lookup = rclt("III.e_u.feminine.SIB_MCH_MCHx").ignore_marks();
    for locale in locales {
        let consonants = if locale == MchX {
            c.variants(MchX, &["tX", "t", "d", "dhX", "g", "k", "ghX", "h"], &[])
        } else {
            c.variants(locale, &["t", "d", "k", "g", "h"], &[])
        };
        let e_u = c.variants(locale, &["e", "u"], &[]);
        let oh = c.code_point_writtens(locale, 0x1860, "Oh", Fina)?;
        lookup.push(
            Substitution::new()
                .slot(consonants.clone())
                .input_with(oh, condition(locale, "feminine_marked")),
        );
        lookup.push(
            Substitution::new()
                .slot(consonants)
                .input_with(e_u.clone(), condition(locale, "feminine")),
        );
        if locale == MchX {
            lookup.push(
                Substitution::new()
                    .slot(c.variants(MchX, &["ngX", "sbm"], &[]))
                    .input_with(e_u, condition(MchX, "feminine")),
            );
        }
    }
    c.add(lookup);
    Ok(())
}

/// _n_ before a vowel takes `onset`, before a consonant `devsger`.
fn n_onset_and_devsger(c: &mut Composer<'_>) {
    let locales = c.among(&[Mng, Tod, Sib, Mch, MchX]);
    if locales.is_empty() {
        return;
    }
    let mut lookup = rclt("III.n.onset_and_devsger.MNG_TOD_SIB_MCH_MCHx").ignore_marks();
    for locale in locales {
        lookup.push(
            Substitution::new()
                .input_with(c.letter(locale, "n"), condition(locale, "onset"))
                .slot(c.letter(locale, "vowel")),
        );
        lookup.push(
            Substitution::new()
                .input_with(c.letter(locale, "n"), condition(locale, "devsger"))
                .slot(c.letter(locale, "consonant")),
        );
    }
    c.add(lookup);
}

/// _t_ and _d_: onset or devsger in Hudum, gender forms in Sibe and Manchu.
fn t_d_gender(c: &mut Composer<'_>) {
    if c.among(&[Mng, Sib, Mch, MchX]).is_empty() {
        return;
    }
    let mut lookup = rclt("III.t_d.onset_and_devsger_and_gender.MNG_MCH_MCHx").ignore_marks();
    if c.requested(Mng) {
        lookup.push(
            Substitution::new()
                .input(c.variants(Mng, &["t", "d"], &[Init]))
                .slot(c.letter(Mng, "vowel.fina")),
        );
        let t_like = c.variants(Mng, &["t", "d"], &[]);
        lookup.push(
            Substitution::new()
                .input_with(t_like.clone(), condition(Mng, "onset"))
                .slot(c.letter(Mng, "vowel")),
        );
        lookup.push(
            Substitution::new()
                .input_with(t_like, condition(Mng, "devsger"))
                .slot(c.letter(Mng, "consonant")),
        );
    }
    for locale in c.among(&[Sib, Mch, MchX]) {
        let t_like = if locale == MchX {
            c.variants(MchX, &["tX", "dhX"], &[])
        } else {
            c.variants(locale, &["t", "d"], &[])
        };
        lookup.push(
            Substitution::new()
                .input_with(t_like.clone(), condition(locale, "masculine_onset"))
                .slot(c.variants(locale, &["a", "i", "o"], &[])),
        );
        lookup.push(
            Substitution::new()
                .input_with(t_like, condition(locale, "feminine"))
                .slot(c.variants(locale, &["e", "u", "ue"], &[])),
        );
        if locale != MchX {
            lookup.push(
                Substitution::new()
                    .input_with(c.letter(locale, "t"), condition(locale, "devsger"))
                    .slot(c.letter(locale, "consonant")),
            );
            lookup.push(
                Substitution::new()
                    .slot(c.letter(locale, "vowel"))
                    .input_with(c.letter(locale, "t.fina"), condition(locale, "devsger")),
            );
        }
    }
    c.add(lookup);
}

fn g_like(c: &Composer<'_>, locale: LocaleId) -> GlyphSet {
    match locale {
        Mng | Tod => c.variants(locale, &["h", "g"], &[]),
        _ => c.variants(locale, &["k", "g", "h"], &[]),
    }
}

/// _k_, _g_ and _h_ take a masculine or feminine form from the adjacent
/// vowel, or devsger before a consonant.
fn k_g_h_gender(c: &mut Composer<'_>) {
    let locales = c.among(&[Mng, Tod, Sib, Mch]);
    if locales.is_empty() {
        return;
    }
    let mut lookup = rclt("III.k_g_h.onset_and_devsger_and_gender.MNG_TOD_SIB_MCH").ignore_marks();
    if c.requested(Mng) {
        lookup.push(
            Substitution::new()
                .input(g_like(c, Mng))
                .slot(c.class("mvs"))
                .slot(c.variants(Mng, &["a", "e"], &[Isol])),
        );
    }
    for &locale in &locales {
        lookup.push(
            Substitution::new()
                .input_with(g_like(c, locale), condition(locale, "masculine_onset"))
                .slot(c.letter(locale, "vowelMasculine")),
        );
    }
    for &locale in &locales {
        lookup.push(
            Substitution::new()
                .input_with(g_like(c, locale), condition(locale, "feminine"))
                .slot(GlyphSet::union([c.letter(locale, "vowelFeminine"), c.letter(locale, "vowelNeuter")])),
        );
    }
    if c.requested(Mng) {
        lookup.push(
            Substitution::new()
                .slot(c.letter(Mng, "vowelMasculine"))
                .input_with(g_like(c, Mng), condition(Mng, "masculine_devsger")),
        );
        lookup.push(
            Substitution::new()
                .slot(c.letter(Mng, "vowelFeminine"))
                .input_with(g_like(c, Mng), condition(Mng, "feminine")),
        );
    }
    if c.requested(Tod) {
        lookup.push(
            Substitution::new()
                .slot(c.letter(Tod, "vowel"))
                .input_with(c.letter(Tod, "g"), condition(Tod, "masculine_devsger")),
        );
    }
    if c.requested(Sib) {
        lookup.push(
            Substitution::new()
                .input_with(c.letter(Sib, "k"), condition(Sib, "devsger"))
                .slot(c.letter(Sib, "consonant")),
        );
        lookup.push(
            Substitution::new()
                .slot(c.letter(Sib, "vowel"))
                .input_with(c.letter(Sib, "k.fina"), condition(Sib, "devsger")),
        );
    }
    if c.requested(Mch) {
        let k = c.letter(Mch, "k");
        let rules = [
            (vec![c.letter(Mch, "t"), c.letter(Mch, "e")], "masculine_devsger"),
            (vec![c.variants(Mch, &["k", "g", "h"], &[]), c.letter(Mch, "u")], "feminine"),
            (vec![c.variants(Mch, &["kh", "gh", "hh"], &[]), c.letter(Mch, "a")], "feminine"),
            (vec![c.variants(Mch, &["e", "ue"], &[])], "feminine"),
            (vec![c.variants(Mch, &["a", "i", "o", "u"], &[])], "masculine_devsger"),
        ];
        for (backtrack, name) in rules {
            let rule = backtrack.into_iter().fold(Substitution::new(), |rule, set| rule.slot(set));
            lookup.push(rule.input_with(k.clone(), condition(Mch, name)));
        }
    }
    c.add(lookup);
}

/// Hudum _g_ and _h_ with the gender markers left by III.0b, then the
/// markers are removed.
fn g_h_gender(c: &mut Composer<'_>) -> Result<()> {
    let masculine = c.glyph(MARKER_MASCULINE);
    let g_h = c.variants(Mng, &["h", "g"], &[]);
    let a_like = c.variants(Mng, &["a", "e"], &[Isol]);
    let vowel = c.letter(Mng, "vowel");
    let mvs = c.class("mvs");

    let mut lookup = rclt("III.g_h.onset_and_devsger_and_gender.A.MNG").mark_filtering_set(masculine.clone());
    lookup.push(Substitution::new().input(g_h.clone()).slot(vowel.clone()));
    lookup.push(Substitution::new().input(g_h.clone()).slot(masculine.clone()).slot(vowel));
    lookup.push(Substitution::new().input(g_h.clone()).slot(mvs.clone()).slot(a_like.clone()));
    lookup.push(Substitution::new().input(g_h.clone()).slot(masculine.clone()).slot(mvs).slot(a_like));
    lookup.push(
        Substitution::new()
            .slot(c.letter(Mng, "i"))
            .input_with(g_h, condition(Mng, "masculine_devsger"))
            .slot(masculine),
    );
    lookup.push(
        Substitution::new()
            .slot(c.letter(Mng, "i"))
            .input_with(c.letter(Mng, "g"), condition(Mng, "feminine")),
    );
    c.add(lookup);

    let mut lookup = rclt("III.g_h.onset_and_devsger_and_gender.B.MNG").ignore_marks();
    lookup.push(
        Substitution::new()
            .input_with(c.variants(Mng, &["h", "g"], &[Init]), condition(Mng, "feminine"))
            .slot(c.letter(Mng, "consonant")),
    );
    c.add(lookup);

    for (step, marker) in [("A", MARKER_MASCULINE), ("B", MARKER_FEMININE)] {
        let marker = c.glyph(marker);
        let mut lookup = rclt(format!("III.ig.post_processing.{step}.MNG")).mark_filtering_set(marker.clone());
        for alias in ["h", "g"] {
            for v in c.letter_variants(Mng, alias)? {
                if matches!(v.position, Init | Medi | Fina) {
                    let glyph = c.glyph(&v.glyph.to_string());
                    lookup.push(Substitution::new().slot(glyph.clone()).slot(marker.clone()).by(glyph));
                }
            }
        }
        c.add(lookup);
    }
    Ok(())
}

/// _t_ devsger before _ee_ or a consonant, dotless _sh_ before _i_ and
/// dotless _g_ after _s_ or _d_.
fn t_sh_g(c: &mut Composer<'_>) -> Result<()> {
    let (a, _) = chachlag_vowels(c)?;
    let devsger = condition(Mng, "devsger");
    let dotless = condition(Mng, "dotless");
    let s_d = c.variants(Mng, &["s", "d"], &[]);

    let mut lookup = rclt("III.t_sh_g.MNG.GB").ignore_marks();
    lookup.push(
        Substitution::new()
            .input_with(c.letter(Mng, "t"), &devsger)
            .slot(c.variants(Mng, &["ee", "consonant"], &[])),
    );
    lookup.push(
        Substitution::new()
            .input_with(c.letter(Mng, "sh.init"), &dotless)
            .slot(c.letter(Mng, "i.medi")),
    );
    lookup.push(
        Substitution::new()
            .input_with(c.letter(Mng, "sh.medi"), &dotless)
            .slot(c.variants(Mng, &["i"], &[Medi, Fina])),
    );
    lookup.push(
        Substitution::new()
            .slot(s_d.clone())
            .input_with(c.letter(Mng, "g.medi"), &dotless)
            .slot(c.letter(Mng, "vowelMasculine")),
    );
    lookup.push(
        Substitution::new()
            .slot(s_d)
            .input_with(c.letter(Mng, "g.fina"), &dotless)
            .slot(c.class("mvs"))
            .slot(a),
    );
    c.add(lookup);
    Ok(())
}
