//! III.5: vowels after bowed consonants.
//!
//! A final vowel after _b_, _p_, _f_, _k_ or a bowed _g_ takes its
//! `post_bowed` form, which connects to the bow without a tooth.

use fea_composer::{GlyphSet, Substitution};

use crate::{
    Result,
    data::LocaleId::{self, Mch, MchX, Mng, MngX, Sib, Tod, TodX},
    otl::{Composer, condition, rclt},
    position::{Fina, Init, Medi},
};

/// Bowed consonant classes of a locale.
struct Bowed {
    b: GlyphSet,
    k: GlyphSet,
    g: GlyphSet,
}

impl Bowed {
    fn define(c: &mut Composer<'_>, locale: LocaleId, b: &[&str], k: &[&str], g: &[&str]) -> Result<Self> {
        let b = c.variants(locale, b, &[]);
        let k = c.variants(locale, k, &[]);
        let g = if g.is_empty() { GlyphSet::new() } else { c.writtens(locale, g, &[], None)? };
        Ok(Self {
            b: c.define_class(format!("{locale}-bowedB"), b),
            k: c.define_class(format!("{locale}-bowedK"), k),
            g: c.define_class(format!("{locale}-bowedG"), g),
        })
    }

    fn all(&self) -> GlyphSet {
        GlyphSet::union([self.b.clone(), self.k.clone(), self.g.clone()])
    }

    fn b_k(&self) -> GlyphSet {
        GlyphSet::union([self.b.clone(), self.k.clone()])
    }
}

pub(super) fn compose(c: &mut Composer<'_>) -> Result<()> {
    if c.requested(Mng) {
        hudum(c)?;
    }
    if c.requested(MngX) {
        let bowed = Bowed::define(c, MngX, &["pX", "phX", "b"], &["kX", "k2", "k"], &[])?;
        let mut lookup = rclt("III.vowel.post_bowed.MNGx").ignore_marks();
        lookup.push(
            Substitution::new()
                .slot(bowed.all())
                .input_with(c.variants(MngX, &["a", "o", "ue"], &[Fina]), condition(MngX, "post_bowed")),
        );
        // Only fonts that draw the post-wa a get this rule.
        lookup.push(
            Substitution::new()
                .slot(c.letter(MngX, "waX"))
                .input(c.letter(MngX, "a"))
                .by(c.glyph("u1820.Aa.isol.post_wa")),
        );
        c.add(lookup);
    }
    for locale in c.among(&[Tod, TodX]) {
        todo(c, locale)?;
    }
    for locale in c.among(&[Sib, Mch]) {
        let bowed = Bowed::define(c, locale, &["b", "p"], &["kh", "gh", "hh"], &["G", "Gx", "Gh", "Gc"])?;
        let post_bowed = condition(locale, "post_bowed");
        let mut lookup = rclt(format!("III.vowel.post_bowed.{locale}")).ignore_marks();
        lookup.push(
            Substitution::new()
                .slot(GlyphSet::union([bowed.b.clone(), bowed.g.clone()]))
                .input_with(c.variants(locale, &["e", "u"], &[Fina]), &post_bowed),
        );
        lookup.push(
            Substitution::new()
                .slot(bowed.b_k())
                .input_with(c.variants(locale, &["a", "o"], &[Fina]), &post_bowed),
        );
        c.add(lookup);
    }
    if c.requested(MchX) {
        let bowed = Bowed::define(c, MchX, &["pX", "p", "b", "bhX"], &["gh", "kh"], &["G", "Gh", "Gc"])?;
        let post_bowed = condition(MchX, "post_bowed");
        let e_u = c.variants(MchX, &["e", "u"], &[Fina]);
        let mut lookup = rclt("III.vowel.post_bowed.MCHx").ignore_marks();
        lookup.push(
            Substitution::new()
                .slot(GlyphSet::union([bowed.b.clone(), bowed.g.clone(), c.letter(MchX, "ghX")]))
                .input_with(e_u, &post_bowed),
        );
        lookup.push(
            Substitution::new()
                .slot(c.variants(MchX, &["ngX", "sbm"], &[]))
                .input_with(c.letter(MchX, "e.fina"), &post_bowed),
        );
        lookup.push(
            Substitution::new()
                .slot(bowed.b_k())
                .input_with(c.variants(MchX, &["a", "o"], &[Fina]), &post_bowed),
        );
        c.add(lookup);
    }
    Ok(())
}

fn hudum(c: &mut Composer<'_>) -> Result<()> {
    let bowed = Bowed::define(c, Mng, &["b", "p", "f"], &["k", "k2"], &["G", "Gx"])?;
    let post_bowed = condition(Mng, "post_bowed");
    let reset = condition(Mng, "reset");
    let marked = condition(Mng, "marked");
    let rounded = c.variants(Mng, &["o", "u", "oe", "ue"], &[Fina]);
    let oe_ue = c.variants(Mng, &["oe", "ue"], &[Fina]);
    let e_fina = c.letter(Mng, "e.fina");

    let mut lookup = rclt("III.vowel.post_bowed.MNG").ignore_marks();
    let long_ue = GlyphSet::union([
        c.code_point_writtens(Mng, 0x1825, "Ue", Fina)?,
        c.code_point_writtens(Mng, 0x1826, "Ue", Fina)?,
    ]);
    lookup.push(Substitution::new().slot(bowed.all()).input(long_ue));
    lookup.push(Substitution::new().slot(bowed.all()).input_with(rounded.clone(), &post_bowed));
    lookup.push(
        Substitution::new()
            .slot(bowed.b_k())
            .input_with(c.variants(Mng, &["a", "e"], &[Fina]), &post_bowed),
    );
    lookup.push(Substitution::new().slot(bowed.g.clone()).input_with(e_fina.clone(), &post_bowed));
    c.add(lookup);

    let mut lookup = rclt("III.fvs.post_bowed.preprocessing.GB");
    lookup.push(Substitution::new().slot(bowed.all()).input_with(c.class("fvs.ignored"), "_.reset"));
    c.add(lookup);

    let h_g = c.variants(Mng, &["h", "g"], &[]);
    let odd = GlyphSet::union([c.class("fvs1"), c.class("fvs3")]);
    let even = GlyphSet::union([c.class("fvs2"), c.class("fvs4")]);
    let mut lookup = rclt("III.vowel.post_bowed.MNG.GB").ignore_marks();
    lookup.push(Substitution::new().slot(h_g.clone()).slot(even.clone()).input_with(e_fina.clone(), &post_bowed));
    lookup.push(Substitution::new().slot(h_g.clone()).slot(odd.clone()).input_with(e_fina, &reset));
    lookup.push(
        Substitution::new()
            .slot(c.variants(Mng, &["b", "p", "f", "k", "k2"], &[Init]))
            .slot(c.class("fvs"))
            .input_with(oe_ue.clone(), &marked),
    );
    lookup.push(Substitution::new().slot(h_g).slot(odd).input_with(rounded, &reset));
    lookup.push(
        Substitution::new()
            .slot(c.variants(Mng, &["g", "h"], &[Init, Medi]))
            .slot(even.clone())
            .input_with(c.variants(Mng, &["o", "u"], &[Fina]), &reset),
    );
    lookup.push(
        Substitution::new()
            .slot(c.variants(Mng, &["g", "h"], &[Medi]))
            .slot(even.clone())
            .input_with(oe_ue.clone(), &post_bowed),
    );
    lookup.push(
        Substitution::new()
            .slot(c.variants(Mng, &["g", "h"], &[Init]))
            .slot(even)
            .input_with(oe_ue, &marked),
    );
    c.add(lookup);

    let mut lookup = rclt("III.fvs.post_bowed.postprocessing.GB");
    lookup.push(Substitution::new().slot(bowed.all()).input_with(c.class("fvs.invalid"), "_.ignored"));
    c.add(lookup);
    Ok(())
}

/// Todo and Todo Ali Gali, including vowels carrying the long vowel sign.
fn todo(c: &mut Composer<'_>, locale: LocaleId) -> Result<()> {
    let (bowed, vowels, lvs): (Bowed, &[&str], &[(&str, &str)]) = if locale == Tod {
        (
            Bowed::define(c, Tod, &["b", "p"], &["kh", "gh"], &["K", "G"])?,
            &["a", "i", "u", "ue"][..],
            &[("a", "AaLv")][..],
        )
    } else {
        (
            Bowed::define(c, TodX, &["pX", "p", "b"], &["kX", "khX", "gX"], &[])?,
            &["a", "i", "ue"][..],
            &[("a", "AaLv"), ("i", "IpLv"), ("ue", "OLv")][..],
        )
    };
    let mut lookup = rclt(format!("III.vowel.post_bowed.{locale}")).ignore_marks();
    lookup.push(
        Substitution::new()
            .slot(bowed.all())
            .input_with(c.variants(locale, vowels, &[Fina]), condition(locale, "post_bowed")),
    );
    for &(alias, written) in lvs {
        let target = c.writtens(locale, &[written], &[Fina], Some(&[alias][..]))?;
        lookup.push(
            Substitution::new()
                .slot(bowed.all())
                .input(c.letter(locale, &format!("{alias}_lvs.fina")))
                .by(target),
        );
    }
    c.add(lookup);
    Ok(())
}
