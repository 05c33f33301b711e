//! III.4: devsger _i_ and _u_ after a vowel.

use fea_composer::{GlyphSet, Substitution};

use crate::{
    Result,
    data::LocaleId::{Mch, MchX, Mng, Sib, Tod},
    otl::{Composer, condition, rclt},
    position::{Fina, Init, Medi},
};

pub(super) fn compose(c: &mut Composer<'_>) -> Result<()> {
    if c.among(&[Mng, Tod, Sib, Mch, MchX]).is_empty() {
        return Ok(());
    }
    let mut lookup = rclt("III.i_u.devsger.MNG_TOD_SIB_MCH_MCHx").ignore_marks();
    if c.requested(Mng) {
        let vowels = c.vowels(Mng);
        let open = c.writtens_where(Mng, &[Init, Medi], &vowels, |units| {
            units.last().is_some_and(|unit| unit != "I")
        })?;
        let open = c.define_class("MNG-vowel.not_ending_with_I", open);
        lookup.push(
            Substitution::new()
                .slot(open)
                .input_with(c.letter(Mng, "i"), condition(Mng, "vowel_devsger")),
        );
    }
    if c.requested(Tod) {
        lookup.push(
            Substitution::new()
                .slot(c.letter(Tod, "vowel"))
                .input_with(c.letter(Tod, "i"), condition(Tod, "vowel_devsger")),
        );
        lookup.push(
            Substitution::new()
                .slot(c.letter(Tod, "u"))
                .input_with(c.letter(Tod, "u"), condition(Tod, "vowel_devsger")),
        );
    }
    let followers = [(Sib, &["i", "u"][..]), (Mch, &["i"][..]), (MchX, &["u"][..])];
    for (locale, aliases) in followers {
        if !c.requested(locale) {
            continue;
        }
        for alias in aliases {
            lookup.push(
                Substitution::new()
                    .slot(c.letter(locale, "vowel"))
                    .input_with(c.letter(locale, alias), condition(locale, "vowel_devsger")),
            );
        }
    }
    c.add(lookup);

    if c.requested(Mng) {
        let fvs = c.class("fvs");
        let reset = condition(Mng, "reset");
        let devsger = condition(Mng, "vowel_devsger");
        let rounded = c.variants(Mng, &["oe", "ue"], &[Medi]);
        let ue_init = c.letter(Mng, "ue.init");
        let i_ending = c.variants(Mng, &["i"], &[Medi, Fina]);
        let i = c.letter(Mng, "i");

        let mut lookup = rclt("III.i.devsger.MNG.GB").mark_filtering_set(fvs);
        lookup.push(
            Substitution::new()
                .slot(rounded.clone())
                .slot(GlyphSet::union([c.class("fvs1"), c.class("fvs2")]))
                .input_with(i_ending.clone(), &reset),
        );
        lookup.push(
            Substitution::new()
                .slot(rounded)
                .slot(c.class("fvs3"))
                .input_with(i.clone(), &devsger),
        );
        lookup.push(
            Substitution::new()
                .slot(ue_init.clone())
                .slot(c.class("fvs2"))
                .input_with(i_ending, &reset),
        );
        lookup.push(
            Substitution::new()
                .slot(ue_init)
                .slot(c.class("fvs1"))
                .input_with(i, &devsger),
        );
        c.add(lookup);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use fea_composer::GlyphSet;

    use crate::{data::LocaleId, otl::tests::compose};

    #[test]
    fn test_open_vowel_class() {
        let (_, fea) = compose(&[LocaleId::Mng]);
        let open = fea.flatten(&GlyphSet::class("MNG-vowel.not_ending_with_I"));
        assert!(open.contains(&"u1820.A.init".to_string()));
        assert!(open.contains(&"u1823.O.medi".to_string()));
        assert!(!open.iter().any(|g| g.starts_with("u1822")));
    }

    #[test]
    fn test_undeclared_condition_drops_rules() {
        let (_, fea) = compose(&[LocaleId::Mng]);
        assert!(!fea.has_lookup("III.i_u.devsger.MNG_TOD_SIB_MCH_MCHx"));
    }
}
