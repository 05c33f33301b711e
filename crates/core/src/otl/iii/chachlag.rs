//! III.1: chachlag.
//!
//! Isolated Hudum _a_ and _e_ after MVS take their chachlag form and the MVS
//! narrows. When an FVS follows the vowel the MVS is reset, so the particle
//! pass decides its width instead.

use fea_composer::Substitution;

use crate::{
    data::LocaleId::Mng,
    otl::{Composer, condition, rclt},
    position::Isol,
};

pub(super) fn compose(c: &mut Composer<'_>) {
    if !c.requested(Mng) {
        return;
    }
    let a_like = c.variants(Mng, &["a", "e"], &[Isol]);

    let mut lookup = rclt("III.a_e.chachlag").ignore_marks();
    lookup.push(
        Substitution::new()
            .input_with(c.class("mvs"), "_.narrow")
            .input_with(a_like.clone(), condition(Mng, "chachlag")),
    );
    c.add(lookup);

    let fvs = c.class("fvs");
    let mut lookup = rclt("III.a_e.chachlag.GB").mark_filtering_set(fvs.clone());
    lookup.push(Substitution::new().input_with(c.class("mvs"), "_.reset").slot(a_like).slot(fvs));
    c.add(lookup);
}
