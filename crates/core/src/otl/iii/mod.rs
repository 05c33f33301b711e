//! Phase III: contextual shaping under `rclt`.
//!
//! III.0 prepares controls and gender markers, III.1 to III.4 apply the
//! phonetic and graphemic conditions (chachlag, syllabic, particle, devsger),
//! III.5 adjusts vowels after bowed consonants and III.6 applies variants
//! selected by FVS.

mod chachlag;
mod controls;
mod devsger;
mod fvs;
mod gender;
mod particle;
mod post_bowed;
mod syllabic;

use super::Composer;
use crate::{Result, data::LocaleId};

pub(super) fn compose(c: &mut Composer<'_>) -> Result<()> {
    controls::compose(c)?;
    if c.requested(LocaleId::Mng) {
        gender::compose(c)?;
    }
    chachlag::compose(c);
    syllabic::compose(c)?;
    particle::compose(c)?;
    devsger::compose(c)?;
    post_bowed::compose(c)?;
    fvs::compose(c)?;
    Ok(())
}
