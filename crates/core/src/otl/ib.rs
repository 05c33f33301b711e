//! Phase Ib: presentation forms.
//!
//! No rules are generated yet; vertical punctuation and optional treatments
//! will be added here.

use log::debug;

use super::Composer;

pub(super) fn compose(c: &mut Composer<'_>) {
    debug!("Ib: nothing to compose for {} locales", c.locales.len());
}
