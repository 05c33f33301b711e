//! Phase Ia: character level preprocessing.

use fea_composer::Lookup;

use super::Composer;
use crate::config::{FEATURE_CCMP, MVS, NNBSP};

/// NNBSP is shaped as MVS, so it takes part in chachlag and particles.
pub(super) fn compose(c: &mut Composer<'_>) {
    let mut lookup = Lookup::new("Ia.nnbsp.preprocessing").feature(FEATURE_CCMP);
    lookup.push(c.substitution(NNBSP, MVS));
    c.add(lookup);
}

#[cfg(test)]
mod tests {
    use fea_composer::Shaper;

    use crate::{data::LocaleId, otl::tests::compose};

    #[test]
    fn test_nnbsp_folds_into_mvs() {
        let (_, fea) = compose(&[LocaleId::Mng]);
        let mut buffer = vec!["nnbsp".to_string(), "u1820".to_string()];
        Shaper::new(&fea).apply_features(&["ccmp"], &mut buffer);
        assert_eq!(buffer, ["mvs", "u1820"]);
    }
}
