use std::path::Path;

use fea_composer::Shaper;
use mongfont_core::{Build, JoiningPosition, LocaleId, ReferenceData, build};

fn fixture() -> ReferenceData {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/conditions.json");
    ReferenceData::from_path(&path).unwrap()
}

fn sources() -> Vec<String> {
    let mut names: Vec<String> = ["mvs", "nnbsp", "nirugu", "zwj", "zwnj", "fvs1", "fvs2", "fvs3", "fvs4"]
        .iter()
        .map(|n| n.to_string())
        .collect();
    for unit in ["A", "I", "Id", "O", "Ob", "B", "N", "Na"] {
        for position in JoiningPosition::ALL {
            names.push(format!("_{unit}.{position}"));
        }
    }
    names
}

fn compile() -> Build {
    build(&fixture(), &sources(), &[LocaleId::Mng]).unwrap()
}

fn run(result: &Build, lookup: &str, glyphs: &[&str]) -> Vec<String> {
    let mut buffer: Vec<String> = glyphs.iter().map(|g| g.to_string()).collect();
    assert!(Shaper::new(&result.fea).apply_named(lookup, &mut buffer), "{lookup} was not built");
    buffer
}

#[test]
fn test_condition_lookups_are_built() {
    let result = compile();
    for name in ["MNG:vowel_devsger", "MNG:post_bowed", "MNG:onset"] {
        assert!(result.fea.has_lookup(name), "{name} missing");
    }
    assert!(result.plan.contains("u1822.Id.medi"));
    assert!(result.plan.contains("u1823.Ob.fina"));
    assert!(result.plan.contains("u1828.Na.medi"));
}

#[test]
fn test_i_after_vowel_is_devsger() {
    let result = compile();
    let shaped = run(
        &result,
        "III.i_u.devsger.MNG_TOD_SIB_MCH_MCHx",
        &["u1820.A.init", "u1822.I.medi", "u1828.N.fina"],
    );
    assert_eq!(shaped, ["u1820.A.init", "u1822.Id.medi", "u1828.N.fina"]);

    // After a consonant it keeps its default form.
    let shaped = run(
        &result,
        "III.i_u.devsger.MNG_TOD_SIB_MCH_MCHx",
        &["u182A.B.init", "u1822.I.medi", "u1828.N.fina"],
    );
    assert_eq!(shaped, ["u182A.B.init", "u1822.I.medi", "u1828.N.fina"]);
}

#[test]
fn test_final_o_after_b_is_post_bowed() {
    let result = compile();
    let shaped = run(&result, "III.vowel.post_bowed.MNG", &["u182A.B.init", "u1823.O.fina"]);
    assert_eq!(shaped, ["u182A.B.init", "u1823.Ob.fina"]);

    let shaped = run(&result, "III.vowel.post_bowed.MNG", &["u1828.N.init", "u1823.O.fina"]);
    assert_eq!(shaped, ["u1828.N.init", "u1823.O.fina"]);
}

#[test]
fn test_fvs_after_bowed_consonant_is_reset() {
    let result = compile();
    let shaped = run(
        &result,
        "III.fvs.post_bowed.preprocessing.GB",
        &["u182A.B.init", "fvs1.ignored", "u1823.O.fina"],
    );
    assert_eq!(shaped, ["u182A.B.init", "fvs1", "u1823.O.fina"]);
}

#[test]
fn test_n_before_vowel_is_onset() {
    let result = compile();
    let lookup = "III.n.onset_and_devsger.MNG_TOD_SIB_MCH_MCHx";
    let shaped = run(&result, lookup, &["u1820.A.init", "u1828.N.medi", "u1820.A.fina"]);
    assert_eq!(shaped, ["u1820.A.init", "u1828.Na.medi", "u1820.A.fina"]);

    let shaped = run(&result, lookup, &["u1820.A.init", "u1828.N.medi", "u182A.B.fina"]);
    assert_eq!(shaped, ["u1820.A.init", "u1828.N.medi", "u182A.B.fina"]);
}
