use std::path::Path;

use fea_composer::{GlyphSet, Shaper};
use mongfont_core::{
    Error, GlyphCategory, JoiningPosition, LocaleId, ReferenceData, build,
    data::{LigatureCategory, LigatureRule},
};
use serde_json::json;

fn fixture() -> ReferenceData {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/reference.json");
    ReferenceData::from_path(&path).unwrap()
}

/// Written-unit glyphs for every unit and position plus the control glyphs.
fn sources() -> Vec<String> {
    let mut names: Vec<String> = ["mvs", "nnbsp", "nirugu", "zwj", "zwnj", "fvs1", "fvs2", "fvs3", "fvs4"]
        .iter()
        .map(|n| n.to_string())
        .collect();
    for unit in ["A", "Aa", "I", "N", "G"] {
        for position in JoiningPosition::ALL {
            names.push(format!("_{unit}.{position}"));
        }
    }
    names
}

fn buffer(glyphs: &[&str]) -> Vec<String> {
    glyphs.iter().map(|g| g.to_string()).collect()
}

#[test]
fn test_end_to_end_two_vowels() {
    let data = ReferenceData::from_value(json!({
        "writtenUnits": { "A": {}, "Aa": {} },
        "locales": {
            "MNG": {
                "conditions": ["chachlag"],
                "categories": { "vowelMasculine": ["a"], "vowelFeminine": ["e"] }
            }
        },
        "characters": [
            {
                "name": "MONGOLIAN LETTER A",
                "codePoint": 0x1820,
                "alias": "a",
                "variants": {
                    "isol": {
                        "0": { "written": ["A", "A"], "locales": { "MNG": {} } },
                        "1": { "written": ["Aa"], "locales": { "MNG": { "conditions": ["chachlag"] } } }
                    },
                    "init": { "0": { "written": ["A"], "locales": { "MNG": {} } } },
                    "fina": { "0": { "written": ["A"], "locales": { "MNG": {} } } }
                }
            },
            {
                "name": "MONGOLIAN LETTER E",
                "codePoint": 0x1821,
                "alias": "e",
                "variants": {
                    "isol": {
                        "0": { "written": ["A", "A"], "locales": { "MNG": {} } },
                        "1": { "written": ["Aa"], "locales": { "MNG": { "conditions": ["chachlag"] } } }
                    }
                }
            }
        ]
    }))
    .unwrap();
    let sources = buffer(&["_A.init", "_A.fina", "_Aa.isol", "mvs"]);
    let result = build(&data, &sources, &[LocaleId::Mng]).unwrap();

    // Default variant glyphs are composed from written-unit glyphs.
    assert_eq!(result.plan.new_glyphs["u1820.AA.isol"].components, ["_A.init", "_A.fina"]);
    assert_eq!(result.plan.new_glyphs["u1821.AA.isol"].components, ["_A.init", "_A.fina"]);

    // The isol pass maps nominal glyphs to their default variant.
    let text = result.fea.emit_text();
    assert!(text.contains("lookup IIa.isol {"));
    assert!(text.contains("sub u1820 by u1820.AA.isol;"));
    assert!(text.contains("sub u1821 by u1821.AA.isol;"));

    // MVS before an isolated vowel narrows and selects chachlag.
    let mut shaped = buffer(&["mvs", "u1821.AA.isol"]);
    Shaper::new(&result.fea).apply_features(&["rclt"], &mut shaped);
    assert_eq!(shaped, ["mvs.narrow", "u1821.Aa.isol"]);
}

#[test]
fn test_fixture_build() {
    let data = fixture();
    let result = build(&data, &sources(), &[LocaleId::Mng, LocaleId::Tod]).unwrap();

    let fina = &result.plan.new_glyphs["u1821.Aa.isol._fina"];
    assert_eq!(fina.components, ["_Aa.isol"]);
    assert!(fina.fina_padding);
    assert!(!fina.init_padding);
    assert_eq!(result.plan.cmap[&0x1820], "u1820");
    assert_eq!(result.plan.categories["marker.masculine"], GlyphCategory::Mark);

    let text = result.fea.emit_text();
    let order = ["lookup Ia.nnbsp.preprocessing", "lookup IIa.isol", "lookup III.controls.preprocessing", "lookup IIb.controls.postprocessing"];
    let offsets: Vec<usize> = order.iter().map(|name| text.find(name).unwrap()).collect();
    assert!(offsets.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(text.contains("table GDEF {"));
}

#[test]
fn test_referenced_glyphs_exist() {
    let data = fixture();
    let sources = sources();
    let result = build(&data, &sources, &[LocaleId::Mng, LocaleId::Tod]).unwrap();
    for glyph in result.fea.referenced_glyphs() {
        assert!(
            sources.contains(&glyph) || result.plan.contains(&glyph),
            "{glyph} is referenced but never built"
        );
    }
}

#[test]
fn test_deterministic_output() {
    let data = fixture();
    let first = build(&data, &sources(), &[LocaleId::Tod, LocaleId::Mng]).unwrap();
    let second = build(&data, &sources(), &[LocaleId::Mng, LocaleId::Tod, LocaleId::Mng]).unwrap();
    assert_eq!(first.fea.emit_text(), second.fea.emit_text());
    assert_eq!(first.plan, second.plan);
}

#[test]
fn test_locale_gating() {
    let data = fixture();
    let todo = build(&data, &sources(), &[LocaleId::Tod]).unwrap();
    let text = todo.fea.emit_text();
    assert!(!text.contains("@MNG-"));
    assert!(!text.contains("MNG:"));
    assert!(!text.contains("marker.masculine"));
    assert!(text.contains("@TOD-a.init"));

    let none = build(&data, &sources(), &[]).unwrap();
    let text = none.fea.emit_text();
    assert!(!text.contains("@MNG-"));
    assert!(!text.contains("@TOD-"));
    assert!(text.contains("lookup _.ignored {"));
    assert!(!text.contains("lookup IIa.isol {"));
}

#[test]
fn test_ali_gali_requires_base_locale() {
    let data = fixture();
    let result = build(&data, &sources(), &[LocaleId::MngX]);
    assert!(matches!(result, Err(Error::MissingBaseLocale(..))));
}

#[test]
fn test_missing_component() {
    let data = fixture();
    let result = build(&data, &buffer(&["_A.init"]), &[LocaleId::Mng]);
    assert!(matches!(result, Err(Error::MissingComponent(_))));
}

#[test]
fn test_required_ligature() {
    let mut data = fixture();
    data.ligatures.push(LigatureRule {
        category: LigatureCategory::Required,
        units: "NI".to_string(),
        positions: vec![JoiningPosition::Init],
    });
    let result = build(&data, &sources(), &[LocaleId::Mng]);
    assert!(matches!(result, Err(Error::RequiredLigature(name)) if name == "u1828_u1822.NI.init"));

    let mut with_glyph = sources();
    with_glyph.push("_NI.init".to_string());
    let result = build(&data, &with_glyph, &[LocaleId::Mng]).unwrap();
    assert_eq!(result.plan.new_glyphs["u1828_u1822.NI.init"].components, ["_NI.init"]);
    assert!(result.fea.emit_text().contains("sub u1828.N.init u1822.I.medi by u1828_u1822.NI.init;"));
}

fn run_steps(fea: &mongfont_core::FeaBuilder, steps: &[&str], glyphs: Vec<String>) -> Vec<String> {
    let shaper = Shaper::new(fea);
    let mut glyphs = glyphs;
    for step in steps {
        assert!(shaper.apply_named(&format!("III.ig.preprocessing.{step}"), &mut glyphs));
    }
    glyphs
}

#[test]
fn test_forward_propagation_is_unbounded() {
    let result = build(&fixture(), &sources(), &[LocaleId::Mng]).unwrap();
    for count in [1, 5, 50] {
        let mut glyphs = buffer(&["u1820.A.init"]);
        glyphs.extend(std::iter::repeat_n("u1828.N.medi".to_string(), count));
        glyphs.push("u1822.I.fina".to_string());

        let shaped = run_steps(&result.fea, &["A", "B"], glyphs);
        let marked = shaped
            .windows(2)
            .filter(|pair| pair[0] == "u1828.N.medi" && pair[1] == "marker.masculine")
            .count();
        assert_eq!(marked, count);
    }
}

#[test]
fn test_backward_propagation_is_unbounded() {
    let result = build(&fixture(), &sources(), &[LocaleId::Mng]).unwrap();
    for count in [1, 5, 50] {
        let mut glyphs = buffer(&["u182D.G.init"]);
        glyphs.extend(std::iter::repeat_n("u1828.N.medi".to_string(), count));
        glyphs.push("u1820.A.fina".to_string());

        let shaped = run_steps(&result.fea, &["G", "H"], glyphs);
        assert_eq!(shaped[0], "u182D.G.init.marked");
        assert_eq!(shaped.iter().filter(|g| *g == "u1828.N.medi.marked").count(), count);

        let shaped = run_steps(&result.fea, &["I", "J", "K"], shaped);
        assert_eq!(&shaped[..2], ["u182D.G.init", "marker.masculine"]);
        assert!(!shaped.iter().any(|g| g.ends_with(".marked")));
    }
}

#[test]
fn test_letter_classes_follow_categories() {
    let result = build(&fixture(), &sources(), &[LocaleId::Mng]).unwrap();
    let vowels = result.fea.flatten(&GlyphSet::class("MNG-vowel.init"));
    assert_eq!(vowels, ["u1820.A.init", "u1821.A.init", "u1822.I.init"]);
}
