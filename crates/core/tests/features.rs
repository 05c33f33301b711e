//! The emitted feature file compiles with a real feature compiler.

use std::path::Path;

use fea_rs::{
    GlyphMap,
    compile::{self, NopFeatureProvider, NopVariationInfo, Opts},
    parse,
};
use indexmap::IndexSet;
use mongfont_core::{Build, JoiningPosition, LocaleId, ReferenceData, build};
use read_fonts::{FontRef, TableProvider};

fn fixture(name: &str) -> ReferenceData {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name);
    ReferenceData::from_path(&path).unwrap()
}

fn sources(units: &[&str]) -> Vec<String> {
    let mut names: Vec<String> = ["mvs", "nnbsp", "nirugu", "zwj", "zwnj", "fvs1", "fvs2", "fvs3", "fvs4"]
        .iter()
        .map(|n| n.to_string())
        .collect();
    for unit in units {
        for position in JoiningPosition::ALL {
            names.push(format!("_{unit}.{position}"));
        }
    }
    names
}

/// Glyph order of the built font: `.notdef`, the sources, then planned glyphs.
fn glyph_map(result: &Build, sources: &[String]) -> GlyphMap {
    let mut order: IndexSet<&str> = IndexSet::new();
    order.insert(".notdef");
    order.extend(sources.iter().map(String::as_str));
    order.extend(result.plan.new_glyphs.keys().map(String::as_str));
    GlyphMap::new(order).unwrap()
}

/// Compile the emitted features to a binary holding GSUB and GDEF.
fn compile_features(result: &Build, sources: &[String]) -> Vec<u8> {
    let glyph_map = glyph_map(result, sources);
    let (tree, diagnostics) = parse::parse_string(result.fea.emit_text());
    assert!(!diagnostics.has_errors(), "{}", diagnostics.display());

    let diagnostics = compile::validate::<NopVariationInfo>(&tree, &glyph_map, None);
    assert!(!diagnostics.has_errors(), "{}", diagnostics.display());

    let (compilation, _warnings) =
        compile::compile::<NopVariationInfo, NopFeatureProvider>(&tree, &glyph_map, None, None, Opts::new())
            .unwrap_or_else(|errors| panic!("{}", errors.display()));
    compilation.to_binary(&glyph_map).unwrap()
}

#[test]
fn test_reference_features_compile() {
    let sources = sources(&["A", "Aa", "I", "N", "G"]);
    let result = build(&fixture("reference.json"), &sources, &[LocaleId::Mng, LocaleId::Tod]).unwrap();
    let binary = compile_features(&result, &sources);

    let font = FontRef::new(&binary).unwrap();
    assert!(font.gsub().is_ok());
    assert!(font.gdef().is_ok());
}

#[test]
fn test_condition_features_compile() {
    let sources = sources(&["A", "I", "Id", "O", "Ob", "B", "N", "Na"]);
    let result = build(&fixture("conditions.json"), &sources, &[LocaleId::Mng]).unwrap();
    let binary = compile_features(&result, &sources);
    assert!(FontRef::new(&binary).unwrap().gsub().is_ok());
}
