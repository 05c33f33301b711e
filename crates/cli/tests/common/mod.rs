//! Minimal TrueType sources for command tests.

use read_fonts::{tables::glyf::CurvePoint, types::GlyphId};
use write_fonts::{
    FontBuilder,
    tables::{
        cmap::Cmap,
        glyf::{Bbox, GlyfLocaBuilder, Glyph, SimpleGlyph},
        head::Head,
        hhea::Hhea,
        hmtx::{Hmtx, LongMetric},
        loca::LocaFormat,
        maxp::Maxp,
        post::Post,
    },
};

fn glyph(advance: u16) -> Glyph {
    if advance == 0 {
        return Glyph::Empty;
    }
    let w = advance as i16;
    let points: Vec<CurvePoint> = [(0, 0), (w, 0), (w, 700), (0, 700)]
        .into_iter()
        .map(|(x, y)| CurvePoint { x, y, on_curve: true })
        .collect();
    Glyph::Simple(SimpleGlyph {
        bbox: Bbox { x_min: 0, y_min: 0, x_max: w, y_max: 700 },
        contours: vec![points.into()],
        instructions: vec![],
    })
}

/// A font with one box glyph per `(name, advance)`; zero advance gives an
/// empty glyph. `cmap` maps characters to glyph indices.
pub fn make_test_font(glyphs: &[(&str, u16)], cmap: &[(char, u16)]) -> Vec<u8> {
    let mut glyf_builder = GlyfLocaBuilder::new();
    for (_, advance) in glyphs {
        glyf_builder.add_glyph(&glyph(*advance)).unwrap();
    }
    let (glyf, loca, loca_format) = glyf_builder.build();
    let count = glyphs.len() as u16;

    let head = Head {
        font_revision: font_types::Fixed::from_f64(1.0),
        checksum_adjustment: 0,
        magic_number: 0x5F0F3CF5,
        flags: write_fonts::tables::head::Flags::empty(),
        units_per_em: 1000,
        created: font_types::LongDateTime::new(0),
        modified: font_types::LongDateTime::new(0),
        x_min: 0,
        y_min: 0,
        x_max: 500,
        y_max: 700,
        mac_style: write_fonts::tables::head::MacStyle::empty(),
        lowest_rec_ppem: 8,
        font_direction_hint: 2,
        index_to_loc_format: match loca_format {
            LocaFormat::Short => 0,
            LocaFormat::Long => 1,
        },
    };
    let hhea = Hhea {
        ascender: font_types::FWord::new(700),
        descender: font_types::FWord::new(-200),
        line_gap: font_types::FWord::new(0),
        advance_width_max: font_types::UfWord::new(500),
        min_left_side_bearing: font_types::FWord::new(0),
        min_right_side_bearing: font_types::FWord::new(0),
        x_max_extent: font_types::FWord::new(500),
        caret_slope_rise: 1,
        caret_slope_run: 0,
        caret_offset: 0,
        number_of_h_metrics: count,
    };
    let hmtx = Hmtx {
        h_metrics: glyphs
            .iter()
            .map(|(_, advance)| LongMetric { advance: *advance, side_bearing: 0 })
            .collect(),
        left_side_bearings: vec![],
    };
    let maxp = Maxp {
        num_glyphs: count,
        max_points: Some(4),
        max_contours: Some(1),
        max_composite_points: Some(0),
        max_composite_contours: Some(0),
        max_zones: Some(1),
        max_twilight_points: Some(0),
        max_storage: Some(0),
        max_function_defs: Some(0),
        max_instruction_defs: Some(0),
        max_stack_elements: Some(0),
        max_size_of_instructions: Some(0),
        max_component_elements: Some(0),
        max_component_depth: Some(0),
    };
    let post = Post::new_v2(glyphs.iter().map(|(name, _)| *name).collect::<Vec<_>>());
    let cmap = Cmap::from_mappings(cmap.iter().map(|(c, gid)| (*c, GlyphId::new(u32::from(*gid))))).unwrap();

    let mut builder = FontBuilder::new();
    builder.add_table(&head).unwrap();
    builder.add_table(&hhea).unwrap();
    builder.add_table(&hmtx).unwrap();
    builder.add_table(&maxp).unwrap();
    builder.add_table(&cmap).unwrap();
    builder.add_table(&post).unwrap();
    builder.add_table(&glyf).unwrap();
    builder.add_table(&loca).unwrap();
    builder.build()
}
