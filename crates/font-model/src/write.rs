//! Writing an edited font back to a TrueType binary.

use std::collections::HashSet;

use log::{info, warn};
use read_fonts::{
    FontRef, TableProvider,
    types::{GlyphId, Tag},
};
use write_fonts::{
    FontBuilder,
    from_obj::ToOwnedTable,
    tables::{
        cmap::Cmap,
        glyf::{Bbox, Component, CompositeGlyph, GlyfLocaBuilder, Glyph},
        head::Head,
        hhea::Hhea,
        hmtx::{Hmtx, LongMetric},
        loca::LocaFormat,
        maxp::Maxp,
        post::Post,
    },
};

use crate::{
    Error, Result, TrueTypeFont,
    outline::{Outline, bounds},
};

/// Deepest composite nesting; cycles count once.
fn component_depth(outlines: &[&Outline], index_of: impl Fn(&str) -> Option<usize>) -> u16 {
    fn depth(
        index: usize,
        outlines: &[&Outline],
        index_of: &impl Fn(&str) -> Option<usize>,
        memo: &mut [Option<u16>],
    ) -> u16 {
        if let Some(known) = memo[index] {
            return known;
        }
        memo[index] = Some(0);
        let found = match outlines[index] {
            Outline::Composite(parts) => parts
                .iter()
                .filter_map(|part| index_of(&part.base))
                .map(|base| depth(base, outlines, index_of, memo).saturating_add(1))
                .max()
                .unwrap_or(0),
            Outline::Empty | Outline::Simple(_) => 0,
        };
        memo[index] = Some(found);
        found
    }

    let mut memo = vec![None; outlines.len()];
    (0..outlines.len())
        .map(|index| depth(index, outlines, &index_of, &mut memo))
        .max()
        .unwrap_or(0)
}

/// Tables rebuilt from the glyph model.
const REBUILT_TABLES: &[[u8; 4]] =
    &[*b"head", *b"maxp", *b"cmap", *b"hmtx", *b"hhea", *b"post", *b"glyf", *b"loca"];

/// Tables holding one record per glyph that are not rebuilt. They are
/// dropped once glyphs have been added.
const PER_GLYPH_TABLES: &[[u8; 4]] = &[*b"hdmx", *b"LTSH", *b"vmtx", *b"vhea", *b"VORG"];

impl TrueTypeFont {
    /// Serialize the font, rebuilding outline, metric, naming and mapping
    /// tables and copying everything else.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let font = FontRef::new(&self.data)?;
        let num_glyphs =
            u16::try_from(self.glyphs.len()).map_err(|_| Error::TooManyGlyphs(self.glyphs.len()))?;

        let outlines: Vec<&Outline> = self.glyphs.values().map(|entry| &entry.outline).collect();
        let boxes = bounds(&outlines, |name| self.glyphs.get_index_of(name));

        let mut glyf_builder = GlyfLocaBuilder::new();
        let mut max_components: u16 = 0;
        for outline in &outlines {
            let glyph = self.write_glyph(outline, &boxes)?;
            if let Glyph::Composite(composite) = &glyph {
                let count = composite.components().len();
                max_components = max_components.max(u16::try_from(count).unwrap_or(u16::MAX));
            }
            glyf_builder.add_glyph(&glyph)?;
        }
        let (glyf, loca, loca_format) = glyf_builder.build();

        let h_metrics: Vec<LongMetric> = self
            .glyphs
            .values()
            .zip(&boxes)
            .map(|(entry, bbox)| LongMetric {
                advance: entry.advance,
                side_bearing: bbox.map(|b| b.x_min).unwrap_or(0),
            })
            .collect();
        let advance_width_max = h_metrics.iter().map(|m| m.advance).max().unwrap_or(0);
        let hmtx = Hmtx::new(h_metrics, vec![]);

        let mut head: Head = font.head()?.to_owned_table();
        head.index_to_loc_format = match loca_format {
            LocaFormat::Short => 0,
            LocaFormat::Long => 1,
        };

        let mut hhea: Hhea = font.hhea()?.to_owned_table();
        hhea.number_of_h_metrics = num_glyphs;
        hhea.advance_width_max = advance_width_max.into();

        let mut maxp: Maxp = font.maxp()?.to_owned_table();
        maxp.num_glyphs = num_glyphs;
        if let Some(elements) = maxp.max_component_elements.as_mut() {
            *elements = (*elements).max(max_components);
        }
        if let Some(depth) = maxp.max_component_depth.as_mut() {
            *depth = (*depth).max(component_depth(&outlines, |name| self.glyphs.get_index_of(name)));
        }

        let post = self.post(&font);
        let cmap = self.write_cmap()?;

        let mut builder = FontBuilder::new();
        builder.add_table(&head)?;
        builder.add_table(&maxp)?;
        builder.add_table(&cmap)?;
        builder.add_table(&hmtx)?;
        builder.add_table(&hhea)?;
        builder.add_table(&post)?;
        builder.add_table(&glyf)?;
        builder.add_table(&loca)?;
        self.copy_other_tables(&mut builder, &font);

        info!("Wrote {} glyphs, {} code points", num_glyphs, self.cmap.len());
        Ok(builder.build())
    }

    fn write_glyph(&self, outline: &Outline, boxes: &[Option<Bbox>]) -> Result<Glyph> {
        let parts = match outline {
            Outline::Empty => return Ok(Glyph::Empty),
            Outline::Simple(simple) if simple.contours.is_empty() => return Ok(Glyph::Empty),
            Outline::Simple(simple) => return Ok(Glyph::Simple(simple.clone())),
            Outline::Composite(parts) => parts,
        };

        let mut components: Vec<(Component, Bbox)> = Vec::with_capacity(parts.len());
        for part in parts {
            let Some(index) = self.glyphs.get_index_of(&part.base) else {
                continue;
            };
            // Composites must not reference empty glyphs.
            let Some(bbox) = boxes[index] else {
                continue;
            };
            let gid = u16::try_from(index).map_err(|_| Error::TooManyGlyphs(self.glyphs.len()))?;
            let component = Component {
                glyph: font_types::GlyphId16::new(gid),
                anchor: part.anchor,
                transform: part.transform,
                flags: part.flags,
            };
            components.push((component, bbox));
        }

        let mut components = components.into_iter();
        let Some((first, first_bbox)) = components.next() else {
            return Ok(Glyph::Empty);
        };
        let mut composite = CompositeGlyph::new(first, first_bbox);
        for (component, bbox) in components {
            composite.add_component(component, bbox);
        }
        Ok(Glyph::Composite(composite))
    }

    /// Version 2 `post` carrying every glyph name, with the source metrics.
    fn post(&self, font: &FontRef) -> Post {
        let names: Vec<&str> = self.glyphs.keys().map(String::as_str).collect();
        let mut post = Post::new_v2(names);
        if let Ok(source) = font.post() {
            post.italic_angle = source.italic_angle();
            post.underline_position = source.underline_position();
            post.underline_thickness = source.underline_thickness();
            post.is_fixed_pitch = source.is_fixed_pitch();
        }
        post
    }

    fn write_cmap(&self) -> Result<Cmap> {
        let mappings: Vec<(char, GlyphId)> = self
            .cmap
            .iter()
            .filter_map(|(code_point, name)| {
                let ch = char::from_u32(*code_point)?;
                let gid = self.glyphs.get_index_of(name)?;
                Some((ch, GlyphId::new(gid as u32)))
            })
            .collect();
        Cmap::from_mappings(mappings).map_err(|_| Error::CmapBuildError)
    }

    fn copy_other_tables(&self, builder: &mut FontBuilder, font: &FontRef) {
        let rebuilt: HashSet<Tag> = REBUILT_TABLES.iter().map(Tag::new).collect();
        let per_glyph: HashSet<Tag> = PER_GLYPH_TABLES.iter().map(Tag::new).collect();
        let grown = self.glyphs.len() != self.source_glyph_count;

        for record in font.table_directory.table_records() {
            let tag = record.tag();
            if rebuilt.contains(&tag) || builder.contains(tag) {
                continue;
            }
            if grown && per_glyph.contains(&tag) {
                warn!("dropping {tag}: it does not cover the added glyphs");
                continue;
            }
            if let Some(data) = font.table_data(tag) {
                builder.add_raw(tag, data.as_bytes().to_vec());
            }
        }
    }
}
