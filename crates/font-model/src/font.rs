//! Loading a TrueType font into an editable glyph model.

use std::{collections::BTreeMap, fs, path::Path};

use indexmap::{IndexMap, map::Entry};
use log::{debug, info, warn};
use mongfont_core::{Error as BuildError, FontModel, GlyphCategory};
use read_fonts::{
    FontRef, TableProvider,
    tables::cmap::{Cmap, CmapSubtable, PlatformId},
    types::{GlyphId, GlyphId16},
};

use crate::{
    Error, Result,
    outline::{Outline, Part, clamp, convert_glyph},
};

#[derive(Debug, Clone)]
pub(crate) struct GlyphEntry {
    pub outline: Outline,
    pub advance: u16,
}

/// A TrueType font whose glyphs, advances, names and character map can be
/// edited by name.
///
/// Glyphs keep their source order; new glyphs are appended, so glyph ids of
/// the source font stay valid for every table copied through unchanged.
#[derive(Debug, Clone)]
pub struct TrueTypeFont {
    pub(crate) data: Vec<u8>,
    pub(crate) glyphs: IndexMap<String, GlyphEntry>,
    pub(crate) source_glyph_count: usize,
    pub(crate) cmap: BTreeMap<u32, String>,
    pub(crate) categories: IndexMap<String, GlyphCategory>,
}

impl TrueTypeFont {
    pub fn from_path(path: &Path) -> Result<Self> {
        let font = Self::from_bytes(fs::read(path)?)?;
        info!("Loaded {} glyphs from {}", font.glyphs.len(), path.display());
        Ok(font)
    }

    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let font = FontRef::new(&data)?;
        let num_glyphs = font.maxp()?.num_glyphs();
        let names = glyph_names(&font, num_glyphs);

        let glyf = font.glyf().map_err(|_| Error::MissingTable("glyf"))?;
        let loca = font.loca(None).map_err(|_| Error::MissingTable("loca"))?;
        let hmtx = font.hmtx().map_err(|_| Error::MissingTable("hmtx"))?;

        let mut glyphs = IndexMap::with_capacity(names.len());
        for (gid, name) in names.iter().enumerate() {
            let glyph_id = GlyphId::new(gid as u32);
            let outline = match loca.get_glyf(glyph_id, &glyf) {
                Ok(Some(glyph)) => {
                    convert_glyph(&glyph, |base| names.get(base as usize).cloned())
                }
                Ok(None) => Outline::Empty,
                Err(e) => {
                    warn!("{name}: unreadable outline replaced by an empty glyph: {e}");
                    Outline::Empty
                }
            };
            let advance = hmtx.advance(glyph_id).unwrap_or(0);
            glyphs.insert(name.clone(), GlyphEntry { outline, advance });
        }

        let mut cmap = BTreeMap::new();
        if let Ok(table) = font.cmap() {
            if let Some(subtable) = best_subtable(&table) {
                for (code_point, gid) in subtable.iter() {
                    if let Some(name) = names.get(gid.to_u32() as usize) {
                        cmap.entry(code_point).or_insert_with(|| name.clone());
                    }
                }
            }
        }

        let source_glyph_count = glyphs.len();
        Ok(Self { data, glyphs, source_glyph_count, cmap, categories: IndexMap::new() })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.glyphs.contains_key(name)
    }

    pub fn cmap(&self) -> &BTreeMap<u32, String> {
        &self.cmap
    }

    /// GDEF categories recorded so far.
    pub fn categories(&self) -> &IndexMap<String, GlyphCategory> {
        &self.categories
    }

    /// Component bases and x offsets of a composite glyph.
    pub fn components(&self, name: &str) -> Option<Vec<(&str, i16)>> {
        match &self.glyphs.get(name)?.outline {
            Outline::Composite(parts) => Some(
                parts
                    .iter()
                    .map(|part| {
                        let x = match part.anchor {
                            write_fonts::tables::glyf::Anchor::Offset { x, .. } => x,
                            write_fonts::tables::glyf::Anchor::Point { .. } => 0,
                        };
                        (part.base.as_str(), x)
                    })
                    .collect(),
            ),
            Outline::Empty | Outline::Simple(_) => None,
        }
    }
}

/// Glyph names from `post`, with `glyphNNNNN` for unnamed glyphs and a
/// `#n` suffix on repeated names.
fn glyph_names(font: &FontRef, num_glyphs: u16) -> Vec<String> {
    let post = font.post().ok();
    let mut seen: IndexMap<String, usize> = IndexMap::new();
    (0..num_glyphs)
        .map(|gid| {
            let name = post
                .as_ref()
                .and_then(|post| post.glyph_name(GlyphId16::new(gid)))
                .map(str::to_string)
                .unwrap_or_else(|| format!("glyph{gid:05}"));
            match seen.entry(name.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(0);
                    name
                }
                Entry::Occupied(mut slot) => {
                    *slot.get_mut() += 1;
                    let renamed = format!("{name}#{}", slot.get());
                    warn!("duplicate glyph name {name} at {gid} renamed to {renamed}");
                    renamed
                }
            }
        })
        .collect()
}

/// Prefer a full Unicode subtable, then a BMP one, then anything.
fn best_subtable<'a>(cmap: &'a Cmap<'a>) -> Option<CmapSubtable<'a>> {
    let records = cmap.encoding_records();
    let find = |windows_encoding: u16| {
        records.iter().find_map(|record| {
            let platform = record.platform_id();
            if platform != PlatformId::Unicode
                && !(platform == PlatformId::Windows && record.encoding_id() == windows_encoding)
            {
                return None;
            }
            let subtable = record.subtable(cmap.offset_data()).ok()?;
            let wanted = match windows_encoding {
                10 => matches!(subtable, CmapSubtable::Format12(_)),
                _ => matches!(subtable, CmapSubtable::Format4(_)),
            };
            wanted.then_some(subtable)
        })
    };
    find(10)
        .or_else(|| find(1))
        .or_else(|| records.iter().find_map(|r| r.subtable(cmap.offset_data()).ok()))
}

impl FontModel for TrueTypeFont {
    fn glyph_names(&self) -> Vec<String> {
        self.glyphs.keys().cloned().collect()
    }

    fn new_glyph(&mut self, name: &str) {
        match self.glyphs.get_mut(name) {
            Some(entry) => {
                debug!("{name}: cleared");
                entry.outline = Outline::Empty;
                entry.advance = 0;
            }
            None => {
                self.glyphs
                    .insert(name.to_string(), GlyphEntry { outline: Outline::Empty, advance: 0 });
            }
        }
    }

    fn add_component(&mut self, glyph: &str, base: &str, x_offset: i32) -> mongfont_core::Result<()> {
        if !self.glyphs.contains_key(base) {
            return Err(BuildError::UnknownGlyph(base.to_string()));
        }
        let entry = self
            .glyphs
            .get_mut(glyph)
            .ok_or_else(|| BuildError::UnknownGlyph(glyph.to_string()))?;
        let x = clamp(x_offset);
        if i32::from(x) != x_offset {
            warn!("{glyph}: component offset {x_offset} clamped to {x}");
        }
        let part = Part::offset(base, x);
        match &mut entry.outline {
            Outline::Composite(parts) => parts.push(part),
            outline => {
                if matches!(outline, Outline::Simple(_)) {
                    warn!("{glyph}: outline replaced by components");
                }
                *outline = Outline::Composite(vec![part]);
            }
        }
        Ok(())
    }

    fn advance_width(&self, name: &str) -> Option<u16> {
        self.glyphs.get(name).map(|entry| entry.advance)
    }

    fn set_advance_width(&mut self, name: &str, width: u16) -> mongfont_core::Result<()> {
        let entry = self
            .glyphs
            .get_mut(name)
            .ok_or_else(|| BuildError::UnknownGlyph(name.to_string()))?;
        entry.advance = width;
        Ok(())
    }

    fn assign_codepoint(&mut self, glyph: &str, code_point: u32) -> mongfont_core::Result<()> {
        if !self.glyphs.contains_key(glyph) {
            return Err(BuildError::UnknownGlyph(glyph.to_string()));
        }
        if let Some(previous) = self.cmap.insert(code_point, glyph.to_string()) {
            if previous != glyph {
                debug!("U+{code_point:04X}: {previous} displaced by {glyph}");
            }
        }
        Ok(())
    }

    fn set_category(&mut self, name: &str, category: GlyphCategory) {
        self.categories.insert(name.to_string(), category);
    }
}
