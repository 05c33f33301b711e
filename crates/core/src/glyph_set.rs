//! Glyph inventory construction.
//!
//! Every variant used by a requested locale needs a glyph. Existing glyphs are
//! reused by name or by shape; anything else is composed from written-unit
//! glyphs found through segmentation.

use std::collections::HashSet;

use log::{debug, info};

use crate::{
    Error, Result,
    config::{
        FVSES, MARK_CODE_POINTS, MARKER_FEMININE, MARKER_MASCULINE, MVS, NIRUGU, NNBSP, ZWJ, ZWNJ,
    },
    data::{LocaleId, ReferenceData},
    glyph_name::{GlyphDescriptor, u_name},
    plan::{BuildPlan, GlyphCategory, GlyphSpec},
    position::{Fina, Init, Isol, JoiningPosition},
    written::{Segment, written_combinations},
};

/// Glyphs of the source font, by name and by parsed identity.
#[derive(Debug, Clone, Default)]
pub struct SourceGlyphs {
    names: HashSet<String>,
    descriptors: Vec<GlyphDescriptor>,
}

impl SourceGlyphs {
    /// Names that do not parse as glyph identifiers are kept for lookups by
    /// name only.
    pub fn new(data: &ReferenceData, names: &[String]) -> Self {
        let descriptors = names
            .iter()
            .filter_map(|name| GlyphDescriptor::parse(name, data).ok())
            .collect();
        Self { names: names.iter().cloned().collect(), descriptors }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// A glyph drawing exactly `ideal`: the written-only glyph itself, or
    /// else any glyph with the same units and position.
    pub fn find_written(&self, ideal: &GlyphDescriptor) -> Option<&GlyphDescriptor> {
        let ideal = ideal.written_only();
        self.descriptors
            .iter()
            .find(|source| **source == ideal)
            .or_else(|| self.descriptors.iter().find(|source| source.without_code_points() == ideal))
    }

    /// Components that draw `target` side by side.
    pub fn decompose(&self, target: &GlyphDescriptor) -> Result<Vec<String>> {
        let ideal = target.written_only();
        if let Some(source) = self.find_written(&ideal) {
            return Ok(vec![source.to_string()]);
        }

        let key = |candidate: &[Segment]| {
            candidate
                .iter()
                .map(|s| GlyphDescriptor::from_segment(s).to_string())
                .collect::<Vec<_>>()
                .join(" ")
        };
        let mut candidates: Vec<Vec<Segment>> = written_combinations(&ideal.units, ideal.position)
            .into_iter()
            .filter(|candidate| candidate.len() == ideal.units.len())
            .collect();
        candidates.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| key(a).cmp(&key(b))));

        for candidate in &candidates {
            let parts: Option<Vec<String>> = candidate
                .iter()
                .map(|segment| {
                    self.find_written(&GlyphDescriptor::from_segment(segment))
                        .map(ToString::to_string)
                })
                .collect();
            if let Some(parts) = parts {
                debug!("{target}: composed from {}", parts.join(" + "));
                return Ok(parts);
            }
        }
        Err(Error::MissingComponent(target.to_string()))
    }
}

/// Padding flags implied by a glyph's pseudo position.
pub fn padded(mut spec: GlyphSpec, pseudo_position: Option<JoiningPosition>) -> GlyphSpec {
    if let Some(position) = pseudo_position {
        spec.init_padding = matches!(position, Isol | Init);
        spec.fina_padding = matches!(position, Isol | Fina);
    }
    spec
}

/// Plan every glyph the requested locales need on top of `existing`.
pub fn construct_glyph_set(
    data: &ReferenceData,
    existing: &[String],
    locales: &[LocaleId],
) -> Result<BuildPlan> {
    let sources = SourceGlyphs::new(data, existing);
    let mut builder = GlyphSetBuilder { data, locales, sources: &sources, plan: BuildPlan::new() };
    builder.add_variants()?;
    builder.add_nominals()?;
    builder.add_controls();
    info!(
        "Glyph set: {} new glyphs, {} code points",
        builder.plan.new_glyphs.len(),
        builder.plan.cmap.len()
    );
    Ok(builder.plan)
}

struct GlyphSetBuilder<'a> {
    data: &'a ReferenceData,
    locales: &'a [LocaleId],
    sources: &'a SourceGlyphs,
    plan: BuildPlan,
}

impl GlyphSetBuilder<'_> {
    fn available(&self, name: &str) -> bool {
        self.sources.contains(name) || self.plan.contains(name)
    }

    fn add_variants(&mut self) -> Result<()> {
        for &locale in self.locales {
            for character in &self.data.characters {
                for (&position, variants) in &character.variants {
                    for variant in variants.values().filter(|v| v.in_locale(locale)) {
                        let target = GlyphDescriptor::from_variant(
                            self.data,
                            character,
                            position,
                            variant,
                            Some(locale),
                        )?;
                        let name = target.to_string();
                        if !self.available(&name) {
                            let components = self.sources.decompose(&target)?;
                            let spec = padded(GlyphSpec::composite(components), target.pseudo_position());
                            self.plan.add_glyph(name.clone(), spec);
                        }
                        self.plan.set_category(name, GlyphCategory::Base);
                    }
                }
            }
        }
        Ok(())
    }

    fn add_nominals(&mut self) -> Result<()> {
        for character in &self.data.characters {
            if !character.in_any(self.locales) {
                continue;
            }
            let representative = JoiningPosition::ALL.into_iter().find_map(|position| {
                self.data
                    .default_variant(character, position, self.locales)
                    .map(|(_, variant, locale)| (position, variant, locale))
            });
            let Some((position, variant, locale)) = representative else {
                continue;
            };
            let glyph =
                GlyphDescriptor::from_variant(self.data, character, position, variant, Some(locale))?;

            let nominal = u_name(character.code_point);
            self.plan.add_glyph(nominal.clone(), GlyphSpec::composite([glyph.to_string()]));
            self.plan.cmap.insert(character.code_point, nominal.clone());
            let category = if MARK_CODE_POINTS.contains(&character.code_point) {
                GlyphCategory::Mark
            } else {
                GlyphCategory::Base
            };
            self.plan.set_category(nominal, category);
        }
        Ok(())
    }

    fn add_controls(&mut self) {
        let mut bases: Vec<String> = vec![MVS.into(), NNBSP.into(), NIRUGU.into()];
        let mut marks: Vec<String> = vec![ZWJ.into(), ZWNJ.into()];
        let mut created: Vec<String> = vec![];

        for fvs in FVSES {
            bases.push(fvs.into());
            for state in ["valid", "ignored"] {
                let name = format!("{fvs}.{state}");
                created.push(name.clone());
                marks.push(name);
            }
        }
        for control in [NIRUGU, ZWJ, ZWNJ] {
            let name = format!("{control}.ignored");
            created.push(name.clone());
            marks.push(name);
        }
        for width in ["narrow", "wide"] {
            let name = format!("{MVS}.{width}");
            created.push(name.clone());
            bases.push(name);
        }
        if self.locales.contains(&LocaleId::Mng) {
            for marker in [MARKER_MASCULINE, MARKER_FEMININE] {
                created.push(marker.into());
                marks.push(marker.into());
            }
        }

        for name in created {
            if !self.available(&name) {
                self.plan.add_glyph(name, GlyphSpec::empty());
            }
        }
        for (names, category) in [(bases, GlyphCategory::Base), (marks, GlyphCategory::Mark)] {
            for name in names {
                if self.available(&name) {
                    self.plan.set_category(name, category);
                }
            }
        }
    }
}
