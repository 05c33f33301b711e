//! Build plans and the font object model they are applied to.

use std::collections::{BTreeMap, HashSet};

use fea_composer::GdefClasses;
use indexmap::IndexMap;
use log::{debug, info};

use crate::{
    Result,
    config::{DEFAULT_FINA_PADDING, DEFAULT_INIT_PADDING},
};

/// Recipe for a synthesized glyph: components laid out left to right.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlyphSpec {
    pub components: Vec<String>,
    pub init_padding: bool,
    pub fina_padding: bool,
}

impl GlyphSpec {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn composite<S: Into<String>>(components: impl IntoIterator<Item = S>) -> Self {
        Self { components: components.into_iter().map(Into::into).collect(), ..Self::default() }
    }
}

/// OpenType glyph class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlyphCategory {
    Base,
    Mark,
    Ligature,
    Component,
}

impl GlyphCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            GlyphCategory::Base => "base",
            GlyphCategory::Mark => "mark",
            GlyphCategory::Ligature => "ligature",
            GlyphCategory::Component => "component",
        }
    }
}

/// Extra advance around synthesized glyphs whose shaping position differs
/// from their graphic position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding {
    pub init: u16,
    pub fina: u16,
}

impl Default for Padding {
    fn default() -> Self {
        Self { init: DEFAULT_INIT_PADDING, fina: DEFAULT_FINA_PADDING }
    }
}

/// Glyph-level edits a font must receive before the compiled rules apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildPlan {
    pub cmap: BTreeMap<u32, String>,
    pub new_glyphs: IndexMap<String, GlyphSpec>,
    pub categories: IndexMap<String, GlyphCategory>,
}

impl BuildPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a glyph to synthesize. The first recipe for a name wins.
    pub fn add_glyph(&mut self, name: impl Into<String>, spec: GlyphSpec) {
        self.new_glyphs.entry(name.into()).or_insert(spec);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.new_glyphs.contains_key(name)
    }

    pub fn set_category(&mut self, name: impl Into<String>, category: GlyphCategory) {
        self.categories.insert(name.into(), category);
    }

    pub fn gdef_classes(&self) -> GdefClasses {
        let mut gdef = GdefClasses::default();
        for (name, category) in &self.categories {
            let list = match category {
                GlyphCategory::Base => &mut gdef.bases,
                GlyphCategory::Mark => &mut gdef.marks,
                GlyphCategory::Ligature => &mut gdef.ligatures,
                GlyphCategory::Component => &mut gdef.components,
            };
            list.push(name.clone());
        }
        gdef
    }

    /// Synthesize glyphs, remap code points and record categories.
    ///
    /// Components that are themselves planned glyphs are built first, so the
    /// advance of a composite always sees the final width of its parts.
    pub fn apply_to<F: FontModel + ?Sized>(&self, font: &mut F, padding: Padding) -> Result<()> {
        let mut done = HashSet::new();
        for name in self.new_glyphs.keys() {
            self.build_glyph(font, name, padding, &mut done)?;
        }

        for (code_point, name) in &self.cmap {
            font.assign_codepoint(name, *code_point)?;
        }
        for (name, category) in &self.categories {
            font.set_category(name, *category);
        }

        info!(
            "Applied {} new glyphs, {} code points, {} categories",
            self.new_glyphs.len(),
            self.cmap.len(),
            self.categories.len()
        );
        Ok(())
    }

    fn build_glyph<F: FontModel + ?Sized>(
        &self,
        font: &mut F,
        name: &str,
        padding: Padding,
        done: &mut HashSet<String>,
    ) -> Result<()> {
        let Some(spec) = self.new_glyphs.get(name) else {
            return Ok(());
        };
        if !done.insert(name.to_string()) {
            return Ok(());
        }
        for component in &spec.components {
            if component != name {
                self.build_glyph(font, component, padding, done)?;
            }
        }

        font.new_glyph(name);
        let mut width: i32 = 0;
        if spec.init_padding {
            width += i32::from(padding.init);
        }
        for component in &spec.components {
            font.add_component(name, component, width)?;
            width += i32::from(font.advance_width(component).unwrap_or_default());
        }
        if spec.fina_padding {
            width += i32::from(padding.fina);
        }
        let width = u16::try_from(width.max(0)).unwrap_or(u16::MAX);
        font.set_advance_width(name, width)?;
        debug!("{name}: {} components, advance {width}", spec.components.len());
        Ok(())
    }
}

/// Glyph-level font editing used to apply a [`BuildPlan`].
pub trait FontModel {
    fn glyph_names(&self) -> Vec<String>;

    /// Create `name` as an empty glyph, clearing it if it exists.
    fn new_glyph(&mut self, name: &str);

    /// Append `base` as a component of `glyph`, shifted right by `x_offset`.
    fn add_component(&mut self, glyph: &str, base: &str, x_offset: i32) -> Result<()>;

    fn advance_width(&self, name: &str) -> Option<u16>;

    fn set_advance_width(&mut self, name: &str, width: u16) -> Result<()>;

    /// Map `code_point` to `glyph`, taking it away from any previous owner.
    fn assign_codepoint(&mut self, glyph: &str, code_point: u32) -> Result<()>;

    fn set_category(&mut self, name: &str, category: GlyphCategory);
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::Error;

    #[derive(Default)]
    struct MemoryFont {
        order: Vec<String>,
        widths: HashMap<String, u16>,
        components: HashMap<String, Vec<(String, i32)>>,
        cmap: BTreeMap<u32, String>,
        categories: HashMap<String, GlyphCategory>,
    }

    impl MemoryFont {
        fn with_glyphs(glyphs: &[(&str, u16)]) -> Self {
            let mut font = Self::default();
            for (name, width) in glyphs {
                font.order.push(name.to_string());
                font.widths.insert(name.to_string(), *width);
            }
            font
        }
    }

    impl FontModel for MemoryFont {
        fn glyph_names(&self) -> Vec<String> {
            self.order.clone()
        }

        fn new_glyph(&mut self, name: &str) {
            if !self.order.iter().any(|n| n == name) {
                self.order.push(name.to_string());
            }
            self.widths.insert(name.to_string(), 0);
            self.components.remove(name);
        }

        fn add_component(&mut self, glyph: &str, base: &str, x_offset: i32) -> Result<()> {
            if !self.widths.contains_key(base) {
                return Err(Error::UnknownGlyph(base.to_string()));
            }
            self.components
                .entry(glyph.to_string())
                .or_default()
                .push((base.to_string(), x_offset));
            Ok(())
        }

        fn advance_width(&self, name: &str) -> Option<u16> {
            self.widths.get(name).copied()
        }

        fn set_advance_width(&mut self, name: &str, width: u16) -> Result<()> {
            self.widths.insert(name.to_string(), width);
            Ok(())
        }

        fn assign_codepoint(&mut self, glyph: &str, code_point: u32) -> Result<()> {
            self.cmap.insert(code_point, glyph.to_string());
            Ok(())
        }

        fn set_category(&mut self, name: &str, category: GlyphCategory) {
            self.categories.insert(name.to_string(), category);
        }
    }

    #[test]
    fn test_apply_builds_dependencies_first() {
        let mut font = MemoryFont::with_glyphs(&[("_A.init", 300), ("_B.fina", 200)]);
        let mut plan = BuildPlan::new();
        plan.add_glyph("u1820", GlyphSpec::composite(["u1820.AB.isol"]));
        plan.add_glyph(
            "u1820.AB.isol",
            GlyphSpec { init_padding: true, fina_padding: true, ..GlyphSpec::composite(["_A.init", "_B.fina"]) },
        );
        plan.cmap.insert(0x1820, "u1820".into());
        plan.set_category("u1820.AB.isol", GlyphCategory::Base);

        plan.apply_to(&mut font, Padding::default()).unwrap();

        assert_eq!(font.widths["u1820.AB.isol"], 40 + 300 + 200 + 100);
        assert_eq!(
            font.components["u1820.AB.isol"],
            [("_A.init".to_string(), 40), ("_B.fina".to_string(), 340)]
        );
        assert_eq!(font.widths["u1820"], 640);
        assert_eq!(font.cmap[&0x1820], "u1820");
        assert_eq!(font.categories["u1820.AB.isol"], GlyphCategory::Base);
    }

    #[test]
    fn test_unknown_component_fails() {
        let mut font = MemoryFont::default();
        let mut plan = BuildPlan::new();
        plan.add_glyph("x", GlyphSpec::composite(["missing"]));
        assert!(matches!(
            plan.apply_to(&mut font, Padding::default()),
            Err(Error::UnknownGlyph(_))
        ));
    }

    #[test]
    fn test_gdef_classes() {
        let mut plan = BuildPlan::new();
        plan.set_category("a", GlyphCategory::Base);
        plan.set_category("m", GlyphCategory::Mark);
        plan.set_category("l", GlyphCategory::Ligature);
        let gdef = plan.gdef_classes();
        assert_eq!(gdef.bases, ["a"]);
        assert_eq!(gdef.marks, ["m"]);
        assert_eq!(gdef.ligatures, ["l"]);
        assert!(gdef.components.is_empty());
    }
}
