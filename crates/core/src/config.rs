//! Configuration constants for mongfont builds.

/// OpenType script tag of the Mongolian script.
pub const SCRIPT_TAG: &str = "mong";

/// Default language system tag.
pub const DEFAULT_LANGUAGE: &str = "dflt";

/// Feature that folds legacy characters before cursive shaping.
pub const FEATURE_CCMP: &str = "ccmp";

/// Feature carrying every contextual pass.
pub const FEATURE_RCLT: &str = "rclt";

/// Advance added before a glyph whose shaping position is isol or init.
pub const DEFAULT_INIT_PADDING: u16 = 40;

/// Advance added after a glyph whose shaping position is isol or fina.
pub const DEFAULT_FINA_PADDING: u16 = 100;

/// Mongolian vowel separator.
pub const MVS: &str = "mvs";

/// Narrow no-break space, folded into [`MVS`].
pub const NNBSP: &str = "nnbsp";

pub const NIRUGU: &str = "nirugu";

pub const ZWJ: &str = "zwj";

pub const ZWNJ: &str = "zwnj";

/// Free variation selectors, in selector order.
pub const FVSES: [&str; 4] = ["fvs1", "fvs2", "fvs3", "fvs4"];

/// Invisible marker inserted after masculine letters.
pub const MARKER_MASCULINE: &str = "marker.masculine";

/// Invisible marker inserted after feminine letters.
pub const MARKER_FEMININE: &str = "marker.feminine";

/// Suffix of glyphs carrying a transient gender mark.
pub const MARKED_SUFFIX: &str = "marked";

/// Written unit of the Todo long vowel sign.
pub const LVS_UNIT: &str = "Lv";

/// Alias of the Todo long vowel sign.
pub const LVS_ALIAS: &str = "lvs";

/// Letters whose gender markers survive until the gender passes.
pub const GENDERED_LETTERS: [&str; 2] = ["h", "g"];

/// Code points whose nominal glyphs are combining marks.
pub const MARK_CODE_POINTS: [u32; 3] = [0x1885, 0x1886, 0x18A9];
