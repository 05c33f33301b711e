//! The `build` command: plan glyphs, edit the font, emit rules.

use std::time::Instant;

use anyhow::{Context, Result};
use font_model::TrueTypeFont;
use log::info;
use mongfont_core::{FontModel, ReferenceData};

use crate::{
    cli::BuildArgs,
    io::{read_font, write_file},
};

pub fn build(args: &BuildArgs) -> Result<()> {
    let start = Instant::now();

    let data = ReferenceData::from_path(&args.data)
        .with_context(|| format!("Failed to load reference data: {}", args.data.display()))?;
    let mut font = TrueTypeFont::from_bytes(read_font(&args.input)?)
        .with_context(|| format!("Failed to parse font: {}", args.input.display()))?;

    let built = mongfont_core::build(&data, &font.glyph_names(), &args.locales)
        .with_context(|| format!("Failed to build {}", args.input.display()))?;

    built
        .plan
        .apply_to(&mut font, args.padding())
        .context("Failed to apply glyph plan")?;
    let bytes = font
        .to_bytes()
        .with_context(|| format!("Failed to serialize {}", args.output.display()))?;
    write_file(&args.output, bytes)?;

    let fea_path = args.fea_path();
    write_file(&fea_path, built.fea.emit_text())?;

    info!(
        "Built {} and {} in {:.2?}",
        args.output.display(),
        fea_path.display(),
        start.elapsed()
    );
    Ok(())
}
