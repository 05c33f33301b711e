//! CLI definitions and command dispatch.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::{Builder, Env};
use mongfont_core::{
    LocaleId, Padding,
    config::{DEFAULT_FINA_PADDING, DEFAULT_INIT_PADDING},
};

use crate::commands::build;

#[derive(Parser)]
#[command(name = "mongfont")]
#[command(about = "Add Mongolian-family variant glyphs and shaping rules to a font")]
pub struct Cli {
    /// Log debug messages unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn init_logger(&self) {
        let level = if self.verbose { "debug" } else { "info" };
        Builder::from_env(Env::default().default_filter_or(level)).init();
    }
}

#[derive(Debug, Clone, clap::Args)]
pub struct BuildArgs {
    /// Source TrueType font
    pub input: PathBuf,
    /// Font to write
    pub output: PathBuf,
    /// Locales to support; Ali Gali locales need their base locale
    #[arg(long, value_enum, num_args = 1.., required = true)]
    pub locales: Vec<LocaleId>,
    /// Reference data (JSON)
    #[arg(long)]
    pub data: PathBuf,
    /// Feature file to write [default: OUTPUT with a .fea extension]
    #[arg(long)]
    pub fea: Option<PathBuf>,
    #[arg(long, default_value_t = DEFAULT_INIT_PADDING)]
    pub init_padding: u16,
    #[arg(long, default_value_t = DEFAULT_FINA_PADDING)]
    pub fina_padding: u16,
}

impl BuildArgs {
    pub fn fea_path(&self) -> PathBuf {
        self.fea.clone().unwrap_or_else(|| self.output.with_extension("fea"))
    }

    pub fn padding(&self) -> Padding {
        Padding { init: self.init_padding, fina: self.fina_padding }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Synthesize glyphs into INPUT, write OUTPUT and its feature file
    Build {
        #[command(flatten)]
        args: BuildArgs,
    },
}

impl Commands {
    pub fn run(self) -> Result<()> {
        match self {
            Commands::Build { args } => build(&args)?,
        }
        Ok(())
    }
}
