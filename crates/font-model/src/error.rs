use std::{io, result};

use read_fonts::ReadError;
use thiserror::Error;
use write_fonts::{BuilderError, error};

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read font: {0}")]
    ReadError(#[from] ReadError),

    #[error("failed to write font: {0}")]
    WriteError(#[from] error::Error),

    #[error("failed to build font: {0}")]
    BuilderError(#[from] BuilderError),

    #[error("required table '{0}' not found")]
    MissingTable(&'static str),

    #[error("{0} glyphs do not fit in a 16-bit glyph index")]
    TooManyGlyphs(usize),

    #[error("failed to build cmap table")]
    CmapBuildError,

    #[error(transparent)]
    Build(#[from] mongfont_core::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = result::Result<T, Error>;
