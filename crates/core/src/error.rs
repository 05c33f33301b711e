//! Error types for glyph set construction and rule compilation.

use std::{io, result};

/// Errors that abort a build.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed glyph name: {0:?}")]
    Format(String),

    #[error("unresolved written reference in {character}: {reason}")]
    UnresolvedReference { character: String, reason: String },

    #[error("no decomposition found for {0}")]
    MissingComponent(String),

    #[error("required ligature {0} has no resolvable component")]
    RequiredLigature(String),

    #[error("cannot join {0} with {1}")]
    InvalidConcatenation(String, String),

    #[error("unknown locale: {0}")]
    UnknownLocale(String),

    #[error("locale {0} requires locale {1}")]
    MissingBaseLocale(String, String),

    #[error("no alias {alias} in {locale}")]
    UnknownAlias { locale: String, alias: String },

    #[error("unknown glyph: {0}")]
    UnknownGlyph(String),

    #[error("invalid reference data: {0}")]
    InvalidData(String),

    #[error("failed to parse reference data: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = result::Result<T, Error>;
