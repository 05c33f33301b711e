//! mongfont command-line library.

pub mod cli;
pub mod commands;
pub mod io;
