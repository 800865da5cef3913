//! Expert System - Command-line front end
//!
//! Loads a rule base from a file, resolves its queries with
//! [`expert_logic`], prints the verdicts and optionally keeps answering
//! queries interactively.

pub mod error;
pub mod interactive;
pub mod output;

use std::path::Path;

use expert_logic::{Config, Program};

pub use error::{Error, Result};
pub use output::OutputOptions;

/// Reads and parses a rule-base file.
pub fn load_program(path: impl AsRef<Path>, config: &Config) -> Result<Program> {
    let path = path.as_ref();
    log::info!("Loading rule base from {}", path.display());
    let text = std::fs::read_to_string(path)?;
    Ok(Program::parse(&text, config)?)
}
