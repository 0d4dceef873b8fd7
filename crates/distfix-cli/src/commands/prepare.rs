//! `distfix prepare` command implementation.
//!
//! Readies a package for publishing: the output directory is deleted so no
//! stale files survive, then the project is compiled and transformed.

use super::{clean, compile};
use distfix_core::Config;
use miette::Result;
use tracing::info;

/// Run the prepare command. A missing compiler is reported before anything
/// is deleted.
pub fn run(config: &Config, json: bool) -> Result<()> {
    compile::locate_tsc(&config.cwd)?;

    info!(path = %config.out_path().display(), "Cleaning before compile");
    clean::remove_output(config)?;
    compile::run(config, json, false)
}
