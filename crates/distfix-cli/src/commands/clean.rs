//! `distfix clean` command implementation.

use distfix_core::Config;
use distfix_util::fs::remove_dir_if_exists;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tracing::info;

/// Result for JSON output.
#[derive(Serialize)]
struct CleanResult {
    ok: bool,
    path: String,
    removed: bool,
}

/// Delete the output directory if it exists.
pub fn run(config: &Config, json: bool) -> Result<()> {
    let out = config.out_path();
    let removed = remove_output(config)?;

    if json {
        let result = CleanResult {
            ok: true,
            path: out.display().to_string(),
            removed,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&result).into_diagnostic()?
        );
    } else if removed {
        info!(path = %out.display(), "Removed output directory");
    } else {
        info!(path = %out.display(), "Nothing to clean");
    }

    Ok(())
}

/// Remove the output directory. Returns whether there was one.
pub fn remove_output(config: &Config) -> Result<bool> {
    remove_dir_if_exists(&config.out_path()).into_diagnostic()
}
