//! `distfix declare` command implementation.
//!
//! Bundles the project's type declarations into a single
//! `<out-dir>/index.d.ts` with tsc. No transform pass follows: the bundled
//! file has no relative specifiers left to fix.

use super::compile::{locate_tsc, run_tsc};
use distfix_core::Config;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::ffi::OsString;
use std::path::Path;

/// Name of the bundled declaration file inside the output directory.
const DECLARATION_FILE: &str = "index.d.ts";

/// Result for JSON output.
#[derive(Serialize)]
struct DeclareResult {
    ok: bool,
    path: String,
}

/// Run the declare command. With `watch`, tsc's own watch mode takes over
/// and this only returns once tsc exits.
pub fn run(config: &Config, json: bool, watch: bool) -> Result<()> {
    let (node, tsc) = locate_tsc(&config.cwd)?;
    let out_file = config.out_path().join(DECLARATION_FILE);

    let args = tsc_args(&out_file, watch);
    let args: Vec<_> = args.iter().map(OsString::as_os_str).collect();
    let ok = run_tsc(&node, &tsc, &args, &config.cwd, json)?;

    if json {
        let result = DeclareResult {
            ok,
            path: out_file.display().to_string(),
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&result).into_diagnostic()?
        );
    }

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

fn tsc_args(out_file: &Path, watch: bool) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "--declaration".into(),
        "--emitDeclarationOnly".into(),
        "--outFile".into(),
        out_file.as_os_str().to_owned(),
    ];
    if watch {
        args.push("--watch".into());
    }
    args
}
