//! `distfix compile` command implementation.
//!
//! Runs the project's own TypeScript compiler, then a transform pass over
//! what it emitted.

use super::{transform, watch};
use distfix_core::{Config, Layout};
use miette::{miette, IntoDiagnostic, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, error};

/// Compiler entry point, relative to the project root.
const TSC_PATH: &str = "node_modules/typescript/bin/tsc";

/// Source directory watched in `--watch` mode.
const SOURCE_DIR: &str = "src";

/// Run the compile command.
pub fn run(config: &Config, json: bool, watch: bool) -> Result<()> {
    let (node, tsc) = locate_tsc(&config.cwd)?;

    let layout = Layout::default();
    let compile = || -> Result<bool> {
        let compiled = run_tsc(&node, &tsc, &[], &config.cwd, json)?;
        let transformed = transform::execute(config, &layout, json)?;
        Ok(compiled && transformed)
    };

    if watch {
        transform::log_failure(compile());

        let roots = [config.cwd.join(SOURCE_DIR), config.cwd.join("tsconfig.json")];
        return watch::run(&roots, || transform::log_failure(compile()));
    }

    if !compile()? {
        std::process::exit(1);
    }
    Ok(())
}

/// Find the project's tsc and the `node` binary to run it with.
pub fn locate_tsc(cwd: &Path) -> Result<(PathBuf, PathBuf)> {
    let tsc = cwd.join(TSC_PATH);
    if !tsc.is_file() {
        return Err(miette!(
            code = "TYPESCRIPT_MISSING",
            help = "install it with `npm install --save-dev typescript`",
            "TypeScript not found at {}",
            tsc.display()
        ));
    }

    let node = which::which("node").map_err(|e| {
        miette!(
            code = "NODE_NOT_FOUND",
            help = "install Node.js and make sure `node` is on PATH",
            "node not found: {e}"
        )
    })?;

    Ok((node, tsc))
}

/// Run tsc with `args` in `cwd`. Returns whether it exited successfully.
///
/// A failing compile is reported but not fatal: tsc still emits output on
/// type errors, and that output is transformed like any other. With
/// `--json`, tsc's stdout is sent to stderr so stdout holds only the report.
pub fn run_tsc(
    node: &Path,
    tsc: &Path,
    args: &[&OsStr],
    cwd: &Path,
    json: bool,
) -> Result<bool> {
    debug!(node = %node.display(), tsc = %tsc.display(), ?args, "Running tsc");

    let stdout = if json {
        Stdio::from(std::io::stderr())
    } else {
        Stdio::inherit()
    };

    let status = Command::new(node)
        .arg(tsc)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(stdout)
        .stderr(Stdio::inherit())
        .status()
        .into_diagnostic()?;

    if !status.success() {
        error!(code = ?status.code(), "tsc failed");
    }
    Ok(status.success())
}
