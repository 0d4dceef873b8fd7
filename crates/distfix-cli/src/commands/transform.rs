//! `distfix transform` command implementation.

use super::watch;
use distfix_core::version::REPORT_SCHEMA_VERSION;
use distfix_core::{run_pass, Config, Layout, PassReport};
use miette::{miette, IntoDiagnostic, Result};
use serde::Serialize;
use tracing::{debug, error, info, warn};

/// Error info for JSON output.
#[derive(Serialize)]
struct TransformError {
    code: &'static str,
    message: String,
}

/// Result for JSON output.
#[derive(Serialize)]
struct TransformResult<'a> {
    ok: bool,
    /// Set only when there is no report to carry it.
    #[serde(skip_serializing_if = "Option::is_none")]
    schema_version: Option<u32>,
    #[serde(flatten)]
    report: Option<&'a PassReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<TransformError>,
}

/// Run the transform command.
pub fn run(config: &Config, json: bool, watch: bool) -> Result<()> {
    let layout = Layout::default();

    if watch {
        let first = execute(config, &layout, json);
        log_failure(first);

        return watch::run(&[config.out_path()], || {
            log_failure(execute(config, &layout, json));
        });
    }

    if !execute(config, &layout, json)? {
        std::process::exit(1);
    }
    Ok(())
}

/// Run one pass and report it.
///
/// Returns `Ok(false)` when the pass finished but something failed (a write
/// error, or a fatal error already reported as JSON).
pub fn execute(config: &Config, layout: &Layout, json: bool) -> Result<bool> {
    debug!(out_dir = %config.out_path().display(), "Starting transform pass");

    let report = match run_pass(config, layout) {
        Ok(report) => report,
        Err(err) if json => {
            print_json(&TransformResult {
                ok: false,
                schema_version: Some(REPORT_SCHEMA_VERSION),
                report: None,
                error: Some(TransformError {
                    code: err.code(),
                    message: err.to_string(),
                }),
            })?;
            return Ok(false);
        }
        Err(err) => return Err(miette!(code = err.code(), "{err}")),
    };

    if json {
        print_json(&TransformResult {
            ok: report.is_ok(),
            schema_version: None,
            report: Some(&report),
            error: None,
        })?;
    } else {
        print_human(&report);
    }

    debug!(
        written = report.written.len(),
        warnings = report.warnings.len(),
        "Transform pass finished"
    );

    Ok(report.is_ok())
}

fn print_human(report: &PassReport) {
    if let Some(reason) = &report.skipped {
        info!("Nothing to transform: {reason}");
        return;
    }

    for warning in &report.warnings {
        warn!("warning[{}]: {warning}", warning.code());
    }
    for path in &report.written {
        debug!(path = %path.display(), "Rewrote file");
    }
    for failure in &report.failures {
        error!(path = %failure.path.display(), code = failure.code, "{}", failure.message);
    }

    println!(
        "Transformed {} files: {} specifiers rewritten in {} files, {} warnings",
        report.files_scanned,
        report.rewrites,
        report.written.len(),
        report.warnings.len()
    );
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{out}");
    Ok(())
}

/// In watch mode a failed run is logged and the watcher keeps going.
pub fn log_failure(result: Result<bool>) {
    match result {
        Ok(true) => {}
        Ok(false) => error!("Transform finished with errors"),
        Err(err) => error!("{err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_result_flattens_report() {
        let report = PassReport::skipped("Output directory not found: /p/dist");
        let value = serde_json::to_value(TransformResult {
            ok: true,
            schema_version: None,
            report: Some(&report),
            error: None,
        })
        .unwrap();

        assert_eq!(value["ok"], true);
        assert_eq!(value["schema_version"], REPORT_SCHEMA_VERSION);
        assert!(value["skipped"].is_string());
        assert!(value["warnings"].is_array());
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_json_error_has_code() {
        let value = serde_json::to_value(TransformResult {
            ok: false,
            schema_version: Some(REPORT_SCHEMA_VERSION),
            report: None,
            error: Some(TransformError {
                code: "MANIFEST_MISSING",
                message: "package.json not found".to_string(),
            }),
        })
        .unwrap();

        assert_eq!(value["ok"], false);
        assert_eq!(value["schema_version"], REPORT_SCHEMA_VERSION);
        assert_eq!(value["error"]["code"], "MANIFEST_MISSING");
        assert!(value.get("warnings").is_none());
    }
}
