//! `distfix version` command implementation.

use distfix_core::version::{version_string, REPORT_SCHEMA_VERSION, VERSION};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

/// Result for JSON output.
#[derive(Serialize)]
struct VersionResult {
    name: &'static str,
    version: &'static str,
    schema_version: u32,
}

const VERSION_RESULT: VersionResult = VersionResult {
    name: "distfix",
    version: VERSION,
    schema_version: REPORT_SCHEMA_VERSION,
};

/// Print the version, as a line or as a JSON object that also names the
/// report layout tools can expect from `transform --json`.
pub fn run(json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&VERSION_RESULT).into_diagnostic()?
        );
    } else {
        println!("{}", version_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(&VERSION_RESULT).unwrap();
        assert_eq!(json["name"], "distfix");
        assert_eq!(json["version"], VERSION);
        assert_eq!(json["schema_version"], REPORT_SCHEMA_VERSION);
    }
}
