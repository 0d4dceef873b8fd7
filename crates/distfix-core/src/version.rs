use std::fmt::Write;

/// The current version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version of the `--json` report layout.
/// Bump this when changing a field name or meaning.
pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// Returns a formatted version string including build metadata if available.
#[must_use]
pub fn version_string() -> String {
    let mut s = format!("distfix {VERSION}");

    if let Some(hash) = option_env!("DISTFIX_BUILD_GIT_HASH") {
        let _ = write!(s, " ({hash})");
    }

    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_not_empty() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_version_string_contains_version() {
        let vs = version_string();
        assert!(vs.contains(VERSION));
        assert!(vs.starts_with("distfix "));
    }

    #[test]
    fn test_report_schema_version_positive() {
        let schema = REPORT_SCHEMA_VERSION;
        assert!(schema > 0);
    }
}
