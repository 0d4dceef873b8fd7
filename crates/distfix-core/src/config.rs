use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default output directory, relative to the project root.
pub const DEFAULT_OUT_DIR: &str = "dist";

/// Runtime configuration for a distfix invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Project root: the directory holding `package.json`.
    pub cwd: PathBuf,

    /// Compiler output directory, relative to `cwd` unless absolute.
    pub out_dir: PathBuf,

    /// Whether to emit JSON logs.
    pub json_logs: bool,

    /// Verbosity level (0 = INFO, 1 = DEBUG, 2+ = TRACE).
    pub verbosity: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            json_logs: false,
            verbosity: 0,
        }
    }
}

impl Config {
    /// Create a new config with the given working directory.
    #[must_use]
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            cwd,
            ..Default::default()
        }
    }

    /// Set the output directory.
    #[must_use]
    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = out_dir.into();
        self
    }

    /// Set verbosity level.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set JSON log output.
    #[must_use]
    pub fn with_json_logs(mut self, json: bool) -> Self {
        self.json_logs = json;
        self
    }

    /// Path of the package manifest.
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.cwd.join("package.json")
    }

    /// Absolute path of the output directory.
    #[must_use]
    pub fn out_path(&self) -> PathBuf {
        self.cwd.join(&self.out_dir)
    }
}

/// File naming conventions of the compiler output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    /// Extension of emitted scripts.
    pub source_ext: String,
    /// Suffix of emitted type declarations.
    pub declaration_ext: String,
    /// Leading marker of root-aliased specifiers.
    pub alias_marker: String,
    /// Prefix of explicit built-in module specifiers.
    pub builtin_prefix: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            source_ext: ".js".to_string(),
            declaration_ext: ".d.ts".to_string(),
            alias_marker: "~".to_string(),
            builtin_prefix: "node:".to_string(),
        }
    }
}
