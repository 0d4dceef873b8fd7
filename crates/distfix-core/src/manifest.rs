//! Package manifest (`package.json`) reading.
//!
//! Only the fields distfix consults are modelled. Fields whose shape varies
//! between packages stay raw JSON and are type-checked where they are used.

use crate::error::Error;
use serde::Deserialize;
use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};

/// The parts of a `package.json` relevant to rewriting.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub main: Option<Value>,
    #[serde(default)]
    pub bin: Option<Value>,
    #[serde(default)]
    pub exports: Option<Value>,
    #[serde(default)]
    pub dependencies: Option<Value>,
    #[serde(default)]
    pub dev_dependencies: Option<Value>,
    #[serde(default)]
    pub peer_dependencies: Option<Value>,

    /// Where the manifest was loaded from.
    #[serde(skip)]
    pub path: PathBuf,
}

impl Manifest {
    /// Load and parse the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::ManifestMissing {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => {
                return Err(Error::ManifestUnreadable {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        };

        let mut manifest = Self::parse(&content).map_err(|e| Error::ManifestUnreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        manifest.path = path.to_path_buf();
        Ok(manifest)
    }

    /// Parse manifest text. The top level must be a JSON object.
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(content)?;
        if !value.is_object() {
            return Err(<serde_json::Error as serde::de::Error>::custom(
                "top level of package.json must be an object",
            ));
        }
        serde_json::from_value(value)
    }

    /// Determine the entry module, relative to the package root.
    ///
    /// Candidates in priority order: string `exports`, string `exports["."]`,
    /// string `exports["."].import`, string `main`, string `bin`.
    pub fn entry_point(&self) -> Result<&str, Error> {
        let dot = self.exports.as_ref().and_then(|e| e.get("."));

        let candidates = [
            self.exports.as_ref().and_then(Value::as_str),
            dot.and_then(Value::as_str),
            dot.and_then(|d| d.get("import")).and_then(Value::as_str),
            self.main.as_ref().and_then(Value::as_str),
            self.bin.as_ref().and_then(Value::as_str),
        ];

        candidates
            .into_iter()
            .flatten()
            .next()
            .ok_or_else(|| Error::EntryPointMissing {
                path: self.path.clone(),
            })
    }

    /// Names under `dependencies`, in manifest order.
    #[must_use]
    pub fn dependency_names(&self) -> Vec<String> {
        keys(self.dependencies.as_ref())
    }

    /// Names under `devDependencies`, in manifest order.
    #[must_use]
    pub fn dev_dependency_names(&self) -> Vec<String> {
        keys(self.dev_dependencies.as_ref())
    }

    /// Names under `peerDependencies`, in manifest order.
    #[must_use]
    pub fn peer_dependency_names(&self) -> Vec<String> {
        keys(self.peer_dependencies.as_ref())
    }
}

fn keys(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_object)
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn entry(json: &str) -> Option<String> {
        Manifest::parse(json)
            .unwrap()
            .entry_point()
            .ok()
            .map(str::to_string)
    }

    #[test]
    fn test_entry_exports_string_wins() {
        let json = r#"{"exports": "./dist/a.js", "main": "./dist/b.js"}"#;
        assert_eq!(entry(json).as_deref(), Some("./dist/a.js"));
    }

    #[test]
    fn test_entry_exports_dot_string() {
        let json = r#"{"exports": {".": "./dist/dot.js"}, "main": "./dist/b.js"}"#;
        assert_eq!(entry(json).as_deref(), Some("./dist/dot.js"));
    }

    #[test]
    fn test_entry_exports_dot_import() {
        let json = r#"{"exports": {".": {"import": "./dist/esm.js", "require": "./dist/cjs.js"}}}"#;
        assert_eq!(entry(json).as_deref(), Some("./dist/esm.js"));
    }

    #[test]
    fn test_entry_falls_back_to_main_then_bin() {
        let json = r#"{"exports": {"./sub": "./dist/sub.js"}, "main": "dist/main.js"}"#;
        assert_eq!(entry(json).as_deref(), Some("dist/main.js"));

        let json = r#"{"bin": "dist/bin.js"}"#;
        assert_eq!(entry(json).as_deref(), Some("dist/bin.js"));
    }

    #[test]
    fn test_entry_ignores_badly_typed_candidates() {
        let json = r#"{"exports": {".": {"import": 42}}, "main": ["x"], "bin": {"cli": "dist/cli.js"}}"#;
        assert_eq!(entry(json), None);
    }

    #[test]
    fn test_entry_missing_error_names_manifest() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("package.json");
        fs::write(&path, r#"{"name": "pkg"}"#).unwrap();

        let manifest = Manifest::load(&path).unwrap();
        match manifest.entry_point() {
            Err(Error::EntryPointMissing { path: p }) => assert_eq!(p, path),
            other => panic!("expected EntryPointMissing, got {other:?}"),
        }
    }

    #[test]
    fn test_dependency_names_keep_order() {
        let json = r#"{
            "dependencies": {"zod": "^3", "@scope/a": "1", "lodash": "4"},
            "devDependencies": {"typescript": "5"},
            "peerDependencies": {"react": "*"}
        }"#;
        let manifest = Manifest::parse(json).unwrap();
        assert_eq!(manifest.dependency_names(), vec!["zod", "@scope/a", "lodash"]);
        assert_eq!(manifest.dev_dependency_names(), vec!["typescript"]);
        assert_eq!(manifest.peer_dependency_names(), vec!["react"]);
    }

    #[test]
    fn test_dependency_names_tolerate_wrong_shape() {
        let manifest = Manifest::parse(r#"{"dependencies": ["lodash"]}"#).unwrap();
        assert!(manifest.dependency_names().is_empty());
    }

    #[test]
    fn test_load_missing() {
        let dir = tempdir().unwrap();
        let err = Manifest::load(&dir.path().join("package.json")).unwrap_err();
        assert!(matches!(err, Error::ManifestMissing { .. }));
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("package.json");
        fs::write(&path, "{ not json").unwrap();
        let err = Manifest::load(&path).unwrap_err();
        assert!(matches!(err, Error::ManifestUnreadable { .. }));
    }

    #[test]
    fn test_load_non_object() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("package.json");
        fs::write(&path, "[]").unwrap();
        let err = Manifest::load(&path).unwrap_err();
        assert!(matches!(err, Error::ManifestUnreadable { .. }));
    }

    #[test]
    fn test_parse_rejects_non_object_top_level() {
        for content in ["[]", "[1, 2]", "\"dist/index.js\"", "null", "42"] {
            let err = Manifest::parse(content).unwrap_err();
            assert!(err.to_string().contains("must be an object"), "{content}: {err}");
        }
        assert!(Manifest::parse("{}").is_ok());
    }
}
