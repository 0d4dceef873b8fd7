//! Candidate-path probing for local specifiers.
//!
//! Everything here is lexical: paths are joined and normalized but the
//! filesystem is never consulted. The set of known files comes from the
//! resolution context.

use crate::paths::normalize;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

/// Shortest relative path from directory `from_dir` to `to`, `/`-separated.
///
/// The result always starts with `./` or `../` (or is `..`), so it can never
/// be mistaken for a bare module name. Both inputs must be normalized.
#[must_use]
pub fn relative_path(from_dir: &Path, to: &Path) -> String {
    let from: Vec<Component<'_>> = from_dir.components().collect();
    let to: Vec<Component<'_>> = to.components().collect();

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = std::iter::repeat("..".to_string())
        .take(from.len() - common)
        .collect();
    parts.extend(
        to[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );

    let joined = parts.join("/");
    if joined.is_empty() {
        "./".to_string()
    } else if joined == ".." || joined.starts_with("../") {
        joined
    } else {
        format!("./{joined}")
    }
}

/// Ordered candidate list for a computed relative path.
///
/// `relative` itself, then with `ext`, then as a directory index. When the
/// relative path is the referencing directory itself (`./`), the directory
/// is addressed through its parent instead: `../<name>`, `../<name><ext>`,
/// `../<name>/index<ext>`.
#[must_use]
pub fn candidates(relative: &str, target: &Path, ext: &str) -> Vec<String> {
    let base = if relative == "./" {
        let name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("../{name}")
    } else {
        relative.to_string()
    };

    let with_ext = format!("{base}{ext}");
    let index = format!("{base}/index{ext}");
    vec![base, with_ext, index]
}

/// First candidate that names a known file when joined onto `from_dir`.
#[must_use]
pub fn probe_candidates<'a>(
    from_dir: &Path,
    candidates: &'a [String],
    known: &HashSet<PathBuf>,
) -> Option<&'a str> {
    candidates
        .iter()
        .find(|candidate| known.contains(&normalize(&from_dir.join(candidate.as_str()))))
        .map(String::as_str)
}
