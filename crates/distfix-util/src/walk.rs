//! Recursive directory listing.

use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// List every file under `root`, skipping any entry whose name starts with `.`.
///
/// Hidden directories are pruned, so nothing beneath them is listed either.
/// The result is sorted for stable output.
///
/// # Errors
/// Returns an error if `root` or any directory beneath it cannot be read.
pub fn list_files(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
    {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_str().is_some_and(|s| s.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_list_files_recursive_sorted() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("lib")).unwrap();
        fs::write(dir.path().join("b.js"), "").unwrap();
        fs::write(dir.path().join("a.js"), "").unwrap();
        fs::write(dir.path().join("lib").join("c.d.ts"), "").unwrap();

        let files = list_files(dir.path()).unwrap();
        assert_eq!(
            files,
            vec![
                dir.path().join("a.js"),
                dir.path().join("b.js"),
                dir.path().join("lib").join("c.d.ts"),
            ]
        );
    }

    #[test]
    fn test_list_files_skips_dotfiles_and_dot_dirs() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".cache")).unwrap();
        fs::write(dir.path().join(".cache").join("x.js"), "").unwrap();
        fs::write(dir.path().join(".eslintrc.js"), "").unwrap();
        fs::write(dir.path().join("index.js"), "").unwrap();

        let files = list_files(dir.path()).unwrap();
        assert_eq!(files, vec![dir.path().join("index.js")]);
    }

    #[test]
    fn test_list_files_missing_root() {
        let dir = tempdir().unwrap();
        let err = list_files(&dir.path().join("dist")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
