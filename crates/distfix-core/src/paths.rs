use std::path::{Component, Path, PathBuf};

/// Find the package root by walking up from `cwd` looking for `package.json`.
///
/// Returns the first directory containing one, or `None` if none is found.
#[must_use]
pub fn project_root(cwd: &Path) -> Option<PathBuf> {
    let mut current = cwd.to_path_buf();

    loop {
        if current.join("package.json").is_file() {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Lexically normalize a path: drop `.` components and fold `..` into its parent.
///
/// Never touches the filesystem, so symlinks are not resolved. A `..` that
/// would climb above the root is dropped for absolute paths and kept for
/// relative ones.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    out.iter().map(|c| c.as_os_str()).collect()
}

/// Make `path` absolute against the process working directory, then normalize it.
#[must_use]
pub fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        let base = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        normalize(&base.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_project_root_with_package_json() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("c");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();

        let root = project_root(&nested);
        assert_eq!(root, Some(dir.path().to_path_buf()));
    }

    #[test]
    fn test_project_root_prefers_nearest() {
        let dir = tempdir().unwrap();
        let inner = dir.path().join("packages").join("inner");
        fs::create_dir_all(inner.join("src")).unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();
        fs::write(inner.join("package.json"), "{}").unwrap();

        assert_eq!(project_root(&inner.join("src")), Some(inner));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(
            normalize(Path::new("/a/b/./c/../d")),
            PathBuf::from("/a/b/d")
        );
        assert_eq!(normalize(Path::new("/a/../../b")), PathBuf::from("/b"));
        assert_eq!(normalize(Path::new("../a/./b")), PathBuf::from("../a/b"));
        assert_eq!(normalize(Path::new("a/..")), PathBuf::new());
    }

    #[test]
    fn test_absolutize_keeps_absolute() {
        assert_eq!(
            absolutize(Path::new("/pkg/./dist/../dist")),
            PathBuf::from("/pkg/dist")
        );
        assert!(absolutize(Path::new("dist")).is_absolute());
    }
}
