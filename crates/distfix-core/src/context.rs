//! Resolution context: the static facts a rewrite pass resolves against.
//!
//! A context is built once per pass, read eagerly and atomically: either
//! every tracked file's text is loaded or no context exists at all.

use crate::builtins::BuiltinModules;
use crate::config::{Config, Layout};
use crate::error::Error;
use crate::manifest::Manifest;
use crate::paths;
use distfix_util::fs::read_utf8;
use distfix_util::walk::list_files;
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Immutable snapshot of the package and its compiled output.
#[derive(Debug, Clone)]
pub struct ResolutionContext {
    /// Directory of the resolved entry module; anchor for aliased specifiers.
    pub root: PathBuf,
    /// Naming conventions of the output.
    pub layout: Layout,
    /// Names under `dependencies`, in manifest order.
    pub dependencies: Vec<String>,
    /// Names under `devDependencies`, in manifest order.
    pub dependencies_dev: Vec<String>,
    /// Names under `peerDependencies`, in manifest order.
    pub dependencies_peer: Vec<String>,
    /// Platform built-in modules.
    pub builtin_modules: BuiltinModules,
    /// Every non-hidden file under the output directory.
    pub files: Vec<PathBuf>,
    /// Emitted scripts.
    pub sources: Vec<PathBuf>,
    /// Emitted type declarations.
    pub declarations: Vec<PathBuf>,
    /// Text of each entry of `sources`, same index.
    pub sources_contents: Vec<String>,
    /// Text of each entry of `declarations`, same index.
    pub declarations_contents: Vec<String>,

    dependencies_set: HashSet<String>,
    dependencies_dev_set: HashSet<String>,
    dependencies_peer_set: HashSet<String>,
    sources_set: HashSet<PathBuf>,
    declarations_set: HashSet<PathBuf>,
}

impl ResolutionContext {
    /// Build a context for the project described by `config`.
    ///
    /// Fails with [`Error::OutputDirMissing`] when there is no output yet,
    /// with a manifest error when `package.json` is absent, malformed or has
    /// no entry point, and with [`Error::ContentUnreadable`] when any
    /// tracked file cannot be read as UTF-8.
    pub fn build(config: &Config, layout: &Layout) -> Result<Self, Error> {
        let cwd = paths::absolutize(&config.cwd);
        let out = paths::normalize(&cwd.join(&config.out_dir));

        if !out.is_dir() {
            return Err(Error::OutputDirMissing { path: out });
        }

        let manifest = Manifest::load(&paths::absolutize(&config.manifest_path()))?;
        let entry = manifest.entry_point()?;
        let entry_path = paths::normalize(&cwd.join(entry));
        let root = entry_path
            .parent()
            .map_or_else(|| cwd.clone(), Path::to_path_buf);

        let files = list_files(&out).map_err(|source| Error::ContentUnreadable {
            path: out.clone(),
            source,
        })?;

        let (declarations, sources) = partition(&files, layout);
        let declarations_contents = read_all(&declarations)?;
        let sources_contents = read_all(&sources)?;

        Ok(Self::assemble(
            root,
            layout.clone(),
            &manifest,
            files,
            (sources, sources_contents),
            (declarations, declarations_contents),
        ))
    }

    fn assemble(
        root: PathBuf,
        layout: Layout,
        manifest: &Manifest,
        files: Vec<PathBuf>,
        (sources, sources_contents): (Vec<PathBuf>, Vec<String>),
        (declarations, declarations_contents): (Vec<PathBuf>, Vec<String>),
    ) -> Self {
        let dependencies = manifest.dependency_names();
        let dependencies_dev = manifest.dev_dependency_names();
        let dependencies_peer = manifest.peer_dependency_names();

        Self {
            root,
            layout,
            dependencies_set: dependencies.iter().cloned().collect(),
            dependencies_dev_set: dependencies_dev.iter().cloned().collect(),
            dependencies_peer_set: dependencies_peer.iter().cloned().collect(),
            dependencies,
            dependencies_dev,
            dependencies_peer,
            builtin_modules: BuiltinModules::node(),
            sources_set: sources.iter().cloned().collect(),
            declarations_set: declarations.iter().cloned().collect(),
            files,
            sources,
            declarations,
            sources_contents,
            declarations_contents,
        }
    }

    /// Whether `name` is declared in any of the three dependency classes.
    #[must_use]
    pub fn has_dependency(&self, name: &str) -> bool {
        self.dependencies_set.contains(name)
            || self.dependencies_dev_set.contains(name)
            || self.dependencies_peer_set.contains(name)
    }

    #[must_use]
    pub fn source_set(&self) -> &HashSet<PathBuf> {
        &self.sources_set
    }

    #[must_use]
    pub fn declaration_set(&self) -> &HashSet<PathBuf> {
        &self.declarations_set
    }

    /// Sources paired with their text.
    pub fn sources_with_contents(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.sources
            .iter()
            .map(PathBuf::as_path)
            .zip(self.sources_contents.iter().map(String::as_str))
    }

    /// Declarations paired with their text.
    pub fn declarations_with_contents(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.declarations
            .iter()
            .map(PathBuf::as_path)
            .zip(self.declarations_contents.iter().map(String::as_str))
    }
}

/// Split a listing into (declarations, sources). Other files are dropped.
fn partition(files: &[PathBuf], layout: &Layout) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let mut declarations = Vec::new();
    let mut sources = Vec::new();

    for file in files {
        let Some(name) = file.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.ends_with(layout.declaration_ext.as_str()) {
            declarations.push(file.clone());
        } else if name.ends_with(layout.source_ext.as_str()) {
            sources.push(file.clone());
        }
    }

    (declarations, sources)
}

/// Read every file in parallel. The first failure aborts the whole batch.
fn read_all(files: &[PathBuf]) -> Result<Vec<String>, Error> {
    files
        .par_iter()
        .map(|path| {
            read_utf8(path).map_err(|source| Error::ContentUnreadable {
                path: path.clone(),
                source,
            })
        })
        .collect()
}
