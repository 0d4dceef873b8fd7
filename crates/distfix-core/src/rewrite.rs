//! Specifier rewriting.
//!
//! Local specifiers (relative or root-aliased) are resolved against the
//! files of the resolution context and rewritten to a path that resolves
//! without further probing. Everything else is validated and left as
//! written. Nothing here ever drops or guesses a specifier: failures become
//! warnings and the original text stays in place.

use crate::context::ResolutionContext;
use crate::error::Error;
use crate::imports::scan_specifiers;
use crate::paths::normalize;
use crate::probe;
use crate::specifier::{classify, SpecifierClass};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// Which rewrite policy applies to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    /// Emitted script: specifiers get the script extension.
    Source,
    /// Type declaration: specifiers stay extensionless.
    Declaration,
}

/// Why a specifier was left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum WarningKind {
    /// Local specifier that matches no file under any probe.
    Unresolved,
    /// Package not declared in any dependency class.
    UnknownDependency { package: String },
    /// Bare specifier that is not a valid package name.
    InvalidSpecifier,
    /// Prefixed built-in that does not exist.
    UnknownBuiltin,
    /// Built-in written without its prefix.
    BareBuiltin { suggested: String },
}

impl WarningKind {
    /// Stable code for this warning.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unresolved => "UNRESOLVED_SPECIFIER",
            Self::UnknownDependency { .. } => "UNKNOWN_DEPENDENCY",
            Self::InvalidSpecifier => "INVALID_SPECIFIER",
            Self::UnknownBuiltin => "UNKNOWN_BUILTIN",
            Self::BareBuiltin { .. } => "BARE_BUILTIN",
        }
    }
}

/// A non-fatal diagnostic tied to one specifier occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub file: PathBuf,
    pub specifier: String,
    pub line: u32,
    #[serde(flatten)]
    pub kind: WarningKind,
}

impl Warning {
    #[must_use]
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = self.file.display();
        let line = self.line;
        match &self.kind {
            WarningKind::Unresolved => write!(
                f,
                "Failed to rewrite \"{}\" import in \"{file}:{line}\"",
                self.specifier
            ),
            WarningKind::UnknownDependency { package } => write!(
                f,
                "Unknown dependency \"{package}\" in \"{file}:{line}\", did you install it?"
            ),
            WarningKind::InvalidSpecifier => {
                write!(f, "Invalid module \"{}\" in \"{file}:{line}\"", self.specifier)
            }
            WarningKind::UnknownBuiltin => write!(
                f,
                "Unknown built-in module \"{}\" in \"{file}:{line}\"",
                self.specifier
            ),
            WarningKind::BareBuiltin { suggested } => write!(
                f,
                "Built-in module \"{}\" must be written as \"{suggested}\" in \"{file}:{line}\"",
                self.specifier
            ),
        }
    }
}

/// Outcome for one specifier occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    /// Keep as written, nothing to report.
    Unchanged,
    /// Replace with this text.
    Rewritten(String),
    /// Keep as written and report.
    Warn(WarningKind),
}

impl Rewrite {
    fn from_resolved(specifier: &str, resolved: Option<String>) -> Self {
        match resolved {
            Some(next) if next == specifier => Self::Unchanged,
            Some(next) => Self::Rewritten(next),
            None => Self::Warn(WarningKind::Unresolved),
        }
    }
}

/// Rewrite one specifier found in an emitted script.
#[must_use]
pub fn rewrite_source_specifier(ctx: &ResolutionContext, file: &Path, specifier: &str) -> Rewrite {
    let layout = &ctx.layout;

    match classify(specifier, layout, &ctx.builtin_modules) {
        SpecifierClass::Relative | SpecifierClass::RootAliased
            if specifier.ends_with(layout.source_ext.as_str()) =>
        {
            Rewrite::Unchanged
        }
        class @ (SpecifierClass::Relative | SpecifierClass::RootAliased) => {
            let resolved = resolve_local(
                ctx,
                file,
                specifier,
                class == SpecifierClass::RootAliased,
                ctx.source_set(),
                &layout.source_ext,
            )
            .map(|(matched, _)| matched);
            Rewrite::from_resolved(specifier, resolved)
        }
        SpecifierClass::BareBuiltin => Rewrite::Warn(WarningKind::BareBuiltin {
            suggested: format!("{}{specifier}", layout.builtin_prefix),
        }),
        SpecifierClass::Builtin(name) => {
            if ctx.builtin_modules.contains(name) {
                Rewrite::Unchanged
            } else {
                Rewrite::Warn(WarningKind::UnknownBuiltin)
            }
        }
        SpecifierClass::Dependency(package) => {
            if ctx.has_dependency(package) {
                Rewrite::Unchanged
            } else {
                Rewrite::Warn(WarningKind::UnknownDependency {
                    package: package.to_string(),
                })
            }
        }
        SpecifierClass::Invalid => Rewrite::Warn(WarningKind::InvalidSpecifier),
    }
}

/// Rewrite one specifier found in a type declaration.
///
/// Resolution probes declaration files, and a hit yields the bare relative
/// path: declaration consumers add extensions themselves. Package and
/// built-in specifiers are type references and are not validated.
#[must_use]
pub fn rewrite_declaration_specifier(
    ctx: &ResolutionContext,
    file: &Path,
    specifier: &str,
) -> Rewrite {
    let layout = &ctx.layout;

    match classify(specifier, layout, &ctx.builtin_modules) {
        SpecifierClass::Relative | SpecifierClass::RootAliased
            if specifier.ends_with(layout.source_ext.as_str()) =>
        {
            Rewrite::Unchanged
        }
        class @ (SpecifierClass::Relative | SpecifierClass::RootAliased) => {
            let resolved = resolve_local(
                ctx,
                file,
                specifier,
                class == SpecifierClass::RootAliased,
                ctx.declaration_set(),
                &layout.declaration_ext,
            )
            .map(|(_, bare)| bare);
            Rewrite::from_resolved(specifier, resolved)
        }
        _ => Rewrite::Unchanged,
    }
}

/// Resolve a local specifier from `file` against `known`.
///
/// Returns the matching candidate and the bare (unextended) relative path,
/// both relative to the directory of `file`.
fn resolve_local(
    ctx: &ResolutionContext,
    file: &Path,
    specifier: &str,
    aliased: bool,
    known: &HashSet<PathBuf>,
    ext: &str,
) -> Option<(String, String)> {
    let from = file.parent()?;

    let target = if aliased {
        let rest = &specifier[ctx.layout.alias_marker.len()..];
        normalize(&ctx.root.join(format!(".{rest}")))
    } else {
        normalize(&from.join(specifier))
    };

    let relative = probe::relative_path(from, &target);
    let candidates = probe::candidates(&relative, &target, ext);
    let matched = probe::probe_candidates(from, &candidates, known)?;

    Some((matched.to_string(), candidates[0].clone()))
}

/// Result of rewriting a whole text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRewrite {
    pub text: String,
    pub rewrites: usize,
    pub warnings: Vec<Warning>,
}

/// Rewrite every specifier in `original`. Pure: nothing is written.
#[must_use]
pub fn rewrite_text(
    ctx: &ResolutionContext,
    kind: FileKind,
    path: &Path,
    original: &str,
) -> TextRewrite {
    let mut text = String::with_capacity(original.len());
    let mut last = 0;
    let mut rewrites = 0;
    let mut warnings = Vec::new();

    for found in scan_specifiers(original) {
        let outcome = match kind {
            FileKind::Source => rewrite_source_specifier(ctx, path, &found.raw),
            FileKind::Declaration => rewrite_declaration_specifier(ctx, path, &found.raw),
        };

        match outcome {
            Rewrite::Unchanged => {}
            Rewrite::Rewritten(next) => {
                text.push_str(&original[last..found.span.start]);
                text.push_str(&next);
                last = found.span.end;
                rewrites += 1;
            }
            Rewrite::Warn(kind) => warnings.push(Warning {
                file: path.to_path_buf(),
                specifier: found.raw,
                line: found.line,
                kind,
            }),
        }
    }

    text.push_str(&original[last..]);

    TextRewrite {
        text,
        rewrites,
        warnings,
    }
}

/// What happened to one file during a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub kind: FileKind,
    pub rewrites: usize,
    pub written: bool,
    pub warnings: Vec<Warning>,
}

/// Rewrite one file and persist it if its text changed.
///
/// The replacement text is computed in full before anything is written, and
/// the write is atomic, so the file is never left half-rewritten.
pub fn transform_file(
    ctx: &ResolutionContext,
    kind: FileKind,
    path: &Path,
    original: &str,
) -> Result<FileOutcome, Error> {
    let result = rewrite_text(ctx, kind, path, original);
    let written = result.text != original;

    if written {
        distfix_util::fs::atomic_write(path, result.text.as_bytes()).map_err(|source| {
            Error::Write {
                path: path.to_path_buf(),
                source,
            }
        })?;
    }

    Ok(FileOutcome {
        path: path.to_path_buf(),
        kind,
        rewrites: result.rewrites,
        written,
        warnings: result.warnings,
    })
}
