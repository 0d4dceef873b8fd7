//! One transform pass over the output directory.

use crate::config::{Config, Layout};
use crate::context::ResolutionContext;
use crate::error::Error;
use crate::rewrite::{transform_file, FileKind, FileOutcome, Warning};
use crate::version::REPORT_SCHEMA_VERSION;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A file whose rewritten text could not be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteFailure {
    pub path: PathBuf,
    pub code: &'static str,
    pub message: String,
}

/// Summary of a pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassReport {
    pub schema_version: u32,
    /// Why the pass did nothing, if it did nothing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<String>,
    pub files_scanned: usize,
    pub rewrites: usize,
    pub written: Vec<PathBuf>,
    pub warnings: Vec<Warning>,
    pub failures: Vec<WriteFailure>,
}

impl PassReport {
    fn empty() -> Self {
        Self {
            schema_version: REPORT_SCHEMA_VERSION,
            ..Self::default()
        }
    }

    /// Report for a pass that had nothing to transform.
    #[must_use]
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            skipped: Some(reason.into()),
            ..Self::empty()
        }
    }

    #[must_use]
    pub fn is_skipped(&self) -> bool {
        self.skipped.is_some()
    }

    /// True when every rewritten file was persisted.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, outcome: FileOutcome) {
        self.files_scanned += 1;
        self.rewrites += outcome.rewrites;
        if outcome.written {
            self.written.push(outcome.path);
        }
        self.warnings.extend(outcome.warnings);
    }

    fn record_failure(&mut self, err: &Error) {
        self.files_scanned += 1;
        let path = match err {
            Error::Write { path, .. } => path.clone(),
            _ => PathBuf::new(),
        };
        self.failures.push(WriteFailure {
            path,
            code: err.code(),
            message: err.to_string(),
        });
    }
}

/// Build a context for `config` and rewrite every tracked file.
///
/// A missing output directory or unreadable content yields a skipped
/// report, not an error: there is simply nothing to transform yet.
pub fn run_pass(config: &Config, layout: &Layout) -> Result<PassReport, Error> {
    let ctx = match ResolutionContext::build(config, layout) {
        Ok(ctx) => ctx,
        Err(err) if err.is_soft() => return Ok(PassReport::skipped(err.to_string())),
        Err(err) => return Err(err),
    };

    Ok(transform_all(&ctx))
}

/// Rewrite every declaration and source in `ctx`.
///
/// Files are independent and processed on the rayon pool. Every file is
/// attempted; failures are collected rather than aborting the pass.
#[must_use]
pub fn transform_all(ctx: &ResolutionContext) -> PassReport {
    let (declarations, sources) = rayon::join(
        || transform_group(ctx, FileKind::Declaration, ctx.declarations_with_contents()),
        || transform_group(ctx, FileKind::Source, ctx.sources_with_contents()),
    );

    let mut report = PassReport::empty();
    for result in declarations.into_iter().chain(sources) {
        match result {
            Ok(outcome) => report.record(outcome),
            Err(err) => report.record_failure(&err),
        }
    }
    report
}

fn transform_group<'a>(
    ctx: &ResolutionContext,
    kind: FileKind,
    files: impl Iterator<Item = (&'a Path, &'a str)>,
) -> Vec<Result<FileOutcome, Error>> {
    let files: Vec<(&Path, &str)> = files.collect();
    files
        .into_par_iter()
        .map(|(path, text)| transform_file(ctx, kind, path, text))
        .collect()
}
