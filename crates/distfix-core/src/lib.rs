#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]

pub mod builtins;
pub mod config;
pub mod context;
pub mod error;
pub mod imports;
pub mod manifest;
pub mod pass;
pub mod paths;
pub mod probe;
pub mod rewrite;
pub mod specifier;
pub mod version;

pub use config::{Config, Layout};
pub use context::ResolutionContext;
pub use error::Error;
pub use imports::{scan_specifiers, ImportKind, SpecifierMatch};
pub use manifest::Manifest;
pub use pass::{run_pass, PassReport, WriteFailure};
pub use rewrite::{
    rewrite_declaration_specifier, rewrite_source_specifier, rewrite_text, transform_file,
    FileKind, FileOutcome, Rewrite, TextRewrite, Warning, WarningKind,
};
pub use specifier::{classify, package_identity, SpecifierClass};
pub use version::VERSION;
