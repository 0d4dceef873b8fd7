//! Import discovery for compiled JavaScript and declaration files.
//!
//! Provides a scanner that locates the specifier literals of `import`,
//! `export ... from` and `require(...)` without parsing the module.

mod scan;

pub use scan::{scan_specifiers, ImportKind, SpecifierMatch};
