//! Specifier classification and package-name grammar.

use crate::builtins::BuiltinModules;
use crate::config::Layout;
use regex_lite::Regex;
use std::sync::OnceLock;

/// What a specifier refers to, decided from its text alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecifierClass<'a> {
    /// Starts with `.`: resolved against the referencing file.
    Relative,
    /// Starts with the alias marker: resolved against the package root.
    RootAliased,
    /// Exact name of a built-in written without its prefix (`fs`).
    BareBuiltin,
    /// Explicit built-in reference; holds the name after the prefix.
    Builtin(&'a str),
    /// Package import; holds the package identity (`@scope/name` or `name`).
    Dependency(&'a str),
    /// Does not follow the package-name grammar.
    Invalid,
}

/// Package name, optionally scoped, followed by a subpath or the end.
const PACKAGE_NAME_PATTERN: &str =
    r"^((@[a-z0-9\-~][a-z0-9\-._~]*/)?([a-z0-9\-~][a-z0-9\-._~]*))(/|$)";

fn package_name_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PACKAGE_NAME_PATTERN).ok())
        .as_ref()
}

/// Package identity of a bare specifier: `@scope/name` for scoped packages,
/// the first path segment otherwise. `None` if the name is malformed.
#[must_use]
pub fn package_identity(specifier: &str) -> Option<&str> {
    package_name_re()?
        .captures(specifier)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Classify a specifier. Checks run in a fixed order; the first match wins.
#[must_use]
pub fn classify<'a>(
    specifier: &'a str,
    layout: &Layout,
    builtins: &BuiltinModules,
) -> SpecifierClass<'a> {
    if specifier.starts_with('.') {
        return SpecifierClass::Relative;
    }
    if specifier.starts_with(layout.alias_marker.as_str()) {
        return SpecifierClass::RootAliased;
    }
    if builtins.is_unprefixed(specifier) {
        return SpecifierClass::BareBuiltin;
    }
    if let Some(name) = specifier.strip_prefix(layout.builtin_prefix.as_str()) {
        return SpecifierClass::Builtin(name);
    }
    match package_identity(specifier) {
        Some(identity) => SpecifierClass::Dependency(identity),
        None => SpecifierClass::Invalid,
    }
}
