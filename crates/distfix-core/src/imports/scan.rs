//! Import specifier scanner.
//!
//! Walks the source bytes once, skipping comments and string, template and
//! regular expression literals, and reports the quoted specifier of every
//! `import`, `export ... from` and `require(...)` it meets. Spans are byte offsets of
//! the literal text without its quotes, so callers can splice replacements
//! back into the original source.

use std::ops::Range;

/// Syntactic form a specifier was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// `import x from "..."` or `import "..."`.
    EsmImport,
    /// `import("...")`, also used by declaration files for type imports.
    DynamicImport,
    /// `export ... from "..."`.
    EsmExport,
    /// `require("...")`.
    CjsRequire,
}

/// One specifier literal found in source code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecifierMatch {
    /// Specifier exactly as written, without quotes.
    pub raw: String,
    /// Byte range of `raw` within the scanned source.
    pub span: Range<usize>,
    /// Statement form.
    pub kind: ImportKind,
    /// Line number (1-indexed).
    pub line: u32,
}

/// Scan source code for every import/export/require specifier, in order.
///
/// Occurrences are not deduplicated: each one is a separate rewrite site.
/// Only `'` and `"` literals count; template literals are never specifiers.
#[must_use]
pub fn scan_specifiers(source: &str) -> Vec<SpecifierMatch> {
    let bytes = source.as_bytes();
    let len = bytes.len();
    let mut results = Vec::new();
    let mut line: u32 = 1;
    let mut i = 0;

    while i < len {
        let c = bytes[i];

        if c == b'\n' {
            line += 1;
            i += 1;
            continue;
        }

        let skipped = match c {
            b'/' if bytes.get(i + 1) == Some(&b'/') => Some(skip_line_comment(bytes, i)),
            b'/' if bytes.get(i + 1) == Some(&b'*') => Some(skip_block_comment(bytes, i)),
            b'\'' | b'"' => Some(skip_string(bytes, i)),
            b'`' => Some(skip_template(bytes, i)),
            b'/' if regex_allowed(bytes, i) => Some(skip_regex(bytes, i)),
            _ => None,
        };
        if let Some(end) = skipped {
            line += count_newlines(&bytes[i..end]);
            i = end;
            continue;
        }

        let found = if matches_keyword(bytes, i, "import") {
            Some((scan_import(bytes, i + 6), 6))
        } else if matches_keyword(bytes, i, "export") {
            Some((scan_export_from(bytes, i + 6), 6))
        } else if matches_keyword(bytes, i, "require") {
            Some((scan_require_call(bytes, i + 7), 7))
        } else {
            None
        };

        match found {
            Some((Some((span, end, kind)), _)) => {
                let spec_line = line + count_newlines(&bytes[i..span.start]);
                results.push(SpecifierMatch {
                    raw: source[span.clone()].to_string(),
                    span,
                    kind,
                    line: spec_line,
                });
                line += count_newlines(&bytes[i..end]);
                i = end;
            }
            // Keyword without a specifier: step over it and keep scanning
            Some((None, keyword_len)) => i += keyword_len,
            None => i += 1,
        }
    }

    results
}

type Found = Option<(Range<usize>, usize, ImportKind)>;

/// Scan after `import`: dynamic call, side-effect import, or clause + `from`.
fn scan_import(bytes: &[u8], start: usize) -> Found {
    let i = skip_trivia(bytes, start);

    match bytes.get(i) {
        Some(b'(') => {
            let i = skip_trivia(bytes, i + 1);
            let (span, end) = read_literal(bytes, i)?;
            Some((span, end, ImportKind::DynamicImport))
        }
        Some(b'\'' | b'"') => {
            let (span, end) = read_literal(bytes, i)?;
            Some((span, end, ImportKind::EsmImport))
        }
        _ => scan_clause_from(bytes, i).map(|(span, end)| (span, end, ImportKind::EsmImport)),
    }
}

/// Scan after `export` for a re-export clause ending in `from "..."`.
fn scan_export_from(bytes: &[u8], start: usize) -> Found {
    let i = skip_trivia(bytes, start);
    scan_clause_from(bytes, i).map(|(span, end)| (span, end, ImportKind::EsmExport))
}

/// Walk an import/export clause (`a, { b as c }`, `* as ns`, `type { T }`)
/// up to `from "..."`. Any other punctuation ends the attempt, so a clause
/// never runs into the next statement.
fn scan_clause_from(bytes: &[u8], start: usize) -> Option<(Range<usize>, usize)> {
    let len = bytes.len();
    let mut i = start;

    while i < len {
        if matches_keyword(bytes, i, "from") {
            let j = skip_trivia(bytes, i + 4);
            if matches!(bytes.get(j), Some(b'\'' | b'"')) {
                return read_literal(bytes, j);
            }
            // `from` used as a binding name, e.g. `export { from } from "x"`
            i += 4;
            continue;
        }

        let c = bytes[i];
        if c == b'/' && matches!(bytes.get(i + 1), Some(b'/' | b'*')) {
            i = skip_trivia(bytes, i);
            continue;
        }
        if is_ident_byte(c) || c.is_ascii_whitespace() || matches!(c, b'{' | b'}' | b',' | b'*')
        {
            i += 1;
            continue;
        }

        return None;
    }

    None
}

/// Scan after `require` for `( "..."`.
fn scan_require_call(bytes: &[u8], start: usize) -> Found {
    let i = skip_trivia(bytes, start);
    if bytes.get(i) != Some(&b'(') {
        return None;
    }
    let i = skip_trivia(bytes, i + 1);
    let (span, end) = read_literal(bytes, i)?;
    Some((span, end, ImportKind::CjsRequire))
}

/// Read a `'` or `"` quoted specifier at `pos`.
///
/// Returns the inner span and the position after the closing quote. Empty
/// literals and literals containing whitespace or the other quote character
/// are not specifiers.
fn read_literal(bytes: &[u8], pos: usize) -> Option<(Range<usize>, usize)> {
    let quote = *bytes.get(pos)?;
    if quote != b'\'' && quote != b'"' {
        return None;
    }

    let start = pos + 1;
    let mut i = start;
    while i < bytes.len() {
        let c = bytes[i];
        if c == quote {
            if i == start {
                return None;
            }
            return Some((start..i, i + 1));
        }
        if c.is_ascii_whitespace() || c == b'\'' || c == b'"' {
            return None;
        }
        i += 1;
    }

    None
}

/// Check if bytes at position match a keyword (with word boundary).
///
/// A preceding `.` also disqualifies the match, so property accesses such as
/// `module.require(...)` are not treated as statements.
fn matches_keyword(bytes: &[u8], pos: usize, keyword: &str) -> bool {
    let kw = keyword.as_bytes();
    let end = pos + kw.len();

    if end > bytes.len() || &bytes[pos..end] != kw {
        return false;
    }

    if pos > 0 && (is_ident_byte(bytes[pos - 1]) || bytes[pos - 1] == b'.') {
        return false;
    }

    !(end < bytes.len() && is_ident_byte(bytes[end]))
}

fn is_ident_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c == b'$' || c >= 0x80
}

/// Skip whitespace and comments.
fn skip_trivia(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < bytes.len() {
        if bytes[i].is_ascii_whitespace() {
            i += 1;
        } else if bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'/') {
            i = skip_line_comment(bytes, i);
        } else if bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'*') {
            i = skip_block_comment(bytes, i);
        } else {
            break;
        }
    }
    i
}

/// Position of the newline ending a `//` comment (not consumed).
fn skip_line_comment(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|&c| c == b'\n')
        .map_or(bytes.len(), |p| start + p)
}

/// Position after the `*/` closing a block comment.
fn skip_block_comment(bytes: &[u8], start: usize) -> usize {
    let body = start + 2;
    bytes
        .get(body..)
        .and_then(|rest| rest.windows(2).position(|w| w == b"*/"))
        .map_or(bytes.len(), |p| body + p + 2)
}

/// Position after a `'`/`"` string. Strings cannot span lines, so an
/// unescaped newline ends the skip (keeps a stray quote from hiding code).
fn skip_string(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return i,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Whether a `/` at `pos` starts a regular expression literal rather than
/// a division: true at the start of the text, after a punctuator or
/// operator, and after keywords that take an expression.
fn regex_allowed(bytes: &[u8], pos: usize) -> bool {
    let mut i = pos;
    while i > 0 && bytes[i - 1].is_ascii_whitespace() {
        i -= 1;
    }
    if i == 0 {
        return true;
    }

    match bytes[i - 1] {
        b'(' | b',' | b'=' | b':' | b'[' | b'!' | b'&' | b'|' | b'?' | b'{' | b';' | b'+'
        | b'-' | b'*' | b'%' | b'<' | b'>' | b'~' | b'^' => true,
        c if is_ident_byte(c) => {
            let end = i;
            while i > 0 && is_ident_byte(bytes[i - 1]) {
                i -= 1;
            }
            matches!(
                &bytes[i..end],
                b"return" | b"typeof" | b"case" | b"do" | b"else" | b"in" | b"of" | b"void"
                    | b"yield" | b"await" | b"delete" | b"throw"
            )
        }
        _ => false,
    }
}

/// Position after a regular expression literal. A `/` inside a character
/// class does not close it. An unescaped newline means this was not a
/// regex after all, and scanning resumes there.
fn skip_regex(bytes: &[u8], start: usize) -> usize {
    let mut in_class = false;
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return i,
            b'[' => {
                in_class = true;
                i += 1;
            }
            b']' => {
                in_class = false;
                i += 1;
            }
            b'/' if !in_class => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Position after a template literal.
fn skip_template(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

#[allow(clippy::cast_possible_truncation)]
fn count_newlines(bytes: &[u8]) -> u32 {
    bytes.iter().filter(|&&c| c == b'\n').count() as u32
}
