//! Text and identifier normalization applied before a comment is stored.

use crate::error::{IngestError, Result};

/// Stand-in for line breaks so a stored body always fits on one line.
pub const NEWLINE_SENTINEL: &str = " nowaliniaigora ";

/// Replace every `\n` and `\r` with [`NEWLINE_SENTINEL`] and every `"` with `'`.
pub fn normalize_body(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    for ch in body.chars() {
        match ch {
            '\n' | '\r' => out.push_str(NEWLINE_SENTINEL),
            '"' => out.push('\''),
            c => out.push(c),
        }
    }
    out
}

/// Absent in, absent out (a parent that is not stored has no body).
#[inline]
pub fn normalize_optional_body(body: Option<&str>) -> Option<String> {
    body.map(normalize_body)
}

/// `t1_abc123` -> `abc123`. Returns the component after the first `_`, up to the
/// next `_` if there is one.
pub fn normalize_parent_id(composite: &str) -> Result<&str> {
    composite
        .split('_')
        .nth(1)
        .ok_or_else(|| IngestError::MalformedIdentifier(composite.to_string()))
}
