//! Retention filter: decides whether a raw comment is worth keeping.

use crate::record::RawRecord;
use std::fmt;

/// Minimum score a comment needs to be kept.
pub const MIN_SCORE: i64 = 2;
/// Maximum number of single-space separated tokens in a kept body.
pub const MAX_BODY_TOKENS: usize = 75;

/// Why a record was dropped. Checks run in declaration order; the first hit wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    LowScore,
    Removed,
    EmptyBody,
    TooLong,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Rejection::LowScore => "score below minimum",
            Rejection::Removed => "deleted or removed body",
            Rejection::EmptyBody => "empty body",
            Rejection::TooLong => "body too long",
        };
        f.write_str(s)
    }
}

pub fn check(record: &RawRecord) -> Result<(), Rejection> {
    if record.score < MIN_SCORE {
        return Err(Rejection::LowScore);
    }
    let body = record.body.as_str();
    if body == "[deleted]" || body == "[removed]" {
        return Err(Rejection::Removed);
    }
    if body.is_empty() {
        return Err(Rejection::EmptyBody);
    }
    // Splits on single spaces exactly, so runs of spaces yield empty tokens.
    if body.split(' ').count() > MAX_BODY_TOKENS {
        return Err(Rejection::TooLong);
    }
    Ok(())
}

#[inline]
pub fn is_valid(record: &RawRecord) -> bool {
    check(record).is_ok()
}
