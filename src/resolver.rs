//! Best-of-parent decision: should a new comment replace a stored sibling,
//! be stored next to it, or be dropped?

use crate::record::Comment;
use crate::store::{CommentStore, StoreResult};
use std::fmt;
use std::str::FromStr;

/// What to do with a candidate when a sibling scoring at least as well is
/// already stored under the same parent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReplacePolicy {
    /// Store the candidate anyway, next to the better sibling. Only the replace
    /// branch enforces best-of-parent; siblings can accumulate.
    KeepAll,
    /// Drop the candidate. At most one comment per parent is ever stored.
    #[default]
    BestOnly,
}

impl fmt::Display for ReplacePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReplacePolicy::KeepAll => "keep-all",
            ReplacePolicy::BestOnly => "best-only",
        })
    }
}

impl FromStr for ReplacePolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keep-all" | "keep_all" | "keepall" => Ok(ReplacePolicy::KeepAll),
            "best-only" | "best_only" | "bestonly" => Ok(ReplacePolicy::BestOnly),
            other => Err(format!("unknown replace policy {other:?} (expected keep-all or best-only)")),
        }
    }
}

/// Store mutation chosen for one candidate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Insert,
    /// Overwrite the stored sibling keyed by `target_id`.
    Replace { target_id: String },
    /// A sibling with `kept_score >= candidate score` stays; the candidate is not stored.
    Discard { kept_id: String, kept_score: i64 },
}

/// Best stored sibling under `parent_id` scoring at least `candidate_score`.
pub fn find_better_sibling<S: CommentStore + ?Sized>(
    store: &S,
    parent_id: &str,
    candidate_score: i64,
) -> StoreResult<Option<Comment>> {
    // Scores are integers: "> score - 1" is ">= score".
    store.find_best_above(parent_id, candidate_score.saturating_sub(1))
}

/// Top stored sibling under `parent_id` scoring strictly more than
/// `candidate_score`. Despite the name this finds a sibling the candidate
/// cannot beat; a hit means the candidate is not a replacement.
pub fn find_worse_sibling<S: CommentStore + ?Sized>(
    store: &S,
    parent_id: &str,
    candidate_score: i64,
) -> StoreResult<Option<Comment>> {
    store.find_best_above(parent_id, candidate_score)
}

/// Best stored sibling under `parent_id`, whatever its score.
pub fn best_sibling<S: CommentStore + ?Sized>(store: &S, parent_id: &str) -> StoreResult<Option<Comment>> {
    store.find_best_above(parent_id, i64::MIN)
}

/// Decide how `candidate` enters the store.
///
/// 1. A sibling at least as good exists: `KeepAll` inserts, `BestOnly` discards.
/// 2. Otherwise the best (necessarily lower-scoring) sibling is replaced.
/// 3. No sibling at all: insert.
pub fn resolve<S: CommentStore + ?Sized>(
    store: &S,
    candidate: &Comment,
    policy: ReplacePolicy,
) -> StoreResult<Resolution> {
    if let Some(better) = find_better_sibling(store, &candidate.parent_id, candidate.score)? {
        return Ok(match policy {
            ReplacePolicy::KeepAll => Resolution::Insert,
            ReplacePolicy::BestOnly => Resolution::Discard {
                kept_id: better.comment_id,
                kept_score: better.score,
            },
        });
    }
    // Nothing scores >= candidate, so any stored sibling is strictly lower.
    Ok(match best_sibling(store, &candidate.parent_id)? {
        Some(lower) => Resolution::Replace { target_id: lower.comment_id },
        None => Resolution::Insert,
    })
}
