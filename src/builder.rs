//! Turns a validated raw record into the stored [`Comment`] shape.

use crate::error::{Result, StoreError};
use crate::normalize::{normalize_body, normalize_optional_body, normalize_parent_id};
use crate::record::{Comment, RawRecord};
use crate::store::CommentStore;

/// Build a [`Comment`] from `raw`, resolving the parent through `parent_lookup`.
///
/// The lookup receives the bare parent id and returns the stored comment with that
/// `comment_id`, if any. Its body becomes `parent_body`. `raw` is left untouched.
pub fn build<F>(raw: &RawRecord, parent_lookup: F) -> Result<Comment>
where
    F: FnOnce(&str) -> std::result::Result<Option<Comment>, StoreError>,
{
    let parent_id = normalize_parent_id(&raw.parent_id)?;
    let parent = parent_lookup(parent_id)?;

    Ok(Comment {
        comment_id: raw.id.clone(),
        parent_id: parent_id.to_string(),
        created_utc: raw.created_utc,
        score: raw.score,
        subreddit: raw.subreddit.clone(),
        controversiality: raw.controversiality,
        body: normalize_body(&raw.body),
        parent_body: normalize_optional_body(parent.as_ref().map(|p| p.body.as_str())),
    })
}

/// [`build`] with the parent looked up by key in `store`.
pub fn build_from_store<S: CommentStore + ?Sized>(raw: &RawRecord, store: &S) -> Result<Comment> {
    build(raw, |id| store.find_by_key(id))
}
