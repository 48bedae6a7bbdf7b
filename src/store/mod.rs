//! Persistence seam for comments. The pipeline only talks to [`CommentStore`].

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::{SqliteSession, SqliteStore};

use crate::error::StoreError;
use crate::record::Comment;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Document-store operations consumed by the ingestion pipeline.
///
/// `comment_id` is not unique in the store. Lookups and replacements by key act
/// on the earliest stored comment carrying that id.
pub trait CommentStore {
    /// First stored comment whose `comment_id` equals `comment_id`.
    fn find_by_key(&self, comment_id: &str) -> StoreResult<Option<Comment>>;

    /// Highest-scoring comment under `parent_id` with `score > min_score`.
    /// Equal scores resolve to the one stored first.
    fn find_best_above(&self, parent_id: &str, min_score: i64) -> StoreResult<Option<Comment>>;

    /// Overwrite the first comment keyed by `comment_id` with `comment`.
    /// Returns false if no comment carried that key.
    fn replace(&mut self, comment_id: &str, comment: &Comment) -> StoreResult<bool>;

    fn insert(&mut self, comment: &Comment) -> StoreResult<()>;

    /// Drop every stored comment.
    fn clear_all(&mut self) -> StoreResult<()>;

    /// Number of stored comments.
    fn count(&self) -> StoreResult<u64>;

    /// All comments under `parent_id`, best score first.
    fn find_by_parent(&self, parent_id: &str) -> StoreResult<Vec<Comment>>;
}
