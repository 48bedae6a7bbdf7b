//! SQLite-backed comment table. A run goes through a [`SqliteSession`] so that
//! the whole ingestion commits or rolls back as one unit.

use super::{CommentStore, StoreResult};
use crate::error::StoreError;
use crate::record::Comment;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use std::path::{Path, PathBuf};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS comments (
        comment_id       TEXT NOT NULL,
        parent_id        TEXT NOT NULL,
        created_utc      NUMERIC NOT NULL,
        score            INTEGER NOT NULL,
        subreddit        TEXT NOT NULL,
        controversiality INTEGER NOT NULL,
        body             TEXT NOT NULL,
        parent_body      TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_comments_comment_id ON comments(comment_id);
    CREATE INDEX IF NOT EXISTS idx_comments_parent_score ON comments(parent_id, score DESC);
";

const COLUMNS: &str =
    "comment_id, parent_id, created_utc, score, subreddit, controversiality, body, parent_body";

pub struct SqliteStore {
    path: PathBuf,
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let unavailable = |source| StoreError::Unavailable { path: path.clone(), source };
        let conn = Connection::open(&path).map_err(unavailable)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;").map_err(unavailable)?;
        conn.execute_batch(SCHEMA).map_err(unavailable)?;
        tracing::debug!(path = %path.display(), "opened comment store");
        Ok(Self { path, conn })
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        let path = PathBuf::from(":memory:");
        let unavailable = |source| StoreError::Unavailable { path: path.clone(), source };
        let conn = Connection::open_in_memory().map_err(unavailable)?;
        conn.execute_batch(SCHEMA).map_err(unavailable)?;
        Ok(Self { path, conn })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Start the run-wide transaction. Dropping the session without
    /// [`SqliteSession::commit`] rolls everything back.
    pub fn session(&mut self) -> StoreResult<SqliteSession<'_>> {
        Ok(SqliteSession { tx: self.conn.transaction()? })
    }
}

pub struct SqliteSession<'a> {
    tx: Transaction<'a>,
}

impl SqliteSession<'_> {
    pub fn commit(self) -> StoreResult<()> {
        self.tx.commit()?;
        Ok(())
    }

    pub fn rollback(self) -> StoreResult<()> {
        self.tx.rollback()?;
        Ok(())
    }
}

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        comment_id: row.get(0)?,
        parent_id: row.get(1)?,
        created_utc: row.get(2)?,
        score: row.get(3)?,
        subreddit: row.get(4)?,
        controversiality: row.get(5)?,
        body: row.get(6)?,
        parent_body: row.get(7)?,
    })
}

fn find_by_key(conn: &Connection, comment_id: &str) -> StoreResult<Option<Comment>> {
    let sql = format!("SELECT {COLUMNS} FROM comments WHERE comment_id = ?1 ORDER BY rowid LIMIT 1");
    let mut stmt = conn.prepare_cached(&sql)?;
    Ok(stmt.query_row(params![comment_id], comment_from_row).optional()?)
}

fn find_best_above(conn: &Connection, parent_id: &str, min_score: i64) -> StoreResult<Option<Comment>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM comments WHERE parent_id = ?1 AND score > ?2 \
         ORDER BY score DESC, rowid ASC LIMIT 1"
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    Ok(stmt.query_row(params![parent_id, min_score], comment_from_row).optional()?)
}

fn replace(conn: &Connection, comment_id: &str, c: &Comment) -> StoreResult<bool> {
    let mut stmt = conn.prepare_cached(
        "UPDATE comments SET comment_id = ?2, parent_id = ?3, created_utc = ?4, score = ?5, \
         subreddit = ?6, controversiality = ?7, body = ?8, parent_body = ?9 \
         WHERE rowid = (SELECT rowid FROM comments WHERE comment_id = ?1 ORDER BY rowid LIMIT 1)",
    )?;
    let changed = stmt.execute(params![
        comment_id,
        c.comment_id,
        c.parent_id,
        c.created_utc,
        c.score,
        c.subreddit,
        c.controversiality,
        c.body,
        c.parent_body,
    ])?;
    Ok(changed > 0)
}

fn insert(conn: &Connection, c: &Comment) -> StoreResult<()> {
    let sql = format!("INSERT INTO comments ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)");
    let mut stmt = conn.prepare_cached(&sql)?;
    stmt.execute(params![
        c.comment_id,
        c.parent_id,
        c.created_utc,
        c.score,
        c.subreddit,
        c.controversiality,
        c.body,
        c.parent_body,
    ])?;
    Ok(())
}

fn count(conn: &Connection) -> StoreResult<u64> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM comments", [], |r| r.get(0))?;
    Ok(n.max(0) as u64)
}

fn find_by_parent(conn: &Connection, parent_id: &str) -> StoreResult<Vec<Comment>> {
    let sql = format!("SELECT {COLUMNS} FROM comments WHERE parent_id = ?1 ORDER BY score DESC, rowid ASC");
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map(params![parent_id], comment_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

macro_rules! impl_comment_store {
    ($ty:ty, $conn:ident => $expr:expr) => {
        impl CommentStore for $ty {
            fn find_by_key(&self, comment_id: &str) -> StoreResult<Option<Comment>> {
                let $conn = self;
                find_by_key($expr, comment_id)
            }
            fn find_best_above(&self, parent_id: &str, min_score: i64) -> StoreResult<Option<Comment>> {
                let $conn = self;
                find_best_above($expr, parent_id, min_score)
            }
            fn replace(&mut self, comment_id: &str, comment: &Comment) -> StoreResult<bool> {
                let $conn = &*self;
                replace($expr, comment_id, comment)
            }
            fn insert(&mut self, comment: &Comment) -> StoreResult<()> {
                let $conn = &*self;
                insert($expr, comment)
            }
            fn clear_all(&mut self) -> StoreResult<()> {
                let $conn = &*self;
                $expr.execute("DELETE FROM comments", [])?;
                Ok(())
            }
            fn count(&self) -> StoreResult<u64> {
                let $conn = self;
                count($expr)
            }
            fn find_by_parent(&self, parent_id: &str) -> StoreResult<Vec<Comment>> {
                let $conn = self;
                find_by_parent($expr, parent_id)
            }
        }
    };
}

// Autocommit access, e.g. for inspecting a store after a run.
impl_comment_store!(SqliteStore, s => &s.conn);
impl_comment_store!(SqliteSession<'_>, s => &*s.tx);
