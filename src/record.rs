//! Input and stored record shapes.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

/// Line-level schema of a comment in the dump. Extra fields are ignored by serde;
/// a missing or mistyped field makes the line malformed.
#[derive(Clone, Debug, Deserialize)]
pub struct RawRecord {
    pub id: String,
    pub parent_id: String, // composite, e.g. "t1_abc123"
    pub body: String,
    pub score: i64,
    pub subreddit: String,
    pub controversiality: i64,
    pub created_utc: Timestamp,
}

/// Epoch seconds as they appear in the dump: older months carry integers,
/// some later ones floats. Kept verbatim.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Int(i64),
    Float(f64),
}

/// Canonical stored comment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub comment_id: String,
    pub parent_id: String, // bare id
    pub created_utc: Timestamp,
    pub score: i64,
    pub subreddit: String,
    pub controversiality: i64,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_body: Option<String>,
}

impl Comment {
    /// True when the parent was already stored at build time.
    #[inline]
    pub fn is_linked(&self) -> bool {
        self.parent_body.is_some()
    }
}

impl ToSql for Timestamp {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match *self {
            Timestamp::Int(n) => ToSqlOutput::from(n),
            Timestamp::Float(f) => ToSqlOutput::from(f),
        })
    }
}

impl FromSql for Timestamp {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Integer(n) => Ok(Timestamp::Int(n)),
            ValueRef::Real(f) => Ok(Timestamp::Float(f)),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}
