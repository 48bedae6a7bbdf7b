mod config;
mod date;
mod paths;
mod reader;
mod util;

mod error;
mod normalize;
mod record;
mod validate;
mod builder;
mod resolver;
mod ingest;
mod progress;

pub mod store;

pub use crate::config::{IngestOptions, PairLimit};
pub use crate::date::YearMonth;
pub use crate::error::{IngestError, Result, StoreError};
pub use crate::ingest::{DriverState, IngestObserver, IngestReport, IngestStats, Ingestor, NoopObserver, RecordOutcome};
pub use crate::record::{Comment, RawRecord, Timestamp};
pub use crate::store::{CommentStore, MemoryStore, SqliteSession, SqliteStore};

// Pipeline stages, usable on their own.
pub use crate::normalize::{normalize_body, normalize_optional_body, normalize_parent_id, NEWLINE_SENTINEL};
pub use crate::validate::{check, is_valid, Rejection, MAX_BODY_TOKENS, MIN_SCORE};
pub use crate::builder::{build, build_from_store};
pub use crate::resolver::{best_sibling, find_better_sibling, find_worse_sibling, resolve, ReplacePolicy, Resolution};

// Input discovery and progress helpers for binaries.
pub use crate::paths::{month_of, plan_inputs, Compression, InputFile};
pub use crate::progress::{make_progress_bar_labeled, ProgressObserver};
pub use crate::util::init_tracing_once;
