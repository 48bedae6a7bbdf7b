//! Ingestion driver: streams records one at a time through
//! validate -> build -> resolve -> store, and stops early once the
//! linked-pair cap is reached.
//!
//! Processing is strictly sequential. Each record's replace-or-insert decision
//! reads the store state left by every record before it.

use crate::builder::build_from_store;
use crate::config::{IngestOptions, PairLimit};
use crate::error::{IngestError, Result};
use crate::paths::{plan_inputs, total_size};
use crate::progress::ProgressObserver;
use crate::reader::LineReader;
use crate::record::RawRecord;
use crate::resolver::{resolve, ReplacePolicy, Resolution};
use crate::store::{CommentStore, SqliteStore};
use crate::util::init_tracing_once;
use crate::validate::{check, Rejection};
use std::fmt;
use std::io::BufRead;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    Streaming,
    /// The linked-pair cap was hit; remaining input was not read.
    Capped,
    /// Input exhausted.
    Done,
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DriverState::Streaming => "streaming",
            DriverState::Capped => "capped",
            DriverState::Done => "done",
        })
    }
}

/// Running counters for one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Parsed records, valid or not.
    pub total_processed: u64,
    /// Records written to the store, by insert or by replacement.
    pub inserted: u64,
    /// Subset of `inserted` that overwrote a lower-scoring sibling.
    pub replaced: u64,
    /// Valid records dropped because a sibling at least as good was stored.
    pub discarded: u64,
    pub rejected: u64,
    /// Stored records whose parent was already in the store.
    pub linked_pairs: u64,
}

/// What happened to one parsed record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordOutcome {
    Rejected(Rejection),
    Inserted { comment_id: String, linked: bool },
    Replaced { comment_id: String, target_id: String, linked: bool },
    Discarded { comment_id: String, kept_id: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IngestReport {
    pub state: DriverState,
    pub stats: IngestStats,
}

/// Hook for progress and reporting. All methods default to no-ops.
pub trait IngestObserver {
    /// Called once before the first record. `total_bytes` is the on-disk input size (0 if unknown).
    fn on_start(&mut self, _total_bytes: u64) {}
    fn on_bytes(&mut self, _delta: u64) {}
    fn on_record(&mut self, _stats: &IngestStats, _outcome: &RecordOutcome) {}
    fn on_finish(&mut self, _report: &IngestReport) {}
}

/// Observer for headless runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl IngestObserver for NoopObserver {}

#[derive(Clone, Debug, Default)]
pub struct Ingestor {
    pub(crate) opts: IngestOptions,
}

impl Ingestor {
    pub fn new() -> Self {
        Self { opts: IngestOptions::default() }
    }

    pub fn with_options(opts: IngestOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &IngestOptions {
        &self.opts
    }

    // -------- Builder methods --------
    pub fn limit(mut self, limit: PairLimit) -> Self { self.opts = self.opts.with_limit(limit); self }
    /// Negative means unbounded.
    pub fn max_pairs(mut self, n: i64) -> Self { self.opts = self.opts.with_limit(PairLimit::from_signed(n)); self }
    pub fn policy(mut self, policy: ReplacePolicy) -> Self { self.opts = self.opts.with_policy(policy); self }
    pub fn reset_store(mut self, yes: bool) -> Self { self.opts = self.opts.with_reset_store(yes); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn progress_label(mut self, label: impl Into<String>) -> Self { self.opts = self.opts.with_progress_label(label); self }
    pub fn io_read_buffer(mut self, bytes: usize) -> Self { self.opts = self.opts.with_io_read_buffer(bytes); self }

    // -------- Operations --------

    /// Ingest a dump file or a directory of monthly dumps into `store`,
    /// with a progress bar when enabled.
    pub fn run<S>(&self, input: &Path, store: &mut S) -> Result<IngestReport>
    where
        S: CommentStore + ?Sized,
    {
        if self.opts.progress {
            let mut obs = ProgressObserver::new(self.opts.progress_label.as_deref());
            self.run_with_observer(input, store, &mut obs)
        } else {
            self.run_with_observer(input, store, &mut NoopObserver)
        }
    }

    pub fn run_with_observer<S, O>(&self, input: &Path, store: &mut S, observer: &mut O) -> Result<IngestReport>
    where
        S: CommentStore + ?Sized,
        O: IngestObserver + ?Sized,
    {
        init_tracing_once();
        let files = plan_inputs(input)?;
        let mut driver = Driver::start(&self.opts, store, observer, total_size(&files))?;
        let mut buf = String::with_capacity(64 * 1024);

        for file in &files {
            if driver.state != DriverState::Streaming { break; }
            tracing::info!(path = %file.path.display(), month = ?file.ym, "ingesting");
            let mut rdr = LineReader::open(file, self.opts.read_buffer_bytes)
                .map_err(|source| IngestError::Io { path: file.path.clone(), source })?;
            driver.consume(&mut rdr, &file.path.display().to_string(), &mut buf)?;
        }
        Ok(driver.finish())
    }

    /// Ingest from an already-open line source (e.g. stdin or an in-memory buffer).
    pub fn run_reader<R, S, O>(&self, reader: R, store: &mut S, observer: &mut O) -> Result<IngestReport>
    where
        R: BufRead + 'static,
        S: CommentStore + ?Sized,
        O: IngestObserver + ?Sized,
    {
        init_tracing_once();
        let mut driver = Driver::start(&self.opts, store, observer, 0)?;
        let mut rdr = LineReader::from_bufread(reader);
        let mut buf = String::with_capacity(64 * 1024);
        driver.consume(&mut rdr, "<stream>", &mut buf)?;
        Ok(driver.finish())
    }

    /// [`Ingestor::run`] inside one SQLite transaction: everything commits on
    /// success, and any error rolls the whole run back (including the reset).
    pub fn run_sqlite(&self, input: &Path, store: &mut SqliteStore) -> Result<IngestReport> {
        let mut session = store.session()?;
        let report = self.run(input, &mut session)?;
        session.commit()?;
        tracing::info!(stored = report.stats.inserted, "committed");
        Ok(report)
    }
}

struct Driver<'a, S: ?Sized, O: ?Sized> {
    store: &'a mut S,
    observer: &'a mut O,
    limit: PairLimit,
    policy: ReplacePolicy,
    stats: IngestStats,
    state: DriverState,
}

impl<'a, S, O> Driver<'a, S, O>
where
    S: CommentStore + ?Sized,
    O: IngestObserver + ?Sized,
{
    fn start(opts: &IngestOptions, store: &'a mut S, observer: &'a mut O, total_bytes: u64) -> Result<Self> {
        if opts.reset_store {
            store.clear_all()?;
            tracing::debug!("cleared comment store");
        }
        tracing::info!(limit = ?opts.limit, policy = %opts.policy, "starting ingestion");
        observer.on_start(total_bytes);
        Ok(Self {
            store,
            observer,
            limit: opts.limit,
            policy: opts.policy,
            stats: IngestStats::default(),
            state: DriverState::Streaming,
        })
    }

    fn consume(&mut self, rdr: &mut LineReader, origin: &str, buf: &mut String) -> Result<()> {
        let mut line_no = 0u64;
        while self.state == DriverState::Streaming {
            let n = rdr
                .read_line(buf)
                .map_err(|source| IngestError::Io { path: PathBuf::from(origin), source })?;
            if n == 0 { break; }
            line_no += 1;
            self.observer.on_bytes(rdr.take_progress());

            let raw: RawRecord = serde_json::from_str(buf).map_err(|source| IngestError::MalformedInput {
                origin: origin.to_string(),
                line_no,
                source,
            })?;
            self.process(&raw)?;
        }
        self.observer.on_bytes(rdr.take_progress());
        Ok(())
    }

    fn process(&mut self, raw: &RawRecord) -> Result<()> {
        self.stats.total_processed += 1;

        if let Err(reason) = check(raw) {
            self.stats.rejected += 1;
            tracing::trace!(id = %raw.id, %reason, "rejected");
            self.observer.on_record(&self.stats, &RecordOutcome::Rejected(reason));
            return Ok(());
        }

        let comment = build_from_store(raw, &*self.store)?;
        let linked = comment.is_linked();

        let outcome = match resolve(&*self.store, &comment, self.policy)? {
            Resolution::Insert => {
                self.store.insert(&comment)?;
                RecordOutcome::Inserted { comment_id: comment.comment_id, linked }
            }
            Resolution::Replace { target_id } => {
                if self.store.replace(&target_id, &comment)? {
                    self.stats.replaced += 1;
                    RecordOutcome::Replaced { comment_id: comment.comment_id, target_id, linked }
                } else {
                    tracing::warn!(target = %target_id, id = %comment.comment_id, "replace target vanished; inserting instead");
                    self.store.insert(&comment)?;
                    RecordOutcome::Inserted { comment_id: comment.comment_id, linked }
                }
            }
            Resolution::Discard { kept_id, kept_score } => {
                self.stats.discarded += 1;
                tracing::debug!(id = %comment.comment_id, score = comment.score, kept = %kept_id, kept_score, "discarded");
                let outcome = RecordOutcome::Discarded { comment_id: comment.comment_id, kept_id };
                self.observer.on_record(&self.stats, &outcome);
                return Ok(());
            }
        };

        self.stats.inserted += 1;
        if linked {
            self.stats.linked_pairs += 1;
        }
        self.observer.on_record(&self.stats, &outcome);

        if self.limit.is_reached(self.stats.linked_pairs) {
            self.state = DriverState::Capped;
            tracing::info!(linked_pairs = self.stats.linked_pairs, "pair limit reached; stopping early");
        }
        Ok(())
    }

    fn finish(mut self) -> IngestReport {
        if self.state == DriverState::Streaming {
            self.state = DriverState::Done;
        }
        let report = IngestReport { state: self.state, stats: self.stats };
        self.observer.on_finish(&report);
        tracing::info!(
            state = %report.state,
            processed = report.stats.total_processed,
            inserted = report.stats.inserted,
            replaced = report.stats.replaced,
            discarded = report.stats.discarded,
            pairs = report.stats.linked_pairs,
            "ingestion finished"
        );
        report
    }
}
