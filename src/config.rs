use crate::resolver::ReplacePolicy;

/// Cap on linked pairs (stored comments whose parent was already stored).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PairLimit {
    #[default]
    Unbounded,
    /// Stop reading once this many linked pairs have been stored.
    AtMost(u64),
}

impl PairLimit {
    /// CLI convention: any negative value (normally `-1`) means unbounded.
    pub fn from_signed(n: i64) -> Self {
        if n < 0 { PairLimit::Unbounded } else { PairLimit::AtMost(n as u64) }
    }

    #[inline]
    pub fn is_reached(self, linked_pairs: u64) -> bool {
        match self {
            PairLimit::Unbounded => false,
            PairLimit::AtMost(n) => linked_pairs >= n,
        }
    }
}

/// User-facing options with sensible defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct IngestOptions {
    pub limit: PairLimit,
    pub policy: ReplacePolicy,
    pub reset_store: bool,              // clear_all() before the first record
    pub progress: bool,                 // show progress bar
    pub progress_label: Option<String>, // optional label for progress bar
    pub read_buffer_bytes: usize,       // BufReader capacity
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            limit: PairLimit::Unbounded,
            policy: ReplacePolicy::default(),
            reset_store: true,
            progress: true,
            progress_label: None,
            read_buffer_bytes: 256 * 1024,
        }
    }
}

impl IngestOptions {
    pub fn with_limit(mut self, limit: PairLimit) -> Self {
        self.limit = limit;
        self
    }
    pub fn with_policy(mut self, policy: ReplacePolicy) -> Self {
        self.policy = policy;
        self
    }
    pub fn with_reset_store(mut self, yes: bool) -> Self {
        self.reset_store = yes;
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_progress_label(mut self, label: impl Into<String>) -> Self {
        self.progress_label = Some(label.into());
        self
    }
    pub fn with_io_read_buffer(mut self, bytes: usize) -> Self {
        self.read_buffer_bytes = bytes.max(8 * 1024);
        self
    }
}
