//! Progress reporting: a byte-based indicatif bar driven through the
//! ingestion observer hook.

use crate::ingest::{IngestObserver, IngestReport, IngestStats, RecordOutcome};
use indicatif::{ProgressBar, ProgressStyle};

/// Refresh the counters shown next to the bar every this many records.
const MESSAGE_EVERY: u64 = 4096;

pub fn make_progress_bar_labeled(total_bytes: u64, label: Option<&str>) -> ProgressBar {
    let pb = ProgressBar::new(total_bytes);
    let style = ProgressStyle::with_template(
        "{spinner:.green} {msg} {bytes:>10}/{total_bytes:<10} [{bar:.cyan/blue}] {percent:>3}%  \
         {bytes_per_sec}  elapsed: {elapsed_precise}  eta: {eta_precise}"
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("█▉▊▋▌▍▎▏  ");
    pb.set_style(style);
    if let Some(msg) = label {
        pb.set_message(msg.to_string());
    }
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Observer that renders a progress bar over the input's on-disk bytes.
pub struct ProgressObserver {
    pb: Option<ProgressBar>,
    label: String,
}

impl ProgressObserver {
    pub fn new(label: Option<&str>) -> Self {
        Self { pb: None, label: label.unwrap_or("Retrieving comments").to_string() }
    }
}

impl IngestObserver for ProgressObserver {
    fn on_start(&mut self, total_bytes: u64) {
        self.pb = Some(make_progress_bar_labeled(total_bytes, Some(&self.label)));
    }

    fn on_bytes(&mut self, delta: u64) {
        if let Some(pb) = &self.pb { pb.inc(delta); }
    }

    fn on_record(&mut self, stats: &IngestStats, _outcome: &RecordOutcome) {
        if stats.total_processed % MESSAGE_EVERY != 0 { return; }
        if let Some(pb) = &self.pb {
            pb.set_message(format!(
                "{} (stored {}, pairs {})",
                self.label, stats.inserted, stats.linked_pairs
            ));
        }
    }

    fn on_finish(&mut self, report: &IngestReport) {
        if let Some(pb) = self.pb.take() {
            pb.finish_with_message(format!("{} {}", self.label, report.state));
        }
    }
}
