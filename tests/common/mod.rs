#![allow(dead_code)]

use redata::{Ingestor, IngestReport, MemoryStore, NoopObserver, PairLimit, ReplacePolicy};
use serde_json::json;
use std::fs::{self, File};
use std::io::{Cursor, Write};
use std::path::Path;
use tempfile::TempDir;

/// One comment line in the shape of the monthly RC dumps (with the extra
/// fields real dumps carry, which the pipeline must ignore).
pub fn comment_line(id: &str, parent_id: &str, score: i64, body: &str) -> String {
    json!({
        "author": "alice", "body": body, "controversiality": 0, "created_utc": 1136074600,
        "distinguished": null, "edited": false, "gilded": 0, "id": id, "link_id": "t3_s1",
        "parent_id": parent_id, "retrieved_on": 1136075600, "score": score, "stickied": false,
        "subreddit": "programming", "subreddit_id": "t5_x", "ups": score
    })
    .to_string()
}

/// Plain JSONL file.
pub fn write_jsonl(path: &Path, lines: &[String]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut f = File::create(path).unwrap();
    for l in lines {
        writeln!(&mut f, "{}", l).unwrap();
    }
}

/// Compressed `.zst` file containing the provided JSONL lines.
pub fn write_zst_lines(path: &Path, lines: &[String]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let f = File::create(path).unwrap();
    let mut enc = zstd::stream::write::Encoder::new(f, 3).unwrap();
    for l in lines {
        writeln!(&mut enc, "{}", l).unwrap();
    }
    enc.finish().unwrap();
}

/// Removed when dropped; keep it alive for the whole test.
pub fn scratch_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

pub fn ingestor(policy: ReplacePolicy, limit: PairLimit) -> Ingestor {
    Ingestor::new().policy(policy).limit(limit).progress(false)
}

/// Run `lines` through a fresh in-memory store.
pub fn ingest_lines(lines: &[String], policy: ReplacePolicy, limit: PairLimit) -> (IngestReport, MemoryStore) {
    let mut store = MemoryStore::new();
    let report = ingest_into(&mut store, lines, policy, limit);
    (report, store)
}

/// Run `lines` into an existing store without clearing it first.
pub fn ingest_into(store: &mut MemoryStore, lines: &[String], policy: ReplacePolicy, limit: PairLimit) -> IngestReport {
    let input = lines.join("\n");
    ingestor(policy, limit)
        .reset_store(false)
        .run_reader(Cursor::new(input), store, &mut NoopObserver)
        .unwrap()
}
