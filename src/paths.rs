//! Input planning: a single dump file, or a directory of monthly comment dumps
//! (`RC_YYYY-MM.zst`, `RC_YYYY-MM.jsonl`, ...) streamed in chronological order.

use crate::date::YearMonth;
use crate::error::{IngestError, Result};
use regex::Regex;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use walkdir::WalkDir;

/// How a file's bytes are framed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compression {
    None,
    Zstd, // *.zst / *.zstd
}

impl Compression {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("zst") || ext.eq_ignore_ascii_case("zstd") => Compression::Zstd,
            _ => Compression::None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct InputFile {
    pub path: PathBuf,
    pub ym: Option<YearMonth>,
    pub compression: Compression,
}

fn monthly_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^RC_(\d{4}-\d{2})(\.zst|\.zstd|\.jsonl|\.json|\.ndjson)?$").expect("static regex")
    })
}

/// Parse the month out of a dump name such as `RC_2015-01.zst`.
pub fn month_of(name: &str) -> Option<YearMonth> {
    let caps = monthly_name_re().captures(name)?;
    caps[1].parse().ok()
}

/// Resolve `input` into the ordered list of files to stream.
/// A directory yields its monthly dumps (non-recursive), oldest first.
pub fn plan_inputs(input: &Path) -> Result<Vec<InputFile>> {
    let meta = std::fs::metadata(input).map_err(|source| IngestError::Io { path: input.to_path_buf(), source })?;
    if !meta.is_dir() {
        let ym = input.file_name().and_then(|n| n.to_str()).and_then(month_of);
        return Ok(vec![InputFile {
            path: input.to_path_buf(),
            ym,
            compression: Compression::from_path(input),
        }]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(input).min_depth(1).max_depth(1) {
        let ent = entry.map_err(|e| IngestError::Io {
            path: input.to_path_buf(),
            source: e.into_io_error().unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "directory walk failed")),
        })?;
        if !ent.file_type().is_file() { continue; }
        let Some(ym) = ent.file_name().to_str().and_then(month_of) else { continue };
        let path = ent.path().to_path_buf();
        files.push(InputFile { compression: Compression::from_path(&path), path, ym: Some(ym) });
    }
    // Same month in two encodings: keep both, ordered by name for determinism.
    files.sort_by(|a, b| a.ym.cmp(&b.ym).then_with(|| a.path.cmp(&b.path)));

    if files.is_empty() {
        tracing::warn!(dir = %input.display(), "No RC_YYYY-MM dumps found in input directory.");
    } else {
        tracing::info!("Planned {} files for processing.", files.len());
    }
    Ok(files)
}

pub fn total_size(files: &[InputFile]) -> u64 {
    files
        .iter()
        .map(|f| std::fs::metadata(&f.path).map(|m| m.len()).unwrap_or(0))
        .sum()
}
