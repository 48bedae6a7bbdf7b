//! Line reader over plain or zstd-compressed JSONL, counting raw file bytes
//! consumed so progress tracks the on-disk size.

use crate::paths::{Compression, InputFile};
use crate::util::open_with_backoff;
use std::io::{self, BufRead, BufReader, Read};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use zstd::stream::read::Decoder;

/// A `Read` wrapper that counts bytes read from the underlying file.
struct CountingReader<R: Read> {
    inner: R,
    counter: Arc<AtomicU64>,
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.counter.fetch_add(n as u64, Ordering::Relaxed);
        Ok(n)
    }
}

pub struct LineReader {
    rdr: Box<dyn BufRead>,
    counter: Arc<AtomicU64>,
    reported: u64,
}

impl LineReader {
    pub fn open(input: &InputFile, buf_bytes: usize) -> io::Result<Self> {
        let file = open_with_backoff(&input.path, 16, 50)?;
        let counter = Arc::new(AtomicU64::new(0));
        let cnt = CountingReader { inner: file, counter: counter.clone() };
        let cap = buf_bytes.max(8 * 1024);
        let rdr: Box<dyn BufRead> = match input.compression {
            Compression::None => Box::new(BufReader::with_capacity(cap, cnt)),
            Compression::Zstd => {
                let mut decoder = Decoder::new(cnt)?;
                // Reddit dumps are written with long windows; without this the
                // decoder refuses frames with "requires too much memory".
                decoder.window_log_max(31)?;
                Box::new(BufReader::with_capacity(cap, decoder))
            }
        };
        Ok(Self { rdr, counter, reported: 0 })
    }

    /// Wrap an already-open buffered source (no byte accounting).
    pub fn from_bufread(rdr: impl BufRead + 'static) -> Self {
        Self { rdr: Box::new(rdr), counter: Arc::new(AtomicU64::new(0)), reported: 0 }
    }

    /// Read the next line into `buf`. Returns the number of bytes read (0 on EOF).
    /// Strips trailing `\r?\n`.
    pub fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        buf.clear();
        let n = self.rdr.read_line(buf)?;
        if n == 0 { return Ok(0); }
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') { buf.pop(); }
        }
        Ok(n)
    }

    /// File bytes consumed since the previous call.
    pub fn take_progress(&mut self) -> u64 {
        let cur = self.counter.load(Ordering::Relaxed);
        let delta = cur.saturating_sub(self.reported);
        self.reported = cur;
        delta
    }
}
