use crate::cancel::CancellationToken;
use crate::decision::Decision;
use crate::entry::LogEntry;
use crate::error::ScrapeError;
use crate::ring_buffer::RingBuffer;
use crate::scrape::scrape_stream;
use flate2::read::MultiGzDecoder;
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Upper bound on entries returned from one scrape.
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Longest line accepted from any segment.
pub const DEFAULT_MAX_LINE_BYTES: usize = 64 * 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrapeOptions {
    pub max_entries: usize,
    pub max_line_bytes: usize,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        ScrapeOptions {
            max_entries: DEFAULT_MAX_ENTRIES,
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
        }
    }
}

/// `{base}.{index}.gz`, the name newsyslog gives rotated archives.
pub fn archive_path(base: &Path, index: usize) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(format!(".{index}.gz"));
    PathBuf::from(name)
}

/// Highest `N` such that archives `0..=N` all exist.
///
/// Probing stops at the first missing index, so anything past a gap is
/// never visited.
pub fn highest_archive_index(base: &Path) -> Option<usize> {
    let mut highest = None;
    for index in 0.. {
        if !archive_path(base, index).exists() {
            break;
        }
        highest = Some(index);
    }
    highest
}

fn scrape_archive(
    token: &CancellationToken,
    path: &Path,
    decision: Decision,
    ring_buffer: &mut RingBuffer<LogEntry>,
    options: &ScrapeOptions,
) -> Result<(), ScrapeError> {
    let file = File::open(path).map_err(|source| ScrapeError::OpenArchive {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = BufReader::new(MultiGzDecoder::new(BufReader::new(file)));

    // Surface a bad gzip header as a decompression error before any line is read.
    reader.fill_buf().map_err(|source| ScrapeError::Decompress {
        path: path.to_path_buf(),
        source,
    })?;

    scrape_stream(
        token,
        reader,
        decision,
        ring_buffer,
        path,
        options.max_line_bytes,
    )
    .map_err(|err| match err {
        ScrapeError::Read { path, source } => ScrapeError::Decompress { path, source },
        other => other,
    })
}

fn scrape_current_log(
    token: &CancellationToken,
    path: &Path,
    decision: Decision,
    ring_buffer: &mut RingBuffer<LogEntry>,
    options: &ScrapeOptions,
) -> Result<(), ScrapeError> {
    let file = File::open(path).map_err(|source| ScrapeError::OpenLog {
        path: path.to_path_buf(),
        source,
    })?;

    scrape_stream(
        token,
        BufReader::new(file),
        decision,
        ring_buffer,
        path,
        options.max_line_bytes,
    )
}

/// [`scrape_log_with`] using [`ScrapeOptions::default`].
pub fn scrape_log(
    token: &CancellationToken,
    decision: Decision,
    base: impl AsRef<Path>,
) -> Result<Vec<LogEntry>, ScrapeError> {
    scrape_log_with(token, decision, base, &ScrapeOptions::default())
}

/// Scrape the rotated archives of `base` and then `base` itself, returning
/// the newest `options.max_entries` entries for `decision`, oldest first.
///
/// Archives are read from the highest index down to `0` so the shared ring
/// buffer sees lines in the order santad wrote them. Any archive that cannot
/// be opened or decompressed fails the whole scrape, as does a missing live
/// log. A cancelled token discards everything gathered so far.
pub fn scrape_log_with(
    token: &CancellationToken,
    decision: Decision,
    base: impl AsRef<Path>,
    options: &ScrapeOptions,
) -> Result<Vec<LogEntry>, ScrapeError> {
    let base = base.as_ref();
    let mut ring_buffer = RingBuffer::new(options.max_entries);

    let highest = highest_archive_index(base);
    debug!(
        "scraping {} for {decision} decisions, archives: {}",
        base.display(),
        highest.map_or(0, |idx| idx + 1)
    );

    if let Some(highest) = highest {
        for index in (0..=highest).rev() {
            let path = archive_path(base, index);
            scrape_archive(token, &path, decision, &mut ring_buffer, options)?;
            debug!(
                "scraped {}, window holds {} entries",
                path.display(),
                ring_buffer.len()
            );
        }
    }

    scrape_current_log(token, base, decision, &mut ring_buffer, options)?;

    Ok(ring_buffer.chronological())
}
