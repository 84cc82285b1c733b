use crate::cancel::CancellationToken;
use crate::decision::Decision;
use crate::entry::LogEntry;
use crate::error::ScrapeError;
use crate::extract::extract_values;
use crate::ring_buffer::RingBuffer;
use std::borrow::Cow;
use std::io::{self, BufRead};
use std::path::Path;

enum LineRead {
    Line,
    Eof,
    TooLong,
}

/// Reads one `\n`-terminated line into `buf` without letting it grow past
/// `limit` bytes of content.
fn read_bounded_line<R: BufRead>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    limit: usize,
) -> io::Result<LineRead> {
    buf.clear();
    loop {
        let (done, used) = {
            let available = match reader.fill_buf() {
                Ok(available) => available,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };

            if available.is_empty() {
                return Ok(if buf.is_empty() {
                    LineRead::Eof
                } else {
                    LineRead::Line
                });
            }

            let (done, used) = match available.iter().position(|b| *b == b'\n') {
                Some(i) => (true, i + 1),
                None => (false, available.len()),
            };

            let content = used - usize::from(done);
            if buf.len() + content > limit {
                return Ok(LineRead::TooLong);
            }

            buf.extend_from_slice(available.get(..content).unwrap_or_default());
            (done, used)
        };

        reader.consume(used);
        if done {
            return Ok(LineRead::Line);
        }
    }
}

fn decode_line(buf: &[u8]) -> Cow<'_, str> {
    let buf = buf.strip_suffix(b"\r").unwrap_or(buf);
    String::from_utf8_lossy(buf)
}

/// Feed every line of `reader` matching `decision` into `ring_buffer`.
///
/// The token is polled before each line; a cancelled token stops the scrape
/// with [`ScrapeError::Cancelled`] even if no line was read yet. Lines
/// without a timestamp are dropped. `path` only labels errors.
pub fn scrape_stream<R: BufRead>(
    token: &CancellationToken,
    mut reader: R,
    decision: Decision,
    ring_buffer: &mut RingBuffer<LogEntry>,
    path: &Path,
    max_line_bytes: usize,
) -> Result<(), ScrapeError> {
    let mut buf = Vec::new();

    loop {
        if let Some(reason) = token.cancel_reason() {
            return Err(ScrapeError::Cancelled(reason));
        }

        let read = read_bounded_line(&mut reader, &mut buf, max_line_bytes).map_err(|source| {
            ScrapeError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;

        match read {
            LineRead::Eof => return Ok(()),
            LineRead::TooLong => {
                return Err(ScrapeError::LineTooLong {
                    path: path.to_path_buf(),
                    limit: max_line_bytes,
                })
            }
            LineRead::Line => {}
        }

        let line = decode_line(&buf);
        if !decision.matches(&line) {
            continue;
        }

        if let Some(entry) = LogEntry::from_values(extract_values(&line)) {
            ring_buffer.add(entry);
        }
    }
}
