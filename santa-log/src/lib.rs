#![forbid(unsafe_code)]

//! Reader side of the Santa osquery tables.
//!
//! The decision log is scraped into a bounded window of the most recent
//! entries: rotated archives (`santa.log.N.gz`) are visited oldest first,
//! then the live `santa.log`, all feeding one [`RingBuffer`].
//!
//! ```no_run
//! use santa_log::{scrape_log, CancellationToken, Decision};
//!
//! let token = CancellationToken::new();
//! let denied = scrape_log(&token, Decision::Denied, "/var/db/santa/santa.log")?;
//! for entry in denied {
//!     println!("{} {}", entry.timestamp, entry.application);
//! }
//! # Ok::<(), santa_log::ScrapeError>(())
//! ```

mod cancel;
mod decision;
mod entry;
mod error;
mod extract;
mod paths;
mod ring_buffer;
pub mod rules;
mod scrape;
mod segments;

pub use crate::cancel::{CancelReason, CancellationToken};
pub use crate::decision::Decision;
pub use crate::entry::LogEntry;
pub use crate::error::ScrapeError;
pub use crate::extract::{extract_values, LOG_ENTRY_PREFACE};
pub use crate::paths::SantaPaths;
pub use crate::ring_buffer::RingBuffer;
pub use crate::scrape::scrape_stream;
pub use crate::segments::{
    archive_path, highest_archive_index, scrape_log, scrape_log_with, ScrapeOptions,
    DEFAULT_MAX_ENTRIES, DEFAULT_MAX_LINE_BYTES,
};
