use crate::cancel::CancelReason;
use std::io;
use std::path::PathBuf;

/// Failure of a decision-log scrape.
///
/// Cancellation is reported separately from I/O problems: callers treat the
/// former as their own deadline or shutdown firing, not as bad data.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("scrape cancelled: {0}")]
    Cancelled(CancelReason),

    #[error("failed to open Santa log file {path}: {source}")]
    OpenLog {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to open compressed log file {path}: {source}")]
    OpenArchive {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decompress {path}: {source}")]
    Decompress {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("line in {path} exceeds {limit} bytes")]
    LineTooLong { path: PathBuf, limit: usize },
}

impl ScrapeError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ScrapeError::Cancelled(_))
    }

    /// True when the live log simply does not exist, which tables report as
    /// an empty result rather than a failure.
    pub fn is_log_missing(&self) -> bool {
        matches!(
            self,
            ScrapeError::OpenLog { source, .. } if source.kind() == io::ErrorKind::NotFound
        )
    }
}
