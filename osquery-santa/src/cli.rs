use clap::Parser;
use santa_log::{SantaPaths, DEFAULT_MAX_ENTRIES, DEFAULT_MAX_LINE_BYTES};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    name = "osquery-santa",
    long_about = "Exposes Santa allow/deny decisions and rules as osquery tables"
)]
#[command(arg_required_else_help = true)]
pub struct Args {
    /// Path to the osquery socket.
    #[arg(long, value_name = "PATH_TO_SOCKET")]
    pub socket: String,

    /// Delay in seconds between connectivity checks.
    #[arg(long, default_value_t = 3)]
    pub interval: u32,

    /// Time in seconds to wait for autoloaded extensions until connection times out.
    #[arg(long, default_value_t = 3)]
    pub timeout: u32,

    /// Enable verbose informational messages.
    #[arg(long)]
    pub verbose: bool,

    /// Santa decision log; rotated archives are looked up next to it.
    #[arg(long, value_name = "PATH", default_value_os_t = SantaPaths::default().log_path)]
    pub log_path: PathBuf,

    /// Santa rules database.
    #[arg(long, value_name = "PATH", default_value_os_t = SantaPaths::default().database_path)]
    pub rules_db: PathBuf,

    /// Most recent decisions kept per query.
    #[arg(long, default_value_t = DEFAULT_MAX_ENTRIES)]
    pub max_entries: usize,

    /// Longest log line accepted before a query fails.
    #[arg(long, default_value_t = DEFAULT_MAX_LINE_BYTES)]
    pub max_line_bytes: usize,

    /// Seconds a single decision query may run; 0 disables the deadline.
    #[arg(long, default_value_t = 0)]
    pub query_timeout: u64,
}

impl Args {
    pub fn paths(&self) -> SantaPaths {
        SantaPaths {
            log_path: self.log_path.clone(),
            database_path: self.rules_db.clone(),
        }
    }

    pub fn query_timeout(&self) -> Option<Duration> {
        (self.query_timeout > 0).then(|| Duration::from_secs(self.query_timeout))
    }
}
