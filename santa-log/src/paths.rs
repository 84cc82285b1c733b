use std::path::PathBuf;

/// Where santad keeps the files the tables read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SantaPaths {
    pub log_path: PathBuf,
    pub database_path: PathBuf,
}

impl Default for SantaPaths {
    fn default() -> Self {
        SantaPaths {
            log_path: PathBuf::from("/var/db/santa/santa.log"),
            database_path: PathBuf::from("/var/db/santa/rules.db"),
        }
    }
}
