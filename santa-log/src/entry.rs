use std::collections::HashMap;

/// One allow or deny record taken from the decision log.
///
/// `timestamp` is the bracketed text from the line, passed through verbatim.
/// The other fields are empty when the line did not carry them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: String,
    pub application: String,
    pub reason: String,
    pub sha256: String,
}

impl LogEntry {
    /// Build an entry from the map produced by [`crate::extract_values`].
    ///
    /// Returns `None` when the line had no timestamp.
    pub fn from_values(mut values: HashMap<String, String>) -> Option<Self> {
        let timestamp = values.remove("timestamp")?;
        let mut take = |key: &str| values.remove(key).unwrap_or_default();

        Some(LogEntry {
            timestamp,
            application: take("path"),
            reason: take("reason"),
            sha256: take("sha256"),
        })
    }
}
