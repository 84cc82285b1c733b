use strum::Display;

/// Which half of santad's verdicts a scrape is interested in.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum Decision {
    Allowed,
    Denied,
}

impl Decision {
    /// Literal text a log line must contain to be considered for this decision.
    pub fn marker(self) -> &'static str {
        match self {
            Decision::Allowed => "decision=ALLOW",
            Decision::Denied => "decision=DENY",
        }
    }

    /// Name of the osquery table backed by this decision.
    pub fn table_name(self) -> &'static str {
        match self {
            Decision::Allowed => "santa_allowed",
            Decision::Denied => "santa_denied",
        }
    }

    pub(crate) fn matches(self, line: &str) -> bool {
        line.contains(self.marker())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_matches_only_its_own_decision() {
        let allow = "[t] santad: decision=ALLOW|path=/bin/ls";
        let deny = "[t] santad: decision=DENY|path=/bin/ls";

        assert!(Decision::Allowed.matches(allow));
        assert!(!Decision::Allowed.matches(deny));
        assert!(Decision::Denied.matches(deny));
        assert!(!Decision::Denied.matches(allow));
    }

    #[test]
    fn test_table_names() {
        assert_eq!(Decision::Allowed.table_name(), "santa_allowed");
        assert_eq!(Decision::Denied.table_name(), "santa_denied");
    }

    #[test]
    fn test_display() {
        assert_eq!(Decision::Allowed.to_string(), "Allowed");
        assert_eq!(Decision::Denied.to_string(), "Denied");
    }
}
