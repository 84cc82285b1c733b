use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Token santad writes between the log prefix and its `key=value` fields.
pub const LOG_ENTRY_PREFACE: &str = "santad: ";

fn timestamp_regex() -> Option<&'static Regex> {
    static TIMESTAMP: OnceLock<Option<Regex>> = OnceLock::new();
    TIMESTAMP
        .get_or_init(|| Regex::new(r"\[([^\]]+)\]").ok())
        .as_ref()
}

/// Split one decision-log line into lower-cased keys and unquoted values.
///
/// The first bracketed text becomes `timestamp`. Fields are only read after
/// [`LOG_ENTRY_PREFACE`]; anything that does not look like `key=value` is
/// skipped, so this never fails.
pub fn extract_values(line: &str) -> HashMap<String, String> {
    let mut values = HashMap::with_capacity(8);

    if let Some(ts) = timestamp_regex()
        .and_then(|re| re.captures(line))
        .and_then(|cap| cap.get(1))
    {
        values.insert("timestamp".to_string(), ts.as_str().to_string());
    }

    let Some((_, rest)) = line.split_once(LOG_ENTRY_PREFACE) else {
        return values;
    };

    for segment in rest.split('|') {
        let Some((key, value)) = segment.split_once('=') else {
            continue;
        };

        let key = key.trim().to_lowercase();
        let value = unquote(value.trim());
        if key.is_empty() || value.is_empty() {
            continue;
        }

        values.insert(key, value.to_string());
    }

    values
}

/// Strips one layer of matching quotes. A lone quote counts as an empty
/// quoted value.
fn unquote(value: &str) -> &str {
    if value == "\"" || value == "'" {
        return "";
    }
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
