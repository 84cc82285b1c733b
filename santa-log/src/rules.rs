//! Read-only access to santad's `rules.db`.

use log::warn;
use percent_encoding::{percent_encode, AsciiSet, CONTROLS};
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use strum::Display;

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum RuleType {
    Binary,
    Certificate,
    #[strum(serialize = "TeamID")]
    TeamId,
    #[strum(serialize = "SigningID")]
    SigningId,
    #[strum(serialize = "CDHash")]
    CdHash,
    Unknown,
}

impl RuleType {
    /// Maps the integer stored in the `type` column.
    pub fn from_code(code: i64) -> Self {
        match code {
            500 => RuleType::CdHash,
            1000 => RuleType::Binary,
            2000 => RuleType::SigningId,
            3000 => RuleType::Certificate,
            4000 => RuleType::TeamId,
            _ => RuleType::Unknown,
        }
    }
}

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum RuleState {
    Allow,
    Block,
    SilentBlock,
    Remove,
    AllowCompiler,
    AllowTransitive,
    AllowLocalBinary,
    #[strum(serialize = "AllowLocalSigningID")]
    AllowLocalSigningId,
    #[strum(serialize = "CEL")]
    Cel,
    Unknown,
}

impl RuleState {
    /// Maps the integer stored in the `state` column.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => RuleState::Allow,
            2 => RuleState::Block,
            3 => RuleState::SilentBlock,
            4 => RuleState::Remove,
            5 => RuleState::AllowCompiler,
            6 => RuleState::AllowTransitive,
            7 => RuleState::AllowLocalBinary,
            8 => RuleState::AllowLocalSigningId,
            9 => RuleState::Cel,
            _ => RuleState::Unknown,
        }
    }
}

/// One row of the `rules` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleEntry {
    /// SHA-256, team ID, signing ID or CDHash depending on `rule_type`.
    pub identifier: String,
    pub rule_type: RuleType,
    pub state: RuleState,
    pub custom_message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("Santa database not found at {path}")]
    Missing { path: PathBuf },

    #[error("failed to open Santa database {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to query rules: {0}")]
    Query(#[from] rusqlite::Error),
}

// Bytes SQLite's URI parser would read as syntax or decode.
const URI_PATH: &AsciiSet = &CONTROLS.add(b' ').add(b'%').add(b'?').add(b'#');

fn database_uri(path: &Path) -> String {
    let encoded = percent_encode(path.as_os_str().as_encoded_bytes(), URI_PATH);
    format!("file:{encoded}?immutable=1")
}

const RULES_QUERY: &str = "SELECT identifier, state, type, custommsg FROM rules ORDER BY identifier";

/// Read every rule from the database at `path`.
///
/// The file is opened as an immutable URI so santad's write lock is never
/// contended. Rows without an identifier are skipped.
pub fn read_rules(path: &Path) -> Result<Vec<RuleEntry>, RulesError> {
    if !path.is_file() {
        return Err(RulesError::Missing {
            path: path.to_path_buf(),
        });
    }

    let conn = Connection::open_with_flags(
        database_uri(path),
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI,
    )
    .map_err(|source| RulesError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut stmt = conn.prepare(RULES_QUERY)?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, Option<String>>(0)?,
            row.get::<_, Option<i64>>(1)?,
            row.get::<_, Option<i64>>(2)?,
            row.get::<_, Option<String>>(3)?,
        ))
    })?;

    let mut rules = Vec::new();
    for row in rows {
        let (identifier, state, rule_type, custom_message) = match row {
            Ok(row) => row,
            Err(err) => {
                warn!("[santa_rules] skipping unreadable rule row: {err}");
                continue;
            }
        };

        let Some(identifier) = identifier else {
            continue;
        };

        rules.push(RuleEntry {
            identifier,
            rule_type: rule_type.map_or(RuleType::Unknown, RuleType::from_code),
            state: state.map_or(RuleState::Unknown, RuleState::from_code),
            custom_message: custom_message.unwrap_or_default(),
        });
    }

    Ok(rules)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture(rows: &[(Option<&str>, Option<i64>, Option<i64>, Option<&str>)]) -> (TempDir, PathBuf) {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("rules.db");

        let conn = Connection::open(&path).expect("create db");
        conn.execute_batch(
            "CREATE TABLE rules (identifier TEXT, state INTEGER, type INTEGER, custommsg TEXT, timestamp INTEGER)",
        )
        .expect("create table");
        for (identifier, state, rule_type, msg) in rows {
            conn.execute(
                "INSERT INTO rules (identifier, state, type, custommsg) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![identifier, state, rule_type, msg],
            )
            .expect("insert rule");
        }

        (dir, path)
    }

    #[test]
    fn test_rule_type_codes() {
        let cases = [
            (500, RuleType::CdHash),
            (1000, RuleType::Binary),
            (2000, RuleType::SigningId),
            (3000, RuleType::Certificate),
            (4000, RuleType::TeamId),
            (9999, RuleType::Unknown),
        ];

        for (code, expected) in cases {
            assert_eq!(RuleType::from_code(code), expected, "code {code}");
        }
    }

    #[test]
    fn test_rule_state_codes() {
        let cases = [
            (1, RuleState::Allow),
            (2, RuleState::Block),
            (3, RuleState::SilentBlock),
            (4, RuleState::Remove),
            (5, RuleState::AllowCompiler),
            (6, RuleState::AllowTransitive),
            (7, RuleState::AllowLocalBinary),
            (8, RuleState::AllowLocalSigningId),
            (9, RuleState::Cel),
            (99, RuleState::Unknown),
        ];

        for (code, expected) in cases {
            assert_eq!(RuleState::from_code(code), expected, "code {code}");
        }
    }

    #[test]
    fn test_display_names() {
        assert_eq!(RuleType::TeamId.to_string(), "TeamID");
        assert_eq!(RuleType::CdHash.to_string(), "CDHash");
        assert_eq!(RuleType::Binary.to_string(), "Binary");
        assert_eq!(RuleState::AllowLocalSigningId.to_string(), "AllowLocalSigningID");
        assert_eq!(RuleState::SilentBlock.to_string(), "SilentBlock");
        assert_eq!(RuleState::Cel.to_string(), "CEL");
    }

    #[test]
    fn test_read_rules_orders_and_maps() {
        let (_dir, path) = fixture(&[
            (Some("EQHXZ8M8AV"), Some(1), Some(4000), None),
            (Some("abc123"), Some(2), Some(1000), Some("blocked by IT")),
        ]);

        let rules = read_rules(&path).expect("read rules");
        assert_eq!(rules.len(), 2);

        assert_eq!(rules[0].identifier, "EQHXZ8M8AV");
        assert_eq!(rules[0].rule_type, RuleType::TeamId);
        assert_eq!(rules[0].state, RuleState::Allow);
        assert_eq!(rules[0].custom_message, "");

        assert_eq!(rules[1].identifier, "abc123");
        assert_eq!(rules[1].rule_type, RuleType::Binary);
        assert_eq!(rules[1].state, RuleState::Block);
        assert_eq!(rules[1].custom_message, "blocked by IT");
    }

    #[test]
    fn test_read_rules_skips_null_identifier_and_defaults_nulls() {
        let (_dir, path) = fixture(&[
            (None, Some(1), Some(1000), None),
            (Some("deadbeef"), None, None, None),
        ]);

        let rules = read_rules(&path).expect("read rules");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].rule_type, RuleType::Unknown);
        assert_eq!(rules[0].state, RuleState::Unknown);
    }

    #[test]
    fn test_database_uri_escapes_uri_syntax() {
        assert_eq!(
            database_uri(Path::new("/var/db/santa/rules.db")),
            "file:/var/db/santa/rules.db?immutable=1"
        );
        assert_eq!(
            database_uri(Path::new("/tmp/a b/%41?x#y.db")),
            "file:/tmp/a%20b/%2541%3Fx%23y.db?immutable=1"
        );
    }

    #[test]
    fn test_read_rules_from_path_with_uri_characters() {
        let dir = TempDir::new().expect("create temp dir");
        let odd = dir.path().join("santa %41 ?#");
        std::fs::create_dir(&odd).expect("create dir");
        let path = odd.join("rules.db");

        Connection::open(&path)
            .and_then(|conn| {
                conn.execute_batch(
                    "CREATE TABLE rules (identifier TEXT, state INTEGER, type INTEGER, custommsg TEXT);
                     INSERT INTO rules VALUES ('abc123', 2, 1000, NULL);",
                )
            })
            .expect("create db");

        let rules = read_rules(&path).expect("read rules");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].identifier, "abc123");
    }

    #[test]
    fn test_read_rules_missing_database() {
        let dir = TempDir::new().expect("create temp dir");
        let result = read_rules(&dir.path().join("rules.db"));
        assert!(matches!(result, Err(RulesError::Missing { .. })));
    }

    #[test]
    fn test_read_rules_without_rules_table() {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("rules.db");
        Connection::open(&path)
            .and_then(|conn| conn.execute_batch("CREATE TABLE other (x INTEGER)"))
            .expect("create db");

        assert!(matches!(read_rules(&path), Err(RulesError::Query(_))));
    }
}
