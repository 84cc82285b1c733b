use log::{debug, error, info};
use osquery_rust_ng::plugin::{ColumnDef, ColumnOptions, ColumnType, ReadOnlyTable};
use osquery_rust_ng::{ExtensionPluginRequest, ExtensionResponse, ExtensionStatus};
use santa_log::{scrape_log_with, CancellationToken, Decision, LogEntry, ScrapeOptions};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Backs both `santa_allowed` and `santa_denied`; only the decision differs.
pub struct SantaDecisionsTable {
    decision: Decision,
    log_path: PathBuf,
    options: ScrapeOptions,
    query_timeout: Option<Duration>,
    lifetime: CancellationToken,
}

impl SantaDecisionsTable {
    pub fn new(
        decision: Decision,
        log_path: PathBuf,
        options: ScrapeOptions,
        query_timeout: Option<Duration>,
        lifetime: CancellationToken,
    ) -> Self {
        SantaDecisionsTable {
            decision,
            log_path,
            options,
            query_timeout,
            lifetime,
        }
    }

    fn query_token(&self) -> CancellationToken {
        match self.query_timeout {
            Some(timeout) => self.lifetime.with_timeout(timeout),
            None => self.lifetime.clone(),
        }
    }
}

fn entry_row(entry: LogEntry) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("timestamp".to_string(), entry.timestamp),
        ("application".to_string(), entry.application),
        ("reason".to_string(), entry.reason),
        ("sha256".to_string(), entry.sha256),
    ])
}

impl ReadOnlyTable for SantaDecisionsTable {
    fn name(&self) -> String {
        self.decision.table_name().to_string()
    }

    fn columns(&self) -> Vec<ColumnDef> {
        vec![
            ColumnDef::new("timestamp", ColumnType::Text, ColumnOptions::DEFAULT),
            ColumnDef::new("application", ColumnType::Text, ColumnOptions::DEFAULT),
            ColumnDef::new("reason", ColumnType::Text, ColumnOptions::DEFAULT),
            ColumnDef::new("sha256", ColumnType::Text, ColumnOptions::DEFAULT),
        ]
    }

    fn generate(&self, _req: ExtensionPluginRequest) -> ExtensionResponse {
        let token = self.query_token();

        match scrape_log_with(&token, self.decision, &self.log_path, &self.options) {
            Ok(entries) => {
                let rows: Vec<BTreeMap<String, String>> =
                    entries.into_iter().map(entry_row).collect();
                ExtensionResponse::new(ExtensionStatus::new(0, Some("OK".to_string()), None), rows)
            }
            Err(err) if err.is_log_missing() => {
                debug!("{}: {err}, returning no rows", self.name());
                ExtensionResponse::new(
                    ExtensionStatus::new(0, Some("OK".to_string()), None),
                    vec![],
                )
            }
            Err(err) => {
                error!("{}: {err}", self.name());
                ExtensionResponse::new(
                    ExtensionStatus::new(1, Some(err.to_string()), None),
                    vec![],
                )
            }
        }
    }

    fn shutdown(&self) {
        info!("{} shutting down", self.name());
        self.lifetime.cancel();
    }
}
