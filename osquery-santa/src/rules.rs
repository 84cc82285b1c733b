use log::{info, warn};
use osquery_rust_ng::plugin::{ColumnDef, ColumnOptions, ColumnType, ReadOnlyTable};
use osquery_rust_ng::{ExtensionPluginRequest, ExtensionResponse, ExtensionStatus};
use santa_log::rules::{read_rules, RuleEntry};
use std::collections::BTreeMap;
use std::path::PathBuf;

pub struct SantaRulesTable {
    database_path: PathBuf,
}

impl SantaRulesTable {
    pub fn new(database_path: PathBuf) -> Self {
        SantaRulesTable { database_path }
    }
}

fn rule_row(rule: RuleEntry) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("identifier".to_string(), rule.identifier),
        ("type".to_string(), rule.rule_type.to_string()),
        ("state".to_string(), rule.state.to_string()),
        ("custom_message".to_string(), rule.custom_message),
    ])
}

impl ReadOnlyTable for SantaRulesTable {
    fn name(&self) -> String {
        "santa_rules".to_string()
    }

    fn columns(&self) -> Vec<ColumnDef> {
        vec![
            ColumnDef::new("identifier", ColumnType::Text, ColumnOptions::DEFAULT),
            ColumnDef::new("type", ColumnType::Text, ColumnOptions::DEFAULT),
            ColumnDef::new("state", ColumnType::Text, ColumnOptions::DEFAULT),
            ColumnDef::new("custom_message", ColumnType::Text, ColumnOptions::DEFAULT),
        ]
    }

    fn generate(&self, _req: ExtensionPluginRequest) -> ExtensionResponse {
        // Unreadable rules are not worth failing the query over.
        let rows: Vec<BTreeMap<String, String>> = match read_rules(&self.database_path) {
            Ok(rules) => rules.into_iter().map(rule_row).collect(),
            Err(err) => {
                warn!("santa_rules: {err}");
                vec![]
            }
        };

        ExtensionResponse::new(ExtensionStatus::new(0, Some("OK".to_string()), None), rows)
    }

    fn shutdown(&self) {
        info!("santa_rules shutting down");
    }
}
