mod cli;
mod decisions;
mod rules;

use crate::cli::Args;
use crate::decisions::SantaDecisionsTable;
use crate::rules::SantaRulesTable;
use clap::Parser;
use log::{debug, info};
use osquery_rust_ng::plugin::Plugin;
use osquery_rust_ng::prelude::*;
use santa_log::{CancellationToken, Decision, ScrapeOptions};
use std::io::Error;

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    debug!(
        "osquery connectivity: interval {}s, timeout {}s",
        args.interval, args.timeout
    );

    let paths = args.paths();
    let options = ScrapeOptions {
        max_entries: args.max_entries,
        max_line_bytes: args.max_line_bytes,
    };

    let mut manager = Server::new(Some("santa"), args.socket.as_str())?;

    for decision in [Decision::Allowed, Decision::Denied] {
        manager.register_plugin(Plugin::readonly_table(SantaDecisionsTable::new(
            decision,
            paths.log_path.clone(),
            options,
            args.query_timeout(),
            // Cancelled by this table's shutdown, aborting its in-flight scrapes.
            CancellationToken::new(),
        )));
    }
    manager.register_plugin(Plugin::readonly_table(SantaRulesTable::new(
        paths.database_path,
    )));

    info!(
        "serving Santa tables from {} on {}",
        paths.log_path.display(),
        args.socket
    );

    manager.run().map_err(Error::other)?;

    Ok(())
}
