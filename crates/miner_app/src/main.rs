//! `match_miner`: harvest qualifying match ids from the sequence-ordered match history.
mod cli;
mod config;
mod logging;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use miner_core::RunSummary;
use miner_engine::{Harvester, ReqwestTransport};
use miner_logging::miner_info;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::initialize(cli.log);

    match run(&cli) {
        Ok(summary) => {
            println!(
                "{} of {} matches kept; next run starts at sequence {}",
                summary.identifiers_accepted, summary.records_seen, summary.final_cursor
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<RunSummary> {
    let api_key = config::api_key_from_env()?;
    let (start, cursor_store, sink) = config::open_stores(cli)?;
    let transport = ReqwestTransport::new(config::transport_settings(cli, api_key))?;
    miner_info!(
        "Appending ids to {:?}, resuming at {} from {:?}",
        sink.path(),
        start,
        cursor_store.path()
    );

    let mut harvester = Harvester::new(
        config::harvest_config(cli),
        Box::new(transport),
        Box::new(cursor_store),
        Box::new(sink),
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("cannot start async runtime")?;
    let summary = runtime.block_on(harvester.run(cli.number_of_games))?;
    Ok(summary)
}
