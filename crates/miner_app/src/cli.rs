use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use miner_engine::STEAM_MATCH_HISTORY_URL;

/// Mine valid match ids from the match history, resuming where the last run stopped.
#[derive(Parser, Debug)]
#[command(name = "match_miner", version)]
pub struct Cli {
    /// File the accepted match ids are appended to, one per line.
    pub output_file: PathBuf,

    /// How many matches to examine in this run (capped at the daily quota).
    pub number_of_games: u64,

    /// File holding the sequence number to resume from.
    #[arg(long, default_value = "seq_num.txt")]
    pub cursor_file: PathBuf,

    /// Match history endpoint.
    #[arg(long, default_value = STEAM_MATCH_HISTORY_URL)]
    pub base_url: String,

    /// Attempts per batch before the run stops early.
    #[arg(long, default_value_t = 10)]
    pub max_attempts: u32,

    /// Seconds to wait between attempts.
    #[arg(long, default_value_t = 60)]
    pub backoff_secs: u64,

    /// Where log output goes.
    #[arg(long, value_enum, default_value_t = LogDestination::Terminal)]
    pub log: LogDestination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogDestination {
    /// Write to ./miner.log in the current directory.
    File,
    /// Write to the terminal.
    Terminal,
    /// Write to both file and terminal.
    Both,
}
