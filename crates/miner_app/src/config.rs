use std::time::Duration;

use miner_core::Cursor;
use miner_engine::{
    AppendFileSink, CursorStore, FileCursorStore, HarvestConfig, RetryPolicy, TransportSettings,
};

use crate::cli::Cli;

pub const API_KEY_VAR: &str = "STEAM_API_KEY";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("please set the {0} environment variable")]
    MissingCredential(&'static str),
}

pub fn api_key_from_env() -> Result<String, ConfigError> {
    api_key_from(std::env::var(API_KEY_VAR).ok())
}

fn api_key_from(value: Option<String>) -> Result<String, ConfigError> {
    value
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .ok_or(ConfigError::MissingCredential(API_KEY_VAR))
}

pub fn transport_settings(cli: &Cli, api_key: String) -> TransportSettings {
    TransportSettings {
        base_url: cli.base_url.clone(),
        ..TransportSettings::new(api_key)
    }
}

pub fn harvest_config(cli: &Cli) -> HarvestConfig {
    HarvestConfig {
        retry: RetryPolicy::new(cli.max_attempts, Duration::from_secs(cli.backoff_secs)),
        ..HarvestConfig::default()
    }
}

/// Opens the cursor file and then the output file. A missing or malformed
/// cursor fails before the output file is created.
pub fn open_stores(cli: &Cli) -> anyhow::Result<(Cursor, FileCursorStore, AppendFileSink)> {
    let cursor_store = FileCursorStore::new(&cli.cursor_file);
    let start = cursor_store.load()?;
    let sink = AppendFileSink::open(&cli.output_file)?;
    Ok((start, cursor_store, sink))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::ffi::OsStr;

    #[test]
    fn blank_or_absent_key_is_missing() {
        assert_eq!(
            api_key_from(None),
            Err(ConfigError::MissingCredential(API_KEY_VAR))
        );
        assert_eq!(
            api_key_from(Some("  ".into())),
            Err(ConfigError::MissingCredential(API_KEY_VAR))
        );
        assert_eq!(api_key_from(Some("ABC123\n".into())), Ok("ABC123".into()));
    }

    #[test]
    fn retry_flags_flow_into_policy() {
        let cli = Cli::try_parse_from([
            "match_miner",
            "out.txt",
            "10",
            "--max-attempts",
            "3",
            "--backoff-secs",
            "5",
        ])
        .unwrap();
        let config = harvest_config(&cli);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.backoff, Duration::from_secs(5));
        assert_eq!(config.batch_limit, 100);
        assert_eq!(config.daily_limit, 10_000_000);
    }

    fn cli_in(dir: &std::path::Path) -> Cli {
        let output = dir.join("ids.txt");
        let cursor = dir.join("seq_num.txt");
        Cli::try_parse_from([
            OsStr::new("match_miner"),
            output.as_os_str(),
            OsStr::new("10"),
            OsStr::new("--cursor-file"),
            cursor.as_os_str(),
        ])
        .unwrap()
    }

    #[test]
    fn missing_cursor_leaves_no_output_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let cli = cli_in(dir.path());

        let err = open_stores(&cli).unwrap_err();

        assert!(err.to_string().contains("seq_num.txt"), "{err}");
        assert!(!cli.output_file.exists());
    }

    #[test]
    fn valid_cursor_opens_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let cli = cli_in(dir.path());
        std::fs::write(&cli.cursor_file, "4200\n").unwrap();

        let (start, store, _sink) = open_stores(&cli).unwrap();

        assert_eq!(start, Cursor::new(4200));
        assert_eq!(store.path(), cli.cursor_file.as_path());
        assert!(cli.output_file.exists());
    }
}
