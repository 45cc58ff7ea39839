use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use miner_core::MatchId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("cannot open output file {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("cannot write to output file {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Destination for accepted match ids.
pub trait IdentifierSink: Send + Sync {
    fn append(&mut self, id: MatchId) -> Result<(), SinkError>;
}

/// One decimal id per line, appended to a file that reruns never truncate.
#[derive(Debug)]
pub struct AppendFileSink {
    path: PathBuf,
    file: File,
}

impl AppendFileSink {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| SinkError::Open {
                path: path.clone(),
                source,
            })?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IdentifierSink for AppendFileSink {
    fn append(&mut self, id: MatchId) -> Result<(), SinkError> {
        let line = format!("{id}\n");
        self.file
            .write_all(line.as_bytes())
            .and_then(|()| self.file.flush())
            .map_err(|source| SinkError::Write {
                path: self.path.clone(),
                source,
            })
    }
}
