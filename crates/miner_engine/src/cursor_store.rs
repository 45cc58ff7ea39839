use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use miner_core::{Cursor, ParseCursorError};
use miner_logging::miner_debug;
use thiserror::Error;

use crate::persist::{AtomicFileWriter, PersistError};

#[derive(Debug, Error)]
pub enum CursorError {
    #[error(
        "cursor file {} not found; seed it with the first match sequence number to mine",
        .path.display()
    )]
    Missing { path: PathBuf },
    #[error("cursor file {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        source: ParseCursorError,
    },
    #[error("cannot read cursor file {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("cursor path {} does not name a file", .path.display())]
    InvalidPath { path: PathBuf },
    #[error("cannot save cursor to {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        source: PersistError,
    },
}

/// Where the resume point lives between runs.
pub trait CursorStore: Send + Sync {
    fn load(&self) -> Result<Cursor, CursorError>;
    fn save(&self, cursor: Cursor) -> Result<(), CursorError>;
}

/// Cursor kept as a single decimal line in a small text file.
#[derive(Debug, Clone)]
pub struct FileCursorStore {
    path: PathBuf,
}

impl FileCursorStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

impl CursorStore for FileCursorStore {
    fn load(&self) -> Result<Cursor, CursorError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(CursorError::Missing {
                    path: self.path.clone(),
                });
            }
            Err(err) => {
                return Err(CursorError::Read {
                    path: self.path.clone(),
                    source: err,
                });
            }
        };

        // Only the first line counts; anything after it is ignored.
        let first_line = content.lines().next().unwrap_or_default();
        let cursor = first_line
            .parse::<Cursor>()
            .map_err(|source| CursorError::Malformed {
                path: self.path.clone(),
                source,
            })?;
        miner_debug!("Loaded cursor {} from {:?}", cursor, self.path);
        Ok(cursor)
    }

    fn save(&self, cursor: Cursor) -> Result<(), CursorError> {
        let filename = self
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| CursorError::InvalidPath {
                path: self.path.clone(),
            })?;

        let writer = AtomicFileWriter::new(self.dir());
        writer
            .write(filename, &format!("{cursor}\n"))
            .map_err(|source| CursorError::Persist {
                path: self.path.clone(),
                source,
            })?;
        miner_debug!("Saved cursor {} to {:?}", cursor, self.path);
        Ok(())
    }
}
