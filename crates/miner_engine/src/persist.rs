use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("state directory missing or not writable: {0}")]
    StateDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Check that `dir` exists, is a directory, and accepts new files.
///
/// Unlike output directories, state directories are never created here: a
/// missing one means the cursor file was never seeded.
pub fn ensure_state_dir(dir: &Path) -> Result<(), PersistError> {
    let meta = fs::metadata(dir).map_err(|e| PersistError::StateDir(e.to_string()))?;
    if !meta.is_dir() {
        return Err(PersistError::StateDir(format!(
            "{} is not a directory",
            dir.display()
        )));
    }
    // Writable if a temp file can be created there.
    NamedTempFile::new_in(dir).map_err(|e| PersistError::StateDir(e.to_string()))?;
    Ok(())
}

/// Atomically write content to `{dir}/{filename}` by writing a temp file then renaming.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        ensure_state_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // Rename replaces the target in one step; readers see old or new, never half.
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}
