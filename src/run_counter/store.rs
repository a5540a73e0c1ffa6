//! File-backed storage for the run counter

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// What `initialize` had to create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitOutcome {
    /// Value stored after initialization
    pub run: u64,
    /// The logs directory did not exist and was created
    pub created_dir: bool,
    /// The run file did not exist and was created with `0`
    pub created_file: bool,
}

/// Store for the persisted run number
#[derive(Debug, Clone)]
pub struct RunCounter {
    path: PathBuf,
}

impl RunCounter {
    /// Create a store backed by the given file; nothing is touched on disk
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the path to the run file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the directory and file (with `0`) when missing, then read the value
    pub fn initialize(&self) -> Result<InitOutcome, StorageError> {
        let mut created_dir = false;
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).map_err(|source| StorageError::Create {
                    path: dir.to_path_buf(),
                    source,
                })?;
                created_dir = true;
            }
        }

        let mut created_file = false;
        if !self.path.exists() {
            fs::write(&self.path, "0").map_err(|source| StorageError::Create {
                path: self.path.clone(),
                source,
            })?;
            created_file = true;
        }

        Ok(InitOutcome {
            run: self.read()?,
            created_dir,
            created_file,
        })
    }

    /// Ensure the run file exists and return its value
    ///
    /// Calling this on an initialized store only reads.
    pub fn ensure_initialized(&self) -> Result<u64, StorageError> {
        let outcome = self.initialize()?;
        if outcome.created_dir {
            if let Some(dir) = self.path.parent() {
                tracing::info!("Created logs directory: {}", dir.display());
            }
        }
        if outcome.created_file {
            tracing::info!("Created run file, set to 0");
        }
        Ok(outcome.run)
    }

    /// Read the stored run number
    ///
    /// A missing file is an error; call `ensure_initialized` first.
    pub fn read(&self) -> Result<u64, StorageError> {
        let content = fs::read_to_string(&self.path).map_err(|source| StorageError::Read {
            path: self.path.clone(),
            source,
        })?;

        content
            .trim()
            .parse::<u64>()
            .map_err(|source| StorageError::Parse {
                path: self.path.clone(),
                content,
                source,
            })
    }

    /// Overwrite the run file with `run`
    pub fn write(&self, run: u64) -> Result<(), StorageError> {
        fs::write(&self.path, run.to_string()).map_err(|source| StorageError::Write {
            path: self.path.clone(),
            source,
        })
    }

    /// Read, add one, write back; returns the new value
    pub fn increment(&self) -> Result<u64, StorageError> {
        let run = self.read()?.saturating_add(1);
        self.write(run)?;
        Ok(run)
    }
}
