//! Error types for runpanel
//!
//! Storage and formatting failures are typed so callers can decide on recovery
//! (the exit hook re-initializes the run counter on a failed read). Setup code
//! wraps these in `anyhow` with context.

use std::io;
use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::{categorize_io_error, DiskErrorKind};

/// Failure creating, reading, writing or parsing the run counter file
#[derive(Error, Debug)]
pub enum StorageError {
    /// A directory or file could not be created
    #[error("Failed to create {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The run file could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The run file could not be written
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The run file exists but does not hold a non-negative integer
    #[error("Run file {} does not contain a run number: {content:?}", .path.display())]
    Parse {
        path: PathBuf,
        content: String,
        #[source]
        source: ParseIntError,
    },
}

impl StorageError {
    /// Path of the file or directory the operation failed on
    pub fn path(&self) -> &PathBuf {
        match self {
            StorageError::Create { path, .. }
            | StorageError::Read { path, .. }
            | StorageError::Write { path, .. }
            | StorageError::Parse { path, .. } => path,
        }
    }

    /// True when the run file simply does not exist yet
    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            StorageError::Read { source, .. } if source.kind() == io::ErrorKind::NotFound
        )
    }

    /// True when the file exists but its content is not a run number
    pub fn is_parse(&self) -> bool {
        matches!(self, StorageError::Parse { .. })
    }

    /// Categorize the underlying IO failure for user-facing messages
    pub fn kind(&self) -> DiskErrorKind {
        match self {
            StorageError::Create { source, .. }
            | StorageError::Read { source, .. }
            | StorageError::Write { source, .. } => categorize_io_error(source),
            StorageError::Parse { .. } => DiskErrorKind::Other,
        }
    }
}

/// A level name outside TRACE, DEBUG, INFO, SUCCESS, WARNING, ERROR, CRITICAL
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown log level: {0:?}")]
pub struct UnknownLevelError(pub String);

/// Failure delivering a record to a sink
#[derive(Error, Debug)]
pub enum SinkError {
    #[error(transparent)]
    UnknownLevel(#[from] UnknownLevelError),

    #[error("Sink IO error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_missing_only_for_not_found_reads() {
        let missing = StorageError::Read {
            path: PathBuf::from("logs/run.txt"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert!(missing.is_missing());
        assert_eq!(missing.kind(), DiskErrorKind::NotFound);

        let denied = StorageError::Read {
            path: PathBuf::from("logs/run.txt"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert!(!denied.is_missing());
        assert_eq!(denied.kind(), DiskErrorKind::PermissionDenied);
    }

    #[test]
    fn test_parse_error_message_includes_content() {
        let source = "abc".parse::<u64>().unwrap_err();
        let err = StorageError::Parse {
            path: PathBuf::from("logs/run.txt"),
            content: "abc".to_string(),
            source,
        };
        assert!(err.is_parse());
        assert!(err.to_string().contains("\"abc\""));
        assert!(err.to_string().contains("logs/run.txt"));
    }

    #[test]
    fn test_unknown_level_display() {
        let err = UnknownLevelError("NOTICE".to_string());
        assert_eq!(err.to_string(), "Unknown log level: \"NOTICE\"");
    }
}
