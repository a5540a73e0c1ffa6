//! Log records handed to sinks

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Local};

use super::level::Level;
use crate::error::UnknownLevelError;

/// A single log event as seen by a sink
///
/// The level is kept as the name the event carried; sinks resolve it and
/// reject names outside the known set.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// Level name, e.g. "INFO" or "SUCCESS"
    pub level_name: String,
    /// Log message
    pub message: String,
    /// Source file name (without directories)
    pub file: String,
    /// Source line number
    pub line: u32,
    /// Timestamp when the event was recorded
    pub timestamp: DateTime<Local>,
    /// Run number of the emitting process
    pub run: u64,
    /// Additional event fields
    pub extra: BTreeMap<String, String>,
}

impl LogRecord {
    /// Create a record stamped with the current local time
    pub fn new(level: Level, message: impl Into<String>, run: u64) -> Self {
        Self {
            level_name: level.as_str().to_string(),
            message: message.into(),
            file: String::new(),
            line: 0,
            timestamp: Local::now(),
            run,
            extra: BTreeMap::new(),
        }
    }

    /// Set the source location; only the file name of `file` is kept
    pub fn with_location(mut self, file: &str, line: u32) -> Self {
        self.file = file_name(file);
        self.line = line;
        self
    }

    /// Set the timestamp
    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Add a metadata field
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Resolve the level name
    pub fn level(&self) -> Result<Level, UnknownLevelError> {
        self.level_name.parse()
    }
}

/// Strip directories from a source path
pub(crate) fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}
