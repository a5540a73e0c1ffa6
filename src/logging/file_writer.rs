//! Plain-text trace log
//!
//! Every record at or above the file level is appended to `logs/trace.log`
//! in a fixed, grep-friendly format:
//!
//! `14:05:07.000 | Run 7 |   main.rs    | Line 12 | INFO | message key=value`

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};

use super::level::Level;
use super::record::LogRecord;
use super::sink::Sink;
use crate::error::SinkError;

/// Appends records to a log file
#[derive(Debug)]
pub struct TraceFileSink {
    file: Mutex<File>,
    path: PathBuf,
    min_level: Level,
}

impl TraceFileSink {
    /// Open (or create) the trace log for appending
    pub fn open(path: impl Into<PathBuf>, min_level: Level) -> Result<Self> {
        let path = path.into();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("Failed to create logs directory")?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .context("Failed to open trace log file")?;

        Ok(Self {
            file: Mutex::new(file),
            path,
            min_level,
        })
    }

    /// Full path to the log file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Format a record as one trace log line (without the newline)
pub fn format_line(record: &LogRecord) -> Result<String, SinkError> {
    let level = record.level()?;
    let mut line = format!(
        "{} | Run {} | {:^12} | Line {} | {} | {}",
        record.timestamp.format("%H:%M:%S%.3f"),
        record.run,
        record.file,
        record.line,
        level,
        record.message
    );
    for (key, value) in &record.extra {
        line.push_str(&format!(" {}={}", key, value));
    }
    Ok(line)
}

impl Sink for TraceFileSink {
    fn min_level(&self) -> Level {
        self.min_level
    }

    fn emit(&self, record: &LogRecord) -> Result<Option<String>, SinkError> {
        let line = format_line(record)?;
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "trace log lock poisoned"))?;
        writeln!(file, "{}", line)?;
        file.flush()?;
        Ok(None)
    }
}
