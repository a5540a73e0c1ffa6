//! Sinks consuming log records
//!
//! A sink renders or stores one record at a time. The console sink can hand
//! back a plain-text copy of what it printed; that copy is returned to the
//! caller (and collected in an `ExportLog`) instead of being written into the
//! record.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::level::Level;
use super::record::LogRecord;
use crate::console::Console;
use crate::error::SinkError;
use crate::tui::PanelFormatter;

/// Default number of exported panels kept in memory
pub const DEFAULT_EXPORT_CAPACITY: usize = 1_000;

/// A consumer of log records
pub trait Sink: Send + Sync + 'static {
    /// Records below this level are not delivered
    fn min_level(&self) -> Level;

    /// Deliver a record; returns the exported text when the sink exports
    fn emit(&self, record: &LogRecord) -> Result<Option<String>, SinkError>;
}

/// Prints each record as a panel on the console
#[derive(Debug, Clone)]
pub struct PanelSink {
    formatter: PanelFormatter,
    console: Console,
    min_level: Level,
    export: bool,
}

impl PanelSink {
    pub fn new(formatter: PanelFormatter, console: Console, min_level: Level) -> Self {
        Self {
            formatter,
            console,
            min_level,
            export: false,
        }
    }

    /// Also return the plain text of every printed panel
    pub fn with_export(mut self, export: bool) -> Self {
        self.export = export;
        self
    }
}

impl Sink for PanelSink {
    fn min_level(&self) -> Level {
        self.min_level
    }

    fn emit(&self, record: &LogRecord) -> Result<Option<String>, SinkError> {
        let panel = self.formatter.render(record)?;
        self.console.print_panel(&panel)?;
        Ok(self.export.then(|| panel.to_plain()))
    }
}

/// Thread-safe ring buffer of exported panel text
#[derive(Debug, Clone)]
pub struct ExportLog {
    entries: Arc<Mutex<VecDeque<String>>>,
    max_entries: usize,
}

impl Default for ExportLog {
    fn default() -> Self {
        Self::new(DEFAULT_EXPORT_CAPACITY)
    }
}

impl ExportLog {
    /// Create an export log keeping at most `max_entries` panels
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(max_entries.min(64)))),
            max_entries: max_entries.max(1),
        }
    }

    /// Append a panel, dropping the oldest when full
    pub fn push(&self, text: String) {
        if let Ok(mut entries) = self.entries.lock() {
            if entries.len() >= self.max_entries {
                entries.pop_front();
            }
            entries.push_back(text);
        }
    }

    /// All kept panels, oldest first
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|e| e.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
