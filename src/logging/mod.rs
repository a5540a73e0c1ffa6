//! Logging system for runpanel
//!
//! Provides the severity levels, the record handed to sinks, the console panel
//! and trace file sinks, and the tracing layer that feeds them.

mod file_writer;
mod layer;
mod level;
mod record;
mod sink;

pub use file_writer::{format_line, TraceFileSink};
pub use layer::{build_subscriber, init_logging, SinkLayer, SEVERITY_FIELD};
pub use level::Level;
pub use record::LogRecord;
pub use sink::{ExportLog, PanelSink, Sink, DEFAULT_EXPORT_CAPACITY};
