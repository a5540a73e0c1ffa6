//! Tracing integration
//!
//! `SinkLayer` turns each `tracing` event into a `LogRecord` and hands it to
//! a sink. The event's `severity` field, when present, overrides the tracing
//! level so SUCCESS and CRITICAL can be expressed.

use std::fmt::Write as FmtWrite;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use super::file_writer::TraceFileSink;
use super::level::Level;
use super::record::{file_name, LogRecord};
use super::sink::{ExportLog, PanelSink, Sink};
use crate::context::{RunContext, RunGuard};

/// Event field carrying a level name that overrides the tracing level
pub const SEVERITY_FIELD: &str = "severity";

/// A tracing Layer delivering events to a sink
pub struct SinkLayer<S> {
    sink: S,
    run: u64,
    exports: Option<ExportLog>,
}

impl<S: Sink> SinkLayer<S> {
    /// Create a layer tagging records with `run`
    pub fn new(sink: S, run: u64) -> Self {
        Self {
            sink,
            run,
            exports: None,
        }
    }

    /// Collect the sink's exported text
    pub fn with_exports(mut self, exports: ExportLog) -> Self {
        self.exports = Some(exports);
        self
    }

    /// Filter by level and deliver one record
    ///
    /// Failures are reported on stderr; logging them through tracing would
    /// re-enter this layer.
    pub fn deliver(&self, record: &LogRecord) {
        let level = match record.level() {
            Ok(level) => level,
            Err(err) => {
                eprintln!("runpanel: {}", err);
                return;
            }
        };
        if level < self.sink.min_level() {
            return;
        }

        match self.sink.emit(record) {
            Ok(Some(text)) => {
                if let Some(exports) = &self.exports {
                    exports.push(text);
                }
            }
            Ok(None) => {}
            Err(err) => eprintln!("runpanel: {}", err),
        }
    }
}

impl<S, Sub> Layer<Sub> for SinkLayer<S>
where
    S: Sink,
    Sub: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, Sub>) {
        let metadata = event.metadata();

        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);

        let level_name = visitor
            .severity
            .unwrap_or_else(|| Level::from(*metadata.level()).as_str().to_string());

        let record = LogRecord {
            level_name,
            message: visitor.message.unwrap_or_default(),
            file: metadata.file().map(file_name).unwrap_or_default(),
            line: metadata.line().unwrap_or(0),
            timestamp: Local::now(),
            run: self.run,
            extra: visitor.fields,
        };

        self.deliver(&record);
    }
}

/// Visitor that extracts message, severity and extra fields from events
#[derive(Default)]
struct RecordVisitor {
    message: Option<String>,
    severity: Option<String>,
    fields: std::collections::BTreeMap<String, String>,
}

impl RecordVisitor {
    fn store(&mut self, field: &Field, value: String) {
        match field.name() {
            "message" => self.message = Some(value),
            SEVERITY_FIELD => self.severity = Some(value),
            name => {
                self.fields.insert(name.to_string(), value);
            }
        }
    }
}

impl Visit for RecordVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let mut buf = String::new();
        let _ = write!(&mut buf, "{:?}", value);
        self.store(field, buf);
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.store(field, value.to_string());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.store(field, value.to_string());
    }
}

/// Build the subscriber for a run: env filter, console panels, trace file
pub fn build_subscriber(
    context: &RunContext,
    env_filter: EnvFilter,
) -> Result<impl Subscriber + Send + Sync + 'static> {
    let config = context.config();

    let panel_sink = PanelSink::new(
        context.formatter(),
        context.console().clone(),
        config.console_level,
    )
    .with_export(config.export_text);
    let panel_layer =
        SinkLayer::new(panel_sink, context.run()).with_exports(context.exports().clone());

    let file_layer = match context.trace_file_path() {
        Some(path) => Some(SinkLayer::new(
            open_trace_sink(path, config.file_level)?,
            context.run(),
        )),
        None => None,
    };

    Ok(tracing_subscriber::registry()
        .with(env_filter)
        .with(panel_layer)
        .with(file_layer))
}

fn open_trace_sink(path: PathBuf, level: Level) -> Result<TraceFileSink> {
    TraceFileSink::open(&path, level)
        .with_context(|| format!("Failed to open trace log at {}", path.display()))
}

/// Install the run's subscriber globally
///
/// Returns a guard that completes the run (logs and bumps the run number)
/// when dropped. Keep it alive for the duration of the program.
pub fn init_logging(context: &RunContext) -> Result<RunGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace"));

    build_subscriber(context, env_filter)?
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(RunGuard::new(context.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::console::{CaptureBuffer, Console};
    use std::sync::{Arc, Mutex};

    /// Sink recording everything it receives
    #[derive(Clone, Default)]
    struct MemorySink {
        records: Arc<Mutex<Vec<LogRecord>>>,
        min_level: Option<Level>,
    }

    impl Sink for MemorySink {
        fn min_level(&self) -> Level {
            self.min_level.unwrap_or(Level::Trace)
        }

        fn emit(&self, record: &LogRecord) -> Result<Option<String>, crate::error::SinkError> {
            self.records.lock().unwrap().push(record.clone());
            Ok(Some(record.message.clone()))
        }
    }

    fn with_sink(sink: MemorySink, exports: ExportLog, f: impl FnOnce()) {
        let subscriber =
            tracing_subscriber::registry().with(SinkLayer::new(sink, 4).with_exports(exports));
        tracing::subscriber::with_default(subscriber, f);
    }

    #[test]
    fn test_event_becomes_record() {
        let sink = MemorySink::default();
        with_sink(sink.clone(), ExportLog::default(), || {
            tracing::warn!(user = "ada", attempt = 2, "retrying {}", "upload");
        });

        let records = sink.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.level_name, "WARNING");
        assert_eq!(record.message, "retrying upload");
        assert_eq!(record.file, "layer.rs");
        assert!(record.line > 0);
        assert_eq!(record.run, 4);
        assert_eq!(record.extra["user"], "ada");
        assert_eq!(record.extra["attempt"], "2");
    }

    #[test]
    fn test_severity_field_overrides_level() {
        let sink = MemorySink::default();
        with_sink(sink.clone(), ExportLog::default(), || {
            crate::success!("all good");
            crate::critical!("on fire");
        });

        let records = sink.records.lock().unwrap();
        assert_eq!(records[0].level_name, "SUCCESS");
        assert_eq!(records[1].level_name, "CRITICAL");
        assert!(records.iter().all(|r| !r.extra.contains_key(SEVERITY_FIELD)));
    }

    #[test]
    fn test_min_level_filters_with_custom_levels() {
        let sink = MemorySink {
            min_level: Some(Level::Success),
            ..Default::default()
        };
        with_sink(sink.clone(), ExportLog::default(), || {
            tracing::info!("dropped");
            crate::success!("kept");
            tracing::warn!("kept too");
        });

        let messages: Vec<String> = sink
            .records
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.message.clone())
            .collect();
        assert_eq!(messages, vec!["kept", "kept too"]);
    }

    #[test]
    fn test_unknown_severity_is_not_delivered() {
        let sink = MemorySink::default();
        with_sink(sink.clone(), ExportLog::default(), || {
            tracing::info!(severity = "SHOUT", "ignored");
        });
        assert!(sink.records.lock().unwrap().is_empty());
    }

    #[test]
    fn test_exports_are_collected() {
        let sink = MemorySink::default();
        let exports = ExportLog::default();
        with_sink(sink, exports.clone(), || {
            tracing::info!("first");
            tracing::info!("second");
        });
        assert_eq!(
            exports.entries(),
            vec!["first".to_string(), "second".to_string()]
        );
    }

    #[test]
    fn test_build_subscriber_renders_panels_and_trace_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let capture = CaptureBuffer::new();
        let mut config = Config::default();
        config.export_text = true;
        let console = Console::from_writer(capture.clone(), 60, false);
        let context = RunContext::open(temp_dir.path(), config, console).unwrap();

        let subscriber = build_subscriber(&context, EnvFilter::new("trace")).unwrap();
        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("below console level");
            tracing::info!("hello panel");
        });

        let out = capture.contents();
        assert!(out.contains("hello panel"));
        assert!(out.contains("Run 0"));
        assert!(!out.contains("below console level"));
        assert_eq!(context.exports().len(), 1);

        let trace = std::fs::read_to_string(temp_dir.path().join("logs").join("trace.log")).unwrap();
        assert!(trace.contains("| DEBUG | below console level"));
        assert!(trace.contains("| INFO | hello panel"));
    }
}
