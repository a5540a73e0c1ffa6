//! runpanel - styled terminal panels for tracing events
//!
//! Every event is printed as a bordered, gradient-colored panel tagged with a
//! run number that persists in `logs/run.txt` and advances once per process.
//!
//! ```no_run
//! use runpanel::{init_logging, RunContext};
//!
//! fn main() -> anyhow::Result<()> {
//!     let context = RunContext::discover()?;
//!     let _guard = init_logging(&context)?;
//!
//!     tracing::info!("Started");
//!     runpanel::success!("Finished");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod console;
pub mod context;
pub mod error;
pub mod logging;
pub mod project_root;
pub mod run_counter;
pub mod tui;

pub use config::Config;
pub use console::Console;
pub use context::{RunContext, RunGuard};
pub use error::{SinkError, StorageError, UnknownLevelError};
pub use logging::{init_logging, Level, LogRecord};
pub use run_counter::RunCounter;

#[doc(hidden)]
pub use tracing as __tracing;

/// Log at SUCCESS (an INFO event carrying `severity = "SUCCESS"`)
#[macro_export]
macro_rules! success {
    ($($arg:tt)+) => {
        $crate::__tracing::info!(severity = "SUCCESS", $($arg)+)
    };
}

/// Log at CRITICAL (an ERROR event carrying `severity = "CRITICAL"`)
#[macro_export]
macro_rules! critical {
    ($($arg:tt)+) => {
        $crate::__tracing::error!(severity = "CRITICAL", $($arg)+)
    };
}
