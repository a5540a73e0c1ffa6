//! Per-process run context
//!
//! Everything a run needs is constructed once and passed explicitly: the
//! project root, config, console, counter store and the run number read at
//! start. `RunGuard` performs the exit-time completion.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::Config;
use crate::console::Console;
use crate::error::StorageError;
use crate::logging::ExportLog;
use crate::project_root::find_project_root;
use crate::run_counter::RunCounter;
use crate::tui::{PanelFormatter, PanelTheme};

/// State shared by the sinks and the exit hook of one process
#[derive(Debug, Clone)]
pub struct RunContext {
    root: PathBuf,
    config: Config,
    console: Console,
    counter: RunCounter,
    run: u64,
    exports: ExportLog,
}

impl RunContext {
    /// Discover the project root from the working directory, load its config
    /// and open the run counter on stdout
    pub fn discover() -> Result<Self> {
        let root = find_project_root().context("Failed to determine working directory")?;
        let config = Config::load(&root)?;
        let console = Console::stdout(config.panel_width);
        Self::open(&root, config, console)
    }

    /// Open a context rooted at `root`, initializing the run counter if needed
    pub fn open(root: &Path, config: Config, console: Console) -> Result<Self> {
        let counter = RunCounter::new(config.run_file_path(root));
        let outcome = counter
            .initialize()
            .with_context(|| format!("Failed to initialize run counter in {}", root.display()))?;

        // Subscriber is not installed yet; notices go straight to the console
        if outcome.created_dir {
            console
                .print(&format!(
                    "Created Logs Directory: {}",
                    config.logs_dir(root).display()
                ))
                .context("Failed to write to console")?;
        }
        if outcome.created_file {
            console
                .print("Created Run File, Set to 0")
                .context("Failed to write to console")?;
        }

        Ok(Self {
            root: root.to_path_buf(),
            config,
            console,
            counter,
            run: outcome.run,
            exports: ExportLog::default(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub fn counter(&self) -> &RunCounter {
        &self.counter
    }

    /// Run number read when the context was opened
    pub fn run(&self) -> u64 {
        self.run
    }

    /// Plain-text panels collected when `export_text` is on
    pub fn exports(&self) -> &ExportLog {
        &self.exports
    }

    pub fn trace_file_path(&self) -> Option<PathBuf> {
        self.config.trace_file_path(&self.root)
    }

    /// Panel formatter sized to the console
    pub fn formatter(&self) -> PanelFormatter {
        PanelFormatter::new(PanelTheme::default(), self.console.width())
    }

    /// Print the discovered project root as a notice panel
    pub fn describe_root(&self) -> std::io::Result<()> {
        let panel = self
            .formatter()
            .render_notice("Current Working Directory", &self.root.display().to_string());
        self.console.line(2)?;
        self.console.print_panel(&panel)?;
        self.console.line(2)
    }

    /// Log completion and bump the run number once
    ///
    /// A failed read is reported and retried once after re-initializing the
    /// store. Returns the new stored value.
    pub fn complete_run(&self) -> Result<u64, StorageError> {
        let run = match self.counter.read() {
            Ok(run) => run,
            Err(err) => {
                tracing::error!("{}", diagnostic(&err));
                self.counter.ensure_initialized()?
            }
        };
        tracing::info!("Run {} Completed", run);
        self.counter.increment()
    }
}

/// User-facing description of a storage failure
fn diagnostic(err: &StorageError) -> String {
    format!("{}: {}", err.kind().user_message(), err)
}

/// Completes the run when dropped
///
/// Returned by `init_logging`; drop it (or call `complete`) at the end of
/// `main`. A killed process never completes its run.
#[derive(Debug)]
pub struct RunGuard {
    context: RunContext,
    completed: bool,
}

impl RunGuard {
    pub fn new(context: RunContext) -> Self {
        Self {
            context,
            completed: false,
        }
    }

    /// Complete the run now and report the outcome
    pub fn complete(mut self) -> Result<u64, StorageError> {
        self.completed = true;
        self.context.complete_run()
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if self.completed {
            return;
        }
        // During drop the caller cannot see errors, so they go to stderr
        if let Err(err) = self.context.complete_run() {
            eprintln!("runpanel: failed to complete run: {}", diagnostic(&err));
        }
    }
}
