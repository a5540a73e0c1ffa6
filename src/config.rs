//! Configuration management for runpanel

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::logging::Level;

/// Name of the optional config file at the project root
pub const CONFIG_FILE: &str = "runpanel.toml";

/// Categories of disk errors for user-friendly messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskErrorKind {
    /// Disk is full or quota exceeded
    DiskFull,
    /// Permission denied (read or write)
    PermissionDenied,
    /// File or directory not found
    NotFound,
    /// Other IO error
    Other,
}

impl DiskErrorKind {
    /// Get a user-friendly message for this error kind
    pub fn user_message(&self) -> &'static str {
        match self {
            DiskErrorKind::DiskFull => "Disk full - free space needed to save the run number",
            DiskErrorKind::PermissionDenied => "Permission denied accessing the logs directory",
            DiskErrorKind::NotFound => "File or directory not found",
            DiskErrorKind::Other => "Failed to access the run file",
        }
    }
}

/// Categorize an IO error into a user-friendly category
pub fn categorize_io_error(e: &std::io::Error) -> DiskErrorKind {
    use std::io::ErrorKind;

    match e.kind() {
        ErrorKind::StorageFull | ErrorKind::WriteZero => DiskErrorKind::DiskFull,
        ErrorKind::PermissionDenied => DiskErrorKind::PermissionDenied,
        ErrorKind::NotFound => DiskErrorKind::NotFound,
        _ => {
            #[cfg(unix)]
            {
                if let Some(os_error) = e.raw_os_error() {
                    // ENOSPC = 28, EDQUOT = 122 (Linux) / 69 (macOS)
                    if os_error == 28 || os_error == 122 || os_error == 69 {
                        return DiskErrorKind::DiskFull;
                    }
                    // EACCES
                    if os_error == 13 {
                        return DiskErrorKind::PermissionDenied;
                    }
                }
            }
            DiskErrorKind::Other
        }
    }
}

/// Runpanel configuration
///
/// Every field has a default, so a partial `runpanel.toml` is valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Logs directory; relative paths resolve against the project root, `~` is expanded
    #[serde(default = "default_logs_dir")]
    pub logs_dir: String,

    /// Run counter file name inside the logs directory
    #[serde(default = "default_run_file")]
    pub run_file: String,

    /// Plain-text trace log inside the logs directory; empty disables it
    #[serde(default = "default_trace_file")]
    pub trace_file: String,

    /// Minimum level rendered as console panels
    #[serde(default = "default_console_level")]
    pub console_level: Level,

    /// Minimum level written to the trace log
    #[serde(default = "default_file_level")]
    pub file_level: Level,

    /// Fixed panel width; defaults to the terminal width
    #[serde(default)]
    pub panel_width: Option<u16>,

    /// Keep a plain-text copy of every rendered panel in the run's export log
    #[serde(default)]
    pub export_text: bool,
}

fn default_logs_dir() -> String {
    "logs".to_string()
}

fn default_run_file() -> String {
    "run.txt".to_string()
}

fn default_trace_file() -> String {
    "trace.log".to_string()
}

fn default_console_level() -> Level {
    Level::Info
}

fn default_file_level() -> Level {
    Level::Trace
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logs_dir: default_logs_dir(),
            run_file: default_run_file(),
            trace_file: default_trace_file(),
            console_level: default_console_level(),
            file_level: default_file_level(),
            panel_width: None,
            export_text: false,
        }
    }
}

impl Config {
    /// Load configuration from the project root, or return default if not found
    pub fn load(root: &Path) -> Result<Self> {
        let path = config_file_path(root);
        if path.exists() {
            let content = std::fs::read_to_string(&path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve the logs directory against the project root
    pub fn logs_dir(&self, root: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(&self.logs_dir);
        let dir = PathBuf::from(expanded.as_ref());
        if dir.is_absolute() {
            dir
        } else {
            root.join(dir)
        }
    }

    /// Full path of the run counter file
    pub fn run_file_path(&self, root: &Path) -> PathBuf {
        self.logs_dir(root).join(&self.run_file)
    }

    /// Full path of the trace log, if enabled
    pub fn trace_file_path(&self, root: &Path) -> Option<PathBuf> {
        let name = self.trace_file.trim();
        (!name.is_empty()).then(|| self.logs_dir(root).join(name))
    }
}

/// Get the path to the config file under a project root
pub fn config_file_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.logs_dir, "logs");
        assert_eq!(config.run_file, "run.txt");
        assert_eq!(config.trace_file, "trace.log");
        assert_eq!(config.console_level, Level::Info);
        assert_eq!(config.file_level, Level::Trace);
        assert!(!config.export_text);
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.console_level = Level::Success;
        config.panel_width = Some(80);

        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("console_level = \"SUCCESS\""));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: Config = toml::from_str("console_level = \"WARNING\"\n").unwrap();
        assert_eq!(parsed.console_level, Level::Warning);
        assert_eq!(parsed.run_file, "run.txt");
        assert_eq!(parsed.file_level, Level::Trace);
    }

    #[test]
    fn test_unknown_level_in_config_is_rejected() {
        let parsed: std::result::Result<Config, _> = toml::from_str("console_level = \"LOUD\"\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_load_missing_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load(temp_dir.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_written_config_loads_back() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.trace_file = String::new();
        config.export_text = true;

        let content = toml::to_string_pretty(&config).unwrap();
        std::fs::write(config_file_path(temp_dir.path()), content).unwrap();
        let loaded = Config::load(temp_dir.path()).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.trace_file_path(temp_dir.path()), None);
    }

    #[test]
    fn test_empty_trace_file_disables_trace_log() {
        let parsed: Config = toml::from_str("trace_file = \"\"\n").unwrap();
        assert_eq!(parsed.trace_file_path(Path::new("/work/project")), None);
    }

    #[test]
    fn test_wide_panel_width_is_accepted() {
        let parsed: Config = toml::from_str("panel_width = 20000\n").unwrap();
        assert_eq!(parsed.panel_width, Some(20000));
    }

    #[test]
    fn test_paths_resolve_against_root() {
        let config = Config::default();
        let root = Path::new("/work/project");
        assert_eq!(config.logs_dir(root), PathBuf::from("/work/project/logs"));
        assert_eq!(
            config.run_file_path(root),
            PathBuf::from("/work/project/logs/run.txt")
        );
        assert_eq!(
            config.trace_file_path(root),
            Some(PathBuf::from("/work/project/logs/trace.log"))
        );
    }

    #[test]
    fn test_absolute_logs_dir_ignores_root() {
        let mut config = Config::default();
        config.logs_dir = "/var/log/runpanel".to_string();
        assert_eq!(
            config.logs_dir(Path::new("/work/project")),
            PathBuf::from("/var/log/runpanel")
        );
    }

    #[test]
    fn test_categorize_io_error() {
        use std::io::{Error, ErrorKind};
        assert_eq!(
            categorize_io_error(&Error::from(ErrorKind::PermissionDenied)),
            DiskErrorKind::PermissionDenied
        );
        assert_eq!(
            categorize_io_error(&Error::from(ErrorKind::NotFound)),
            DiskErrorKind::NotFound
        );
        assert_eq!(
            categorize_io_error(&Error::from(ErrorKind::WriteZero)),
            DiskErrorKind::DiskFull
        );
    }
}
