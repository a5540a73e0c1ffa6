//! Console handle
//!
//! Owns the output stream panels are written to, the panel width, and
//! whether ANSI styling is emitted. Cloning shares the same stream.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crossterm::tty::IsTty;

use crate::tui::Panel;

/// Width used when the terminal size cannot be queried
pub const FALLBACK_WIDTH: u16 = 100;

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// A styled output stream
#[derive(Clone)]
pub struct Console {
    writer: SharedWriter,
    width: u16,
    color: bool,
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("width", &self.width)
            .field("color", &self.color)
            .finish_non_exhaustive()
    }
}

impl Console {
    /// Console on stdout; width from the terminal, color only on a TTY
    pub fn stdout(width: Option<u16>) -> Self {
        let stdout = io::stdout();
        let color = stdout.is_tty();
        let width = width.unwrap_or_else(|| {
            crossterm::terminal::size()
                .map(|(columns, _)| columns)
                .unwrap_or(FALLBACK_WIDTH)
        });
        Self::from_writer(stdout, width, color)
    }

    /// Console on any writer
    pub fn from_writer(writer: impl Write + Send + 'static, width: u16, color: bool) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
            width,
            color,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    /// Write a panel, styled or plain depending on the console
    pub fn print_panel(&self, panel: &Panel) -> io::Result<()> {
        let mut writer = self.lock()?;
        if self.color {
            panel.write_ansi(&mut *writer)?;
        } else {
            writer.write_all(panel.to_plain().as_bytes())?;
        }
        writer.flush()
    }

    /// Write a line of unstyled text
    pub fn print(&self, text: &str) -> io::Result<()> {
        let mut writer = self.lock()?;
        writeln!(writer, "{}", text)?;
        writer.flush()
    }

    /// Write `count` blank lines
    pub fn line(&self, count: usize) -> io::Result<()> {
        let mut writer = self.lock()?;
        writer.write_all("\n".repeat(count).as_bytes())?;
        writer.flush()
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, Box<dyn Write + Send>>> {
        self.writer
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "console writer lock poisoned"))
    }
}

/// In-memory writer whose content can be read back, for capturing console output
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far
    pub fn contents(&self) -> String {
        self.bytes
            .lock()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default()
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Ok(mut bytes) = self.bytes.lock() {
            bytes.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
