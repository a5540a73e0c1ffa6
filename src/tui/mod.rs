//! Terminal rendering
//!
//! Panels are laid out with Ratatui widgets in an off-screen buffer and
//! written out with crossterm styling.

pub mod ansi;
pub mod gradient;
pub mod panel;
pub mod theme;

pub use gradient::{Gradient, Rgb};
pub use panel::{Panel, PanelFormatter, MAX_PANEL_WIDTH, MIN_PANEL_WIDTH};
pub use theme::{LevelStyle, PanelTheme};
