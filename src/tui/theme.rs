//! Theme module for panel colors and styles
//!
//! Each level has a border style and a three-stop gradient used for the
//! panel title and message. The table is fixed; there is no global instance,
//! a `PanelTheme` is owned by whoever renders.

use ratatui::style::{Modifier, Style};

use super::gradient::{Gradient, Rgb};
use crate::logging::Level;

/// Styling for one level
#[derive(Debug, Clone, PartialEq)]
pub struct LevelStyle {
    /// Border style before the bold emphasis every panel gets
    pub border: Style,
    /// Gradient for title and message text
    pub gradient: Gradient,
}

/// Panel theme with all color definitions
#[derive(Debug, Clone, PartialEq)]
pub struct PanelTheme {
    /// `|` separators in the title
    pub title_separator: Style,
    /// `:` separators in the subtitle timestamp
    pub time_separator: Style,
    /// Per-level styles, indexed in `Level::ALL` order
    levels: [LevelStyle; 7],
}

impl Default for PanelTheme {
    fn default() -> Self {
        Self::gradient()
    }
}

fn level_style(border: Style, stops: [u32; 3]) -> LevelStyle {
    LevelStyle {
        border,
        gradient: Gradient::new(stops.map(Rgb::hex).to_vec()),
    }
}

fn fg(hex: u32) -> Style {
    Style::default().fg(Rgb::hex(hex).into())
}

impl PanelTheme {
    /// Gradient theme (default)
    pub fn gradient() -> Self {
        let italic = Style::default().add_modifier(Modifier::ITALIC);
        let bold = Style::default().add_modifier(Modifier::BOLD);
        Self {
            title_separator: fg(0x666666).add_modifier(Modifier::ITALIC),
            time_separator: fg(0xaaaaaa).add_modifier(Modifier::DIM),
            levels: [
                level_style(italic, [0x888888, 0xaaaaaa, 0xcccccc]),
                level_style(fg(0xaaaaaa), [0x338888, 0x55aaaa, 0x77cccc]),
                level_style(fg(0x00afff), [0x008fff, 0x00afff, 0x00cfff]),
                level_style(bold.patch(fg(0x00ff00)), [0x00aa00, 0x00ff00, 0xafff00]),
                level_style(italic.patch(fg(0xffaf00)), [0xffaa00, 0xffcc00, 0xffff00]),
                level_style(bold.patch(fg(0xff5000)), [0xff0000, 0xff5500, 0xff7700]),
                level_style(bold.patch(fg(0xff0000)), [0xff0000, 0xff005f, 0xff00af]),
            ],
        }
    }

    /// Get the style entry for a level
    pub fn level(&self, level: Level) -> &LevelStyle {
        &self.levels[level as usize]
    }

    // === Style Builders ===

    /// Border style for a level panel
    pub fn border_style(&self, level: Level) -> Style {
        self.level(level).border.add_modifier(Modifier::BOLD)
    }

    /// Base style for the title before the gradient is applied
    pub fn title_style(&self) -> Style {
        Style::default()
    }

    /// Base style for the message before the gradient is applied
    pub fn message_style(&self) -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }

    /// Gradient for the project-root notice panel
    pub fn notice_gradient(&self) -> Gradient {
        Gradient::new(vec![
            Rgb::hex(0xff005f),
            Rgb::hex(0xff00af),
            Rgb::hex(0xff00ff),
        ])
    }

    /// Body style for the project-root notice panel
    pub fn notice_body_style(&self) -> Style {
        fg(0x5f00ff).add_modifier(Modifier::ITALIC)
    }

    /// Border style for the project-root notice panel
    pub fn notice_border_style(&self) -> Style {
        Style::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    #[test]
    fn test_every_level_has_three_stops() {
        let theme = PanelTheme::default();
        for level in Level::ALL {
            assert_eq!(theme.level(level).gradient.stops().len(), 3);
        }
    }

    #[test]
    fn test_level_table() {
        let theme = PanelTheme::default();
        assert_eq!(
            theme.level(Level::Info).gradient.stops()[0],
            Rgb::hex(0x008fff)
        );
        assert_eq!(
            theme.level(Level::Critical).border.fg,
            Some(Color::Rgb(0xff, 0, 0))
        );
        assert!(theme
            .level(Level::Trace)
            .border
            .add_modifier
            .contains(Modifier::ITALIC));
        assert_eq!(theme.level(Level::Trace).border.fg, None);
    }

    #[test]
    fn test_border_style_is_always_bold() {
        let theme = PanelTheme::default();
        for level in Level::ALL {
            assert!(theme
                .border_style(level)
                .add_modifier
                .contains(Modifier::BOLD));
        }
        assert!(theme
            .border_style(Level::Warning)
            .add_modifier
            .contains(Modifier::ITALIC));
    }
}
