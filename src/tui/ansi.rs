//! Encoding rendered buffers as terminal output
//!
//! Panels are laid out in an off-screen ratatui `Buffer` and then streamed
//! as plain lines, either with crossterm SGR sequences or as bare text.

use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{
    Attribute, Color as CColor, Print, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use ratatui::buffer::Buffer;
use ratatui::style::{Color, Modifier};
use ratatui::text::Span;

/// Map a ratatui color to its crossterm equivalent
pub fn to_crossterm(color: Color) -> CColor {
    match color {
        Color::Reset => CColor::Reset,
        Color::Black => CColor::Black,
        Color::Red => CColor::DarkRed,
        Color::Green => CColor::DarkGreen,
        Color::Yellow => CColor::DarkYellow,
        Color::Blue => CColor::DarkBlue,
        Color::Magenta => CColor::DarkMagenta,
        Color::Cyan => CColor::DarkCyan,
        Color::Gray => CColor::Grey,
        Color::DarkGray => CColor::DarkGrey,
        Color::LightRed => CColor::Red,
        Color::LightGreen => CColor::Green,
        Color::LightYellow => CColor::Yellow,
        Color::LightBlue => CColor::Blue,
        Color::LightMagenta => CColor::Magenta,
        Color::LightCyan => CColor::Cyan,
        Color::White => CColor::White,
        Color::Indexed(i) => CColor::AnsiValue(i),
        Color::Rgb(r, g, b) => CColor::Rgb { r, g, b },
    }
}

/// Attributes enabled by a modifier set
fn attributes(modifier: Modifier) -> Vec<Attribute> {
    [
        (Modifier::BOLD, Attribute::Bold),
        (Modifier::DIM, Attribute::Dim),
        (Modifier::ITALIC, Attribute::Italic),
        (Modifier::UNDERLINED, Attribute::Underlined),
        (Modifier::SLOW_BLINK, Attribute::SlowBlink),
        (Modifier::RAPID_BLINK, Attribute::RapidBlink),
        (Modifier::REVERSED, Attribute::Reverse),
        (Modifier::HIDDEN, Attribute::Hidden),
        (Modifier::CROSSED_OUT, Attribute::CrossedOut),
    ]
    .into_iter()
    .filter(|(flag, _)| modifier.contains(*flag))
    .map(|(_, attribute)| attribute)
    .collect()
}

/// Display columns taken by a cell symbol
fn symbol_width(symbol: &str) -> u16 {
    Span::raw(symbol).width() as u16
}

/// Write the buffer row by row with SGR styling, one `\n` per row
pub fn write_ansi<W: Write>(buffer: &Buffer, out: &mut W) -> io::Result<()> {
    let area = buffer.area;
    for y in area.top()..area.bottom() {
        let mut current = None;
        let mut skip = 0u16;
        for x in area.left()..area.right() {
            if skip > 0 {
                skip -= 1;
                continue;
            }
            let cell = buffer.get(x, y);
            let style = (cell.fg, cell.bg, cell.modifier);
            if current != Some(style) {
                queue!(out, SetAttribute(Attribute::Reset))?;
                if cell.fg != Color::Reset {
                    queue!(out, SetForegroundColor(to_crossterm(cell.fg)))?;
                }
                if cell.bg != Color::Reset {
                    queue!(out, SetBackgroundColor(to_crossterm(cell.bg)))?;
                }
                for attribute in attributes(cell.modifier) {
                    queue!(out, SetAttribute(attribute))?;
                }
                current = Some(style);
            }
            queue!(out, Print(cell.symbol()))?;
            skip = symbol_width(cell.symbol()).saturating_sub(1);
        }
        queue!(out, SetAttribute(Attribute::Reset), Print("\n"))?;
    }
    Ok(())
}

/// Buffer content without styling, trailing spaces trimmed per row
pub fn to_plain(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut text = String::new();
    for y in area.top()..area.bottom() {
        let mut row = String::new();
        let mut skip = 0u16;
        for x in area.left()..area.right() {
            if skip > 0 {
                skip -= 1;
                continue;
            }
            let symbol = buffer.get(x, y).symbol();
            row.push_str(symbol);
            skip = symbol_width(symbol).saturating_sub(1);
        }
        text.push_str(row.trim_end());
        text.push('\n');
    }
    text
}
