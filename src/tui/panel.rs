//! Bordered log panels
//!
//! A panel is a rounded box spanning the console width:
//!
//! ```text
//! ╭ INFO | main.rs | Line 12 ───────────────╮
//! │                                         │
//! │  Message text, wrapped to fit           │
//! │                                         │
//! ╰───────────────── Run 7 | 09:41:03.120 AM╯
//! ```
//!
//! Layout is done in an off-screen ratatui buffer, so identical records
//! produce identical bytes.

use std::io::{self, Write};

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::block::{Position, Title};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph, Widget};

use super::ansi;
use super::gradient::Gradient;
use super::theme::PanelTheme;
use crate::error::UnknownLevelError;
use crate::logging::LogRecord;

/// Narrowest panel that still leaves room for one body column
pub const MIN_PANEL_WIDTH: u16 = 8;

/// Widest panel; keeps the rendered area far below `u16::MAX` cells
pub const MAX_PANEL_WIDTH: u16 = 1_000;

const HORIZONTAL_PADDING: u16 = 2;
const VERTICAL_PADDING: u16 = 1;
const TAB_WIDTH: usize = 4;

/// A laid-out panel
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    buffer: Buffer,
}

impl Panel {
    pub fn width(&self) -> u16 {
        self.buffer.area.width
    }

    pub fn height(&self) -> u16 {
        self.buffer.area.height
    }

    /// Underlying cell buffer
    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Write the panel with ANSI styling
    pub fn write_ansi<W: Write>(&self, out: &mut W) -> io::Result<()> {
        ansi::write_ansi(&self.buffer, out)
    }

    /// Panel as an ANSI-styled string
    pub fn to_ansi(&self) -> String {
        let mut out = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.write_ansi(&mut out);
        String::from_utf8_lossy(&out).into_owned()
    }

    /// Panel as plain text, the form kept by the export log
    pub fn to_plain(&self) -> String {
        ansi::to_plain(&self.buffer)
    }
}

/// Renders log records into panels
#[derive(Debug, Clone)]
pub struct PanelFormatter {
    theme: PanelTheme,
    width: u16,
}

impl PanelFormatter {
    pub fn new(theme: PanelTheme, width: u16) -> Self {
        Self {
            theme,
            width: width.clamp(MIN_PANEL_WIDTH, MAX_PANEL_WIDTH),
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn theme(&self) -> &PanelTheme {
        &self.theme
    }

    /// Render a record
    ///
    /// The level is resolved first; an unknown level yields no panel at all.
    pub fn render(&self, record: &LogRecord) -> Result<Panel, UnknownLevelError> {
        let level = record.level()?;
        let style = self.theme.level(level);

        let title = self.title_line(
            &format!(" {} | {} | Line {} ", level, record.file, record.line),
            &style.gradient,
        );
        let subtitle = self.subtitle_line(record);
        let body = style
            .gradient
            .apply(&sanitize(&record.message), self.theme.message_style());

        Ok(self.compose(
            title,
            Some(subtitle),
            body,
            self.theme.border_style(level),
        ))
    }

    /// Render a free-form notice with a gradient title, e.g. the discovered project root
    pub fn render_notice(&self, title: &str, body: &str) -> Panel {
        let title = Line::from(
            self.theme
                .notice_gradient()
                .spans(title, Style::default().add_modifier(Modifier::BOLD)),
        );
        let body = sanitize(body)
            .chars()
            .map(|c| (c, self.theme.notice_body_style()))
            .collect();
        self.compose(title, None, body, self.theme.notice_border_style())
    }

    /// Title: gradient text, grey italic `|`, the whole line reversed
    fn title_line(&self, text: &str, gradient: &Gradient) -> Line<'static> {
        let spans: Vec<Span<'static>> = gradient
            .apply(text, self.theme.title_style())
            .into_iter()
            .map(|(c, style)| {
                let style = if c == '|' {
                    style.patch(self.theme.title_separator)
                } else {
                    style
                };
                Span::styled(c.to_string(), style.add_modifier(Modifier::REVERSED))
            })
            .collect();
        Line::from(spans)
    }

    /// Subtitle: `Run N | HH:MM:SS.mmm AM`, with dimmed `:`
    fn subtitle_line(&self, record: &LogRecord) -> Line<'static> {
        let text = format!(
            "Run {} | {}",
            record.run,
            record.timestamp.format("%H:%M:%S%.3f %p")
        );
        let mut spans = Vec::new();
        for (i, part) in text.split(':').enumerate() {
            if i > 0 {
                spans.push(Span::styled(":", self.theme.time_separator));
            }
            if !part.is_empty() {
                spans.push(Span::raw(part.to_string()));
            }
        }
        Line::from(spans)
    }

    fn compose(
        &self,
        title: Line<'static>,
        subtitle: Option<Line<'static>>,
        body: Vec<(char, Style)>,
        border: Style,
    ) -> Panel {
        let inner_width = usize::from(self.width - 2 - 2 * HORIZONTAL_PADDING);
        let chrome = 2 + 2 * VERTICAL_PADDING;
        // Rect areas are capped at u16::MAX cells
        let max_body = usize::from((u16::MAX / self.width).saturating_sub(chrome));

        let mut rows = wrap(&body, inner_width);
        rows.truncate(max_body.max(1));

        let height = rows.len() as u16 + chrome;
        let area = Rect::new(0, 0, self.width, height);
        let mut buffer = Buffer::empty(area);

        let lines: Vec<Line<'static>> = rows
            .into_iter()
            .map(|row| {
                Line::from(
                    row.into_iter()
                        .map(|(c, style)| Span::styled(c.to_string(), style))
                        .collect::<Vec<_>>(),
                )
            })
            .collect();

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border)
            .padding(Padding::new(
                HORIZONTAL_PADDING,
                HORIZONTAL_PADDING,
                VERTICAL_PADDING,
                VERTICAL_PADDING,
            ))
            .title(
                Title::from(title)
                    .alignment(Alignment::Left)
                    .position(Position::Top),
            );
        if let Some(subtitle) = subtitle {
            block = block.title(
                Title::from(subtitle)
                    .alignment(Alignment::Right)
                    .position(Position::Bottom),
            );
        }

        Paragraph::new(Text::from(lines))
            .block(block)
            .render(area, &mut buffer);

        Panel { buffer }
    }
}

/// Expand tabs and drop control characters other than `\n`
fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\t' => out.push_str(&" ".repeat(TAB_WIDTH)),
            '\n' => out.push(c),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

fn char_width(c: char) -> usize {
    let mut utf8 = [0u8; 4];
    Span::raw(&*c.encode_utf8(&mut utf8)).width()
}

/// Greedy word wrap of styled characters
///
/// Breaks at the last space that fits, or mid-word when a word is wider than
/// the line. `\n` always starts a new row.
fn wrap(chars: &[(char, Style)], width: usize) -> Vec<Vec<(char, Style)>> {
    let width = width.max(1);
    let mut rows = Vec::new();

    for paragraph in chars.split(|(c, _)| *c == '\n') {
        let mut row: Vec<(char, Style)> = Vec::new();
        let mut row_width = 0;
        let mut wrapped = false;

        for &(c, style) in paragraph {
            let w = char_width(c);
            while row_width + w > width && !row.is_empty() {
                // A space that overflows ends the row where it is
                let split = if c == ' ' {
                    None
                } else {
                    row.iter().rposition(|(c, _)| *c == ' ')
                };
                match split {
                    Some(space) => {
                        let rest = row.split_off(space + 1);
                        row.pop();
                        rows.push(std::mem::replace(&mut row, rest));
                    }
                    None => rows.push(std::mem::take(&mut row)),
                }
                row_width = row.iter().map(|(c, _)| char_width(*c)).sum();
                wrapped = true;
            }
            if c == ' ' && row.is_empty() && wrapped {
                continue;
            }
            row.push((c, style));
            row_width += w;
        }
        rows.push(row);
    }

    rows
}
