//! Multi-stop color gradients
//!
//! Colors are interpolated linearly between evenly spaced stops across the
//! characters of a text, left to right.

use ratatui::style::{Color, Style};
use ratatui::text::Span;

/// A 24-bit color stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a `0xRRGGBB` literal
    pub const fn hex(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        }
    }

    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Rgb::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::Rgb(rgb.r, rgb.g, rgb.b)
    }
}

/// Ordered color stops
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gradient {
    stops: Vec<Rgb>,
}

impl Gradient {
    pub fn new(stops: Vec<Rgb>) -> Self {
        Self { stops }
    }

    pub fn stops(&self) -> &[Rgb] {
        &self.stops
    }

    /// Color of character `index` in a text of `len` characters
    pub fn color_at(&self, index: usize, len: usize) -> Color {
        match self.stops.as_slice() {
            [] => Color::Reset,
            [only] => (*only).into(),
            stops => {
                if len <= 1 {
                    return stops[0].into();
                }
                let segments = stops.len() - 1;
                let position = index.min(len - 1) as f64 / (len - 1) as f64 * segments as f64;
                let segment = (position.floor() as usize).min(segments - 1);
                let t = position - segment as f64;
                stops[segment].lerp(stops[segment + 1], t).into()
            }
        }
    }

    /// Color every character of `text`, on top of `base`
    pub fn apply(&self, text: &str, base: Style) -> Vec<(char, Style)> {
        let len = text.chars().count();
        text.chars()
            .enumerate()
            .map(|(i, c)| (c, base.fg(self.color_at(i, len))))
            .collect()
    }

    /// Same as `apply`, as one span per character
    pub fn spans(&self, text: &str, base: Style) -> Vec<Span<'static>> {
        self.apply(text, base)
            .into_iter()
            .map(|(c, style)| Span::styled(c.to_string(), style))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_stops() -> Gradient {
        Gradient::new(vec![
            Rgb::hex(0x000000),
            Rgb::hex(0x808080),
            Rgb::hex(0xffffff),
        ])
    }

    #[test]
    fn test_hex_splits_channels() {
        assert_eq!(Rgb::hex(0xff5000), Rgb::new(0xff, 0x50, 0x00));
        assert_eq!(Rgb::hex(0x00afff), Rgb::new(0x00, 0xaf, 0xff));
    }

    #[test]
    fn test_endpoints_hit_first_and_last_stop() {
        let gradient = three_stops();
        assert_eq!(gradient.color_at(0, 11), Color::Rgb(0, 0, 0));
        assert_eq!(gradient.color_at(10, 11), Color::Rgb(255, 255, 255));
    }

    #[test]
    fn test_middle_character_hits_middle_stop() {
        let gradient = three_stops();
        assert_eq!(gradient.color_at(5, 11), Color::Rgb(0x80, 0x80, 0x80));
    }

    #[test]
    fn test_interpolates_between_stops() {
        let gradient = Gradient::new(vec![Rgb::hex(0x000000), Rgb::hex(0x640000)]);
        // 0x64 = 100, halfway is 50
        assert_eq!(gradient.color_at(1, 3), Color::Rgb(50, 0, 0));
    }

    #[test]
    fn test_single_character_and_single_stop() {
        let gradient = three_stops();
        assert_eq!(gradient.color_at(0, 1), Color::Rgb(0, 0, 0));

        let flat = Gradient::new(vec![Rgb::hex(0x123456)]);
        assert_eq!(flat.color_at(3, 9), Color::Rgb(0x12, 0x34, 0x56));

        let empty = Gradient::new(Vec::new());
        assert_eq!(empty.color_at(0, 4), Color::Reset);
    }

    #[test]
    fn test_apply_keeps_base_modifiers() {
        use ratatui::style::Modifier;
        let styled = three_stops().apply("abc", Style::default().add_modifier(Modifier::BOLD));
        assert_eq!(styled.len(), 3);
        assert!(styled
            .iter()
            .all(|(_, style)| style.add_modifier.contains(Modifier::BOLD)));
        assert_eq!(styled[0].0, 'a');
        assert_eq!(styled[0].1.fg, Some(Color::Rgb(0, 0, 0)));
    }
}
