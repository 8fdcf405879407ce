/// An opaque RGB color. Opacity is carried separately (blend alpha), the way
/// the backend's blend modes expect it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BLACK: Color = Color(0, 0, 0);
    pub const WHITE: Color = Color(255, 255, 255);
    pub const ORANGE: Color = Color(255, 165, 0);
    pub const PINK: Color = Color(255, 192, 203);
    pub const GRAY: Color = Color(128, 128, 128);

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Color(r, g, b)
    }

    /// Parses `#RRGGBB` (the `#` is optional). Malformed channels read as 0.
    pub fn from_hex(hex: &str) -> Self {
        let s = hex.trim_start_matches('#');
        if s.len() != 6 || !s.is_ascii() {
            return Color::BLACK;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&s[range], 16).unwrap_or(0);
        Color(channel(0..2), channel(2..4), channel(4..6))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }

    /// Packs as `0x00RRGGBB`, the layout immediate-mode backends take colors in.
    pub fn to_packed(self) -> u32 {
        (u32::from(self.0) << 16) | (u32::from(self.1) << 8) | u32::from(self.2)
    }
}

/// Clamps a wide integer into the `0..=255` alpha range.
pub fn clamp_alpha(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}
