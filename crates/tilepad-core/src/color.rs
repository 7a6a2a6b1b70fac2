use crate::error::TilePadError;
use image::Rgba;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Straight (non-premultiplied) RGBA8 color.
///
/// Text form is `#RGB`, `#RRGGBB`, or `#AARRGGBB` with alpha first. Formatting
/// writes `#RRGGBB` for opaque colors and `#AARRGGBB` otherwise, so values
/// round-trip through project files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, self.a])
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::MAGENTA
    }
}

impl FromStr for Color {
    type Err = TilePadError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TilePadError::InvalidColor(s.to_string()));
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
        let parsed = match hex.len() {
            3 => {
                let nib = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|v| v * 17);
                nib(0).and_then(|r| Ok(Color::rgb(r, nib(1)?, nib(2)?)))
            }
            6 => byte(0).and_then(|r| Ok(Color::rgb(r, byte(2)?, byte(4)?))),
            8 => byte(0).and_then(|a| Ok(Color::rgba(byte(2)?, byte(4)?, byte(6)?, a))),
            _ => return Err(TilePadError::InvalidColor(s.to_string())),
        };
        parsed.map_err(|_| TilePadError::InvalidColor(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = TilePadError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "#{:02X}{:02X}{:02X}{:02X}",
                self.a, self.r, self.g, self.b
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_long_and_alpha_forms() {
        assert_eq!("#F0F".parse::<Color>().unwrap(), Color::MAGENTA);
        assert_eq!("#FF00FF".parse::<Color>().unwrap(), Color::MAGENTA);
        assert_eq!("336699".parse::<Color>().unwrap(), Color::rgb(0x33, 0x66, 0x99));
        assert_eq!(
            "#80102030".parse::<Color>().unwrap(),
            Color::rgba(0x10, 0x20, 0x30, 0x80)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!("#12345".parse::<Color>().is_err());
        assert!("#GG0000".parse::<Color>().is_err());
        assert!("".parse::<Color>().is_err());
    }

    #[test]
    fn display_matches_parse() {
        let c = Color::rgba(1, 2, 3, 4);
        assert_eq!(c.to_string(), "#04010203");
        assert_eq!(c.to_string().parse::<Color>().unwrap(), c);
        assert_eq!(Color::MAGENTA.to_string(), "#FF00FF");
    }
}
