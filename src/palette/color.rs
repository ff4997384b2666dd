//! Color values and named color schemes.

use crate::error::{ForgeError, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static HEX_COLOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#?([0-9A-Fa-f]{6})$").expect("Invalid hex color regex"));

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    /// Parse a `#RRGGBB` (or `RRGGBB`) string.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let caps = HEX_COLOR_REGEX.captures(hex.trim())?;
        let digits = caps.get(1)?.as_str();
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Rgb([channel(0)?, channel(2)?, channel(4)?]))
    }

    /// Channels as floating point coordinates in RGB space.
    pub fn to_point(self) -> [f64; 3] {
        let [r, g, b] = self.0;
        [r as f64, g as f64, b as f64]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{:02X}{:02X}{:02X}", r, g, b)
    }
}

/// A named, non-empty set of target colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorScheme {
    pub name: String,
    pub colors: Vec<Rgb>,
}

impl ColorScheme {
    /// Build a scheme from hex strings.
    ///
    /// Fails with `PaletteEmpty` when no colors are given and with
    /// `ConfigError` when an entry is not a valid `#RRGGBB` value.
    pub fn from_hex_list<S: AsRef<str>>(name: &str, hex_colors: &[S]) -> Result<Self> {
        if hex_colors.is_empty() {
            return Err(ForgeError::PaletteEmpty(name.to_string()));
        }

        let colors = hex_colors
            .iter()
            .map(|hex| {
                Rgb::from_hex(hex.as_ref()).ok_or_else(|| {
                    ForgeError::ConfigError(format!(
                        "color scheme '{}' has invalid color '{}' (expected #RRGGBB)",
                        name,
                        hex.as_ref()
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: name.to_string(),
            colors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_with_and_without_hash() {
        assert_eq!(Rgb::from_hex("#C56D70"), Some(Rgb([0xC5, 0x6D, 0x70])));
        assert_eq!(Rgb::from_hex("241b28"), Some(Rgb([0x24, 0x1B, 0x28])));
        assert_eq!(Rgb::from_hex("  #FFFFFF "), Some(Rgb([255, 255, 255])));
    }

    #[test]
    fn rejects_malformed_hex() {
        assert_eq!(Rgb::from_hex("#FFF"), None);
        assert_eq!(Rgb::from_hex("#GGGGGG"), None);
        assert_eq!(Rgb::from_hex(""), None);
    }

    #[test]
    fn display_is_uppercase_hex() {
        assert_eq!(Rgb([0x4d, 0xb5, 0xbf]).to_string(), "#4DB5BF");
    }

    #[test]
    fn empty_scheme_is_palette_empty() {
        let empty: [&str; 0] = [];
        let err = ColorScheme::from_hex_list("Void", &empty).unwrap_err();
        assert!(matches!(err, ForgeError::PaletteEmpty(name) if name == "Void"));
    }

    #[test]
    fn invalid_entry_names_scheme_and_value() {
        let err = ColorScheme::from_hex_list("Dusk", &["#000000", "nope"]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Dusk"));
        assert!(msg.contains("nope"));
    }
}
