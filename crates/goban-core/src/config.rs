//! Board configuration and theme.
//!
//! Every field has a default, so deserializing a partial JSON document
//! overrides only the keys it names, recursively.

use crate::geometry::{DEFAULT_COLUMN_LABELS, Viewport};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Smallest and largest supported grid dimension.
pub const MIN_BOARD_SIZE: u32 = 2;
pub const MAX_BOARD_SIZE: u32 = 52;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid board size {0} (expected 2..=52)")]
    InvalidSize(u32),
    #[error("Invalid color: {0}")]
    InvalidColor(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// RGBA8 color, serialized as `#rrggbb` or `#rrggbbaa`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Same color with alpha multiplied by `opacity`.
    pub fn with_opacity(self, opacity: f64) -> Self {
        let a = (self.a as f64 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    /// CSS color string (`#rrggbb`, or `rgba(...)` when translucent).
    pub fn to_css(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({},{},{},{})",
                self.r,
                self.g,
                self.b,
                (self.a as f64 / 255.0 * 1000.0).round() / 1000.0
            )
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl FromStr for Rgba {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let nibble = |i: usize| {
            u8::from_str_radix(&hex[i..i + 1], 16)
                .map(|v| v * 17)
                .map_err(|_| invalid())
        };
        match hex.len() {
            3 => Ok(Rgba::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            6 => Ok(Rgba::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Rgba::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Rgba {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_string()
    }
}

impl From<Rgba> for Color {
    fn from(color: Rgba) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Grid line styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridTheme {
    pub line_color: Rgba,
    pub line_width: f64,
    pub star_color: Rgba,
    pub star_size: f64,
}

impl Default for GridTheme {
    fn default() -> Self {
        Self {
            line_color: Rgba::rgb(0x65, 0x45, 0x25),
            line_width: 0.03,
            star_color: Rgba::rgb(0x55, 0x33, 0x11),
            star_size: 0.09,
        }
    }
}

/// Coordinate label styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatesTheme {
    pub color: Rgba,
    pub font_size: f64,
    pub font_family: String,
    /// Column labels, one character per column.
    pub labels_x: String,
}

impl Default for CoordinatesTheme {
    fn default() -> Self {
        Self {
            color: Rgba::rgb(0x55, 0x33, 0x11),
            font_size: 0.5,
            font_family: "Calibri, Tahoma, Arial, sans-serif".to_string(),
            labels_x: DEFAULT_COLUMN_LABELS.to_string(),
        }
    }
}

/// Marker (circle, square, label, ...) styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupTheme {
    /// Ink used on black stones.
    pub black_color: Rgba,
    /// Ink used on white stones.
    pub white_color: Rgba,
    /// Ink used on empty intersections.
    pub empty_color: Rgba,
    pub line_width: f64,
    pub font_family: String,
}

impl Default for MarkupTheme {
    fn default() -> Self {
        Self {
            black_color: Rgba::new(255, 255, 255, 230),
            white_color: Rgba::new(0, 0, 0, 230),
            empty_color: Rgba::new(0, 0, 0, 230),
            line_width: 0.05,
            font_family: "Calibri, Tahoma, Arial, sans-serif".to_string(),
        }
    }
}

/// Stone shadow styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowTheme {
    pub color: Rgba,
    pub blur: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for ShadowTheme {
    fn default() -> Self {
        Self {
            color: Rgba::new(0x23, 0x23, 0x23, 0x75),
            blur: 0.05,
            offset_x: 0.07,
            offset_y: 0.07,
        }
    }
}

/// Visual theme. Sizes are in grid units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub background_color: Rgba,
    pub background_image: Option<String>,
    /// Stone radius.
    pub stone_size: f64,
    /// Extra space around the frame.
    pub margin_size: f64,
    /// Base path prepended to image asset names.
    pub image_folder: String,
    pub grid: GridTheme,
    pub coordinates: CoordinatesTheme,
    pub markup: MarkupTheme,
    pub shadow: ShadowTheme,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            background_color: Rgba::rgb(0xce, 0xb0, 0x53),
            background_image: None,
            stone_size: 0.47,
            margin_size: 0.25,
            image_folder: String::new(),
            grid: GridTheme::default(),
            coordinates: CoordinatesTheme::default(),
            markup: MarkupTheme::default(),
            shadow: ShadowTheme::default(),
        }
    }
}

/// Resolved board configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Grid dimension.
    pub size: u32,
    /// Explicit surface width in pixels.
    pub width: Option<f64>,
    /// Explicit surface height in pixels.
    pub height: Option<f64>,
    /// Show coordinate labels.
    pub coordinates: bool,
    pub viewport: Viewport,
    pub theme: ThemeConfig,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            size: 19,
            width: None,
            height: None,
            coordinates: false,
            viewport: Viewport::default(),
            theme: ThemeConfig::default(),
        }
    }
}

impl BoardConfig {
    /// Parse a (possibly partial) JSON configuration over the defaults.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: BoardConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check values serde cannot express.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_size(self.size)
    }

    /// Builder-style size override.
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Builder-style coordinates toggle.
    pub fn with_coordinates(mut self, coordinates: bool) -> Self {
        self.coordinates = coordinates;
        self
    }

    /// Builder-style viewport override.
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }
}

/// Check a grid dimension.
pub fn validate_size(size: u32) -> ConfigResult<()> {
    if (MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
        Ok(())
    } else {
        Err(ConfigError::InvalidSize(size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = BoardConfig::from_json(
            r##"{ "size": 13, "theme": { "stone_size": 0.45, "grid": { "line_color": "#000" } } }"##,
        )
        .unwrap();
        assert_eq!(config.size, 13);
        assert_eq!(config.theme.stone_size, 0.45);
        assert_eq!(config.theme.grid.line_color, Rgba::BLACK);
        // Untouched nested values come from the defaults.
        assert_eq!(config.theme.grid.star_size, GridTheme::default().star_size);
        assert_eq!(config.theme.margin_size, ThemeConfig::default().margin_size);
        assert_eq!(config.viewport, Viewport::default());
    }

    #[test]
    fn test_invalid_size_rejected() {
        assert!(matches!(
            BoardConfig::from_json(r#"{ "size": 1 }"#),
            Err(ConfigError::InvalidSize(1))
        ));
    }

    #[test]
    fn test_invalid_color_rejected() {
        let result = BoardConfig::from_json(r#"{ "theme": { "background_color": "brown" } }"#);
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_color_parsing() {
        assert_eq!("#ff8000".parse::<Rgba>().unwrap(), Rgba::rgb(255, 128, 0));
        assert_eq!("#fff".parse::<Rgba>().unwrap(), Rgba::WHITE);
        assert_eq!("#00000080".parse::<Rgba>().unwrap(), Rgba::new(0, 0, 0, 128));
        assert!("#12345".parse::<Rgba>().is_err());
        assert!("ffffff".parse::<Rgba>().is_err());
    }

    #[test]
    fn test_color_css() {
        assert_eq!(Rgba::rgb(1, 2, 3).to_css(), "#010203");
        assert_eq!(Rgba::new(0, 0, 0, 0).to_css(), "rgba(0,0,0,0)");
        assert_eq!(Rgba::WHITE.with_opacity(0.5).a, 128);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = BoardConfig::default().with_size(9).with_coordinates(true);
        let json = config.to_json().unwrap();
        assert_eq!(BoardConfig::from_json(&json).unwrap(), config);
    }
}
