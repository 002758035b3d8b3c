use serde::{Deserialize, Serialize};
use std::fmt;

/// RGBA color representation with f32 components in [0.0, 1.0] range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Create a new RGBA color.
    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color (alpha = 1.0).
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from a hex string (e.g., "#1A1A1A" or "#1A1A1AFF").
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let hex = hex.trim_start_matches('#');
        if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
            return Err(ColorError::InvalidHex(hex.to_string()));
        }
        let channel = |i: usize| -> Result<f32, ColorError> {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| ColorError::InvalidHex(hex.to_string()))
        };
        let a = if hex.len() == 8 { channel(6)? } else { 1.0 };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }

    /// Convert to RGBA u8 tuple.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |c: f32| (c * 255.0).round().clamp(0.0, 255.0) as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    // --- Named constants ---

    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    // Diagram palette. Values match the hex codes in the trailing comments.

    pub const GRAY: Color = Color {
        r: 0.5333,
        g: 0.5333,
        b: 0.5333,
        a: 1.0,
    }; // #888888
    pub const RED: Color = Color {
        r: 0.9882,
        g: 0.3843,
        b: 0.3333,
        a: 1.0,
    }; // #FC6255
    pub const RED_A: Color = Color {
        r: 0.9686,
        g: 0.6314,
        b: 0.6392,
        a: 1.0,
    }; // #F7A1A3
    pub const PURPLE: Color = Color {
        r: 0.6039,
        g: 0.4471,
        b: 0.6745,
        a: 1.0,
    }; // #9A72AC
    pub const PURPLE_A: Color = Color {
        r: 0.7922,
        g: 0.6392,
        b: 0.9098,
        a: 1.0,
    }; // #CAA3E8
    pub const BLUE: Color = Color {
        r: 0.3451,
        g: 0.7686,
        b: 0.8667,
        a: 1.0,
    }; // #58C4DD
    pub const ORANGE: Color = Color {
        r: 1.0,
        g: 0.5255,
        b: 0.1843,
        a: 1.0,
    }; // #FF862F
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", r, g, b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", r, g, b, a)
        }
    }
}

impl std::str::FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ColorError {
    #[error("invalid hex color string: {0:?}")]
    InvalidHex(String),
}
