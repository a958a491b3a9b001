use crate::error::MetroplotError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (the `#` is optional).
    pub fn hex(s: &str) -> Result<Self, MetroplotError> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        let invalid = || MetroplotError::InvalidColor(s.to_string());
        if !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize, width: usize| -> Result<u8, MetroplotError> {
            let value = u8::from_str_radix(&digits[i..i + width], 16).map_err(|_| invalid())?;
            Ok(if width == 1 { value * 17 } else { value })
        };

        match digits.len() {
            3 => Ok(Self::rgb(channel(0, 1)?, channel(1, 1)?, channel(2, 1)?)),
            6 => Ok(Self::rgb(channel(0, 2)?, channel(2, 2)?, channel(4, 2)?)),
            8 => Ok(Self::rgba(
                channel(0, 2)?,
                channel(2, 2)?,
                channel(4, 2)?,
                channel(6, 2)? as f64 / 255.0,
            )),
            _ => Err(invalid()),
        }
    }

    /// Single-letter and common color names.
    pub fn named(name: &str) -> Option<Self> {
        let color = match name.to_ascii_lowercase().as_str() {
            "k" | "black" => Self::BLACK,
            "w" | "white" => Self::WHITE,
            "r" | "red" => Self::rgb(255, 0, 0),
            "g" | "green" => Self::rgb(0, 128, 0),
            "b" | "blue" => Self::rgb(0, 0, 255),
            "c" | "cyan" => Self::rgb(0, 191, 191),
            "m" | "magenta" => Self::rgb(191, 0, 191),
            "y" | "yellow" => Self::rgb(191, 191, 0),
            "gray" | "grey" => Self::rgb(128, 128, 128),
            "none" | "transparent" => Self::rgba(0, 0, 0, 0.0),
            _ => return None,
        };
        Some(color)
    }

    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }

    pub fn to_svg_fill(&self) -> String {
        if self.is_transparent() {
            "none".to_string()
        } else if (self.a - 1.0).abs() < 1e-6 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a)
        }
    }

    /// `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let rgb = format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b);
        if (self.a - 1.0).abs() < 1e-6 {
            rgb
        } else {
            let alpha = (self.a.clamp(0.0, 1.0) * 255.0).round() as u8;
            format!("{}{:02x}", rgb, alpha)
        }
    }
}

impl FromStr for Color {
    type Err = MetroplotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match Color::named(s) {
            Some(color) => Ok(color),
            None => Color::hex(s),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_svg_fill())
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Rail colors: one color for every rail, or one per dominating level.
///
/// Deserializes from either a color string or a `{level: color}` map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Palette {
    Uniform(Color),
    PerLevel(HashMap<String, Color>),
}

impl Palette {
    /// Build a per-level palette by pairing levels with colors in order.
    pub fn per_level<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Color)>,
        S: Into<String>,
    {
        Palette::PerLevel(pairs.into_iter().map(|(l, c)| (l.into(), c)).collect())
    }

    pub fn resolve(&self, level: &str) -> Result<Color, MetroplotError> {
        match self {
            Palette::Uniform(color) => Ok(*color),
            Palette::PerLevel(colors) => colors
                .get(level)
                .copied()
                .ok_or_else(|| MetroplotError::MissingColor(level.to_string())),
        }
    }
}

impl From<Color> for Palette {
    fn from(color: Color) -> Self {
        Palette::Uniform(color)
    }
}

/// ColorBrewer "Paired" qualitative palette.
pub const PAIRED: [Color; 10] = [
    Color::rgb(0xa6, 0xce, 0xe3),
    Color::rgb(0x1f, 0x78, 0xb4),
    Color::rgb(0xb2, 0xdf, 0x8a),
    Color::rgb(0x33, 0xa0, 0x2c),
    Color::rgb(0xfb, 0x9a, 0x99),
    Color::rgb(0xe3, 0x1a, 0x1c),
    Color::rgb(0xfd, 0xbf, 0x6f),
    Color::rgb(0xff, 0x7f, 0x00),
    Color::rgb(0xca, 0xb2, 0xd6),
    Color::rgb(0x6a, 0x3d, 0x9a),
];
