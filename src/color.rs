//! Packed ARGB colors.

use std::fmt;
use std::str::FromStr;

use palette::{Srgb, Srgba};
use serde::{Deserialize, Serialize};

use crate::error::BadgeError;

/// A color packed as `0xAARRGGBB`.
///
/// Hex strings parse from `#rrggbb` (opaque), `#rgb` or the Android-style
/// `#aarrggbb`. Colors serialize back to the shortest lossless form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Self = Self(0xFFFF_FFFF);
    pub const BLACK: Self = Self(0xFF00_0000);
    pub const TRANSPARENT: Self = Self(0x0000_0000);

    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_argb(0xFF, r, g, b)
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Returns the color as `[r, g, b, a]`, the layout of an `image::Rgba<u8>`.
    pub const fn to_rgba(self) -> [u8; 4] {
        [self.red(), self.green(), self.blue(), self.alpha()]
    }
}

impl From<Srgba<u8>> for Color {
    fn from(color: Srgba<u8>) -> Self {
        Self::from_argb(color.alpha, color.red, color.green, color.blue)
    }
}

impl From<Srgb<u8>> for Color {
    fn from(color: Srgb<u8>) -> Self {
        Self::from_rgb(color.red, color.green, color.blue)
    }
}

impl From<Color> for Srgba<u8> {
    fn from(color: Color) -> Self {
        Srgba::new(color.red(), color.green(), color.blue(), color.alpha())
    }
}

impl FromStr for Color {
    type Err = BadgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(BadgeError::InvalidColor(s.to_string()));
        }
        match hex.len() {
            8 => u32::from_str_radix(hex, 16)
                .map(Color)
                .map_err(|_| BadgeError::InvalidColor(s.to_string())),
            3 | 6 => Srgb::<u8>::from_str(hex)
                .map(Color::from)
                .map_err(|_| BadgeError::InvalidColor(s.to_string())),
            _ => Err(BadgeError::InvalidColor(s.to_string())),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = BadgeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.alpha() == 0xFF {
            write!(f, "#{:06x}", self.0 & 0x00FF_FFFF)
        } else {
            write!(f, "#{:08x}", self.0)
        }
    }
}
