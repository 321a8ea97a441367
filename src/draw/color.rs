//! Chalk colors: `#rrggbb` parsing and RGBA conversion.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced while decoding a hex color.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("'{0}' is not a #rrggbb hex color")]
    InvalidHex(String),
}

/// Represents an RGBA color with floating-point components.
///
/// All components are in the range 0.0 (minimum) to 1.0 (maximum), which is
/// what Cairo expects for `set_source_rgba`.
///
/// # Examples
///
/// ```
/// use chalkboard::draw::Color;
/// let half_red = Color { r: 1.0, g: 0.0, b: 0.0, a: 0.5 };
/// assert_eq!(half_red.with_alpha(1.0).a, 1.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red component (0.0 = no red, 1.0 = full red)
    pub r: f64,
    /// Green component (0.0 = no green, 1.0 = full green)
    pub g: f64,
    /// Blue component (0.0 = no blue, 1.0 = full blue)
    pub b: f64,
    /// Alpha/transparency (0.0 = fully transparent, 1.0 = fully opaque)
    pub a: f64,
}

impl Color {
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Returns the same color with a different alpha.
    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Makes this color the current Cairo source.
    pub fn set_source(&self, ctx: &cairo::Context) {
        ctx.set_source_rgba(self.r, self.g, self.b, self.a);
    }
}

/// An opaque 8-bit-per-channel color as written in config files (`#0a3d0a`).
///
/// Alpha is never stored here; every draw call pairs the triplet with its own
/// opacity through [`HexColor::rgba`] or [`HexColor::to_color`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Default chalk color.
pub const CHALK_WHITE: HexColor = HexColor {
    r: 0xff,
    g: 0xff,
    b: 0xff,
};

/// Default board color, a dark green slate.
pub const SLATE_GREEN: HexColor = HexColor {
    r: 0x0a,
    g: 0x3d,
    b: 0x0a,
};

impl HexColor {
    /// Parses `#rrggbb`. The leading `#` is required, case is ignored.
    pub fn parse(hex: &str) -> Result<Self, ColorError> {
        let invalid = || ColorError::InvalidHex(hex.to_string());

        let digits = hex.trim().strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Component-wise decode paired with an alpha: `(r, g, b, a)`.
    pub fn rgba(&self, alpha: f64) -> (u8, u8, u8, f64) {
        (self.r, self.g, self.b, alpha)
    }

    /// Converts to a Cairo-ready [`Color`] with the given alpha.
    pub fn to_color(&self, alpha: f64) -> Color {
        Color {
            r: self.r as f64 / 255.0,
            g: self.g as f64 / 255.0,
            b: self.b as f64 / 255.0,
            a: alpha,
        }
    }
}

impl FromStr for HexColor {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Decodes `hex` and attaches `alpha` in one step.
pub fn hex_to_rgba(hex: &str, alpha: f64) -> Result<Color, ColorError> {
    HexColor::parse(hex).map(|color| color.to_color(alpha))
}
