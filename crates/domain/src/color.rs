//! Color literal parsing and encoding.
//!
//! Colors are held as [`Rgba`], four channels in the `0.0..=1.0` range, which is
//! how the host store represents them. Literals are accepted in these grammars:
//!
//! - Hex: `#rgb`, `#rrggbb`, and the alpha forms `#rgba`, `#rrggbbaa`
//! - RGB: `rgb(r, g, b)` and `rgba(r, g, b, a)`, channels `0..=255`, alpha `0..=1`
//! - HSL: `hsl(h, s%, l%)` and `hsla(h, s%, l%, a)`, hue `0..=360`, percentages `0..=100`
//!
//! # Example
//!
//! ```
//! use varsync_domain::color::{ColorFormat, Rgba};
//!
//! let color = Rgba::parse("hsl(120, 50%, 50%)").unwrap();
//! assert_eq!(color.encode(ColorFormat::Hex), "#40bf40");
//! assert_eq!(color.encode(ColorFormat::Rgba), "rgba(64, 191, 64, 1.00)");
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use thiserror::Error;

static HEX_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3,4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").expect("valid regex")
});

static RGB_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^rgb\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*\)$")
        .expect("valid regex")
});

static RGBA_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^rgba\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d*\.?\d+)\s*\)$",
    )
    .expect("valid regex")
});

static HSL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^hsl\(\s*(\d{1,3})\s*,\s*(\d{1,3})%?\s*,\s*(\d{1,3})%?\s*\)$")
        .expect("valid regex")
});

static HSLA_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^hsla\(\s*(\d{1,3})\s*,\s*(\d{1,3})%?\s*,\s*(\d{1,3})%?\s*,\s*(\d*\.?\d+)\s*\)$",
    )
    .expect("valid regex")
});

/// Errors produced when a color literal cannot be parsed.
///
/// The variant tells which grammar the literal was recognised as, so callers
/// can report a precise error code.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// The literal does not look like any supported color grammar.
    #[error("unknown color format: {0}")]
    UnknownFormat(String),

    /// Shaped like `rgb(...)` but a channel is out of range.
    #[error("{0} is an invalid RGB value")]
    InvalidRgb(String),

    /// Shaped like `rgba(...)` but a channel or the alpha is out of range.
    #[error("{0} is an invalid RGBA value")]
    InvalidRgba(String),

    /// Shaped like `hsl(...)` but a component is out of range.
    #[error("{0} is an invalid HSL value")]
    InvalidHsl(String),

    /// Shaped like `hsla(...)` but a component or the alpha is out of range.
    #[error("{0} is an invalid HSLA value")]
    InvalidHsla(String),
}

/// String encodings the exporter can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColorFormat {
    /// `#rrggbb`
    #[default]
    Hex,
    /// `#rrggbbaa`
    Hexa,
    /// `rgb(r, g, b)`
    Rgb,
    /// `rgba(r, g, b, a)`
    Rgba,
    /// `hsl(h, s%, l%)`
    Hsl,
    /// `hsla(h, s%, l%, a)`
    Hsla,
}

impl ColorFormat {
    /// All encodings, in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Hex,
            Self::Hexa,
            Self::Rgb,
            Self::Rgba,
            Self::Hsl,
            Self::Hsla,
        ]
    }

    /// Wire name of the encoding.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hex => "HEX",
            Self::Hexa => "HEXA",
            Self::Rgb => "RGB",
            Self::Rgba => "RGBA",
            Self::Hsl => "HSL",
            Self::Hsla => "HSLA",
        }
    }

    /// Returns true if the encoding carries the alpha channel.
    #[must_use]
    pub const fn has_alpha(&self) -> bool {
        matches!(self, Self::Hexa | Self::Rgba | Self::Hsla)
    }
}

impl fmt::Display for ColorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|format| format.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown color format '{s}'"))
    }
}

/// A color with red, green, blue and alpha channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
    /// Alpha channel.
    #[serde(default = "opaque")]
    pub a: f64,
}

const fn opaque() -> f64 {
    1.0
}

impl Rgba {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a color from normalized channels.
    #[must_use]
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color from 8-bit channels.
    #[must_use]
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
            1.0,
        )
    }

    /// Parses a color literal in any supported grammar.
    ///
    /// # Errors
    ///
    /// Returns a [`ColorError`] naming the grammar the literal was matched
    /// against, or [`ColorError::UnknownFormat`] if none applies.
    pub fn parse(input: &str) -> Result<Self, ColorError> {
        if HEX_PATTERN.is_match(input) {
            return Ok(Self::parse_hex(&input[1..]));
        }

        if let Some(caps) = RGB_PATTERN.captures(input) {
            let [r, g, b] = rgb_channels(&caps).ok_or_else(|| ColorError::InvalidRgb(input.into()))?;
            return Ok(Self::from_rgb8(r, g, b));
        }

        if let Some(caps) = RGBA_PATTERN.captures(input) {
            let invalid = || ColorError::InvalidRgba(input.into());
            let [r, g, b] = rgb_channels(&caps).ok_or_else(invalid)?;
            let a = alpha(&caps[4]).ok_or_else(invalid)?;
            return Ok(Self { a, ..Self::from_rgb8(r, g, b) });
        }

        if let Some(caps) = HSL_PATTERN.captures(input) {
            let [h, s, l] = hsl_components(&caps).ok_or_else(|| ColorError::InvalidHsl(input.into()))?;
            return Ok(Self::from_hsl(h, s, l, 1.0));
        }

        if let Some(caps) = HSLA_PATTERN.captures(input) {
            let invalid = || ColorError::InvalidHsla(input.into());
            let [h, s, l] = hsl_components(&caps).ok_or_else(invalid)?;
            let a = alpha(&caps[4]).ok_or_else(invalid)?;
            return Ok(Self::from_hsl(h, s, l, a));
        }

        Err(ColorError::UnknownFormat(input.to_string()))
    }

    /// Returns true if the literal parses as a color.
    #[must_use]
    pub fn is_valid(input: &str) -> bool {
        Self::parse(input).is_ok()
    }

    /// Expands a 3, 4, 6 or 8 digit hex body (already pattern-checked).
    fn parse_hex(hex: &str) -> Self {
        let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).unwrap_or(0);
        let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);

        let channels: Vec<u8> = match hex.len() {
            3 | 4 => (0..hex.len()).map(|i| digit(i) * 17).collect(),
            _ => (0..hex.len()).step_by(2).map(pair).collect(),
        };

        let alpha = channels.get(3).map_or(1.0, |a| f64::from(*a) / 255.0);
        Self {
            a: alpha,
            ..Self::from_rgb8(channels[0], channels[1], channels[2])
        }
    }

    /// Converts hue (degrees) and saturation/lightness (percent) to RGB.
    fn from_hsl(h: f64, s: f64, l: f64, a: f64) -> Self {
        let s = s / 100.0;
        let l = l / 100.0;

        if s == 0.0 {
            return Self::new(l, l, l, a);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let hk = h / 360.0;

        Self::new(
            hue_to_channel(p, q, hk + 1.0 / 3.0),
            hue_to_channel(p, q, hk),
            hue_to_channel(p, q, hk - 1.0 / 3.0),
            a,
        )
    }

    /// The 8-bit channels, rounded.
    #[must_use]
    pub fn to_rgb8(&self) -> [u8; 3] {
        [to_u8(self.r), to_u8(self.g), to_u8(self.b)]
    }

    /// Hue in degrees and saturation/lightness in percent, all rounded.
    ///
    /// Computed from the rounded 8-bit channels so that every encoding of the
    /// same color agrees.
    #[must_use]
    pub fn to_hsl(&self) -> [u16; 3] {
        let [r, g, b] = self.to_rgb8().map(|c| f64::from(c) / 255.0);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = f64::midpoint(max, min);

        if (max - min).abs() < f64::EPSILON {
            return [0, 0, round_u16(l * 100.0)];
        }

        let d = max - min;
        let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
        let h = if (max - r).abs() < f64::EPSILON {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if (max - g).abs() < f64::EPSILON {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        [round_u16(h * 60.0) % 360, round_u16(s * 100.0), round_u16(l * 100.0)]
    }

    /// Encodes the color as a string in the given format.
    #[must_use]
    pub fn encode(&self, format: ColorFormat) -> String {
        let [r, g, b] = self.to_rgb8();
        let alpha = self.a.clamp(0.0, 1.0);

        match format {
            ColorFormat::Hex => format!("#{r:02x}{g:02x}{b:02x}"),
            ColorFormat::Hexa => format!("#{r:02x}{g:02x}{b:02x}{:02x}", to_u8(alpha)),
            ColorFormat::Rgb => format!("rgb({r}, {g}, {b})"),
            ColorFormat::Rgba => format!("rgba({r}, {g}, {b}, {alpha:.2})"),
            ColorFormat::Hsl => {
                let [h, s, l] = self.to_hsl();
                format!("hsl({h}, {s}%, {l}%)")
            }
            ColorFormat::Hsla => {
                let [h, s, l] = self.to_hsl();
                format!("hsla({h}, {s}%, {l}%, {alpha:.2})")
            }
        }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::BLACK
    }
}

impl FromStr for Rgba {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn rgb_channels(caps: &Captures<'_>) -> Option<[u8; 3]> {
    let channel = |i: usize| caps[i].parse::<u8>().ok();
    Some([channel(1)?, channel(2)?, channel(3)?])
}

fn hsl_components(caps: &Captures<'_>) -> Option<[f64; 3]> {
    let component = |i: usize, max: u16| {
        caps[i]
            .parse::<u16>()
            .ok()
            .filter(|v| *v <= max)
            .map(f64::from)
    };
    Some([component(1, 360)?, component(2, 100)?, component(3, 100)?])
}

fn alpha(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|a| (0.0..=1.0).contains(a))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u8(channel: f64) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_u16(value: f64) -> u16 {
    value.max(0.0).round() as u16
}
