//! Color types, RGB↔HSL conversion and the shading-preserving paint blend.

mod blend;
mod feather;

#[cfg(test)]
mod tests;

use std::fmt;

use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::math::wrap_degrees;

pub use blend::{apply_paint_color, apply_paint_with_edge_fade, lighting_factor};
pub use feather::{compute_edge_distances, paint_region, painted_mask};

/// 8-bit RGB color. Serializes as a `"#rrggbb"` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid hex color '{0}', expected #rrggbb")]
pub struct ParseHexError(pub String);

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Rounds each channel to the nearest integer and clamps it to [0, 255].
    pub fn from_f64_clamped(r: f64, g: f64, b: f64) -> Self {
        let channel = |v: f64| v.round().clamp(0.0, 255.0) as u8;
        Self::new(channel(r), channel(g), channel(b))
    }

    pub fn from_hex(hex: &str) -> Result<Self, ParseHexError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let err = || ParseHexError(hex.to_string());
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(err());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| err())
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Channels as `f64` in [0, 255].
    pub fn to_dvec3(self) -> DVec3 {
        DVec3::new(self.r as f64, self.g as f64, self.b as f64)
    }

    pub fn to_hsl(self) -> Hsl {
        Hsl::from_unit_rgb(self.to_dvec3() / 255.0)
    }

    pub fn from_hsl(hsl: Hsl) -> Self {
        let rgb = hsl.to_unit_rgb() * 255.0;
        Self::from_f64_clamped(rgb.x, rgb.y, rgb.z)
    }

    /// Linear interpolation toward `other`; `t` is clamped to [0, 1].
    pub fn lerp(self, other: Rgb, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mixed = self.to_dvec3().lerp(other.to_dvec3(), t);
        Self::from_f64_clamped(mixed.x, mixed.y, mixed.z)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(rgb: Rgb) -> Self {
        rgb.to_array()
    }
}

impl From<Rgb> for String {
    fn from(rgb: Rgb) -> Self {
        rgb.to_hex()
    }
}

impl TryFrom<String> for Rgb {
    type Error = ParseHexError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&value)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Hue in degrees [0, 360), saturation and lightness in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    /// Converts RGB channels in [0, 1].
    pub fn from_unit_rgb(rgb: DVec3) -> Self {
        let (r, g, b) = (rgb.x, rgb.y, rgb.z);
        let max = rgb.max_element();
        let min = rgb.min_element();
        let l = (max + min) / 2.0;

        let d = max - min;
        if d == 0.0 {
            return Self::new(0.0, 0.0, l);
        }

        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };

        let sector = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        Self::new(wrap_degrees(sector * 60.0), s, l)
    }

    /// Converts to RGB channels in [0, 1].
    pub fn to_unit_rgb(self) -> DVec3 {
        let s = self.s.clamp(0.0, 1.0);
        let l = self.l.clamp(0.0, 1.0);
        if s == 0.0 {
            return DVec3::splat(l);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let h = wrap_degrees(self.h) / 360.0;

        DVec3::new(
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
        )
    }
}

/// Standard sector interpolation; `t` is a hue fraction that may be off by one turn.
fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

/// RGB → HSL for 8-bit colors.
pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    rgb.to_hsl()
}

/// HSL → RGB, channels rounded to the nearest integer in [0, 255].
pub fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    Rgb::from_hsl(hsl)
}
