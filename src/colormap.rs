//! Colormaps used to colorize intensity layers.
//!
//! Colormaps take a normalized value in `[0, 1]` and return RGBA bytes.
//! Names follow the matplotlib spelling (`"gray"`, `"gray_r"`, `"viridis"`,
//! `"hot"`, `"jet"`) so pipelines can pass the same identifiers through.

use std::fmt;
use std::str::FromStr;

use crate::error::PseudocolorError;

/// Anchor colors of an approximate viridis, evenly spaced over `[0, 1]`.
const VIRIDIS: [(f32, f32, f32); 5] = [
    (0.267, 0.005, 0.329),
    (0.229, 0.322, 0.546),
    (0.128, 0.567, 0.551),
    (0.369, 0.789, 0.383),
    (0.993, 0.906, 0.144),
];

/// Available colormaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Colormap {
    /// Black to white.
    Gray,
    /// White to black.
    GrayReversed,
    /// Dark purple to teal to yellow.
    #[default]
    Viridis,
    /// Black to red to yellow to white.
    Hot,
    /// Blue to cyan to yellow to red.
    Jet,
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Colormap::Gray => "gray",
            Colormap::GrayReversed => "gray_r",
            Colormap::Viridis => "viridis",
            Colormap::Hot => "hot",
            Colormap::Jet => "jet",
        };
        f.write_str(name)
    }
}

impl FromStr for Colormap {
    type Err = PseudocolorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gray" | "grey" => Ok(Colormap::Gray),
            "gray_r" | "grey_r" => Ok(Colormap::GrayReversed),
            "viridis" => Ok(Colormap::Viridis),
            "hot" => Ok(Colormap::Hot),
            "jet" => Ok(Colormap::Jet),
            _ => Err(PseudocolorError::UnknownColormap(s.to_string())),
        }
    }
}

#[inline]
fn to_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

impl Colormap {
    /// Apply the colormap to a normalized value and return RGBA bytes.
    ///
    /// Values outside `[0, 1]` are clamped; NaN maps like 0.
    #[must_use]
    pub fn apply(self, t: f32) -> [u8; 4] {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Colormap::Gray => {
                let v = to_u8(t);
                [v, v, v, 255]
            }
            Colormap::GrayReversed => {
                let v = to_u8(1.0 - t);
                [v, v, v, 255]
            }
            Colormap::Viridis => {
                let scaled = t * (VIRIDIS.len() - 1) as f32;
                let idx = (scaled as usize).min(VIRIDIS.len() - 2);
                let frac = scaled - idx as f32;
                let (r1, g1, b1) = VIRIDIS[idx];
                let (r2, g2, b2) = VIRIDIS[idx + 1];
                [
                    to_u8(r1 + (r2 - r1) * frac),
                    to_u8(g1 + (g2 - g1) * frac),
                    to_u8(b1 + (b2 - b1) * frac),
                    255,
                ]
            }
            Colormap::Hot => {
                // Red ramps over the first 3/8, green the next 3/8, blue the rest
                let r = (t / 0.375).min(1.0);
                let g = ((t - 0.375) / 0.375).clamp(0.0, 1.0);
                let b = ((t - 0.75) / 0.25).clamp(0.0, 1.0);
                [to_u8(r), to_u8(g), to_u8(b), 255]
            }
            Colormap::Jet => {
                let channel = |center: f32| (1.5 - (4.0 * t - center).abs()).clamp(0.0, 1.0);
                [to_u8(channel(3.0)), to_u8(channel(2.0)), to_u8(channel(1.0)), 255]
            }
        }
    }

    /// Map a raw sample through `[min, max]` and then through the colormap.
    ///
    /// A zero-width range maps every sample to the low end.
    #[must_use]
    pub fn apply_in_range(self, value: f32, min: f32, max: f32) -> [u8; 4] {
        let span = max - min;
        let t = if span > 0.0 { (value - min) / span } else { 0.0 };
        self.apply(t)
    }

    /// Perceived brightness of a colormap output (BT.709 luma, 0-255).
    #[must_use]
    pub fn luma(rgba: [u8; 4]) -> f32 {
        0.2126 * rgba[0] as f32 + 0.7152 * rgba[1] as f32 + 0.0722 * rgba[2] as f32
    }
}
