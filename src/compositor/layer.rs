//! Layers and the composite they form.
//!
//! A composite is at most two stacked layers: an optional background and the
//! colorized overlay. Where a mask is present, each output pixel shows either
//! the overlay or the background, never a blend of the two.

use rayon::prelude::*;
use ndarray::{Array2, Array3, Axis};

use crate::colormap::Colormap;
use crate::field::ValueRange;

/// One scalar layer plus the palette and range used to color it.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub data: Array2<f32>,
    pub colormap: Colormap,
    pub range: ValueRange,
}

impl Layer {
    pub fn new(data: Array2<f32>, colormap: Colormap, range: ValueRange) -> Self {
        Self { data, colormap, range }
    }

    /// Layer normalized to its own data extent.
    ///
    /// A constant layer has a zero-width extent and maps entirely to the low
    /// end of its palette.
    pub fn autoscaled(data: Array2<f32>, colormap: Colormap) -> Self {
        let (min, max) = data
            .iter()
            .filter(|v| !v.is_nan())
            .fold(None, |acc: Option<(f32, f32)>, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
            .unwrap_or((0.0, 0.0));
        Self::new(data, colormap, ValueRange::new(min, max))
    }

    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }

    #[inline]
    pub fn color_at(&self, y: usize, x: usize) -> [u8; 4] {
        self.colormap.apply(self.range.normalize(self.data[[y, x]]))
    }

    /// Colorize the whole layer into an RGBA array `(height, width, 4)`.
    pub fn colorize(&self) -> Array3<u8> {
        let (height, width) = self.dim();
        let mut output = Array3::<u8>::zeros((height, width, 4));
        output
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(y, mut row)| {
                for x in 0..width {
                    let rgba = self.color_at(y, x);
                    for c in 0..4 {
                        row[[x, c]] = rgba[c];
                    }
                }
            });
        output
    }
}

/// Colorbar description: the numeric span and the palette it shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Legend {
    pub range: ValueRange,
    pub colormap: Colormap,
}

impl Legend {
    /// Colors of the bar from top (`range.max`) to bottom (`range.min`).
    pub fn gradient(&self, steps: usize) -> Vec<[u8; 4]> {
        if steps == 0 {
            return Vec::new();
        }
        let last = (steps - 1).max(1) as f32;
        (0..steps)
            .map(|i| self.colormap.apply(1.0 - i as f32 / last))
            .collect()
    }
}

/// Renderable result of the compositor.
#[derive(Debug, Clone, PartialEq)]
pub struct Composite {
    /// Present only when a mask was supplied.
    pub background: Option<Layer>,
    pub overlay: Layer,
    /// Overlay visibility; `None` means the overlay covers every pixel.
    pub mask: Option<Array2<bool>>,
    pub legend: Legend,
    pub title: String,
    /// Whether coordinate ticks are drawn.
    pub axes: bool,
}

impl Composite {
    pub fn dim(&self) -> (usize, usize) {
        self.overlay.dim()
    }

    #[inline]
    pub fn is_overlay_visible(&self, y: usize, x: usize) -> bool {
        self.mask.as_ref().map_or(true, |m| m[[y, x]])
    }

    /// Visible color at a pixel: overlay where the mask is set, background elsewhere.
    pub fn color_at(&self, y: usize, x: usize) -> [u8; 4] {
        match &self.background {
            Some(background) if !self.is_overlay_visible(y, x) => background.color_at(y, x),
            _ => self.overlay.color_at(y, x),
        }
    }

    /// Flatten both layers into one RGBA array `(height, width, 4)`.
    pub fn visible_rgba(&self) -> Array3<u8> {
        let (height, width) = self.dim();
        let mut output = Array3::<u8>::zeros((height, width, 4));
        output
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(y, mut row)| {
                for x in 0..width {
                    let rgba = self.color_at(y, x);
                    for c in 0..4 {
                        row[[x, c]] = rgba[c];
                    }
                }
            });
        output
    }
}
