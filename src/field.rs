//! Intensity field validation and range clamping.
//!
//! An intensity field is a single-channel image of arbitrary numeric range,
//! held as `(height, width)`. Inputs arrive with dynamic dimensionality (as
//! they do from numpy or flat buffers) and are validated into owned 2D
//! arrays before anything else touches them, so caller buffers are never
//! mutated.

use ndarray::{Array2, ArrayView2, ArrayViewD, Ix2};

use crate::error::{PseudocolorError, Result};

/// Clamp bounds applied to the field before colorization.
///
/// Also the normalization range of every colormap lookup and the numeric
/// span of the colorbar legend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl Default for ValueRange {
    fn default() -> Self {
        Self { min: 0.0, max: 255.0 }
    }
}

impl ValueRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Clamp a single sample.
    ///
    /// The upper bound is applied first, then the lower bound, so an inverted
    /// range (`min > max`) resolves every sample to `min`.
    #[inline]
    pub fn clamp(&self, v: f32) -> f32 {
        let v = if v > self.max { self.max } else { v };
        if v < self.min {
            self.min
        } else {
            v
        }
    }

    /// Normalize a sample into `[0, 1]` for colormap lookup.
    #[inline]
    pub fn normalize(&self, v: f32) -> f32 {
        let span = self.max - self.min;
        if span > 0.0 {
            ((v - self.min) / span).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Validate that `input` is a single-channel field and copy it out.
///
/// # Errors
/// `PseudocolorError::Shape` when the input does not have exactly two
/// dimensions.
pub fn ensure_grayscale(input: ArrayViewD<f32>) -> Result<Array2<f32>> {
    let ndim = input.ndim();
    input
        .into_dimensionality::<Ix2>()
        .map(|view| view.to_owned())
        .map_err(|_| PseudocolorError::Shape { ndim })
}

/// Validate a mask buffer and convert it to booleans (`> 0` is selected).
///
/// Accepts both 0/1 and 0/255 encodings.
pub fn mask_from_u8(input: ArrayViewD<u8>) -> Result<Array2<bool>> {
    let ndim = input.ndim();
    input
        .into_dimensionality::<Ix2>()
        .map(|view| view.mapv(|v| v > 0))
        .map_err(|_| PseudocolorError::MaskDimensions { ndim })
}

/// Convert an 8-bit grayscale field to the f32 representation used here.
pub fn field_from_u8(input: ArrayViewD<u8>) -> Result<Array2<f32>> {
    let ndim = input.ndim();
    input
        .into_dimensionality::<Ix2>()
        .map(|view| view.mapv(f32::from))
        .map_err(|_| PseudocolorError::Shape { ndim })
}

/// Clamp every sample of a field into `range`, returning a new array.
///
/// Always applied, even for the default range; clamping is idempotent.
pub fn clamp_range(field: ArrayView2<f32>, range: ValueRange) -> Array2<f32> {
    field.mapv(|v| range.clamp(v))
}
