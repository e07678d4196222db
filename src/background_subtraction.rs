//! Two-frame background subtraction.
//!
//! A per-pixel Gaussian background model: the first frame seeds the mean,
//! later frames are classified against it and then folded in with a running
//! update. Pixels that deviate from the mean by more than `2.5` standard
//! deviations in any channel are foreground.
//!
//! Frames may be grayscale `(height, width)` or color `(height, width, channels)`.
//! Frames of different size are reconciled by area-resampling one onto the
//! other's grid; frames of different channel layout are rejected.

use log::{debug, warn};
use ndarray::{Array2, Array3, ArrayView3, ArrayViewD, Axis, Ix2, Ix3, Zip};

use crate::error::{PseudocolorError, Result};

/// Variance assumed for a freshly seeded pixel (15 gray levels of noise).
pub const INITIAL_VARIANCE: f32 = 15.0 * 15.0;
/// Lower bound on the variance so a perfectly static pixel stays tolerant.
pub const MIN_VARIANCE: f32 = 4.0;
/// Match threshold in standard deviations.
pub const MATCH_SIGMA: f32 = 2.5;
pub const DEFAULT_HISTORY: usize = 200;

/// Running per-pixel Gaussian background estimate.
#[derive(Debug, Clone)]
pub struct BackgroundModel {
    mean: Option<Array3<f32>>,
    variance: Array3<f32>,
    history: usize,
    frames: usize,
}

impl Default for BackgroundModel {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY)
    }
}

impl BackgroundModel {
    pub fn new(history: usize) -> Self {
        Self {
            mean: None,
            variance: Array3::zeros((0, 0, 0)),
            history: history.max(1),
            frames: 0,
        }
    }

    /// Frames folded into the model so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Classify `frame` against the model, then update the model with it.
    ///
    /// Returns a 0/255 foreground mask. The first frame, or a frame whose
    /// shape differs from the model, reseeds the model and is all background.
    pub fn apply(&mut self, frame: ArrayView3<f32>) -> Array2<u8> {
        let (height, width, _) = frame.dim();
        let mut mask = Array2::<u8>::zeros((height, width));

        let seeded = self.mean.as_ref().is_some_and(|mean| mean.dim() == frame.dim());
        if !seeded {
            debug!("Seeding background model with {}x{} frame", width, height);
            self.mean = Some(frame.to_owned());
            self.variance = Array3::from_elem(frame.dim(), INITIAL_VARIANCE);
            self.frames = 1;
            return mask;
        }
        let Some(mean) = self.mean.as_mut() else {
            return mask;
        };

        self.frames += 1;
        let alpha = 1.0 / self.frames.min(self.history) as f32;
        let threshold = MATCH_SIGMA * MATCH_SIGMA;

        Zip::from(&mut mask)
            .and(mean.lanes_mut(Axis(2)))
            .and(self.variance.lanes_mut(Axis(2)))
            .and(frame.lanes(Axis(2)))
            .par_for_each(|m, mut mu, mut var, px| {
                let mut foreground = false;
                for c in 0..px.len() {
                    let d = px[c] - mu[c];
                    if d * d > threshold * var[c] {
                        foreground = true;
                    }
                    mu[c] += alpha * d;
                    var[c] = (var[c] + alpha * (d * d - var[c])).max(MIN_VARIANCE);
                }
                *m = if foreground { 255 } else { 0 };
            });

        mask
    }
}

/// View a 2D or 3D u8 frame as `(height, width, channels)` f32.
fn frame_to_f32(frame: ArrayViewD<u8>) -> Result<Array3<f32>> {
    match frame.ndim() {
        2 => {
            let gray = frame
                .into_dimensionality::<Ix2>()
                .map_err(|_| PseudocolorError::Shape { ndim: 2 })?;
            Ok(gray.mapv(f32::from).insert_axis(Axis(2)))
        }
        3 => {
            let color = frame
                .into_dimensionality::<Ix3>()
                .map_err(|_| PseudocolorError::Shape { ndim: 3 })?;
            Ok(color.mapv(f32::from))
        }
        ndim => Err(PseudocolorError::Shape { ndim }),
    }
}

/// Source spans `(index, weight)` covering each destination cell.
fn area_weights(src_len: usize, dst_len: usize) -> Vec<Vec<(usize, f32)>> {
    let scale = src_len as f32 / dst_len as f32;
    (0..dst_len)
        .map(|d| {
            let start = d as f32 * scale;
            let end = (d + 1) as f32 * scale;
            let first = start.floor() as usize;
            let last = (end.ceil() as usize).min(src_len);
            (first..last)
                .filter_map(|s| {
                    let overlap = (end.min((s + 1) as f32) - start.max(s as f32)) / scale;
                    (overlap > 0.0).then_some((s, overlap))
                })
                .collect()
        })
        .collect()
}

/// Area resampling to `(height, width)`; each output pixel is the
/// overlap-weighted mean of the source pixels it covers.
pub fn resize_area(input: ArrayView3<f32>, height: usize, width: usize) -> Array3<f32> {
    let (src_h, src_w, channels) = input.dim();
    if (src_h, src_w) == (height, width) {
        return input.to_owned();
    }
    let mut output = Array3::<f32>::zeros((height, width, channels));
    if src_h == 0 || src_w == 0 {
        return output;
    }
    let rows = area_weights(src_h, height);
    let cols = area_weights(src_w, width);

    for (y, row_weights) in rows.iter().enumerate() {
        for (x, col_weights) in cols.iter().enumerate() {
            for &(sy, wy) in row_weights {
                for &(sx, wx) in col_weights {
                    for c in 0..channels {
                        output[[y, x, c]] += input[[sy, sx, c]] * wy * wx;
                    }
                }
            }
        }
    }
    output
}

/// Subtract `background_image` from `foreground_image` once.
///
/// Both frames must be single-channel or both multi-channel with the same
/// channel count. When sizes differ, the frame that compares larger by
/// `(height, width)` is area-resampled onto the other's grid.
///
/// # Returns
/// Mask `(height, width)` with 255 on foreground pixels and 0 elsewhere.
pub fn background_subtraction(
    background_image: ArrayViewD<u8>,
    foreground_image: ArrayViewD<u8>,
) -> Result<Array2<u8>> {
    if background_image.ndim() != foreground_image.ndim() {
        return Err(PseudocolorError::ChannelMismatch);
    }
    let mut bg = frame_to_f32(background_image)?;
    let mut fg = frame_to_f32(foreground_image)?;

    let (bg_h, bg_w, bg_c) = bg.dim();
    let (fg_h, fg_w, fg_c) = fg.dim();
    if bg_c != fg_c {
        return Err(PseudocolorError::ChannelMismatch);
    }
    if (bg_h, bg_w) != (fg_h, fg_w) {
        warn!(
            "Images are not of same size ({}x{} vs {}x{}), resizing",
            bg_w, bg_h, fg_w, fg_h
        );
        if (bg_h, bg_w) > (fg_h, fg_w) {
            bg = resize_area(bg.view(), fg_h, fg_w);
        } else {
            fg = resize_area(fg.view(), bg_h, bg_w);
        }
    }

    let mut model = BackgroundModel::default();
    model.apply(bg.view());
    Ok(model.apply(fg.view()))
}
