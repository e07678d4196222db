//! Pseudocolor compositing.
//!
//! Turns a single-channel intensity field into a [`Composite`]:
//! 1. Clamp the field into the value range
//! 2. Crop field and mask to a padded region of interest (mask + roi only)
//! 3. Check that mask and field agree in shape
//! 4. Resolve the background layer
//! 5. Colorize the field as the overlay, visible only where the mask is set
//! 6. Attach legend, title and axes flag
//!
//! Without a mask the whole field is colorized and no background is built.
//! Every step works on copies; caller arrays are never modified.

pub mod layer;

use std::fmt;
use std::str::FromStr;

use log::debug;
use ndarray::{Array2, ArrayView2, ArrayViewD};

use crate::colormap::Colormap;
use crate::error::{PseudocolorError, Result};
use crate::field::{clamp_range, ensure_grayscale, ValueRange};
use crate::selection::{Contour, RegionCrop};

pub use layer::{Composite, Layer, Legend};

pub const DEFAULT_TITLE: &str = "Pseudocolored image";

/// What is drawn beneath the overlay where the mask is unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Background {
    /// The (clamped, cropped) field itself in gray.
    #[default]
    Image,
    /// Uniform white.
    White,
    /// Uniform black.
    Black,
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Background::Image => "image",
            Background::White => "white",
            Background::Black => "black",
        };
        f.write_str(name)
    }
}

impl FromStr for Background {
    type Err = PseudocolorError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "image" => Ok(Background::Image),
            "white" => Ok(Background::White),
            "black" => Ok(Background::Black),
            other => Err(PseudocolorError::UnsupportedBackground(other.to_string())),
        }
    }
}

impl Background {
    /// Gray palette the background is drawn with.
    pub fn palette(self) -> Colormap {
        match self {
            Background::Image | Background::Black => Colormap::Gray,
            Background::White => Colormap::GrayReversed,
        }
    }

    /// Background samples for a field of the given shape.
    ///
    /// `White` fills with the largest displayable sample, `range.max`.
    pub fn layer_data(self, field: &Array2<f32>, range: ValueRange) -> Array2<f32> {
        match self {
            Background::Image => field.clone(),
            Background::White => Array2::from_elem(field.dim(), range.max),
            Background::Black => Array2::zeros(field.dim()),
        }
    }

    /// Build the background layer, normalized to its own extent.
    pub fn resolve(self, field: &Array2<f32>, range: ValueRange) -> Layer {
        Layer::autoscaled(self.layer_data(field, range), self.palette())
    }
}

/// Compositor settings.
#[derive(Debug, Clone, PartialEq)]
pub struct PseudocolorOptions {
    pub colormap: Colormap,
    pub background: Background,
    pub range: ValueRange,
    /// Object outline to crop to; only honored together with a mask.
    pub roi: Option<Contour>,
    pub axes: bool,
    pub title: String,
}

impl Default for PseudocolorOptions {
    fn default() -> Self {
        Self {
            colormap: Colormap::default(),
            background: Background::default(),
            range: ValueRange::default(),
            roi: None,
            axes: true,
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

/// Compose a pseudocolored view of `field`.
///
/// # Arguments
/// * `field` - Intensity samples, must be 2-dimensional
/// * `mask` - Overlay visibility; `None` colorizes the whole field
/// * `options` - Colormap, background, value range, region of interest, framing
///
/// # Errors
/// * `Shape` - `field` is not 2-dimensional
/// * `EmptyContour` - the region of interest has no points
/// * `ShapeMismatch` - mask and field disagree after cropping
pub fn compose(
    field: ArrayViewD<f32>,
    mask: Option<ArrayView2<bool>>,
    options: &PseudocolorOptions,
) -> Result<Composite> {
    let field = ensure_grayscale(field)?;
    let range = options.range;

    let clamped = clamp_range(field.view(), range);
    debug!(
        "Clamped {}x{} field to [{}, {}]",
        clamped.ncols(),
        clamped.nrows(),
        range.min,
        range.max
    );

    let legend = Legend { range, colormap: options.colormap };

    let Some(mask) = mask else {
        return Ok(Composite {
            background: None,
            overlay: Layer::new(clamped, options.colormap, range),
            mask: None,
            legend,
            title: options.title.clone(),
            axes: options.axes,
        });
    };

    let (field, mask) = match &options.roi {
        Some(roi) => {
            let crop = RegionCrop::from_rect(roi.bounding_rect()?);
            debug!(
                "Cropping to {:?} with padding ({}, {})",
                crop.rect, crop.pad_x, crop.pad_y
            );
            (crop.apply(clamped.view()), crop.apply(mask))
        }
        None => (clamped, mask.to_owned()),
    };

    if field.dim() != mask.dim() {
        return Err(PseudocolorError::ShapeMismatch {
            field: field.dim(),
            mask: mask.dim(),
        });
    }

    debug!("Resolving {} background", options.background);
    let background = options.background.resolve(&field, range);

    Ok(Composite {
        background: Some(background),
        overlay: Layer::new(field, options.colormap, range),
        mask: Some(mask),
        legend,
        title: options.title.clone(),
        axes: options.axes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::BoundingRect;
    use ndarray::{s, Array3};

    fn ramp(h: usize, w: usize) -> Array2<f32> {
        Array2::from_shape_fn((h, w), |(y, x)| ((y * w + x) * 3) as f32)
    }

    fn rect_contour(rect: BoundingRect) -> Contour {
        Contour::new(vec![
            (rect.x, rect.y),
            (rect.x + rect.w - 1, rect.y),
            (rect.x + rect.w - 1, rect.y + rect.h - 1),
            (rect.x, rect.y + rect.h - 1),
        ])
    }

    #[test]
    fn test_rejects_color_input() {
        let color = Array3::<f32>::zeros((4, 4, 3));
        let result = compose(color.view().into_dyn(), None, &PseudocolorOptions::default());
        assert!(matches!(result, Err(PseudocolorError::Shape { ndim: 3 })));
    }

    #[test]
    fn test_unsupported_background_names_value() {
        let err = "red".parse::<Background>().unwrap_err();
        assert!(matches!(&err, PseudocolorError::UnsupportedBackground(v) if v == "red"));
        assert!(err.to_string().contains("red"));
    }

    #[test]
    fn test_no_mask_clamps_and_colorizes_everything() {
        let field = Array2::<f32>::from_elem((10, 10), 200.0);
        let options = PseudocolorOptions {
            range: ValueRange::new(0.0, 150.0),
            ..Default::default()
        };
        let composite = compose(field.view().into_dyn(), None, &options).unwrap();
        assert!(composite.background.is_none());
        assert!(composite.overlay.data.iter().all(|&v| v == 150.0));
        assert_eq!(composite.legend.range, ValueRange::new(0.0, 150.0));
        assert_eq!(composite.title, DEFAULT_TITLE);
        assert_eq!(composite.color_at(4, 4), options.colormap.apply(1.0));
        // Caller buffer untouched
        assert!(field.iter().all(|&v| v == 200.0));
    }

    #[test]
    fn test_black_background_with_empty_mask() {
        let field = ramp(6, 6);
        let mask = Array2::<bool>::from_elem((6, 6), false);
        let options = PseudocolorOptions {
            background: Background::Black,
            colormap: Colormap::Hot,
            ..Default::default()
        };
        let composite = compose(field.view().into_dyn(), Some(mask.view()), &options).unwrap();
        let background = composite.background.as_ref().unwrap();
        assert!(background.data.iter().all(|&v| v == 0.0));
        assert_eq!(background.colormap, Colormap::Gray);
        for ((y, x), _) in field.indexed_iter() {
            assert_eq!(composite.color_at(y, x), [0, 0, 0, 255]);
        }
    }

    #[test]
    fn test_unmasked_pixels_ignore_overlay_colormap() {
        let field = ramp(5, 5);
        let mask = Array2::from_shape_fn((5, 5), |(y, x)| (x + y) % 2 == 0);
        for background in [Background::Image, Background::White, Background::Black] {
            let a = compose(
                field.view().into_dyn(),
                Some(mask.view()),
                &PseudocolorOptions { background, colormap: Colormap::Jet, ..Default::default() },
            )
            .unwrap();
            let b = compose(
                field.view().into_dyn(),
                Some(mask.view()),
                &PseudocolorOptions { background, colormap: Colormap::Viridis, ..Default::default() },
            )
            .unwrap();
            for ((y, x), &selected) in mask.indexed_iter() {
                if !selected {
                    assert_eq!(a.color_at(y, x), b.color_at(y, x));
                    let bg = a.background.as_ref().unwrap().color_at(y, x);
                    assert_eq!(a.color_at(y, x), bg);
                }
            }
        }
    }

    #[test]
    fn test_masked_pixels_ignore_background() {
        let field = ramp(5, 5);
        let mask = Array2::from_shape_fn((5, 5), |(y, _)| y < 3);
        let composites: Vec<Composite> = [Background::Image, Background::White, Background::Black]
            .into_iter()
            .map(|background| {
                compose(
                    field.view().into_dyn(),
                    Some(mask.view()),
                    &PseudocolorOptions { background, ..Default::default() },
                )
                .unwrap()
            })
            .collect();
        for ((y, x), &selected) in mask.indexed_iter() {
            if selected {
                let expected = Colormap::Viridis.apply_in_range(field[[y, x]], 0.0, 255.0);
                for composite in &composites {
                    assert_eq!(composite.color_at(y, x), expected);
                }
            }
        }
    }

    #[test]
    fn test_white_background_is_lightest() {
        let field = ramp(8, 8);
        let mask = Array2::<bool>::from_elem((8, 8), false);
        let white = compose(
            field.view().into_dyn(),
            Some(mask.view()),
            &PseudocolorOptions { background: Background::White, ..Default::default() },
        )
        .unwrap();
        let image = compose(field.view().into_dyn(), Some(mask.view()), &PseudocolorOptions::default())
            .unwrap();
        for ((y, x), _) in mask.indexed_iter() {
            let w = Colormap::luma(white.color_at(y, x));
            let i = Colormap::luma(image.color_at(y, x));
            assert!(w >= i);
            assert_eq!(white.color_at(y, x), [255, 255, 255, 255]);
        }
    }

    #[test]
    fn test_roi_crop_small_region() {
        let field = ramp(10, 10);
        let mask = Array2::<bool>::from_elem((10, 10), true);
        let options = PseudocolorOptions {
            roi: Some(rect_contour(BoundingRect::new(2, 2, 4, 4))),
            ..Default::default()
        };
        let composite = compose(field.view().into_dyn(), Some(mask.view()), &options).unwrap();
        assert_eq!(composite.dim(), (4, 4));
        assert_eq!(composite.overlay.data, field.slice(s![2..6, 2..6]));
    }

    #[test]
    fn test_roi_clamps_before_crop_and_pads() {
        let field = Array2::from_shape_fn((20, 20), |(y, x)| (x * 20 + y) as f32);
        let mask = Array2::<bool>::from_elem((20, 20), true);
        let range = ValueRange::new(50.0, 300.0);
        let options = PseudocolorOptions {
            range,
            roi: Some(rect_contour(BoundingRect::new(1, 3, 10, 15))),
            ..Default::default()
        };
        let composite = compose(field.view().into_dyn(), Some(mask.view()), &options).unwrap();
        // pad_x = 10 / 5, pad_y = 15 / 5
        assert_eq!(composite.dim(), (15 + 6, 10 + 4));

        let interior = composite.overlay.data.slice(s![3..18, 2..12]);
        let expected = clamp_range(field.slice(s![3..18, 1..11]), range);
        assert_eq!(interior, expected);

        let mask_out = composite.mask.as_ref().unwrap();
        assert!(!mask_out[[0, 0]]);
        assert!(!mask_out[[20, 13]]);
        assert!(mask_out[[3, 2]]);
        assert_eq!(composite.overlay.data[[0, 0]], 0.0);
    }

    #[test]
    fn test_roi_without_mask_is_ignored() {
        let field = ramp(10, 10);
        let options = PseudocolorOptions {
            roi: Some(rect_contour(BoundingRect::new(2, 2, 4, 4))),
            ..Default::default()
        };
        let composite = compose(field.view().into_dyn(), None, &options).unwrap();
        assert_eq!(composite.dim(), (10, 10));
    }

    #[test]
    fn test_mask_shape_mismatch() {
        let field = ramp(10, 10);
        let mask = Array2::<bool>::from_elem((8, 10), true);
        let result = compose(field.view().into_dyn(), Some(mask.view()), &PseudocolorOptions::default());
        assert!(matches!(
            result,
            Err(PseudocolorError::ShapeMismatch { field: (10, 10), mask: (8, 10) })
        ));
    }

    #[test]
    fn test_empty_roi_contour() {
        let field = ramp(4, 4);
        let mask = Array2::<bool>::from_elem((4, 4), true);
        let options = PseudocolorOptions { roi: Some(Contour::default()), ..Default::default() };
        let result = compose(field.view().into_dyn(), Some(mask.view()), &options);
        assert!(matches!(result, Err(PseudocolorError::EmptyContour)));
    }
}
