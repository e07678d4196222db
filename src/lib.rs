//! Pseudocolor Rust Extensions
//!
//! Pseudocoloring of single-channel intensity fields (distance transforms,
//! index images and similar derived maps) with Python bindings via PyO3 and
//! WASM bindings for JavaScript.
//!
//! ## Image Format
//! - **Intensity field**: (height, width) - exactly two dimensions, f32 samples
//!   of arbitrary range (u8 fields convert losslessly)
//! - **Mask**: (height, width) - boolean, or u8 where any non-zero value is set
//! - **Output**: (height, width, 4) - RGBA u8
//!
//! ## Pipeline
//! The compositor clamps the field into a value range, optionally crops it to
//! a padded region of interest, and stacks a colorized overlay over a gray
//! background layer, showing the overlay only where the mask is set. The
//! result is a [`Composite`] that a [`render::CanvasRenderer`] turns into
//! pixels.

pub mod background_subtraction;
pub mod colormap;
pub mod compositor;
pub mod error;
pub mod field;
pub mod render;
pub mod selection;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use colormap::Colormap;
pub use compositor::{compose, Background, Composite, Layer, Legend, PseudocolorOptions};
pub use error::{PseudocolorError, Result};
pub use field::ValueRange;
pub use selection::{BoundingRect, Contour};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray2, PyArray3, PyReadonlyArray2, PyReadonlyArrayDyn};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::background_subtraction::background_subtraction as subtract_background;
    use crate::colormap::Colormap;
    use crate::compositor::{compose, Background, PseudocolorOptions};
    use crate::error::PseudocolorError;
    use crate::field::{mask_from_u8, ValueRange};
    use crate::selection::Contour;

    impl From<PseudocolorError> for PyErr {
        fn from(err: PseudocolorError) -> PyErr {
            PyValueError::new_err(err.to_string())
        }
    }

    /// Read an OpenCV-style contour (`(N, 1, 2)` or `(N, 2)` of x, y) into points.
    fn contour_from_array(obj: PyReadonlyArrayDyn<'_, i32>) -> Contour {
        let flat: Vec<i32> = obj.as_array().iter().copied().collect();
        Contour::new(
            flat.chunks_exact(2)
                .map(|p| (p[0].max(0) as usize, p[1].max(0) as usize))
                .collect(),
        )
    }

    // ========================================================================
    // Pseudocolor
    // ========================================================================

    /// Pseudocolor a grayscale image.
    ///
    /// # Arguments
    /// * `gray_img` - Grayscale image (height, width)
    /// * `mask` - Binary mask (height, width); pixels outside show the background
    /// * `cmap` - Colormap name (default: viridis)
    /// * `background` - "image", "white", or "black"
    /// * `min_value` / `max_value` - Value range of interest
    /// * `obj` - Contour to crop to (needs `mask`)
    /// * `axes` - Draw axis ticks when rendered
    ///
    /// # Returns
    /// RGBA u8 image (height, width, 4) of the visible composite
    #[pyfunction]
    #[pyo3(signature = (gray_img, mask=None, cmap=None, background="image", min_value=0.0, max_value=255.0, obj=None, axes=true))]
    pub fn pseudocolor<'py>(
        py: Python<'py>,
        gray_img: PyReadonlyArrayDyn<'py, f32>,
        mask: Option<PyReadonlyArray2<'py, u8>>,
        cmap: Option<&str>,
        background: &str,
        min_value: f32,
        max_value: f32,
        obj: Option<PyReadonlyArrayDyn<'py, i32>>,
        axes: bool,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let options = PseudocolorOptions {
            colormap: cmap.map(str::parse::<Colormap>).transpose()?.unwrap_or_default(),
            background: background.parse::<Background>()?,
            range: ValueRange::new(min_value, max_value),
            roi: obj.map(contour_from_array),
            axes,
            ..Default::default()
        };
        let mask = match mask {
            Some(m) => Some(mask_from_u8(m.as_array().into_dyn())?),
            None => None,
        };
        let composite = compose(
            gray_img.as_array(),
            mask.as_ref().map(|m| m.view()),
            &options,
        )?;
        Ok(composite.visible_rgba().into_pyarray(py))
    }

    // ========================================================================
    // Background Subtraction
    // ========================================================================

    /// Foreground mask (0/255) of `foreground_image` against `background_image`.
    #[pyfunction]
    pub fn background_subtraction<'py>(
        py: Python<'py>,
        background_image: PyReadonlyArrayDyn<'py, u8>,
        foreground_image: PyReadonlyArrayDyn<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let mask = subtract_background(background_image.as_array(), foreground_image.as_array())?;
        Ok(mask.into_pyarray(py))
    }

    /// Pseudocolor Rust extension module
    #[pymodule]
    pub fn pseudocolor_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(pseudocolor, m)?)?;
        m.add_function(wrap_pyfunction!(background_subtraction, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::pseudocolor_rust;
