//! WebAssembly exports for pseudocoloring.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Buffers are
//! flat and row-major; errors surface as JavaScript exceptions.

use ndarray::ArrayView2;
use wasm_bindgen::prelude::*;

use crate::colormap::Colormap;
use crate::compositor::{compose, Background, PseudocolorOptions};
use crate::field::ValueRange;

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Pseudocolor a grayscale field.
///
/// # Arguments
/// * `data` - Flat array of samples (length = width * height)
/// * `mask` - Flat 0/non-zero mask of the same length, or empty for no mask
/// * `width` - Field width in pixels
/// * `height` - Field height in pixels
/// * `colormap` - Colormap name, e.g. "viridis"
/// * `background` - "image", "white", or "black"
/// * `min_value` / `max_value` - Value range of interest
///
/// # Returns
/// Flat array of RGBA bytes (length = width * height * 4)
#[wasm_bindgen]
pub fn pseudocolor_wasm(
    data: &[f32],
    mask: &[u8],
    width: usize,
    height: usize,
    colormap: &str,
    background: &str,
    min_value: f32,
    max_value: f32,
) -> Result<Vec<u8>, JsValue> {
    let field = ArrayView2::from_shape((height, width), data).map_err(js_error)?;
    let mask = if mask.is_empty() {
        None
    } else {
        let raw = ArrayView2::from_shape((height, width), mask).map_err(js_error)?;
        Some(raw.mapv(|v| v > 0))
    };

    let options = PseudocolorOptions {
        colormap: colormap.parse::<Colormap>().map_err(js_error)?,
        background: background.parse::<Background>().map_err(js_error)?,
        range: ValueRange::new(min_value, max_value),
        ..Default::default()
    };

    let composite = compose(
        field.into_dyn(),
        mask.as_ref().map(|m| m.view()),
        &options,
    )
    .map_err(js_error)?;
    Ok(composite.visible_rgba().into_raw_vec_and_offset().0)
}
