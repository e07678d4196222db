//! Headless raster renderer.
//!
//! Lays out the composite on a white canvas with a colorbar strip to the
//! right, optionally with tick marks along the left and bottom edges, and
//! scales the result by `dpi / 100`. Files are encoded with the `image`
//! crate; the format follows the file extension.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use log::info;

use super::{CanvasRenderer, Destination, RenderSettings, DEFAULT_DPI};
use crate::compositor::Composite;
use crate::error::{PseudocolorError, Result};

const CANVAS: Rgba<u8> = Rgba([255, 255, 255, 255]);
const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Renders composites to RGBA rasters and image files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterRenderer {
    /// Margin around the image when axes are shown.
    pub axes_margin: u32,
    /// Margin around the image when axes are hidden.
    pub plain_margin: u32,
    /// Space between the image and the colorbar.
    pub bar_gap: u32,
    pub bar_width: u32,
    /// Number of intervals between axis ticks.
    pub tick_intervals: u32,
    pub tick_length: u32,
}

impl Default for RasterRenderer {
    fn default() -> Self {
        Self {
            axes_margin: 6,
            plain_margin: 2,
            bar_gap: 4,
            bar_width: 8,
            tick_intervals: 5,
            tick_length: 3,
        }
    }
}

impl RasterRenderer {
    /// Integer upscale factor for a resolution, at least 1.
    pub fn scale_for(dpi: u32) -> u32 {
        ((dpi as f32 / DEFAULT_DPI as f32).round() as u32).max(1)
    }

    /// Rasterize at 1:1 (one canvas pixel per field sample).
    pub fn rasterize(&self, composite: &Composite) -> RgbaImage {
        let (height, width) = composite.dim();
        let (height, width) = (height as u32, width as u32);
        let margin = if composite.axes { self.axes_margin } else { self.plain_margin };

        let canvas_w = margin + width + self.bar_gap + self.bar_width + margin;
        let canvas_h = margin + height + margin;
        let mut canvas = RgbaImage::from_pixel(canvas_w, canvas_h, CANVAS);

        let pixels = composite.visible_rgba();
        for y in 0..height {
            for x in 0..width {
                let (yi, xi) = (y as usize, x as usize);
                let rgba = [
                    pixels[[yi, xi, 0]],
                    pixels[[yi, xi, 1]],
                    pixels[[yi, xi, 2]],
                    pixels[[yi, xi, 3]],
                ];
                canvas.put_pixel(margin + x, margin + y, Rgba(rgba));
            }
        }

        let bar_x = margin + width + self.bar_gap;
        for (y, rgba) in composite.legend.gradient(height as usize).into_iter().enumerate() {
            for x in bar_x..bar_x + self.bar_width {
                canvas.put_pixel(x, margin + y as u32, Rgba(rgba));
            }
        }

        if composite.axes {
            self.draw_ticks(&mut canvas, margin, width, height);
        }

        canvas
    }

    fn draw_ticks(&self, canvas: &mut RgbaImage, margin: u32, width: u32, height: u32) {
        let length = self.tick_length.min(margin);
        let intervals = self.tick_intervals.max(1);

        for i in 0..=intervals {
            if width > 0 {
                let x = margin + (width - 1) * i / intervals;
                for d in 1..=length {
                    canvas.put_pixel(x, margin + height - 1 + d, INK);
                }
            }
            if height > 0 {
                let y = margin + (height - 1) * i / intervals;
                for d in 1..=length {
                    canvas.put_pixel(margin - d, y, INK);
                }
            }
        }
    }

    /// Rasterize and scale for the requested resolution.
    pub fn rasterize_scaled(&self, composite: &Composite, settings: &RenderSettings) -> RgbaImage {
        let canvas = self.rasterize(composite);
        let scale = Self::scale_for(settings.dpi());
        if scale == 1 {
            return canvas;
        }
        imageops::resize(
            &canvas,
            canvas.width() * scale,
            canvas.height() * scale,
            FilterType::Nearest,
        )
    }
}

impl CanvasRenderer for RasterRenderer {
    fn render(
        &self,
        composite: &Composite,
        destination: &Destination,
        settings: &RenderSettings,
    ) -> Result<()> {
        match destination {
            Destination::File(path) => {
                let raster = self.rasterize_scaled(composite, settings);
                raster.save(path)?;
                info!(
                    "Wrote '{}' ({}x{}, legend [{}, {}]) to {}",
                    composite.title,
                    raster.width(),
                    raster.height(),
                    composite.legend.range.min,
                    composite.legend.range.max,
                    path.display()
                );
                Ok(())
            }
            Destination::Display => Err(PseudocolorError::Render(
                "interactive display is not available for the raster renderer".to_string(),
            )),
        }
    }
}
