use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use image::ImageReader;
use log::info;
use ndarray::Array2;

use pseudocolor_rust::compositor::{compose, Background, PseudocolorOptions};
use pseudocolor_rust::render::{CanvasRenderer, Destination, RasterRenderer, RenderSettings};
use pseudocolor_rust::selection::{extract_contours, Contour};
use pseudocolor_rust::{Colormap, ValueRange};

/// Pseudocolor a grayscale image file, optionally masked and cropped to the
/// masked object.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about=None)]
struct Args {
    /// Grayscale image to pseudocolor. Color images are converted to luma.
    #[arg(short, long)]
    input: PathBuf,

    /// Output image path (PNG).
    #[arg(short, long)]
    output: PathBuf,

    /// Binary mask image; non-zero pixels show the colorized field.
    #[arg(short, long)]
    mask: Option<PathBuf>,

    /// Colormap for the overlay.
    #[arg(short, long, default_value = "viridis")]
    colormap: String,

    /// Background beneath unmasked pixels: image, white, or black.
    #[arg(short, long, default_value = "image")]
    background: String,

    /// Lower bound of the value range.
    #[arg(long, default_value_t = 0.0)]
    min_value: f32,

    /// Upper bound of the value range.
    #[arg(long, default_value_t = 255.0)]
    max_value: f32,

    /// Output resolution.
    #[arg(long)]
    dpi: Option<u32>,

    /// Hide axis ticks.
    #[arg(long, default_value_t = false)]
    no_axes: bool,

    /// Crop to the bounding box of the masked objects.
    #[arg(long, default_value_t = false)]
    crop_to_mask: bool,
}

fn load_gray(path: &Path) -> Result<Array2<u8>, Box<dyn std::error::Error>> {
    let img = ImageReader::open(path)?.decode()?.to_luma8();
    let (width, height) = img.dimensions();
    Ok(Array2::from_shape_vec((height as usize, width as usize), img.into_raw())?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    info!("Processing {:?}", args.input);

    let field = load_gray(&args.input)?.mapv(f32::from);
    let mask = match &args.mask {
        Some(path) => Some(load_gray(path)?.mapv(|v| v > 0)),
        None => None,
    };

    let roi = match (&mask, args.crop_to_mask) {
        (Some(mask), true) => Some(Contour::new(
            extract_contours(mask.view())
                .into_iter()
                .flat_map(|c| c.points)
                .collect(),
        )),
        _ => None,
    };

    let options = PseudocolorOptions {
        colormap: args.colormap.parse::<Colormap>()?,
        background: args.background.parse::<Background>()?,
        range: ValueRange::new(args.min_value, args.max_value),
        roi,
        axes: !args.no_axes,
        ..Default::default()
    };

    let start = Instant::now();
    let composite = compose(field.view().into_dyn(), mask.as_ref().map(|m| m.view()), &options)?;
    let (height, width) = composite.dim();
    info!("Composed {}x{} pseudocolor image in {:?}", width, height, start.elapsed());

    let settings = RenderSettings { dpi: args.dpi };
    RasterRenderer::default().render(&composite, &Destination::File(args.output), &settings)?;
    Ok(())
}
