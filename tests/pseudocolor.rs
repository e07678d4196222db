use std::path::PathBuf;

use ndarray::{s, Array2};
use pseudocolor_rust::background_subtraction::background_subtraction;
use pseudocolor_rust::field::{clamp_range, field_from_u8};
use pseudocolor_rust::render::{debug_output, debug_path, DebugMode, RasterRenderer, RenderSettings};
use pseudocolor_rust::selection::{extract_contours, mask_bounding_rect, BoundingRect};
use pseudocolor_rust::{compose, Background, Colormap, PseudocolorError, PseudocolorOptions, ValueRange};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("pseudocolor-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Distance-like field: brightest in the middle, falling off to the edges.
fn radial_field(size: usize) -> Array2<f32> {
    let c = (size as f32 - 1.0) / 2.0;
    Array2::from_shape_fn((size, size), |(y, x)| {
        let d = ((x as f32 - c).powi(2) + (y as f32 - c).powi(2)).sqrt();
        (300.0 - d * 20.0).max(-10.0)
    })
}

#[test]
fn masked_object_is_cropped_and_rendered() {
    let field = radial_field(40);
    let mask = Array2::from_shape_fn((40, 40), |(y, x)| (10..30).contains(&y) && (5..30).contains(&x));

    let rect = mask_bounding_rect(mask.view()).unwrap();
    assert_eq!(rect, BoundingRect::new(5, 10, 25, 20));

    let roi = extract_contours(mask.view()).into_iter().next().unwrap();
    let range = ValueRange::new(0.0, 255.0);
    let options = PseudocolorOptions {
        colormap: Colormap::Hot,
        background: Background::Black,
        range,
        roi: Some(roi),
        axes: false,
        ..Default::default()
    };
    let composite = compose(field.view().into_dyn(), Some(mask.view()), &options).unwrap();

    // 25 / 5 = 5 columns and 20 / 5 = 4 rows of padding on each side
    assert_eq!(composite.dim(), (20 + 8, 25 + 10));
    let expected = clamp_range(field.slice(s![10..30, 5..30]), range);
    assert_eq!(composite.overlay.data.slice(s![4..24, 5..30]), expected);

    let rgba = composite.visible_rgba();
    for x in 0..35 {
        assert_eq!(&rgba.slice(s![0, x, ..]).to_vec(), &[0, 0, 0, 255]);
    }

    let dir = scratch_dir("render");
    debug_output(
        &RasterRenderer::default(),
        &composite,
        DebugMode::Print,
        3,
        &dir,
        &RenderSettings::with_dpi(200),
    )
    .unwrap();

    let written = image::open(debug_path(&dir, 3)).unwrap().to_rgba8();
    let base = RasterRenderer::default().rasterize(&composite);
    assert_eq!(written.dimensions(), (base.width() * 2, base.height() * 2));
    assert!(dir.join("3_pseudocolored.png").exists());
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn u8_field_round_trips_through_compose() {
    let raw = Array2::from_shape_fn((12, 12), |(y, x)| (y * 12 + x) as u8);
    let field = field_from_u8(raw.view().into_dyn()).unwrap();
    let composite = compose(field.view().into_dyn(), None, &PseudocolorOptions::default()).unwrap();
    assert_eq!(composite.overlay.data, raw.mapv(f32::from));
    assert!(composite.axes);
}

#[test]
fn invalid_inputs_fail_without_composite() {
    let cube = ndarray::Array3::<f32>::zeros((3, 3, 3));
    assert!(matches!(
        compose(cube.view().into_dyn(), None, &PseudocolorOptions::default()),
        Err(PseudocolorError::Shape { ndim: 3 })
    ));
    assert!(matches!(
        "red".parse::<Background>(),
        Err(PseudocolorError::UnsupportedBackground(name)) if name == "red"
    ));
}

#[test]
fn foreground_mask_drives_pseudocolor() {
    let empty_scene = Array2::<u8>::from_elem((30, 30), 20);
    let mut scene = empty_scene.clone();
    for y in 8..20 {
        for x in 12..24 {
            scene[[y, x]] = 200;
        }
    }
    let fg = background_subtraction(empty_scene.view().into_dyn(), scene.view().into_dyn()).unwrap();
    let mask = fg.mapv(|v| v > 0);
    assert_eq!(mask_bounding_rect(mask.view()), Some(BoundingRect::new(12, 8, 12, 12)));

    let field = scene.mapv(f32::from);
    let options = PseudocolorOptions { background: Background::White, ..Default::default() };
    let composite = compose(field.view().into_dyn(), Some(mask.view()), &options).unwrap();
    assert_eq!(composite.color_at(0, 0), [255, 255, 255, 255]);
    assert_eq!(composite.color_at(10, 15), Colormap::Viridis.apply(200.0 / 255.0));
}
