//! Contour extraction from binary masks.
//!
//! Traces object outlines with Moore-neighbour boundary tracing. A contour is
//! the ordered list of boundary pixel coordinates; its bounding rectangle is
//! what the compositor uses as a region of interest.

use std::collections::HashSet;

use ndarray::ArrayView2;

use crate::error::{PseudocolorError, Result};

/// Axis-aligned rectangle in pixel coordinates.
///
/// `w` and `h` count pixels, so a single point has size 1x1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingRect {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

impl BoundingRect {
    pub fn new(x: usize, y: usize, w: usize, h: usize) -> Self {
        Self { x, y, w, h }
    }

    /// Clip the rectangle to an image of `(height, width)`.
    pub fn clip_to(&self, height: usize, width: usize) -> BoundingRect {
        let x = self.x.min(width);
        let y = self.y.min(height);
        BoundingRect {
            x,
            y,
            w: self.w.min(width - x),
            h: self.h.min(height - y),
        }
    }
}

/// Ordered boundary points `(x, y)` of one object.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Contour {
    pub points: Vec<(usize, usize)>,
}

impl Contour {
    pub fn new(points: Vec<(usize, usize)>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Smallest upright rectangle containing every point.
    ///
    /// # Errors
    /// `PseudocolorError::EmptyContour` for a contour without points.
    pub fn bounding_rect(&self) -> Result<BoundingRect> {
        let (&(x0, y0), rest) = self
            .points
            .split_first()
            .ok_or(PseudocolorError::EmptyContour)?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (x0, y0, x0, y0);
        for &(x, y) in rest {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        Ok(BoundingRect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
    }
}

/// Extract the outer boundaries of every object in `mask`.
///
/// Contours are returned in raster order of their first boundary pixel.
pub fn extract_contours(mask: ArrayView2<bool>) -> Vec<Contour> {
    let (height, width) = mask.dim();
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let mut contours = Vec::new();
    let mut visited: HashSet<(i64, i64)> = HashSet::new();

    for y in 0..height as i64 {
        for x in 0..width as i64 {
            if is_boundary(&mask, x, y) && !visited.contains(&(x, y)) {
                contours.push(trace_boundary(&mask, x, y, &mut visited));
            }
        }
    }

    contours
}

/// Union of the bounding rectangles of every object in `mask`.
///
/// Returns `None` for an empty mask.
pub fn mask_bounding_rect(mask: ArrayView2<bool>) -> Option<BoundingRect> {
    let points: Vec<(usize, usize)> = extract_contours(mask)
        .into_iter()
        .flat_map(|c| c.points)
        .collect();
    Contour::new(points).bounding_rect().ok()
}

#[inline]
fn is_selected(mask: &ArrayView2<bool>, x: i64, y: i64) -> bool {
    let (height, width) = mask.dim();
    x >= 0 && y >= 0 && (x as usize) < width && (y as usize) < height && mask[[y as usize, x as usize]]
}

/// Selected with at least one unselected 4-neighbour (out of bounds counts as unselected).
#[inline]
fn is_boundary(mask: &ArrayView2<bool>, x: i64, y: i64) -> bool {
    is_selected(mask, x, y)
        && (!is_selected(mask, x - 1, y)
            || !is_selected(mask, x + 1, y)
            || !is_selected(mask, x, y - 1)
            || !is_selected(mask, x, y + 1))
}

/// Moore neighbourhood, clockwise from right (y grows downward).
const DIRECTIONS: [(i64, i64); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

fn trace_boundary(
    mask: &ArrayView2<bool>,
    start_x: i64,
    start_y: i64,
    visited: &mut HashSet<(i64, i64)>,
) -> Contour {
    let (height, width) = mask.dim();
    let mut points = Vec::new();

    let mut dir = DIRECTIONS
        .iter()
        .position(|&(dx, dy)| !is_selected(mask, start_x + dx, start_y + dy))
        .unwrap_or(0);

    let (mut x, mut y) = (start_x, start_y);
    let max_steps = width * height * 2;
    let mut steps = 0;

    loop {
        if visited.insert((x, y)) {
            points.push((x as usize, y as usize));
        }

        // Resume the clockwise sweep just past the backtrack direction
        let search_start = (dir + 5) % 8;
        let mut next = None;
        for i in 0..8 {
            let check_dir = (search_start + i) % 8;
            let (dx, dy) = DIRECTIONS[check_dir];
            let (nx, ny) = (x + dx, y + dy);
            if !is_selected(mask, nx, ny) {
                continue;
            }
            if nx == start_x && ny == start_y && steps > 0 {
                return Contour::new(points);
            }
            if is_boundary(mask, nx, ny) {
                next = Some((nx, ny, check_dir));
                break;
            }
        }

        match next {
            Some((nx, ny, d)) => {
                x = nx;
                y = ny;
                dir = d;
            }
            None => break,
        }

        steps += 1;
        if steps >= max_steps {
            break;
        }
    }

    Contour::new(points)
}
