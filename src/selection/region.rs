//! Region-of-interest cropping with a constant zero border.
//!
//! The visible margin around a region is a fifth of its size on each side
//! (integer division), so small regions get no margin at all. Border pixels
//! are filled with the element default (`0.0` for fields, `false` for masks)
//! rather than re-read from outside the rectangle.

use ndarray::{s, Array2, ArrayView2};

use super::contour::BoundingRect;

/// Crop rectangle plus the symmetric padding added around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionCrop {
    pub rect: BoundingRect,
    pub pad_x: usize,
    pub pad_y: usize,
}

impl RegionCrop {
    /// Padding of `w / 5` horizontally and `h / 5` vertically.
    pub fn from_rect(rect: BoundingRect) -> Self {
        Self {
            rect,
            pad_x: rect.w / 5,
            pad_y: rect.h / 5,
        }
    }

    /// Output shape `(height, width)` after padding.
    pub fn output_dim(&self) -> (usize, usize) {
        (self.rect.h + 2 * self.pad_y, self.rect.w + 2 * self.pad_x)
    }

    /// Crop `input` to the rectangle and surround it with the padding.
    ///
    /// The rectangle is clipped to the input bounds first.
    pub fn apply<T: Clone + Default>(&self, input: ArrayView2<T>) -> Array2<T> {
        let (height, width) = input.dim();
        let rect = self.rect.clip_to(height, width);
        let out_dim = (rect.h + 2 * self.pad_y, rect.w + 2 * self.pad_x);

        let mut result = Array2::from_elem(out_dim, T::default());
        result
            .slice_mut(s![
                self.pad_y..self.pad_y + rect.h,
                self.pad_x..self.pad_x + rect.w
            ])
            .assign(&input.slice(s![rect.y..rect.y + rect.h, rect.x..rect.x + rect.w]));
        result
    }
}
