//! Region selection for the compositor.
//!
//! - **Contour extraction**: boundary tracing of binary masks, bounding rectangles
//! - **Region crop**: crop to a rectangle and pad it with a zero border

pub mod contour;
pub mod region;

pub use contour::{extract_contours, mask_bounding_rect, BoundingRect, Contour};
pub use region::RegionCrop;
