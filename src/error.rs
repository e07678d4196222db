//! Error types for pseudocoloring and its collaborators.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PseudocolorError {
    #[error("Image must be grayscale (expected 2 dimensions, got {ndim})")]
    Shape { ndim: usize },
    #[error("Background type {0} is not supported. Please use 'white', 'black', or 'image'.")]
    UnsupportedBackground(String),
    #[error("Mask must be 2-dimensional, got {ndim} dimensions")]
    MaskDimensions { ndim: usize },
    #[error("Mask shape {mask:?} does not match image shape {field:?}")]
    ShapeMismatch {
        field: (usize, usize),
        mask: (usize, usize),
    },
    #[error("Region of interest contour has no points")]
    EmptyContour,
    #[error("Unknown colormap: {0}")]
    UnknownColormap(String),
    #[error("Unknown debug mode: {0}. Please use 'none', 'print', or 'plot'.")]
    UnknownDebugMode(String),
    #[error("Images must both be single-channel/grayscale/binary or RGB")]
    ChannelMismatch,
    #[error("Render failed: {0}")]
    Render(String),
    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PseudocolorError>;
