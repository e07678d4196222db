//! Rendering of composites and debug output dispatch.
//!
//! The compositor only produces a [`Composite`]; turning it into pixels on a
//! screen or in a file is the job of a [`CanvasRenderer`]. Debug output picks
//! which renderer call (if any) follows a compose step. Output file names are
//! derived from an explicit step number supplied by the caller.

pub mod raster;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::debug;

use crate::compositor::Composite;
use crate::error::{PseudocolorError, Result};

pub use raster::RasterRenderer;

/// Suffix of files written in [`DebugMode::Print`].
pub const OUTPUT_SUFFIX: &str = "_pseudocolored.png";

/// Resolution used when none is requested.
pub const DEFAULT_DPI: u32 = 100;

/// Where a rendered composite goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Interactive display.
    Display,
    File(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderSettings {
    /// Output resolution; `None` uses [`DEFAULT_DPI`].
    pub dpi: Option<u32>,
}

impl RenderSettings {
    pub fn with_dpi(dpi: u32) -> Self {
        Self { dpi: Some(dpi) }
    }

    pub fn dpi(&self) -> u32 {
        self.dpi.unwrap_or(DEFAULT_DPI)
    }
}

/// Something that can display or persist a composite.
pub trait CanvasRenderer {
    fn render(
        &self,
        composite: &Composite,
        destination: &Destination,
        settings: &RenderSettings,
    ) -> Result<()>;
}

/// Which renderer call follows a compose step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebugMode {
    /// Return only.
    #[default]
    Off,
    /// Write to `{step}_pseudocolored.png` in the output directory.
    Print,
    /// Show on the interactive display.
    Plot,
}

impl fmt::Display for DebugMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DebugMode::Off => "none",
            DebugMode::Print => "print",
            DebugMode::Plot => "plot",
        };
        f.write_str(name)
    }
}

impl FromStr for DebugMode {
    type Err = PseudocolorError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "none" | "off" | "" => Ok(DebugMode::Off),
            "print" => Ok(DebugMode::Print),
            "plot" => Ok(DebugMode::Plot),
            other => Err(PseudocolorError::UnknownDebugMode(other.to_string())),
        }
    }
}

/// Path of the debug image for a given step.
pub fn debug_path(dir: &Path, step: usize) -> PathBuf {
    dir.join(format!("{}{}", step, OUTPUT_SUFFIX))
}

/// Hand `composite` to `renderer` according to `mode`.
pub fn debug_output<R: CanvasRenderer + ?Sized>(
    renderer: &R,
    composite: &Composite,
    mode: DebugMode,
    step: usize,
    dir: &Path,
    settings: &RenderSettings,
) -> Result<()> {
    let destination = match mode {
        DebugMode::Off => return Ok(()),
        DebugMode::Print => Destination::File(debug_path(dir, step)),
        DebugMode::Plot => Destination::Display,
    };
    debug!("Debug output ({}) for step {} to {:?}", mode, step, destination);
    renderer.render(composite, &destination, settings)
}
