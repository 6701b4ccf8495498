//! Frame to ASCII conversion with the live render parameters.

use super::charset::ramp;
use super::dimensions::GridSize;
use super::downsample::downsample_luminance;
use super::frame::AsciiFrame;
use super::mapping::map_to_chars_into;
use crate::camera::Frame;
use crate::controller::RenderParameters;

/// Converts camera frames into ASCII frames of a fixed grid size.
///
/// Holds only configuration: the same frame and parameters always produce
/// the same output.
#[derive(Debug, Clone, Copy)]
pub struct LuminanceMapper {
    grid: GridSize,
    invert: bool,
}

impl LuminanceMapper {
    pub fn new(grid: GridSize, invert: bool) -> Self {
        Self { grid, invert }
    }

    /// The output grid size.
    pub fn grid(&self) -> GridSize {
        self.grid
    }

    /// Render `frame` as ASCII.
    ///
    /// 1. Average BT.601 luminance over each cell of the grid
    /// 2. Add the brightness offset, clamped to [0, 255]
    /// 3. Look the result up in the ramp selected by the density level
    ///
    /// The density level is trusted to be in range; the controller's bounds
    /// guarantee it.
    pub fn map(&self, frame: &Frame, params: &RenderParameters) -> AsciiFrame {
        let brightness = downsample_luminance(frame, self.grid);
        let glyphs = ramp(params.density).glyphs;

        let mut chars = Vec::with_capacity(brightness.len());
        map_to_chars_into(&brightness, params.brightness, glyphs, self.invert, &mut chars);

        AsciiFrame::from_chars(chars, self.grid.columns, self.grid.rows)
    }
}
