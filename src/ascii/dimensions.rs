//! Character grid sizing with aspect-ratio correction.

use crate::camera::Resolution;

/// Default terminal character aspect ratio.
/// Terminal characters are typically ~2x taller than wide.
pub const DEFAULT_CHAR_ASPECT_RATIO: f32 = 2.0;

/// Size of the output character grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    pub columns: u16,
    pub rows: u16,
}

impl GridSize {
    pub fn new(columns: u16, rows: u16) -> Self {
        Self { columns, rows }
    }

    /// Number of cells in the grid.
    pub fn cells(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Grid of `columns` characters that shows a `capture`-sized image
    /// without vertical stretching.
    ///
    /// Characters are `char_aspect` times taller than wide, so a naive
    /// pixel-to-cell mapping stretches the image vertically. The row count
    /// is reduced by that factor:
    ///
    /// `rows = round(columns * height / width / char_aspect)`
    ///
    /// # Example
    /// ```ignore
    /// // 640x480 (4:3) at 120 columns with 2:1 glyphs -> 120x45
    /// let grid = GridSize::for_capture(120, Resolution::MEDIUM, 2.0);
    /// ```
    pub fn for_capture(columns: u16, capture: Resolution, char_aspect: f32) -> Self {
        // Handle edge cases
        if columns == 0 || capture.width == 0 || capture.height == 0 {
            return Self::new(columns.max(1), 1);
        }

        let char_aspect = if char_aspect > 0.0 {
            char_aspect
        } else {
            DEFAULT_CHAR_ASPECT_RATIO
        };

        let img_aspect = capture.width as f32 / capture.height as f32;
        let rows = (columns as f32 / (img_aspect * char_aspect)).round();

        Self::new(columns, rows.clamp(1.0, u16::MAX as f32) as u16)
    }
}

impl std::fmt::Display for GridSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.columns, self.rows)
    }
}
