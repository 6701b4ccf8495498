//! The per-tick character grid.

use std::fmt;

/// Character grid produced by the luminance mapper, row-major.
///
/// Immutable once produced; the tick loop shares it behind an `Arc`
/// between the renderer and the recorder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AsciiFrame {
    pub chars: Vec<char>,
    /// Columns
    pub width: u16,
    /// Rows
    pub height: u16,
}

impl AsciiFrame {
    /// All-space grid of `width` x `height`.
    pub fn new(width: u16, height: u16) -> Self {
        Self::from_chars(vec![' '; width as usize * height as usize], width, height)
    }

    pub fn from_chars(chars: Vec<char>, width: u16, height: u16) -> Self {
        debug_assert_eq!(chars.len(), width as usize * height as usize);
        Self {
            chars,
            width,
            height,
        }
    }

    /// Glyph at (`column`, `row`), if inside the grid.
    pub fn get(&self, column: u16, row: u16) -> Option<char> {
        if column >= self.width || row >= self.height {
            return None;
        }
        self.chars
            .get(row as usize * self.width as usize + column as usize)
            .copied()
    }

    /// Rows as slices, top to bottom. An empty grid has none.
    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.chars.chunks(self.width.max(1) as usize)
    }

    /// Text form, rows joined by `\n` with no trailing newline.
    pub fn to_string_display(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AsciiFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.width == 0 || self.height == 0 {
            return Ok(());
        }
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            for &c in row {
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}
