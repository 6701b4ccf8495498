//! Downsampling a camera frame to a character grid of brightness values.

use super::dimensions::GridSize;
use super::grayscale::luminance;
use crate::camera::Frame;

/// Pixel span `[start, end)` covered by cell `index` of `cells` along an
/// axis of `pixels` pixels. Every cell covers at least one pixel, so grids
/// wider than the image sample (repeat) the nearest pixel instead of going
/// black.
#[inline]
fn cell_span(index: u16, cells: u16, pixels: u32) -> (u32, u32) {
    let size = pixels as f32 / cells as f32;
    let start = ((index as f32 * size) as u32).min(pixels - 1);
    let end = (((index + 1) as f32 * size) as u32).clamp(start + 1, pixels);
    (start, end)
}

/// Downsample an RGB frame to per-cell brightness, reusing `buffer`.
///
/// Maps image pixels to grid cells by averaging the BT.601 luminance of
/// all pixels within each cell. The output always has exactly
/// `grid.columns * grid.rows` values in row-major order, whatever the
/// frame's resolution.
///
/// # Returns
/// The number of brightness values written to the buffer.
pub fn downsample_luminance_into(frame: &Frame, grid: GridSize, buffer: &mut Vec<u8>) -> usize {
    buffer.clear();

    let output_size = grid.cells();
    if output_size == 0 {
        return 0;
    }

    // An empty frame has nothing to average; render it as black.
    if frame.width == 0 || frame.height == 0 || frame.data.is_empty() {
        buffer.resize(output_size, 0);
        return output_size;
    }

    buffer.reserve(output_size);

    for cy in 0..grid.rows {
        let (start_y, end_y) = cell_span(cy, grid.rows, frame.height);
        for cx in 0..grid.columns {
            let (start_x, end_x) = cell_span(cx, grid.columns, frame.width);

            let mut sum = 0u32;
            let mut count = 0u32;

            for py in start_y..end_y {
                for px in start_x..end_x {
                    let [r, g, b] = frame.pixel(px, py);
                    sum += luminance(r, g, b) as u32;
                    count += 1;
                }
            }

            buffer.push(if count > 0 { (sum / count) as u8 } else { 0 });
        }
    }

    output_size
}

/// Allocating version of [`downsample_luminance_into`].
pub fn downsample_luminance(frame: &Frame, grid: GridSize) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(grid.cells());
    downsample_luminance_into(frame, grid, &mut buffer);
    buffer
}
