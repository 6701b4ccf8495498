//! Frame transformation utilities.

use super::types::Frame;

/// Mirror a frame horizontally (flip left-right) for selfie mode.
///
/// Takes the frame by value: the tick that captured it is its only owner,
/// so the flip happens before anything else can observe the frame.
pub fn mirror_horizontal(mut frame: Frame) -> Frame {
    let row_bytes = frame.width as usize * Frame::BYTES_PER_PIXEL;
    if row_bytes == 0 {
        return frame;
    }

    for row in frame.data.chunks_exact_mut(row_bytes) {
        // Reversing the bytes reverses pixel order but also each pixel's
        // channels; flip those back.
        row.reverse();
        for pixel in row.chunks_exact_mut(Frame::BYTES_PER_PIXEL) {
            pixel.reverse();
        }
    }

    frame
}
