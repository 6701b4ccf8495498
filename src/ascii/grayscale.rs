//! RGB to luminance conversion using the ITU-R BT.601 formula.

/// Luminance of one RGB pixel: Y = 0.299*R + 0.587*G + 0.114*B
///
/// Integer math for the hot path; coefficients scaled by 1000
/// (299 + 587 + 114 = 1000), so white maps to exactly 255.
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    ((299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000) as u8
}
