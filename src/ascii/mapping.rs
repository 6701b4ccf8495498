//! Brightness to glyph mapping.

/// Apply a signed brightness offset, clamping to [0, 255].
#[inline]
pub fn apply_offset(brightness: u8, offset: i32) -> u8 {
    (brightness as i32 + offset).clamp(0, 255) as u8
}

/// Map one brightness value to a glyph.
///
/// Lower brightness maps to earlier glyphs (darker/sparser), higher
/// brightness to later ones. With `invert`, the scale is flipped for light
/// terminals.
#[inline]
pub fn glyph_for(brightness: u8, ramp: &[char], invert: bool) -> char {
    if ramp.is_empty() {
        return ' ';
    }
    let b = if invert { 255 - brightness } else { brightness };
    let idx = (b as usize * (ramp.len() - 1)) / 255;
    ramp[idx]
}

/// Map brightness values to glyphs, reusing `buffer`.
///
/// Each value gets `offset` added (clamped) before the lookup.
///
/// # Example
/// ```ignore
/// let mut chars = Vec::new();
/// map_to_chars_into(&[0, 127, 255], 0, STANDARD_RAMP, false, &mut chars);
/// // chars == [' ', '=', '@']
/// ```
///
/// # Returns
/// The number of characters written to the buffer.
pub fn map_to_chars_into(
    brightness: &[u8],
    offset: i32,
    ramp: &[char],
    invert: bool,
    buffer: &mut Vec<char>,
) -> usize {
    buffer.clear();
    buffer.reserve(brightness.len());

    buffer.extend(
        brightness
            .iter()
            .map(|&b| glyph_for(apply_offset(b, offset), ramp, invert)),
    );

    brightness.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ascii::STANDARD_RAMP;

    #[test]
    fn test_apply_offset_clamps() {
        assert_eq!(apply_offset(250, 100), 255);
        assert_eq!(apply_offset(5, -100), 0);
        assert_eq!(apply_offset(100, 10), 110);
        assert_eq!(apply_offset(100, 0), 100);
    }

    #[test]
    fn test_glyph_for_extremes() {
        assert_eq!(glyph_for(0, STANDARD_RAMP, false), ' ');
        assert_eq!(glyph_for(255, STANDARD_RAMP, false), '@');
        assert_eq!(glyph_for(0, STANDARD_RAMP, true), '@');
        assert_eq!(glyph_for(255, STANDARD_RAMP, true), ' ');
    }

    #[test]
    fn test_glyph_for_empty_ramp() {
        assert_eq!(glyph_for(128, &[], false), ' ');
    }

    #[test]
    fn test_map_to_chars_into() {
        let mut chars = vec!['x'; 10];
        let n = map_to_chars_into(&[0, 127, 255], 0, STANDARD_RAMP, false, &mut chars);
        assert_eq!(n, 3);
        // 127 * 9 / 255 = 4 -> '='
        assert_eq!(chars, vec![' ', '=', '@']);
    }

    #[test]
    fn test_map_to_chars_offset_shifts_glyphs() {
        let mut dark = Vec::new();
        let mut bright = Vec::new();
        map_to_chars_into(&[100], 0, STANDARD_RAMP, false, &mut dark);
        map_to_chars_into(&[100], 100, STANDARD_RAMP, false, &mut bright);
        let pos = |c: char| STANDARD_RAMP.iter().position(|&g| g == c).unwrap();
        assert!(pos(bright[0]) > pos(dark[0]));
    }
}
