//! Glyph ramps used for ASCII rendering.
//!
//! A ramp is ordered from darkest (sparse) to brightest (dense). The
//! density level held in the render parameters selects which ramp is
//! active; ramps are ordered by how many brightness levels they resolve.

/// Minimal ramp (4 levels). Clean, less noisy look.
pub const MINIMAL_RAMP: &[char] = &[' ', '.', ':', '#'];

/// Unicode shade blocks (5 levels).
pub const BLOCKS_RAMP: &[char] = &[' ', '░', '▒', '▓', '█'];

/// Standard ASCII density ramp (10 levels). Works well on dark terminals.
pub const STANDARD_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Classic 12-level ramp.
pub const CLASSIC_RAMP: &[char] = &[' ', '.', ',', ':', ';', '+', '*', '?', '%', '$', '#', '@'];

/// Detailed 70-level ramp for wide grids.
pub const DETAILED_RAMP: &[char] = &[
    ' ', '.', '\'', '`', '^', '"', ',', ':', ';', 'I', 'l', '!', 'i', '>', '<', '~', '+', '_',
    '-', '?', ']', '[', '}', '{', '1', ')', '(', '|', '\\', '/', 't', 'f', 'j', 'r', 'x', 'n',
    'u', 'v', 'c', 'z', 'X', 'Y', 'U', 'J', 'C', 'L', 'Q', '0', 'O', 'Z', 'm', 'w', 'q', 'p',
    'd', 'b', 'k', 'h', 'a', 'o', '*', '#', 'M', 'W', '&', '8', '%', 'B', '@', '$',
];

/// A named glyph ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphRamp {
    pub name: &'static str,
    pub glyphs: &'static [char],
}

/// All ramps, indexed by density level.
pub const RAMPS: [GlyphRamp; 5] = [
    GlyphRamp {
        name: "minimal",
        glyphs: MINIMAL_RAMP,
    },
    GlyphRamp {
        name: "blocks",
        glyphs: BLOCKS_RAMP,
    },
    GlyphRamp {
        name: "standard",
        glyphs: STANDARD_RAMP,
    },
    GlyphRamp {
        name: "classic",
        glyphs: CLASSIC_RAMP,
    },
    GlyphRamp {
        name: "detailed",
        glyphs: DETAILED_RAMP,
    },
];

/// Number of density levels.
pub const DENSITY_LEVELS: usize = RAMPS.len();

/// Default density level (mid-ramp).
pub const DEFAULT_DENSITY: usize = DENSITY_LEVELS / 2;

/// Ramp for a density level.
///
/// Levels are bounded by the parameter controller, so an out-of-range level
/// is a caller bug; it saturates to the densest ramp rather than panicking.
pub fn ramp(level: usize) -> &'static GlyphRamp {
    &RAMPS[level.min(DENSITY_LEVELS - 1)]
}

/// Find a ramp's density level by name.
pub fn level_by_name(name: &str) -> Option<usize> {
    RAMPS
        .iter()
        .position(|r| r.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramps_ordered_by_levels() {
        for pair in RAMPS.windows(2) {
            assert!(pair[0].glyphs.len() < pair[1].glyphs.len());
        }
    }

    #[test]
    fn test_ramps_start_with_space() {
        for r in RAMPS.iter() {
            assert_eq!(r.glyphs[0], ' ', "{} should start dark", r.name);
        }
    }

    #[test]
    fn test_default_density_is_standard() {
        assert_eq!(DEFAULT_DENSITY, 2);
        assert_eq!(ramp(DEFAULT_DENSITY).name, "standard");
    }

    #[test]
    fn test_detailed_ramp_length() {
        assert_eq!(DETAILED_RAMP.len(), 70);
    }

    #[test]
    fn test_ramp_saturates() {
        assert_eq!(ramp(99).name, "detailed");
    }

    #[test]
    fn test_level_by_name() {
        assert_eq!(level_by_name("blocks"), Some(1));
        assert_eq!(level_by_name("Classic"), Some(3));
        assert_eq!(level_by_name("sparkle"), None);
    }
}
