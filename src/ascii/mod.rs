//! ASCII renderer module for converting camera frames to ASCII art.
//!
//! The conversion runs once per tick:
//!
//! 1. **Downsampling** - Average BT.601 luminance over each grid cell
//! 2. **Offset** - Add the live brightness offset, clamped to [0, 255]
//! 3. **Character mapping** - Look brightness up in the active glyph ramp
//!
//! # Glyph ramps
//!
//! The density level picks one of [`RAMPS`], ordered sparse to dense:
//! `minimal`, `blocks`, `standard` (default), `classic`, `detailed`.

mod charset;
mod dimensions;
mod downsample;
mod frame;
mod grayscale;
mod mapper;
mod mapping;

pub use charset::{
    level_by_name, ramp, GlyphRamp, BLOCKS_RAMP, CLASSIC_RAMP, DEFAULT_DENSITY, DENSITY_LEVELS,
    DETAILED_RAMP, MINIMAL_RAMP, RAMPS, STANDARD_RAMP,
};
pub use dimensions::{GridSize, DEFAULT_CHAR_ASPECT_RATIO};
pub use downsample::{downsample_luminance, downsample_luminance_into};
pub use frame::AsciiFrame;
pub use grayscale::luminance;
pub use mapper::LuminanceMapper;
pub use mapping::{apply_offset, glyph_for, map_to_chars_into};
