//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::ascii::{level_by_name, DENSITY_LEVELS};
use crate::camera::Resolution;

/// Live webcam to ASCII art, steered by hand gestures
#[derive(Parser, Debug)]
#[command(name = "ascii-gesture")]
#[command(version, about = "Live webcam to ASCII art with hand-gesture controls", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Camera device (index, or platform device path/name)
    #[arg(long)]
    pub camera: Option<String>,

    /// Capture resolution, WIDTHxHEIGHT
    #[arg(long, short, value_parser = parse_resolution)]
    pub resolution: Option<Resolution>,

    /// Capture and tick rate (1-120)
    #[arg(long, value_parser = parse_framerate)]
    pub fps: Option<u32>,

    /// Character grid width
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub columns: Option<u16>,

    /// Starting glyph ramp, by name or index (see `ramps`)
    #[arg(long, value_parser = parse_density)]
    pub density: Option<usize>,

    /// Do not mirror the camera
    #[arg(long)]
    pub no_mirror: bool,

    /// Invert brightness (for light terminals)
    #[arg(long)]
    pub invert: bool,

    /// Do not open the raw camera window
    #[arg(long)]
    pub no_preview: bool,

    /// Do not draw the detected hand on the camera window
    #[arg(long)]
    pub no_landmarks: bool,

    /// Hide status bar
    #[arg(long)]
    pub no_status: bool,

    /// Disable gesture control
    #[arg(long)]
    pub no_gestures: bool,

    /// Landmark detector command line, e.g. "python3 hands.py"
    #[arg(long)]
    pub detector: Option<String>,

    /// Write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log filter (e.g. info, debug, ascii_gesture=trace)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Directory for screenshots and recordings
    #[arg(long, short)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the live view (default)
    Run,
    /// List glyph ramps by density level
    Ramps,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show effective configuration
    Show,
    /// Create default config file
    Init,
}

/// Parse and validate resolution (WIDTHxHEIGHT format)
fn parse_resolution(s: &str) -> Result<Resolution, String> {
    let (width, height) = s.split_once('x').ok_or_else(|| {
        format!(
            "Invalid resolution format '{}'. Use WIDTHxHEIGHT (e.g., 640x480)",
            s
        )
    })?;
    let width: u32 = width
        .parse()
        .map_err(|_| format!("Invalid width '{}' in resolution", width))?;
    let height: u32 = height
        .parse()
        .map_err(|_| format!("Invalid height '{}' in resolution", height))?;
    if width == 0 || height == 0 {
        return Err("Resolution width and height must be greater than 0".to_string());
    }
    if width > 3840 || height > 2160 {
        return Err("Resolution exceeds maximum supported (3840x2160)".to_string());
    }
    Ok(Resolution { width, height })
}

/// Parse and validate framerate (1-120 fps)
fn parse_framerate(s: &str) -> Result<u32, String> {
    let fps: u32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid framerate", s))?;
    if !(1..=120).contains(&fps) {
        return Err(format!("Framerate must be between 1 and 120 fps, got {}", fps));
    }
    Ok(fps)
}

/// Parse a ramp name or index
fn parse_density(s: &str) -> Result<usize, String> {
    if let Some(level) = level_by_name(s) {
        return Ok(level);
    }
    match s.parse::<usize>() {
        Ok(level) if level < DENSITY_LEVELS => Ok(level),
        _ => Err(format!(
            "Unknown ramp '{}'. Use a name or an index 0-{} (see `ramps`)",
            s,
            DENSITY_LEVELS - 1
        )),
    }
}
