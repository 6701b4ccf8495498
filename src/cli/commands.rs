//! Subcommand handlers and config overrides.

use std::path::Path;

use super::args::{Args, ConfigAction};
use crate::ascii::{DEFAULT_DENSITY, RAMPS};
use crate::config::{default_path, Config, ConfigError};

/// Print the glyph ramps, one per density level.
pub fn print_ramps() {
    println!("Glyph ramps (density levels):");
    for (level, ramp) in RAMPS.iter().enumerate() {
        let glyphs: String = ramp.glyphs.iter().collect();
        let marker = if level == DEFAULT_DENSITY { " (default)" } else { "" };
        println!(
            "  {} {:<9} {:>2} levels  \"{}\"{}",
            level,
            ramp.name,
            ramp.glyphs.len(),
            glyphs,
            marker
        );
    }
    println!();
    println!("Use --density <name|index> to pick the starting ramp.");
}

/// Handle config subcommand actions.
///
/// # Arguments
/// * `action` - Show or Init
/// * `path` - Config path from `--config`, or `None` for the default location
pub fn handle_config_action(action: ConfigAction, path: Option<&Path>) -> Result<(), ConfigError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => default_path().ok_or(ConfigError::NoConfigDir)?,
    };

    match action {
        ConfigAction::Show => {
            let config = Config::load(Some(&path))?;
            if path.exists() {
                println!("# Config file: {} (exists)", path.display());
            } else {
                println!("# Config file: {} (not found, using defaults)", path.display());
            }
            println!();
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Init => {
            Config::write_default(&path)?;
            println!("Created config file: {}", path.display());
        }
    }
    Ok(())
}

/// Apply command-line overrides on top of the loaded config.
pub fn apply_overrides(args: &Args, config: &mut Config) {
    if let Some(camera) = &args.camera {
        config.camera.device = camera.clone();
    }
    if let Some(resolution) = args.resolution {
        config.camera.width = resolution.width;
        config.camera.height = resolution.height;
    }
    if let Some(fps) = args.fps {
        config.camera.fps = fps;
    }
    if args.no_mirror {
        config.camera.mirror = false;
    }
    if let Some(columns) = args.columns {
        config.ascii.columns = columns;
    }
    if let Some(density) = args.density {
        config.ascii.density = density;
    }
    if args.invert {
        config.ascii.invert = true;
    }
    if args.no_gestures {
        config.gesture.enabled = false;
    }
    if let Some(detector) = &args.detector {
        config.detector.command = detector.split_whitespace().map(str::to_string).collect();
    }
    if args.no_preview {
        config.ui.preview = false;
    }
    if args.no_landmarks {
        config.ui.landmarks = false;
    }
    if args.no_status {
        config.ui.status_bar = false;
    }
    if let Some(dir) = &args.output_dir {
        config.recording.dir = Some(dir.clone());
    }
    if let Some(file) = &args.log_file {
        config.logging.file = Some(file.clone());
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
}
