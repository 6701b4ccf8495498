use clap::Parser;
use crossterm::event::EventStream;

use ascii_gesture::ascii::LuminanceMapper;
use ascii_gesture::camera::{CameraError, CameraSource};
use ascii_gesture::cli::{apply_overrides, handle_config_action, print_ramps, Args, Command};
use ascii_gesture::config::{Config, ConfigError};
use ascii_gesture::controller::ParameterController;
use ascii_gesture::event_loop::{self, ExitReason, LoopError, LoopOptions};
use ascii_gesture::gesture::{GestureClassifier, LandmarkDetector, NoDetector, SidecarDetector};
use ascii_gesture::logging::{self, LoggingError};
use ascii_gesture::pipeline::{FramePipeline, GestureDebouncer, PipelineOptions};
use ascii_gesture::recorder::Recorder;
use ascii_gesture::render::{DualWindowCompositor, RenderError, StatusBar};

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error("Failed to install signal handler: {0}")]
    Signal(#[from] ctrlc::Error),

    #[error(transparent)]
    Camera(#[from] CameraError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Loop(#[from] LoopError),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    let result = match args.command {
        Some(Command::Ramps) => {
            print_ramps();
            Ok(())
        }
        Some(Command::Config { ref action }) => {
            handle_config_action(action.clone(), args.config.as_deref()).map_err(AppError::from)
        }
        Some(Command::Run) | None => run_live(&args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run_live(args: &Args) -> Result<(), AppError> {
    let mut config = Config::load(args.config.as_deref())?;
    apply_overrides(args, &mut config);
    config.validate()?;

    logging::init(config.logging.file.as_deref(), &config.logging.level)?;
    log::info!(
        "Starting: camera {} at {} {}fps, {} columns",
        config.camera.device,
        config.resolution(),
        config.camera.fps,
        config.ascii.columns
    );

    let stop = event_loop::install_stop_handler()?;

    let source = CameraSource::open(config.camera_settings())?;
    let detector = open_detector(&config);

    let mut pipeline = FramePipeline::new(
        source,
        detector,
        GestureClassifier::new(config.gesture.thresholds),
        GestureDebouncer::new(config.debounce()),
        ParameterController::new(config.initial_parameters(), config.gesture.brightness_step),
        LuminanceMapper::new(config.grid(), config.ascii.invert),
        PipelineOptions {
            mirror: config.camera.mirror,
            gestures: config.gesture.enabled,
        },
    );
    let mut recorder = Recorder::new(config.recording_dir(), config.camera.fps);

    let preview = config
        .ui
        .preview
        .then(|| (config.resolution(), config.camera.fps));
    let mut compositor =
        DualWindowCompositor::open(StatusBar::with_visibility(config.ui.status_bar), preview)?
            .with_landmarks(config.ui.landmarks);
    log::info!(
        "Windows: ascii{}",
        if compositor.has_preview() { " + camera" } else { "" }
    );

    let options = LoopOptions {
        fps: config.camera.fps,
        resolution: config.resolution(),
        show_help: config.ui.help,
    };
    let outcome = event_loop::run(
        &mut pipeline,
        &mut compositor,
        &mut recorder,
        EventStream::new(),
        stop,
        options,
    )
    .await;

    if let Err(e) = recorder.stop() {
        log::error!("Failed to finish recording: {}", e);
    }
    compositor.close()?;

    match outcome {
        Ok(ExitReason::Quit) => log::info!("Quit"),
        Ok(reason) => log::info!("Stopped: {:?}", reason),
        Err(e) => {
            log::error!("Stopped on error: {}", e);
            return Err(e.into());
        }
    }
    Ok(())
}

/// The configured landmark sidecar, or no detector at all.
fn open_detector(config: &Config) -> Box<dyn LandmarkDetector> {
    if !config.gesture.enabled || config.detector.command.is_empty() {
        log::info!("Gesture detection off; keyboard controls only");
        return Box::new(NoDetector);
    }

    match SidecarDetector::spawn(&config.detector.command, config.detector_timeout()) {
        Ok(detector) => {
            log::info!("Landmark detector started: {:?}", config.detector.command);
            Box::new(detector)
        }
        Err(e) => {
            log::warn!("Landmark detector unavailable, gestures disabled: {}", e);
            eprintln!("Warning: landmark detector unavailable: {}", e);
            Box::new(NoDetector)
        }
    }
}
