//! Async tick loop interleaving frame ticks with keyboard input.
//!
//! Ticks and key events are handled on one task, one at a time, so
//! keyboard-driven parameter changes and gesture commits are applied in
//! the order they happen and never overlap a tick in progress.

use crossterm::event::Event;
use futures_util::{Stream, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::camera::{FrameSource, Resolution};
use crate::gesture::LandmarkDetector;
use crate::input::{command_for_key, Command};
use crate::pipeline::{FramePipeline, PipelineError, TickOutput};
use crate::recorder::{Recorder, RecorderEvent};
use crate::render::{Hud, RenderError, Renderer};

/// Errors that end the loop abnormally.
#[derive(Debug, thiserror::Error)]
pub enum LoopError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("terminal input error: {0}")]
    Input(#[from] std::io::Error),
}

/// Why the loop ended normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// Quit key
    Quit,
    /// SIGINT/SIGTERM raised the stop flag
    Signal,
    /// The key event stream ended
    InputClosed,
}

/// Loop settings.
#[derive(Debug, Clone, Copy)]
pub struct LoopOptions {
    /// Tick rate
    pub fps: u32,
    /// Frame size used when a recording is started
    pub resolution: Resolution,
    /// Show the help line from the start
    pub show_help: bool,
}

/// Smoothed rate of fresh frames.
#[derive(Debug, Clone, Default)]
pub struct FpsMeter {
    last: Option<Instant>,
    fps: f32,
}

impl FpsMeter {
    const SMOOTHING: f32 = 0.1;

    /// Register a frame at `now` and return the smoothed rate.
    pub fn tick(&mut self, now: Instant) -> f32 {
        if let Some(last) = self.last {
            let dt = now.saturating_duration_since(last).as_secs_f32();
            if dt > 0.0 {
                let instant = 1.0 / dt;
                self.fps = if self.fps == 0.0 {
                    instant
                } else {
                    self.fps + Self::SMOOTHING * (instant - self.fps)
                };
            }
        }
        self.last = Some(now);
        self.fps
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

enum Flow {
    Continue,
    Quit,
}

/// Run the tick loop until quit, stop signal or device loss.
///
/// # Arguments
/// * `pipeline` - Frame pipeline, owned by this loop for its duration
/// * `renderer` - Receives every tick's output
/// * `recorder` - Screenshot/recording sink
/// * `events` - Terminal events (crossterm `EventStream` in the binary)
/// * `stop` - Raised by the signal handler
/// * `options` - Tick rate and display settings
///
/// # Errors
/// * `LoopError::Pipeline` - the camera is gone
/// * `LoopError::Render` - the terminal could not be written
/// * `LoopError::Input` - the terminal event stream failed
pub async fn run<S, D, R, E>(
    pipeline: &mut FramePipeline<S, D>,
    renderer: &mut R,
    recorder: &mut Recorder,
    mut events: E,
    stop: Arc<AtomicBool>,
    options: LoopOptions,
) -> Result<ExitReason, LoopError>
where
    S: FrameSource,
    D: LandmarkDetector,
    R: Renderer,
    E: Stream<Item = std::io::Result<Event>> + Unpin,
{
    let period = Duration::from_secs_f64(1.0 / options.fps.max(1) as f64);
    let mut ticks = tokio::time::interval(period);
    ticks.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let mut hud = Hud {
        show_help: options.show_help,
        ..Hud::default()
    };
    let mut meter = FpsMeter::default();

    log::info!("Tick loop started at {} fps", options.fps);

    loop {
        if stop.load(Ordering::SeqCst) {
            log::info!("Stop signal received");
            return Ok(ExitReason::Signal);
        }

        tokio::select! {
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) => {
                        if let Some(command) = command_for_key(key) {
                            let flow = handle_command(command, pipeline, recorder, &mut hud, options.resolution);
                            if let Flow::Quit = flow {
                                return Ok(ExitReason::Quit);
                            }
                        }
                    }
                    Some(Ok(Event::Resize(cols, rows))) => {
                        renderer.resize(cols, rows)?;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => return Ok(ExitReason::InputClosed),
                }
            }

            _ = ticks.tick() => {
                if let Some(output) = pipeline.tick()? {
                    present(&output, renderer, recorder, &mut hud, &mut meter)?;
                }
            }
        }
    }
}

fn present<R: Renderer>(
    output: &TickOutput,
    renderer: &mut R,
    recorder: &mut Recorder,
    hud: &mut Hud,
    meter: &mut FpsMeter,
) -> Result<(), RenderError> {
    if output.fresh {
        hud.fps = meter.tick(Instant::now());
    }
    if let Some(label) = output.committed {
        hud.last_gesture = Some(label);
    }

    if let Err(e) = recorder.record(output) {
        log::error!("Recording failed: {}", e);
        hud.notice = Some(format!("recording failed: {}", e));
        if let Err(e) = recorder.stop() {
            log::error!("Failed to finish recording: {}", e);
        }
    }
    hud.recording = recorder.is_recording();

    renderer.present(output, hud)
}

fn handle_command<S: FrameSource, D: LandmarkDetector>(
    command: Command,
    pipeline: &mut FramePipeline<S, D>,
    recorder: &mut Recorder,
    hud: &mut Hud,
    resolution: Resolution,
) -> Flow {
    match command {
        Command::Control(action) => {
            let params = pipeline.controller_mut().apply(action);
            log::info!("Key {:?}: {}", action, params);
        }
        Command::Screenshot => {
            hud.notice = match pipeline.last_output() {
                Some(output) => match recorder.screenshot(&output.ascii) {
                    Ok(path) => Some(format!("saved {}", path.display())),
                    Err(e) => {
                        log::error!("Screenshot failed: {}", e);
                        Some(format!("screenshot failed: {}", e))
                    }
                },
                None => Some("no frame to capture yet".to_string()),
            };
        }
        Command::ToggleRecording => {
            hud.notice = match recorder.toggle(resolution) {
                Ok(RecorderEvent::Started(paths)) => {
                    Some(format!("recording to {}", paths.text.display()))
                }
                Ok(RecorderEvent::Stopped { frames, .. }) => {
                    Some(format!("recording saved ({} frames)", frames))
                }
                Err(e) => {
                    log::error!("Recording toggle failed: {}", e);
                    Some(format!("recording failed: {}", e))
                }
            };
            hud.recording = recorder.is_recording();
        }
        Command::ToggleHelp => hud.show_help = !hud.show_help,
        Command::Quit => return Flow::Quit,
    }
    Flow::Continue
}

/// Install a SIGINT/SIGTERM handler that raises the returned flag.
pub fn install_stop_handler() -> Result<Arc<AtomicBool>, ctrlc::Error> {
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
    })?;
    Ok(stop)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_meter_first_tick_is_zero() {
        let mut meter = FpsMeter::default();
        assert_eq!(meter.tick(Instant::now()), 0.0);
    }

    #[test]
    fn test_fps_meter_converges() {
        let mut meter = FpsMeter::default();
        let start = Instant::now();
        for i in 0..200 {
            meter.tick(start + Duration::from_millis(40 * i));
        }
        assert!((meter.fps() - 25.0).abs() < 0.5);
    }

    #[test]
    fn test_fps_meter_ignores_zero_interval() {
        let mut meter = FpsMeter::default();
        let now = Instant::now();
        meter.tick(now);
        assert_eq!(meter.tick(now), 0.0);
    }
}
