//! Presentation of tick output.
//!
//! The [`DualWindowCompositor`] shows every tick in two windows: the ASCII
//! rendering in the terminal and the mirrored camera frame in an ffplay
//! window. Both come from the same [`TickOutput`], so the windows never
//! drift apart by a tick.

mod overlay;
mod preview;
mod raw_mode;
mod status_bar;
mod terminal;

pub use overlay::{draw_landmarks, JOINT_COLOR};
pub use preview::{preview_args, PreviewWindow};
pub use raw_mode::RawModeGuard;
pub use status_bar::{fit_to_width, Hud, StatusBar, HELP_LINE};
pub use terminal::{compose_screen, TerminalView};

use std::sync::Arc;

use crate::camera::{Frame, Resolution};
use crate::ffmpeg::ProcessError;
use crate::pipeline::TickOutput;

/// Errors from presenting a tick.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("preview window error: {0}")]
    Preview(#[from] ProcessError),
}

/// Consumer of tick output.
pub trait Renderer {
    /// Show one tick. Called once per tick, in tick order.
    fn present(&mut self, output: &TickOutput, hud: &Hud) -> Result<(), RenderError>;

    /// The terminal changed size.
    fn resize(&mut self, _cols: u16, _rows: u16) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Terminal ASCII view plus optional raw-frame window.
pub struct DualWindowCompositor {
    terminal: TerminalView,
    preview: Option<PreviewWindow>,
    /// Draw the detected hand over the camera window
    landmarks: bool,
}

impl DualWindowCompositor {
    /// Take over the terminal and, if `preview` is given, open the camera
    /// window for frames of that resolution and rate.
    ///
    /// A missing ffplay only disables the camera window.
    pub fn open(
        status_bar: StatusBar,
        preview: Option<(Resolution, u32)>,
    ) -> Result<Self, RenderError> {
        let preview = preview.and_then(|(resolution, fps)| {
            match PreviewWindow::open(resolution, fps) {
                Ok(window) => Some(window),
                Err(e) => {
                    log::warn!("Camera window disabled: {}", e);
                    None
                }
            }
        });
        let terminal = TerminalView::open(status_bar)?;
        Ok(Self {
            terminal,
            preview,
            landmarks: true,
        })
    }

    /// Turn the hand skeleton on the camera window on or off.
    pub fn with_landmarks(mut self, landmarks: bool) -> Self {
        self.landmarks = landmarks;
        self
    }

    pub fn has_preview(&self) -> bool {
        self.preview.is_some()
    }

    /// Restore the terminal and close the camera window.
    pub fn close(self) -> Result<(), RenderError> {
        drop(self.preview);
        self.terminal.close()?;
        Ok(())
    }
}

/// Frame for the camera window: the tick's frame, with the hand drawn on
/// a copy when `landmarks` is set and a hand was found.
pub fn camera_frame(output: &TickOutput, landmarks: bool) -> Arc<Frame> {
    match output.hand.as_deref() {
        Some(hand) if landmarks => Arc::new(draw_landmarks(&output.frame, hand)),
        _ => Arc::clone(&output.frame),
    }
}

impl Renderer for DualWindowCompositor {
    fn present(&mut self, output: &TickOutput, hud: &Hud) -> Result<(), RenderError> {
        if output.fresh {
            if let Some(preview) = self.preview.as_mut() {
                if !preview.show(camera_frame(output, self.landmarks)) {
                    log::warn!("Camera window closed; continuing with the ASCII view only");
                    self.preview = None;
                }
            }
        }
        self.terminal.draw(output, hud)?;
        Ok(())
    }

    fn resize(&mut self, cols: u16, rows: u16) -> Result<(), RenderError> {
        self.terminal.resize(cols, rows)?;
        Ok(())
    }
}
