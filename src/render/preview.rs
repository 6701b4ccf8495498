//! Raw camera window, shown through an ffplay process.

use std::io::Write;
use std::process::ChildStdin;
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread;

use crate::camera::{Frame, Resolution};
use crate::ffmpeg::{HelperProcess, Pipes, ProcessError};

/// Build ffplay arguments for a rawvideo window.
pub fn preview_args(resolution: Resolution, fps: u32, title: &str) -> Vec<String> {
    vec![
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-fflags".to_string(),
        "nobuffer".to_string(),
        "-f".to_string(),
        "rawvideo".to_string(),
        "-pixel_format".to_string(),
        "rgb24".to_string(),
        "-video_size".to_string(),
        resolution.to_string(),
        "-framerate".to_string(),
        fps.to_string(),
        "-window_title".to_string(),
        title.to_string(),
        "-i".to_string(),
        "pipe:0".to_string(),
    ]
}

/// Window showing the (mirrored) camera frames.
///
/// Frames are handed to a writer thread through a single-slot channel; if
/// ffplay has not consumed the previous frame yet, the new one is dropped
/// so the tick loop never waits on the window.
pub struct PreviewWindow {
    frames: Option<SyncSender<Arc<Frame>>>,
    process: HelperProcess,
    resolution: Resolution,
}

impl std::fmt::Debug for PreviewWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewWindow")
            .field("process", &self.process)
            .field("resolution", &self.resolution)
            .finish_non_exhaustive()
    }
}

impl PreviewWindow {
    /// Open a window for frames of `resolution`.
    pub fn open(resolution: Resolution, fps: u32) -> Result<Self, ProcessError> {
        let args = preview_args(resolution, fps, "ascii-gesture camera");
        let mut process = HelperProcess::spawn("ffplay", &args, Pipes::INPUT)?;
        let stdin = process.take_stdin().ok_or_else(|| {
            ProcessError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "ffplay has no stdin",
            ))
        })?;

        let (tx, rx) = mpsc::sync_channel(1);
        thread::spawn(move || write_frames(stdin, rx));

        log::info!("Preview window opened ({})", resolution);

        Ok(Self {
            frames: Some(tx),
            process,
            resolution,
        })
    }

    /// Queue a frame for display.
    ///
    /// # Returns
    /// `false` once the window is gone (closed by the user or crashed).
    pub fn show(&mut self, frame: Arc<Frame>) -> bool {
        if frame.resolution() != self.resolution {
            log::debug!(
                "Skipping preview frame of {} (window is {})",
                frame.resolution(),
                self.resolution
            );
            return true;
        }

        let Some(frames) = &self.frames else {
            return false;
        };
        match frames.try_send(frame) {
            Ok(()) | Err(TrySendError::Full(_)) => true,
            Err(TrySendError::Disconnected(_)) => {
                self.frames = None;
                false
            }
        }
    }
}

fn write_frames(mut stdin: ChildStdin, frames: Receiver<Arc<Frame>>) {
    for frame in frames {
        if let Err(e) = stdin.write_all(&frame.data).and_then(|_| stdin.flush()) {
            log::info!("Preview window closed: {}", e);
            break;
        }
    }
}

impl Drop for PreviewWindow {
    fn drop(&mut self) {
        self.frames = None;
        if let Err(e) = self.process.shutdown() {
            log::warn!("Failed to close preview window: {}", e);
        }
    }
}
