//! Camera capture handle backed by an ffmpeg helper process.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use super::capture_loop::run_capture_loop;
use super::device::capture_args;
use super::source::FrameSource;
use super::types::{CameraError, CameraSettings, Frame};
use crate::ffmpeg::{HelperProcess, Pipes};

/// Camera capture handle.
///
/// Spawns ffmpeg to decode the camera into packed RGB frames and runs a
/// background thread that keeps the latest complete frame in a single-slot
/// buffer. [`FrameSource::next_frame`] takes from that slot without
/// blocking.
pub struct CameraSource {
    /// Latest captured frame (shared with the reader thread)
    slot: Arc<Mutex<Option<Frame>>>,
    /// Raised by the reader thread when the stream ends
    ended: Arc<AtomicBool>,
    /// The ffmpeg capture process
    process: HelperProcess,
    /// Reader thread handle
    reader: Option<JoinHandle<()>>,
    settings: CameraSettings,
}

impl std::fmt::Debug for CameraSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraSource")
            .field("settings", &self.settings)
            .field("ended", &self.ended.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl CameraSource {
    /// Open the camera described by `settings` and start streaming frames.
    ///
    /// # Errors
    /// * `CameraError::Start` - ffmpeg is missing or could not be spawned
    pub fn open(settings: CameraSettings) -> Result<Self, CameraError> {
        let args = capture_args(&settings);
        log::info!(
            "Opening camera {} at {} {}fps",
            settings.device,
            settings.resolution,
            settings.fps
        );

        let mut process = HelperProcess::spawn("ffmpeg", &args, Pipes::OUTPUT)?;
        let stdout = process.take_stdout().ok_or_else(|| {
            CameraError::DeviceUnavailable("capture process has no stdout".to_string())
        })?;

        let slot = Arc::new(Mutex::new(None));
        let ended = Arc::new(AtomicBool::new(false));

        let reader = {
            let slot = Arc::clone(&slot);
            let ended = Arc::clone(&ended);
            let resolution = settings.resolution;
            std::thread::spawn(move || run_capture_loop(stdout, resolution, slot, ended))
        };

        Ok(Self {
            slot,
            ended,
            process,
            reader: Some(reader),
            settings,
        })
    }

    /// Get the current camera settings.
    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    /// Stop the capture process and wait for the reader thread.
    pub fn stop(&mut self) {
        if let Err(e) = self.process.shutdown() {
            log::warn!("Failed to stop camera capture cleanly: {}", e);
        }
        if let Some(handle) = self.reader.take() {
            let _ = handle.join();
        }
    }
}

impl FrameSource for CameraSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, CameraError> {
        take_latest(&self.slot, &self.ended, &self.settings.device)
    }
}

/// Take the newest frame from the reader thread's slot.
///
/// # Errors
/// * `CameraError::DeviceUnavailable` - the stream has ended and the slot
///   is empty, or the reader thread panicked while holding the slot
fn take_latest(
    slot: &Mutex<Option<Frame>>,
    ended: &AtomicBool,
    device: &str,
) -> Result<Option<Frame>, CameraError> {
    let frame = match slot.lock() {
        Ok(mut latest) => latest.take(),
        Err(_) => {
            return Err(CameraError::DeviceUnavailable(format!(
                "camera {} reader thread failed",
                device
            )))
        }
    };
    match frame {
        Some(frame) => Ok(Some(frame)),
        None if ended.load(Ordering::SeqCst) => Err(CameraError::DeviceUnavailable(format!(
            "camera {} stopped producing frames",
            device
        ))),
        None => Ok(None),
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        self.stop();
    }
}
