//! Landmark detector seam.

use crate::camera::Frame;
use crate::ffmpeg::ProcessError;

use super::landmarks::LandmarkSet;

/// Errors from a landmark detector.
///
/// None of these end the session: the pipeline treats a failed detection
/// as "no hand" for that tick.
#[derive(Debug, thiserror::Error)]
pub enum DetectorError {
    #[error("detector command is empty")]
    EmptyCommand,

    #[error("failed to start detector: {0}")]
    Start(#[from] ProcessError),

    #[error("detector process exited")]
    Exited,

    #[error("detector is still busy with an earlier frame")]
    Busy,

    #[error("detector did not answer within {0} ms")]
    Timeout(u64),

    #[error("detector I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid detector response: {0}")]
    Protocol(#[from] serde_json::Error),
}

/// Produces hand landmarks for a frame.
///
/// Implementations must return within a bounded time; the tick loop calls
/// this synchronously. Only the first detected hand is reported, with
/// points in pixel coordinates of `frame`.
pub trait LandmarkDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Option<LandmarkSet>, DetectorError>;
}

impl<T: LandmarkDetector + ?Sized> LandmarkDetector for Box<T> {
    fn detect(&mut self, frame: &Frame) -> Result<Option<LandmarkSet>, DetectorError> {
        (**self).detect(frame)
    }
}

/// Detector used when no sidecar is configured: never sees a hand.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDetector;

impl LandmarkDetector for NoDetector {
    fn detect(&mut self, _frame: &Frame) -> Result<Option<LandmarkSet>, DetectorError> {
        Ok(None)
    }
}
