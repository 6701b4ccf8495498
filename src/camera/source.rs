//! The frame-source seam between the tick loop and the capture device.

use super::types::{CameraError, Frame};

/// Anything that can hand the tick loop camera frames.
///
/// Implementations must not block waiting for the device: when no new frame
/// is ready they return `Ok(None)` and the tick degrades to reusing the last
/// output.
pub trait FrameSource {
    /// Fetch the newest frame.
    ///
    /// * `Ok(Some(frame))` - a frame captured since the previous call
    /// * `Ok(None)` - no new frame is ready yet (transient)
    /// * `Err(CameraError::DeviceUnavailable)` - the device is gone (fatal)
    fn next_frame(&mut self) -> Result<Option<Frame>, CameraError>;
}

impl<T: FrameSource + ?Sized> FrameSource for Box<T> {
    fn next_frame(&mut self) -> Result<Option<Frame>, CameraError> {
        (**self).next_frame()
    }
}
