//! Camera types and data structures.

use std::time::Instant;

use crate::ffmpeg::ProcessError;

/// Camera resolution settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// Low resolution (320x240) - fast, enough for small grids
    pub const LOW: Resolution = Resolution {
        width: 320,
        height: 240,
    };

    /// Medium resolution (640x480) - balanced, recommended
    pub const MEDIUM: Resolution = Resolution {
        width: 640,
        height: 480,
    };

    /// High resolution (1280x720) - for wide grids
    pub const HIGH: Resolution = Resolution {
        width: 1280,
        height: 720,
    };

    /// Number of bytes in one packed RGB frame at this resolution.
    pub fn frame_bytes(&self) -> usize {
        self.width as usize * self.height as usize * Frame::BYTES_PER_PIXEL
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::MEDIUM
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A captured camera frame.
///
/// Packed RGB, row-major, 3 bytes per pixel. A frame is owned by the tick
/// that captured it; later stages derive new artifacts from it instead of
/// writing into it.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Raw pixel data in RGB format
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Timestamp when frame was captured
    pub timestamp: Instant,
}

impl Frame {
    pub const BYTES_PER_PIXEL: usize = 3;

    /// Wrap packed RGB data captured at `timestamp`.
    pub fn new(data: Vec<u8>, width: u32, height: u32, timestamp: Instant) -> Self {
        debug_assert_eq!(
            data.len(),
            width as usize * height as usize * Self::BYTES_PER_PIXEL,
            "frame data does not match its dimensions"
        );
        Self {
            data,
            width,
            height,
            timestamp,
        }
    }

    /// Resolution of this frame.
    pub fn resolution(&self) -> Resolution {
        Resolution {
            width: self.width,
            height: self.height,
        }
    }

    /// RGB triple at (x, y). Out-of-range coordinates read as black.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = (y as usize * self.width as usize + x as usize) * Self::BYTES_PER_PIXEL;
        match self.data.get(idx..idx + Self::BYTES_PER_PIXEL) {
            Some(p) => [p[0], p[1], p[2]],
            None => [0, 0, 0],
        }
    }
}

/// Settings for camera capture.
#[derive(Debug, Clone)]
pub struct CameraSettings {
    /// Camera device: an index ("0") or a platform device name/path
    pub device: String,
    /// Capture resolution (frames are scaled to exactly this size)
    pub resolution: Resolution,
    /// Target FPS (actual may vary)
    pub fps: u32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            device: "0".to_string(),
            resolution: Resolution::default(),
            fps: 30,
        }
    }
}

/// Errors that can occur during camera operations.
#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    /// The capture helper could not be started
    #[error("Failed to start camera capture: {0}")]
    Start(#[from] ProcessError),

    /// The device stopped producing frames; fatal for the session
    #[error("Camera device unavailable: {0}")]
    DeviceUnavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_constants() {
        assert_eq!(Resolution::LOW.width, 320);
        assert_eq!(Resolution::LOW.height, 240);
        assert_eq!(Resolution::MEDIUM.width, 640);
        assert_eq!(Resolution::MEDIUM.height, 480);
        assert_eq!(Resolution::HIGH.width, 1280);
        assert_eq!(Resolution::HIGH.height, 720);
    }

    #[test]
    fn test_resolution_display_and_bytes() {
        assert_eq!(Resolution::LOW.to_string(), "320x240");
        assert_eq!(Resolution::LOW.frame_bytes(), 320 * 240 * 3);
    }

    #[test]
    fn test_camera_settings_default() {
        let settings = CameraSettings::default();
        assert_eq!(settings.device, "0");
        assert_eq!(settings.resolution, Resolution::MEDIUM);
        assert_eq!(settings.fps, 30);
    }

    #[test]
    fn test_frame_pixel_access() {
        let frame = Frame::new(vec![1, 2, 3, 4, 5, 6], 2, 1, Instant::now());
        assert_eq!(frame.pixel(0, 0), [1, 2, 3]);
        assert_eq!(frame.pixel(1, 0), [4, 5, 6]);
        // Out of range reads as black
        assert_eq!(frame.pixel(0, 1), [0, 0, 0]);
    }

    #[test]
    fn test_camera_error_display() {
        let err = CameraError::DeviceUnavailable("stream ended".to_string());
        assert_eq!(err.to_string(), "Camera device unavailable: stream ended");
    }
}
