//! Camera capture module.
//!
//! This module provides the frame side of the tick loop:
//! - The [`FrameSource`] seam the pipeline pulls frames through
//! - Camera capture via [`CameraSource`] (an ffmpeg helper process)
//! - Frame types via [`Frame`], [`Resolution`] and [`CameraSettings`]

mod capture;
mod capture_loop;
mod device;
mod frame_utils;
mod source;
mod types;

pub use capture::CameraSource;
pub use device::{capture_args, device_input, input_format};
pub use frame_utils::mirror_horizontal;
pub use source::FrameSource;
pub use types::{CameraError, CameraSettings, Frame, Resolution};
