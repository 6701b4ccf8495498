//! Platform-specific ffmpeg input arguments for camera devices.

use super::types::CameraSettings;

/// ffmpeg demuxer used to open cameras on this platform.
pub fn input_format() -> &'static str {
    if cfg!(target_os = "macos") {
        "avfoundation"
    } else if cfg!(target_os = "windows") {
        "dshow"
    } else {
        "v4l2"
    }
}

/// Resolve a device spec to the name ffmpeg expects for [`input_format`].
///
/// A bare index selects the n-th camera: `/dev/videoN` on Linux, the
/// AVFoundation index on macOS. Anything else is passed through as a
/// device name/path.
pub fn device_input(device: &str) -> String {
    let is_index = !device.is_empty() && device.chars().all(|c| c.is_ascii_digit());

    match input_format() {
        "avfoundation" => device.to_string(),
        "dshow" => format!("video={}", device),
        _ if is_index => format!("/dev/video{}", device),
        _ => device.to_string(),
    }
}

/// Generate ffmpeg arguments that capture `settings.device` and emit packed
/// RGB frames of exactly `settings.resolution` on stdout.
pub fn capture_args(settings: &CameraSettings) -> Vec<String> {
    let res = settings.resolution;
    vec![
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-f".to_string(),
        input_format().to_string(),
        "-framerate".to_string(),
        settings.fps.to_string(),
        "-video_size".to_string(),
        res.to_string(),
        "-i".to_string(),
        device_input(&settings.device),
        "-vf".to_string(),
        format!("scale={}:{}", res.width, res.height),
        "-pix_fmt".to_string(),
        "rgb24".to_string(),
        "-f".to_string(),
        "rawvideo".to_string(),
        "pipe:1".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Resolution;

    #[test]
    fn test_capture_args_emit_rawvideo_rgb() {
        let settings = CameraSettings {
            device: "0".to_string(),
            resolution: Resolution::LOW,
            fps: 15,
        };
        let args = capture_args(&settings);
        assert!(args.windows(2).any(|w| w[0] == "-pix_fmt" && w[1] == "rgb24"));
        assert!(args.windows(2).any(|w| w[0] == "-f" && w[1] == "rawvideo"));
        assert!(args.windows(2).any(|w| w[0] == "-vf" && w[1] == "scale=320:240"));
        assert!(args.windows(2).any(|w| w[0] == "-framerate" && w[1] == "15"));
        assert_eq!(args.last().map(String::as_str), Some("pipe:1"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_device_input_linux() {
        assert_eq!(device_input("2"), "/dev/video2");
        assert_eq!(device_input("/dev/video7"), "/dev/video7");
    }

    #[cfg(target_os = "macos")]
    #[test]
    fn test_device_input_macos() {
        assert_eq!(device_input("0"), "0");
        assert_eq!(device_input("FaceTime HD Camera"), "FaceTime HD Camera");
    }
}
