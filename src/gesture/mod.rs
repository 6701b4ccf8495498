//! Hand gesture recognition.
//!
//! A [`LandmarkDetector`] turns a frame into hand keypoints (or nothing),
//! and the [`GestureClassifier`] turns keypoints into a [`GestureLabel`].
//! Both are stateless per call; smoothing over time lives in the pipeline.

mod classifier;
mod detector;
mod landmarks;
mod sidecar;

pub use classifier::{
    ClassifierThresholds, FingerStates, GestureClassifier, GestureLabel, ThumbDirection,
};
pub use detector::{DetectorError, LandmarkDetector, NoDetector};
pub use landmarks::{
    Finger, HandLandmark, Landmark, LandmarkSet, HAND_CONNECTIONS, HAND_LANDMARK_COUNT,
};
pub use sidecar::{parse_reply, SidecarDetector};
