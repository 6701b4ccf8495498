//! Hand landmark types shared by detectors and the classifier.

use serde::{Deserialize, Serialize};

/// Number of keypoints per hand in the detector contract.
pub const HAND_LANDMARK_COUNT: usize = 21;

/// One detected keypoint, in pixel coordinates of the frame it came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    /// Relative depth; unused by the classifier
    pub z: f32,
    pub confidence: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32, confidence: f32) -> Self {
        Self {
            x,
            y,
            z,
            confidence,
        }
    }

    /// Planar distance to another landmark.
    pub fn distance(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Keypoints of one hand for one tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkSet {
    /// Ordered keypoints, indexed by [`HandLandmark`]
    pub points: Vec<Landmark>,
    /// Detector's overall confidence that this is a hand
    pub score: f32,
}

impl LandmarkSet {
    pub fn new(points: Vec<Landmark>, score: f32) -> Self {
        Self { points, score }
    }

    /// Whether the set has exactly one point per hand keypoint.
    pub fn is_complete(&self) -> bool {
        self.points.len() == HAND_LANDMARK_COUNT
    }

    pub fn get(&self, landmark: HandLandmark) -> Option<&Landmark> {
        self.points.get(landmark as usize)
    }

    /// Mean per-point confidence, 0 for an empty set.
    pub fn mean_confidence(&self) -> f32 {
        if self.points.is_empty() {
            return 0.0;
        }
        self.points.iter().map(|p| p.confidence).sum::<f32>() / self.points.len() as f32
    }
}

/// Keypoint indices in the 21-point hand topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexMcp = 5,
    IndexPip = 6,
    IndexDip = 7,
    IndexTip = 8,
    MiddleMcp = 9,
    MiddlePip = 10,
    MiddleDip = 11,
    MiddleTip = 12,
    RingMcp = 13,
    RingPip = 14,
    RingDip = 15,
    RingTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

/// Bones of the hand as keypoint pairs: palm outline, then each finger
/// from its base joint to the tip.
pub const HAND_CONNECTIONS: [(HandLandmark, HandLandmark); 21] = {
    use HandLandmark::*;
    [
        (Wrist, ThumbCmc),
        (Wrist, IndexMcp),
        (IndexMcp, MiddleMcp),
        (MiddleMcp, RingMcp),
        (RingMcp, PinkyMcp),
        (Wrist, PinkyMcp),
        (ThumbCmc, ThumbMcp),
        (ThumbMcp, ThumbIp),
        (ThumbIp, ThumbTip),
        (IndexMcp, IndexPip),
        (IndexPip, IndexDip),
        (IndexDip, IndexTip),
        (MiddleMcp, MiddlePip),
        (MiddlePip, MiddleDip),
        (MiddleDip, MiddleTip),
        (RingMcp, RingPip),
        (RingPip, RingDip),
        (RingDip, RingTip),
        (PinkyMcp, PinkyPip),
        (PinkyPip, PinkyDip),
        (PinkyDip, PinkyTip),
    ]
};

/// The five fingers, thumb first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    pub fn tip(self) -> HandLandmark {
        match self {
            Finger::Thumb => HandLandmark::ThumbTip,
            Finger::Index => HandLandmark::IndexTip,
            Finger::Middle => HandLandmark::MiddleTip,
            Finger::Ring => HandLandmark::RingTip,
            Finger::Pinky => HandLandmark::PinkyTip,
        }
    }

    /// Knuckle joint at the base of the finger.
    pub fn mcp(self) -> HandLandmark {
        match self {
            Finger::Thumb => HandLandmark::ThumbMcp,
            Finger::Index => HandLandmark::IndexMcp,
            Finger::Middle => HandLandmark::MiddleMcp,
            Finger::Ring => HandLandmark::RingMcp,
            Finger::Pinky => HandLandmark::PinkyMcp,
        }
    }
}
