//! Geometric hand-pose classification.
//!
//! Each finger is judged extended or curled by how far its tip sits from
//! the palm center, measured in units of palm size (wrist to middle-finger
//! knuckle) so the result does not depend on how close the hand is to the
//! camera. The resulting five-finger pattern is looked up in a fixed table.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::landmarks::{Finger, HandLandmark, Landmark, LandmarkSet};

/// Discrete gestures the classifier can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GestureLabel {
    ThumbsUp,
    ThumbsDown,
    Peace,
    Fist,
    #[default]
    None,
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GestureLabel::ThumbsUp => "thumbs up",
            GestureLabel::ThumbsDown => "thumbs down",
            GestureLabel::Peace => "peace",
            GestureLabel::Fist => "fist",
            GestureLabel::None => "none",
        };
        f.write_str(name)
    }
}

/// Tunable classification constants.
///
/// Finger thresholds are tip-to-palm-center distances in palm-size units;
/// a finger whose ratio exceeds its threshold counts as extended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierThresholds {
    pub thumb_extended: f32,
    pub index_extended: f32,
    pub middle_extended: f32,
    pub ring_extended: f32,
    pub pinky_extended: f32,
    /// How much more vertical than horizontal the thumb must point to count
    /// as up or down
    pub thumb_vertical_ratio: f32,
    /// Minimum hand score and mean point confidence
    pub min_confidence: f32,
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            thumb_extended: 0.8,
            index_extended: 0.9,
            middle_extended: 0.9,
            ring_extended: 0.9,
            pinky_extended: 0.75,
            thumb_vertical_ratio: 1.5,
            min_confidence: 0.5,
        }
    }
}

impl ClassifierThresholds {
    pub fn extended(&self, finger: Finger) -> f32 {
        match finger {
            Finger::Thumb => self.thumb_extended,
            Finger::Index => self.index_extended,
            Finger::Middle => self.middle_extended,
            Finger::Ring => self.ring_extended,
            Finger::Pinky => self.pinky_extended,
        }
    }
}

/// Extended/curled state of each finger, thumb first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FingerStates(pub [bool; 5]);

impl FingerStates {
    pub fn is_extended(&self, finger: Finger) -> bool {
        self.0[finger as usize]
    }

    /// Whether exactly the given fingers are extended.
    pub fn only(&self, fingers: &[Finger]) -> bool {
        Finger::ALL
            .iter()
            .all(|&f| self.is_extended(f) == fingers.contains(&f))
    }
}

/// Which way an extended thumb points, in image space (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbDirection {
    Up,
    Down,
    Sideways,
}

/// Stateless landmark-to-gesture classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct GestureClassifier {
    thresholds: ClassifierThresholds,
}

impl GestureClassifier {
    pub fn new(thresholds: ClassifierThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ClassifierThresholds {
        &self.thresholds
    }

    /// Classify one hand.
    ///
    /// Absent, incomplete or low-confidence landmark sets classify as
    /// [`GestureLabel::None`].
    pub fn classify(&self, hand: Option<&LandmarkSet>) -> GestureLabel {
        let Some(hand) = hand else {
            return GestureLabel::None;
        };
        if !self.is_confident(hand) {
            return GestureLabel::None;
        }
        let Some(fingers) = self.finger_states(hand) else {
            return GestureLabel::None;
        };

        use Finger::*;
        if fingers.only(&[Thumb]) {
            match self.thumb_direction(hand) {
                Some(ThumbDirection::Up) => GestureLabel::ThumbsUp,
                Some(ThumbDirection::Down) => GestureLabel::ThumbsDown,
                _ => GestureLabel::None,
            }
        } else if fingers.only(&[Index, Middle]) {
            GestureLabel::Peace
        } else if fingers.only(&[]) {
            GestureLabel::Fist
        } else {
            GestureLabel::None
        }
    }

    /// Whether the hand passes the confidence filter.
    pub fn is_confident(&self, hand: &LandmarkSet) -> bool {
        hand.is_complete()
            && hand.score >= self.thresholds.min_confidence
            && hand.mean_confidence() >= self.thresholds.min_confidence
    }

    /// Extended/curled pattern of a complete hand.
    ///
    /// Returns `None` for incomplete sets or a degenerate palm (wrist and
    /// middle knuckle coincide).
    pub fn finger_states(&self, hand: &LandmarkSet) -> Option<FingerStates> {
        if !hand.is_complete() {
            return None;
        }
        let center = palm_center(hand)?;
        let scale = palm_scale(hand)?;

        let mut states = [false; 5];
        for finger in Finger::ALL {
            let tip = hand.get(finger.tip())?;
            let ratio = tip.distance(&center) / scale;
            states[finger as usize] = ratio > self.thresholds.extended(finger);
        }
        Some(FingerStates(states))
    }

    /// Direction of the thumb from its knuckle to its tip.
    pub fn thumb_direction(&self, hand: &LandmarkSet) -> Option<ThumbDirection> {
        let mcp = hand.get(HandLandmark::ThumbMcp)?;
        let tip = hand.get(HandLandmark::ThumbTip)?;
        let dx = tip.x - mcp.x;
        let dy = tip.y - mcp.y;

        if dy.abs() <= self.thresholds.thumb_vertical_ratio * dx.abs() {
            Some(ThumbDirection::Sideways)
        } else if dy < 0.0 {
            Some(ThumbDirection::Up)
        } else {
            Some(ThumbDirection::Down)
        }
    }
}

const PALM_POINTS: [HandLandmark; 5] = [
    HandLandmark::Wrist,
    HandLandmark::IndexMcp,
    HandLandmark::MiddleMcp,
    HandLandmark::RingMcp,
    HandLandmark::PinkyMcp,
];

/// Mean of the wrist and the four finger knuckles.
fn palm_center(hand: &LandmarkSet) -> Option<Landmark> {
    let mut x = 0.0;
    let mut y = 0.0;
    for point in PALM_POINTS {
        let p = hand.get(point)?;
        x += p.x;
        y += p.y;
    }
    let n = PALM_POINTS.len() as f32;
    Some(Landmark::new(x / n, y / n, 0.0, 1.0))
}

fn palm_scale(hand: &LandmarkSet) -> Option<f32> {
    let wrist = hand.get(HandLandmark::Wrist)?;
    let middle = hand.get(HandLandmark::MiddleMcp)?;
    let scale = wrist.distance(middle);
    (scale > f32::EPSILON).then_some(scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::HAND_LANDMARK_COUNT;

    fn point(x: f32, y: f32) -> Landmark {
        Landmark::new(x, y, 0.0, 0.9)
    }

    /// Upright right hand, palm facing the camera, all fingers curled.
    fn fist() -> Vec<Landmark> {
        let mut p = vec![Landmark::default(); HAND_LANDMARK_COUNT];
        p[0] = point(320.0, 400.0);
        p[1] = point(300.0, 385.0);
        p[2] = point(285.0, 360.0);
        p[3] = point(295.0, 340.0);
        p[4] = point(315.0, 335.0);
        for (mcp, x, y) in [(5, 290.0, 310.0), (9, 320.0, 300.0), (13, 345.0, 310.0), (17, 368.0, 325.0)] {
            p[mcp] = point(x, y);
            p[mcp + 1] = point(x, y - 15.0);
            p[mcp + 2] = point(x, y + 5.0);
            p[mcp + 3] = point(x, y + 20.0);
        }
        p
    }

    fn hand(points: Vec<Landmark>) -> LandmarkSet {
        LandmarkSet::new(points, 0.95)
    }

    fn thumbs_up() -> Vec<Landmark> {
        let mut p = fist();
        p[2] = point(280.0, 350.0);
        p[3] = point(274.0, 295.0);
        p[4] = point(270.0, 250.0);
        p
    }

    fn peace() -> Vec<Landmark> {
        let mut p = fist();
        p[8] = point(290.0, 210.0);
        p[12] = point(320.0, 200.0);
        p
    }

    #[test]
    fn test_absent_hand_is_none() {
        let classifier = GestureClassifier::default();
        assert_eq!(classifier.classify(None), GestureLabel::None);
    }

    #[test]
    fn test_fist() {
        let classifier = GestureClassifier::default();
        assert_eq!(classifier.classify(Some(&hand(fist()))), GestureLabel::Fist);
    }

    #[test]
    fn test_thumbs_up() {
        let classifier = GestureClassifier::default();
        assert_eq!(
            classifier.classify(Some(&hand(thumbs_up()))),
            GestureLabel::ThumbsUp
        );
    }

    #[test]
    fn test_peace() {
        let classifier = GestureClassifier::default();
        assert_eq!(classifier.classify(Some(&hand(peace()))), GestureLabel::Peace);
    }

    #[test]
    fn test_sideways_thumb_is_none() {
        let mut p = fist();
        p[2] = point(280.0, 360.0);
        p[3] = point(240.0, 355.0);
        p[4] = point(200.0, 350.0);
        let classifier = GestureClassifier::default();
        let set = hand(p);
        assert_eq!(classifier.thumb_direction(&set), Some(ThumbDirection::Sideways));
        assert_eq!(classifier.classify(Some(&set)), GestureLabel::None);
    }

    #[test]
    fn test_low_score_is_none() {
        let set = LandmarkSet::new(peace(), 0.2);
        assert_eq!(GestureClassifier::default().classify(Some(&set)), GestureLabel::None);
    }

    #[test]
    fn test_incomplete_set_is_none() {
        let mut p = peace();
        p.truncate(20);
        assert_eq!(
            GestureClassifier::default().classify(Some(&hand(p))),
            GestureLabel::None
        );
    }

    #[test]
    fn test_degenerate_palm() {
        let set = hand(vec![point(10.0, 10.0); HAND_LANDMARK_COUNT]);
        assert_eq!(GestureClassifier::default().finger_states(&set), None);
        assert_eq!(GestureClassifier::default().classify(Some(&set)), GestureLabel::None);
    }

    #[test]
    fn test_finger_states_only() {
        let states = FingerStates([false, true, true, false, false]);
        assert!(states.only(&[Finger::Index, Finger::Middle]));
        assert!(!states.only(&[Finger::Index]));
        assert!(FingerStates::default().only(&[]));
    }

    #[test]
    fn test_label_display() {
        assert_eq!(GestureLabel::ThumbsDown.to_string(), "thumbs down");
        assert_eq!(GestureLabel::None.to_string(), "none");
    }
}
