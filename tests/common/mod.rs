//! Shared fixtures for integration tests: frames, hand poses and scripted
//! frame sources / detectors with deterministic timestamps.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ascii_gesture::ascii::{GridSize, LuminanceMapper};
use ascii_gesture::camera::{CameraError, Frame, FrameSource};
use ascii_gesture::controller::ParameterController;
use ascii_gesture::gesture::{
    DetectorError, GestureClassifier, Landmark, LandmarkDetector, LandmarkSet,
    HAND_LANDMARK_COUNT,
};
use ascii_gesture::pipeline::{FramePipeline, GestureDebouncer, PipelineOptions};

/// Tick spacing of a 30 fps camera.
pub const TICK: Duration = Duration::from_millis(33);

pub fn make_frame(data: Vec<u8>, width: u32, height: u32) -> Frame {
    Frame::new(data, width, height, Instant::now())
}

/// Uniform gray frame stamped `at`.
pub fn gray_frame(value: u8, width: u32, height: u32, at: Instant) -> Frame {
    Frame::new(vec![value; (width * height * 3) as usize], width, height, at)
}

/// Horizontal black-to-white gradient.
pub fn gradient_frame(width: u32, height: u32) -> Frame {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for _ in 0..height {
        for x in 0..width {
            let v = (x * 255 / (width - 1).max(1)) as u8;
            data.extend_from_slice(&[v, v, v]);
        }
    }
    make_frame(data, width, height)
}

// ==================== Hand poses ====================
//
// Upright right hand around (320, 330) in a 640x480 image, palm scale
// (wrist to middle knuckle) of 100 px.

fn point(x: f32, y: f32) -> Landmark {
    Landmark::new(x, y, 0.0, 0.9)
}

pub fn fist() -> LandmarkSet {
    let mut p = vec![Landmark::default(); HAND_LANDMARK_COUNT];
    p[0] = point(320.0, 400.0);
    p[1] = point(300.0, 385.0);
    p[2] = point(285.0, 360.0);
    p[3] = point(295.0, 340.0);
    p[4] = point(315.0, 335.0);
    for (mcp, x, y) in [
        (5, 290.0, 310.0),
        (9, 320.0, 300.0),
        (13, 345.0, 310.0),
        (17, 368.0, 325.0),
    ] {
        p[mcp] = point(x, y);
        p[mcp + 1] = point(x, y - 15.0);
        p[mcp + 2] = point(x, y + 5.0);
        p[mcp + 3] = point(x, y + 20.0);
    }
    LandmarkSet::new(p, 0.95)
}

pub fn thumbs_up() -> LandmarkSet {
    let mut hand = fist();
    hand.points[2] = point(280.0, 350.0);
    hand.points[3] = point(274.0, 295.0);
    hand.points[4] = point(270.0, 250.0);
    hand
}

pub fn thumbs_down() -> LandmarkSet {
    let mut hand = fist();
    hand.points[2] = point(285.0, 360.0);
    hand.points[3] = point(280.0, 420.0);
    hand.points[4] = point(278.0, 470.0);
    hand
}

pub fn peace() -> LandmarkSet {
    let mut hand = fist();
    hand.points[8] = point(290.0, 210.0);
    hand.points[12] = point(320.0, 200.0);
    hand
}

// ==================== Scripted collaborators ====================

/// Frame source replaying a fixed script, then reporting no frame.
pub struct ScriptedSource {
    script: VecDeque<Result<Option<Frame>, CameraError>>,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<Option<Frame>, CameraError>>) -> Self {
        Self {
            script: script.into(),
        }
    }

    /// `count` gray frames spaced one tick apart starting at `start`.
    pub fn frames(count: usize, start: Instant) -> Self {
        Self::new(
            (0..count)
                .map(|i| Ok(Some(gray_frame(128, 8, 6, start + TICK * i as u32))))
                .collect(),
        )
    }
}

impl FrameSource for ScriptedSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, CameraError> {
        self.script.pop_front().unwrap_or(Ok(None))
    }
}

/// Detector replaying one hand (or no hand) per call.
pub struct ScriptedDetector {
    hands: VecDeque<Option<LandmarkSet>>,
}

impl ScriptedDetector {
    pub fn new(hands: Vec<Option<LandmarkSet>>) -> Self {
        Self {
            hands: hands.into(),
        }
    }

    /// `count` copies of the same pose.
    pub fn repeat(hand: LandmarkSet, count: usize) -> Vec<Option<LandmarkSet>> {
        vec![Some(hand); count]
    }
}

impl LandmarkDetector for ScriptedDetector {
    fn detect(&mut self, _frame: &Frame) -> Result<Option<LandmarkSet>, DetectorError> {
        Ok(self.hands.pop_front().flatten())
    }
}

/// Pipeline over scripted collaborators with default tuning, no mirroring.
pub fn scripted_pipeline(
    source: ScriptedSource,
    detector: ScriptedDetector,
) -> FramePipeline<ScriptedSource, ScriptedDetector> {
    FramePipeline::new(
        source,
        detector,
        GestureClassifier::default(),
        GestureDebouncer::default(),
        ParameterController::default(),
        LuminanceMapper::new(GridSize::new(8, 3), false),
        PipelineOptions {
            mirror: false,
            gestures: true,
        },
    )
}
