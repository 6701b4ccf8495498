//! Per-tick orchestration.
//!
//! One call to [`FramePipeline::tick`] takes one frame from the source and
//! runs, in order:
//!
//! 1. **Mirror** - flip the frame so on-screen motion matches the user's
//! 2. **Detect** - landmark detection and classification into a label
//! 3. **Debounce** - feed the label to [`GestureDebouncer`]; a commit is
//!    applied to the [`ParameterController`] immediately
//! 4. **Map** - render the frame as ASCII with the post-commit parameters
//!
//! so a committed gesture is already visible in the frame it was made in.
//! The mirrored frame is used for both detection and display, keeping the
//! two windows spatially consistent.

mod debounce;

pub use debounce::{DebounceConfig, GestureDebouncer};

use std::sync::Arc;

use crate::ascii::{AsciiFrame, LuminanceMapper};
use crate::camera::{mirror_horizontal, CameraError, Frame, FrameSource};
use crate::controller::{ParameterController, RenderParameters};
use crate::gesture::{
    DetectorError, GestureClassifier, GestureLabel, LandmarkDetector, LandmarkSet,
};

/// Errors that end the tick loop.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("camera unavailable: {0}")]
    DeviceUnavailable(#[from] CameraError),
}

/// Everything a tick produced, shared with the renderer and recorder.
#[derive(Debug, Clone)]
pub struct TickOutput {
    /// Mirrored camera frame
    pub frame: Arc<Frame>,
    pub ascii: Arc<AsciiFrame>,
    /// Parameters the ASCII frame was rendered with
    pub params: RenderParameters,
    /// Hand landmarks found in `frame`, in its pixel coordinates
    pub hand: Option<Arc<LandmarkSet>>,
    /// Raw classification for this tick
    pub gesture: GestureLabel,
    /// Gesture committed and applied this tick
    pub committed: Option<GestureLabel>,
    /// False when no new frame was available and the previous output is
    /// being repeated
    pub fresh: bool,
}

impl TickOutput {
    pub fn hand_detected(&self) -> bool {
        self.hand.is_some()
    }
}

/// Pipeline behavior switches.
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    /// Flip frames horizontally before anything else sees them
    pub mirror: bool,
    /// Run landmark detection at all
    pub gestures: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            mirror: true,
            gestures: true,
        }
    }
}

/// Frame-to-ASCII pipeline with gesture control.
pub struct FramePipeline<S, D> {
    source: S,
    detector: D,
    classifier: GestureClassifier,
    debouncer: GestureDebouncer,
    controller: ParameterController,
    mapper: LuminanceMapper,
    options: PipelineOptions,
    last: Option<TickOutput>,
    detector_failing: bool,
}

impl<S: FrameSource, D: LandmarkDetector> FramePipeline<S, D> {
    pub fn new(
        source: S,
        detector: D,
        classifier: GestureClassifier,
        debouncer: GestureDebouncer,
        controller: ParameterController,
        mapper: LuminanceMapper,
        options: PipelineOptions,
    ) -> Self {
        Self {
            source,
            detector,
            classifier,
            debouncer,
            controller,
            mapper,
            options,
            last: None,
            detector_failing: false,
        }
    }

    pub fn controller(&self) -> &ParameterController {
        &self.controller
    }

    /// Mutable access for the keyboard command path.
    ///
    /// Only the tick loop holds the pipeline, so keyboard transitions are
    /// ordered with gesture transitions.
    pub fn controller_mut(&mut self) -> &mut ParameterController {
        &mut self.controller
    }

    pub fn mapper(&self) -> &LuminanceMapper {
        &self.mapper
    }

    /// Output of the most recent tick that had a frame.
    pub fn last_output(&self) -> Option<&TickOutput> {
        self.last.as_ref()
    }

    /// Run one tick.
    ///
    /// # Returns
    /// * `Ok(Some(output))` - a fresh output, or the previous one repeated
    ///   with `fresh == false` when the source had no frame ready
    /// * `Ok(None)` - no frame has arrived yet at all
    ///
    /// # Errors
    /// * `PipelineError::DeviceUnavailable` - the source is gone for good
    pub fn tick(&mut self) -> Result<Option<TickOutput>, PipelineError> {
        let frame = match self.source.next_frame()? {
            Some(frame) => frame,
            None => return Ok(self.repeat_last()),
        };
        let frame = if self.options.mirror {
            mirror_horizontal(frame)
        } else {
            frame
        };

        let hand = self.detect(&frame);
        let gesture = self.classifier.classify(hand.as_ref());
        let committed = self
            .debouncer
            .observe(gesture, frame.timestamp)
            .filter(|&label| self.controller.apply_gesture(label));
        if let Some(label) = committed {
            self.debouncer.record_commit(label, frame.timestamp);
        }

        let params = self.controller.current();
        let ascii = self.mapper.map(&frame, &params);

        let output = TickOutput {
            frame: Arc::new(frame),
            ascii: Arc::new(ascii),
            params,
            hand: hand.map(Arc::new),
            gesture,
            committed,
            fresh: true,
        };
        self.last = Some(output.clone());
        Ok(Some(output))
    }

    fn repeat_last(&self) -> Option<TickOutput> {
        self.last.as_ref().map(|last| TickOutput {
            committed: None,
            fresh: false,
            ..last.clone()
        })
    }

    fn detect(&mut self, frame: &Frame) -> Option<LandmarkSet> {
        if !self.options.gestures {
            return None;
        }

        match self.detector.detect(frame) {
            Ok(hand) => {
                if self.detector_failing {
                    log::info!("Landmark detector recovered");
                    self.detector_failing = false;
                }
                hand
            }
            Err(DetectorError::Busy) => {
                log::debug!("Landmark detector busy, skipping frame");
                None
            }
            Err(e) => {
                if !self.detector_failing {
                    log::warn!("Landmark detection failed: {}", e);
                    self.detector_failing = true;
                } else {
                    log::debug!("Landmark detection failed: {}", e);
                }
                None
            }
        }
    }
}

impl<S, D> std::fmt::Debug for FramePipeline<S, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FramePipeline")
            .field("controller", &self.controller)
            .field("mapper", &self.mapper)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
