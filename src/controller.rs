//! Render parameter state machine.
//!
//! [`RenderParameters`] is the only state that survives from one tick to
//! the next. [`ParameterController`] owns it and is the single place that
//! changes it: every transition builds a complete new snapshot, clamps it
//! to bounds and replaces the old one in one assignment. Readers get copies.

use crate::ascii::{ramp, DEFAULT_DENSITY, DENSITY_LEVELS};
use crate::gesture::GestureLabel;

/// Lowest brightness offset.
pub const BRIGHTNESS_MIN: i32 = -100;
/// Highest brightness offset.
pub const BRIGHTNESS_MAX: i32 = 100;
/// Default brightness change per committed step.
pub const DEFAULT_BRIGHTNESS_STEP: i32 = 10;

/// Live rendering parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderParameters {
    /// Offset added to every cell's brightness, in [`BRIGHTNESS_MIN`, `BRIGHTNESS_MAX`]
    pub brightness: i32,
    /// Index of the active glyph ramp, in [0, `DENSITY_LEVELS`)
    pub density: usize,
    /// Whether gestures (other than Peace) may change parameters
    pub tracking: bool,
}

impl Default for RenderParameters {
    fn default() -> Self {
        Self {
            brightness: 0,
            density: DEFAULT_DENSITY,
            tracking: true,
        }
    }
}

impl RenderParameters {
    /// Copy with every bounded field pulled into range.
    pub fn clamped(self) -> Self {
        Self {
            brightness: self.brightness.clamp(BRIGHTNESS_MIN, BRIGHTNESS_MAX),
            density: self.density.min(DENSITY_LEVELS - 1),
            tracking: self.tracking,
        }
    }
}

impl std::fmt::Display for RenderParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "brightness {:+} | ramp {} | tracking {}",
            self.brightness,
            ramp(self.density).name,
            if self.tracking { "on" } else { "off" }
        )
    }
}

/// A parameter change, shared by the gesture and keyboard paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    IncreaseBrightness,
    DecreaseBrightness,
    IncreaseDensity,
    DecreaseDensity,
    ToggleTracking,
    /// Restore brightness and density; tracking is left alone
    Reset,
}

impl ControlAction {
    /// The action a committed gesture triggers, if any.
    pub fn for_gesture(label: GestureLabel) -> Option<Self> {
        match label {
            GestureLabel::ThumbsUp => Some(ControlAction::IncreaseBrightness),
            GestureLabel::ThumbsDown => Some(ControlAction::DecreaseBrightness),
            GestureLabel::Peace => Some(ControlAction::ToggleTracking),
            GestureLabel::Fist => Some(ControlAction::Reset),
            GestureLabel::None => None,
        }
    }
}

/// Owner of the live [`RenderParameters`].
#[derive(Debug, Clone)]
pub struct ParameterController {
    current: RenderParameters,
    initial: RenderParameters,
    step: i32,
}

impl Default for ParameterController {
    fn default() -> Self {
        Self::new(RenderParameters::default(), DEFAULT_BRIGHTNESS_STEP)
    }
}

impl ParameterController {
    /// Create a controller starting at (and resetting to) `initial`.
    pub fn new(initial: RenderParameters, brightness_step: i32) -> Self {
        let initial = initial.clamped();
        Self {
            current: initial,
            initial,
            step: brightness_step.saturating_abs(),
        }
    }

    /// Snapshot of the current parameters.
    pub fn current(&self) -> RenderParameters {
        self.current
    }

    /// The values `Reset` returns to.
    pub fn initial(&self) -> RenderParameters {
        self.initial
    }

    /// Apply a committed gesture.
    ///
    /// While tracking is disabled only Peace is acted on, so the user can
    /// turn tracking back on. Returns whether the gesture was acted on.
    pub fn apply_gesture(&mut self, label: GestureLabel) -> bool {
        let Some(action) = ControlAction::for_gesture(label) else {
            return false;
        };

        if !self.current.tracking && label != GestureLabel::Peace {
            log::debug!("Ignoring {} while tracking is off", label);
            return false;
        }

        let params = self.apply(action);
        log::info!("Gesture {} committed: {}", label, params);
        true
    }

    /// Apply an action unconditionally and return the new snapshot.
    pub fn apply(&mut self, action: ControlAction) -> RenderParameters {
        let cur = self.current;
        let next = match action {
            ControlAction::IncreaseBrightness => RenderParameters {
                brightness: cur.brightness.saturating_add(self.step),
                ..cur
            },
            ControlAction::DecreaseBrightness => RenderParameters {
                brightness: cur.brightness.saturating_sub(self.step),
                ..cur
            },
            ControlAction::IncreaseDensity => RenderParameters {
                density: cur.density.saturating_add(1),
                ..cur
            },
            ControlAction::DecreaseDensity => RenderParameters {
                density: cur.density.saturating_sub(1),
                ..cur
            },
            ControlAction::ToggleTracking => RenderParameters {
                tracking: !cur.tracking,
                ..cur
            },
            ControlAction::Reset => RenderParameters {
                brightness: self.initial.brightness,
                density: self.initial.density,
                tracking: cur.tracking,
            },
        };

        self.current = next.clamped();
        self.current
    }

    pub fn increase_brightness(&mut self) -> RenderParameters {
        self.apply(ControlAction::IncreaseBrightness)
    }

    pub fn decrease_brightness(&mut self) -> RenderParameters {
        self.apply(ControlAction::DecreaseBrightness)
    }

    pub fn increase_density(&mut self) -> RenderParameters {
        self.apply(ControlAction::IncreaseDensity)
    }

    pub fn decrease_density(&mut self) -> RenderParameters {
        self.apply(ControlAction::DecreaseDensity)
    }

    pub fn toggle_tracking(&mut self) -> RenderParameters {
        self.apply(ControlAction::ToggleTracking)
    }

    pub fn reset(&mut self) -> RenderParameters {
        self.apply(ControlAction::Reset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extreme_step_saturates() {
        let mut ctrl = ParameterController::new(RenderParameters::default(), i32::MIN);
        assert_eq!(ctrl.increase_brightness().brightness, BRIGHTNESS_MAX);
        assert_eq!(ctrl.decrease_brightness().brightness, BRIGHTNESS_MIN);
        assert_eq!(ctrl.decrease_brightness().brightness, BRIGHTNESS_MIN);
    }

    #[test]
    fn test_initial_state() {
        let ctrl = ParameterController::default();
        let p = ctrl.current();
        assert_eq!(p.brightness, 0);
        assert_eq!(p.density, DEFAULT_DENSITY);
        assert!(p.tracking);
    }

    #[test]
    fn test_new_clamps_initial() {
        let ctrl = ParameterController::new(
            RenderParameters {
                brightness: 500,
                density: 42,
                tracking: true,
            },
            10,
        );
        assert_eq!(ctrl.current().brightness, BRIGHTNESS_MAX);
        assert_eq!(ctrl.current().density, DENSITY_LEVELS - 1);
    }

    #[test]
    fn test_gesture_action_table() {
        assert_eq!(
            ControlAction::for_gesture(GestureLabel::ThumbsUp),
            Some(ControlAction::IncreaseBrightness)
        );
        assert_eq!(
            ControlAction::for_gesture(GestureLabel::ThumbsDown),
            Some(ControlAction::DecreaseBrightness)
        );
        assert_eq!(
            ControlAction::for_gesture(GestureLabel::Peace),
            Some(ControlAction::ToggleTracking)
        );
        assert_eq!(
            ControlAction::for_gesture(GestureLabel::Fist),
            Some(ControlAction::Reset)
        );
        assert_eq!(ControlAction::for_gesture(GestureLabel::None), None);
    }

    #[test]
    fn test_none_is_no_op() {
        let mut ctrl = ParameterController::default();
        assert!(!ctrl.apply_gesture(GestureLabel::None));
        assert_eq!(ctrl.current(), RenderParameters::default());
    }

    #[test]
    fn test_density_clamps_both_ends() {
        let mut ctrl = ParameterController::default();
        for _ in 0..10 {
            ctrl.increase_density();
        }
        assert_eq!(ctrl.current().density, DENSITY_LEVELS - 1);
        for _ in 0..10 {
            ctrl.decrease_density();
        }
        assert_eq!(ctrl.current().density, 0);
    }

    #[test]
    fn test_display() {
        let p = RenderParameters {
            brightness: 20,
            density: 0,
            tracking: false,
        };
        assert_eq!(p.to_string(), "brightness +20 | ramp minimal | tracking off");
    }
}
