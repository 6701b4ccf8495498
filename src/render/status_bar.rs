//! Status and help lines shown under the ASCII view.

use crate::gesture::GestureLabel;
use crate::pipeline::TickOutput;

/// Key reference shown when help is toggled on.
pub const HELP_LINE: &str =
    " +/- brightness | [/] density | t tracking | r reset | s screenshot | space record | h help | q quit ";

/// Loop-level state shown alongside the tick output.
#[derive(Debug, Clone, Default)]
pub struct Hud {
    /// Measured presentation rate
    pub fps: f32,
    pub recording: bool,
    /// Most recently committed gesture
    pub last_gesture: Option<GestureLabel>,
    /// One-off message (screenshot path, recorder error)
    pub notice: Option<String>,
    pub show_help: bool,
}

/// Status bar for displaying the live parameters at the bottom of the
/// screen.
///
/// Shows: brightness | ramp | tracking | hand/gesture | rec | fps | notice
#[derive(Debug, Clone)]
pub struct StatusBar {
    /// Whether the status bar is visible
    pub visible: bool,
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusBar {
    /// Create a new status bar with default settings (visible).
    pub fn new() -> Self {
        Self { visible: true }
    }

    /// Create a status bar with the specified visibility.
    pub fn with_visibility(visible: bool) -> Self {
        Self { visible }
    }

    /// Format the status text for one tick.
    pub fn format(&self, output: &TickOutput, hud: &Hud) -> String {
        let hand = if output.hand_detected() {
            format!("hand: {}", output.gesture)
        } else {
            "no hand".to_string()
        };

        let mut text = format!(" {} | {}", output.params, hand);
        if let Some(gesture) = hud.last_gesture {
            text.push_str(&format!(" | last: {}", gesture));
        }
        if hud.recording {
            text.push_str(" | REC");
        }
        text.push_str(&format!(" | {:.1} fps ", hud.fps));
        if let Some(notice) = &hud.notice {
            text.push_str(&format!("| {} ", notice));
        }
        text
    }
}

/// Truncate or pad `text` to exactly `width` characters.
pub fn fit_to_width(text: &str, width: usize) -> String {
    let mut line: String = text.chars().take(width).collect();
    let len = line.chars().count();
    line.extend(std::iter::repeat(' ').take(width - len));
    line
}
