//! Temporal smoothing of per-tick gesture labels.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::gesture::GestureLabel;

/// Debounce timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceConfig {
    /// Consecutive ticks a label must be seen before it can commit
    pub min_stable_ticks: u32,
    /// Minimum time between the first and the committing observation
    pub min_stable: Duration,
    /// How long a committed label is blocked from committing again
    pub cooldown: Duration,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            min_stable_ticks: 3,
            min_stable: Duration::from_millis(100),
            cooldown: Duration::from_millis(500),
        }
    }
}

/// Turns a noisy stream of labels into occasional commits.
///
/// A label commits once it has been observed on `min_stable_ticks`
/// consecutive ticks spanning at least `min_stable`. After committing, the
/// streak starts over and the same label cannot commit again until its
/// cooldown has passed. Cooldowns are tracked per label, so switching
/// gestures is never delayed by the previous one.
///
/// Time comes from the caller (frame timestamps), not the system clock,
/// so the behavior follows the frames actually processed.
#[derive(Debug, Clone, Default)]
pub struct GestureDebouncer {
    config: DebounceConfig,
    candidate: GestureLabel,
    streak: u32,
    streak_start: Option<Instant>,
    last_commit: HashMap<GestureLabel, Instant>,
}

impl GestureDebouncer {
    pub fn new(config: DebounceConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &DebounceConfig {
        &self.config
    }

    /// Label currently building a streak.
    pub fn candidate(&self) -> GestureLabel {
        self.candidate
    }

    /// Length of the current streak in ticks.
    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// Feed one tick's label observed at `at`.
    ///
    /// # Returns
    /// The label if it is stable and out of cooldown, i.e. ready to
    /// commit. `GestureLabel::None` is never ready. Nothing is recorded
    /// here: the caller reports an accepted commit with
    /// [`record_commit`](Self::record_commit), so a label the controller
    /// ignored does not start a cooldown.
    pub fn observe(&mut self, label: GestureLabel, at: Instant) -> Option<GestureLabel> {
        if label != self.candidate {
            self.candidate = label;
            self.streak = 0;
        }
        if self.streak == 0 {
            self.streak_start = Some(at);
        }
        self.streak = self.streak.saturating_add(1);

        if label == GestureLabel::None {
            return None;
        }

        let held = self
            .streak_start
            .map(|start| at.saturating_duration_since(start))
            .unwrap_or_default();
        if self.streak < self.config.min_stable_ticks || held < self.config.min_stable {
            return None;
        }

        if let Some(last) = self.last_commit.get(&label) {
            if at.saturating_duration_since(*last) < self.config.cooldown {
                return None;
            }
        }

        Some(label)
    }

    /// Record that `label` was committed at `at`: its cooldown starts and
    /// the streak starts over.
    pub fn record_commit(&mut self, label: GestureLabel, at: Instant) {
        self.last_commit.insert(label, at);
        if label == self.candidate {
            self.streak = 0;
        }
    }
}
