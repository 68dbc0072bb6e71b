use std::time::{Duration, Instant};

use crate::gesture::Gesture;

/// Running tally of classified gestures, fed one frame at a time. A
/// gesture is counted when the stream moves off it, so one continuous
/// hold counts once no matter how many frames it spanned.
///
/// This is an explicit accumulator: the caller owns it and passes every
/// frame through `observe`; nothing here is global.
#[derive(Debug, Default)]
pub struct GestureStats {
    counts: [u32; Gesture::ALL.len()],
    current: Option<Gesture>,
    started: Option<Instant>,
}

impl GestureStats {
    pub fn new() -> Self {
        GestureStats::default()
    }

    pub fn observe(&mut self, gesture: Option<Gesture>, now: Instant) {
        match gesture {
            Some(g) => {
                if self.current != Some(g) {
                    if let Some(previous) = self.current {
                        self.counts[previous.index()] += 1;
                    }
                    self.current = Some(g);
                    self.started = Some(now);
                }
            }
            None => {
                if let Some(previous) = self.current.take() {
                    self.counts[previous.index()] += 1;
                }
                self.started = None;
            }
        }
    }

    /// How long the current gesture has been held, zero when idle.
    pub fn current_hold(&self, now: Instant) -> Duration {
        self.started
            .map(|since| now.duration_since(since))
            .unwrap_or(Duration::ZERO)
    }

    pub fn current(&self) -> Option<Gesture> {
        self.current
    }

    pub fn count(&self, gesture: Gesture) -> u32 {
        self.counts[gesture.index()]
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn reset(&mut self) {
        *self = GestureStats::default();
    }
}
