use std::time::{Duration, Instant};

use crate::gesture::Gesture;

pub const DEFAULT_HOLD: Duration = Duration::from_secs(2);

/// Per-frame observation of the hold-to-repeat machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoldProgress {
    Idle,
    /// A repeat-eligible gesture is being held but has not cooked long
    /// enough yet. Purely informational, no action should be taken.
    Pending { gesture: Gesture, remaining: Duration },
    /// The gesture has been held for a full period; act once, the timer
    /// has already restarted for the next repeat.
    Fired(Gesture),
}

/// Debounces a gesture stream into discrete repeat events: while a
/// repeat-eligible gesture is sustained, one event fires per hold period.
/// Any other gesture, `Unknown`, or a missing hand disarms the timer.
#[derive(Debug)]
pub struct HoldTimer {
    duration: Duration,
    active: Option<(Gesture, Instant)>,
}

impl HoldTimer {
    pub fn new(duration: Duration) -> Self {
        HoldTimer { duration, active: None }
    }

    pub fn update(&mut self, gesture: Option<Gesture>, now: Instant) -> HoldProgress {
        let Some(g) = gesture.filter(|g| g.repeats()) else {
            self.active = None;
            return HoldProgress::Idle;
        };

        match self.active {
            Some((held, since)) if held == g => {
                let elapsed = now.duration_since(since);
                if elapsed >= self.duration {
                    // Restart from the firing instant so repeats keep a
                    // fixed cadence while the gesture is held.
                    self.active = Some((g, now));
                    HoldProgress::Fired(g)
                } else {
                    HoldProgress::Pending { gesture: g, remaining: self.duration - elapsed }
                }
            }
            _ => {
                self.active = Some((g, now));
                HoldProgress::Pending { gesture: g, remaining: self.duration }
            }
        }
    }

    pub fn reset(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(base: Instant, ms: u64) -> Instant {
        base + Duration::from_millis(ms)
    }

    #[test]
    fn fires_once_at_the_hold_boundary() {
        let base = Instant::now();
        let mut timer = HoldTimer::new(DEFAULT_HOLD);

        assert!(matches!(
            timer.update(Some(Gesture::ThumbsUp), at(base, 0)),
            HoldProgress::Pending { gesture: Gesture::ThumbsUp, .. }
        ));
        assert!(matches!(
            timer.update(Some(Gesture::ThumbsUp), at(base, 1000)),
            HoldProgress::Pending { .. }
        ));
        assert_eq!(
            timer.update(Some(Gesture::ThumbsUp), at(base, 2000)),
            HoldProgress::Fired(Gesture::ThumbsUp)
        );
        // Immediately after a fire the timer is cooking again.
        assert!(matches!(
            timer.update(Some(Gesture::ThumbsUp), at(base, 2100)),
            HoldProgress::Pending { .. }
        ));
    }

    #[test]
    fn sustained_hold_fires_at_fixed_cadence() {
        let base = Instant::now();
        let mut timer = HoldTimer::new(DEFAULT_HOLD);

        let mut fired = 0;
        for ms in (0..=4000).step_by(100) {
            if let HoldProgress::Fired(_) = timer.update(Some(Gesture::ThumbsDown), at(base, ms)) {
                fired += 1;
            }
        }
        assert_eq!(fired, 2);
    }

    #[test]
    fn pending_reports_time_remaining() {
        let base = Instant::now();
        let mut timer = HoldTimer::new(DEFAULT_HOLD);

        timer.update(Some(Gesture::ThumbsUp), at(base, 0));
        match timer.update(Some(Gesture::ThumbsUp), at(base, 500)) {
            HoldProgress::Pending { remaining, .. } => {
                assert_eq!(remaining, Duration::from_millis(1500));
            }
            other => panic!("expected pending, got {:?}", other),
        }
    }

    #[test]
    fn switching_gesture_restarts_the_timer() {
        let base = Instant::now();
        let mut timer = HoldTimer::new(DEFAULT_HOLD);

        timer.update(Some(Gesture::ThumbsUp), at(base, 0));
        timer.update(Some(Gesture::ThumbsDown), at(base, 1900));
        // 2.0 s after the original start, but only 0.1 s into the new hold.
        assert!(matches!(
            timer.update(Some(Gesture::ThumbsDown), at(base, 2000)),
            HoldProgress::Pending { .. }
        ));
        assert_eq!(
            timer.update(Some(Gesture::ThumbsDown), at(base, 3900)),
            HoldProgress::Fired(Gesture::ThumbsDown)
        );
    }

    #[test]
    fn any_other_input_disarms() {
        let base = Instant::now();
        let mut timer = HoldTimer::new(DEFAULT_HOLD);

        timer.update(Some(Gesture::ThumbsUp), at(base, 0));
        assert_eq!(timer.update(Some(Gesture::Unknown), at(base, 1000)), HoldProgress::Idle);
        // Re-arming starts the full period over.
        timer.update(Some(Gesture::ThumbsUp), at(base, 1100));
        assert!(matches!(
            timer.update(Some(Gesture::ThumbsUp), at(base, 2000)),
            HoldProgress::Pending { .. }
        ));

        timer.update(Some(Gesture::ThumbsUp), at(base, 1100));
        assert_eq!(timer.update(None, at(base, 1200)), HoldProgress::Idle);
        assert_eq!(timer.update(Some(Gesture::Open), at(base, 1300)), HoldProgress::Idle);
    }
}
