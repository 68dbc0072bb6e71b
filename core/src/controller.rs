use std::time::Instant;

use crate::device::{ControlState, DeviceKind, LEVEL_MAX};
use crate::gesture::Gesture;
use crate::hold::{HoldProgress, HoldTimer};
use crate::protocol::Command;

/// Outcome of one frame: at most one command, plus the hold-timer
/// observation for countdown feedback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    pub command: Option<Command>,
    pub hold: HoldProgress,
}

/// The top-level interaction machine. Mode switches and on/off are
/// edge-triggered so a gesture held across frames cannot flood the peer
/// with identical commands; level changes instead repeat on the hold
/// timer's cadence while the thumb gesture is sustained.
pub struct GestureController {
    hold: HoldTimer,
}

impl GestureController {
    pub fn new(hold: HoldTimer) -> Self {
        GestureController { hold }
    }

    /// Process one classified frame. `gesture` is `None` when no hand was
    /// detected. The local mutation matching an emitted command is applied
    /// before returning; the caller owns delivery and must not retry or
    /// roll back on a failed send.
    pub fn step(
        &mut self,
        state: &mut ControlState,
        gesture: Option<Gesture>,
        now: Instant,
    ) -> StepResult {
        let hold = self.hold.update(gesture, now);

        let command = match gesture {
            None | Some(Gesture::Unknown) => None,
            Some(Gesture::One) => switch_mode(state, DeviceKind::Led),
            Some(Gesture::Two) => switch_mode(state, DeviceKind::Motor),
            Some(Gesture::Open) => {
                if state.active().on {
                    None
                } else {
                    state.active_mut().turn_on();
                    Some(Command::TurnOn)
                }
            }
            Some(Gesture::Closed) => {
                if state.active().on {
                    state.active_mut().turn_off();
                    Some(Command::TurnOff)
                } else {
                    None
                }
            }
            Some(Gesture::ThumbsUp) | Some(Gesture::ThumbsDown) => match hold {
                HoldProgress::Fired(Gesture::ThumbsUp) if state.active().on => {
                    state.active_mut().increase();
                    Some(Command::LevelUp)
                }
                HoldProgress::Fired(Gesture::ThumbsDown) if state.active().on => {
                    state.active_mut().decrease();
                    Some(Command::LevelDown)
                }
                _ => None,
            },
        };

        StepResult { command, hold }
    }
}

fn switch_mode(state: &mut ControlState, target: DeviceKind) -> Option<Command> {
    if state.mode == target {
        return None;
    }
    state.mode = target;
    Some(Command::SetMode(target))
}

/// Human-readable announcement for an emitted command, phrased against the
/// state *after* the command's local mutation.
pub fn describe(command: Command, state: &ControlState) -> String {
    match command {
        Command::SetMode(mode) => format!("Switched to {} control mode", mode.label()),
        Command::TurnOn => format!(
            "{}: ON - Level: {}/{}",
            state.mode.label(),
            state.active().level,
            LEVEL_MAX
        ),
        Command::TurnOff => format!("{}: OFF", state.mode.label()),
        Command::LevelUp | Command::LevelDown => format!(
            "{} Level: {}/{}",
            state.mode.label(),
            state.active().level,
            LEVEL_MAX
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::hold::DEFAULT_HOLD;

    fn controller() -> GestureController {
        GestureController::new(HoldTimer::new(DEFAULT_HOLD))
    }

    fn at(base: Instant, ms: u64) -> Instant {
        base + Duration::from_millis(ms)
    }

    #[test]
    fn mode_switch_is_idempotent() {
        let base = Instant::now();
        let mut c = controller();
        let mut state = ControlState::new();

        // Already in LED mode: nothing to do.
        let result = c.step(&mut state, Some(Gesture::One), at(base, 0));
        assert_eq!(result.command, None);

        let result = c.step(&mut state, Some(Gesture::Two), at(base, 100));
        assert_eq!(result.command, Some(Command::SetMode(DeviceKind::Motor)));
        assert_eq!(state.mode, DeviceKind::Motor);

        let result = c.step(&mut state, Some(Gesture::Two), at(base, 200));
        assert_eq!(result.command, None);
    }

    #[test]
    fn open_and_closed_are_edge_triggered() {
        let base = Instant::now();
        let mut c = controller();
        let mut state = ControlState::new();

        let result = c.step(&mut state, Some(Gesture::Open), at(base, 0));
        assert_eq!(result.command, Some(Command::TurnOn));
        assert!(state.led.on);

        // Held open across many frames: no command flood.
        for ms in 1..30u64 {
            let result = c.step(&mut state, Some(Gesture::Open), at(base, ms * 33));
            assert_eq!(result.command, None);
        }

        let result = c.step(&mut state, Some(Gesture::Closed), at(base, 1000));
        assert_eq!(result.command, Some(Command::TurnOff));
        let result = c.step(&mut state, Some(Gesture::Closed), at(base, 1033));
        assert_eq!(result.command, None);
    }

    #[test]
    fn closed_while_already_off_does_nothing() {
        let base = Instant::now();
        let mut c = controller();
        let mut state = ControlState::new();
        let result = c.step(&mut state, Some(Gesture::Closed), at(base, 0));
        assert_eq!(result.command, None);
    }

    #[test]
    fn thumbs_fire_only_after_the_hold_period() {
        let base = Instant::now();
        let mut c = controller();
        let mut state = ControlState::new();
        c.step(&mut state, Some(Gesture::Open), at(base, 0));

        let result = c.step(&mut state, Some(Gesture::ThumbsUp), at(base, 100));
        assert_eq!(result.command, None);
        assert!(matches!(result.hold, HoldProgress::Pending { .. }));

        let result = c.step(&mut state, Some(Gesture::ThumbsUp), at(base, 2100));
        assert_eq!(result.command, Some(Command::LevelUp));
        assert_eq!(state.led.level, 4);

        // 0.1 s later: still cooking toward the next repeat.
        let result = c.step(&mut state, Some(Gesture::ThumbsUp), at(base, 2200));
        assert_eq!(result.command, None);
    }

    #[test]
    fn level_repeat_needs_the_device_on() {
        let base = Instant::now();
        let mut c = controller();
        let mut state = ControlState::new();

        c.step(&mut state, Some(Gesture::ThumbsUp), at(base, 0));
        let result = c.step(&mut state, Some(Gesture::ThumbsUp), at(base, 2000));
        assert!(matches!(result.hold, HoldProgress::Fired(_)));
        assert_eq!(result.command, None);
        assert_eq!(state.led.level, 0);
    }

    #[test]
    fn unknown_and_no_hand_reset_the_hold() {
        let base = Instant::now();
        let mut c = controller();
        let mut state = ControlState::new();
        c.step(&mut state, Some(Gesture::Open), at(base, 0));

        c.step(&mut state, Some(Gesture::ThumbsUp), at(base, 100));
        c.step(&mut state, None, at(base, 1000));
        // Hold was broken; 2 s from the original start is not enough.
        let result = c.step(&mut state, Some(Gesture::ThumbsUp), at(base, 1100));
        assert!(matches!(result.hold, HoldProgress::Pending { .. }));
        let result = c.step(&mut state, Some(Gesture::ThumbsUp), at(base, 2100));
        assert_eq!(result.command, None);

        let result = c.step(&mut state, Some(Gesture::Unknown), at(base, 2200));
        assert_eq!(result.hold, HoldProgress::Idle);
        assert_eq!(result.command, None);
    }

    #[test]
    fn describe_matches_the_post_command_state() {
        let base = Instant::now();
        let mut c = controller();
        let mut state = ControlState::new();

        let result = c.step(&mut state, Some(Gesture::Open), at(base, 0));
        let text = describe(result.command.unwrap(), &state);
        assert_eq!(text, "LED: ON - Level: 3/5");
    }
}
