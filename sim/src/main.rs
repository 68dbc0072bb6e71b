//! Simulation variant: no hardware and no peer. Local state is the sole
//! source of truth; every command still goes through the wire codec so
//! the traffic a real peer would see is visible in the log.
//!
//! Input is either landmark frames (JSON lines, as from the detector) or
//! bare gesture labels like `OPEN` / `THUMBS_UP` for driving the
//! controller by hand. `q` quits.

use std::io::{self, BufRead};
use std::time::Instant;

use anyhow::Result;
use chrono::Local;

use gesture_core::config::Settings;
use gesture_core::controller::{GestureController, describe};
use gesture_core::device::{ControlState, DeviceState, LEVEL_MAX};
use gesture_core::frames;
use gesture_core::gesture::{Gesture, GestureClassifier};
use gesture_core::hold::{HoldProgress, HoldTimer};
use gesture_core::link::{DeviceLink, NullLink};

/// Text panel in place of a graphical LED glow / rotor animation.
fn panel(state: &ControlState) -> String {
    fn meter(device: &DeviceState) -> String {
        let lit = if device.on { device.level as usize } else { 0 };
        (0..LEVEL_MAX as usize)
            .map(|slot| if slot < lit { '#' } else { '.' })
            .collect()
    }

    format!(
        "LED {} {}/{} [{}] | MOTOR {} {}/{} [{}]",
        if state.led.on { "ON " } else { "OFF" },
        state.led.level,
        LEVEL_MAX,
        meter(&state.led),
        if state.motor.on { "ON " } else { "OFF" },
        state.motor.level,
        LEVEL_MAX,
        meter(&state.motor),
    )
}

fn print_controls() {
    println!("Controls (landmark frames or bare labels on stdin):");
    println!("  ONE            : Switch to LED control mode");
    println!("  TWO            : Switch to Motor control mode");
    println!("  OPEN           : Turn ON current device");
    println!("  CLOSED         : Turn OFF current device");
    println!("  THUMBS_UP 2s   : Increase brightness/speed");
    println!("  THUMBS_DOWN 2s : Decrease brightness/speed");
    println!("  q              : Quit");
}

fn main() -> Result<()> {
    println!("Starting gesture control simulation");
    println!("  LED: simulated (no GPIO)");
    println!("  Servo: simulated (no GPIO)");
    print_controls();

    let mut settings = Settings::new("settings.json");
    if let Err(e) = settings.load() {
        println!("Using default settings ({})", e);
    }

    let classifier = GestureClassifier::new(settings.classifier);
    let mut controller = GestureController::new(HoldTimer::new(settings.hold_duration()));
    let mut state = ControlState::new();
    let mut link = NullLink;
    let mut holding: Option<Gesture> = None;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("q") {
            break;
        }

        let now = Instant::now();
        let gesture = match Gesture::from_label(trimmed.to_uppercase().as_str()) {
            Some(g) => Some(g),
            None => frames::parse_frame(trimmed)
                .first()
                .map(|hand| classifier.classify(hand)),
        };

        let result = controller.step(&mut state, gesture, now);

        match result.hold {
            HoldProgress::Pending { gesture, remaining } => {
                if holding != Some(gesture) {
                    println!("[HOLD] {} - hold for {:.1}s", gesture, remaining.as_secs_f32());
                }
                holding = Some(gesture);
            }
            HoldProgress::Fired(_) => {}
            HoldProgress::Idle => holding = None,
        }

        if let Some(command) = result.command {
            let wire = command.line(state.mode);
            link.send_line(&wire)?;
            let stamp = Local::now().format("%H:%M:%S%.3f");
            println!("[{}] TX {:<10} {}", stamp, wire, describe(command, &state));
            println!("        {}", panel(&state));
        }
    }

    println!("Final: {}", panel(&state));
    println!("Simulation shutdown complete");
    Ok(())
}
