//! Serial variant: gestures stream command lines to an Arduino-class
//! peer over USB serial; the peer's status lines keep local state in sync.

use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use serialport::SerialPort;

use gesture_core::config::Settings;
use gesture_core::controller::{GestureController, describe};
use gesture_core::device::ControlState;
use gesture_core::frames::FrameSource;
use gesture_core::gesture::{Gesture, GestureClassifier};
use gesture_core::hold::{HoldProgress, HoldTimer};
use gesture_core::link::{DeviceLink, spawn_status_reader};

const READ_TIMEOUT: Duration = Duration::from_millis(100);
const READY_WAIT: Duration = Duration::from_secs(5);

struct SerialLink {
    port: Box<dyn SerialPort>,
}

impl DeviceLink for SerialLink {
    fn send_line(&mut self, line: &str) -> Result<()> {
        self.port.write_all(line.as_bytes())?;
        self.port.write_all(b"\n")?;
        self.port.flush()?;
        Ok(())
    }
}

/// The peer resets when the port opens and prints `READY:` once its
/// firmware is up; nothing should be sent before that.
fn wait_for_ready(port: &mut dyn SerialPort) -> Result<()> {
    let mut pending = String::new();
    let mut chunk = [0u8; 64];
    let started = Instant::now();

    while started.elapsed() < READY_WAIT {
        match port.read(&mut chunk) {
            Ok(0) => {}
            Ok(n) => {
                pending.push_str(&String::from_utf8_lossy(&chunk[..n]));
                while let Some(end) = pending.find('\n') {
                    let line: String = pending.drain(..=end).collect();
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    println!("Peer: {}", line);
                    if line.starts_with("READY:") {
                        return Ok(());
                    }
                }
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut => {}
            Err(e) => return Err(e.into()),
        }
    }

    Err(anyhow!("peer did not announce READY within {:?}", READY_WAIT))
}

fn print_controls() {
    println!("Controls:");
    println!("  1 finger       : Switch to LED control mode");
    println!("  2 fingers      : Switch to Motor control mode");
    println!("  Open hand      : Turn ON current device");
    println!("  Closed hand    : Turn OFF current device");
    println!("  Thumbs up 2s   : Increase brightness/speed");
    println!("  Thumbs down 2s : Decrease brightness/speed");
}

fn main() -> Result<()> {
    println!("Starting gesture serial bridge");
    print_controls();

    let mut settings = Settings::new("settings.json");
    if let Err(e) = settings.load() {
        println!("Using default settings ({})", e);
    }

    let port_name = std::env::args()
        .nth(1)
        .or_else(|| settings.serial_port.clone())
        .ok_or_else(|| {
            anyhow!("no serial port given; pass one as the first argument or set serial_port in settings.json")
        })?;

    println!("Connecting to {} at {} baud", port_name, settings.baud_rate);
    let mut port = serialport::new(&port_name, settings.baud_rate)
        .timeout(READ_TIMEOUT)
        .open()
        .with_context(|| format!("failed to open {}", port_name))?;

    wait_for_ready(port.as_mut())?;
    println!("Connected");

    let state = Arc::new(Mutex::new(ControlState::new()));
    let running = Arc::new(AtomicBool::new(true));

    let reader_port = port
        .try_clone()
        .context("failed to clone serial port for the status reader")?;
    let reader = spawn_status_reader(reader_port, Arc::clone(&state), Arc::clone(&running));

    let mut link = SerialLink { port };
    let classifier = GestureClassifier::new(settings.classifier);
    let mut controller = GestureController::new(HoldTimer::new(settings.hold_duration()));

    let stdin = io::stdin();
    let mut frames = FrameSource::new(stdin.lock());
    let mut holding: Option<Gesture> = None;

    while let Some(hands) = frames.next_frame() {
        let now = Instant::now();
        let gesture = hands.first().map(|hand| classifier.classify(hand));

        // One lock acquisition covers the whole step, so a status update
        // from the reader never lands mid-mutation.
        let mut outbound = None;
        {
            let mut locked = state.lock().unwrap();
            let result = controller.step(&mut locked, gesture, now);

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
                println!("[EVENT] {}", describe(command, &locked));
                outbound = Some(command.line(locked.mode));
            }
        }

        // Fire-and-forget: a lost line is logged and never retried, the
        // peer's next status broadcast reconciles any divergence.
        if let Some(line) = outbound {
            if let Err(e) = link.send_line(&line) {
                eprintln!("Write failed ({}), continuing with local state", e);
            }
        }
    }

    running.store(false, Ordering::Relaxed);
    let _ = reader.join();
    println!("Disconnected");
    Ok(())
}
