use std::io::{self, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use anyhow::Result;

use crate::device::ControlState;
use crate::protocol;

/// Outbound half of a peer connection. Writes are fire-and-forget: a
/// failed send is reported to the caller, never retried here, and the
/// local state mutation that produced it is not rolled back.
pub trait DeviceLink {
    fn send_line(&mut self, line: &str) -> Result<()>;
}

/// Sink for the self-contained variants: commands go nowhere.
pub struct NullLink;

impl DeviceLink for NullLink {
    fn send_line(&mut self, _line: &str) -> Result<()> {
        Ok(())
    }
}

/// Drain inbound bytes on a dedicated thread, independent of the frame
/// cadence: reassemble newline-terminated lines (partial tails carry over
/// between reads) and apply every recognized status line to the shared
/// state. Each update takes the lock once, so it is all-or-nothing with
/// respect to the frame loop.
///
/// The thread stops when `running` is cleared, on end of stream, or on a
/// hard read error. A partial line left in the buffer at shutdown is
/// discarded, not reprocessed.
pub fn spawn_status_reader<R>(
    mut source: R,
    state: Arc<Mutex<ControlState>>,
    running: Arc<AtomicBool>,
) -> JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut pending = String::new();
        let mut chunk = [0u8; 256];

        while running.load(Ordering::Relaxed) {
            match source.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => {
                    pending.push_str(&String::from_utf8_lossy(&chunk[..n]));
                    while let Some(end) = pending.find('\n') {
                        let line: String = pending.drain(..=end).collect();
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        if let Some(update) = protocol::parse_status(line) {
                            let mut locked = state.lock().unwrap();
                            update.apply(&mut locked);
                        }
                    }
                }
                // Idle serial reads surface as timeouts; keep listening.
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::TimedOut
                            | io::ErrorKind::WouldBlock
                            | io::ErrorKind::Interrupted
                    ) =>
                {
                    continue;
                }
                Err(e) => {
                    eprintln!("Status reader error: {}", e);
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use crate::device::{DeviceKind, DeviceState};

    fn run_reader(input: &str) -> ControlState {
        let state = Arc::new(Mutex::new(ControlState::new()));
        let running = Arc::new(AtomicBool::new(true));
        let handle = spawn_status_reader(
            Cursor::new(input.as_bytes().to_vec()),
            Arc::clone(&state),
            Arc::clone(&running),
        );
        handle.join().unwrap();
        let locked = state.lock().unwrap();
        *locked
    }

    #[test]
    fn applies_status_lines_and_drops_garbage() {
        let state = run_reader("STATUS:MOTOR,ON,4,OFF,0\nGARBAGE:1,2,3\nLED:LEVEL:2\n");
        assert_eq!(state.mode, DeviceKind::Motor);
        assert_eq!(state.led, DeviceState { on: true, level: 2 });
        assert_eq!(state.motor, DeviceState { on: false, level: 0 });
    }

    #[test]
    fn unterminated_tail_is_discarded() {
        let state = run_reader("LED:ON\nMOTOR:O");
        assert!(state.led.on);
        assert!(!state.motor.on);
    }

    #[test]
    fn handles_crlf_and_blank_lines() {
        let state = run_reader("\r\nLED:LEVEL:5\r\n\nMODE:MOTOR\r\n");
        assert_eq!(state.led.level, 5);
        assert_eq!(state.mode, DeviceKind::Motor);
    }

    #[test]
    fn null_link_always_accepts() {
        let mut link = NullLink;
        assert!(link.send_line("LED:ON").is_ok());
    }
}
