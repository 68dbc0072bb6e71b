//! Line protocol to the device peer. ASCII, newline-terminated,
//! case-sensitive, identical across the hardware, serial, and simulated
//! variants.

use crate::device::{ControlState, DeviceKind, DeviceState, LEVEL_MAX};

/// Outbound instruction for the peer. On/off and level commands address
/// whichever device is selected at encode time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetMode(DeviceKind),
    TurnOn,
    TurnOff,
    LevelUp,
    LevelDown,
}

impl Command {
    /// Render the wire line (without the terminating newline).
    pub fn line(self, mode: DeviceKind) -> String {
        match self {
            Command::SetMode(target) => format!("MODE:{}", target.label()),
            Command::TurnOn => format!("{}:ON", mode.label()),
            Command::TurnOff => format!("{}:OFF", mode.label()),
            Command::LevelUp => format!("{}:UP", mode.label()),
            Command::LevelDown => format!("{}:DOWN", mode.label()),
        }
    }
}

/// A parsed inbound report. `Full` carries the peer's complete state; the
/// other variants are single-field echoes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusUpdate {
    Full {
        mode: DeviceKind,
        led_on: bool,
        led_level: u8,
        motor_on: bool,
        motor_level: u8,
    },
    Mode(DeviceKind),
    Power(DeviceKind, bool),
    Level(DeviceKind, u8),
}

impl StatusUpdate {
    /// Resynchronize local state with the peer's report. The peer is
    /// authoritative, so fields are applied as received.
    pub fn apply(self, state: &mut ControlState) {
        match self {
            StatusUpdate::Full { mode, led_on, led_level, motor_on, motor_level } => {
                state.mode = mode;
                state.led = DeviceState { on: led_on, level: led_level };
                state.motor = DeviceState { on: motor_on, level: motor_level };
            }
            StatusUpdate::Mode(mode) => state.mode = mode,
            StatusUpdate::Power(kind, on) => state.device_mut(kind).on = on,
            StatusUpdate::Level(kind, level) => state.device_mut(kind).level = level.min(LEVEL_MAX),
        }
    }
}

/// Parse one inbound line; most specific prefix wins. `None` drops the
/// line whole: a recognized prefix with a malformed remainder never
/// produces a partial update.
pub fn parse_status(line: &str) -> Option<StatusUpdate> {
    let line = line.trim();

    if let Some(rest) = line.strip_prefix("STATUS:") {
        // STATUS:<mode>,<ON|OFF>,<led_level>,<ON|OFF>,<motor_level>
        let fields: Vec<&str> = rest.split(',').collect();
        if fields.len() != 5 {
            return None;
        }
        return Some(StatusUpdate::Full {
            mode: DeviceKind::from_label(fields[0])?,
            led_on: parse_power(fields[1])?,
            led_level: parse_level(fields[2])?,
            motor_on: parse_power(fields[3])?,
            motor_level: parse_level(fields[4])?,
        });
    }

    if let Some(rest) = line.strip_prefix("MODE:") {
        return DeviceKind::from_label(rest).map(StatusUpdate::Mode);
    }

    for kind in [DeviceKind::Led, DeviceKind::Motor] {
        let Some(rest) = line.strip_prefix(kind.label()) else {
            continue;
        };
        let Some(rest) = rest.strip_prefix(':') else {
            continue;
        };
        if let Some(on) = parse_power(rest) {
            return Some(StatusUpdate::Power(kind, on));
        }
        if let Some(level) = rest.strip_prefix("LEVEL:") {
            return parse_level(level).map(|n| StatusUpdate::Level(kind, n));
        }
        return None;
    }

    None
}

fn parse_power(field: &str) -> Option<bool> {
    match field {
        "ON" => Some(true),
        "OFF" => Some(false),
        _ => None,
    }
}

fn parse_level(field: &str) -> Option<u8> {
    field
        .parse::<i32>()
        .ok()
        .map(|n| n.clamp(0, LEVEL_MAX as i32) as u8)
}
