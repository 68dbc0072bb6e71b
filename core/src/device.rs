use std::fmt;

pub const LEVEL_MIN: u8 = 0;
pub const LEVEL_MAX: u8 = 5;
/// Level a device resumes at when turned on with nothing stored.
pub const RESUME_LEVEL: u8 = 3;

/// The two controllable devices. The same enum selects the interaction
/// mode, since exactly one device is targeted at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    Led,
    Motor,
}

impl DeviceKind {
    pub fn label(self) -> &'static str {
        match self {
            DeviceKind::Led => "LED",
            DeviceKind::Motor => "MOTOR",
        }
    }

    pub fn from_label(label: &str) -> Option<DeviceKind> {
        match label {
            "LED" => Some(DeviceKind::Led),
            "MOTOR" => Some(DeviceKind::Motor),
            _ => None,
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// On/off plus a brightness/speed level, always clamped to [0,5]. The
/// level survives turn-off so the device resumes where it left.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceState {
    pub on: bool,
    pub level: u8,
}

impl DeviceState {
    pub fn turn_on(&mut self) {
        if self.on {
            return;
        }
        self.on = true;
        if self.level == 0 {
            self.level = RESUME_LEVEL;
        }
    }

    pub fn turn_off(&mut self) {
        self.on = false;
    }

    /// Store a clamped level. Works while off too, so a later `turn_on`
    /// resumes there; the caller must not emit a command in that case.
    pub fn set_level(&mut self, level: i32) {
        self.level = level.clamp(LEVEL_MIN as i32, LEVEL_MAX as i32) as u8;
    }

    pub fn increase(&mut self) {
        if self.on {
            self.set_level(self.level as i32 + 1);
        }
    }

    pub fn decrease(&mut self) {
        if self.on {
            self.set_level(self.level as i32 - 1);
        }
    }
}

/// Everything the interaction layer mutates: the mode selector and both
/// device states. Shared with the status-reader thread in the serial
/// variant, so mutations must happen under one lock acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    pub mode: DeviceKind,
    pub led: DeviceState,
    pub motor: DeviceState,
}

impl Default for ControlState {
    fn default() -> Self {
        ControlState {
            mode: DeviceKind::Led,
            led: DeviceState::default(),
            motor: DeviceState::default(),
        }
    }
}

impl ControlState {
    pub fn new() -> Self {
        ControlState::default()
    }

    pub fn device(&self, kind: DeviceKind) -> &DeviceState {
        match kind {
            DeviceKind::Led => &self.led,
            DeviceKind::Motor => &self.motor,
        }
    }

    pub fn device_mut(&mut self, kind: DeviceKind) -> &mut DeviceState {
        match kind {
            DeviceKind::Led => &mut self.led,
            DeviceKind::Motor => &mut self.motor,
        }
    }

    pub fn active(&self) -> &DeviceState {
        self.device(self.mode)
    }

    pub fn active_mut(&mut self) -> &mut DeviceState {
        self.device_mut(self.mode)
    }

    /// One-line status of the currently targeted device.
    pub fn summary(&self) -> String {
        let device = self.active();
        format!(
            "{}: {} - Level: {}/{}",
            self.mode.label(),
            if device.on { "ON" } else { "OFF" },
            device.level,
            LEVEL_MAX
        )
    }
}
