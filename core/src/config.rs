use std::fs;
use std::io::{self, Write};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::gesture::ClassifierConfig;

pub const DEFAULT_BAUD: u32 = 115_200;
pub const DEFAULT_LED_PIN: u8 = 18;
pub const DEFAULT_SERVO_PIN: u8 = 13;

/// Tunables shared by every variant binary, persisted as JSON next to the
/// executable so field recalibration survives restarts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    settings_path: String,
    pub classifier: ClassifierConfig,
    /// Seconds a thumbs gesture must be held per level step.
    pub hold_secs: f32,
    /// Serial device for the bridge variant; a CLI argument overrides it.
    pub serial_port: Option<String>,
    pub baud_rate: u32,
    pub led_pin: u8,
    pub servo_pin: u8,
}

impl Settings {
    pub fn new(settings_path: &str) -> Self {
        Settings {
            settings_path: settings_path.to_string(),
            classifier: ClassifierConfig::default(),
            hold_secs: 2.0,
            serial_port: None,
            baud_rate: DEFAULT_BAUD,
            led_pin: DEFAULT_LED_PIN,
            servo_pin: DEFAULT_SERVO_PIN,
        }
    }

    pub fn hold_duration(&self) -> Duration {
        Duration::from_secs_f32(self.hold_secs)
    }

    pub fn save(&self) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

        let mut file = fs::File::create(self.settings_path.clone())?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    pub fn load(&mut self) -> io::Result<()> {
        let content = fs::read_to_string(self.settings_path.clone())?;
        let loaded: Settings = serde_json::from_str(&content)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        *self = loaded;
        Ok(())
    }
}
