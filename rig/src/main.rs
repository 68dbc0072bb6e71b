//! Raspberry Pi variant: gestures drive a PWM LED and a continuous
//! rotation servo directly, no peer involved.

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use rppal::gpio::{Gpio, OutputPin};

use gesture_core::config::Settings;
use gesture_core::controller::{GestureController, describe};
use gesture_core::device::{ControlState, LEVEL_MAX};
use gesture_core::frames::FrameSource;
use gesture_core::gesture::{Gesture, GestureClassifier};
use gesture_core::hold::{HoldProgress, HoldTimer};

const LED_PWM_HZ: f64 = 1000.0;
const SERVO_PERIOD: Duration = Duration::from_millis(20);
// Continuous rotation servo: 1500 us is neutral (stopped), forward speed
// grows toward 2400 us.
const SERVO_NEUTRAL_US: u64 = 1500;
const SERVO_MAX_US: u64 = 2400;

struct DeviceRig {
    led: OutputPin,
    servo: OutputPin,
    motor_running: bool,
}

impl DeviceRig {
    fn new(led_pin: u8, servo_pin: u8) -> Result<Self> {
        let gpio = Gpio::new()?;

        let mut led = gpio.get(led_pin)?.into_output();
        led.set_pwm_frequency(LED_PWM_HZ, 0.0)?;
        println!("GPIO Led {} initialized", led_pin);

        let mut servo = gpio.get(servo_pin)?.into_output();
        servo.set_pwm(SERVO_PERIOD, Duration::from_micros(SERVO_NEUTRAL_US))?;
        println!("GPIO Servo {} initialized", servo_pin);

        Ok(DeviceRig { led, servo, motor_running: false })
    }

    /// Push the current control state out to the pins.
    fn apply(&mut self, state: &ControlState) -> Result<()> {
        let duty = if state.led.on {
            state.led.level as f64 / LEVEL_MAX as f64
        } else {
            0.0
        };
        self.led.set_pwm_frequency(LED_PWM_HZ, duty)?;

        let run = state.motor.on && state.motor.level > 0;
        if run {
            let span = (SERVO_MAX_US - SERVO_NEUTRAL_US) as f64;
            let pulse = SERVO_NEUTRAL_US as f64
                + span * state.motor.level as f64 / LEVEL_MAX as f64;
            self.servo
                .set_pwm(SERVO_PERIOD, Duration::from_micros(pulse as u64))?;
        } else if self.motor_running {
            // Park at neutral long enough for the servo to actually stop,
            // then release the pin.
            self.servo
                .set_pwm(SERVO_PERIOD, Duration::from_micros(SERVO_NEUTRAL_US))?;
            thread::sleep(Duration::from_millis(100));
            self.servo.clear_pwm()?;
        }
        self.motor_running = run;

        Ok(())
    }
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
    println!("Starting gesture LED & servo controller");
    print_controls();

    let mut settings = Settings::new("settings.json");
    match settings.load() {
        Ok(_) => println!("Loaded settings.json"),
        Err(e) => println!("Using default settings ({})", e),
    }
    settings.save()?;

    let mut rig = DeviceRig::new(settings.led_pin, settings.servo_pin)?;
    let classifier = GestureClassifier::new(settings.classifier);
    let mut controller = GestureController::new(HoldTimer::new(settings.hold_duration()));
    let mut state = ControlState::new();

    let stdin = io::stdin();
    let mut frames = FrameSource::new(stdin.lock());
    let mut holding: Option<Gesture> = None;

    while let Some(hands) = frames.next_frame() {
        let now = Instant::now();
        let gesture = hands.first().map(|hand| classifier.classify(hand));
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
            println!("[EVENT] {}", describe(command, &state));
            rig.apply(&state)?;
        }
    }

    // Detector stream closed: leave both devices dark before the pins
    // reset on drop.
    state.led.turn_off();
    state.motor.turn_off();
    rig.apply(&state)?;
    println!("System shutdown complete");
    Ok(())
}
