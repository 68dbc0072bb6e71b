//! # gesture_core
//!
//! Hand-gesture control of a two-device (LED + motor) rig.
//!
//! An external landmark detector feeds 21-point hand frames; this library
//! classifies each frame into a small gesture vocabulary and turns the
//! gesture stream into device commands over a line-based peer protocol.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Action |
//! |---|---|
//! | One (index up) | Switch to LED control mode |
//! | Two (peace sign) | Switch to MOTOR control mode |
//! | Open hand | Turn the selected device ON |
//! | Closed fist | Turn the selected device OFF |
//! | Thumbs up, held 2 s | Level up (repeats every 2 s while held) |
//! | Thumbs down, held 2 s | Level down (repeats every 2 s while held) |
//!
//! The variant binaries (`gesture_rig`, `gesture_bridge`, `gesture_sim`,
//! `gesture_lab`) are thin adapters around this crate: GPIO, a serial
//! peer, a self-contained simulation, and a detection-accuracy harness.

pub mod config;
pub mod controller;
pub mod device;
pub mod frames;
pub mod gesture;
pub mod hold;
pub mod landmarks;
pub mod link;
pub mod protocol;
pub mod stats;
