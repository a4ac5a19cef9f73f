#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! glider_autopilot - Stabilization autopilot for small gliders
//!
//! Firmware-side layer of the glider autopilot: platform abstraction,
//! device drivers, hardware adapters and the fixed-rate control loop.
//! The algorithms themselves live in `glider_core`.

// Platform abstraction layer
pub mod platform;

// Device drivers using platform abstraction
pub mod devices;

// Hardware adapters (RC input, servos, LEDs, buttons)
pub mod libraries;

// Attitude source with simulated fallback
pub mod subsystems;

// Logging macros and the control loop driver
pub mod core;

// System orchestrator
pub mod glider;

pub use glider::{Capabilities, GliderHardware, GliderSystem, StatusSnapshot, TickError, TickReport};
pub use glider_core::parameters::GliderConfig;
