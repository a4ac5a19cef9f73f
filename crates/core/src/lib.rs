//! glider_core - Pure no_std business logic for the glider autopilot
//!
//! This crate contains the platform-agnostic algorithms and types of the
//! stabilization autopilot. Everything here is testable on the host without
//! any feature flags, hardware or async runtime.
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives allowed
//! - **Pure no_std**: No std library dependencies
//! - **No logging**: Components return typed events; the `glider_autopilot` crate logs them
//! - **Injected configuration**: Every component receives its parameters at construction
//!
//! # Modules
//!
//! - [`traits`]: Platform-agnostic trait abstractions (TimeSource)
//! - [`parameters`]: Flight mode table, release, safety and system parameters
//! - [`attitude`]: Attitude samples, accelerometer attitude math, simulated signal
//! - [`stabilizer`]: Three-axis PID stabilizer and servo command mixer
//! - [`release`]: Release mechanism safety state machine
//! - [`rc`]: RC pulse validation and single-slot pulse exchange
//! - [`servo`]: Servo angle to PWM duty conversion
//! - [`indicator`]: Status LED blink patterns and alert pulses
//! - [`input`]: Push-button debouncing
//! - [`selftest`]: Startup self-test timeline and result patterns
//! - [`scheduler`]: Control loop timing statistics

#![no_std]

pub mod attitude;
pub mod indicator;
pub mod input;
pub mod parameters;
pub mod rc;
pub mod release;
pub mod scheduler;
pub mod selftest;
pub mod servo;
pub mod stabilizer;
pub mod traits;
