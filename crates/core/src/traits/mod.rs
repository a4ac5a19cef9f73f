//! Platform-agnostic trait abstractions used by the core logic.
//!
//! Trait definitions here carry no feature gates. The `glider_autopilot` crate provides
//! the hardware-backed implementations; the mocks in this module are always
//! available so the control logic can be exercised on the host.

pub mod time;

pub use time::{MockTime, TimeSource};
