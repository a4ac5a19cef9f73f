//! Device traits
//!
//! Hardware-independent trait definitions for device drivers. They let the
//! attitude source run against a real sensor or a mock without change.

pub mod attitude;

pub use attitude::{AttitudeSensor, AttitudeSensorError};
pub use glider_core::attitude::RawMotion;
