//! Subsystems
//!
//! Stateful building blocks that combine device drivers with core logic.
//!
//! - `attitude`: Attitude source with simulated fallback

pub mod attitude;

pub use attitude::{AttitudeSource, FallbackPolicy};
