//! Fixed-rate control loop driver
//!
//! The glider runs one cooperative loop at `main_loop_frequency_hz`. Timing
//! statistics types come from `glider_core::scheduler`; this module adds the
//! driver that ticks the [`GliderSystem`](crate::glider::GliderSystem) and
//! sleeps out the rest of each period.

pub mod control;

pub use control::{ControlLoop, LoopSummary};
pub use glider_core::scheduler::{TaskMetadata, TaskStats};
