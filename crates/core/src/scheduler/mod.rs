//! Control loop timing
//!
//! The glider runs a single fixed-rate loop. This module holds its static
//! description ([`TaskMetadata`]) and the runtime statistics
//! ([`TaskStats`]) the loop driver updates after every tick. The driver
//! itself lives in the `glider_autopilot` crate.
//!
//! # Example
//!
//! ```rust
//! use glider_core::scheduler::{TaskMetadata, TaskStats};
//!
//! let control = TaskMetadata::new("control", 50);
//! let mut stats = TaskStats::default();
//! stats.update(3_000, 20_000, &control);
//! assert_eq!(stats.measured_rate_hz(), 50);
//! ```

pub mod types;

pub use types::{TaskMetadata, TaskStats};
