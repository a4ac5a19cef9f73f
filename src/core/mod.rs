//! Core firmware infrastructure
//!
//! - `logging`: Logging macros shared by every module
//! - `scheduler`: Fixed-rate control loop driver

pub mod logging;
pub mod scheduler;
