//! Three-axis attitude stabilization
//!
//! - [`PidStabilizer`]: roll/pitch/yaw PID with anti-windup and per-mode gains
//! - [`mix`]: PID output plus flap bias to four clamped servo angles

pub mod mixer;
pub mod pid;

pub use mixer::{mix, ServoCommand};
pub use pid::{PidOutput, PidState, PidStabilizer, PidStatus};
