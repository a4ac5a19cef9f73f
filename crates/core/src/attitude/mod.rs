//! Attitude samples and the math that produces them
//!
//! The `glider_autopilot` crate owns the sensor and the fallback policy; this module
//! holds everything that can be computed without hardware:
//!
//! - [`AttitudeSample`]: roll, pitch, yaw rate and a validity flag
//! - [`RawMotion`]: the four raw words read from the motion sensor
//! - [`math`]: raw counts to physical units, accelerometer tilt angles
//! - [`SimulatedMotion`]: deterministic stand-in signal used after a sensor failure

pub mod math;
pub mod simulated;
pub mod types;

pub use math::{attitude_from_motion, raw_to_motion, ACCEL_LSB_PER_G, GYRO_LSB_PER_DPS, RAD_TO_DEG};
pub use simulated::SimulatedMotion;
pub use types::{AttitudeSample, MotionVector, RawMotion};
