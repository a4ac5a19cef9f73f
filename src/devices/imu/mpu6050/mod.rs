//! MPU-6050 6-axis motion sensor
//!
//! Only the registers needed for tilt and yaw rate are used: identity check,
//! wake-up, full-scale ranges (±2 g, ±250 deg/s), low-pass filter, and one
//! burst read of the measurement block.

mod driver;
pub mod registers;

pub use driver::Mpu6050;
