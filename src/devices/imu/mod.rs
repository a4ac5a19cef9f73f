//! Motion Sensor Drivers
//!
//! ## Available Drivers
//!
//! - `mpu6050`: InvenSense MPU-6050 over any `I2cInterface`
//! - `mock`: Scripted sensor for tests (`test` or `mock` feature)

#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod mpu6050;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockAttitudeSensor;
pub use mpu6050::Mpu6050;
