//! Device drivers
//!
//! Drivers built on the platform abstraction traits.
//!
//! ## Modules
//!
//! - `imu`: Motion sensor drivers (MPU-6050, mock)
//! - `traits`: Device trait definitions (AttitudeSensor)

pub mod imu;
pub mod traits;
