//! Attitude Sensor Trait
//!
//! The smallest contract the stabilizer needs from a motion sensor: an
//! availability probe and a raw read of accelerometer X/Y/Z and gyroscope Z.
//! Scaling and angle math happen in `glider_core::attitude`.
//!
//! ## Usage
//!
//! ```ignore
//! use glider_autopilot::devices::traits::AttitudeSensor;
//!
//! fn first_sample<S: AttitudeSensor>(sensor: &mut S) {
//!     if sensor.probe() {
//!         let raw = sensor.read_raw()?;
//!     }
//! }
//! ```

use crate::platform::PlatformError;
use glider_core::attitude::RawMotion;

/// Attitude sensor error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AttitudeSensorError {
    /// Sensor not present or not answering
    Unavailable,
    /// Bus transaction failed during a read
    ReadFailed,
    /// Identity register returned an unexpected value
    WrongDevice(u8),
}

impl AttitudeSensorError {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AttitudeSensorError::Unavailable => "sensor unavailable",
            AttitudeSensorError::ReadFailed => "sensor read failed",
            AttitudeSensorError::WrongDevice(_) => "unexpected sensor identity",
        }
    }
}

impl core::fmt::Display for AttitudeSensorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AttitudeSensorError::WrongDevice(id) => {
                write!(f, "unexpected sensor identity {:#04x}", id)
            }
            other => f.write_str(other.as_str()),
        }
    }
}

impl From<PlatformError> for AttitudeSensorError {
    fn from(_: PlatformError) -> Self {
        AttitudeSensorError::ReadFailed
    }
}

/// Motion sensor providing raw accelerometer and yaw-rate words
pub trait AttitudeSensor {
    /// Check the sensor is present and bring it into measurement mode
    ///
    /// # Returns
    ///
    /// `true` if the sensor answered with the expected identity and accepted
    /// its configuration
    fn probe(&mut self) -> bool;

    /// Read accelerometer X/Y/Z and gyroscope Z
    fn read_raw(&mut self) -> Result<RawMotion, AttitudeSensorError>;

    /// Short name for logs and status output
    fn name(&self) -> &'static str;
}

impl<S: AttitudeSensor + ?Sized> AttitudeSensor for &mut S {
    fn probe(&mut self) -> bool {
        (**self).probe()
    }

    fn read_raw(&mut self) -> Result<RawMotion, AttitudeSensorError> {
        (**self).read_raw()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
