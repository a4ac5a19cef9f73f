//! Accelerometer tilt math
//!
//! Roll and pitch are taken from the gravity vector alone; there is no
//! gyro integration or fusion. Yaw is reported as a rate only.

use super::types::{AttitudeSample, MotionVector, RawMotion};
use libm::{atan2f, sqrtf};
use nalgebra::Vector3;

/// Accelerometer counts per g at ±2 g full scale
pub const ACCEL_LSB_PER_G: f32 = 16384.0;

/// Gyroscope counts per deg/s at ±250 deg/s full scale
pub const GYRO_LSB_PER_DPS: f32 = 131.0;

pub const RAD_TO_DEG: f32 = 57.2958;

/// Scale raw sensor words to g and deg/s
pub fn raw_to_motion(raw: &RawMotion) -> MotionVector {
    MotionVector {
        accel_g: Vector3::new(
            f32::from(raw.ax) / ACCEL_LSB_PER_G,
            f32::from(raw.ay) / ACCEL_LSB_PER_G,
            f32::from(raw.az) / ACCEL_LSB_PER_G,
        ),
        yaw_rate_dps: f32::from(raw.gz) / GYRO_LSB_PER_DPS,
    }
}

/// Tilt angles and yaw rate from a motion vector
///
/// ```text
/// roll  = atan2(ay, az)
/// pitch = atan2(-ax, sqrt(ay² + az²))
/// ```
pub fn attitude_from_motion(motion: &MotionVector, valid: bool) -> AttitudeSample {
    let a = &motion.accel_g;
    let roll = atan2f(a.y, a.z) * RAD_TO_DEG;
    let pitch = atan2f(-a.x, sqrtf(a.y * a.y + a.z * a.z)) * RAD_TO_DEG;

    AttitudeSample {
        roll,
        pitch,
        yaw_rate: motion.yaw_rate_dps,
        valid,
    }
}

impl From<&RawMotion> for AttitudeSample {
    /// Real-sensor sample from raw words
    fn from(raw: &RawMotion) -> Self {
        attitude_from_motion(&raw_to_motion(raw), true)
    }
}
