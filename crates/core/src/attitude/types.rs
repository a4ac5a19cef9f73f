//! Attitude data types

use nalgebra::Vector3;

/// Raw sensor words: accelerometer X/Y/Z and gyroscope Z
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawMotion {
    pub ax: i16,
    pub ay: i16,
    pub az: i16,
    pub gz: i16,
}

impl RawMotion {
    pub const fn new(ax: i16, ay: i16, az: i16, gz: i16) -> Self {
        Self { ax, ay, az, gz }
    }

    /// Words in `[ax, ay, az, gz]` order
    pub const fn as_array(&self) -> [i16; 4] {
        [self.ax, self.ay, self.az, self.gz]
    }
}

/// Motion in physical units: acceleration in g, yaw rate in deg/s
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionVector {
    pub accel_g: Vector3<f32>,
    pub yaw_rate_dps: f32,
}

/// One attitude estimate
///
/// `valid` is true only when the values came from the real sensor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AttitudeSample {
    /// Roll angle (degrees, right wing down positive)
    pub roll: f32,
    /// Pitch angle (degrees, nose up positive)
    pub pitch: f32,
    /// Yaw rate (deg/s)
    pub yaw_rate: f32,
    pub valid: bool,
}

impl AttitudeSample {
    /// Level attitude flagged as real data
    pub const fn level() -> Self {
        Self {
            roll: 0.0,
            pitch: 0.0,
            yaw_rate: 0.0,
            valid: true,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.roll.is_finite() && self.pitch.is_finite() && self.yaw_rate.is_finite()
    }
}
