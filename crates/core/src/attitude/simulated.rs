//! Simulated motion signal
//!
//! Used in place of the motion sensor once it has been declared unusable.
//! Each channel is a low-frequency sinusoid of the time elapsed since the
//! simulation started, so the output is bounded, continuous and
//! reproducible. The result goes through the same tilt math as real data.
//!
//! ```text
//! t  = elapsed_ms / 5000
//! ax = 0.1  * sin(0.3 t)
//! ay = 0.1  * cos(0.2 t)
//! az = 1.0 + 0.05 * sin(0.1 t)
//! gz = 2.0  * sin(0.4 t)
//! ```

use super::math::attitude_from_motion;
use super::types::{AttitudeSample, MotionVector};
use libm::{cosf, sinf};
use nalgebra::Vector3;

/// Time scale of the simulated signal
const TIME_SCALE_MS: f32 = 5000.0;

/// Deterministic motion generator anchored at its start time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedMotion {
    start_ms: u64,
}

impl SimulatedMotion {
    /// Start the signal at `start_ms`
    pub const fn starting_at(start_ms: u64) -> Self {
        Self { start_ms }
    }

    pub const fn start_ms(&self) -> u64 {
        self.start_ms
    }

    /// Motion vector at `now_ms`
    pub fn motion(&self, now_ms: u64) -> MotionVector {
        let t = now_ms.saturating_sub(self.start_ms) as f32 / TIME_SCALE_MS;

        MotionVector {
            accel_g: Vector3::new(
                sinf(t * 0.3) * 0.1,
                cosf(t * 0.2) * 0.1,
                1.0 + sinf(t * 0.1) * 0.05,
            ),
            yaw_rate_dps: sinf(t * 0.4) * 2.0,
        }
    }

    /// Attitude sample at `now_ms`, always flagged invalid
    pub fn sample(&self, now_ms: u64) -> AttitudeSample {
        attitude_from_motion(&self.motion(now_ms), false)
    }
}
