//! Release mechanism parameters
//!
//! Angles are release-servo positions in degrees. Timings are milliseconds
//! measured on the loop's monotonic clock.

/// Release mechanism configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReleaseParams {
    /// Servo angle holding the tow hook closed
    pub locked_angle: i16,
    /// Servo angle opening the tow hook
    pub release_angle: i16,
    /// RC pulse width above which the release is requested (µs)
    pub rc_threshold: u16,
    /// Time the request must be held while armed before releasing
    pub safety_delay_ms: u32,
    /// Time spent in `Releasing` before reporting `Released`
    pub release_duration_ms: u32,
    /// Time after release at which the hook closes again
    pub auto_lock_delay_ms: u32,
    /// Whether the emergency command may bypass the arming delay
    pub emergency_override: bool,
}

impl Default for ReleaseParams {
    fn default() -> Self {
        Self {
            locked_angle: 45,
            release_angle: 135,
            rc_threshold: 1700,
            safety_delay_ms: 2000,
            release_duration_ms: 500,
            auto_lock_delay_ms: 5000,
            emergency_override: true,
        }
    }
}

impl ReleaseParams {
    /// Timings are ordered and the two angles differ
    pub fn is_valid(&self) -> bool {
        self.locked_angle != self.release_angle
            && self.release_duration_ms <= self.auto_lock_delay_ms
            && self.auto_lock_delay_ms > 0
    }
}
