//! Servo command mixer
//!
//! Turns the PID correction into four servo angles. The flaps double as
//! ailerons: roll correction deflects them differentially on top of the
//! active mode's flap bias.
//!
//! ```text
//! flaps_left  = neutral + flaps_bias - roll
//! flaps_right = neutral + flaps_bias + roll
//! elevator    = neutral - pitch
//! rudder      = neutral + yaw
//! ```
//!
//! Every angle is rounded to the nearest degree and clamped to the servo range.

use super::pid::PidOutput;
use crate::parameters::SafetyLimits;
use libm::roundf;

/// Four control servo angles in degrees
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServoCommand {
    pub flaps_left: i16,
    pub flaps_right: i16,
    pub elevator: i16,
    pub rudder: i16,
}

impl ServoCommand {
    /// All surfaces centered
    pub fn neutral(limits: &SafetyLimits) -> Self {
        let n = limits.servo_neutral_angle;
        Self {
            flaps_left: n,
            flaps_right: n,
            elevator: n,
            rudder: n,
        }
    }

    /// Angles in `[flaps_left, flaps_right, elevator, rudder]` order
    pub const fn as_array(&self) -> [i16; 4] {
        [self.flaps_left, self.flaps_right, self.elevator, self.rudder]
    }
}

/// Mix a PID correction into servo angles
///
/// # Arguments
///
/// * `output` - PID correction in degrees
/// * `flaps_bias` - Flap offset of the active flight mode
/// * `limits` - Neutral angle and servo range
pub fn mix(output: &PidOutput, flaps_bias: i16, limits: &SafetyLimits) -> ServoCommand {
    let neutral = f32::from(limits.servo_neutral_angle);
    let flaps = neutral + f32::from(flaps_bias);

    ServoCommand {
        flaps_left: to_angle(flaps - output.roll, limits),
        flaps_right: to_angle(flaps + output.roll, limits),
        elevator: to_angle(neutral - output.pitch, limits),
        rudder: to_angle(neutral + output.yaw, limits),
    }
}

fn to_angle(value: f32, limits: &SafetyLimits) -> i16 {
    if !value.is_finite() {
        return limits.servo_neutral_angle;
    }
    // Saturating float-to-int cast before clamping
    limits.clamp_angle(roundf(value) as i32)
}
