//! Servo angle to PWM conversion
//!
//! Hobby servos on a 50 Hz signal map 0–180° onto a duty range given in
//! 10-bit counts (`pwm_min_duty`..`pwm_max_duty`, 1023 = 100 %). Angles are
//! clamped to the configured servo range before conversion so an actuator
//! can never be driven past its mechanical stops.
//!
//! # Design
//!
//! Pure `no_std` arithmetic. The PWM peripheral takes a duty fraction; the
//! `glider_autopilot` crate feeds it the result of [`angle_to_duty_fraction`].

use crate::parameters::{SafetyLimits, PWM_DUTY_FULL_SCALE};

/// Convert a servo angle to a 10-bit duty count
///
/// # Arguments
///
/// * `angle` - Commanded angle in degrees
/// * `limits` - Servo range and duty bounds
///
/// # Returns
///
/// `pwm_min_duty + angle * (pwm_max_duty - pwm_min_duty) / 180`, with the
/// angle clamped first and integer division rounding down
pub fn angle_to_duty(angle: i16, limits: &SafetyLimits) -> u16 {
    let angle = limits.clamp_angle(i32::from(angle)).max(0) as u32;
    let span = u32::from(limits.pwm_max_duty.saturating_sub(limits.pwm_min_duty));
    let duty = u32::from(limits.pwm_min_duty) + angle * span / 180;
    duty.min(u32::from(PWM_DUTY_FULL_SCALE)) as u16
}

/// Convert a 10-bit duty count to a duty fraction (0.0 to 1.0)
pub fn duty_to_fraction(duty: u16) -> f32 {
    f32::from(duty.min(PWM_DUTY_FULL_SCALE)) / f32::from(PWM_DUTY_FULL_SCALE)
}

/// Convert a servo angle straight to a duty fraction
pub fn angle_to_duty_fraction(angle: i16, limits: &SafetyLimits) -> f32 {
    duty_to_fraction(angle_to_duty(angle, limits))
}

/// High time in microseconds of a duty count at `frequency_hz`
///
/// At 50 Hz (20 ms period) a count of 40 is ~782 µs and 115 is ~2248 µs.
pub fn duty_to_pulse_us(duty: u16, frequency_hz: u32) -> u16 {
    if frequency_hz == 0 {
        return 0;
    }
    let period_us = 1_000_000 / frequency_hz;
    (u32::from(duty.min(PWM_DUTY_FULL_SCALE)) * period_us / u32::from(PWM_DUTY_FULL_SCALE)) as u16
}
