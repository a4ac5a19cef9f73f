//! PWM interface trait
//!
//! One instance per servo output. Duty is a fraction of the period so the
//! trait stays independent of the counter width of the PWM peripheral.

use crate::platform::Result;

/// PWM configuration
#[derive(Debug, Clone, Copy)]
pub struct PwmConfig {
    /// Output frequency in Hz
    pub frequency: u32,
    /// Initial duty cycle (0.0 to 1.0)
    pub duty_cycle: f32,
}

impl Default for PwmConfig {
    fn default() -> Self {
        Self {
            frequency: 50,
            duty_cycle: 0.0,
        }
    }
}

/// PWM interface trait
pub trait PwmInterface {
    /// Set the duty cycle
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Pwm(PwmError::InvalidDutyCycle)` outside
    /// `0.0..=1.0`.
    fn set_duty_cycle(&mut self, duty_cycle: f32) -> Result<()>;

    fn duty_cycle(&self) -> f32;

    /// Set the output frequency
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Pwm(PwmError::InvalidFrequency)` if the
    /// frequency cannot be produced.
    fn set_frequency(&mut self, frequency: u32) -> Result<()>;

    fn frequency(&self) -> u32;

    fn enable(&mut self);

    /// Stop driving the output
    fn disable(&mut self);

    fn is_enabled(&self) -> bool;
}
