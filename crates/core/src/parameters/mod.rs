//! Glider configuration
//!
//! All tunable values live in one immutable [`GliderConfig`] that is built
//! once, validated once with [`GliderConfig::validate`], and then handed to
//! each component constructor. There is no global configuration state.
//!
//! # Groups
//!
//! - [`FlightModeTable`]: per-mode PID gains, limits, targets, flap bias
//! - [`ReleaseParams`]: release servo angles, RC threshold, safety timings
//! - [`SafetyLimits`]: servo, PWM and RC ranges, anti-windup bound
//! - [`SystemParams`]: loop rate, telemetry cadence, hardware frequencies

pub mod error;
pub mod flight_modes;
pub mod limits;
pub mod release;
pub mod system;

pub use error::ConfigError;
pub use flight_modes::{
    AttitudeTarget, AxisGains, AxisLimits, FlightMode, FlightModeTable, PidGains, LANDING_MODE,
    MAX_FLIGHT_MODES, STANDARD_MODE, THERMAL_MODE,
};
pub use limits::{SafetyLimits, PWM_DUTY_FULL_SCALE};
pub use release::ReleaseParams;
pub use system::SystemParams;

/// Complete, validated system configuration
#[derive(Debug, Clone, Default)]
pub struct GliderConfig {
    pub flight_modes: FlightModeTable,
    pub release: ReleaseParams,
    pub limits: SafetyLimits,
    pub system: SystemParams,
}

impl GliderConfig {
    /// Validate every group and the constraints between them
    ///
    /// Release angles must be reachable by the servo range and the release
    /// threshold must lie inside the accepted RC pulse range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.flight_modes.validate()?;

        if !self.limits.is_valid() {
            return Err(ConfigError::InvalidSafetyLimits);
        }

        if !self.system.is_valid() {
            return Err(ConfigError::InvalidSystem);
        }

        let release = &self.release;
        let angles_reachable = (0..=180).contains(&release.locked_angle)
            && (0..=180).contains(&release.release_angle);
        let threshold_in_range = release.rc_threshold > self.limits.rc_min_pulse
            && release.rc_threshold < self.limits.rc_max_pulse;
        if !release.is_valid() || !angles_reachable || !threshold_in_range {
            return Err(ConfigError::InvalidRelease);
        }

        Ok(())
    }

    /// Default configuration, validated
    pub fn validated_default() -> Result<Self, ConfigError> {
        let config = Self::default();
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GliderConfig::default().validate().is_ok());
        assert!(GliderConfig::validated_default().is_ok());
    }

    #[test]
    fn test_threshold_outside_rc_range_rejected() {
        let mut config = GliderConfig::default();
        config.release.rc_threshold = 2500;
        assert_eq!(config.validate(), Err(ConfigError::InvalidRelease));
    }

    #[test]
    fn test_invalid_group_reported() {
        let mut config = GliderConfig::default();
        config.limits.servo_min_angle = 160;
        assert_eq!(config.validate(), Err(ConfigError::InvalidSafetyLimits));

        let mut config = GliderConfig::default();
        config.system.main_loop_frequency_hz = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidSystem));
    }
}
