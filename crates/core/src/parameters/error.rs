//! Configuration error types
//!
//! Raised once when a [`GliderConfig`](super::GliderConfig) is validated at
//! load time. Nothing at runtime looks parameters up by name, so these are
//! the only configuration failures the system can report.

/// Errors from configuration validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Flight mode table has no entries
    EmptyModeTable,
    /// More flight modes than the table can hold
    TooManyModes,
    /// Mode id does not match its position in the table
    ModeIdMismatch { index: usize, id: u8 },
    /// A PID gain is NaN or infinite
    InvalidGains { mode: u8 },
    /// An axis limit is not strictly positive and finite
    InvalidLimits { mode: u8 },
    /// An attitude target is NaN or infinite
    InvalidTarget { mode: u8 },
    /// Release angles, threshold or timings are inconsistent
    InvalidRelease,
    /// Servo, PWM or RC ranges are inconsistent
    InvalidSafetyLimits,
    /// Loop, telemetry or hardware frequencies are out of range
    InvalidSystem,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::EmptyModeTable => write!(f, "flight mode table is empty"),
            ConfigError::TooManyModes => write!(f, "too many flight modes"),
            ConfigError::ModeIdMismatch { index, id } => {
                write!(f, "flight mode at index {} has id {}", index, id)
            }
            ConfigError::InvalidGains { mode } => write!(f, "mode {} has non-finite gains", mode),
            ConfigError::InvalidLimits { mode } => {
                write!(f, "mode {} has non-positive axis limits", mode)
            }
            ConfigError::InvalidTarget { mode } => {
                write!(f, "mode {} has non-finite attitude target", mode)
            }
            ConfigError::InvalidRelease => write!(f, "invalid release parameters"),
            ConfigError::InvalidSafetyLimits => write!(f, "invalid safety limits"),
            ConfigError::InvalidSystem => write!(f, "invalid system parameters"),
        }
    }
}
