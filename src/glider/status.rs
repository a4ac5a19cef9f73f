//! Tick results and status reporting

use crate::platform::PlatformError;
use bitflags::bitflags;
use glider_core::attitude::AttitudeSample;
use glider_core::input::ButtonEvents;
use glider_core::release::{ReleaseState, ReleaseTransition};
use glider_core::selftest::SelfTestPhase;
use glider_core::stabilizer::ServoCommand;

bitflags! {
    /// Hardware present at startup
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Capabilities: u8 {
        /// Motion sensor answered its probe
        const ATTITUDE_SENSOR = 0b0000_0001;
        /// RC receiver input connected
        const RC_INPUT = 0b0000_0010;
        /// Status LEDs fitted
        const STATUS_LEDS = 0b0000_0100;
        /// Push buttons fitted
        const BUTTONS = 0b0000_1000;
        /// Release servo fitted
        const RELEASE_SERVO = 0b0001_0000;
    }
}

impl Capabilities {
    /// Name of each flag, in bit order
    pub const NAMES: [(Capabilities, &'static str); 5] = [
        (Capabilities::ATTITUDE_SENSOR, "attitude sensor"),
        (Capabilities::RC_INPUT, "rc input"),
        (Capabilities::STATUS_LEDS, "status leds"),
        (Capabilities::BUTTONS, "buttons"),
        (Capabilities::RELEASE_SERVO, "release servo"),
    ];
}

/// Failure inside one control tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickError {
    /// Control surface output failed
    Actuator(PlatformError),
    /// Release servo output failed
    ReleaseServo(PlatformError),
    /// Status LED output failed
    Indicator(PlatformError),
}

impl TickError {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TickError::Actuator(_) => "actuator output failed",
            TickError::ReleaseServo(_) => "release servo output failed",
            TickError::Indicator(_) => "indicator output failed",
        }
    }

    pub const fn platform_error(&self) -> PlatformError {
        match self {
            TickError::Actuator(e) | TickError::ReleaseServo(e) | TickError::Indicator(e) => *e,
        }
    }
}

impl core::fmt::Display for TickError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.as_str(), self.platform_error())
    }
}

/// System status for telemetry and the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusSnapshot {
    pub active_flight_mode: usize,
    pub mode_name: &'static str,
    pub pid_integral: [f32; 3],
    pub release_state: ReleaseState,
    /// Last validated RC pulse (µs)
    pub last_rc_pulse: u16,
    /// Attitude came from the real sensor
    pub sensor_valid: bool,
    /// Configured loop rate
    pub loop_frequency_hz: u32,
    /// Loop rate measured from tick start times
    pub measured_frequency_hz: u32,
    pub system_active: bool,
    pub loop_count: u32,
    pub attitude: AttitudeSample,
    pub capabilities: Capabilities,
}

/// Everything that happened in one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Tick number, starting at 1
    pub loop_count: u32,
    pub events: ButtonEvents,
    pub attitude: AttitudeSample,
    /// Command sent to the control surfaces while active
    pub command: Option<ServoCommand>,
    pub transition: Option<ReleaseTransition>,
    /// Failure that forced the surfaces to neutral
    pub error: Option<TickError>,
    /// Present on telemetry ticks
    pub status: Option<StatusSnapshot>,
    /// Startup self-test phase run instead of the control step
    pub self_test: Option<SelfTestPhase>,
}

impl TickReport {
    pub(crate) fn new(loop_count: u32) -> Self {
        Self {
            loop_count,
            events: ButtonEvents::default(),
            attitude: AttitudeSample::default(),
            command: None,
            transition: None,
            error: None,
            status: None,
            self_test: None,
        }
    }
}
