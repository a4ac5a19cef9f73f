//! Status LED patterns
//!
//! Every pattern is a pure function of the current time so the control loop
//! can refresh the LEDs once per tick without sleeping. Alert pulses that
//! would otherwise block are modelled by [`AlertSequence`].
//!
//! | LED            | Pattern                                              |
//! |----------------|------------------------------------------------------|
//! | System active  | On while stabilization is active                     |
//! | Mode           | `mode + 1` fast blinks, then two dark slots          |
//! | Release        | Locked on, Armed fast blink, Releasing off, Released slow blink |
//! | Alert          | Burst of 100 ms pulses after emergency or deactivation |

use crate::release::ReleaseState;

/// Length of one alert pulse half-period
pub const ALERT_PULSE_MS: u64 = 100;

/// Pulses shown after an emergency release
pub const EMERGENCY_ALERT_PULSES: u8 = 5;

/// Pulses shown after stabilization is switched off
pub const DEACTIVATE_ALERT_PULSES: u8 = 3;

/// Status LEDs known to the system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    SystemActive,
    Mode,
    Release,
    Alert,
}

impl Indicator {
    pub const ALL: [Indicator; 4] = [
        Indicator::SystemActive,
        Indicator::Mode,
        Indicator::Release,
        Indicator::Alert,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Indicator::SystemActive => "system",
            Indicator::Mode => "mode",
            Indicator::Release => "release",
            Indicator::Alert => "alert",
        }
    }
}

/// Blink slot lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkTiming {
    pub fast_ms: u32,
    pub slow_ms: u32,
}

impl Default for BlinkTiming {
    fn default() -> Self {
        Self {
            fast_ms: 200,
            slow_ms: 1000,
        }
    }
}

/// Desired level of every LED for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndicatorFrame {
    pub system_active: bool,
    pub mode: bool,
    pub release: bool,
    pub alert: bool,
}

impl IndicatorFrame {
    /// Compute the frame for the current system state
    pub fn compute(
        active: bool,
        mode_index: usize,
        release: ReleaseState,
        alert: &AlertSequence,
        timing: BlinkTiming,
        now_ms: u64,
    ) -> Self {
        Self {
            system_active: active,
            mode: mode_pattern(mode_index, active, timing.fast_ms, now_ms),
            release: release_pattern(release, timing, now_ms),
            alert: alert.level(now_ms),
        }
    }

    /// Every LED at the same level
    pub const fn uniform(on: bool) -> Self {
        Self {
            system_active: on,
            mode: on,
            release: on,
            alert: on,
        }
    }

    /// One LED at `on`, the rest off
    pub fn single(indicator: Indicator, on: bool) -> Self {
        let mut frame = Self::default();
        match indicator {
            Indicator::SystemActive => frame.system_active = on,
            Indicator::Mode => frame.mode = on,
            Indicator::Release => frame.release = on,
            Indicator::Alert => frame.alert = on,
        }
        frame
    }

    pub fn level(&self, indicator: Indicator) -> bool {
        match indicator {
            Indicator::SystemActive => self.system_active,
            Indicator::Mode => self.mode,
            Indicator::Release => self.release,
            Indicator::Alert => self.alert,
        }
    }
}

fn slot(now_ms: u64, slot_ms: u32) -> u64 {
    now_ms / u64::from(slot_ms.max(1))
}

/// Mode LED level: `mode_index + 1` blinks per cycle of `mode_index + 3` slots
pub fn mode_pattern(mode_index: usize, active: bool, fast_ms: u32, now_ms: u64) -> bool {
    if !active {
        return false;
    }
    let blinks = mode_index as u64 + 1;
    slot(now_ms, fast_ms) % (blinks + 2) < blinks
}

/// Release LED level for a release state
pub fn release_pattern(state: ReleaseState, timing: BlinkTiming, now_ms: u64) -> bool {
    match state {
        ReleaseState::Locked => true,
        ReleaseState::Armed => slot(now_ms, timing.fast_ms) % 2 == 1,
        ReleaseState::Releasing => false,
        ReleaseState::Released => slot(now_ms, timing.slow_ms) % 2 == 1,
    }
}

/// Non-blocking burst of alert pulses
///
/// Each pulse is [`ALERT_PULSE_MS`] on followed by the same time off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlertSequence {
    started_at_ms: u64,
    pulses: u8,
}

impl AlertSequence {
    /// Start a burst of `pulses`, replacing any burst in progress
    pub fn start(&mut self, pulses: u8, now_ms: u64) {
        self.started_at_ms = now_ms;
        self.pulses = pulses;
    }

    pub fn cancel(&mut self) {
        self.pulses = 0;
    }

    /// Alert LED level at `now_ms`
    pub fn level(&self, now_ms: u64) -> bool {
        match self.half_period(now_ms) {
            Some(half) => half % 2 == 0,
            None => false,
        }
    }

    pub fn is_running(&self, now_ms: u64) -> bool {
        self.half_period(now_ms).is_some()
    }

    fn half_period(&self, now_ms: u64) -> Option<u64> {
        let half = now_ms.saturating_sub(self.started_at_ms) / ALERT_PULSE_MS;
        (half < 2 * u64::from(self.pulses)).then_some(half)
    }
}
