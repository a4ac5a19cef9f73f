//! System timing and hardware parameters

/// Loop rate, telemetry cadence and hardware frequencies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemParams {
    /// Control loop rate (Hz)
    pub main_loop_frequency_hz: u32,
    /// Interval between telemetry snapshots
    pub telemetry_interval_ms: u32,
    /// Minimum interval between fresh RC measurements
    pub rc_read_interval_ms: u32,
    /// Minimum interval between accepted button presses
    pub button_debounce_ms: u32,
    /// Slot length of the fast blink pattern
    pub led_blink_fast_ms: u32,
    /// Slot length of the slow blink pattern
    pub led_blink_slow_ms: u32,
    /// Servo PWM frequency (Hz)
    pub servo_frequency_hz: u32,
    /// Sensor bus clock (Hz)
    pub i2c_frequency_hz: u32,
    /// Age after which an interrupt-captured RC pulse is treated as lost
    pub rc_signal_timeout_ms: u32,
    /// Run the startup self-test before the first control tick
    pub startup_self_test: bool,
}

impl Default for SystemParams {
    fn default() -> Self {
        Self {
            main_loop_frequency_hz: 50,
            telemetry_interval_ms: 3000,
            rc_read_interval_ms: 50,
            button_debounce_ms: 300,
            led_blink_fast_ms: 200,
            led_blink_slow_ms: 1000,
            servo_frequency_hz: 50,
            i2c_frequency_hz: 400_000,
            rc_signal_timeout_ms: 500,
            startup_self_test: true,
        }
    }
}

impl SystemParams {
    /// Loop period in milliseconds
    pub const fn loop_period_ms(&self) -> u32 {
        1000 / self.frequency()
    }

    /// Loop period in microseconds
    pub const fn loop_period_us(&self) -> u32 {
        1_000_000 / self.frequency()
    }

    /// Loop period in seconds, used as `dt` before two ticks have been timed
    pub fn loop_period_s(&self) -> f32 {
        1.0 / self.frequency() as f32
    }

    /// Number of ticks between telemetry snapshots (at least one)
    pub fn telemetry_every_ticks(&self) -> u32 {
        let ticks = u64::from(self.telemetry_interval_ms) * u64::from(self.frequency()) / 1000;
        (ticks as u32).max(1)
    }

    // Zero is rejected by validation; never divide by it regardless
    const fn frequency(&self) -> u32 {
        if self.main_loop_frequency_hz == 0 {
            1
        } else {
            self.main_loop_frequency_hz
        }
    }

    pub fn is_valid(&self) -> bool {
        (1..=1000).contains(&self.main_loop_frequency_hz)
            && self.telemetry_interval_ms > 0
            && self.led_blink_fast_ms > 0
            && self.led_blink_slow_ms > 0
            && self.servo_frequency_hz > 0
            && self.i2c_frequency_hz > 0
            && self.rc_signal_timeout_ms > 0
    }
}
