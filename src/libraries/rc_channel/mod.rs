//! RC release channel input
//!
//! Turns the receiver's release channel into a validated pulse width in
//! microseconds. Two sources implement [`RcPulseSource`]:
//!
//! - [`PulseWidthDecoder`]: measures the pulse inside the tick by polling
//!   the pin, bounded by iteration limits. Works on any GPIO.
//! - [`CapturedPulseSource`]: reads the latest width published by an edge
//!   interrupt through [`PulseCapture`]. Never blocks.
//!
//! Both return the neutral pulse whenever no trustworthy measurement exists.

use crate::platform::traits::{GpioInterface, TimerInterface};
use glider_core::parameters::{GliderConfig, SafetyLimits};
use glider_core::rc::{validate_pulse, PulseCapture};

/// RC measurement errors
///
/// These never leave the decoder; they are logged and answered with the
/// neutral pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RcError {
    /// No rising edge within the polling budget
    Timeout,
    /// The delay timer failed
    Timer,
}

impl RcError {
    pub const fn as_str(&self) -> &'static str {
        match self {
            RcError::Timeout => "RC timeout",
            RcError::Timer => "RC timer error",
        }
    }
}

impl core::fmt::Display for RcError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// RC connection status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RcStatus {
    /// Recent valid pulse
    Active,
    /// No usable pulse within the timeout
    Lost,
    /// No pulse seen since startup
    NeverConnected,
}

/// Source of the release channel pulse width
pub trait RcPulseSource {
    /// Pulse width in microseconds for the tick at `now_ms`
    ///
    /// Always within `[rc_min_pulse, rc_max_pulse]` or equal to
    /// `rc_neutral_pulse`.
    fn read_pulse(&mut self, now_ms: u64) -> u16;

    /// Value returned by the last `read_pulse`
    fn last_pulse(&self) -> u16;

    fn status(&self) -> RcStatus;
}

/// Polling pulse width decoder
///
/// A fresh measurement is taken at most once per `read_interval_ms`; calls
/// in between return the cached value. A measurement waits for the rising
/// edge for at most `sensor_timeout` polls of 1 µs, then times the high
/// phase for at most `rc_timeout` polls.
pub struct PulseWidthDecoder<I: GpioInterface, T: TimerInterface> {
    pin: I,
    timer: T,
    limits: SafetyLimits,
    read_interval_ms: u32,
    last_pulse: u16,
    last_read_ms: Option<u64>,
    status: RcStatus,
    timeouts: u32,
}

impl<I: GpioInterface, T: TimerInterface> PulseWidthDecoder<I, T> {
    pub fn new(pin: I, timer: T, limits: SafetyLimits, read_interval_ms: u32) -> Self {
        Self {
            pin,
            timer,
            last_pulse: limits.rc_neutral_pulse,
            limits,
            read_interval_ms,
            last_read_ms: None,
            status: RcStatus::NeverConnected,
            timeouts: 0,
        }
    }

    /// Decoder using the configured pulse limits and read interval
    pub fn from_config(pin: I, timer: T, config: &GliderConfig) -> Self {
        Self::new(pin, timer, config.limits, config.system.rc_read_interval_ms)
    }

    /// Measure one high pulse in microseconds
    ///
    /// The high phase is cut short after `rc_timeout` polls; the returned
    /// width is then whatever elapsed, which validation rejects as too long.
    pub fn measure(&mut self) -> Result<u32, RcError> {
        let mut polls = 0u32;
        while !self.pin.read() {
            if polls >= self.limits.sensor_timeout {
                return Err(RcError::Timeout);
            }
            self.timer.delay_us(1).map_err(|_| RcError::Timer)?;
            polls += 1;
        }

        let start_us = self.timer.now_us();
        let mut polls = 0u32;
        while self.pin.read() {
            if polls >= self.limits.rc_timeout {
                break;
            }
            self.timer.delay_us(1).map_err(|_| RcError::Timer)?;
            polls += 1;
        }

        let width = self.timer.now_us().saturating_sub(start_us);
        Ok(u32::try_from(width).unwrap_or(u32::MAX))
    }

    /// Number of measurements that found no pulse
    pub fn timeouts(&self) -> u32 {
        self.timeouts
    }
}

impl<I: GpioInterface, T: TimerInterface> RcPulseSource for PulseWidthDecoder<I, T> {
    fn read_pulse(&mut self, now_ms: u64) -> u16 {
        if let Some(last) = self.last_read_ms {
            if now_ms.saturating_sub(last) < u64::from(self.read_interval_ms) {
                return self.last_pulse;
            }
        }
        self.last_read_ms = Some(now_ms);

        self.last_pulse = match self.measure() {
            Ok(width) => {
                let pulse = validate_pulse(width, &self.limits);
                self.status = if pulse == self.limits.rc_neutral_pulse
                    && width != u32::from(pulse)
                {
                    crate::log_debug!("RC pulse {} us out of range", width);
                    RcStatus::Lost
                } else {
                    RcStatus::Active
                };
                pulse
            }
            Err(e) => {
                self.timeouts = self.timeouts.saturating_add(1);
                crate::log_debug!("{}", e.as_str());
                self.status = RcStatus::Lost;
                self.limits.rc_neutral_pulse
            }
        };
        self.last_pulse
    }

    fn last_pulse(&self) -> u16 {
        self.last_pulse
    }

    fn status(&self) -> RcStatus {
        self.status
    }
}

/// Pulse width source fed by an edge interrupt
///
/// The slot counts as stale when nothing new was published for
/// `signal_timeout_ms`; a stale or never-written slot reads as neutral.
pub struct CapturedPulseSource<'a> {
    capture: &'a PulseCapture,
    limits: SafetyLimits,
    signal_timeout_ms: u32,
    last_sequence: u32,
    last_update_ms: Option<u64>,
    last_pulse: u16,
    status: RcStatus,
}

impl<'a> CapturedPulseSource<'a> {
    pub fn new(capture: &'a PulseCapture, limits: SafetyLimits, signal_timeout_ms: u32) -> Self {
        Self {
            capture,
            last_pulse: limits.rc_neutral_pulse,
            limits,
            signal_timeout_ms,
            last_sequence: 0,
            last_update_ms: None,
            status: RcStatus::NeverConnected,
        }
    }

    /// Source using the configured pulse limits and signal timeout
    pub fn from_config(capture: &'a PulseCapture, config: &GliderConfig) -> Self {
        Self::new(capture, config.limits, config.system.rc_signal_timeout_ms)
    }
}

impl<'a> RcPulseSource for CapturedPulseSource<'a> {
    fn read_pulse(&mut self, now_ms: u64) -> u16 {
        let reading = self.capture.slot().latest();

        if reading.sequence != 0 && reading.sequence != self.last_sequence {
            self.last_sequence = reading.sequence;
            self.last_update_ms = Some(now_ms);
            self.last_pulse = validate_pulse(u32::from(reading.width_us), &self.limits);
            self.status = RcStatus::Active;
            return self.last_pulse;
        }

        if let Some(last) = self.last_update_ms {
            if now_ms.saturating_sub(last) > u64::from(self.signal_timeout_ms)
                && self.status == RcStatus::Active
            {
                crate::log_warn!("RC signal lost");
                self.status = RcStatus::Lost;
                self.last_pulse = self.limits.rc_neutral_pulse;
            }
        }
        self.last_pulse
    }

    fn last_pulse(&self) -> u16 {
        self.last_pulse
    }

    fn status(&self) -> RcStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{MockGpio, MockTimer};

    fn decoder() -> (PulseWidthDecoder<MockGpio, MockTimer>, MockGpio) {
        let pin = MockGpio::new_input();
        let decoder =
            PulseWidthDecoder::from_config(pin.clone(), MockTimer::new(), &GliderConfig::default());
        (decoder, pin)
    }

    #[test]
    fn test_measures_valid_pulse() {
        let (mut decoder, pin) = decoder();
        // The first high read ends the wait for the edge, so 1801 high reads
        // span 1800 polls
        pin.set_input_sequence(&[(false, 40), (true, 1801), (false, 1)]);

        assert_eq!(decoder.read_pulse(0), 1800);
        assert_eq!(decoder.status(), RcStatus::Active);
    }

    #[test]
    fn test_overlong_pulse_is_neutral() {
        let (mut decoder, pin) = decoder();
        pin.set_input_sequence(&[(false, 5), (true, 3001), (false, 1)]);

        assert_eq!(decoder.measure(), Ok(3000));

        pin.set_input_sequence(&[(false, 5), (true, 3001), (false, 1)]);
        assert_eq!(decoder.read_pulse(0), 1500);
        assert_eq!(decoder.status(), RcStatus::Lost);
    }

    #[test]
    fn test_stuck_high_stops_at_rc_timeout() {
        let (mut decoder, pin) = decoder();
        pin.set_input_state(true);

        assert_eq!(decoder.measure(), Ok(3000));
        // One read ends the edge wait, then rc_timeout polls plus the read
        // that hits the limit
        assert_eq!(pin.read_count(), 3002);
    }

    #[test]
    fn test_no_edge_times_out_to_neutral() {
        let (mut decoder, pin) = decoder();
        pin.set_input_state(false);

        assert_eq!(decoder.measure(), Err(RcError::Timeout));
        assert_eq!(pin.read_count(), 10_001);

        assert_eq!(decoder.read_pulse(0), 1500);
        assert_eq!(decoder.timeouts(), 1);
    }

    #[test]
    fn test_rate_limited_reads_return_cache() {
        let (mut decoder, pin) = decoder();
        assert_eq!(decoder.last_pulse(), 1500);

        pin.set_input_sequence(&[(false, 1), (true, 1901), (false, 1)]);
        assert_eq!(decoder.read_pulse(1_000), 1900);
        let reads = pin.read_count();

        // Inside the interval: no pin access
        assert_eq!(decoder.read_pulse(1_020), 1900);
        assert_eq!(decoder.read_pulse(1_049), 1900);
        assert_eq!(pin.read_count(), reads);

        pin.set_input_sequence(&[(false, 1), (true, 1201), (false, 1)]);
        assert_eq!(decoder.read_pulse(1_050), 1200);
    }

    #[test]
    fn test_captured_source_latest_wins() {
        let capture = PulseCapture::new();
        let mut source = CapturedPulseSource::new(&capture, SafetyLimits::default(), 500);
        assert_eq!(source.read_pulse(0), 1500);
        assert_eq!(source.status(), RcStatus::NeverConnected);

        capture.on_rising(10_000);
        capture.on_falling(11_100);
        capture.on_rising(30_000);
        capture.on_falling(31_800);

        assert_eq!(source.read_pulse(20), 1800);
        assert_eq!(source.status(), RcStatus::Active);
    }

    #[test]
    fn test_captured_source_rejects_out_of_range() {
        let capture = PulseCapture::new();
        let mut source = CapturedPulseSource::new(&capture, SafetyLimits::default(), 500);

        capture.on_rising(0);
        capture.on_falling(3_000);
        assert_eq!(source.read_pulse(0), 1500);
    }

    #[test]
    fn test_captured_source_goes_stale() {
        let capture = PulseCapture::new();
        let mut source = CapturedPulseSource::new(&capture, SafetyLimits::default(), 500);

        capture.on_rising(0);
        capture.on_falling(1_900);
        assert_eq!(source.read_pulse(100), 1900);
        assert_eq!(source.read_pulse(600), 1900);

        assert_eq!(source.read_pulse(601), 1500);
        assert_eq!(source.status(), RcStatus::Lost);

        capture.on_rising(700_000);
        capture.on_falling(701_750);
        assert_eq!(source.read_pulse(700), 1750);
        assert_eq!(source.status(), RcStatus::Active);
    }

    #[test]
    fn test_read_interval_comes_from_config() {
        let mut config = GliderConfig::default();
        config.system.rc_read_interval_ms = 200;
        let pin = MockGpio::new_input();
        let mut decoder = PulseWidthDecoder::from_config(pin.clone(), MockTimer::new(), &config);

        pin.set_input_sequence(&[(false, 1), (true, 1901), (false, 1)]);
        assert_eq!(decoder.read_pulse(1_000), 1900);
        let reads = pin.read_count();

        // 100 ms is fresh under the default but cached under 200 ms
        pin.set_input_sequence(&[(false, 1), (true, 1201), (false, 1)]);
        assert_eq!(decoder.read_pulse(1_100), 1900);
        assert_eq!(pin.read_count(), reads);
        assert_eq!(decoder.read_pulse(1_200), 1200);
    }

    #[test]
    fn test_signal_timeout_comes_from_config() {
        let mut config = GliderConfig::default();
        config.system.rc_signal_timeout_ms = 100;
        let capture = PulseCapture::new();
        let mut source = CapturedPulseSource::from_config(&capture, &config);

        capture.on_rising(0);
        capture.on_falling(1_900);
        assert_eq!(source.read_pulse(0), 1900);
        assert_eq!(source.read_pulse(100), 1900);
        assert_eq!(source.read_pulse(101), 1500);
        assert_eq!(source.status(), RcStatus::Lost);
    }
}
