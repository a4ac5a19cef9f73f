//! Attitude Source
//!
//! Produces one [`AttitudeSample`] per control tick and never fails. While
//! the motion sensor works, samples come from its accelerometer and gyro and
//! carry `valid = true`. When the sensor is missing at startup or a read
//! fails, the source switches to [`SimulatedMotion`] and reports
//! `valid = false`.
//!
//! ## Fallback policy
//!
//! ```text
//!   probe ok                  read error / probe failed
//!  ┌────────┐   ────────────────────────────────────▶  ┌───────────┐
//!  │  Real  │                                          │ Simulated │
//!  └────────┘   ◀──────────── ReprobeEvery only ─────  └───────────┘
//! ```
//!
//! [`FallbackPolicy::Sticky`] (the default) never leaves simulation once it
//! has been entered. [`FallbackPolicy::ReprobeEvery`] probes the sensor again
//! at a fixed interval and returns to real data when it answers.

use crate::devices::traits::AttitudeSensor;
use glider_core::attitude::{AttitudeSample, SimulatedMotion};

/// What to do after switching to simulated data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FallbackPolicy {
    /// Stay on simulated data for the rest of the session
    #[default]
    Sticky,
    /// Probe the sensor again every `n` milliseconds
    ReprobeEvery(u32),
}

/// Sensor-backed attitude with simulated fallback
pub struct AttitudeSource<S: AttitudeSensor> {
    sensor: Option<S>,
    policy: FallbackPolicy,
    detected: bool,
    simulation: Option<SimulatedMotion>,
    last_probe_ms: u64,
    fallback_count: u32,
}

impl<S: AttitudeSensor> AttitudeSource<S> {
    /// Probe the sensor and pick the initial data path
    ///
    /// A `None` sensor behaves like one whose probe failed.
    pub fn new(sensor: Option<S>, policy: FallbackPolicy, now_ms: u64) -> Self {
        let mut source = Self {
            sensor,
            policy,
            detected: false,
            simulation: None,
            last_probe_ms: now_ms,
            fallback_count: 0,
        };

        source.detected = source.sensor.as_mut().is_some_and(|s| s.probe());
        if source.detected {
            crate::log_info!("Attitude source: {}", source.source_name());
        } else {
            crate::log_warn!("Motion sensor not detected, using simulated attitude");
            source.enter_simulation(now_ms);
        }
        source
    }

    /// Attitude at `now_ms`
    pub fn sample(&mut self, now_ms: u64) -> AttitudeSample {
        if self.simulation.is_some() {
            self.maybe_reprobe(now_ms);
        }

        if let Some(simulation) = self.simulation {
            return simulation.sample(now_ms);
        }

        let read = match self.sensor.as_mut() {
            Some(sensor) => sensor.read_raw(),
            None => {
                self.enter_simulation(now_ms);
                return self.simulated(now_ms);
            }
        };

        match read {
            Ok(raw) => AttitudeSample::from(&raw),
            Err(e) => {
                crate::log_warn!("Attitude read failed ({}), using simulated attitude", e.as_str());
                self.enter_simulation(now_ms);
                self.simulated(now_ms)
            }
        }
    }

    /// Probe result at startup
    pub fn sensor_detected(&self) -> bool {
        self.detected
    }

    pub fn using_real_sensor(&self) -> bool {
        self.simulation.is_none()
    }

    /// Name of the active data path
    pub fn source_name(&self) -> &'static str {
        match (&self.sensor, self.simulation) {
            (Some(sensor), None) => sensor.name(),
            _ => "simulated",
        }
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    /// Number of switches to simulated data
    pub fn fallback_count(&self) -> u32 {
        self.fallback_count
    }

    fn enter_simulation(&mut self, now_ms: u64) {
        self.simulation = Some(SimulatedMotion::starting_at(now_ms));
        self.last_probe_ms = now_ms;
        self.fallback_count = self.fallback_count.saturating_add(1);
    }

    fn simulated(&self, now_ms: u64) -> AttitudeSample {
        match self.simulation {
            Some(simulation) => simulation.sample(now_ms),
            None => SimulatedMotion::starting_at(now_ms).sample(now_ms),
        }
    }

    fn maybe_reprobe(&mut self, now_ms: u64) {
        let FallbackPolicy::ReprobeEvery(interval_ms) = self.policy else {
            return;
        };
        if now_ms.saturating_sub(self.last_probe_ms) < u64::from(interval_ms) {
            return;
        }
        self.last_probe_ms = now_ms;

        if let Some(sensor) = self.sensor.as_mut() {
            if sensor.probe() {
                crate::log_info!("Motion sensor recovered, using {}", sensor.name());
                self.simulation = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::imu::MockAttitudeSensor;
    use crate::devices::traits::AttitudeSensorError;
    use glider_core::attitude::RawMotion;

    #[test]
    fn test_real_sensor_samples_are_valid() {
        let sensor = MockAttitudeSensor::present();
        // 30 deg right roll: ay = sin(30), az = cos(30)
        sensor.set_reading(RawMotion::new(0, 8192, 14189, 262));
        let mut source = AttitudeSource::new(Some(sensor), FallbackPolicy::Sticky, 0);

        let sample = source.sample(20);
        assert!(sample.valid);
        assert!((sample.roll - 30.0).abs() < 0.1);
        assert!(sample.pitch.abs() < 0.01);
        assert!((sample.yaw_rate - 2.0).abs() < 1e-3);
        assert!(source.sensor_detected());
        assert!(source.using_real_sensor());
        assert_eq!(source.source_name(), "mock");
    }

    #[test]
    fn test_missing_sensor_is_simulated() {
        let mut source: AttitudeSource<MockAttitudeSensor> =
            AttitudeSource::new(None, FallbackPolicy::Sticky, 0);

        assert!(!source.sensor_detected());
        assert!(!source.using_real_sensor());
        assert_eq!(source.source_name(), "simulated");
        assert!(!source.sample(0).valid);
    }

    #[test]
    fn test_failed_probe_falls_back_for_whole_session() {
        let sensor = MockAttitudeSensor::absent();
        let handle = sensor.clone();
        let mut source = AttitudeSource::new(Some(sensor), FallbackPolicy::Sticky, 0);

        // The sensor starts answering later; the sticky policy ignores it
        handle.set_present(true);
        for step in 0..500u64 {
            let sample = source.sample(step * 20);
            assert!(!sample.valid);
            assert!(sample.is_finite());
        }
        assert_eq!(handle.probe_count(), 1);
        assert_eq!(handle.read_count(), 0);
    }

    #[test]
    fn test_read_error_switches_permanently() {
        let sensor = MockAttitudeSensor::present();
        let handle = sensor.clone();
        let mut source = AttitudeSource::new(Some(sensor), FallbackPolicy::Sticky, 0);

        assert!(source.sample(0).valid);
        handle.push_result(Err(AttitudeSensorError::ReadFailed));

        let switched = source.sample(20);
        assert!(!switched.valid);
        assert!(!source.using_real_sensor());
        assert!(source.sensor_detected());

        for step in 2..100u64 {
            assert!(!source.sample(step * 20).valid);
        }
        assert_eq!(handle.read_count(), 2);
        assert_eq!(source.fallback_count(), 1);
    }

    #[test]
    fn test_simulation_starts_at_switch_time() {
        let sensor = MockAttitudeSensor::present();
        sensor.push_result(Ok(RawMotion::new(0, 0, 16384, 0)));
        sensor.push_result(Err(AttitudeSensorError::ReadFailed));
        let mut source = AttitudeSource::new(Some(sensor), FallbackPolicy::Sticky, 0);

        source.sample(0);
        let switched = source.sample(7_000);
        assert_eq!(switched, SimulatedMotion::starting_at(7_000).sample(7_000));
    }

    #[test]
    fn test_reprobe_policy_recovers() {
        let sensor = MockAttitudeSensor::absent();
        let handle = sensor.clone();
        let mut source =
            AttitudeSource::new(Some(sensor), FallbackPolicy::ReprobeEvery(1_000), 0);

        assert!(!source.sample(500).valid);
        assert!(!source.sample(1_000).valid);
        assert_eq!(handle.probe_count(), 2);

        handle.set_present(true);
        assert!(!source.sample(1_500).valid);
        assert!(source.sample(2_000).valid);
        assert!(source.using_real_sensor());
        assert_eq!(handle.probe_count(), 3);
    }
}
