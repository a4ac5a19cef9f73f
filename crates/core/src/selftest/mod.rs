//! Startup self-test timeline
//!
//! After power-up the glider exercises every subsystem that came up and
//! then shows the result on the status LEDs. The whole sequence is a pure
//! function of the time since it started, so the control loop steps through
//! it one tick at a time instead of sleeping.
//!
//! | Phase           | Runs when                  | Timeline                                          |
//! |-----------------|----------------------------|---------------------------------------------------|
//! | Indicators      | LEDs fitted                | each LED 300 ms on / 100 ms off, then 3 quick chases |
//! | Release servo   | release servo answered     | locked 1 s, release 1 s, locked 0.5 s             |
//! | Attitude sensor | sensor probed              | 5 readings, 200 ms apart                          |
//! | Control servos  | surfaces centered          | all at -30/+30/0 deg for 0.8 s, then each servo alone |
//! | Result          | LEDs fitted                | see [`StartupOutcome`]                            |

use crate::indicator::{Indicator, IndicatorFrame};
use crate::parameters::{ReleaseParams, SafetyLimits};
use crate::stabilizer::ServoCommand;

/// Number of subsystems checked at startup
pub const SELF_TEST_SUBSYSTEMS: u8 = 4;

/// Sensor readings taken during the sensor phase
pub const SENSOR_TEST_READINGS: u8 = 5;

const LED_ON_MS: u64 = 300;
const LED_OFF_MS: u64 = 100;
const LED_CHASE_ROUNDS: u64 = 3;
const LED_CHASE_ON_MS: u64 = 100;
const LED_CHASE_OFF_MS: u64 = 50;

const RELEASE_LOCKED_MS: u64 = 1000;
const RELEASE_OPEN_MS: u64 = 1000;
const RELEASE_RELOCK_MS: u64 = 500;

const SENSOR_READING_MS: u64 = 200;

const SWEEP_OFFSETS: [i16; 3] = [-30, 30, 0];
const SWEEP_STEP_MS: u64 = 800;
const SINGLE_OFFSETS: [(i16, u64); 3] = [(-45, 300), (45, 300), (0, 200)];
const SINGLE_SERVO_MS: u64 = 800;

const CELEBRATE_CYCLES: u64 = 5;
const CELEBRATE_HALF_MS: u64 = 100;
const PARTIAL_HALF_MS: u64 = 200;
const FAILED_PULSES: u64 = 10;
const FAILED_HALF_MS: u64 = 100;

/// Subsystems that came up during initialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelfTestChecks {
    pub indicators: bool,
    pub release_servo: bool,
    pub attitude_sensor: bool,
    pub control_servos: bool,
}

impl SelfTestChecks {
    /// Number of subsystems that passed, out of [`SELF_TEST_SUBSYSTEMS`]
    pub fn passed(&self) -> u8 {
        [
            self.indicators,
            self.release_servo,
            self.attitude_sensor,
            self.control_servos,
        ]
        .iter()
        .filter(|ok| **ok)
        .count() as u8
    }

    pub fn outcome(&self) -> StartupOutcome {
        match self.passed() {
            SELF_TEST_SUBSYSTEMS => StartupOutcome::Complete,
            n if n >= 2 => StartupOutcome::Partial,
            _ => StartupOutcome::Failed,
        }
    }
}

/// Overall startup result
///
/// - `Complete`: every LED flashes together 5 times
/// - `Partial`: system LED on, alert LED blinks once per passed subsystem
/// - `Failed`: alert LED flashes quickly 10 times
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupOutcome {
    Complete,
    Partial,
    Failed,
}

impl StartupOutcome {
    pub const fn as_str(&self) -> &'static str {
        match self {
            StartupOutcome::Complete => "COMPLETE",
            StartupOutcome::Partial => "PARTIAL",
            StartupOutcome::Failed => "FAILED",
        }
    }
}

/// Part of the self-test currently running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfTestPhase {
    Indicators,
    ReleaseServo,
    AttitudeSensor,
    ControlServos,
    Result,
}

impl SelfTestPhase {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SelfTestPhase::Indicators => "leds",
            SelfTestPhase::ReleaseServo => "release servo",
            SelfTestPhase::AttitudeSensor => "sensor",
            SelfTestPhase::ControlServos => "servos",
            SelfTestPhase::Result => "result",
        }
    }
}

/// Outputs requested by the self-test for one tick
///
/// `None` leaves an output alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelfTestStep {
    pub phase: SelfTestPhase,
    pub leds: Option<IndicatorFrame>,
    pub surfaces: Option<ServoCommand>,
    pub release_angle: Option<i16>,
    /// Index of the sensor reading due in this slot
    pub sensor_reading: Option<u8>,
}

impl SelfTestStep {
    const fn idle(phase: SelfTestPhase) -> Self {
        Self {
            phase,
            leds: None,
            surfaces: None,
            release_angle: None,
            sensor_reading: None,
        }
    }
}

/// Startup self-test sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartupSelfTest {
    checks: SelfTestChecks,
    started_ms: u64,
    locked_angle: i16,
    release_angle: i16,
    neutral_angle: i16,
}

impl StartupSelfTest {
    /// Sequence for `checks`, starting at `started_ms`
    pub fn new(
        checks: SelfTestChecks,
        release: &ReleaseParams,
        limits: &SafetyLimits,
        started_ms: u64,
    ) -> Self {
        Self {
            checks,
            started_ms,
            locked_angle: release.locked_angle,
            release_angle: release.release_angle,
            neutral_angle: limits.servo_neutral_angle,
        }
    }

    pub fn checks(&self) -> SelfTestChecks {
        self.checks
    }

    pub fn outcome(&self) -> StartupOutcome {
        self.checks.outcome()
    }

    /// Total length of the sequence
    pub fn duration_ms(&self) -> u64 {
        self.phases().iter().flatten().map(|(_, len)| len).sum()
    }

    pub fn is_finished(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.started_ms) >= self.duration_ms()
    }

    /// Outputs for `now_ms`, or `None` once the sequence is over
    pub fn step(&self, now_ms: u64) -> Option<SelfTestStep> {
        let mut t = now_ms.saturating_sub(self.started_ms);
        for (phase, len) in self.phases().into_iter().flatten() {
            if t < len {
                return Some(self.phase_step(phase, t));
            }
            t -= len;
        }
        None
    }

    fn phases(&self) -> [Option<(SelfTestPhase, u64)>; 5] {
        let c = self.checks;
        let led_sweep = Indicator::ALL.len() as u64 * (LED_ON_MS + LED_OFF_MS)
            + LED_CHASE_ROUNDS
                * Indicator::ALL.len() as u64
                * (LED_CHASE_ON_MS + LED_CHASE_OFF_MS);
        let servos = SWEEP_OFFSETS.len() as u64 * SWEEP_STEP_MS + 4 * SINGLE_SERVO_MS;
        [
            c.indicators.then_some((SelfTestPhase::Indicators, led_sweep)),
            c.release_servo.then_some((
                SelfTestPhase::ReleaseServo,
                RELEASE_LOCKED_MS + RELEASE_OPEN_MS + RELEASE_RELOCK_MS,
            )),
            c.attitude_sensor.then_some((
                SelfTestPhase::AttitudeSensor,
                u64::from(SENSOR_TEST_READINGS) * SENSOR_READING_MS,
            )),
            c.control_servos
                .then_some((SelfTestPhase::ControlServos, servos)),
            c.indicators
                .then_some((SelfTestPhase::Result, self.result_duration_ms())),
        ]
    }

    fn result_duration_ms(&self) -> u64 {
        match self.outcome() {
            StartupOutcome::Complete => CELEBRATE_CYCLES * 2 * CELEBRATE_HALF_MS,
            StartupOutcome::Partial => u64::from(self.checks.passed()) * 2 * PARTIAL_HALF_MS,
            StartupOutcome::Failed => FAILED_PULSES * 2 * FAILED_HALF_MS,
        }
    }

    fn phase_step(&self, phase: SelfTestPhase, t: u64) -> SelfTestStep {
        let mut step = SelfTestStep::idle(phase);
        match phase {
            SelfTestPhase::Indicators => step.leds = Some(led_sweep(t)),
            SelfTestPhase::ReleaseServo => {
                step.release_angle = Some(if (RELEASE_LOCKED_MS
                    ..RELEASE_LOCKED_MS + RELEASE_OPEN_MS)
                    .contains(&t)
                {
                    self.release_angle
                } else {
                    self.locked_angle
                });
            }
            SelfTestPhase::AttitudeSensor => {
                step.sensor_reading = Some((t / SENSOR_READING_MS) as u8);
            }
            SelfTestPhase::ControlServos => step.surfaces = Some(self.servo_sweep(t)),
            SelfTestPhase::Result => step.leds = Some(self.result_frame(t)),
        }
        step
    }

    fn servo_sweep(&self, t: u64) -> ServoCommand {
        let n = self.neutral_angle;
        let sweep_ms = SWEEP_OFFSETS.len() as u64 * SWEEP_STEP_MS;
        if t < sweep_ms {
            let offset = SWEEP_OFFSETS[(t / SWEEP_STEP_MS) as usize];
            return uniform(n + offset);
        }

        let t = t - sweep_ms;
        let servo = (t / SINGLE_SERVO_MS) as usize;
        let mut within = t % SINGLE_SERVO_MS;
        let mut offset = 0;
        for (o, len) in SINGLE_OFFSETS {
            if within < len {
                offset = o;
                break;
            }
            within -= len;
        }

        let mut command = uniform(n);
        match servo {
            0 => command.flaps_left = n + offset,
            1 => command.flaps_right = n + offset,
            2 => command.elevator = n + offset,
            _ => command.rudder = n + offset,
        }
        command
    }

    fn result_frame(&self, t: u64) -> IndicatorFrame {
        match self.outcome() {
            StartupOutcome::Complete => {
                IndicatorFrame::uniform((t / CELEBRATE_HALF_MS) % 2 == 0)
            }
            StartupOutcome::Partial => IndicatorFrame {
                system_active: true,
                alert: (t / PARTIAL_HALF_MS) % 2 == 0,
                ..IndicatorFrame::default()
            },
            StartupOutcome::Failed => IndicatorFrame {
                alert: (t / FAILED_HALF_MS) % 2 == 0,
                ..IndicatorFrame::default()
            },
        }
    }
}

fn uniform(angle: i16) -> ServoCommand {
    ServoCommand {
        flaps_left: angle,
        flaps_right: angle,
        elevator: angle,
        rudder: angle,
    }
}

fn led_sweep(t: u64) -> IndicatorFrame {
    let leds = Indicator::ALL.len() as u64;
    let single_ms = leds * (LED_ON_MS + LED_OFF_MS);
    if t < single_ms {
        let index = (t / (LED_ON_MS + LED_OFF_MS)) as usize;
        let lit = t % (LED_ON_MS + LED_OFF_MS) < LED_ON_MS;
        return IndicatorFrame::single(Indicator::ALL[index], lit);
    }

    let t = (t - single_ms) % (leds * (LED_CHASE_ON_MS + LED_CHASE_OFF_MS));
    let index = (t / (LED_CHASE_ON_MS + LED_CHASE_OFF_MS)) as usize;
    let lit = t % (LED_CHASE_ON_MS + LED_CHASE_OFF_MS) < LED_CHASE_ON_MS;
    IndicatorFrame::single(Indicator::ALL[index], lit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_passed() -> SelfTestChecks {
        SelfTestChecks {
            indicators: true,
            release_servo: true,
            attitude_sensor: true,
            control_servos: true,
        }
    }

    fn sequence(checks: SelfTestChecks) -> StartupSelfTest {
        StartupSelfTest::new(checks, &ReleaseParams::default(), &SafetyLimits::default(), 1_000)
    }

    #[test]
    fn test_outcome_from_passed_count() {
        assert_eq!(all_passed().passed(), 4);
        assert_eq!(all_passed().outcome(), StartupOutcome::Complete);

        let partial = SelfTestChecks {
            attitude_sensor: false,
            ..all_passed()
        };
        assert_eq!(partial.passed(), 3);
        assert_eq!(partial.outcome(), StartupOutcome::Partial);

        let failed = SelfTestChecks {
            indicators: true,
            ..SelfTestChecks::default()
        };
        assert_eq!(failed.outcome(), StartupOutcome::Failed);
    }

    #[test]
    fn test_full_sequence_duration() {
        // 3400 leds + 2500 release + 1000 sensor + 5600 servos + 1000 result
        let test = sequence(all_passed());
        assert_eq!(test.duration_ms(), 13_500);
        assert!(!test.is_finished(14_499));
        assert!(test.is_finished(14_500));
        assert!(test.step(14_500).is_none());
    }

    #[test]
    fn test_failed_phases_are_skipped() {
        let test = sequence(SelfTestChecks {
            control_servos: true,
            ..SelfTestChecks::default()
        });
        let first = test.step(1_000).unwrap();
        assert_eq!(first.phase, SelfTestPhase::ControlServos);
        // No LEDs: no result phase either
        assert_eq!(test.duration_ms(), 5_600);
    }

    #[test]
    fn test_led_sweep_lights_one_at_a_time() {
        let test = sequence(all_passed());
        let step = test.step(1_000).unwrap();
        assert_eq!(step.phase, SelfTestPhase::Indicators);
        assert_eq!(step.leds, Some(IndicatorFrame::single(Indicator::SystemActive, true)));

        let gap = test.step(1_350).unwrap().leds.unwrap();
        assert_eq!(gap, IndicatorFrame::default());

        let alert = test.step(1_000 + 3 * 400).unwrap().leds.unwrap();
        assert_eq!(alert, IndicatorFrame::single(Indicator::Alert, true));

        // Chase after the single sweep
        let chase = test.step(1_000 + 1_600 + 150).unwrap().leds.unwrap();
        assert_eq!(chase, IndicatorFrame::single(Indicator::Mode, true));
    }

    #[test]
    fn test_release_servo_cycle() {
        let test = sequence(all_passed());
        let start = 1_000 + 3_400;
        let angle = |t| test.step(start + t).unwrap().release_angle;
        assert_eq!(angle(0), Some(45));
        assert_eq!(angle(999), Some(45));
        assert_eq!(angle(1_000), Some(135));
        assert_eq!(angle(2_000), Some(45));
        assert_eq!(test.step(start + 2_499).unwrap().phase, SelfTestPhase::ReleaseServo);
        assert_eq!(test.step(start + 2_500).unwrap().phase, SelfTestPhase::AttitudeSensor);
    }

    #[test]
    fn test_sensor_readings_indexed() {
        let test = sequence(all_passed());
        let start = 1_000 + 3_400 + 2_500;
        assert_eq!(test.step(start).unwrap().sensor_reading, Some(0));
        assert_eq!(test.step(start + 199).unwrap().sensor_reading, Some(0));
        assert_eq!(test.step(start + 800).unwrap().sensor_reading, Some(4));
    }

    #[test]
    fn test_servo_sweep_then_single_servos() {
        let test = sequence(all_passed());
        let start = 1_000 + 3_400 + 2_500 + 1_000;
        let surfaces = |t: u64| test.step(start + t).unwrap().surfaces.unwrap();

        assert_eq!(surfaces(0), uniform(60));
        assert_eq!(surfaces(800), uniform(120));
        assert_eq!(surfaces(1_600), uniform(90));

        let elevator_low = surfaces(2_400 + 2 * 800);
        assert_eq!(elevator_low.elevator, 45);
        assert_eq!(elevator_low.flaps_left, 90);
        assert_eq!(surfaces(2_400 + 2 * 800 + 300).elevator, 135);
        assert_eq!(surfaces(2_400 + 3 * 800 + 700).rudder, 90);
    }

    #[test]
    fn test_result_patterns() {
        let complete = sequence(all_passed());
        let start = 1_000 + 12_500;
        assert_eq!(complete.step(start).unwrap().leds, Some(IndicatorFrame::uniform(true)));
        assert_eq!(complete.step(start + 100).unwrap().leds, Some(IndicatorFrame::uniform(false)));

        let partial = sequence(SelfTestChecks {
            release_servo: false,
            attitude_sensor: false,
            ..all_passed()
        });
        let start = 1_000 + 3_400 + 5_600;
        let step = partial.step(start).unwrap();
        assert_eq!(step.phase, SelfTestPhase::Result);
        let leds = step.leds.unwrap();
        assert!(leds.system_active && leds.alert && !leds.mode);
        // Two blinks of 400 ms
        assert_eq!(partial.duration_ms(), 3_400 + 5_600 + 800);

        let failed = sequence(SelfTestChecks {
            indicators: true,
            ..SelfTestChecks::default()
        });
        let leds = failed.step(1_000 + 3_400 + 100).unwrap().leds.unwrap();
        assert!(!leds.alert && !leds.system_active);
        assert_eq!(failed.duration_ms(), 3_400 + 2_000);
    }
}
