//! Control Loop Driver
//!
//! Ticks the glider system at a fixed rate on any [`TimerInterface`].
//!
//! ## Responsibilities
//!
//! - Call `GliderSystem::tick` once per period
//! - Sleep `period - elapsed` after each tick, or log an overrun
//! - Stop when the stop flag is set or the tick budget is spent
//! - Always run `GliderSystem::shutdown` on exit
//!
//! ## Usage
//!
//! ```rust,ignore
//! static STOP: AtomicBool = AtomicBool::new(false);
//!
//! let mut control = ControlLoop::new(timer, config.system.main_loop_frequency_hz);
//! let summary = control.run(&mut system, &STOP);
//! ```

use crate::glider::GliderSystem;
use crate::platform::traits::TimerInterface;
use core::sync::atomic::{AtomicBool, Ordering};
use glider_core::scheduler::TaskStats;
use glider_core::traits::TimeSource;

/// Result of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSummary {
    /// Ticks executed
    pub ticks: u32,
    /// Timing statistics at exit
    pub stats: TaskStats,
    /// Shutdown completed without output errors
    pub clean_shutdown: bool,
}

/// Fixed-rate loop driver
pub struct ControlLoop<D: TimerInterface> {
    timer: D,
    period_us: u32,
    overruns: u32,
}

impl<D: TimerInterface> ControlLoop<D> {
    /// Driver sleeping on `timer` at `frequency_hz`
    pub fn new(timer: D, frequency_hz: u32) -> Self {
        Self {
            timer,
            period_us: 1_000_000 / frequency_hz.max(1),
            overruns: 0,
        }
    }

    pub fn period_us(&self) -> u32 {
        self.period_us
    }

    /// Ticks that used the whole period
    pub fn overruns(&self) -> u32 {
        self.overruns
    }

    /// Run until `stop` is set
    pub fn run<T: TimeSource>(
        &mut self,
        system: &mut GliderSystem<'_, T>,
        stop: &AtomicBool,
    ) -> LoopSummary {
        crate::log_info!("Control loop started, period {} us", self.period_us);
        self.drive(system, |_| !stop.load(Ordering::Acquire))
    }

    /// Run exactly `ticks` ticks
    pub fn run_for<T: TimeSource>(
        &mut self,
        system: &mut GliderSystem<'_, T>,
        ticks: u32,
    ) -> LoopSummary {
        self.drive(system, |done| done < ticks)
    }

    fn drive<T: TimeSource>(
        &mut self,
        system: &mut GliderSystem<'_, T>,
        mut keep_going: impl FnMut(u32) -> bool,
    ) -> LoopSummary {
        let mut ticks = 0u32;
        while keep_going(ticks) {
            let start_us = self.timer.now_us();
            system.tick();
            ticks = ticks.saturating_add(1);

            let elapsed_us = self.timer.now_us().saturating_sub(start_us);
            match u64::from(self.period_us).checked_sub(elapsed_us) {
                Some(remaining) if remaining > 0 => {
                    if let Err(e) = self.timer.delay_us(remaining as u32) {
                        crate::log_warn!("Loop sleep failed: {}", e.as_str());
                    }
                }
                _ => {
                    self.overruns = self.overruns.saturating_add(1);
                    crate::log_warn!("Loop overrun: tick took {} us", elapsed_us);
                }
            }
        }

        crate::log_info!("Control loop stopped after {} ticks", ticks);
        let clean_shutdown = match system.shutdown() {
            Ok(()) => true,
            Err(e) => {
                crate::log_error!("Shutdown incomplete: {}", e.as_str());
                false
            }
        };

        LoopSummary {
            ticks,
            stats: *system.stats(),
            clean_shutdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glider::GliderHardware;
    use crate::libraries::{ServoActuators, ServoChannels};
    use crate::platform::mock::{MockPwm, MockTimer};
    use crate::platform::traits::{PwmConfig, PwmInterface};
    use crate::subsystems::FallbackPolicy;
    use glider_core::parameters::{GliderConfig, SafetyLimits};
    use glider_core::release::ReleaseState;

    fn actuators(release: &MockPwm) -> ServoActuators<MockPwm> {
        let pwm = || MockPwm::new(PwmConfig::default());
        ServoActuators::new(
            ServoChannels {
                flaps_left: pwm(),
                flaps_right: pwm(),
                elevator: pwm(),
                rudder: pwm(),
                release: release.clone(),
            },
            SafetyLimits::default(),
            50,
            45,
        )
        .unwrap()
    }

    fn hardware(actuators: &mut ServoActuators<MockPwm>) -> GliderHardware<'_> {
        GliderHardware {
            actuators,
            rc: None,
            sensor: None,
            indicators: None,
            buttons: None,
        }
    }

    #[test]
    fn test_run_for_keeps_rate() {
        let clock = MockTimer::new();
        let release = MockPwm::new(PwmConfig::default());
        let mut actuators = actuators(&release);
        let mut system = GliderSystem::new(
            GliderConfig::default(),
            &clock,
            hardware(&mut actuators),
            FallbackPolicy::Sticky,
        )
        .unwrap();
        system.activate();

        let mut control = ControlLoop::new(clock.clone(), 50);
        let summary = control.run_for(&mut system, 100);

        assert_eq!(summary.ticks, 100);
        assert!(summary.clean_shutdown);
        assert_eq!(TimeSource::now_ms(&clock), 2_000);
        assert_eq!(summary.stats.measured_rate_hz(), 50);
        assert_eq!(summary.stats.deadline_misses, 0);
        assert_eq!(control.overruns(), 0);

        // Shutdown ran
        assert!(!system.is_active());
        assert_eq!(system.release().state(), ReleaseState::Locked);
        assert!(!release.is_enabled());
    }

    #[test]
    fn test_stop_flag_still_shuts_down() {
        let clock = MockTimer::new();
        let release = MockPwm::new(PwmConfig::default());
        let mut actuators = actuators(&release);
        let mut system = GliderSystem::new(
            GliderConfig::default(),
            &clock,
            hardware(&mut actuators),
            FallbackPolicy::Sticky,
        )
        .unwrap();

        let stop = AtomicBool::new(true);
        let mut control = ControlLoop::new(clock.clone(), 50);
        let summary = control.run(&mut system, &stop);

        assert_eq!(summary.ticks, 0);
        assert!(summary.clean_shutdown);
        assert!(!release.is_enabled());
    }

    #[test]
    fn test_period() {
        assert_eq!(ControlLoop::new(MockTimer::new(), 50).period_us(), 20_000);
        assert_eq!(ControlLoop::new(MockTimer::new(), 0).period_us(), 1_000_000);
    }
}
