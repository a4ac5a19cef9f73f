//! Glider system orchestrator

use super::status::{Capabilities, StatusSnapshot, TickError, TickReport};
use crate::devices::traits::AttitudeSensor;
use crate::libraries::{ActuatorInterface, ButtonInput, RcPulseSource, VisualFeedback};
use crate::platform::PlatformError;
use crate::subsystems::{AttitudeSource, FallbackPolicy};
use glider_core::attitude::AttitudeSample;
use glider_core::indicator::{
    AlertSequence, BlinkTiming, IndicatorFrame, DEACTIVATE_ALERT_PULSES, EMERGENCY_ALERT_PULSES,
};
use glider_core::input::ButtonEvents;
use glider_core::parameters::{ConfigError, GliderConfig};
use glider_core::release::{ReleaseStateMachine, ReleaseTransition};
use glider_core::scheduler::{TaskMetadata, TaskStats};
use glider_core::selftest::{
    SelfTestChecks, SelfTestPhase, StartupOutcome, StartupSelfTest, SELF_TEST_SUBSYSTEMS,
};
use glider_core::stabilizer::{mix, PidStabilizer, ServoCommand};
use glider_core::traits::TimeSource;

/// Hardware handed to the system at startup
///
/// Everything except the actuators is optional; a missing handle is
/// recorded in [`Capabilities`] and skipped at runtime.
pub struct GliderHardware<'a> {
    pub actuators: &'a mut dyn ActuatorInterface,
    pub rc: Option<&'a mut dyn RcPulseSource>,
    pub sensor: Option<&'a mut dyn AttitudeSensor>,
    pub indicators: Option<&'a mut dyn VisualFeedback>,
    pub buttons: Option<&'a mut dyn ButtonInput>,
}

/// Stabilization and release control for one glider
pub struct GliderSystem<'a, T: TimeSource> {
    config: GliderConfig,
    time: &'a T,
    stabilizer: PidStabilizer,
    release: ReleaseStateMachine,
    attitude: AttitudeSource<&'a mut dyn AttitudeSensor>,
    actuators: &'a mut dyn ActuatorInterface,
    rc: Option<&'a mut dyn RcPulseSource>,
    indicators: Option<&'a mut dyn VisualFeedback>,
    buttons: Option<&'a mut dyn ButtonInput>,
    capabilities: Capabilities,
    startup_checks: SelfTestChecks,
    self_test: Option<StartupSelfTest>,
    self_test_phase: Option<SelfTestPhase>,
    last_sensor_reading: Option<u8>,
    release_synced: bool,
    alert: AlertSequence,
    active: bool,
    loop_count: u32,
    last_tick_us: Option<u64>,
    last_rc_pulse: u16,
    last_attitude: AttitudeSample,
    task: TaskMetadata,
    stats: TaskStats,
}

impl<'a, T: TimeSource> GliderSystem<'a, T> {
    /// Validate the configuration, probe the hardware and move every servo
    /// to its safe position
    ///
    /// The system starts inactive with the release locked. With
    /// `startup_self_test` set, the first ticks run the self-test sequence
    /// for every subsystem that came up.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration does not validate
    pub fn new(
        config: GliderConfig,
        time: &'a T,
        hardware: GliderHardware<'a>,
        policy: FallbackPolicy,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let now_ms = time.now_ms();
        let attitude = AttitudeSource::new(hardware.sensor, policy, now_ms);

        let mut capabilities = Capabilities::empty();
        capabilities.set(Capabilities::ATTITUDE_SENSOR, attitude.sensor_detected());
        capabilities.set(Capabilities::RC_INPUT, hardware.rc.is_some());
        capabilities.set(Capabilities::STATUS_LEDS, hardware.indicators.is_some());
        capabilities.set(Capabilities::BUTTONS, hardware.buttons.is_some());
        capabilities.set(
            Capabilities::RELEASE_SERVO,
            hardware.actuators.has_release_servo(),
        );

        let mut system = Self {
            stabilizer: PidStabilizer::new(config.flight_modes.clone(), config.limits.max_pid_integral),
            release: ReleaseStateMachine::new(config.release),
            task: TaskMetadata::new("control", config.system.main_loop_frequency_hz),
            last_rc_pulse: config.limits.rc_neutral_pulse,
            config,
            time,
            attitude,
            actuators: hardware.actuators,
            rc: hardware.rc,
            indicators: hardware.indicators,
            buttons: hardware.buttons,
            capabilities,
            startup_checks: SelfTestChecks::default(),
            self_test: None,
            self_test_phase: None,
            last_sensor_reading: None,
            release_synced: false,
            alert: AlertSequence::default(),
            active: false,
            loop_count: 0,
            last_tick_us: None,
            last_attitude: AttitudeSample::default(),
            stats: TaskStats::default(),
        };

        let servos_ok = match system.actuators.set_neutral() {
            Ok(()) => true,
            Err(e) => {
                crate::log_error!("Failed to center servos: {}", e.as_str());
                false
            }
        };
        let release_ok = match system.sync_release_servo() {
            Ok(()) => system.capabilities.contains(Capabilities::RELEASE_SERVO),
            Err(e) => {
                crate::log_error!("Failed to lock release servo: {}", e.as_str());
                false
            }
        };
        let leds_ok = match system.indicators.as_mut() {
            Some(indicators) => match indicators.all_off() {
                Ok(()) => true,
                Err(e) => {
                    crate::log_error!("Failed to switch LEDs off: {}", e.as_str());
                    false
                }
            },
            None => false,
        };
        system.startup_checks = SelfTestChecks {
            indicators: leds_ok,
            release_servo: release_ok,
            attitude_sensor: system.attitude.sensor_detected(),
            control_servos: servos_ok,
        };

        system.log_startup();
        if system.config.system.startup_self_test {
            system.self_test = Some(StartupSelfTest::new(
                system.startup_checks,
                &system.config.release,
                &system.config.limits,
                now_ms,
            ));
            crate::log_info!("Startup self-test started");
        }
        Ok(system)
    }

    fn log_startup(&self) {
        crate::log_info!(
            "Glider system ready at {} Hz",
            self.config.system.main_loop_frequency_hz
        );
        for (flag, name) in Capabilities::NAMES {
            let state = if self.capabilities.contains(flag) {
                "yes"
            } else {
                "no"
            };
            crate::log_info!("  {}: {}", name, state);
        }
        for (index, mode) in self.stabilizer.modes().iter().enumerate() {
            crate::log_info!("  mode {}: {} (flaps {})", index, mode.name, mode.flaps_bias);
        }
        crate::log_info!("  attitude source: {}", self.attitude.source_name());
        crate::log_info!(
            "  startup checks: {}/{} subsystems working",
            self.startup_checks.passed(),
            SELF_TEST_SUBSYSTEMS
        );
    }

    /// Run one control period
    ///
    /// Never fails: errors are logged, reported in the returned
    /// [`TickReport`] and answered by centering the control surfaces.
    pub fn tick(&mut self) -> TickReport {
        let start_us = self.time.now_us();
        let period_us = self
            .last_tick_us
            .map_or(0, |last| start_us.saturating_sub(last));
        let dt = match self.last_tick_us {
            Some(_) => period_us as f32 / 1_000_000.0,
            None => self.config.system.loop_period_s(),
        };
        self.last_tick_us = Some(start_us);
        self.loop_count = self.loop_count.wrapping_add(1);

        let now_ms = start_us / 1000;
        let mut report = TickReport::new(self.loop_count);
        let result = if self.self_test_running(now_ms) {
            self.self_test_step(now_ms, &mut report)
        } else {
            self.step(now_ms, dt, &mut report)
        };
        if let Err(e) = result {
            crate::log_error!("Control tick failed: {}", e.as_str());
            report.error = Some(e);
            if let Err(e) = self.actuators.set_neutral() {
                crate::log_error!("Failed to center servos: {}", e.as_str());
            }
        }

        let execution_us = self.time.now_us().saturating_sub(start_us);
        self.stats.update(
            clamp_u32(execution_us),
            clamp_u32(period_us),
            &self.task,
        );

        if self.loop_count % self.config.system.telemetry_every_ticks() == 0 {
            let status = self.status();
            log_status(&status);
            report.status = Some(status);
        }
        report
    }

    fn step(&mut self, now_ms: u64, dt: f32, report: &mut TickReport) -> Result<(), TickError> {
        // 1. Buttons
        if let Some(buttons) = self.buttons.as_mut() {
            report.events = buttons.read(now_ms);
        }
        self.handle_buttons(report.events, now_ms);

        // 2. Attitude
        let attitude = self.attitude.sample(now_ms);
        self.last_attitude = attitude;
        report.attitude = attitude;

        // 3. Stabilization
        if self.active {
            let output = self.stabilizer.update(&attitude, dt);
            let flaps_bias = self.stabilizer.active_mode().map_or(0, |mode| mode.flaps_bias);
            let command = mix(&output, flaps_bias, &self.config.limits);
            self.actuators
                .apply_command(&command)
                .map_err(TickError::Actuator)?;
            report.command = Some(command);
        } else {
            self.actuators.set_neutral().map_err(TickError::Actuator)?;
        }

        // 4. Release
        let pulse = match self.rc.as_mut() {
            Some(rc) => rc.read_pulse(now_ms),
            None => self.config.limits.rc_neutral_pulse,
        };
        self.last_rc_pulse = pulse;
        if let Some(transition) = self.release.update(pulse, now_ms) {
            report.transition = Some(transition);
            log_transition(&transition);
            self.release_synced = false;
        }
        // Retried every tick until the servo matches the state
        self.sync_release_servo()
            .map_err(TickError::ReleaseServo)?;

        // 5. Indicators
        let frame = IndicatorFrame::compute(
            self.active,
            self.stabilizer.active_mode_index(),
            self.release.state(),
            &self.alert,
            self.blink_timing(),
            now_ms,
        );
        if let Some(indicators) = self.indicators.as_mut() {
            indicators.show(&frame).map_err(TickError::Indicator)?;
        }

        Ok(())
    }

    fn handle_buttons(&mut self, events: ButtonEvents, now_ms: u64) {
        if events.mode_clicked {
            if self.active {
                let next = self
                    .stabilizer
                    .modes()
                    .next_index(self.stabilizer.active_mode_index());
                self.set_flight_mode(next);
            } else {
                self.activate();
            }
        }

        if events.power_clicked {
            if self.active {
                self.deactivate_at(now_ms);
            } else {
                self.emergency_release_at(now_ms);
            }
        }
    }

    fn sync_release_servo(&mut self) -> Result<(), PlatformError> {
        if self.release_synced {
            return Ok(());
        }
        self.actuators.set_release_angle(self.release.servo_angle())?;
        self.release_synced = true;
        Ok(())
    }

    // Ends the self-test once its timeline has run out
    fn self_test_running(&mut self, now_ms: u64) -> bool {
        let Some(test) = self.self_test else {
            return false;
        };
        if !test.is_finished(now_ms) {
            return true;
        }

        let checks = test.checks();
        let outcome = test.outcome();
        match outcome {
            StartupOutcome::Failed => crate::log_error!(
                "Startup self-test {}: {}/{} subsystems working",
                outcome.as_str(),
                checks.passed(),
                SELF_TEST_SUBSYSTEMS
            ),
            _ => crate::log_info!(
                "Startup self-test {}: {}/{} subsystems working",
                outcome.as_str(),
                checks.passed(),
                SELF_TEST_SUBSYSTEMS
            ),
        }
        self.self_test = None;
        self.self_test_phase = None;
        // The release servo was exercised; put it back where the state says
        self.release_synced = false;
        false
    }

    fn self_test_step(&mut self, now_ms: u64, report: &mut TickReport) -> Result<(), TickError> {
        let Some(step) = self.self_test.and_then(|test| test.step(now_ms)) else {
            return Ok(());
        };
        report.self_test = Some(step.phase);
        if self.self_test_phase != Some(step.phase) {
            self.self_test_phase = Some(step.phase);
            crate::log_info!("Self-test: {}", step.phase.as_str());
        }

        if let Some(reading) = step.sensor_reading {
            let attitude = self.attitude.sample(now_ms);
            self.last_attitude = attitude;
            report.attitude = attitude;
            if self.last_sensor_reading != Some(reading) {
                self.last_sensor_reading = Some(reading);
                crate::log_info!(
                    "  reading {}: roll={} pitch={} yaw_rate={} ({})",
                    reading + 1,
                    attitude.roll,
                    attitude.pitch,
                    attitude.yaw_rate,
                    self.attitude.source_name()
                );
            }
        }

        if let Some(command) = step.surfaces {
            self.actuators
                .apply_command(&command)
                .map_err(TickError::Actuator)?;
        }
        if let Some(angle) = step.release_angle {
            self.release_synced = false;
            self.actuators
                .set_release_angle(angle)
                .map_err(TickError::ReleaseServo)?;
        }
        if let (Some(frame), Some(indicators)) = (step.leds, self.indicators.as_mut()) {
            indicators.show(&frame).map_err(TickError::Indicator)?;
        }
        Ok(())
    }

    fn blink_timing(&self) -> BlinkTiming {
        BlinkTiming {
            fast_ms: self.config.system.led_blink_fast_ms,
            slow_ms: self.config.system.led_blink_slow_ms,
        }
    }

    /// Select a flight mode by index
    ///
    /// # Returns
    ///
    /// `false` if the index is out of range; the active mode is unchanged
    pub fn set_flight_mode(&mut self, index: usize) -> bool {
        if !self.stabilizer.set_mode(index) {
            crate::log_warn!("Invalid flight mode index {}", index);
            return false;
        }
        if let Some(mode) = self.stabilizer.active_mode() {
            crate::log_info!("Flight mode: {}", mode.name);
        }
        true
    }

    /// Start stabilizing
    pub fn activate(&mut self) {
        if self.active {
            return;
        }
        self.stabilizer.reset();
        self.active = true;
        let mode_name = self.stabilizer.active_mode().map_or("?", |mode| mode.name);
        crate::log_info!("Stabilization active, mode {}", mode_name);
    }

    /// Stop stabilizing, center the control surfaces and flash the alert LED
    pub fn deactivate(&mut self) {
        self.deactivate_at(self.time.now_ms());
    }

    fn deactivate_at(&mut self, now_ms: u64) {
        if !self.active {
            return;
        }
        self.active = false;
        if let Err(e) = self.actuators.set_neutral() {
            crate::log_error!("Failed to center servos: {}", e.as_str());
        }
        self.alert.start(DEACTIVATE_ALERT_PULSES, now_ms);
        crate::log_info!("Stabilization inactive");
    }

    /// Open the release immediately, bypassing the safety delay
    ///
    /// # Returns
    ///
    /// `false` if the emergency override is disabled
    pub fn emergency_release(&mut self) -> bool {
        self.emergency_release_at(self.time.now_ms())
    }

    fn emergency_release_at(&mut self, now_ms: u64) -> bool {
        let Some(transition) = self.release.emergency_release(now_ms) else {
            crate::log_warn!("Emergency release refused: override disabled");
            return false;
        };
        crate::log_warn!("EMERGENCY RELEASE");
        if self.self_test.take().is_some() {
            crate::log_warn!("Startup self-test aborted");
            self.self_test_phase = None;
        }
        log_transition(&transition);
        self.release_synced = false;
        if let Err(e) = self.sync_release_servo() {
            crate::log_error!("Failed to move release servo: {}", e.as_str());
        }
        self.alert.start(EMERGENCY_ALERT_PULSES, now_ms);
        true
    }

    /// Bring every output to a safe state
    ///
    /// Deactivates, locks the release, centers the control surfaces, turns
    /// the LEDs off, stops the PID and disables the outputs. Every step runs
    /// even when an earlier one failed; the first failure is returned.
    pub fn shutdown(&mut self) -> Result<(), PlatformError> {
        crate::log_info!("Shutting down");
        let now_ms = self.time.now_ms();
        let mut first_error = None;
        let mut record = |result: Result<(), PlatformError>, what: &str| {
            if let Err(e) = result {
                crate::log_error!("Shutdown: {} failed: {}", what, e.as_str());
                first_error.get_or_insert(e);
            }
        };

        self.active = false;
        self.alert.cancel();
        self.self_test = None;
        self.self_test_phase = None;

        self.release.force_lock(now_ms);
        self.release_synced = false;
        record(self.sync_release_servo(), "release lock");
        record(self.actuators.set_neutral(), "servo neutral");
        if let Some(indicators) = self.indicators.as_mut() {
            record(indicators.all_off(), "leds off");
        }
        self.stabilizer.emergency_stop();
        self.actuators.disable();

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Current status
    pub fn status(&self) -> StatusSnapshot {
        let pid = self.stabilizer.status();
        StatusSnapshot {
            active_flight_mode: pid.active_mode,
            mode_name: pid.mode_name,
            pid_integral: pid.integral,
            release_state: self.release.state(),
            last_rc_pulse: self.last_rc_pulse,
            sensor_valid: self.last_attitude.valid,
            loop_frequency_hz: self.config.system.main_loop_frequency_hz,
            measured_frequency_hz: self.stats.measured_rate_hz(),
            system_active: self.active,
            loop_count: self.loop_count,
            attitude: self.last_attitude,
            capabilities: self.capabilities,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Subsystems that came up at startup
    pub fn startup_checks(&self) -> SelfTestChecks {
        self.startup_checks
    }

    /// Whether the startup self-test still owns the outputs
    pub fn self_test_active(&self) -> bool {
        self.self_test.is_some()
    }

    pub fn config(&self) -> &GliderConfig {
        &self.config
    }

    pub fn release(&self) -> &ReleaseStateMachine {
        &self.release
    }

    pub fn stabilizer(&self) -> &PidStabilizer {
        &self.stabilizer
    }

    pub fn attitude_source(&self) -> &AttitudeSource<&'a mut dyn AttitudeSensor> {
        &self.attitude
    }

    /// Loop timing statistics
    pub fn stats(&self) -> &TaskStats {
        &self.stats
    }

    pub fn task(&self) -> &TaskMetadata {
        &self.task
    }

    /// Last command sent to the control surfaces
    pub fn last_command(&self) -> ServoCommand {
        self.actuators.last_command()
    }
}

fn clamp_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn log_transition(transition: &ReleaseTransition) {
    crate::log_info!(
        "Release: {} -> {} ({}), servo {}",
        transition.from.as_str(),
        transition.to.as_str(),
        transition.cause.as_str(),
        transition.servo_angle
    );
}

fn log_status(status: &StatusSnapshot) {
    crate::log_info!(
        "Status: mode={} release={} rc={} sensor={} active={} loops={} rate={}/{} Hz",
        status.mode_name,
        status.release_state.as_str(),
        status.last_rc_pulse,
        if status.sensor_valid { "real" } else { "simulated" },
        status.system_active,
        status.loop_count,
        status.measured_frequency_hz,
        status.loop_frequency_hz
    );
    crate::log_info!(
        "  roll={} pitch={} yaw_rate={} integral={} {} {}",
        status.attitude.roll,
        status.attitude.pitch,
        status.attitude.yaw_rate,
        status.pid_integral[0],
        status.pid_integral[1],
        status.pid_integral[2]
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::imu::MockAttitudeSensor;
    use crate::devices::traits::AttitudeSensorError;
    use crate::libraries::{
        GpioButtons, LedIndicators, PulseWidthDecoder, RcStatus, ServoActuators, ServoChannels,
    };
    use crate::platform::mock::{MockGpio, MockPwm, MockTimer};
    use crate::platform::traits::{GpioInterface, PwmConfig, PwmInterface};
    use crate::platform::PwmError;
    use glider_core::attitude::RawMotion;
    use glider_core::parameters::SafetyLimits;
    use glider_core::release::ReleaseState;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    struct ActuatorLog {
        commands: Vec<ServoCommand>,
        neutral_calls: usize,
        release_angles: Vec<i16>,
        disabled: bool,
        fail_apply: bool,
        fail_release: bool,
    }

    #[derive(Debug, Clone, Default)]
    struct RecordingActuator(Rc<RefCell<ActuatorLog>>);

    impl RecordingActuator {
        fn log(&self) -> std::cell::Ref<'_, ActuatorLog> {
            self.0.borrow()
        }
    }

    impl ActuatorInterface for RecordingActuator {
        fn apply_command(&mut self, command: &ServoCommand) -> Result<(), PlatformError> {
            let mut log = self.0.borrow_mut();
            if log.fail_apply {
                return Err(PlatformError::Pwm(PwmError::ChannelUnavailable));
            }
            log.commands.push(*command);
            Ok(())
        }

        fn set_neutral(&mut self) -> Result<(), PlatformError> {
            let mut log = self.0.borrow_mut();
            log.neutral_calls += 1;
            log.commands.push(ServoCommand::neutral(&SafetyLimits::default()));
            Ok(())
        }

        fn set_release_angle(&mut self, angle: i16) -> Result<(), PlatformError> {
            let mut log = self.0.borrow_mut();
            if log.fail_release {
                return Err(PlatformError::Pwm(PwmError::ChannelUnavailable));
            }
            log.release_angles.push(angle);
            Ok(())
        }

        fn disable(&mut self) {
            self.0.borrow_mut().disabled = true;
        }

        fn last_command(&self) -> ServoCommand {
            self.log()
                .commands
                .last()
                .copied()
                .unwrap_or_else(|| ServoCommand::neutral(&SafetyLimits::default()))
        }
    }

    #[derive(Debug, Clone)]
    struct ScriptedRc(Rc<Cell<u16>>);

    impl ScriptedRc {
        fn new(pulse: u16) -> Self {
            Self(Rc::new(Cell::new(pulse)))
        }

        fn set(&self, pulse: u16) {
            self.0.set(pulse);
        }
    }

    impl RcPulseSource for ScriptedRc {
        fn read_pulse(&mut self, _now_ms: u64) -> u16 {
            self.0.get()
        }

        fn last_pulse(&self) -> u16 {
            self.0.get()
        }

        fn status(&self) -> RcStatus {
            RcStatus::Active
        }
    }

    #[derive(Debug, Clone, Default)]
    struct ScriptedButtons(Rc<RefCell<VecDeque<ButtonEvents>>>);

    impl ScriptedButtons {
        fn click_mode(&self) {
            self.0.borrow_mut().push_back(ButtonEvents {
                mode_clicked: true,
                power_clicked: false,
            });
        }

        fn click_power(&self) {
            self.0.borrow_mut().push_back(ButtonEvents {
                mode_clicked: false,
                power_clicked: true,
            });
        }
    }

    impl ButtonInput for ScriptedButtons {
        fn read(&mut self, _now_ms: u64) -> ButtonEvents {
            self.0.borrow_mut().pop_front().unwrap_or_default()
        }
    }

    struct Rig {
        config: GliderConfig,
        clock: MockTimer,
        actuator: RecordingActuator,
        rc: ScriptedRc,
        sensor: MockAttitudeSensor,
        leds: LedIndicators<MockGpio>,
        led_pins: [MockGpio; 4],
        buttons: ScriptedButtons,
    }

    impl Rig {
        fn new() -> Self {
            let led_pins = [
                MockGpio::new_output(),
                MockGpio::new_output(),
                MockGpio::new_output(),
                MockGpio::new_output(),
            ];
            let mut config = GliderConfig::default();
            config.system.startup_self_test = false;
            Self {
                config,
                clock: MockTimer::new(),
                actuator: RecordingActuator::default(),
                rc: ScriptedRc::new(1500),
                sensor: MockAttitudeSensor::present(),
                leds: LedIndicators::new(
                    Some(led_pins[0].clone()),
                    Some(led_pins[1].clone()),
                    Some(led_pins[2].clone()),
                    Some(led_pins[3].clone()),
                ),
                led_pins,
                buttons: ScriptedButtons::default(),
            }
        }

        fn system(&mut self) -> GliderSystem<'_, MockTimer> {
            let hardware = GliderHardware {
                actuators: &mut self.actuator,
                rc: Some(&mut self.rc),
                sensor: Some(&mut self.sensor),
                indicators: Some(&mut self.leds),
                buttons: Some(&mut self.buttons),
            };
            GliderSystem::new(
                self.config.clone(),
                &self.clock,
                hardware,
                FallbackPolicy::Sticky,
            )
            .unwrap()
        }
    }

    fn run_ticks(system: &mut GliderSystem<'_, MockTimer>, clock: &MockTimer, ticks: usize) -> Vec<TickReport> {
        (0..ticks)
            .map(|_| {
                clock.advance_ms(20);
                system.tick()
            })
            .collect()
    }

    #[test]
    fn test_startup_state() {
        let mut rig = Rig::new();
        let actuator = rig.actuator.clone();
        let system = rig.system();

        assert_eq!(system.capabilities(), Capabilities::all());
        assert!(!system.is_active());
        assert_eq!(system.release().state(), ReleaseState::Locked);
        assert_eq!(actuator.log().release_angles, vec![45]);
        assert_eq!(actuator.log().neutral_calls, 1);
    }

    #[test]
    fn test_missing_hardware_recorded_in_capabilities() {
        let clock = MockTimer::new();
        let mut actuator = RecordingActuator::default();
        let hardware = GliderHardware {
            actuators: &mut actuator,
            rc: None,
            sensor: None,
            indicators: None,
            buttons: None,
        };
        let mut config = GliderConfig::default();
        config.system.startup_self_test = false;
        let mut system =
            GliderSystem::new(config, &clock, hardware, FallbackPolicy::Sticky).unwrap();

        assert_eq!(system.capabilities(), Capabilities::RELEASE_SERVO);
        clock.advance_ms(20);
        let report = system.tick();
        assert!(!report.attitude.valid);
        assert!(report.error.is_none());
        assert_eq!(system.status().last_rc_pulse, 1500);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let clock = MockTimer::new();
        let mut actuator = RecordingActuator::default();
        let mut config = GliderConfig::default();
        config.system.main_loop_frequency_hz = 0;
        let hardware = GliderHardware {
            actuators: &mut actuator,
            rc: None,
            sensor: None,
            indicators: None,
            buttons: None,
        };

        assert!(GliderSystem::new(config, &clock, hardware, FallbackPolicy::Sticky).is_err());
    }

    #[test]
    fn test_inactive_holds_neutral() {
        let mut rig = Rig::new();
        rig.sensor.set_reading(RawMotion::new(0, 2845, 16135, 0));
        let clock = rig.clock.clone();
        let actuator = rig.actuator.clone();
        let mut system = rig.system();

        for report in run_ticks(&mut system, &clock, 10) {
            assert!(report.command.is_none());
        }
        assert_eq!(actuator.log().neutral_calls, 11);
        assert_eq!(system.last_command().as_array(), [90, 90, 90, 90]);
    }

    #[test]
    fn test_level_flight_is_neutral() {
        let mut rig = Rig::new();
        let clock = rig.clock.clone();
        let mut system = rig.system();
        system.activate();

        clock.advance_ms(20);
        let report = system.tick();
        assert_eq!(report.command.unwrap().as_array(), [90, 90, 90, 90]);
    }

    #[test]
    fn test_roll_disturbance_saturates_flaps() {
        let mut rig = Rig::new();
        // 10 deg right wing down
        rig.sensor.set_reading(RawMotion::new(0, 2845, 16135, 0));
        let clock = rig.clock.clone();
        let mut system = rig.system();
        system.activate();

        clock.advance_ms(20);
        let report = system.tick();
        let command = report.command.unwrap();
        assert_eq!(command.flaps_left, 115);
        assert_eq!(command.flaps_right, 65);
        assert_eq!(command.elevator, 90);
        assert_eq!(command.rudder, 90);
        assert!(report.attitude.valid);
    }

    #[test]
    fn test_release_sequence_over_ticks() {
        let mut rig = Rig::new();
        let clock = rig.clock.clone();
        let rc = rig.rc.clone();
        let actuator = rig.actuator.clone();
        let mut system = rig.system();

        run_ticks(&mut system, &clock, 50);
        assert_eq!(system.release().state(), ReleaseState::Locked);

        rc.set(1800);
        let transitions: Vec<_> = run_ticks(&mut system, &clock, 351)
            .into_iter()
            .filter_map(|report| report.transition)
            .map(|t| (t.to, t.servo_angle))
            .collect();

        assert_eq!(
            transitions,
            vec![
                (ReleaseState::Armed, 45),
                (ReleaseState::Releasing, 135),
                (ReleaseState::Released, 135),
                (ReleaseState::Locked, 45),
            ]
        );
        assert_eq!(actuator.log().release_angles, vec![45, 45, 135, 135, 45]);
    }

    #[test]
    fn test_glitch_does_not_release() {
        let mut rig = Rig::new();
        let clock = rig.clock.clone();
        let rc = rig.rc.clone();
        let mut system = rig.system();

        rc.set(1800);
        run_ticks(&mut system, &clock, 50);
        assert_eq!(system.release().state(), ReleaseState::Armed);

        rc.set(1500);
        run_ticks(&mut system, &clock, 1);
        assert_eq!(system.release().state(), ReleaseState::Locked);

        rc.set(1800);
        run_ticks(&mut system, &clock, 99);
        assert_eq!(system.release().state(), ReleaseState::Armed);
    }

    #[test]
    fn test_emergency_release_same_tick() {
        let mut rig = Rig::new();
        let clock = rig.clock.clone();
        let actuator = rig.actuator.clone();
        let alert_led = rig.led_pins[3].clone();
        let mut system = rig.system();

        clock.advance_ms(20);
        assert!(system.emergency_release());
        assert_eq!(system.release().state(), ReleaseState::Released);
        assert_eq!(actuator.log().release_angles.last(), Some(&135));

        // Alert pulses show on the next tick
        system.tick();
        assert!(alert_led.read());
    }

    #[test]
    fn test_emergency_release_disabled() {
        let mut rig = Rig::new();
        rig.config.release.emergency_override = false;
        let mut system = rig.system();

        assert!(!system.emergency_release());
        assert_eq!(system.release().state(), ReleaseState::Locked);
    }

    #[test]
    fn test_buttons_drive_modes_and_power() {
        let mut rig = Rig::new();
        let clock = rig.clock.clone();
        let buttons = rig.buttons.clone();
        let mut system = rig.system();

        // First click activates
        buttons.click_mode();
        run_ticks(&mut system, &clock, 1);
        assert!(system.is_active());
        assert_eq!(system.status().active_flight_mode, 0);

        // Further clicks cycle modes
        for expected in [1, 2, 0] {
            buttons.click_mode();
            run_ticks(&mut system, &clock, 1);
            assert_eq!(system.status().active_flight_mode, expected);
        }

        // Power while active deactivates
        buttons.click_power();
        run_ticks(&mut system, &clock, 1);
        assert!(!system.is_active());
        assert_eq!(system.release().state(), ReleaseState::Locked);

        // Power while inactive is an emergency release
        buttons.click_power();
        let report = run_ticks(&mut system, &clock, 1).remove(0);
        assert!(report.events.power_clicked);
        assert_eq!(system.release().state(), ReleaseState::Released);
    }

    #[test]
    fn test_set_flight_mode() {
        let mut rig = Rig::new();
        let mut system = rig.system();

        assert!(system.set_flight_mode(2));
        assert_eq!(system.status().mode_name, "LANDING");
        assert!(!system.set_flight_mode(3));
        assert_eq!(system.status().active_flight_mode, 2);
    }

    #[test]
    fn test_status_leds_follow_state() {
        let mut rig = Rig::new();
        let clock = rig.clock.clone();
        let [system_led, mode_led, release_led, _] = rig.led_pins.clone();
        let mut system = rig.system();

        run_ticks(&mut system, &clock, 1);
        assert!(!system_led.read());
        assert!(!mode_led.read());
        assert!(release_led.read());

        system.activate();
        // t = 40 ms: first fast slot of mode 0
        run_ticks(&mut system, &clock, 1);
        assert!(system_led.read());
        assert!(mode_led.read());
    }

    #[test]
    fn test_actuator_failure_is_contained() {
        let mut rig = Rig::new();
        let clock = rig.clock.clone();
        let actuator = rig.actuator.clone();
        let mut system = rig.system();
        system.activate();

        actuator.0.borrow_mut().fail_apply = true;
        let neutral_before = actuator.log().neutral_calls;
        let report = run_ticks(&mut system, &clock, 1).remove(0);

        assert_eq!(
            report.error,
            Some(TickError::Actuator(PlatformError::Pwm(PwmError::ChannelUnavailable)))
        );
        assert_eq!(actuator.log().neutral_calls, neutral_before + 1);

        actuator.0.borrow_mut().fail_apply = false;
        let report = run_ticks(&mut system, &clock, 1).remove(0);
        assert!(report.error.is_none());
        assert!(report.command.is_some());
    }

    #[test]
    fn test_sensor_failure_is_sticky() {
        let mut rig = Rig::new();
        let clock = rig.clock.clone();
        let sensor = rig.sensor.clone();
        let mut system = rig.system();

        assert!(run_ticks(&mut system, &clock, 5).iter().all(|r| r.attitude.valid));

        sensor.push_result(Err(AttitudeSensorError::ReadFailed));
        for report in run_ticks(&mut system, &clock, 200) {
            assert!(!report.attitude.valid);
        }
        let status = system.status();
        assert!(!status.sensor_valid);
        assert!(status.capabilities.contains(Capabilities::ATTITUDE_SENSOR));
        assert!(!system.attitude_source().using_real_sensor());
    }

    #[test]
    fn test_telemetry_interval() {
        let mut rig = Rig::new();
        let clock = rig.clock.clone();
        let mut system = rig.system();

        let reports = run_ticks(&mut system, &clock, 300);
        let telemetry: Vec<u32> = reports
            .iter()
            .filter_map(|r| r.status.map(|s| s.loop_count))
            .collect();
        assert_eq!(telemetry, vec![150, 300]);

        let status = reports[149].status.unwrap();
        assert_eq!(status.loop_frequency_hz, 50);
        assert_eq!(status.measured_frequency_hz, 50);
        assert_eq!(status.release_state, ReleaseState::Locked);
    }

    #[test]
    fn test_shutdown_reaches_safe_state() {
        let mut rig = Rig::new();
        let clock = rig.clock.clone();
        let actuator = rig.actuator.clone();
        let pins = rig.led_pins.clone();
        let mut system = rig.system();

        system.activate();
        system.emergency_release();
        run_ticks(&mut system, &clock, 3);

        assert!(system.shutdown().is_ok());
        assert!(!system.is_active());
        assert_eq!(system.release().state(), ReleaseState::Locked);
        assert!(system.stabilizer().is_stopped());
        assert_eq!(actuator.log().release_angles.last(), Some(&45));
        assert_eq!(system.last_command().as_array(), [90, 90, 90, 90]);
        assert!(actuator.log().disabled);
        assert!(pins.iter().all(|pin| !pin.read()));
    }

    #[test]
    fn test_shutdown_continues_after_failure() {
        let mut rig = Rig::new();
        let actuator = rig.actuator.clone();
        let mut system = rig.system();
        system.emergency_release();

        actuator.0.borrow_mut().fail_release = true;
        assert!(system.shutdown().is_err());
        assert_eq!(system.release().state(), ReleaseState::Locked);
        assert!(actuator.log().disabled);
    }

    #[test]
    fn test_with_mock_hardware_adapters() {
        let clock = MockTimer::new();
        let mut config = GliderConfig::default();
        config.system.startup_self_test = false;
        let pwm = || MockPwm::new(PwmConfig::default());
        let release_pwm = pwm();
        let mut actuators = ServoActuators::from_config(
            ServoChannels {
                flaps_left: pwm(),
                flaps_right: pwm(),
                elevator: pwm(),
                rudder: pwm(),
                release: release_pwm.clone(),
            },
            &config,
        )
        .unwrap();

        // No receiver connected: every fresh read waits out the edge timeout
        let rc_pin = MockGpio::new_input();
        let mut rc = PulseWidthDecoder::from_config(rc_pin, clock.clone(), &config);
        let mode_pin = MockGpio::new_input();
        mode_pin.set_input_state(true);
        let mut buttons = GpioButtons::from_config(mode_pin.clone(), None, &config.system);

        let hardware = GliderHardware {
            actuators: &mut actuators,
            rc: Some(&mut rc),
            sensor: None,
            indicators: None,
            buttons: Some(&mut buttons),
        };
        let mut system = GliderSystem::new(config, &clock, hardware, FallbackPolicy::Sticky).unwrap();

        mode_pin.set_input_state(false);
        clock.advance_ms(20);
        let report = system.tick();
        assert!(system.is_active());
        assert!(report.command.is_some());
        assert_eq!(system.status().last_rc_pulse, 1500);
        // The busy-wait timeout ran on the shared clock
        assert_eq!(system.stats().last_execution_us, 10_000);

        assert!(system.shutdown().is_ok());
        assert!(!release_pwm.is_enabled());
    }

    #[test]
    fn test_release_servo_rewritten_after_failed_write() {
        let mut rig = Rig::new();
        let clock = rig.clock.clone();
        let rc = rig.rc.clone();
        let actuator = rig.actuator.clone();
        let mut system = rig.system();

        actuator.0.borrow_mut().fail_release = true;
        rc.set(1800);
        let mut ticks = 0;
        while system.release().state() != ReleaseState::Releasing {
            let report = run_ticks(&mut system, &clock, 1).remove(0);
            assert!(matches!(report.error, Some(TickError::ReleaseServo(_))));
            ticks += 1;
            assert!(ticks <= 101);
        }
        assert!(!actuator.log().release_angles.contains(&135));

        actuator.0.borrow_mut().fail_release = false;
        let report = run_ticks(&mut system, &clock, 1).remove(0);
        assert!(report.error.is_none());
        assert_eq!(system.release().state(), ReleaseState::Releasing);
        assert_eq!(actuator.log().release_angles.last(), Some(&135));

        // Written once, not on every tick
        let writes = actuator.log().release_angles.len();
        run_ticks(&mut system, &clock, 5);
        assert_eq!(actuator.log().release_angles.len(), writes);
    }

    #[test]
    fn test_auto_lock_rewritten_after_failed_write() {
        let mut rig = Rig::new();
        let clock = rig.clock.clone();
        let rc = rig.rc.clone();
        let actuator = rig.actuator.clone();
        let mut system = rig.system();

        rc.set(1800);
        run_ticks(&mut system, &clock, 200);
        assert_eq!(system.release().state(), ReleaseState::Released);
        rc.set(1500);

        actuator.0.borrow_mut().fail_release = true;
        while system.release().state() != ReleaseState::Locked {
            run_ticks(&mut system, &clock, 1);
        }
        run_ticks(&mut system, &clock, 3);
        assert_eq!(actuator.log().release_angles.last(), Some(&135));

        actuator.0.borrow_mut().fail_release = false;
        run_ticks(&mut system, &clock, 1);
        assert_eq!(system.release().state(), ReleaseState::Locked);
        assert_eq!(actuator.log().release_angles.last(), Some(&45));
    }

    #[test]
    fn test_startup_self_test_runs_before_control() {
        let mut rig = Rig::new();
        rig.config.system.startup_self_test = true;
        let clock = rig.clock.clone();
        let rc = rig.rc.clone();
        let actuator = rig.actuator.clone();
        let system_led = rig.led_pins[0].clone();
        let mut system = rig.system();

        assert_eq!(system.startup_checks().passed(), 4);
        assert!(system.self_test_active());

        // Release requests are ignored while the self-test owns the outputs
        rc.set(1800);
        let first = run_ticks(&mut system, &clock, 1).remove(0);
        assert_eq!(first.self_test, Some(SelfTestPhase::Indicators));
        assert!(system_led.read());

        // 13.5 s of self-test at 20 ms per tick
        let reports = run_ticks(&mut system, &clock, 673);
        assert!(reports.iter().all(|r| r.transition.is_none() && r.error.is_none()));
        let mut phases: Vec<SelfTestPhase> = Vec::new();
        for phase in core::iter::once(first.self_test)
            .chain(reports.iter().map(|r| r.self_test))
            .flatten()
        {
            if phases.last() != Some(&phase) {
                phases.push(phase);
            }
        }
        assert_eq!(
            phases,
            vec![
                SelfTestPhase::Indicators,
                SelfTestPhase::ReleaseServo,
                SelfTestPhase::AttitudeSensor,
                SelfTestPhase::ControlServos,
                SelfTestPhase::Result,
            ]
        );
        assert!(actuator.log().release_angles.contains(&135));
        assert!(actuator.log().commands.iter().any(|c| c.as_array() == [60; 4]));
        assert_eq!(system.release().state(), ReleaseState::Locked);

        // First control tick relocks the release and then arms
        let report = run_ticks(&mut system, &clock, 1).remove(0);
        assert!(report.self_test.is_none());
        assert!(!system.self_test_active());
        assert_eq!(system.release().state(), ReleaseState::Armed);
        assert_eq!(actuator.log().release_angles.last(), Some(&45));
    }

    #[test]
    fn test_self_test_partial_without_sensor() {
        let mut rig = Rig::new();
        rig.config.system.startup_self_test = true;
        rig.sensor.set_present(false);
        let clock = rig.clock.clone();
        let mut system = rig.system();

        let checks = system.startup_checks();
        assert!(!checks.attitude_sensor);
        assert_eq!(checks.outcome(), StartupOutcome::Partial);

        // 3400 leds + 2500 release + 5600 servos + 3 alert blinks of 400 ms,
        // over before t = 12700 ms
        let reports = run_ticks(&mut system, &clock, 700);
        assert!(reports
            .iter()
            .all(|r| r.self_test != Some(SelfTestPhase::AttitudeSensor)));
        let self_test_ticks = reports.iter().filter(|r| r.self_test.is_some()).count();
        assert_eq!(self_test_ticks, 634);
        assert!(!system.self_test_active());
    }

    #[test]
    fn test_emergency_release_aborts_self_test() {
        let mut rig = Rig::new();
        rig.config.system.startup_self_test = true;
        let clock = rig.clock.clone();
        let actuator = rig.actuator.clone();
        let mut system = rig.system();
        run_ticks(&mut system, &clock, 10);

        assert!(system.emergency_release());
        assert!(!system.self_test_active());
        let report = run_ticks(&mut system, &clock, 1).remove(0);
        assert!(report.self_test.is_none());
        assert_eq!(system.release().state(), ReleaseState::Released);
        assert_eq!(actuator.log().release_angles.last(), Some(&135));
    }
}
