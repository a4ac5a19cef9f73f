//! Servo outputs for control surfaces and the release mechanism
//!
//! This module provides the layer between the stabilizer and PWM hardware:
//! - Angle commands in degrees, clamped to the configured servo range
//! - Angle → 10-bit duty count → duty fraction conversion
//! - Neutral and locked positions written at startup
//!
//! ## Safety
//!
//! Every angle goes through `SafetyLimits::clamp_angle` before it reaches a
//! PWM channel, so no command can drive a servo past its stops.

use crate::platform::traits::PwmInterface;
use crate::platform::PlatformError;
use glider_core::parameters::{GliderConfig, SafetyLimits};
use glider_core::servo::angle_to_duty_fraction;
use glider_core::stabilizer::ServoCommand;

/// Servo output interface used by the control loop
pub trait ActuatorInterface {
    /// Drive the four control surfaces
    fn apply_command(&mut self, command: &ServoCommand) -> Result<(), PlatformError>;

    /// Center all control surfaces
    fn set_neutral(&mut self) -> Result<(), PlatformError>;

    /// Position the release servo
    fn set_release_angle(&mut self, angle: i16) -> Result<(), PlatformError>;

    /// Stop driving every output
    fn disable(&mut self);

    /// Last command written to the control surfaces
    fn last_command(&self) -> ServoCommand;

    /// Whether a release servo is connected
    fn has_release_servo(&self) -> bool {
        true
    }
}

/// Servo channel that could not be brought up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServoChannel {
    FlapsLeft,
    FlapsRight,
    Elevator,
    Rudder,
    Release,
}

impl ServoChannel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ServoChannel::FlapsLeft => "flaps_left",
            ServoChannel::FlapsRight => "flaps_right",
            ServoChannel::Elevator => "elevator",
            ServoChannel::Rudder => "rudder",
            ServoChannel::Release => "release",
        }
    }
}

/// Actuator startup failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActuatorInitError {
    pub channel: ServoChannel,
    pub error: PlatformError,
}

impl core::fmt::Display for ActuatorInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "servo channel {} failed to initialize: {}",
            self.channel.as_str(),
            self.error
        )
    }
}

/// PWM channels of one glider
pub struct ServoChannels<P> {
    pub flaps_left: P,
    pub flaps_right: P,
    pub elevator: P,
    pub rudder: P,
    pub release: P,
}

/// Four control-surface servos plus the release servo
pub struct ServoActuators<P: PwmInterface> {
    channels: ServoChannels<P>,
    limits: SafetyLimits,
    last_command: ServoCommand,
    release_angle: i16,
}

impl<P: PwmInterface> ServoActuators<P> {
    /// Configure every channel and move servos to their safe positions
    ///
    /// # Arguments
    ///
    /// * `channels` - PWM channels
    /// * `limits` - Servo range and duty bounds
    /// * `frequency_hz` - Servo PWM frequency
    /// * `locked_angle` - Initial release servo position
    pub fn new(
        channels: ServoChannels<P>,
        limits: SafetyLimits,
        frequency_hz: u32,
        locked_angle: i16,
    ) -> Result<Self, ActuatorInitError> {
        let mut actuators = Self {
            channels,
            limits,
            last_command: ServoCommand::neutral(&limits),
            release_angle: locked_angle,
        };

        for channel in [
            ServoChannel::FlapsLeft,
            ServoChannel::FlapsRight,
            ServoChannel::Elevator,
            ServoChannel::Rudder,
            ServoChannel::Release,
        ] {
            let pwm = actuators.channel_mut(channel);
            pwm.set_frequency(frequency_hz)
                .map_err(|error| ActuatorInitError { channel, error })?;
            pwm.enable();
        }

        let neutral = ServoCommand::neutral(&limits);
        actuators
            .write_command(&neutral)
            .map_err(|error| ActuatorInitError {
                channel: ServoChannel::FlapsLeft,
                error,
            })?;
        actuators
            .set_release_angle(locked_angle)
            .map_err(|error| ActuatorInitError {
                channel: ServoChannel::Release,
                error,
            })?;

        crate::log_info!("Servos initialized at {} Hz", frequency_hz);
        Ok(actuators)
    }

    /// Actuators at the configured servo frequency, release locked
    pub fn from_config(
        channels: ServoChannels<P>,
        config: &GliderConfig,
    ) -> Result<Self, ActuatorInitError> {
        Self::new(
            channels,
            config.limits,
            config.system.servo_frequency_hz,
            config.release.locked_angle,
        )
    }

    /// Current release servo angle
    pub fn release_angle(&self) -> i16 {
        self.release_angle
    }

    /// Give the PWM channels back
    pub fn into_channels(self) -> ServoChannels<P> {
        self.channels
    }

    fn channel_mut(&mut self, channel: ServoChannel) -> &mut P {
        match channel {
            ServoChannel::FlapsLeft => &mut self.channels.flaps_left,
            ServoChannel::FlapsRight => &mut self.channels.flaps_right,
            ServoChannel::Elevator => &mut self.channels.elevator,
            ServoChannel::Rudder => &mut self.channels.rudder,
            ServoChannel::Release => &mut self.channels.release,
        }
    }

    fn write_angle(&mut self, channel: ServoChannel, angle: i16) -> Result<i16, PlatformError> {
        let angle = self.limits.clamp_angle(i32::from(angle));
        let duty = angle_to_duty_fraction(angle, &self.limits);
        self.channel_mut(channel).set_duty_cycle(duty)?;
        Ok(angle)
    }

    fn write_command(&mut self, command: &ServoCommand) -> Result<(), PlatformError> {
        let applied = ServoCommand {
            flaps_left: self.write_angle(ServoChannel::FlapsLeft, command.flaps_left)?,
            flaps_right: self.write_angle(ServoChannel::FlapsRight, command.flaps_right)?,
            elevator: self.write_angle(ServoChannel::Elevator, command.elevator)?,
            rudder: self.write_angle(ServoChannel::Rudder, command.rudder)?,
        };
        self.last_command = applied;
        Ok(())
    }
}

impl<P: PwmInterface> ActuatorInterface for ServoActuators<P> {
    fn apply_command(&mut self, command: &ServoCommand) -> Result<(), PlatformError> {
        self.write_command(command)
    }

    fn set_neutral(&mut self) -> Result<(), PlatformError> {
        let neutral = ServoCommand::neutral(&self.limits);
        self.write_command(&neutral)
    }

    fn set_release_angle(&mut self, angle: i16) -> Result<(), PlatformError> {
        self.release_angle = self.write_angle(ServoChannel::Release, angle)?;
        Ok(())
    }

    fn disable(&mut self) {
        for channel in [
            ServoChannel::FlapsLeft,
            ServoChannel::FlapsRight,
            ServoChannel::Elevator,
            ServoChannel::Rudder,
            ServoChannel::Release,
        ] {
            self.channel_mut(channel).disable();
        }
    }

    fn last_command(&self) -> ServoCommand {
        self.last_command
    }
}
