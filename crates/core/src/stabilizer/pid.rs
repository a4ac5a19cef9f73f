//! Attitude PID stabilizer
//!
//! Holds the roll and pitch targets of the active flight mode and damps yaw
//! rate to zero. One instance owns the integrator and derivative history for
//! all three axes.
//!
//! # Per-axis update
//!
//! ```text
//! error      = target - measured            (yaw target is 0 deg/s)
//! integral  += error * dt                   clamped to ±max_integral
//! derivative = (error - prev_error) / dt
//! output     = kp*error + ki*integral + kd*derivative   clamped to ±limit
//! ```
//!
//! A `dt` that is zero, negative or not finite skips integration and uses a
//! zero derivative for that update.

use crate::attitude::AttitudeSample;
use crate::parameters::{FlightMode, FlightModeTable};

const AXES: usize = 3;

/// Correction per axis in degrees of control surface deflection
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PidOutput {
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
}

impl PidOutput {
    pub const fn as_array(&self) -> [f32; AXES] {
        [self.roll, self.pitch, self.yaw]
    }
}

/// Integrator and derivative memory
///
/// Every `integral[i]` stays within `±max_integral`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PidState {
    pub integral: [f32; AXES],
    pub prev_error: [f32; AXES],
    pub active_mode: usize,
}

/// Snapshot for telemetry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidStatus {
    pub active_mode: usize,
    pub mode_name: &'static str,
    pub integral: [f32; AXES],
    pub last_output: PidOutput,
}

/// Three-axis PID stabilizer driven by a flight mode table
#[derive(Debug, Clone)]
pub struct PidStabilizer {
    modes: FlightModeTable,
    max_integral: f32,
    state: PidState,
    last_output: PidOutput,
    stopped: bool,
}

impl PidStabilizer {
    /// Create a stabilizer in mode 0 with zeroed state
    ///
    /// # Arguments
    ///
    /// * `modes` - Validated flight mode table (never empty)
    /// * `max_integral` - Anti-windup bound applied to each axis
    pub fn new(modes: FlightModeTable, max_integral: f32) -> Self {
        Self {
            modes,
            max_integral: max_integral.abs(),
            state: PidState::default(),
            last_output: PidOutput::default(),
            stopped: false,
        }
    }

    /// Compute the correction for one tick
    ///
    /// # Arguments
    ///
    /// * `attitude` - Current attitude sample
    /// * `dt` - Seconds since the previous update
    pub fn update(&mut self, attitude: &AttitudeSample, dt: f32) -> PidOutput {
        let Some(mode) = self.modes.get(self.state.active_mode).copied() else {
            return PidOutput::default();
        };
        self.stopped = false;

        let errors = [
            mode.target.roll - attitude.roll,
            mode.target.pitch - attitude.pitch,
            -attitude.yaw_rate,
        ];
        let gains = mode.gains.axes();
        let limits = mode.limits.axes();
        let dt_usable = dt.is_finite() && dt > 0.0;

        let mut output = [0.0f32; AXES];
        for axis in 0..AXES {
            let error = if errors[axis].is_finite() {
                errors[axis]
            } else {
                0.0
            };

            let derivative = if dt_usable {
                self.state.integral[axis] = (self.state.integral[axis] + error * dt)
                    .clamp(-self.max_integral, self.max_integral);
                (error - self.state.prev_error[axis]) / dt
            } else {
                0.0
            };

            let g = gains[axis];
            let raw = g.kp * error + g.ki * self.state.integral[axis] + g.kd * derivative;
            output[axis] = if raw.is_finite() {
                raw.clamp(-limits[axis], limits[axis])
            } else {
                0.0
            };
            self.state.prev_error[axis] = error;
        }

        self.last_output = PidOutput {
            roll: output[0],
            pitch: output[1],
            yaw: output[2],
        };
        self.last_output
    }

    /// Switch to the flight mode at `index`
    ///
    /// Switching to a different mode clears the integrator and derivative
    /// history. Selecting the already active mode changes nothing.
    ///
    /// # Returns
    ///
    /// `false` if `index` is not in the table
    pub fn set_mode(&mut self, index: usize) -> bool {
        if index >= self.modes.len() {
            return false;
        }
        if index != self.state.active_mode {
            self.clear_memory();
            self.state.active_mode = index;
        }
        true
    }

    /// Zero the integrator, derivative history and last output
    pub fn reset(&mut self) {
        self.clear_memory();
        self.last_output = PidOutput::default();
    }

    /// Reset and mark the stabilizer as stopped until the next update
    pub fn emergency_stop(&mut self) {
        self.reset();
        self.stopped = true;
    }

    fn clear_memory(&mut self) {
        self.state.integral = [0.0; AXES];
        self.state.prev_error = [0.0; AXES];
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn state(&self) -> &PidState {
        &self.state
    }

    pub fn active_mode_index(&self) -> usize {
        self.state.active_mode
    }

    pub fn active_mode(&self) -> Option<&FlightMode> {
        self.modes.get(self.state.active_mode)
    }

    pub fn modes(&self) -> &FlightModeTable {
        &self.modes
    }

    pub fn last_output(&self) -> PidOutput {
        self.last_output
    }

    pub fn status(&self) -> PidStatus {
        PidStatus {
            active_mode: self.state.active_mode,
            mode_name: self.active_mode().map_or("?", |mode| mode.name),
            integral: self.state.integral,
            last_output: self.last_output,
        }
    }
}
