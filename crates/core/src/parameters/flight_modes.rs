//! Flight mode table
//!
//! A flight mode bundles the PID gains, axis deflection limits, attitude
//! targets and flap bias used while it is active. The table is built once,
//! validated once, and afterwards only indexed by the active-mode index.
//!
//! # Built-in modes
//!
//! | Index | Name       | Flaps | Purpose                           |
//! |-------|------------|-------|-----------------------------------|
//! | 0     | `STANDARD` | 0     | General stabilized glide          |
//! | 1     | `THERMAL`  | 10    | Soft gains for circling in lift   |
//! | 2     | `LANDING`  | 35    | Firm gains, nose slightly down    |

use super::error::ConfigError;
use heapless::Vec;

/// Maximum number of flight modes a table can hold
pub const MAX_FLIGHT_MODES: usize = 8;

/// Kp/Ki/Kd for a single axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisGains {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
}

impl AxisGains {
    pub const fn new(kp: f32, ki: f32, kd: f32) -> Self {
        Self { kp, ki, kd }
    }

    fn is_finite(&self) -> bool {
        self.kp.is_finite() && self.ki.is_finite() && self.kd.is_finite()
    }
}

/// PID gains for roll, pitch and yaw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidGains {
    pub roll: AxisGains,
    pub pitch: AxisGains,
    pub yaw: AxisGains,
}

impl PidGains {
    /// Build from the flat `(Kp, Ki, Kd) × (roll, pitch, yaw)` layout
    pub const fn from_array(g: [f32; 9]) -> Self {
        Self {
            roll: AxisGains::new(g[0], g[1], g[2]),
            pitch: AxisGains::new(g[3], g[4], g[5]),
            yaw: AxisGains::new(g[6], g[7], g[8]),
        }
    }

    /// Gains indexed by axis (0 = roll, 1 = pitch, 2 = yaw)
    pub const fn axes(&self) -> [AxisGains; 3] {
        [self.roll, self.pitch, self.yaw]
    }
}

/// Maximum absolute PID output per axis, in degrees of deflection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisLimits {
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
}

impl AxisLimits {
    pub const fn new(roll: f32, pitch: f32, yaw: f32) -> Self {
        Self { roll, pitch, yaw }
    }

    pub const fn axes(&self) -> [f32; 3] {
        [self.roll, self.pitch, self.yaw]
    }
}

/// Roll and pitch setpoints in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AttitudeTarget {
    pub roll: f32,
    pub pitch: f32,
}

/// A named stabilization profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightMode {
    /// Position of this mode in its table
    pub id: u8,
    pub name: &'static str,
    pub gains: PidGains,
    pub limits: AxisLimits,
    pub target: AttitudeTarget,
    /// Flap offset from neutral in degrees
    pub flaps_bias: i16,
}

impl FlightMode {
    /// Check gains, limits and targets
    ///
    /// # Returns
    ///
    /// The first problem found, keyed by this mode's id
    pub fn validate(&self) -> Result<(), ConfigError> {
        let gains_ok = self.gains.axes().iter().all(AxisGains::is_finite);
        if !gains_ok {
            return Err(ConfigError::InvalidGains { mode: self.id });
        }

        let limits_ok = self
            .limits
            .axes()
            .iter()
            .all(|limit| limit.is_finite() && *limit > 0.0);
        if !limits_ok {
            return Err(ConfigError::InvalidLimits { mode: self.id });
        }

        if !self.target.roll.is_finite() || !self.target.pitch.is_finite() {
            return Err(ConfigError::InvalidTarget { mode: self.id });
        }

        Ok(())
    }
}

/// General stabilized glide
pub const STANDARD_MODE: FlightMode = FlightMode {
    id: 0,
    name: "STANDARD",
    gains: PidGains::from_array([2.0, 0.15, 1.0, 2.5, 0.18, 1.2, 1.2, 0.06, 0.5]),
    limits: AxisLimits::new(25.0, 30.0, 18.0),
    target: AttitudeTarget {
        roll: 0.0,
        pitch: 0.0,
    },
    flaps_bias: 0,
};

/// Soft gains and some flap for circling in thermals
pub const THERMAL_MODE: FlightMode = FlightMode {
    id: 1,
    name: "THERMAL",
    gains: PidGains::from_array([1.5, 0.05, 0.8, 1.0, 0.03, 0.9, 1.0, 0.04, 0.4]),
    limits: AxisLimits::new(20.0, 25.0, 15.0),
    target: AttitudeTarget {
        roll: 0.0,
        pitch: 0.0,
    },
    flaps_bias: 10,
};

/// Firm gains, full flap and a shallow descent attitude
pub const LANDING_MODE: FlightMode = FlightMode {
    id: 2,
    name: "LANDING",
    gains: PidGains::from_array([2.5, 0.10, 1.2, 1.8, 0.07, 1.4, 1.5, 0.08, 0.6]),
    limits: AxisLimits::new(30.0, 35.0, 20.0),
    target: AttitudeTarget {
        roll: 0.0,
        pitch: -3.0,
    },
    flaps_bias: 35,
};

/// Ordered, validated set of flight modes
#[derive(Debug, Clone)]
pub struct FlightModeTable {
    modes: Vec<FlightMode, MAX_FLIGHT_MODES>,
}

impl FlightModeTable {
    /// Build a table from a slice of modes
    ///
    /// Each mode's `id` must equal its index in `modes`.
    pub fn new(modes: &[FlightMode]) -> Result<Self, ConfigError> {
        if modes.is_empty() {
            return Err(ConfigError::EmptyModeTable);
        }

        let mut table = Vec::new();
        for (index, mode) in modes.iter().enumerate() {
            if usize::from(mode.id) != index {
                return Err(ConfigError::ModeIdMismatch { index, id: mode.id });
            }
            mode.validate()?;
            table.push(*mode).map_err(|_| ConfigError::TooManyModes)?;
        }

        Ok(Self { modes: table })
    }

    /// Re-run validation on every mode
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.modes.is_empty() {
            return Err(ConfigError::EmptyModeTable);
        }
        self.modes.iter().try_for_each(FlightMode::validate)
    }

    pub fn get(&self, index: usize) -> Option<&FlightMode> {
        self.modes.get(index)
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, FlightMode> {
        self.modes.iter()
    }

    /// Index following `index`, wrapping back to the first mode
    pub fn next_index(&self, index: usize) -> usize {
        if self.modes.is_empty() {
            0
        } else {
            (index + 1) % self.modes.len()
        }
    }
}

impl Default for FlightModeTable {
    fn default() -> Self {
        let mut modes = Vec::new();
        for mode in [STANDARD_MODE, THERMAL_MODE, LANDING_MODE] {
            // Capacity exceeds the built-in mode count
            let _ = modes.push(mode);
        }
        Self { modes }
    }
}
