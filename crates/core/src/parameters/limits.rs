//! Hardware safety limits
//!
//! Bounds every value that reaches an actuator or comes in from the RC
//! receiver. PWM duty values are 10-bit counts (1023 = 100 %) of a 50 Hz
//! servo signal.

/// Full-scale value of a 10-bit PWM duty count
pub const PWM_DUTY_FULL_SCALE: u16 = 1023;

/// Safety limits for servos, PWM, RC input and the PID integrator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafetyLimits {
    /// Lowest servo angle ever commanded (degrees)
    pub servo_min_angle: i16,
    /// Highest servo angle ever commanded (degrees)
    pub servo_max_angle: i16,
    /// Centered control surface (degrees)
    pub servo_neutral_angle: i16,
    /// Duty count for 0°
    pub pwm_min_duty: u16,
    /// Duty count for 180°
    pub pwm_max_duty: u16,
    /// Shortest plausible RC pulse (µs)
    pub rc_min_pulse: u16,
    /// Longest plausible RC pulse (µs)
    pub rc_max_pulse: u16,
    /// Pulse reported when no valid measurement exists (µs)
    pub rc_neutral_pulse: u16,
    /// Anti-windup bound on each PID integral
    pub max_pid_integral: f32,
    /// Polling iterations allowed while waiting for a rising edge
    pub sensor_timeout: u32,
    /// Polling iterations allowed while waiting for a falling edge
    pub rc_timeout: u32,
}

impl Default for SafetyLimits {
    fn default() -> Self {
        Self {
            servo_min_angle: 30,
            servo_max_angle: 150,
            servo_neutral_angle: 90,
            pwm_min_duty: 40,
            pwm_max_duty: 115,
            rc_min_pulse: 800,
            rc_max_pulse: 2200,
            rc_neutral_pulse: 1500,
            max_pid_integral: 10.0,
            sensor_timeout: 10_000,
            rc_timeout: 3_000,
        }
    }
}

impl SafetyLimits {
    /// Check that every range is ordered and every bound is usable
    pub fn is_valid(&self) -> bool {
        let servo_ok = self.servo_min_angle >= 0
            && self.servo_max_angle <= 180
            && self.servo_min_angle < self.servo_max_angle
            && (self.servo_min_angle..=self.servo_max_angle).contains(&self.servo_neutral_angle);

        let pwm_ok = self.pwm_min_duty < self.pwm_max_duty && self.pwm_max_duty <= PWM_DUTY_FULL_SCALE;

        let rc_ok = self.rc_min_pulse < self.rc_max_pulse
            && (self.rc_min_pulse..=self.rc_max_pulse).contains(&self.rc_neutral_pulse);

        let pid_ok = self.max_pid_integral.is_finite() && self.max_pid_integral > 0.0;

        servo_ok && pwm_ok && rc_ok && pid_ok && self.sensor_timeout > 0 && self.rc_timeout > 0
    }

    /// Clamp an angle to the servo range
    #[inline]
    pub fn clamp_angle(&self, angle: i32) -> i16 {
        angle.clamp(
            i32::from(self.servo_min_angle),
            i32::from(self.servo_max_angle),
        ) as i16
    }

    /// Whether `angle` lies inside the servo range
    #[inline]
    pub fn angle_in_range(&self, angle: i16) -> bool {
        (self.servo_min_angle..=self.servo_max_angle).contains(&angle)
    }
}
