//! Mock PWM implementation for testing

use crate::platform::{
    error::{PlatformError, PwmError},
    traits::{PwmConfig, PwmInterface},
    Result,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

#[derive(Debug)]
struct ChannelState {
    duty_cycle: f32,
    frequency: u32,
    enabled: bool,
    duty_history: Vec<f32>,
    fail_frequency: bool,
}

/// Mock PWM channel
///
/// Tracks duty cycle, frequency and enable state, and records every duty
/// cycle written.
#[derive(Debug, Clone)]
pub struct MockPwm {
    state: Rc<RefCell<ChannelState>>,
}

impl MockPwm {
    pub fn new(config: PwmConfig) -> Self {
        Self {
            state: Rc::new(RefCell::new(ChannelState {
                duty_cycle: config.duty_cycle,
                frequency: config.frequency,
                enabled: false,
                duty_history: Vec::new(),
                fail_frequency: false,
            })),
        }
    }

    /// Make `set_frequency` fail, simulating a channel that cannot be set up
    pub fn fail_frequency(&self) {
        self.state.borrow_mut().fail_frequency = true;
    }

    pub fn duty_history(&self) -> Vec<f32> {
        self.state.borrow().duty_history.clone()
    }
}

impl PwmInterface for MockPwm {
    fn set_duty_cycle(&mut self, duty_cycle: f32) -> Result<()> {
        if !(0.0..=1.0).contains(&duty_cycle) {
            return Err(PlatformError::Pwm(PwmError::InvalidDutyCycle));
        }
        let mut state = self.state.borrow_mut();
        state.duty_cycle = duty_cycle;
        state.duty_history.push(duty_cycle);
        Ok(())
    }

    fn duty_cycle(&self) -> f32 {
        self.state.borrow().duty_cycle
    }

    fn set_frequency(&mut self, frequency: u32) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if frequency == 0 || state.fail_frequency {
            return Err(PlatformError::Pwm(PwmError::InvalidFrequency));
        }
        state.frequency = frequency;
        Ok(())
    }

    fn frequency(&self) -> u32 {
        self.state.borrow().frequency
    }

    fn enable(&mut self) {
        self.state.borrow_mut().enabled = true;
    }

    fn disable(&mut self) {
        self.state.borrow_mut().enabled = false;
    }

    fn is_enabled(&self) -> bool {
        self.state.borrow().enabled
    }
}
