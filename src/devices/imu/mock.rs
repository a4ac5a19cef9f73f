//! Mock attitude sensor for testing
//!
//! Probe answers and read results are scripted through a shared handle, so a
//! test can keep one clone while the attitude source owns another.

use crate::devices::traits::{AttitudeSensor, AttitudeSensorError};
use glider_core::attitude::RawMotion;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

#[derive(Debug)]
struct SensorState {
    present: bool,
    reading: RawMotion,
    /// One-shot results consumed before `reading` is returned
    script: VecDeque<Result<RawMotion, AttitudeSensorError>>,
    probes: usize,
    reads: usize,
}

/// Scripted motion sensor
#[derive(Debug, Clone)]
pub struct MockAttitudeSensor {
    state: Rc<RefCell<SensorState>>,
}

impl MockAttitudeSensor {
    /// Sensor that answers probes and reads level flight
    pub fn present() -> Self {
        Self::with_presence(true)
    }

    /// Sensor that never answers
    pub fn absent() -> Self {
        Self::with_presence(false)
    }

    fn with_presence(present: bool) -> Self {
        Self {
            state: Rc::new(RefCell::new(SensorState {
                present,
                reading: RawMotion::new(0, 0, 16384, 0),
                script: VecDeque::new(),
                probes: 0,
                reads: 0,
            })),
        }
    }

    pub fn set_present(&self, present: bool) {
        self.state.borrow_mut().present = present;
    }

    /// Reading returned once the script is empty
    pub fn set_reading(&self, reading: RawMotion) {
        self.state.borrow_mut().reading = reading;
    }

    /// Queue one read result
    pub fn push_result(&self, result: Result<RawMotion, AttitudeSensorError>) {
        self.state.borrow_mut().script.push_back(result);
    }

    pub fn probe_count(&self) -> usize {
        self.state.borrow().probes
    }

    pub fn read_count(&self) -> usize {
        self.state.borrow().reads
    }
}

impl AttitudeSensor for MockAttitudeSensor {
    fn probe(&mut self) -> bool {
        let mut state = self.state.borrow_mut();
        state.probes += 1;
        state.present
    }

    fn read_raw(&mut self) -> Result<RawMotion, AttitudeSensorError> {
        let mut state = self.state.borrow_mut();
        state.reads += 1;
        if let Some(result) = state.script.pop_front() {
            return result;
        }
        if state.present {
            Ok(state.reading)
        } else {
            Err(AttitudeSensorError::Unavailable)
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
