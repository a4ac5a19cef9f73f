//! Mock GPIO implementation for testing

use crate::platform::{
    error::{GpioError, PlatformError},
    traits::{GpioInterface, GpioMode},
    Result,
};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

#[derive(Debug)]
struct PinState {
    level: bool,
    mode: GpioMode,
    /// Scripted input levels as (level, number of reads)
    script: VecDeque<(bool, usize)>,
    reads: usize,
    history: Vec<bool>,
}

/// Mock GPIO pin
///
/// Output writes are recorded. Input pins either return a fixed level or
/// replay a scripted waveform one read at a time, which lets polling code
/// such as the RC pulse decoder see edges.
#[derive(Debug, Clone)]
pub struct MockGpio {
    state: Rc<RefCell<PinState>>,
}

impl MockGpio {
    fn with_mode(mode: GpioMode) -> Self {
        Self {
            state: Rc::new(RefCell::new(PinState {
                level: false,
                mode,
                script: VecDeque::new(),
                reads: 0,
                history: Vec::new(),
            })),
        }
    }

    /// Output pin, initially low
    pub fn new_output() -> Self {
        Self::with_mode(GpioMode::OutputPushPull)
    }

    /// Input pin, initially low
    pub fn new_input() -> Self {
        Self::with_mode(GpioMode::Input)
    }

    /// Set the level returned once any script has been consumed
    pub fn set_input_state(&self, high: bool) {
        self.state.borrow_mut().level = high;
    }

    /// Queue a waveform as `(level, reads)` runs
    ///
    /// Each run is returned for the given number of `read` calls. When the
    /// script runs out, the pin keeps the level of the last run.
    pub fn set_input_sequence(&self, runs: &[(bool, usize)]) {
        let mut state = self.state.borrow_mut();
        state.script = runs.iter().copied().filter(|(_, n)| *n > 0).collect();
        if let Some((level, _)) = runs.last() {
            state.level = *level;
        }
    }

    /// Number of `read` calls so far
    pub fn read_count(&self) -> usize {
        self.state.borrow().reads
    }

    /// Every level written to the pin, oldest first
    pub fn history(&self) -> Vec<bool> {
        self.state.borrow().history.clone()
    }

    fn write(&mut self, high: bool) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if !state.mode.is_output() {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        state.level = high;
        state.history.push(high);
        Ok(())
    }
}

impl GpioInterface for MockGpio {
    fn set_high(&mut self) -> Result<()> {
        self.write(true)
    }

    fn set_low(&mut self) -> Result<()> {
        self.write(false)
    }

    fn read(&self) -> bool {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        state.reads += 1;
        match state.script.front_mut() {
            Some(front) => {
                let level = front.0;
                front.1 -= 1;
                if front.1 == 0 {
                    state.script.pop_front();
                }
                level
            }
            None => state.level,
        }
    }

    fn set_mode(&mut self, mode: GpioMode) -> Result<()> {
        self.state.borrow_mut().mode = mode;
        Ok(())
    }

    fn mode(&self) -> GpioMode {
        self.state.borrow().mode
    }
}
