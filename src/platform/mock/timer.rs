//! Mock Timer implementation for testing

use crate::platform::{traits::TimerInterface, Result};
use glider_core::traits::TimeSource;
use std::cell::Cell;
use std::rc::Rc;

/// Simulated clock
///
/// Delays advance the clock instantly. Clones share the same clock, so one
/// handle can serve as the loop's `TimeSource` while another is owned by a
/// driver that sleeps on it.
#[derive(Debug, Clone, Default)]
pub struct MockTimer {
    now_us: Rc<Cell<u64>>,
}

impl MockTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance_us(&self, us: u64) {
        self.now_us.set(self.now_us.get().saturating_add(us));
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance_us(ms.saturating_mul(1000));
    }

    pub fn set_ms(&self, ms: u64) {
        self.now_us.set(ms.saturating_mul(1000));
    }
}

impl TimerInterface for MockTimer {
    fn delay_us(&mut self, us: u32) -> Result<()> {
        self.advance_us(u64::from(us));
        Ok(())
    }

    fn now_us(&self) -> u64 {
        self.now_us.get()
    }
}

impl TimeSource for MockTimer {
    fn now_ms(&self) -> u64 {
        self.now_us.get() / 1000
    }

    fn now_us(&self) -> u64 {
        self.now_us.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_timer_delay_us() {
        let mut timer = MockTimer::new();
        assert_eq!(TimerInterface::now_us(&timer), 0);

        timer.delay_us(1000).unwrap();
        timer.delay_us(500).unwrap();
        assert_eq!(TimerInterface::now_us(&timer), 1500);
    }

    #[test]
    fn test_mock_timer_delay_ms() {
        let mut timer = MockTimer::new();
        timer.delay_ms(5).unwrap();
        assert_eq!(TimerInterface::now_ms(&timer), 5);
    }

    #[test]
    fn test_mock_timer_shared_clock() {
        let clock = MockTimer::new();
        let mut sleeper = clock.clone();
        sleeper.delay_ms(20).unwrap();
        assert_eq!(TimeSource::now_ms(&clock), 20);

        clock.set_ms(1_000);
        assert_eq!(TimeSource::now_us(&sleeper), 1_000_000);
    }
}
