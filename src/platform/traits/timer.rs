//! Timer interface trait
//!
//! Blocking delays and a free-running microsecond counter. The control loop
//! sleeps between ticks with [`TimerInterface::delay_us`]; the RC pulse
//! decoder uses one-microsecond delays while polling its input.

use crate::platform::Result;

/// Timer interface trait
pub trait TimerInterface {
    /// Block for `us` microseconds
    fn delay_us(&mut self, us: u32) -> Result<()>;

    /// Block for `ms` milliseconds
    fn delay_ms(&mut self, ms: u32) -> Result<()> {
        self.delay_us(ms.saturating_mul(1000))
    }

    /// Microseconds since the timer started
    fn now_us(&self) -> u64;

    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }
}
