//! Monotonic time source for the control loop.
//!
//! The glider loop needs two clocks: milliseconds for the release state
//! machine, telemetry throttling and RC rate limiting, and microseconds for
//! loop timing statistics. Both come from a single `TimeSource` so every
//! component of a tick observes the same instant.

use core::cell::Cell;

/// Monotonic time since system start.
///
/// # Example
///
/// ```
/// use glider_core::traits::{MockTime, TimeSource};
///
/// let time = MockTime::new();
/// let armed_at = time.now_ms();
/// time.advance_ms(2_000);
/// assert_eq!(time.elapsed_ms_since(armed_at), 2_000);
/// ```
pub trait TimeSource {
    /// Current time in milliseconds since system start.
    fn now_ms(&self) -> u64;

    /// Current time in microseconds since system start.
    fn now_us(&self) -> u64;

    /// Milliseconds elapsed since `reference_ms`, saturating at zero when the
    /// reference lies in the future.
    fn elapsed_ms_since(&self, reference_ms: u64) -> u64 {
        self.now_ms().saturating_sub(reference_ms)
    }

    /// Microseconds elapsed since `reference_us`, saturating at zero.
    fn elapsed_us_since(&self, reference_us: u64) -> u64 {
        self.now_us().saturating_sub(reference_us)
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }

    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}

/// Manually driven clock for host tests.
///
/// Time only moves when the test calls [`MockTime::advance_ms`],
/// [`MockTime::advance_us`] or [`MockTime::set_ms`]. Interior mutability
/// lets the clock be advanced while components hold a shared reference.
#[derive(Debug, Default)]
pub struct MockTime {
    current_us: Cell<u64>,
}

impl MockTime {
    /// Clock starting at zero.
    pub const fn new() -> Self {
        Self {
            current_us: Cell::new(0),
        }
    }

    /// Clock starting at `ms` milliseconds.
    pub const fn starting_at_ms(ms: u64) -> Self {
        Self {
            current_us: Cell::new(ms * 1000),
        }
    }

    /// Jump to an absolute time in milliseconds.
    pub fn set_ms(&self, ms: u64) {
        self.current_us.set(ms.saturating_mul(1000));
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance_us(ms.saturating_mul(1000));
    }

    pub fn advance_us(&self, us: u64) {
        self.current_us.set(self.current_us.get().saturating_add(us));
    }
}

impl TimeSource for MockTime {
    fn now_ms(&self) -> u64 {
        self.current_us.get() / 1000
    }

    fn now_us(&self) -> u64 {
        self.current_us.get()
    }
}
