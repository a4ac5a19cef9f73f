//! Interrupt-side pulse capture and single-slot exchange
//!
//! [`PulseCapture`] is fed by an edge interrupt and publishes each completed
//! pulse into its [`PulseSlot`]. The control loop reads the slot whenever it
//! likes; the latest width wins and neither side ever waits.
//!
//! Only one producer may write a slot. Publishing uses plain loads and
//! stores, so targets without compare-and-swap are supported.

use core::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, Ordering};

/// Latest pulse width and its publication counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseReading {
    pub width_us: u16,
    /// Incremented on every publish; 0 means nothing published yet
    pub sequence: u32,
}

/// Single-slot, non-blocking pulse width exchange
#[derive(Debug)]
pub struct PulseSlot {
    width_us: AtomicU16,
    sequence: AtomicU32,
}

impl PulseSlot {
    pub const fn new() -> Self {
        Self {
            width_us: AtomicU16::new(0),
            sequence: AtomicU32::new(0),
        }
    }

    /// Overwrite the slot with a new width (single producer)
    pub fn publish(&self, width_us: u16) {
        self.width_us.store(width_us, Ordering::Relaxed);
        let next = self.sequence.load(Ordering::Relaxed).wrapping_add(1).max(1);
        self.sequence.store(next, Ordering::Release);
    }

    /// Most recently published value
    pub fn latest(&self) -> PulseReading {
        let sequence = self.sequence.load(Ordering::Acquire);
        PulseReading {
            width_us: self.width_us.load(Ordering::Relaxed),
            sequence,
        }
    }
}

impl Default for PulseSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Edge timestamping for one RC input
///
/// Call [`on_rising`](Self::on_rising) and [`on_falling`](Self::on_falling)
/// from the pin's edge interrupt with a free-running microsecond counter.
/// Counter wrap-around is handled.
#[derive(Debug)]
pub struct PulseCapture {
    rise_us: AtomicU32,
    high: AtomicBool,
    slot: PulseSlot,
}

impl PulseCapture {
    pub const fn new() -> Self {
        Self {
            rise_us: AtomicU32::new(0),
            high: AtomicBool::new(false),
            slot: PulseSlot::new(),
        }
    }

    pub fn on_rising(&self, now_us: u32) {
        self.rise_us.store(now_us, Ordering::Relaxed);
        self.high.store(true, Ordering::Release);
    }

    /// Complete a pulse and publish its width
    ///
    /// A falling edge without a preceding rising edge is ignored.
    pub fn on_falling(&self, now_us: u32) {
        // Load-then-store; the ISR is the only writer
        if !self.high.load(Ordering::Acquire) {
            return;
        }
        self.high.store(false, Ordering::Relaxed);
        let width = now_us.wrapping_sub(self.rise_us.load(Ordering::Relaxed));
        self.slot.publish(u16::try_from(width).unwrap_or(u16::MAX));
    }

    pub fn slot(&self) -> &PulseSlot {
        &self.slot
    }
}

impl Default for PulseCapture {
    fn default() -> Self {
        Self::new()
    }
}
