//! Loop metadata and runtime statistics

/// Static description of a periodic task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskMetadata {
    /// Name used in log output
    pub name: &'static str,

    /// Target rate in Hz
    pub rate_hz: u32,

    /// Execution time budget in microseconds
    ///
    /// A tick that runs longer counts as a deadline miss. The default budget
    /// is 80 % of the period, leaving the rest for the inter-tick sleep.
    pub budget_us: u32,
}

impl TaskMetadata {
    /// Metadata with the default budget for `rate_hz`
    pub const fn new(name: &'static str, rate_hz: u32) -> Self {
        let rate_hz = if rate_hz == 0 { 1 } else { rate_hz };
        Self {
            name,
            rate_hz,
            budget_us: 1_000_000 / rate_hz * 4 / 5,
        }
    }

    /// Period in microseconds
    #[inline]
    pub const fn period_us(&self) -> u32 {
        1_000_000 / self.rate_hz
    }

    #[inline]
    pub const fn is_within_budget(&self, execution_us: u32) -> bool {
        execution_us <= self.budget_us
    }

    /// Time left in the period after a tick of `execution_us`
    #[inline]
    pub const fn remaining_us(&self, execution_us: u32) -> u32 {
        self.period_us().saturating_sub(execution_us)
    }
}

/// Runtime statistics of a periodic task
///
/// Averages are exponential moving averages with alpha = 0.1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub last_execution_us: u32,
    pub avg_execution_us: u32,
    pub max_execution_us: u32,

    /// Ticks whose execution exceeded the budget
    pub deadline_misses: u32,

    /// Ticks that overran the whole period, leaving no time to sleep
    pub overruns: u32,

    /// Time between the starts of the last two ticks
    pub last_period_us: u32,
    pub avg_period_us: u32,

    /// Average absolute deviation of the period from its target
    pub avg_jitter_us: u32,

    pub execution_count: u64,
}

impl TaskStats {
    /// Record one tick
    ///
    /// # Arguments
    ///
    /// * `execution_us` - Duration of the tick body
    /// * `period_us` - Time since the previous tick started (0 on the first tick)
    /// * `task` - Target rate and budget
    pub fn update(&mut self, execution_us: u32, period_us: u32, task: &TaskMetadata) {
        self.last_execution_us = execution_us;
        self.execution_count = self.execution_count.saturating_add(1);
        self.avg_execution_us = ema(self.avg_execution_us, execution_us);
        self.max_execution_us = self.max_execution_us.max(execution_us);

        if !task.is_within_budget(execution_us) {
            self.deadline_misses = self.deadline_misses.saturating_add(1);
        }
        if execution_us >= task.period_us() {
            self.overruns = self.overruns.saturating_add(1);
        }

        if period_us > 0 {
            self.last_period_us = period_us;
            self.avg_period_us = ema(self.avg_period_us, period_us);
            let jitter = period_us.abs_diff(task.period_us());
            self.avg_jitter_us = ema(self.avg_jitter_us, jitter);
        }
    }

    /// Loop rate derived from the average period, or 0 before two ticks
    pub fn measured_rate_hz(&self) -> u32 {
        if self.avg_period_us == 0 {
            0
        } else {
            (1_000_000 + self.avg_period_us / 2) / self.avg_period_us
        }
    }

    /// Share of the period spent executing, in percent
    pub fn load_percent(&self, task: &TaskMetadata) -> u8 {
        let load = u64::from(self.avg_execution_us) * 100 / u64::from(task.period_us().max(1));
        load.min(100) as u8
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// avg_new = (value + 9 * avg_old) / 10, seeded by the first value
fn ema(avg: u32, value: u32) -> u32 {
    if avg == 0 {
        value
    } else {
        ((u64::from(value) + 9 * u64::from(avg)) / 10) as u32
    }
}
