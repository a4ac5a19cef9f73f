//! Push-button click detection
//!
//! Buttons are sampled once per tick. A click is a released-to-pressed edge.
//! After any click, both buttons are ignored for the debounce window.

/// Clicks detected in one sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonEvents {
    pub mode_clicked: bool,
    pub power_clicked: bool,
}

impl ButtonEvents {
    pub const fn any(&self) -> bool {
        self.mode_clicked || self.power_clicked
    }
}

/// Edge detector with a shared debounce window
#[derive(Debug, Clone, Copy)]
pub struct ButtonDebouncer {
    debounce_ms: u32,
    last_click_ms: Option<u64>,
    mode_was_pressed: bool,
    power_was_pressed: bool,
}

impl ButtonDebouncer {
    pub const fn new(debounce_ms: u32) -> Self {
        Self {
            debounce_ms,
            last_click_ms: None,
            mode_was_pressed: false,
            power_was_pressed: false,
        }
    }

    /// Feed one sample of both buttons
    ///
    /// # Arguments
    ///
    /// * `mode_pressed` - Mode button level (true = pressed)
    /// * `power_pressed` - Power button level, `None` when not fitted
    /// * `now_ms` - Sample time
    pub fn update(
        &mut self,
        mode_pressed: bool,
        power_pressed: Option<bool>,
        now_ms: u64,
    ) -> ButtonEvents {
        if let Some(last) = self.last_click_ms {
            if now_ms.saturating_sub(last) < u64::from(self.debounce_ms) {
                return ButtonEvents::default();
            }
        }

        let events = ButtonEvents {
            mode_clicked: mode_pressed && !self.mode_was_pressed,
            power_clicked: power_pressed.unwrap_or(false) && !self.power_was_pressed,
        };

        self.mode_was_pressed = mode_pressed;
        self.power_was_pressed = power_pressed.unwrap_or(false);
        if events.any() {
            self.last_click_ms = Some(now_ms);
        }
        events
    }
}
