//! Push-button input
//!
//! Buttons are wired active-low with pull-ups: a pressed button reads low.
//! Edge detection and debouncing live in `glider_core::input`.

use crate::platform::traits::GpioInterface;
use glider_core::input::{ButtonDebouncer, ButtonEvents};
use glider_core::parameters::SystemParams;

/// Source of debounced button clicks
pub trait ButtonInput {
    /// Sample the buttons once
    fn read(&mut self, now_ms: u64) -> ButtonEvents;
}

/// Mode button plus optional power button on GPIO
pub struct GpioButtons<G: GpioInterface> {
    mode: G,
    power: Option<G>,
    debouncer: ButtonDebouncer,
}

impl<G: GpioInterface> GpioButtons<G> {
    pub fn new(mode: G, power: Option<G>, debounce_ms: u32) -> Self {
        Self {
            mode,
            power,
            debouncer: ButtonDebouncer::new(debounce_ms),
        }
    }

    /// Buttons debounced by `button_debounce_ms`
    pub fn from_config(mode: G, power: Option<G>, params: &SystemParams) -> Self {
        Self::new(mode, power, params.button_debounce_ms)
    }

    pub fn has_power_button(&self) -> bool {
        self.power.is_some()
    }
}

impl<G: GpioInterface> ButtonInput for GpioButtons<G> {
    fn read(&mut self, now_ms: u64) -> ButtonEvents {
        let mode_pressed = !self.mode.read();
        let power_pressed = self.power.as_ref().map(|pin| !pin.read());
        let events = self.debouncer.update(mode_pressed, power_pressed, now_ms);
        if events.any() {
            crate::log_debug!(
                "Button click: mode={} power={}",
                events.mode_clicked,
                events.power_clicked
            );
        }
        events
    }
}
