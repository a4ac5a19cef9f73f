//! Status LED output
//!
//! The control loop computes an `IndicatorFrame` each tick and pushes it
//! through [`VisualFeedback`]. [`LedIndicators`] drives plain GPIO LEDs;
//! any LED may be left unfitted.

use crate::platform::traits::GpioInterface;
use crate::platform::PlatformError;
use glider_core::indicator::{Indicator, IndicatorFrame};

/// Visual feedback sink
pub trait VisualFeedback {
    /// Switch one indicator on or off; unfitted indicators are ignored
    fn set_pattern(&mut self, indicator: Indicator, on: bool) -> Result<(), PlatformError>;

    /// Switch every indicator off
    fn all_off(&mut self) -> Result<(), PlatformError>;

    /// Apply a whole frame, stopping at the first failure
    fn show(&mut self, frame: &IndicatorFrame) -> Result<(), PlatformError> {
        for indicator in Indicator::ALL {
            self.set_pattern(indicator, frame.level(indicator))?;
        }
        Ok(())
    }
}

/// GPIO-driven status LEDs
pub struct LedIndicators<G: GpioInterface> {
    system_active: Option<G>,
    mode: Option<G>,
    release: Option<G>,
    alert: Option<G>,
}

impl<G: GpioInterface> LedIndicators<G> {
    pub fn new(system_active: Option<G>, mode: Option<G>, release: Option<G>, alert: Option<G>) -> Self {
        Self {
            system_active,
            mode,
            release,
            alert,
        }
    }

    /// Number of fitted LEDs
    pub fn fitted(&self) -> usize {
        Indicator::ALL
            .iter()
            .filter(|indicator| self.led(**indicator).is_some())
            .count()
    }

    fn led(&self, indicator: Indicator) -> Option<&G> {
        match indicator {
            Indicator::SystemActive => self.system_active.as_ref(),
            Indicator::Mode => self.mode.as_ref(),
            Indicator::Release => self.release.as_ref(),
            Indicator::Alert => self.alert.as_ref(),
        }
    }

    fn led_mut(&mut self, indicator: Indicator) -> Option<&mut G> {
        match indicator {
            Indicator::SystemActive => self.system_active.as_mut(),
            Indicator::Mode => self.mode.as_mut(),
            Indicator::Release => self.release.as_mut(),
            Indicator::Alert => self.alert.as_mut(),
        }
    }
}

impl<G: GpioInterface> VisualFeedback for LedIndicators<G> {
    fn set_pattern(&mut self, indicator: Indicator, on: bool) -> Result<(), PlatformError> {
        match self.led_mut(indicator) {
            Some(led) => led.set_level(on),
            None => Ok(()),
        }
    }

    fn all_off(&mut self) -> Result<(), PlatformError> {
        let mut result = Ok(());
        for indicator in Indicator::ALL {
            if let Err(e) = self.set_pattern(indicator, false) {
                result = Err(e);
            }
        }
        result
    }
}
