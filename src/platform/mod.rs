//! Platform abstraction layer
//!
//! Hardware access for the glider goes through the traits in [`traits`]:
//! GPIO for LEDs, buttons and the RC input, I2C for the motion sensor, PWM
//! for servos and a timer for delays. Board support crates implement them;
//! the [`mock`] module implements them for host tests.

pub mod error;
pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::{GpioError, I2cError, PlatformError, PwmError, Result, TimerError};
pub use traits::{GpioInterface, GpioMode, I2cConfig, I2cInterface, PwmConfig, PwmInterface, TimerInterface};
