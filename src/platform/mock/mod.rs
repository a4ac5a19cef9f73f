//! Mock platform implementation for testing
//!
//! Mock implementations of the platform traits for host tests without
//! hardware. Each mock is a cheap handle to shared state: clone it before
//! moving it into a driver and the clone observes everything the driver
//! does.
//!
//! # Feature Gate
//!
//! Available during test builds and when the `mock` feature is enabled.
//!
//! # Example
//!
//! ```
//! use glider_autopilot::platform::mock::MockGpio;
//! use glider_autopilot::platform::traits::GpioInterface;
//!
//! let led = MockGpio::new_output();
//! let mut driver_side = led.clone();
//! driver_side.set_high().unwrap();
//! assert!(led.read());
//! ```

#![cfg(any(test, feature = "mock"))]

mod gpio;
mod i2c;
mod pwm;
mod timer;

pub use gpio::MockGpio;
pub use i2c::{I2cTransaction, MockI2c};
pub use pwm::MockPwm;
pub use timer::MockTimer;
