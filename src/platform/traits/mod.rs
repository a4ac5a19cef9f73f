//! Platform abstraction traits
//!
//! All traits are blocking. The control loop is a single cooperative task,
//! so no operation here may wait longer than one bus transaction or the
//! requested delay.

pub mod gpio;
pub mod i2c;
pub mod pwm;
pub mod timer;

pub use gpio::{GpioInterface, GpioMode};
pub use i2c::{I2cConfig, I2cInterface};
pub use pwm::{PwmConfig, PwmInterface};
pub use timer::TimerInterface;
