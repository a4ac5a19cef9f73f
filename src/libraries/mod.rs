//! Hardware adapter libraries
//!
//! Thin layers between the platform traits and the control loop.
//!
//! ## Libraries
//!
//! - `buttons`: Active-low push buttons with debouncing
//! - `indicator`: Status LEDs
//! - `rc_channel`: RC release channel pulse measurement
//! - `srv_channel`: Control-surface and release servo outputs

pub mod buttons;
pub mod indicator;
pub mod rc_channel;
pub mod srv_channel;

pub use buttons::{ButtonInput, GpioButtons};
pub use indicator::{LedIndicators, VisualFeedback};
pub use rc_channel::{CapturedPulseSource, PulseWidthDecoder, RcError, RcPulseSource, RcStatus};
pub use srv_channel::{ActuatorInitError, ActuatorInterface, ServoActuators, ServoChannel, ServoChannels};
