//! Glider control system
//!
//! [`GliderSystem`] wires the attitude source, stabilizer, release state
//! machine and hardware adapters into one fixed-rate tick. The loop driver
//! that calls it lives in `core::scheduler::control`.
//!
//! ## Tick order
//!
//! 1. Buttons (mode cycle / activate, deactivate / emergency release)
//! 2. Attitude sample
//! 3. PID and mixer when active, neutral servos otherwise
//! 4. RC pulse into the release state machine
//! 5. Status LEDs
//! 6. Periodic status snapshot
//!
//! While the startup self-test runs, ticks drive its timeline instead of
//! steps 1 to 5.
//!
//! Any failure inside a tick is logged and answered by centering the
//! control surfaces; `tick()` itself never fails.

pub mod status;
pub mod system;

pub use status::{Capabilities, StatusSnapshot, TickError, TickReport};
pub use system::{GliderHardware, GliderSystem};
