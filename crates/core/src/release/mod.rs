//! Tow release mechanism
//!
//! A four-state safety machine gates the release servo behind a sustained RC
//! request. The request must stay above the threshold for the whole safety
//! delay while armed; a single sample at or below it never releases.
//!
//! ```text
//!            rc > threshold                held >= safety_delay
//!  Locked ------------------> Armed -------------------------> Releasing
//!    ^  ^   rc < threshold      |                                 |
//!    |  +-----------------------+                                 | release_duration
//!    |                                                            v
//!    +--------------------- auto_lock_delay ------------------ Released
//! ```
//!
//! The emergency command jumps from any state to `Released`.

pub mod machine;
pub mod state;

pub use machine::ReleaseStateMachine;
pub use state::{ReleaseState, ReleaseTransition, TransitionCause};
