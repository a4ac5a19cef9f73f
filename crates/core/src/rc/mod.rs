//! RC release channel input
//!
//! Pulse widths from the receiver are only trusted inside the configured
//! plausible range; everything else is reported as the neutral pulse.
//!
//! Two measurement strategies exist in the `glider_autopilot` crate. The polling
//! decoder measures inside the tick. The interrupt-driven one timestamps
//! edges in an ISR through [`PulseCapture`] and hands the width to the loop
//! through the single-slot [`PulseSlot`], which never blocks either side.

pub mod capture;

pub use capture::{PulseCapture, PulseReading, PulseSlot};

use crate::parameters::SafetyLimits;

/// Accept a measured width or substitute the neutral pulse
///
/// # Arguments
///
/// * `width_us` - Measured high time in microseconds
/// * `limits` - Accepted pulse range and neutral value
///
/// # Returns
///
/// `width_us` if it lies in `[rc_min_pulse, rc_max_pulse]`, otherwise
/// `rc_neutral_pulse`
pub fn validate_pulse(width_us: u32, limits: &SafetyLimits) -> u16 {
    let min = u32::from(limits.rc_min_pulse);
    let max = u32::from(limits.rc_max_pulse);
    if (min..=max).contains(&width_us) {
        width_us as u16
    } else {
        limits.rc_neutral_pulse
    }
}
