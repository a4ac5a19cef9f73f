//! Release state machine
//!
//! | State     | Condition                                   | Next        |
//! |-----------|---------------------------------------------|-------------|
//! | Locked    | rc > threshold                              | Armed       |
//! | Armed     | rc < threshold                              | Locked      |
//! | Armed     | now - armed_at >= safety_delay, rc > thresh | Releasing   |
//! | Releasing | now - release_at >= release_duration        | Released    |
//! | Released  | now - release_at >= auto_lock_delay         | Locked      |
//!
//! At most one transition happens per update. The servo angle is a pure
//! function of the state.

use super::state::{ReleaseState, ReleaseTransition, TransitionCause};
use crate::parameters::ReleaseParams;

/// Safety-gated release controller
#[derive(Debug, Clone)]
pub struct ReleaseStateMachine {
    params: ReleaseParams,
    state: ReleaseState,
    armed_at_ms: u64,
    release_at_ms: u64,
}

impl ReleaseStateMachine {
    /// New machine in `Locked`
    pub fn new(params: ReleaseParams) -> Self {
        Self {
            params,
            state: ReleaseState::Locked,
            armed_at_ms: 0,
            release_at_ms: 0,
        }
    }

    /// Advance the machine with a fresh RC pulse
    ///
    /// # Arguments
    ///
    /// * `rc_pulse` - Validated RC pulse width (µs)
    /// * `now_ms` - Current time
    ///
    /// # Returns
    ///
    /// The transition taken, if any
    pub fn update(&mut self, rc_pulse: u16, now_ms: u64) -> Option<ReleaseTransition> {
        let threshold = self.params.rc_threshold;

        let (next, cause) = match self.state {
            ReleaseState::Locked if rc_pulse > threshold => {
                self.armed_at_ms = now_ms;
                (ReleaseState::Armed, TransitionCause::RcAboveThreshold)
            }
            ReleaseState::Armed if rc_pulse < threshold => {
                (ReleaseState::Locked, TransitionCause::RcBelowThreshold)
            }
            ReleaseState::Armed
                if rc_pulse > threshold
                    && now_ms.saturating_sub(self.armed_at_ms)
                        >= u64::from(self.params.safety_delay_ms) =>
            {
                self.release_at_ms = now_ms;
                (ReleaseState::Releasing, TransitionCause::SafetyDelayElapsed)
            }
            ReleaseState::Releasing
                if self.since_release(now_ms) >= u64::from(self.params.release_duration_ms) =>
            {
                (ReleaseState::Released, TransitionCause::ReleaseComplete)
            }
            ReleaseState::Released
                if self.since_release(now_ms) >= u64::from(self.params.auto_lock_delay_ms) =>
            {
                (ReleaseState::Locked, TransitionCause::AutoLock)
            }
            _ => return None,
        };

        Some(self.transition(next, cause, now_ms))
    }

    /// Jump straight to `Released`, bypassing the safety delay
    ///
    /// # Returns
    ///
    /// The transition, or `None` when the override is disabled
    pub fn emergency_release(&mut self, now_ms: u64) -> Option<ReleaseTransition> {
        if !self.params.emergency_override {
            return None;
        }
        self.release_at_ms = now_ms;
        Some(self.transition(ReleaseState::Released, TransitionCause::Emergency, now_ms))
    }

    /// Immediately return to `Locked` from any state
    pub fn force_lock(&mut self, now_ms: u64) -> ReleaseTransition {
        self.transition(ReleaseState::Locked, TransitionCause::Forced, now_ms)
    }

    /// Lock without a timestamp, for paths that have no clock at hand
    pub fn lock(&mut self) -> ReleaseTransition {
        self.force_lock(self.release_at_ms.max(self.armed_at_ms))
    }

    fn transition(
        &mut self,
        to: ReleaseState,
        cause: TransitionCause,
        now_ms: u64,
    ) -> ReleaseTransition {
        let from = self.state;
        self.state = to;
        ReleaseTransition {
            from,
            to,
            cause,
            servo_angle: self.servo_angle(),
            at_ms: now_ms,
        }
    }

    fn since_release(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.release_at_ms)
    }

    /// Release servo angle for the current state
    pub fn servo_angle(&self) -> i16 {
        if self.state.is_open() {
            self.params.release_angle
        } else {
            self.params.locked_angle
        }
    }

    pub fn state(&self) -> ReleaseState {
        self.state
    }

    pub fn armed_at_ms(&self) -> u64 {
        self.armed_at_ms
    }

    pub fn release_at_ms(&self) -> u64 {
        self.release_at_ms
    }

    pub fn params(&self) -> &ReleaseParams {
        &self.params
    }
}
