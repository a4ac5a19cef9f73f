//! Release states and transitions

/// Release mechanism state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReleaseState {
    /// Hook closed, no request
    #[default]
    Locked,
    /// Request seen, waiting out the safety delay
    Armed,
    /// Servo at release angle, hook opening
    Releasing,
    /// Hook open, waiting for auto-lock
    Released,
}

impl ReleaseState {
    /// Whether the release servo sits at the release angle
    pub const fn is_open(&self) -> bool {
        matches!(self, ReleaseState::Releasing | ReleaseState::Released)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            ReleaseState::Locked => "LOCKED",
            ReleaseState::Armed => "ARMED",
            ReleaseState::Releasing => "RELEASING",
            ReleaseState::Released => "RELEASED",
        }
    }
}

impl core::fmt::Display for ReleaseState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reason for a state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionCause {
    /// RC pulse rose above the threshold
    RcAboveThreshold,
    /// RC pulse dropped below the threshold while armed
    RcBelowThreshold,
    /// Request held for the full safety delay
    SafetyDelayElapsed,
    /// Release duration elapsed
    ReleaseComplete,
    /// Auto-lock delay elapsed
    AutoLock,
    /// Emergency command bypassed the safety delay
    Emergency,
    /// Administrative lock (startup, shutdown, error recovery)
    Forced,
}

impl TransitionCause {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransitionCause::RcAboveThreshold => "rc above threshold",
            TransitionCause::RcBelowThreshold => "rc below threshold",
            TransitionCause::SafetyDelayElapsed => "safety delay elapsed",
            TransitionCause::ReleaseComplete => "release complete",
            TransitionCause::AutoLock => "auto lock",
            TransitionCause::Emergency => "emergency",
            TransitionCause::Forced => "forced",
        }
    }
}

/// A state change and the servo angle that goes with it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseTransition {
    pub from: ReleaseState,
    pub to: ReleaseState,
    pub cause: TransitionCause,
    /// Release servo angle for the new state
    pub servo_angle: i16,
    pub at_ms: u64,
}
