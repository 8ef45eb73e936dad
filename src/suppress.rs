//! Illumination suppression policy.
//!
//! Two rules, evaluated against wall-clock time on every check:
//!
//! 1. **Force disable** — a global kill switch.
//! 2. **Block window** — a daily hour range (may wrap midnight) during
//!    which no illumination is allowed. Active only while *both* bounds
//!    are set.
//!
//! The verdict is derived, never stored; callers that need edge detection
//! (reset-on-entry) keep their own bookkeeping of the previous result.

/// Suppression rules, mutated by override commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuppressionConfig {
    /// Kill switch: block regardless of time of day.
    pub always_disable: bool,
    /// First blocked hour (0-23).
    pub block_start_hour: Option<u8>,
    /// First allowed hour after the window (0-23).
    pub block_stop_hour: Option<u8>,
}

impl SuppressionConfig {
    /// True while both window bounds are set; the periodic recheck task
    /// runs only in this state.
    pub fn window_active(&self) -> bool {
        self.block_start_hour.is_some() && self.block_stop_hour.is_some()
    }
}

/// Outcome of a suppression evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allowed,
    Blocked,
}

/// Evaluate the suppression rules for the given hour-of-day.
///
/// `hour` is `None` when the wall clock is not synced; the window rule
/// cannot fire then, but the kill switch still does.
pub fn evaluate(config: &SuppressionConfig, hour: Option<u8>) -> Verdict {
    if config.always_disable {
        return Verdict::Blocked;
    }
    if let (Some(start), Some(stop), Some(h)) =
        (config.block_start_hour, config.block_stop_hour, hour)
    {
        let in_window = if start > stop {
            // Wraps midnight, e.g. 22..6 blocks 22,23,0..5.
            h >= start || h < stop
        } else {
            h >= start && h < stop
        };
        if in_window {
            return Verdict::Blocked;
        }
    }
    Verdict::Allowed
}
