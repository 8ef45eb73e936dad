//! Periodic suppression recheck task.
//!
//! The block window must be able to preempt illumination that was applied
//! before the window opened, so a low-frequency re-evaluation runs in the
//! background while a window is configured. The task is decoupled from the
//! service through [`RecheckDelegate`]: when the period elapses it notifies
//! the delegate, and the main loop decides what to do with the notification.
//! This keeps the task independently testable.
//!
//! `arm()` and `disarm()` are idempotent. The main loop arms the task when
//! both window bounds become set and disarms it when either is cleared;
//! while disarmed, `tick()` is a no-op.

use crate::app::ports::RecheckDelegate;
use log::info;

/// Seconds between suppression re-evaluations while armed.
pub const RECHECK_PERIOD_SECS: u32 = 30;

/// Background recheck schedule.
pub struct RecheckTask {
    armed: bool,
    elapsed_ticks: u32,
}

impl RecheckTask {
    pub fn new() -> Self {
        Self {
            armed: false,
            elapsed_ticks: 0,
        }
    }

    /// Start the schedule. Restarts the period on the unarmed->armed edge
    /// only; re-arming an armed task changes nothing.
    pub fn arm(&mut self) {
        if !self.armed {
            self.armed = true;
            self.elapsed_ticks = 0;
            info!("Recheck task armed ({}s period)", RECHECK_PERIOD_SECS);
        }
    }

    /// Stop the schedule. Safe to call when already disarmed.
    pub fn disarm(&mut self) {
        if self.armed {
            self.armed = false;
            info!("Recheck task disarmed");
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Advance the schedule by one control-loop tick.
    ///
    /// * `tick_secs` — duration of one tick in seconds.
    /// * `delegate` — receives the fire notification.
    pub fn tick(&mut self, tick_secs: f32, delegate: &mut dyn RecheckDelegate) {
        if !self.armed {
            return;
        }
        self.elapsed_ticks += 1;
        let elapsed_secs = self.elapsed_ticks as f32 * tick_secs;
        if elapsed_secs >= RECHECK_PERIOD_SECS as f32 {
            delegate.on_recheck();
            self.elapsed_ticks = 0;
        }
    }
}
