//! System clock adapter.
//!
//! Provides the wall-clock hour for the suppression policy.
//!
//! - **`target_os = "espidf"`** — reads `gettimeofday()` and converts via
//!   `localtime_r()`, rejecting obviously unsynced time (pre-2020).
//! - **`not(target_os = "espidf")`** — always reports an unsynced clock;
//!   host tests inject their own [`Clock`] mocks.

use crate::app::ports::Clock;

/// Clock adapter backed by the platform RTC.
pub struct SystemClock;

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    /// Current hour-of-day (0-23) from the system clock. `None` if the
    /// wall clock is not synced (e.g. pre-NTP).
    #[cfg(target_os = "espidf")]
    fn current_hour(&self) -> Option<u8> {
        use core::ptr;
        let mut tv = esp_idf_svc::sys::timeval {
            tv_sec: 0,
            tv_usec: 0,
        };
        if unsafe { esp_idf_svc::sys::gettimeofday(&mut tv, ptr::null_mut()) } != 0 {
            return None;
        }
        // Reject obviously unsynced time (e.g. before 2020-01-01)
        const EPOCH_2020: i64 = 1_577_836_800;
        if tv.tv_sec < EPOCH_2020 {
            return None;
        }
        let secs = tv.tv_sec as esp_idf_svc::sys::time_t;
        let mut tm: esp_idf_svc::sys::tm = unsafe { core::mem::zeroed() };
        if unsafe { esp_idf_svc::sys::localtime_r(&secs, &mut tm) }.is_null() {
            return None;
        }
        let hour = tm.tm_hour;
        if !(0..=23).contains(&hour) {
            return None;
        }
        Some(hour as u8)
    }

    /// On non-ESP targets (simulation) always `None`.
    #[cfg(not(target_os = "espidf"))]
    fn current_hour(&self) -> Option<u8> {
        None
    }
}
