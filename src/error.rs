//! Unified error types for the NotiLED firmware.
//!
//! Follows embedded best practice: a single `Error` enum that every subsystem
//! can convert into, keeping the top-level command loop's error handling
//! uniform. All variants are `Copy` so they can be cheaply passed back
//! through command handlers without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A register transport operation failed.
    Bus(BusError),
    /// Calibration data is missing or could not be loaded.
    Config(&'static str),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "bus: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Register bus errors
// ---------------------------------------------------------------------------

/// Errors from the register transport.
///
/// Each variant carries the register address so the log line identifies
/// which step of a multi-step sequence failed. The sequence aborts at the
/// failing step; earlier writes are not rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    /// A single-register write failed.
    Write(u8),
    /// A single-register read failed.
    Read(u8),
}

impl BusError {
    /// Address of the register the failed operation targeted.
    pub const fn addr(self) -> u8 {
        match self {
            Self::Write(a) | Self::Read(a) => a,
        }
    }
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Write(addr) => write!(f, "write to 0x{addr:02X} failed"),
            Self::Read(addr) => write!(f, "read from 0x{addr:02X} failed"),
        }
    }
}

impl From<BusError> for Error {
    fn from(e: BusError) -> Self {
        Self::Bus(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bus_error_reports_address() {
        let e = BusError::Write(0x30);
        assert_eq!(e.addr(), 0x30);
        assert_eq!(format!("{e}"), "write to 0x30 failed");
    }

    #[test]
    fn bus_error_converts_to_crate_error() {
        let e: Error = BusError::Read(0x31).into();
        assert_eq!(e, Error::Bus(BusError::Read(0x31)));
    }
}
