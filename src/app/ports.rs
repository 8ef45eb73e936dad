//! Port traits — the hexagonal boundary between the pattern engine and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ LedService (domain)
//! ```
//!
//! Driven adapters (register bus, clock, event sinks, command sources)
//! implement these traits. [`LedService`](super::service::LedService)
//! consumes them via generics, so the domain core never touches hardware
//! directly and every test runs against mocks.

use crate::error::BusError;

// ───────────────────────────────────────────────────────────────
// Register bus port (driven adapter: domain → PMIC)
// ───────────────────────────────────────────────────────────────

/// Synchronous register transport to the LED PMIC.
///
/// Every call either completes or fails immediately; there is no retry or
/// backoff at this layer. Callers treat a failure as aborting the current
/// multi-step sequence, leaving already-written registers as they are.
pub trait RegisterBus {
    /// Write one register.
    fn write_register(&mut self, addr: u8, value: u8) -> Result<(), BusError>;

    /// Read one register.
    fn read_register(&mut self, addr: u8) -> Result<u8, BusError>;

    /// Read-modify-write restricted to `mask` bits.
    fn update_register(&mut self, addr: u8, value: u8, mask: u8) -> Result<(), BusError> {
        let old = self.read_register(addr)?;
        self.write_register(addr, (old & !mask) | (value & mask))
    }
}

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: wall-clock time → domain)
// ───────────────────────────────────────────────────────────────

/// Wall-clock access for the suppression policy.
pub trait Clock {
    /// Current local hour-of-day (0-23), or `None` if the wall clock is
    /// not synced yet (e.g. pre-NTP).
    fn current_hour(&self) -> Option<u8>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`LedEvent`](super::events::LedEvent)s
/// through this port. Adapters decide where they go (serial log, telemetry
/// channel, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::LedEvent);
}

// ───────────────────────────────────────────────────────────────
// Command source port (driving adapter: outside world → domain)
// ───────────────────────────────────────────────────────────────

/// Typed command ingestion. Parsing the attribute-file / RPC text protocol
/// into [`LedCommand`](super::commands::LedCommand)s happens on the other
/// side of this trait.
pub trait CommandSource {
    /// Next pending command, or `None` when idle. Each command is handled
    /// to completion before the next poll; there is no queueing contract.
    fn poll(&mut self) -> Option<super::commands::LedCommand>;
}

/// Placeholder source for boards whose ingestion transport is not wired
/// up yet; never yields a command.
pub struct NullCommandSource;

impl CommandSource for NullCommandSource {
    fn poll(&mut self) -> Option<super::commands::LedCommand> {
        None
    }
}

// ───────────────────────────────────────────────────────────────
// Recheck delegate (decouples the recheck task from the service)
// ───────────────────────────────────────────────────────────────

/// Callback the background recheck task invokes when its period elapses.
///
/// The main loop implements this by running a suppression evaluation on
/// the service; the task itself knows nothing about channels or buses.
pub trait RecheckDelegate {
    /// Called when the recheck period elapses.
    fn on_recheck(&mut self);
}
