//! Outbound application events.
//!
//! [`LedService`](super::service::LedService) emits these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other side
//! decide what to do with them — log to serial, forward to telemetry, etc.

use crate::calibrate::PowerMode;
use crate::channels::ChannelBank;
use crate::suppress::SuppressionConfig;

use super::commands::PatternRequest;

/// Structured events emitted by the pattern engine.
#[derive(Debug, Clone, Copy)]
pub enum LedEvent {
    /// A pattern request was applied to the hardware.
    PatternApplied(PatternRequest),

    /// A pattern request was refused by the suppression policy.
    Suppressed(PatternRequest),

    /// The suppression policy forced all channels off.
    ChannelsReset,

    /// The power mode flag was toggled.
    PowerModeChanged(PowerMode),

    /// Periodic status snapshot.
    Status(StatusSnapshot),
}

/// A point-in-time controller snapshot suitable for logging.
#[derive(Debug, Clone, Copy)]
pub struct StatusSnapshot {
    pub channels: ChannelBank,
    pub power_mode: PowerMode,
    /// Ceiling the next pattern at the current power mode will use.
    pub active_ceiling: u8,
    pub suppression: SuppressionConfig,
    pub fade_enabled: bool,
}
