//! Inbound commands to the pattern engine.
//!
//! These represent requests from the outside world (platform notification
//! daemon, debug console, test rig) that
//! [`LedService`](super::service::LedService) interprets and acts upon.
//!
//! Validation policy: a command with an out-of-range field is accepted and
//! the offending field is ignored, retaining the prior value. Callers are
//! never told their input was bad. This mirrors the behaviour the platform
//! HAL has depended on for years; see DESIGN.md before tightening it.

use crate::channels::Channel;

/// A named illumination pattern or a caller-specified blink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternRequest {
    /// Everything off.
    Off,
    /// Solid red while charging.
    Charging,
    /// Red blink on charger fault.
    ChargingError,
    /// Blue slow blink for an unread notification.
    MissedNotification,
    /// Red slow blink when the battery is nearly empty.
    LowBattery,
    /// Solid green at full charge.
    FullyCharged,
    /// Blue + green pulse during power-on.
    Powering,
    /// Caller-specified colour and timing.
    RawBlink {
        /// Packed 24-bit RGB, `0xRRGGBB`.
        rgb: u32,
        on_ms: u32,
        off_ms: u32,
    },
}

impl PatternRequest {
    /// Map a wire pattern id (0-6) to its request. Unknown ids are `None`.
    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            0 => Some(Self::Off),
            1 => Some(Self::Charging),
            2 => Some(Self::ChargingError),
            3 => Some(Self::MissedNotification),
            4 => Some(Self::LowBattery),
            5 => Some(Self::FullyCharged),
            6 => Some(Self::Powering),
            _ => None,
        }
    }
}

/// Commands the ingestion layer can send into the pattern engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedCommand {
    /// Apply a pattern (includes raw blink requests).
    SetPattern(PatternRequest),

    /// Caller-specified blink, as carried on the wire: packed 24-bit RGB
    /// plus a delay pair in milliseconds (0-99999 each).
    SetRawBlink { rgb: u32, on_ms: u32, off_ms: u32 },

    /// Drive one channel directly: nonzero brightness turns it always-on,
    /// zero disables it.
    SetChannelBrightness { channel: Channel, brightness: u32 },

    /// Switch between the normal and low-power current ceilings.
    SetLowPowerMode(bool),

    /// Override the active ceiling (clamped to 0-255); also returns the
    /// controller to normal power mode.
    SetGlobalBrightnessCeiling(u32),

    /// Enable or disable fade ramps on notification patterns.
    SetFadeEnabled(bool),

    /// Fade-in time in ms; ignored outside 100-4000.
    SetFadeTimeUp(u32),

    /// Fade-out time in ms; ignored outside 100-4000.
    SetFadeTimeDown(u32),

    /// Global illumination kill switch.
    SetAlwaysDisable(bool),

    /// First blocked hour, `None` to unset (wire sentinel -1).
    SetBlockStart(Option<u8>),

    /// First allowed hour, `None` to unset (wire sentinel -1).
    SetBlockStop(Option<u8>),

    /// Store the shared blink delay pair used by [`LedCommand::ArmChannelBlink`].
    SetBlinkDelays { on_ms: u32, off_ms: u32 },

    /// Write the stored delay pair to the blink register and put the
    /// channel into blink mode at the active ceiling.
    ArmChannelBlink(Channel),

    /// Verbose suppression-evaluation logging.
    SetDebugEnabled(bool),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_ids_cover_the_wire_range() {
        assert_eq!(PatternRequest::from_id(0), Some(PatternRequest::Off));
        assert_eq!(PatternRequest::from_id(1), Some(PatternRequest::Charging));
        assert_eq!(PatternRequest::from_id(6), Some(PatternRequest::Powering));
        assert_eq!(PatternRequest::from_id(7), None);
    }
}
