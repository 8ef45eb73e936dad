//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured controller events to the
//! logger (UART / USB-CDC in production). A future telemetry adapter would
//! implement the same trait.

use log::info;

use crate::app::events::LedEvent;
use crate::app::ports::EventSink;
use crate::channels::Channel;

/// Adapter that logs every [`LedEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &LedEvent) {
        match event {
            LedEvent::PatternApplied(request) => {
                info!("PATTERN | applied {:?}", request);
            }
            LedEvent::Suppressed(request) => {
                info!("PATTERN | suppressed {:?}", request);
            }
            LedEvent::ChannelsReset => {
                info!("SUPPRESS | all channels reset");
            }
            LedEvent::PowerModeChanged(mode) => {
                info!("POWER | mode={:?}", mode);
            }
            LedEvent::Status(s) => {
                let r = s.channels.get(Channel::Red);
                let g = s.channels.get(Channel::Green);
                let b = s.channels.get(Channel::Blue);
                info!(
                    "STATUS | R={}/{:?} G={}/{:?} B={}/{:?} | mode={:?} ceiling=0x{:02X} | \
                     fade={} | kill={} window={:?}..{:?}",
                    r.brightness,
                    r.mode,
                    g.brightness,
                    g.mode,
                    b.brightness,
                    b.mode,
                    s.power_mode,
                    s.active_ceiling,
                    s.fade_enabled,
                    s.suppression.always_disable,
                    s.suppression.block_start_hour,
                    s.suppression.block_stop_hour,
                );
            }
        }
    }
}
