//! LED service — the hexagonal core.
//!
//! [`LedService`] owns the channel state store, the calibration profile,
//! and the policy flags (power mode, fade tuning, suppression rules). It
//! exposes a clean, hardware-agnostic API; all I/O flows through port
//! traits injected at call sites, making the entire service testable with
//! mock adapters.
//!
//! ```text
//!  CommandSource ──▶ ┌───────────────────────────┐ ──▶ EventSink
//!                    │        LedService          │
//!     RegisterBus ◀──│  dispatch · calibrate ·    │◀── Clock
//!                    │  suppress                  │
//!                    └───────────────────────────┘
//! ```
//!
//! Every operation takes `&mut self`, so the foreground command path and
//! the background recheck serialize on exclusive ownership: the multi-step
//! register sequences (brightness write, then enable read-modify-write)
//! can never interleave. A failed bus call aborts the sequence where it
//! stands; registers already written keep their new values and the state
//! store keeps its previous ones.

use log::{debug, info};

use crate::calibrate::{self, PowerMode};
use crate::channels::{Channel, ChannelBank, ChannelMode};
use crate::config::{CalibrationProfile, LedTuning, FADE_TIME_MAX_MS, FADE_TIME_MIN_MS};
use crate::error::Result;
use crate::regs::{brightness_reg, enable_bits, enable_field, enable_mask, REG_LEDBLNK, REG_LEDEN, REG_LEDRMP};
use crate::suppress::{self, SuppressionConfig, Verdict};
use crate::timing;

use super::commands::{LedCommand, PatternRequest};
use super::events::{LedEvent, StatusSnapshot};
use super::ports::{Clock, EventSink, RegisterBus};

/// Largest accepted blink delay in milliseconds (5 wire digits).
pub const RAW_DELAY_MAX_MS: u32 = 99_999;

// ───────────────────────────────────────────────────────────────
// LedService
// ───────────────────────────────────────────────────────────────

/// The pattern-and-policy engine.
pub struct LedService {
    channels: ChannelBank,
    profile: CalibrationProfile,
    tuning: LedTuning,
    suppression: SuppressionConfig,
    power_mode: PowerMode,
    /// Ceiling the last pattern ran at; re-derived from the power mode on
    /// every pattern application, overridable between patterns.
    dynamic_ceiling: u8,
    /// Shared delay pair for [`LedCommand::ArmChannelBlink`].
    delay_on_ms: u32,
    delay_off_ms: u32,
    /// Previous suppression verdict. Bookkeeping for reset-on-entry only;
    /// the verdict itself is recomputed on every evaluation.
    was_blocked: bool,
}

impl LedService {
    /// Construct the service around a calibration profile.
    ///
    /// The profile must come from [`crate::config::profile_for`]; boot
    /// fails earlier if the board has no profile.
    pub fn new(profile: CalibrationProfile) -> Self {
        Self {
            channels: ChannelBank::new(),
            dynamic_ceiling: profile.normal_current,
            profile,
            tuning: LedTuning::default(),
            suppression: SuppressionConfig::default(),
            power_mode: PowerMode::Normal,
            delay_on_ms: 0,
            delay_off_ms: 0,
            was_blocked: false,
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process one external command to completion.
    ///
    /// Out-of-range fields are ignored and the prior value retained; the
    /// command still counts as accepted. Only bus failures surface as
    /// errors, after the partial register sequence already landed.
    pub fn handle_command(
        &mut self,
        cmd: LedCommand,
        bus: &mut impl RegisterBus,
        clock: &impl Clock,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        match cmd {
            LedCommand::SetPattern(request) => self.apply(request, bus, clock, sink),

            LedCommand::SetRawBlink { rgb, on_ms, off_ms } => {
                self.apply(PatternRequest::RawBlink { rgb, on_ms, off_ms }, bus, clock, sink)
            }

            LedCommand::SetChannelBrightness { channel, brightness } => {
                if channel == Channel::Reserved {
                    debug!("Ignoring brightness write to reserved channel");
                    return Ok(());
                }
                let value = brightness.min(255) as u8;
                if value != 0 {
                    self.set_channel(bus, channel, value, ChannelMode::AlwaysOn)
                } else {
                    self.set_channel(bus, channel, 0, ChannelMode::Disabled)
                }
            }

            LedCommand::SetLowPowerMode(low) => {
                self.power_mode = if low { PowerMode::Low } else { PowerMode::Normal };
                info!("Power mode: {:?}", self.power_mode);
                sink.emit(&LedEvent::PowerModeChanged(self.power_mode));
                Ok(())
            }

            LedCommand::SetGlobalBrightnessCeiling(value) => {
                self.power_mode = PowerMode::Normal;
                self.dynamic_ceiling = value.min(255) as u8;
                info!("Ceiling override: 0x{:02X}", self.dynamic_ceiling);
                Ok(())
            }

            LedCommand::SetFadeEnabled(enabled) => {
                self.tuning.fade_enabled = enabled;
                Ok(())
            }

            LedCommand::SetFadeTimeUp(ms) => {
                if (FADE_TIME_MIN_MS..=FADE_TIME_MAX_MS).contains(&ms) {
                    self.tuning.fade_time_up_ms = ms;
                } else {
                    debug!("Fade-up time {ms}ms out of range, keeping {}ms", self.tuning.fade_time_up_ms);
                }
                Ok(())
            }

            LedCommand::SetFadeTimeDown(ms) => {
                if (FADE_TIME_MIN_MS..=FADE_TIME_MAX_MS).contains(&ms) {
                    self.tuning.fade_time_down_ms = ms;
                } else {
                    debug!("Fade-down time {ms}ms out of range, keeping {}ms", self.tuning.fade_time_down_ms);
                }
                Ok(())
            }

            LedCommand::SetAlwaysDisable(disable) => {
                self.suppression.always_disable = disable;
                info!("Always-disable: {disable}");
                // Enforce immediately rather than waiting for the next
                // pattern or recheck fire.
                self.recheck(bus, clock, sink)
            }

            LedCommand::SetBlockStart(hour) => {
                if let Some(h) = hour {
                    if h > 23 {
                        debug!("Block-start hour {h} out of range, ignored");
                        return Ok(());
                    }
                }
                self.suppression.block_start_hour = hour;
                Ok(())
            }

            LedCommand::SetBlockStop(hour) => {
                if let Some(h) = hour {
                    if h > 23 {
                        debug!("Block-stop hour {h} out of range, ignored");
                        return Ok(());
                    }
                }
                self.suppression.block_stop_hour = hour;
                Ok(())
            }

            LedCommand::SetBlinkDelays { on_ms, off_ms } => {
                self.delay_on_ms = on_ms.min(RAW_DELAY_MAX_MS);
                self.delay_off_ms = off_ms.min(RAW_DELAY_MAX_MS);
                Ok(())
            }

            LedCommand::ArmChannelBlink(channel) => {
                if channel == Channel::Reserved {
                    debug!("Ignoring blink arm on reserved channel");
                    return Ok(());
                }
                self.write_blink(bus, self.delay_on_ms, self.delay_off_ms)?;
                self.set_channel(bus, channel, self.dynamic_ceiling, ChannelMode::Blink)
            }

            LedCommand::SetDebugEnabled(enabled) => {
                self.tuning.debug = enabled;
                Ok(())
            }
        }
    }

    // ── Pattern dispatch ──────────────────────────────────────

    /// Apply a pattern request.
    ///
    /// Always starts from a clean slate (all channels off, ramp zeroed).
    /// A blocked verdict from the suppression policy leaves the channels
    /// reset and drops the request; blocked-to-allowed transitions never
    /// replay it.
    pub fn apply(
        &mut self,
        request: PatternRequest,
        bus: &mut impl RegisterBus,
        clock: &impl Clock,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        self.reset(bus)?;

        if request == PatternRequest::Off {
            sink.emit(&LedEvent::PatternApplied(request));
            return Ok(());
        }

        if self.is_blocked(clock) {
            self.was_blocked = true;
            info!("Pattern {request:?} suppressed");
            sink.emit(&LedEvent::Suppressed(request));
            return Ok(());
        }
        self.was_blocked = false;

        self.dynamic_ceiling = match request {
            // Raw blinks always run at the normal ceiling, even in low
            // power mode.
            PatternRequest::RawBlink { .. } => self.profile.normal_current,
            _ => calibrate::ceiling(self.power_mode, &self.profile),
        };
        let current = self.dynamic_ceiling;

        match request {
            PatternRequest::Off => {}

            PatternRequest::Charging => {
                self.set_channel(bus, Channel::Red, current, ChannelMode::AlwaysOn)?;
            }

            PatternRequest::ChargingError => {
                self.write_blink(bus, 500, 500)?;
                self.set_channel(bus, Channel::Red, current, ChannelMode::Blink)?;
            }

            PatternRequest::MissedNotification => {
                self.notification_blink(bus)?;
                self.set_channel(bus, Channel::Blue, current, ChannelMode::Blink)?;
            }

            PatternRequest::LowBattery => {
                self.notification_blink(bus)?;
                self.set_channel(bus, Channel::Red, current, ChannelMode::Blink)?;
            }

            PatternRequest::FullyCharged => {
                self.set_channel(bus, Channel::Green, current, ChannelMode::AlwaysOn)?;
            }

            PatternRequest::Powering => {
                self.write_ramp(bus, 800, 800)?;
                self.write_blink(bus, 200, 200)?;
                self.set_channel(bus, Channel::Blue, current, ChannelMode::AlwaysOn)?;
                self.set_channel(bus, Channel::Green, current, ChannelMode::Blink)?;
            }

            PatternRequest::RawBlink { rgb, on_ms, off_ms } => {
                self.raw_blink(bus, rgb, on_ms, off_ms)?;
            }
        }

        info!("Pattern {request:?} applied at ceiling 0x{current:02X}");
        sink.emit(&LedEvent::PatternApplied(request));
        Ok(())
    }

    /// Force all colour channels off and zero the ramp register.
    pub fn reset(&mut self, bus: &mut impl RegisterBus) -> Result<()> {
        for ch in Channel::COLOURS {
            self.set_channel(bus, ch, 0, ChannelMode::Disabled)?;
        }
        self.write_ramp(bus, 0, 0)
    }

    /// Reset on shutdown so the LEDs do not stay lit across a reboot.
    pub fn shutdown(&mut self, bus: &mut impl RegisterBus) -> Result<()> {
        info!("Shutdown: clearing all channels");
        self.reset(bus)
    }

    // ── Suppression enforcement ───────────────────────────────

    /// Re-evaluate the suppression rules and enforce them.
    ///
    /// The kill switch forces a reset on every evaluation; the block
    /// window forces one only on the transition into the blocked state.
    /// Called by the background recheck task and after kill-switch
    /// changes.
    pub fn recheck(
        &mut self,
        bus: &mut impl RegisterBus,
        clock: &impl Clock,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let hour = clock.current_hour();
        let verdict = suppress::evaluate(&self.suppression, hour);
        if self.tuning.debug {
            info!("Suppression recheck: hour={hour:?} verdict={verdict:?}");
        }

        let blocked = verdict == Verdict::Blocked;
        let entering = blocked && !self.was_blocked;
        self.was_blocked = blocked;

        if blocked && (self.suppression.always_disable || entering) {
            self.reset(bus)?;
            sink.emit(&LedEvent::ChannelsReset);
        }
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────

    /// Live brightness of a channel, read back from the hardware.
    /// Returns 0 when the channel's enable field is clear.
    pub fn read_channel(&self, bus: &mut impl RegisterBus, ch: Channel) -> Result<u8> {
        let enable = bus.read_register(REG_LEDEN)?;
        if enable_field(enable, ch) == ChannelMode::Disabled.bits() {
            return Ok(0);
        }
        Ok(bus.read_register(brightness_reg(ch))?)
    }

    /// Snapshot of the commanded controller state.
    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot {
            channels: self.channels,
            power_mode: self.power_mode,
            active_ceiling: self.dynamic_ceiling,
            suppression: self.suppression,
            fade_enabled: self.tuning.fade_enabled,
        }
    }

    /// True while the block window has both bounds set; the main loop
    /// keeps the recheck task armed exactly then.
    pub fn window_armed(&self) -> bool {
        self.suppression.window_active()
    }

    /// Commanded channel states (what was last written, not read back).
    pub fn channels(&self) -> &ChannelBank {
        &self.channels
    }

    // ── Internal ──────────────────────────────────────────────

    fn is_blocked(&self, clock: &impl Clock) -> bool {
        let hour = clock.current_hour();
        let verdict = suppress::evaluate(&self.suppression, hour);
        if self.tuning.debug {
            info!("Suppression check: hour={hour:?} verdict={verdict:?}");
        }
        verdict == Verdict::Blocked
    }

    fn ratio_for(&self, ch: Channel) -> u32 {
        match ch {
            Channel::Red => self.profile.ratio_r,
            Channel::Green => self.profile.ratio_g,
            Channel::Blue => self.profile.ratio_b,
            Channel::Reserved => 100,
        }
    }

    /// Write one channel: brightness register, then enable field RMW.
    ///
    /// The ratio scale and floor apply here so every path into the
    /// hardware gets the same calibration treatment. The state store is
    /// updated only after both steps land.
    fn set_channel(
        &mut self,
        bus: &mut impl RegisterBus,
        ch: Channel,
        raw: u8,
        mode: ChannelMode,
    ) -> Result<()> {
        let scaled = if mode == ChannelMode::Disabled {
            0
        } else {
            calibrate::scale(raw, self.ratio_for(ch))
        };

        if scaled == 0 {
            bus.update_register(REG_LEDEN, 0, enable_mask(ch))?;
            self.channels.set(ch, 0, ChannelMode::Disabled);
        } else {
            bus.write_register(brightness_reg(ch), scaled)?;
            bus.update_register(REG_LEDEN, enable_bits(ch, mode), enable_mask(ch))?;
            self.channels.set(ch, scaled, mode);
        }
        Ok(())
    }

    /// Caller-specified blink: current-limit each component to the
    /// ceiling, derate the triple, then arm the surviving channels.
    fn raw_blink(
        &mut self,
        bus: &mut impl RegisterBus,
        rgb: u32,
        on_ms: u32,
        off_ms: u32,
    ) -> Result<()> {
        let on_ms = on_ms.min(RAW_DELAY_MAX_MS);
        let off_ms = off_ms.min(RAW_DELAY_MAX_MS);
        let current = self.dynamic_ceiling;

        // User-supplied components are full-range 0-255; restrict each to
        // the tuned ceiling before derating, keeping nonzero requests lit.
        let limit = |c: u8| -> u8 {
            if c == 0 {
                0
            } else {
                (u32::from(c) * u32::from(current) / 255).max(1) as u8
            }
        };
        let limited = [
            limit((rgb >> 16) as u8),
            limit((rgb >> 8) as u8),
            limit(rgb as u8),
        ];
        let derated = calibrate::derate(limited, &self.profile, current);

        for (ch, value) in Channel::COLOURS.into_iter().zip(derated) {
            if value != 0 {
                self.set_channel(bus, ch, value, ChannelMode::Blink)?;
            }
        }

        if self.tuning.fade_enabled && on_ms > 0 {
            self.write_ramp(bus, self.tuning.fade_time_up_ms, self.tuning.fade_time_down_ms)?;
        }
        self.write_blink(bus, on_ms, off_ms)
    }

    /// Notification-style blink timing: fade ramp plus a long off period
    /// when fading is enabled, a plain 500ms flash otherwise.
    fn notification_blink(&mut self, bus: &mut impl RegisterBus) -> Result<()> {
        if self.tuning.fade_enabled {
            self.write_ramp(bus, self.tuning.fade_time_up_ms, self.tuning.fade_time_down_ms)?;
            self.write_blink(bus, self.tuning.fade_time_up_ms, 5000)
        } else {
            self.write_blink(bus, 500, 5000)
        }
    }

    fn write_ramp(&mut self, bus: &mut impl RegisterBus, up_ms: u32, down_ms: u32) -> Result<()> {
        let up = timing::ramp_code(up_ms, self.tuning.fade_time_up_ms);
        let down = timing::ramp_code(down_ms, self.tuning.fade_time_down_ms);
        bus.write_register(REG_LEDRMP, timing::pack_ramp(up, down))?;
        Ok(())
    }

    fn write_blink(&mut self, bus: &mut impl RegisterBus, on_ms: u32, off_ms: u32) -> Result<()> {
        let value = timing::pack_blink(timing::blink_on_code(on_ms), timing::blink_off_code(off_ms));
        bus.write_register(REG_LEDBLNK, value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::profile_for;
    use crate::config::{DeviceVariant, PanelColor};

    struct NopBus;
    impl RegisterBus for NopBus {
        fn write_register(&mut self, _addr: u8, _value: u8) -> core::result::Result<(), crate::error::BusError> {
            Ok(())
        }
        fn read_register(&mut self, _addr: u8) -> core::result::Result<u8, crate::error::BusError> {
            Ok(0)
        }
    }

    struct FixedClock(Option<u8>);
    impl Clock for FixedClock {
        fn current_hour(&self) -> Option<u8> {
            self.0
        }
    }

    struct NopSink;
    impl EventSink for NopSink {
        fn emit(&mut self, _event: &LedEvent) {}
    }

    fn service() -> LedService {
        LedService::new(profile_for(DeviceVariant::RevA, PanelColor::Black).unwrap())
    }

    #[test]
    fn status_reflects_defaults() {
        let svc = service();
        let s = svc.status();
        assert_eq!(s.power_mode, PowerMode::Normal);
        assert_eq!(s.active_ceiling, 0x14);
        assert!(s.fade_enabled);
        assert!(s.channels.all_dark());
    }

    #[test]
    fn window_armed_requires_both_bounds() {
        let mut svc = service();
        let mut bus = NopBus;
        let clock = FixedClock(Some(12));
        let mut sink = NopSink;

        assert!(!svc.window_armed());
        svc.handle_command(LedCommand::SetBlockStart(Some(22)), &mut bus, &clock, &mut sink)
            .unwrap();
        assert!(!svc.window_armed());
        svc.handle_command(LedCommand::SetBlockStop(Some(6)), &mut bus, &clock, &mut sink)
            .unwrap();
        assert!(svc.window_armed());
        svc.handle_command(LedCommand::SetBlockStop(None), &mut bus, &clock, &mut sink)
            .unwrap();
        assert!(!svc.window_armed());
    }

    #[test]
    fn out_of_range_block_hour_is_ignored() {
        let mut svc = service();
        let mut bus = NopBus;
        let clock = FixedClock(Some(12));
        let mut sink = NopSink;

        svc.handle_command(LedCommand::SetBlockStart(Some(24)), &mut bus, &clock, &mut sink)
            .unwrap();
        assert_eq!(svc.status().suppression.block_start_hour, None);
    }
}
