//! NotiLED Firmware — Main Entry Point
//!
//! Hexagonal architecture with a single-owner control loop.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  I2cRegisterBus     LogEventSink     SystemClock             │
//! │  (RegisterBus)      (EventSink)      (Clock)                 │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ──────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────┐      │
//! │  │            LedService (pure logic)                 │      │
//! │  │  dispatch · calibrate · suppress                   │      │
//! │  └────────────────────────────────────────────────────┘      │
//! │                                                              │
//! │  RecheckTask (delegate-driven suppression re-evaluation)     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The service is owned by this loop; both the command path and the
//! periodic recheck run here, so register sequences never interleave.

#![deny(unused_must_use)]

use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};

use notiled::adapters::i2c::{I2cRegisterBus, PMIC_I2C_ADDR};
use notiled::adapters::log_sink::LogEventSink;
use notiled::adapters::time::SystemClock;
use notiled::app::events::LedEvent;
use notiled::app::ports::{CommandSource, EventSink, NullCommandSource, RecheckDelegate};
use notiled::app::service::LedService;
use notiled::config::{self, DeviceVariant, PanelColor};
use notiled::scheduler::RecheckTask;

use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::FromValueType;

/// Control-loop period. The recheck task and status reporting derive
/// their timing from this.
const TICK_MS: u64 = 1000;

/// Status snapshots go to the log this often (in ticks).
const STATUS_PERIOD_TICKS: u32 = 60;

// ── Recheck delegate ──────────────────────────────────────────
//
// Bridges the recheck task (which knows nothing about the service) to the
// control loop: the task sets a flag, and the loop runs the suppression
// evaluation with the bus and sink it owns.

struct PendingRecheck {
    fired: bool,
}

impl RecheckDelegate for PendingRecheck {
    fn on_recheck(&mut self) {
        self.fired = true;
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("NotiLED v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Board identity → calibration profile ───────────────
    // Revision and panel colour come from the factory straps; current
    // boards in the field are RevB black.
    let variant = DeviceVariant::RevB;
    let color = PanelColor::Black;
    let profile = config::profile_for(variant, color)
        .context("no calibration profile for this board, refusing to start")?;
    info!(
        "Calibration: {variant:?}/{color:?} ratios=({},{},{}) ceilings=0x{:02X}/0x{:02X}",
        profile.ratio_r, profile.ratio_g, profile.ratio_b, profile.normal_current, profile.low_current,
    );

    // ── 3. I2C bus to the PMIC ────────────────────────────────
    let peripherals = Peripherals::take().context("peripherals already taken")?;
    let i2c_cfg = I2cConfig::new().baudrate(400u32.kHz().into());
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio5,
        peripherals.pins.gpio6,
        &i2c_cfg,
    )
    .context("I2C init failed")?;
    let mut bus = I2cRegisterBus::new(i2c, PMIC_I2C_ADDR);

    // ── 4. Service + adapters ─────────────────────────────────
    let mut service = LedService::new(profile);
    let mut sink = LogEventSink::new();
    let clock = SystemClock::new();
    // Command ingestion transport is wired by the platform integration;
    // until then the loop idles on an empty source.
    let mut source = NullCommandSource;
    let mut recheck = RecheckTask::new();
    let mut pending = PendingRecheck { fired: false };

    // Clean slate at boot; a stale pattern may survive a warm reset.
    if let Err(e) = service.reset(&mut bus) {
        warn!("Boot reset failed: {e}");
    }

    info!("Controller ready. Entering command loop.");

    // ── 5. Control loop ───────────────────────────────────────
    let tick_secs = TICK_MS as f32 / 1000.0;
    let mut status_ticks: u32 = 0;

    loop {
        std::thread::sleep(Duration::from_millis(TICK_MS));

        // Background suppression re-evaluation.
        recheck.tick(tick_secs, &mut pending);
        if pending.fired {
            pending.fired = false;
            if let Err(e) = service.recheck(&mut bus, &clock, &mut sink) {
                warn!("Suppression recheck failed: {e}");
            }
        }

        // Foreground command path. Each command runs to completion; a bus
        // failure aborts that command's register sequence and nothing else.
        while let Some(cmd) = source.poll() {
            if let Err(e) = service.handle_command(cmd, &mut bus, &clock, &mut sink) {
                warn!("Command {cmd:?} failed: {e}");
            }
            if service.window_armed() {
                recheck.arm();
            } else {
                recheck.disarm();
            }
        }

        status_ticks += 1;
        if status_ticks >= STATUS_PERIOD_TICKS {
            status_ticks = 0;
            sink.emit(&LedEvent::Status(service.status()));
        }
    }
}
