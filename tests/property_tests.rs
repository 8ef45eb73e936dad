//! Property tests for the pure calibration, timing, and suppression logic.
//!
//! Runs on host (x86_64) only — proptest is not available for ESP32
//! targets. On ESP32, these tests are compiled out.

#![cfg(not(target_os = "espidf"))]

use notiled::calibrate::{derate, scale};
use notiled::config::CalibrationProfile;
use notiled::suppress::{evaluate, SuppressionConfig, Verdict};
use notiled::timing::{blink_off_code, blink_on_code, ramp_code, CODE_MAX};
use proptest::prelude::*;

fn profile(
    ratio_r: u32,
    ratio_g: u32,
    ratio_b: u32,
    workaround: bool,
) -> CalibrationProfile {
    CalibrationProfile {
        ratio_r,
        ratio_g,
        ratio_b,
        current_limit_workaround: workaround,
        ..CalibrationProfile::default()
    }
}

// ── Floor protection ──────────────────────────────────────────

proptest! {
    /// Any nonzero request scaled by any plausible ratio stays lit.
    #[test]
    fn scaling_never_darkens_a_nonzero_channel(
        raw in 1u8..=255u8,
        ratio in 1u32..=1000u32,
    ) {
        prop_assert!(scale(raw, ratio) >= 1);
    }

    /// Zero stays zero: scaling must not invent light.
    #[test]
    fn scaling_keeps_zero_dark(ratio in 0u32..=1000u32) {
        prop_assert_eq!(scale(0, ratio), 0);
    }
}

// ── Ceiling respect ───────────────────────────────────────────

proptest! {
    /// After derating, the ratio-weighted total stays within the budget,
    /// allowing integer truncation plus the floor-to-one guarantee per
    /// channel. Components enter derating the way the dispatcher feeds
    /// them: current-limited to the ceiling, so with ratios up to 150 the
    /// weighted values stay below the 255 saturation point.
    #[test]
    fn derated_weighted_total_respects_ceiling(
        raw_r in 0u8..=255u8,
        raw_g in 0u8..=255u8,
        raw_b in 0u8..=255u8,
        ratio_r in 1u32..=150u32,
        ratio_g in 1u32..=150u32,
        ratio_b in 1u32..=150u32,
        ceiling in 1u8..=170u8,
    ) {
        let p = profile(ratio_r, ratio_g, ratio_b, false);
        let max_ratio = ratio_r.max(ratio_g).max(ratio_b);
        let max_br = u32::from(ceiling) * max_ratio / 100;

        let limit = |c: u8| -> u8 {
            if c == 0 {
                0
            } else {
                (u32::from(c) * u32::from(ceiling) / 255).max(1) as u8
            }
        };
        let input = [limit(raw_r), limit(raw_g), limit(raw_b)];
        let total: u32 = input
            .iter()
            .zip([ratio_r, ratio_g, ratio_b])
            .map(|(&c, ratio)| u32::from(scale(c, ratio)))
            .sum();

        let out = derate(input, &p, ceiling);
        let weighted: u32 = out
            .iter()
            .zip([ratio_r, ratio_g, ratio_b])
            .map(|(&c, ratio)| u32::from(scale(c, ratio)))
            .sum();

        if total > max_br {
            prop_assert!(
                weighted <= max_br + 6,
                "weighted={weighted} budget={max_br} out={out:?}"
            );
        } else {
            prop_assert_eq!(out, input, "under budget must pass through");
        }
    }

    /// Derating reduces, it never zeroes: every nonzero input channel is
    /// still nonzero afterwards, workaround boards included.
    #[test]
    fn derating_keeps_nonzero_channels_lit(
        r in 0u8..=255u8,
        g in 0u8..=255u8,
        b in 0u8..=255u8,
        ratio_r in 1u32..=150u32,
        ratio_g in 1u32..=150u32,
        ratio_b in 1u32..=150u32,
        ceiling in 1u8..=255u8,
        workaround in proptest::bool::ANY,
    ) {
        let p = profile(ratio_r, ratio_g, ratio_b, workaround);
        let out = derate([r, g, b], &p, ceiling);
        for (input, output) in [r, g, b].into_iter().zip(out) {
            prop_assert_eq!(input == 0, output == 0);
        }
    }
}

// ── Quantizer range ───────────────────────────────────────────

proptest! {
    /// Every duration maps into the 4-bit field, nothing is rejected.
    #[test]
    fn quantizer_codes_fit_the_field(
        ms in 0u32..=u32::MAX,
        threshold in 100u32..=4000u32,
    ) {
        prop_assert!(blink_on_code(ms) <= CODE_MAX);
        prop_assert!(blink_off_code(ms) <= CODE_MAX);
        prop_assert!(ramp_code(ms, threshold) <= CODE_MAX);
    }

    /// Longer durations never map to a shorter code.
    #[test]
    fn blink_codes_are_monotonic(ms in 0u32..=20_000u32, delta in 0u32..=20_000u32) {
        prop_assert!(blink_on_code(ms + delta) >= blink_on_code(ms));
        prop_assert!(blink_off_code(ms + delta) >= blink_off_code(ms));
    }
}

// ── Block window ──────────────────────────────────────────────

proptest! {
    /// The wraparound window logic agrees with the plain interval
    /// predicate for every (start, stop, hour) combination.
    #[test]
    fn window_verdict_matches_reference(
        start in 0u8..=23u8,
        stop in 0u8..=23u8,
        hour in 0u8..=23u8,
    ) {
        let cfg = SuppressionConfig {
            always_disable: false,
            block_start_hour: Some(start),
            block_stop_hour: Some(stop),
        };
        let expect_blocked = if start > stop {
            hour >= start || hour < stop
        } else {
            hour >= start && hour < stop
        };
        let verdict = evaluate(&cfg, Some(hour));
        prop_assert_eq!(verdict == Verdict::Blocked, expect_blocked);
    }

    /// The kill switch wins regardless of window and hour.
    #[test]
    fn kill_switch_always_blocks(
        start in proptest::option::of(0u8..=23u8),
        stop in proptest::option::of(0u8..=23u8),
        hour in proptest::option::of(0u8..=23u8),
    ) {
        let cfg = SuppressionConfig {
            always_disable: true,
            block_start_hour: start,
            block_stop_hour: stop,
        };
        prop_assert_eq!(evaluate(&cfg, hour), Verdict::Blocked);
    }
}
