//! Calibration profiles and runtime tuning parameters.
//!
//! Each display panel colour has a different light transmittance, so every
//! `(DeviceVariant, PanelColor)` combination carries its own brightness
//! ratios and current ceilings. The table is built into the firmware and
//! looked up exactly once at initialisation; a missing entry is fatal
//! (the controller must never run with undefined ratios).

use serde::{Deserialize, Serialize};

/// Board revision. Determines which calibration row set applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceVariant {
    RevA,
    RevB,
}

/// Front-panel colour, read from the panel ID straps at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanelColor {
    Black,
    White,
    Gold,
    Blue,
    Red,
}

/// Per-variant brightness calibration, immutable after load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationProfile {
    /// Per-channel brightness ratios in percent (typically 0-150).
    pub ratio_r: u32,
    pub ratio_g: u32,
    pub ratio_b: u32,
    /// Current ceiling in normal power mode.
    pub normal_current: u8,
    /// Current ceiling in low power mode.
    pub low_current: u8,
    /// RevB white panels draw excess current when all channels run near the
    /// ceiling; derating applies an extra reduction to R and G there.
    pub current_limit_workaround: bool,
}

impl Default for CalibrationProfile {
    fn default() -> Self {
        Self {
            ratio_r: 100,
            ratio_g: 100,
            ratio_b: 100,
            normal_current: 0x14,
            low_current: 0x05,
            current_limit_workaround: false,
        }
    }
}

/// Look up the calibration profile for a board.
///
/// Returns `None` for combinations no board was ever built with.
pub fn profile_for(variant: DeviceVariant, color: PanelColor) -> Option<CalibrationProfile> {
    let base = CalibrationProfile::default();
    let profile = match (variant, color) {
        (DeviceVariant::RevA, PanelColor::Black) => base,
        (DeviceVariant::RevA, PanelColor::White) => CalibrationProfile {
            ratio_r: 90,
            ratio_g: 85,
            ratio_b: 95,
            ..base
        },
        (DeviceVariant::RevA, PanelColor::Gold) => CalibrationProfile {
            ratio_r: 95,
            ratio_g: 90,
            ratio_b: 110,
            ..base
        },
        (DeviceVariant::RevA, PanelColor::Red) => CalibrationProfile {
            ratio_r: 80,
            ratio_g: 105,
            ratio_b: 105,
            ..base
        },
        (DeviceVariant::RevA, PanelColor::Blue) => return None,
        (DeviceVariant::RevB, PanelColor::Black) => CalibrationProfile {
            normal_current: 0x18,
            ..base
        },
        (DeviceVariant::RevB, PanelColor::White) => CalibrationProfile {
            ratio_r: 90,
            ratio_g: 85,
            ratio_b: 95,
            normal_current: 0x18,
            current_limit_workaround: true,
            ..base
        },
        (DeviceVariant::RevB, PanelColor::Gold) => CalibrationProfile {
            ratio_r: 95,
            ratio_g: 90,
            ratio_b: 110,
            normal_current: 0x18,
            ..base
        },
        (DeviceVariant::RevB, PanelColor::Blue) => CalibrationProfile {
            ratio_r: 110,
            ratio_g: 100,
            ratio_b: 85,
            normal_current: 0x18,
            ..base
        },
        (DeviceVariant::RevB, PanelColor::Red) => CalibrationProfile {
            ratio_r: 80,
            ratio_g: 105,
            ratio_b: 105,
            normal_current: 0x18,
            ..base
        },
    };
    Some(profile)
}

/// Runtime-tunable behaviour of the pattern engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedTuning {
    /// Apply fade ramps to notification blink patterns.
    pub fade_enabled: bool,
    /// Fade-in time in milliseconds (valid range 100-4000).
    pub fade_time_up_ms: u32,
    /// Fade-out time in milliseconds (valid range 100-4000).
    pub fade_time_down_ms: u32,
    /// Verbose suppression-evaluation logging.
    pub debug: bool,
}

/// Validation bounds for the fade times.
pub const FADE_TIME_MIN_MS: u32 = 100;
pub const FADE_TIME_MAX_MS: u32 = 4000;

impl Default for LedTuning {
    fn default() -> Self {
        Self {
            fade_enabled: true,
            fade_time_up_ms: 800,
            fade_time_down_ms: 800,
            debug: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_is_sane() {
        let p = CalibrationProfile::default();
        assert!(p.normal_current > p.low_current);
        assert!(p.ratio_r > 0 && p.ratio_r <= 150);
        assert!(!p.current_limit_workaround);
    }

    #[test]
    fn every_built_combination_has_a_profile() {
        let built = [
            (DeviceVariant::RevA, PanelColor::Black),
            (DeviceVariant::RevA, PanelColor::White),
            (DeviceVariant::RevB, PanelColor::Black),
            (DeviceVariant::RevB, PanelColor::White),
            (DeviceVariant::RevB, PanelColor::Blue),
        ];
        for (v, c) in built {
            assert!(profile_for(v, c).is_some(), "{v:?}/{c:?}");
        }
    }

    #[test]
    fn unbuilt_combination_is_absent() {
        assert!(profile_for(DeviceVariant::RevA, PanelColor::Blue).is_none());
    }

    #[test]
    fn workaround_applies_only_to_revb_white() {
        for v in [DeviceVariant::RevA, DeviceVariant::RevB] {
            for c in [
                PanelColor::Black,
                PanelColor::White,
                PanelColor::Gold,
                PanelColor::Blue,
                PanelColor::Red,
            ] {
                let Some(p) = profile_for(v, c) else { continue };
                let expected = v == DeviceVariant::RevB && c == PanelColor::White;
                assert_eq!(p.current_limit_workaround, expected, "{v:?}/{c:?}");
            }
        }
    }

    #[test]
    fn tuning_defaults_are_in_range() {
        let t = LedTuning::default();
        assert!(t.fade_enabled);
        assert!((FADE_TIME_MIN_MS..=FADE_TIME_MAX_MS).contains(&t.fade_time_up_ms));
        assert!((FADE_TIME_MIN_MS..=FADE_TIME_MAX_MS).contains(&t.fade_time_down_ms));
    }

    #[test]
    fn serde_round_trip() {
        let p = profile_for(DeviceVariant::RevB, PanelColor::White).unwrap();
        let json = serde_json::to_string(&p).unwrap();
        let p2: CalibrationProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(p, p2);

        let t = LedTuning::default();
        let json = serde_json::to_string(&t).unwrap();
        let t2: LedTuning = serde_json::from_str(&json).unwrap();
        assert_eq!(t.fade_time_up_ms, t2.fade_time_up_ms);
        assert_eq!(t.fade_enabled, t2.fade_enabled);
    }
}
