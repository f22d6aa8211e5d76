// Decision policy - battery-aware transmit/sleep fusion
//
// Pure function from {spectral result, inference result, battery voltage,
// threshold configuration} to a tri-state decision. The battery tier only
// scales the confidence bar; it never removes the confirmed-alert path, so a
// high-confidence anomaly transmits even on a critical battery, while the
// exploratory "uncertain" transmissions are progressively vetoed as the
// battery drops.

use serde::{Deserialize, Serialize};

use crate::analysis::{InferenceResult, SpectralResult};
use crate::fixed::{Fixed, FIXED_ONE};

/// Battery voltage below which the node is in the critical tier
pub const BATTERY_CRITICAL_MV: u16 = 3000;

/// Battery voltage below which the node is in the low tier
pub const BATTERY_LOW_MV: u16 = 3300;

/// Battery voltage at or above which the node is nominal
pub const BATTERY_NOMINAL_MV: u16 = 3700;

/// Peak-magnitude floor of the activity veto (0.1)
const ACTIVITY_MAGNITUDE_FLOOR: Fixed = Fixed::from_raw(FIXED_ONE / 10);

/// Fraction of the effective threshold where the uncertain band begins (0.7)
const UNCERTAIN_BAND_RATIO: Fixed = Fixed::from_raw(FIXED_ONE * 7 / 10);

/// Outcome of one decision cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    /// No significant activity, return to sleep
    Sleep,
    /// Confirmed anomaly, transmit alert
    TxAlert,
    /// Uncertain detection, transmit for remote analysis
    TxUncertain,
}

impl Decision {
    /// Stable string rendering, shared with logs and the demo output
    pub const fn as_str(self) -> &'static str {
        match self {
            Decision::Sleep => "SLEEP",
            Decision::TxAlert => "TX_ALERT",
            Decision::TxUncertain => "TX_UNCERTAIN",
        }
    }
}

impl core::fmt::Display for Decision {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Battery-aware thresholding configuration
///
/// Constructed once (defaults or a config file) and read-only during a
/// decision; an operator may replace it between cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Confidence required for a confirmed alert at nominal battery
    pub base_confidence_threshold: Fixed,
    /// Threshold multiplier in the low battery tier
    pub low_battery_multiplier: Fixed,
    /// Threshold multiplier in the critical battery tier
    pub critical_battery_multiplier: Fixed,
    /// Minimum spectral peaks for any transmission to be considered
    pub min_peaks_for_detection: u8,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            base_confidence_threshold: Fixed::from_f32(0.65),
            low_battery_multiplier: Fixed::from_f32(1.2),
            critical_battery_multiplier: Fixed::from_f32(1.5),
            min_peaks_for_detection: 2,
        }
    }
}

/// Base threshold scaled by the battery tier
pub fn effective_threshold(battery_mv: u16, config: &ThresholdConfig) -> Fixed {
    if battery_mv < BATTERY_CRITICAL_MV {
        config
            .base_confidence_threshold
            .mul(config.critical_battery_multiplier)
    } else if battery_mv < BATTERY_LOW_MV {
        config
            .base_confidence_threshold
            .mul(config.low_battery_multiplier)
    } else {
        config.base_confidence_threshold
    }
}

/// Fuse spectral evidence, inference, and battery state into a decision.
///
/// Ordered rules, first match wins:
/// 1. scale the threshold by the battery tier;
/// 2. activity veto: too few peaks or peak magnitude at or below 0.1 sleeps
///    unconditionally, overriding inference;
/// 3. class 0 (normal) sleeps;
/// 4. class 1 (anomaly) transmits an alert at or above the effective
///    threshold, transmits uncertain at or above 0.7x of it, else sleeps;
/// 5. class 2 (model-uncertain) transmits uncertain only with battery at or
///    above the low tier and one peak more than the detection minimum;
/// 6. anything else sleeps.
pub fn evaluate(
    spectral: &SpectralResult,
    inference: &InferenceResult,
    battery_mv: u16,
    config: &ThresholdConfig,
) -> Decision {
    let threshold = effective_threshold(battery_mv, config);

    // Activity veto: without spectral evidence, inference is not consulted
    let sufficient_activity = spectral.num_peaks >= config.min_peaks_for_detection
        && spectral.peak_magnitude > ACTIVITY_MAGNITUDE_FLOOR;
    if !sufficient_activity {
        return Decision::Sleep;
    }

    let confidence = inference.confidence;

    match inference.predicted_class {
        0 => Decision::Sleep,
        1 => {
            if confidence >= threshold {
                Decision::TxAlert
            } else if confidence >= threshold.mul(UNCERTAIN_BAND_RATIO) {
                Decision::TxUncertain
            } else {
                Decision::Sleep
            }
        }
        2 => {
            // Exploratory transmission only while energy allows it
            if battery_mv >= BATTERY_LOW_MV
                && spectral.num_peaks >= config.min_peaks_for_detection.saturating_add(1)
            {
                Decision::TxUncertain
            } else {
                Decision::Sleep
            }
        }
        _ => Decision::Sleep,
    }
}

#[cfg(test)]
#[path = "decision_tests.rs"]
mod tests;
