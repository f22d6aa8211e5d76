//! Configuration management for field tuning
//!
//! Runtime configuration loads from a JSON file so thresholds can be
//! adjusted per deployment without reflashing. Threshold values are plain
//! floats in the file and are converted to fixed-point exactly once, at this
//! boundary; the numeric core never sees a float.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::analysis::spectral::DEFAULT_NUM_BINS;
use crate::decision::ThresholdConfig;
use crate::fixed::Fixed;

/// Complete node configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    pub spectral: SpectralConfig,
    pub thresholds: ThresholdsConfig,
    pub cycle: CycleConfig,
}

/// Spectral estimator parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpectralConfig {
    /// Number of frequency bins (capped at 128 by the processor)
    pub num_bins: usize,
    /// Sensor sample rate in Hz
    pub sample_rate_hz: u32,
}

impl Default for SpectralConfig {
    fn default() -> Self {
        Self {
            num_bins: DEFAULT_NUM_BINS,
            sample_rate_hz: 1000,
        }
    }
}

/// Decision thresholds as written in the config file (floats; converted to
/// fixed-point when handed to the decision policy)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdsConfig {
    /// Confidence required for a confirmed alert at nominal battery
    pub base_confidence_threshold: f32,
    /// Threshold multiplier in the low battery tier
    pub low_battery_multiplier: f32,
    /// Threshold multiplier in the critical battery tier
    pub critical_battery_multiplier: f32,
    /// Minimum spectral peaks for any transmission
    pub min_peaks_for_detection: u8,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            base_confidence_threshold: 0.65,
            low_battery_multiplier: 1.2,
            critical_battery_multiplier: 1.5,
            min_peaks_for_detection: 2,
        }
    }
}

impl ThresholdsConfig {
    /// Convert to the fixed-point form the decision policy reads
    pub fn to_thresholds(&self) -> ThresholdConfig {
        ThresholdConfig {
            base_confidence_threshold: Fixed::from_f32(self.base_confidence_threshold),
            low_battery_multiplier: Fixed::from_f32(self.low_battery_multiplier),
            critical_battery_multiplier: Fixed::from_f32(self.critical_battery_multiplier),
            min_peaks_for_detection: self.min_peaks_for_detection,
        }
    }
}

/// Cycle cadence parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleConfig {
    /// Sleep duration requested after a SLEEP decision
    pub sleep_interval_ms: u32,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            sleep_interval_ms: 1000,
        }
    }
}

impl Default for NodeConfig {
    /// Default configuration values (fallback if config file not found)
    fn default() -> Self {
        Self {
            spectral: SpectralConfig::default(),
            thresholds: ThresholdsConfig::default(),
            cycle: CycleConfig::default(),
        }
    }
}

impl NodeConfig {
    /// Load configuration from a JSON file, falling back to defaults if the
    /// file is missing or malformed
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }
}
