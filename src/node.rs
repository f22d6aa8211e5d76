// SensorNode - one acquire/analyze/decide/act cycle
//
// Drives the numeric pipeline against whatever Hardware implementation the
// application hands in. Cycles are strictly sequential and carry no state
// from one to the next beyond the configuration; the same window, battery
// voltage, and configuration always produce the same decision.

use serde::Serialize;

use crate::analysis::{InferenceEngine, InferenceResult, SpectralProcessor, SpectralResult};
use crate::analysis::{MAX_BINS, SAMPLE_WINDOW};
use crate::config::NodeConfig;
use crate::decision::{evaluate, Decision, ThresholdConfig};
use crate::fixed::{Fixed, FIXED_ONE};
use crate::hal::{AlertKind, Hardware};

/// Everything observed in one cycle, for logs and the demo report
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CycleReport {
    pub timestamp_ms: u32,
    pub battery_mv: u16,
    pub samples_read: usize,
    pub spectral: SpectralResult,
    pub inference: InferenceResult,
    pub decision: Decision,
}

/// The decision core wired to a spectral processor and a model
pub struct SensorNode<'m> {
    spectral: SpectralProcessor,
    engine: InferenceEngine<'m>,
    thresholds: ThresholdConfig,
    sleep_interval_ms: u32,
}

impl SensorNode<'static> {
    /// Node from a [`NodeConfig`] using the built-in model artifact
    pub fn from_config(config: &NodeConfig) -> Self {
        SensorNode {
            spectral: SpectralProcessor::new(
                config.spectral.num_bins,
                config.spectral.sample_rate_hz,
            ),
            engine: InferenceEngine::with_default_model(),
            thresholds: config.thresholds.to_thresholds(),
            sleep_interval_ms: config.cycle.sleep_interval_ms,
        }
    }
}

impl<'m> SensorNode<'m> {
    pub fn new(
        spectral: SpectralProcessor,
        engine: InferenceEngine<'m>,
        thresholds: ThresholdConfig,
        sleep_interval_ms: u32,
    ) -> Self {
        Self {
            spectral,
            engine,
            thresholds,
            sleep_interval_ms,
        }
    }

    /// Current thresholds
    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.thresholds
    }

    /// Replace the thresholds between cycles (operator reconfiguration)
    pub fn set_thresholds(&mut self, thresholds: ThresholdConfig) {
        self.thresholds = thresholds;
    }

    /// Run one full cycle: acquire a window, analyze, decide, act.
    ///
    /// A short or empty read flows through the pipeline's defined degenerate
    /// paths (zero spectral result, zero-confidence inference) and ends in a
    /// SLEEP; nothing here can fail.
    pub fn run_cycle<H: Hardware>(&self, hal: &mut H) -> CycleReport {
        if hal.wake_pending() {
            log::debug!("[Node] wake event pending, clearing");
            hal.clear_wake();
        }

        let mut window = [0i16; SAMPLE_WINDOW];
        let samples_read = hal.read_samples(&mut window).min(SAMPLE_WINDOW);
        let samples = &window[..samples_read];

        let spectral = self.spectral.process(samples);

        let mut features = [Fixed::ZERO; MAX_BINS];
        let written = self.spectral.extract_features(samples, &mut features);
        let inference = self.engine.run(&features[..written]);

        let battery_mv = hal.read_battery_mv();
        let decision = evaluate(&spectral, &inference, battery_mv, &self.thresholds);

        log::debug!(
            "[Node] battery={}mV peaks={} peak_mag={} class={} confidence={} -> {}",
            battery_mv,
            spectral.num_peaks,
            spectral.peak_magnitude,
            inference.predicted_class,
            inference.confidence,
            decision
        );

        match decision {
            Decision::Sleep => hal.sleep(self.sleep_interval_ms),
            Decision::TxAlert => {
                hal.transmit(AlertKind::Confirmed, confidence_pct(inference.confidence));
            }
            Decision::TxUncertain => {
                hal.transmit(AlertKind::Uncertain, confidence_pct(inference.confidence));
            }
        }

        CycleReport {
            timestamp_ms: hal.now_ms(),
            battery_mv,
            samples_read,
            spectral,
            inference,
            decision,
        }
    }
}

/// Confidence as a 0-100 percentage for the radio payload
fn confidence_pct(confidence: Fixed) -> u8 {
    ((confidence.clamp_unit().raw() as i64 * 100) / FIXED_ONE as i64) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{MockHardware, VibrationPattern};

    fn default_node() -> SensorNode<'static> {
        SensorNode::from_config(&NodeConfig::default())
    }

    #[test]
    fn test_quiet_signal_sleeps() {
        let node = default_node();
        let mut hw = MockHardware::new().with_seed(42);
        hw.set_pattern(VibrationPattern::Noise);
        hw.set_noise_level(200);

        let report = node.run_cycle(&mut hw);

        // Low-level noise never clears the 0.1 activity floor
        assert_eq!(report.decision, Decision::Sleep);
        assert_eq!(hw.total_sleep_ms(), 1000);
        assert_eq!(hw.transmit_count(), 0);
    }

    #[test]
    fn test_cycle_reports_battery_and_window() {
        let node = default_node();
        let mut hw = MockHardware::with_battery(3450).with_seed(1);

        let report = node.run_cycle(&mut hw);
        assert_eq!(report.battery_mv, 3450);
        assert_eq!(report.samples_read, SAMPLE_WINDOW);
    }

    #[test]
    fn test_cycle_clears_wake_event() {
        let node = default_node();
        let mut hw = MockHardware::new().with_seed(2);
        hw.trigger_wake();

        node.run_cycle(&mut hw);
        assert!(!hw.wake_pending());
    }

    #[test]
    fn test_every_cycle_acts_exactly_once() {
        let node = default_node();
        let mut hw = MockHardware::new().with_seed(3);
        hw.set_pattern(VibrationPattern::Anomaly);
        hw.set_signal_amplitude(20000);

        let mut transmissions = 0u32;
        let mut sleeps = 0u32;
        for _ in 0..10 {
            let before_tx = hw.transmit_count();
            let before_sleep = hw.total_sleep_ms();
            node.run_cycle(&mut hw);

            if hw.transmit_count() > before_tx {
                transmissions += 1;
            }
            if hw.total_sleep_ms() > before_sleep {
                sleeps += 1;
            }
        }

        assert_eq!(transmissions + sleeps, 10, "each cycle ends in one action");
    }

    #[test]
    fn test_thresholds_replaceable_between_cycles() {
        let mut node = default_node();
        let mut strict = ThresholdConfig::default();
        strict.min_peaks_for_detection = 10;
        node.set_thresholds(strict);

        let mut hw = MockHardware::new().with_seed(4);
        hw.set_pattern(VibrationPattern::Anomaly);
        hw.set_signal_amplitude(30000);

        // Ten peaks is beyond what the synthetic anomaly produces, so the
        // activity veto forces SLEEP
        let report = node.run_cycle(&mut hw);
        assert_eq!(report.decision, Decision::Sleep);
    }

    #[test]
    fn test_confidence_pct_bounds() {
        assert_eq!(confidence_pct(Fixed::ZERO), 0);
        assert_eq!(confidence_pct(Fixed::ONE), 100);
        assert_eq!(confidence_pct(Fixed::from_f32(0.85)), 84); // truncating
        assert_eq!(confidence_pct(Fixed::from_f32(2.0)), 100);
    }
}
