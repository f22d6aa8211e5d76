// MockHardware - PC-side simulation of the sensor node
//
// Stands in for the STM32 board during tests and demos: synthesizes
// vibration windows, exposes a settable battery voltage, and records every
// sleep and transmission so tests can assert on the node's external
// behavior. Floating point is fine here; this is the simulation boundary,
// not the deployment numeric path.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{AlertKind, Hardware};
use crate::decision::BATTERY_NOMINAL_MV;

/// Sample rate the simulated sensor runs at
pub const MOCK_SAMPLE_RATE_HZ: u32 = 1000;

/// Shape of the synthesized vibration signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VibrationPattern {
    /// Uniform noise only
    Noise,
    /// Single tone at the configured frequency plus noise
    Sinusoid,
    /// Multi-frequency pattern with occasional noise bursts, imitating a
    /// degrading bearing
    Anomaly,
}

/// Simulated hardware with transmit/sleep accounting
pub struct MockHardware {
    battery_mv: u16,
    pattern: VibrationPattern,
    signal_frequency_hz: u32,
    signal_amplitude: i16,
    noise_level: i16,
    wake_pending: bool,
    transmit_count: u32,
    total_sleep_ms: u32,
    phase: u32,
    transmissions: Vec<(AlertKind, u8)>,
    rng: StdRng,
    start: Instant,
}

impl MockHardware {
    /// Mock at nominal battery with a clean 100 Hz tone
    pub fn new() -> Self {
        Self::with_battery(BATTERY_NOMINAL_MV)
    }

    /// Mock with a specific initial battery voltage
    pub fn with_battery(battery_mv: u16) -> Self {
        Self {
            battery_mv,
            pattern: VibrationPattern::Sinusoid,
            signal_frequency_hz: 100,
            signal_amplitude: 8000,
            noise_level: 500,
            wake_pending: false,
            transmit_count: 0,
            total_sleep_ms: 0,
            phase: 0,
            transmissions: Vec::new(),
            rng: StdRng::from_entropy(),
            start: Instant::now(),
        }
    }

    /// Seed the noise generator for reproducible tests
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn set_battery_mv(&mut self, battery_mv: u16) {
        self.battery_mv = battery_mv;
    }

    pub fn set_pattern(&mut self, pattern: VibrationPattern) {
        self.pattern = pattern;
    }

    pub fn set_signal_frequency(&mut self, freq_hz: u32) {
        self.signal_frequency_hz = freq_hz;
    }

    pub fn set_signal_amplitude(&mut self, amplitude: i16) {
        self.signal_amplitude = amplitude;
    }

    pub fn set_noise_level(&mut self, level: i16) {
        self.noise_level = level;
    }

    pub fn trigger_wake(&mut self) {
        self.wake_pending = true;
    }

    pub fn transmit_count(&self) -> u32 {
        self.transmit_count
    }

    pub fn total_sleep_ms(&self) -> u32 {
        self.total_sleep_ms
    }

    /// Every transmission observed, in order
    pub fn transmissions(&self) -> &[(AlertKind, u8)] {
        &self.transmissions
    }

    fn generate_noise(&mut self) -> i16 {
        if self.noise_level == 0 {
            return 0;
        }
        self.rng.gen_range(-self.noise_level..=self.noise_level)
    }

    fn generate_sinusoid(&mut self) -> i16 {
        let phase = 2.0 * std::f64::consts::PI
            * self.signal_frequency_hz as f64
            * self.phase as f64
            / MOCK_SAMPLE_RATE_HZ as f64;
        let signal = (self.signal_amplitude as f64 * phase.sin()) as i16;

        self.phase = self.phase.wrapping_add(1);
        signal.saturating_add(self.generate_noise())
    }

    fn generate_anomaly(&mut self) -> i16 {
        let t = self.phase as f64 / MOCK_SAMPLE_RATE_HZ as f64;
        let two_pi = 2.0 * std::f64::consts::PI;
        let amplitude = self.signal_amplitude as f64;

        // Base rotation tone, a harmonic, and an off-harmonic defect tone
        let signal = (amplitude * 0.5 * (two_pi * 50.0 * t).sin()
            + amplitude * 0.3 * (two_pi * 150.0 * t).sin()
            + amplitude * 0.4 * (two_pi * 237.0 * t).sin()) as i16;

        self.phase = self.phase.wrapping_add(1);

        // Occasional burst imitating an impact event
        let noise = if self.rng.gen_range(0..100) < 5 {
            self.generate_noise().saturating_mul(3)
        } else {
            self.generate_noise()
        };
        signal.saturating_add(noise)
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl Hardware for MockHardware {
    fn read_samples(&mut self, buffer: &mut [i16]) -> usize {
        for sample in buffer.iter_mut() {
            *sample = match self.pattern {
                VibrationPattern::Noise => self.generate_noise(),
                VibrationPattern::Sinusoid => self.generate_sinusoid(),
                VibrationPattern::Anomaly => self.generate_anomaly(),
            };
        }
        buffer.len()
    }

    fn read_battery_mv(&mut self) -> u16 {
        self.battery_mv
    }

    fn now_ms(&mut self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }

    fn sleep(&mut self, duration_ms: u32) {
        log::debug!("[MockHW] sleep {} ms", duration_ms);
        self.total_sleep_ms = self.total_sleep_ms.saturating_add(duration_ms);
    }

    fn transmit(&mut self, kind: AlertKind, confidence_pct: u8) -> bool {
        log::debug!(
            "[MockHW] transmit kind={:?} confidence={}%",
            kind,
            confidence_pct
        );
        self.transmit_count += 1;
        self.transmissions.push((kind, confidence_pct));
        true
    }

    fn wake_pending(&mut self) -> bool {
        self.wake_pending
    }

    fn clear_wake(&mut self) {
        self.wake_pending = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_battery_voltage_is_settable() {
        let mut hw = MockHardware::with_battery(3500);
        assert_eq!(hw.read_battery_mv(), 3500);

        hw.set_battery_mv(3200);
        assert_eq!(hw.read_battery_mv(), 3200);
    }

    #[test]
    fn test_read_samples_fills_buffer() {
        let mut hw = MockHardware::new().with_seed(7);
        let mut buffer = [0i16; 256];
        assert_eq!(hw.read_samples(&mut buffer), 256);
        assert!(
            buffer.iter().any(|&s| s != 0),
            "sinusoid pattern should produce nonzero samples"
        );
    }

    #[test]
    fn test_transmit_and_sleep_accounting() {
        let mut hw = MockHardware::new();
        assert!(hw.transmit(AlertKind::Confirmed, 85));
        assert!(hw.transmit(AlertKind::Uncertain, 55));
        hw.sleep(1000);
        hw.sleep(250);

        assert_eq!(hw.transmit_count(), 2);
        assert_eq!(hw.total_sleep_ms(), 1250);
        assert_eq!(
            hw.transmissions(),
            &[(AlertKind::Confirmed, 85), (AlertKind::Uncertain, 55)]
        );
    }

    #[test]
    fn test_wake_event_flag() {
        let mut hw = MockHardware::new();
        assert!(!hw.wake_pending());
        hw.trigger_wake();
        assert!(hw.wake_pending());
        hw.clear_wake();
        assert!(!hw.wake_pending());
    }
}
