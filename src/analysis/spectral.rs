// SpectralProcessor - approximate magnitude-spectrum estimation
//
// Estimates the frequency content of an int16 vibration window using only
// bounded, pre-sized memory. Instead of an FFT, each of num_bins frequency
// bins is correlated against synthesized sine/cosine carriers built from a
// piecewise-linear (triangle-wave) sine approximation sampled at 256 steps
// per cycle. Magnitude is estimated with the alpha-max-plus-beta-min rule
// |z| ~= max(|Re|,|Im|) + 0.4*min(|Re|,|Im|), avoiding a square root.
//
// Both approximations are part of the numeric contract: the activity-veto
// floor, peak threshold ratio, and the model's calibrated scale factor were
// all tuned against this estimator, not against an exact spectrum.

use serde::{Deserialize, Serialize};

use crate::fixed::{Fixed, FIXED_ONE, FIXED_SHIFT};

/// Hard cap on spectral bins; magnitude buffers are sized to this at compile
/// time and never grow
pub const MAX_BINS: usize = 128;

/// Default number of frequency bins
pub const DEFAULT_NUM_BINS: usize = 64;

/// Samples per acquisition window
pub const SAMPLE_WINDOW: usize = 256;

/// Ratio of the peak magnitude used as the peak-finding threshold (0.2)
const PEAK_THRESHOLD_RATIO: Fixed = Fixed::from_raw(FIXED_ONE / 5);

/// Spectral features of one sample window
///
/// Produced fresh each cycle; a plain value with no identity beyond its
/// fields. An all-zero result is the defined outcome for an empty window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpectralResult {
    /// Dominant frequency in Hz (fixed-point)
    pub dominant_frequency: Fixed,
    /// Magnitude of the strongest non-DC bin (fixed-point)
    pub peak_magnitude: Fixed,
    /// Spectral centroid as a fractional bin index (fixed-point)
    pub spectral_centroid: Fixed,
    /// Number of significant peaks above 20% of the peak magnitude
    pub num_peaks: u8,
}

/// Triangle-wave sine approximation.
///
/// `angle_256` is the phase scaled so that 256 equals a full cycle. The
/// quarter wave is a straight line from 0 to FIXED_ONE over 64 steps,
/// mirrored and negated into the other quadrants.
fn fast_sin(angle_256: u32) -> Fixed {
    let angle = angle_256 & 255;

    let mut x = angle as i32;
    if x > 128 {
        x = 256 - x;
    }
    if x > 64 {
        x = 128 - x;
    }

    let mut result = (x * FIXED_ONE) / 64;
    if angle > 128 {
        result = -result;
    }

    Fixed::from_raw(result)
}

/// cos(x) = sin(x + pi/2)
fn fast_cos(angle_256: u32) -> Fixed {
    fast_sin(angle_256.wrapping_add(64))
}

/// Bounded spectral feature extractor
///
/// Configured once with a bin count (clamped to [`MAX_BINS`]) and the sensor
/// sample rate; holds no per-cycle state, so repeated calls with identical
/// input produce identical output.
pub struct SpectralProcessor {
    num_bins: usize,
    sample_rate: u32,
}

impl SpectralProcessor {
    /// Create a processor for `num_bins` frequency bins at `sample_rate` Hz
    pub fn new(num_bins: usize, sample_rate: u32) -> Self {
        let clamped = num_bins.min(MAX_BINS);
        if clamped != num_bins {
            log::warn!(
                "[Spectral] num_bins {} exceeds MAX_BINS, clamping to {}",
                num_bins,
                MAX_BINS
            );
        }
        Self {
            num_bins: clamped,
            sample_rate,
        }
    }

    /// Number of frequency bins
    pub fn num_bins(&self) -> usize {
        self.num_bins
    }

    /// Correlate the window against each bin's carriers and estimate per-bin
    /// magnitudes.
    ///
    /// Fills `magnitudes[..num_bins.min(magnitudes.len())]`. Bin k sits at
    /// roughly k * Nyquist / num_bins. An empty window writes zeros.
    pub fn compute_magnitude_spectrum(&self, samples: &[i16], magnitudes: &mut [Fixed]) {
        let bins = self.num_bins.min(magnitudes.len());

        if samples.is_empty() {
            for mag in magnitudes[..bins].iter_mut() {
                *mag = Fixed::ZERO;
            }
            return;
        }

        for (k, mag) in magnitudes[..bins].iter_mut().enumerate() {
            let mut real_sum: i64 = 0;
            let mut imag_sum: i64 = 0;

            // Carrier phase step: 256 steps = one cycle of bin k
            let freq_mult = (k * 256) / self.num_bins;

            for (n, &sample) in samples.iter().enumerate() {
                let angle = ((freq_mult as u64 * n as u64) % 256) as u32;

                real_sum += sample as i64 * fast_cos(angle).raw() as i64;
                imag_sum += sample as i64 * fast_sin(angle).raw() as i64;
            }

            real_sum /= samples.len() as i64;
            imag_sum /= samples.len() as i64;

            // |z| ~= max + 0.4*min, then drop the carrier's Q16 scale
            let abs_real = real_sum.abs();
            let abs_imag = imag_sum.abs();
            let max_val = abs_real.max(abs_imag);
            let min_val = abs_real.min(abs_imag);

            *mag = Fixed::from_raw(((max_val + (min_val * 4) / 10) >> FIXED_SHIFT) as i32);
        }
    }

    /// Count local maxima strictly above `threshold`.
    ///
    /// Only interior bins qualify; the first and last bin are never peaks
    /// because they have no second neighbor to exceed.
    pub fn find_peaks(&self, magnitudes: &[Fixed], threshold: Fixed) -> u8 {
        let mut peak_count: u8 = 0;

        for i in 1..magnitudes.len().saturating_sub(1) {
            if magnitudes[i] > threshold
                && magnitudes[i] > magnitudes[i - 1]
                && magnitudes[i] > magnitudes[i + 1]
            {
                peak_count += 1;
            }
        }

        peak_count
    }

    /// Magnitude-weighted mean bin index, sum(i * mag[i]) / sum(mag[i]).
    ///
    /// Returns zero when the total magnitude is zero.
    pub fn compute_centroid(&self, magnitudes: &[Fixed]) -> Fixed {
        let mut weighted_sum: i64 = 0;
        let mut magnitude_sum: i64 = 0;

        for (i, mag) in magnitudes.iter().enumerate() {
            weighted_sum += mag.raw() as i64 * i as i64;
            magnitude_sum += mag.raw() as i64;
        }

        if magnitude_sum == 0 {
            return Fixed::ZERO;
        }

        Fixed::from_raw(((weighted_sum * FIXED_ONE as i64) / magnitude_sum) as i32)
    }

    /// Analyze one sample window into a [`SpectralResult`].
    ///
    /// The DC bin is excluded from the peak-magnitude search. The peak-count
    /// threshold is 20% of the peak magnitude. An empty window yields the
    /// all-zero result; this is a defined outcome, not an error.
    pub fn process(&self, samples: &[i16]) -> SpectralResult {
        let mut result = SpectralResult::default();

        let bins = self.num_bins;
        if samples.is_empty() || bins == 0 {
            return result;
        }

        let mut magnitudes = [Fixed::ZERO; MAX_BINS];

        self.compute_magnitude_spectrum(samples, &mut magnitudes[..bins]);

        // Strongest non-DC bin
        let mut max_mag = Fixed::ZERO;
        let mut max_bin = 0usize;
        for (i, &mag) in magnitudes[..bins].iter().enumerate().skip(1) {
            if mag > max_mag {
                max_mag = mag;
                max_bin = i;
            }
        }

        result.peak_magnitude = max_mag;

        // freq = bin * sample_rate / (2 * bins)
        result.dominant_frequency = Fixed::from_raw(
            ((max_bin as i64 * self.sample_rate as i64 * FIXED_ONE as i64) / (2 * bins) as i64)
                as i32,
        );

        let peak_threshold = max_mag.mul(PEAK_THRESHOLD_RATIO);
        result.num_peaks = self.find_peaks(&magnitudes[..bins], peak_threshold);
        result.spectral_centroid = self.compute_centroid(&magnitudes[..bins]);

        result
    }

    /// Compute the normalized feature vector for inference.
    ///
    /// Recomputes the raw magnitude spectrum into `features` and divides
    /// every bin by the maximum bin value, so the strongest bin becomes 1.0.
    /// An all-zero spectrum is passed through unchanged. Returns the number
    /// of features written, or 0 (writing nothing) when the destination is
    /// smaller than `num_bins`.
    pub fn extract_features(&self, samples: &[i16], features: &mut [Fixed]) -> usize {
        if features.len() < self.num_bins {
            return 0;
        }

        let out = &mut features[..self.num_bins];
        self.compute_magnitude_spectrum(samples, out);

        let max_val = out.iter().copied().max().unwrap_or(Fixed::ZERO);

        if max_val > Fixed::ZERO {
            for feature in out.iter_mut() {
                *feature = Fixed::from_raw(
                    ((feature.raw() as i64 * FIXED_ONE as i64) / max_val.raw() as i64) as i32,
                );
            }
        }

        self.num_bins
    }
}

#[cfg(test)]
#[path = "spectral_tests.rs"]
mod tests;
