// InferenceEngine - quantized single-layer classifier
//
// Runs the normalized spectral feature vector through one dense layer of
// int8 weights, entirely in integer arithmetic. Raw neuron outputs are
// clamped at zero and then pushed through a bounded min/max normalization
// instead of a softmax: exponentials are both expensive and overflow-prone
// on the target, and the decision thresholds downstream were calibrated
// against this exact approximation. Swapping in a true softmax would shift
// every confidence value and invalidate the calibration.

use serde::{Deserialize, Serialize};

use crate::fixed::{Fixed, FIXED_ONE, FIXED_SHIFT};

/// Hard cap on output neurons; classes configured beyond this are silently
/// ignored
pub const MAX_OUTPUT_CLASSES: usize = 8;

/// Quantization shift of the int8 weights (weights are value * 128)
const WEIGHT_SHIFT: u32 = 7;

/// Raw-output range below which the distribution is considered flat (~0.001)
const UNIFORM_EPSILON: Fixed = Fixed::from_raw(65);

/// Classification of one feature vector
///
/// Value type, produced fresh each cycle. `{class 0, confidence 0}` doubles
/// as the defined fallback for a feature-length mismatch; callers that need
/// to tell the two apart must check the input length themselves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceResult {
    /// Normalized confidence of the predicted class, in [0, 1.0]
    pub confidence: Fixed,
    /// 0 = normal, 1 = anomaly, 2 = model-uncertain
    pub predicted_class: u8,
}

/// Single-layer quantized classifier over borrowed model parameters
///
/// The weight matrix is `output_size` rows by `input_size` columns in
/// row-major order; biases have one entry per output. Both are referenced
/// read-only for the engine's lifetime. `scale_factor` is a calibrated
/// fixed-point multiplier produced alongside the quantized weights.
pub struct InferenceEngine<'m> {
    weights: &'m [i8],
    biases: &'m [i8],
    input_size: usize,
    output_size: usize,
    scale_factor: Fixed,
}

impl<'m> InferenceEngine<'m> {
    /// Create an engine over an externally supplied calibration artifact
    pub fn new(
        weights: &'m [i8],
        biases: &'m [i8],
        input_size: usize,
        output_size: usize,
        scale_factor: Fixed,
    ) -> Self {
        debug_assert_eq!(weights.len(), input_size * output_size);
        debug_assert_eq!(biases.len(), output_size);

        Self {
            weights,
            biases,
            input_size,
            output_size,
            scale_factor,
        }
    }

    /// Engine over the built-in placeholder model artifact
    pub fn with_default_model() -> InferenceEngine<'static> {
        InferenceEngine::new(
            &super::model::MODEL_WEIGHTS,
            &super::model::MODEL_BIASES,
            super::model::MODEL_INPUT_SIZE,
            super::model::MODEL_OUTPUT_SIZE,
            super::model::MODEL_SCALE_FACTOR,
        )
    }

    /// Expected feature-vector length
    pub fn input_size(&self) -> usize {
        self.input_size
    }

    /// Configured number of classes (may exceed [`MAX_OUTPUT_CLASSES`]; the
    /// excess is never evaluated)
    pub fn output_size(&self) -> usize {
        self.output_size
    }

    /// Weighted sum for one output neuron
    fn dot_product(&self, features: &[Fixed], output_idx: usize) -> Fixed {
        let row_start = output_idx * self.input_size;
        let row = &self.weights[row_start..row_start + self.input_size];

        let mut accumulator: i64 = 0;
        for (feature, &weight) in features.iter().zip(row) {
            accumulator += feature.raw() as i64 * weight as i64;
        }

        // Undo the int8 weight quantization, then apply the calibrated scale
        let mut result = Fixed::from_raw((accumulator >> WEIGHT_SHIFT) as i32);
        result = result.mul(self.scale_factor);

        // Bias widened from int8 into the fractional field
        let bias = self.biases[output_idx] as i32;
        result + Fixed::from_raw(bias << (FIXED_SHIFT - WEIGHT_SHIFT))
    }

    /// Bounded softmax substitute: rescale into [0, 1] and renormalize to
    /// sum 1, or emit a uniform distribution when the raw outputs are flat.
    fn normalize_outputs(outputs: &mut [Fixed]) {
        let mut max_val = outputs[0];
        let mut min_val = outputs[0];
        for &out in outputs[1..].iter() {
            max_val = max_val.max(out);
            min_val = min_val.min(out);
        }

        let range = max_val - min_val;
        if range < UNIFORM_EPSILON {
            let uniform = Fixed::from_raw(FIXED_ONE / outputs.len() as i32);
            for out in outputs.iter_mut() {
                *out = uniform;
            }
            return;
        }

        // Scale (out - min) by ~ONE/range without widening the intermediate
        // product past 32 bits; the divisor floor keeps small ranges defined
        let divisor = (range.raw() >> 8).max(1);
        let scale = Fixed::from_raw((FIXED_ONE << 8) / divisor);

        let mut sum: i64 = 0;
        for out in outputs.iter_mut() {
            *out = (*out - min_val).mul(scale);
            if *out < Fixed::ZERO {
                *out = Fixed::ZERO;
            }
            sum += out.raw() as i64;
        }

        if sum > 0 {
            for out in outputs.iter_mut() {
                *out = Fixed::from_raw(((out.raw() as i64 * FIXED_ONE as i64) / sum) as i32);
            }
        }
    }

    /// Index of the largest output
    fn argmax(outputs: &[Fixed]) -> u8 {
        let mut max_idx = 0usize;
        let mut max_val = outputs[0];

        for (i, &out) in outputs.iter().enumerate().skip(1) {
            if out > max_val {
                max_val = out;
                max_idx = i;
            }
        }

        max_idx as u8
    }

    /// Classify a normalized feature vector.
    ///
    /// A feature vector whose length differs from `input_size` yields the
    /// zero-confidence class-0 result; this is a defined outcome rather than
    /// an error. Confidence is always clamped to [0, 1.0].
    pub fn run(&self, features: &[Fixed]) -> InferenceResult {
        if features.len() != self.input_size {
            return InferenceResult::default();
        }

        let mut outputs = [Fixed::ZERO; MAX_OUTPUT_CLASSES];
        let active = self.output_size.min(MAX_OUTPUT_CLASSES);
        if active == 0 {
            return InferenceResult::default();
        }

        for i in 0..active {
            outputs[i] = self.dot_product(features, i);
        }

        // ReLU-style clamp before normalization
        for out in outputs[..active].iter_mut() {
            if *out < Fixed::ZERO {
                *out = Fixed::ZERO;
            }
        }

        Self::normalize_outputs(&mut outputs[..active]);

        let predicted_class = Self::argmax(&outputs[..active]);
        let confidence = outputs[predicted_class as usize].clamp_unit();

        InferenceResult {
            confidence,
            predicted_class,
        }
    }
}

#[cfg(test)]
#[path = "inference_tests.rs"]
mod tests;
