// Quantized model parameters - placeholder calibration artifact
//
// The deployed node receives its weight matrix, bias vector, and scale
// factor as an externally trained calibration artifact flashed alongside the
// firmware. Only the shape contract is fixed here: int8 weights in row-major
// `MODEL_OUTPUT_SIZE x MODEL_INPUT_SIZE` order, one int8 bias per class, and
// a Q15.16 scale factor produced by the quantization step.
//
// The values below are a stand-in with the anomaly-detector structure
// (class 0 favors a single low-frequency machine tone, class 1 favors the
// harmonic clusters of a degrading bearing, class 2 is weakly excited by
// everything); they are not a trained model.

use crate::fixed::Fixed;

/// Feature-vector length the default model expects (one per spectral bin)
pub const MODEL_INPUT_SIZE: usize = 64;

/// Classes: 0 = normal, 1 = anomaly, 2 = uncertain
pub const MODEL_OUTPUT_SIZE: usize = 3;

/// Calibrated post-accumulation scale (~0.05 in Q15.16)
pub const MODEL_SCALE_FACTOR: Fixed = Fixed::from_raw(3277);

/// Row-major int8 weights, MODEL_OUTPUT_SIZE rows x MODEL_INPUT_SIZE columns
pub static MODEL_WEIGHTS: [i8; MODEL_INPUT_SIZE * MODEL_OUTPUT_SIZE] = [
    // class 0: normal operation (dominant tone in the low bins)
    -20, 10, 45, 75, 95, 100, 92, 78, 55, 30, 5, -15, -30, -40, -45, -48, //
    -50, -48, -46, -44, -42, -40, -38, -36, -34, -32, -30, -28, -26, -24, -22, -20, //
    -19, -18, -17, -16, -16, -15, -15, -14, -14, -13, -13, -12, -12, -11, -11, -10, //
    -10, -10, -10, -10, -10, -10, -10, -10, -10, -10, -10, -10, -10, -10, -10, -10, //
    // class 1: anomaly (harmonic clusters above the machine tone)
    -40, -35, -25, -10, 0, 10, 20, 35, 50, 70, 85, 95, 100, 96, 88, 78, //
    66, 54, 44, 35, 30, 26, 22, 18, 15, 13, 11, 10, 9, 8, 7, 6, //
    5, 5, 4, 4, 3, 3, 2, 2, 1, 1, 0, 0, -1, -1, -2, -2, //
    -3, -3, -4, -4, -5, -5, -6, -6, -7, -7, -8, -8, -9, -9, -10, -10, //
    // class 2: uncertain (weak, broadly spread response)
    8, 12, 10, 14, 11, 13, 12, 10, 9, 11, 13, 12, 10, 9, 8, 10, //
    12, 11, 10, 9, 8, 10, 11, 12, 10, 9, 8, 10, 11, 10, 9, 8, //
    10, 11, 12, 10, 9, 8, 10, 11, 12, 10, 9, 8, 10, 11, 12, 10, //
    9, 8, 10, 11, 12, 10, 9, 8, 10, 11, 12, 10, 9, 8, 10, 11, //
];

/// Per-class int8 biases
pub static MODEL_BIASES: [i8; MODEL_OUTPUT_SIZE] = [15, -5, 8];
