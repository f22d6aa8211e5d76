// Analysis module - bounded-memory DSP pipeline for anomaly detection
//
// This module holds the per-cycle numeric pipeline of the sensor node:
//
//   samples -> SpectralProcessor::process          -> SpectralResult
//   samples -> SpectralProcessor::extract_features -> feature vector
//   feature vector -> InferenceEngine::run         -> InferenceResult
//
// Everything here runs on Q15.16 fixed-point integers with fixed-size stack
// buffers (at most MAX_BINS spectral bins, MAX_OUTPUT_CLASSES classes) so a
// cycle has a hard upper bound on both memory and time. The two spectral
// entry points are independent; the cycle runner invokes both on the same
// sample window, but callers may use either alone.

pub mod inference;
pub mod model;
pub mod spectral;

pub use inference::{InferenceEngine, InferenceResult, MAX_OUTPUT_CLASSES};
pub use spectral::{SpectralProcessor, SpectralResult, DEFAULT_NUM_BINS, MAX_BINS, SAMPLE_WINDOW};
