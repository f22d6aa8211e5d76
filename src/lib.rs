// Spectral-Gate Core - battery-aware vibration anomaly decision pipeline
//
// Decision core of a battery-powered vibration sensor node. Each cycle a raw
// accelerometer window is reduced to an approximate magnitude spectrum, a
// normalized feature vector, a quantized single-layer classification, and
// finally a transmit-or-sleep decision whose confidence bar scales with the
// remaining battery energy. The whole pipeline is Q15.16 fixed-point with
// fixed-size buffers; the deployment target has no FPU and no allocator
// headroom.

// Module declarations
pub mod analysis;
pub mod config;
pub mod decision;
pub mod fixed;
pub mod hal;
pub mod node;

// Re-exports for convenience
pub use analysis::{InferenceEngine, InferenceResult, SpectralProcessor, SpectralResult};
pub use config::NodeConfig;
pub use decision::{evaluate, Decision, ThresholdConfig};
pub use fixed::Fixed;
pub use hal::{AlertKind, Hardware};
pub use node::{CycleReport, SensorNode};
