//! Sensor-domain burst synthesis module
//!
//! Orchestrates the inverse camera pipeline, burst assembly, mosaicking and
//! noise injection.

pub mod config;
mod synthesizer;
pub mod types;


pub use config::{ProcessingFlags, SynthesisConfig, SynthesisConfigBuilder};
pub use synthesizer::{rgb_to_raw_burst, RawBurstSynthesizer};
pub use types::{BurstMetadata, RawBurst};
