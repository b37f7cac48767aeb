//! Burst assembly module
//!
//! Drives transform sampling, frame resampling and correspondence-field
//! computation for every frame of a synthetic burst.

mod assembler;
pub mod config;
pub mod types;

pub use assembler::{single_to_lr_burst, BurstAssembler};
pub use config::{BurstConfig, BurstConfigBuilder};
pub use types::{FlowField, SyntheticBurst};
