//! Inverse camera pipeline module
//!
//! The `CameraPipeline` trait is the boundary between burst synthesis and the
//! colour-processing inversion; `Unprocessor` is the default implementation.

mod pipeline;
pub mod types;
mod unprocess;

pub use pipeline::CameraPipeline;
pub use types::{ColorMatrix, NoiseLevels, WhiteBalanceGains};
pub use unprocess::Unprocessor;
