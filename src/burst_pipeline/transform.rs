//! Affine transform module
//!
//! Sampling of per-frame motion parameters and their composition into a
//! single affine matrix.

pub mod affine;
pub mod matrix;
pub mod params;
pub mod sampler;

pub use affine::Affine2D;
pub use matrix::build_transform_matrix;
pub use params::{FrameTransform, TransformParams};
pub use sampler::TransformSampler;
