//! Resampling module
//!
//! Interpolation kernels, affine warping, resizing and the `ResamplePlan`
//! that keeps frame and correspondence-field geometry in lockstep.

pub mod grid;
pub mod interpolation;
pub mod plan;
pub mod raster;
pub mod resize;
pub mod warp;

pub use grid::SamplingGrid;
pub use interpolation::Interpolation;
pub use plan::{Content, ResamplePlan};
pub use raster::{Border, Raster};
pub use resize::resize;
pub use warp::warp_affine;
