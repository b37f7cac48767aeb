use thiserror::Error;

use crate::burst_pipeline::common::image::PixelRange;

#[derive(Error, Debug)]
pub enum BurstError {
    #[error("Unknown interpolation type: {0} (expected 'bilinear' or 'lanczos')")]
    UnknownInterpolation(String),

    #[error("Invalid burst size: {0}")]
    InvalidBurstSize(usize),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Invalid downsample factor: {0}")]
    InvalidDownsampleFactor(f64),

    #[error("Border crop {border_crop} leaves no pixels in a {width}x{height} image")]
    InvalidBorderCrop {
        border_crop: usize,
        width: usize,
        height: usize,
    },

    #[error("Invalid transformation parameters: {0}")]
    InvalidTransformParams(String),

    #[error("Invalid crop size: height={0}, width={1}")]
    InvalidCropSize(usize, usize),

    #[error("Expected {expected} channels, got {actual}")]
    ChannelMismatch { expected: usize, actual: usize },

    #[error("Expected {expected:?} pixel values, got {actual:?}")]
    RangeMismatch {
        expected: PixelRange,
        actual: PixelRange,
    },

    #[error("Matrix is not invertible: {0}")]
    SingularMatrix(String),

    #[error("Invalid noise distribution: {0}")]
    InvalidDistribution(#[from] rand_distr::NormalError),

    #[error("Invalid configuration: {0}")]
    ConfigError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BurstError>;
