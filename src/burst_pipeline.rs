//! Synthetic RAW burst generation
//!
//! This module turns a single sRGB image into a low-resolution RAW burst with
//! ground-truth flow, split into affine transform sampling, resampling, burst
//! assembly, inverse camera processing and cropping.

pub mod burst;
pub mod common;
pub mod crop;
pub mod isp;
pub mod raw_burst;
pub mod resample;
pub mod transform;

pub use common::{
    BurstError,
    Image,
    PixelRange,
    Result,
};

pub use transform::{
    Affine2D,
    FrameTransform,
    TransformParams,
    TransformSampler,
};

pub use resample::{
    Interpolation,
    ResamplePlan,
};

pub use burst::{
    single_to_lr_burst,
    BurstAssembler,
    BurstConfig,
    FlowField,
    SyntheticBurst,
};

pub use isp::{
    CameraPipeline,
    Unprocessor,
};

pub use raw_burst::{
    rgb_to_raw_burst,
    ProcessingFlags,
    RawBurst,
    RawBurstSynthesizer,
    SynthesisConfig,
};

pub use crop::{
    random_crop,
    random_crop_frames,
    CropSize,
};
