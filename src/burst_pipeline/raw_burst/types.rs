//! Sensor-domain burst output types

use serde::Serialize;

use crate::burst_pipeline::burst::FlowField;
use crate::burst_pipeline::common::Image;
use crate::burst_pipeline::isp::{ColorMatrix, NoiseLevels, WhiteBalanceGains};

/// Everything needed to invert the synthesis back toward sRGB.
///
/// Disabled stages are reported with their neutral values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BurstMetadata {
    pub rgb2cam: ColorMatrix,
    pub cam2rgb: ColorMatrix,
    pub rgb_gain: f64,
    pub red_gain: f64,
    pub blue_gain: f64,
    pub smoothstep: bool,
    pub gamma: bool,
    pub shot_noise_level: f64,
    pub read_noise_level: f64,
    pub random_ccm: bool,
    pub random_gains: bool,
    pub add_noise: bool,
}

impl BurstMetadata {
    pub fn gains(&self) -> WhiteBalanceGains {
        WhiteBalanceGains {
            rgb_gain: self.rgb_gain,
            red_gain: self.red_gain,
            blue_gain: self.blue_gain,
        }
    }

    pub fn noise_levels(&self) -> NoiseLevels {
        NoiseLevels {
            shot_noise_level: self.shot_noise_level,
            read_noise_level: self.read_noise_level,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Result of sRGB -> RAW burst synthesis
#[derive(Debug, Clone)]
pub struct RawBurst {
    /// Mosaicked, noisy frames clamped to [0, 1]
    pub frames: Vec<Image>,
    /// Base image in linear camera space, before warping
    pub linear_image: Image,
    /// Warped and downsampled frames before mosaicking
    pub rgb_frames: Vec<Image>,
    /// Flow of every frame to frame 0, `(N, 2, H, W)`
    pub flow: FlowField,
    pub metadata: BurstMetadata,
}
