//! Burst generation configuration

use crate::burst_pipeline::transform::TransformParams;

/// Configuration for turning one image into a burst
#[derive(Debug, Clone)]
pub struct BurstConfig {
    /// Number of frames, including the reference frame
    pub burst_size: usize,
    /// Spatial reduction applied after warping
    pub downsample_factor: f64,
    /// Bounds of the random per-frame motion
    pub transform: TransformParams,
    /// Interpolation kernel name, "bilinear" or "lanczos"
    pub interpolation_type: String,
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            burst_size: 8,
            downsample_factor: 1.0,
            transform: TransformParams::default(),
            interpolation_type: "bilinear".to_string(),
        }
    }
}

impl BurstConfig {
    pub fn builder() -> BurstConfigBuilder {
        BurstConfigBuilder::default()
    }
}

/// Builder for BurstConfig
#[derive(Default)]
pub struct BurstConfigBuilder {
    burst_size: Option<usize>,
    downsample_factor: Option<f64>,
    transform: Option<TransformParams>,
    interpolation_type: Option<String>,
}

impl BurstConfigBuilder {
    pub fn burst_size(mut self, burst_size: usize) -> Self {
        self.burst_size = Some(burst_size);
        self
    }

    pub fn downsample_factor(mut self, factor: f64) -> Self {
        self.downsample_factor = Some(factor);
        self
    }

    pub fn transform(mut self, params: TransformParams) -> Self {
        self.transform = Some(params);
        self
    }

    pub fn interpolation_type(mut self, name: impl Into<String>) -> Self {
        self.interpolation_type = Some(name.into());
        self
    }

    pub fn build(self) -> BurstConfig {
        let default = BurstConfig::default();
        BurstConfig {
            burst_size: self.burst_size.unwrap_or(default.burst_size),
            downsample_factor: self.downsample_factor.unwrap_or(default.downsample_factor),
            transform: self.transform.unwrap_or(default.transform),
            interpolation_type: self.interpolation_type.unwrap_or(default.interpolation_type),
        }
    }
}
