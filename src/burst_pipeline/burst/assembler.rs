//! Burst assembly: sampling, warping and correspondence fields for every frame

use rand::Rng;
use tracing::{debug, info, instrument};

use crate::burst_pipeline::{
    burst::{
        config::BurstConfig,
        types::{FlowField, SyntheticBurst},
    },
    common::error::{BurstError, Result},
    common::Image,
    resample::{Interpolation, ResamplePlan, SamplingGrid},
    transform::{build_transform_matrix, TransformParams, TransformSampler},
};

/// Generates a burst of randomly transformed, downsampled views of one image.
///
/// Frame 0 only receives the centering shift and is the reference that all
/// flow vectors point to.
#[derive(Debug, Clone)]
pub struct BurstAssembler {
    config: BurstConfig,
    interpolation: Interpolation,
    sampler: TransformSampler,
}

impl BurstAssembler {
    /// Validates `config`; nothing is sampled until `assemble` is called.
    pub fn new(config: BurstConfig) -> Result<Self> {
        let interpolation: Interpolation = config.interpolation_type.parse()?;

        if config.burst_size == 0 {
            return Err(BurstError::InvalidBurstSize(config.burst_size));
        }
        if !config.downsample_factor.is_finite() || config.downsample_factor <= 0.0 {
            return Err(BurstError::InvalidDownsampleFactor(config.downsample_factor));
        }
        config.transform.validate()?;

        let sampler = TransformSampler::new(config.transform.clone(), config.downsample_factor);
        Ok(Self {
            config,
            interpolation,
            sampler,
        })
    }

    pub fn config(&self) -> &BurstConfig {
        &self.config
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// Builds the resample plan for a base image, rejecting degenerate sizes.
    pub fn plan_for(&self, image: &Image) -> Result<ResamplePlan> {
        ResamplePlan::new(
            self.interpolation,
            self.config.transform.effective_border_crop(),
            self.config.downsample_factor,
            image.width,
            image.height,
        )
    }

    #[instrument(
        skip(self, image, rng),
        fields(
            width = image.width,
            height = image.height,
            burst_size = self.config.burst_size,
            interpolation = %self.interpolation
        )
    )]
    pub fn assemble<R: Rng + ?Sized>(&self, image: &Image, rng: &mut R) -> Result<SyntheticBurst> {
        let plan = self.plan_for(image)?;
        let grid = SamplingGrid::new(image.width, image.height);
        let factor = self.config.downsample_factor as f32;

        let mut frames = Vec::with_capacity(self.config.burst_size);
        let mut positions = Vec::with_capacity(self.config.burst_size);

        for index in 0..self.config.burst_size {
            let _span = tracing::debug_span!("burst_frame", index).entered();

            let transform = self.sampler.sample_frame(index, rng);
            let matrix = build_transform_matrix(image.height, image.width, &transform);
            debug!(?transform, matrix = ?matrix.as_rows(), "Frame transform");

            frames.push(plan.resample_image(image, &matrix)?);

            // Positions in output-resolution units
            let mut field = plan.resample_field(&grid, &matrix)?;
            field.data.iter_mut().for_each(|v| *v /= factor);
            positions.push(field);
        }

        let flow = FlowField::from_positions(&positions)?;

        info!(
            frames = frames.len(),
            output_size = plan.output_size(),
            "Burst assembled"
        );
        Ok(SyntheticBurst { frames, flow })
    }
}

/// One-shot form of [`BurstAssembler::assemble`].
pub fn single_to_lr_burst<R: Rng + ?Sized>(
    image: &Image,
    burst_size: usize,
    downsample_factor: f64,
    transform: &TransformParams,
    interpolation_type: &str,
    rng: &mut R,
) -> Result<SyntheticBurst> {
    let config = BurstConfig {
        burst_size,
        downsample_factor,
        transform: transform.clone(),
        interpolation_type: interpolation_type.to_string(),
    };
    BurstAssembler::new(config)?.assemble(image, rng)
}
