//! sRGB -> RAW burst orchestration

use rand::Rng;
use tracing::{debug, info, instrument};

use crate::burst_pipeline::{
    burst::BurstAssembler,
    common::{BurstError, Image, PixelRange, Result},
    isp::{CameraPipeline, ColorMatrix, NoiseLevels, Unprocessor, WhiteBalanceGains},
    raw_burst::{
        config::{ProcessingFlags, SynthesisConfig},
        types::{BurstMetadata, RawBurst},
    },
};

/// Turns one sRGB image into a noisy, mosaicked low-resolution RAW burst.
pub struct RawBurstSynthesizer<P: CameraPipeline> {
    pipeline: P,
    assembler: BurstAssembler,
    flags: ProcessingFlags,
}

impl RawBurstSynthesizer<Unprocessor> {
    pub fn new(config: SynthesisConfig) -> Result<Self> {
        Self::with_pipeline(Unprocessor::rggb()?, config)
    }
}

impl<P: CameraPipeline> RawBurstSynthesizer<P> {
    pub fn with_pipeline(pipeline: P, config: SynthesisConfig) -> Result<Self> {
        let assembler = BurstAssembler::new(config.burst)?;
        Ok(Self {
            pipeline,
            assembler,
            flags: config.processing,
        })
    }

    pub fn flags(&self) -> &ProcessingFlags {
        &self.flags
    }

    pub fn assembler(&self) -> &BurstAssembler {
        &self.assembler
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    #[instrument(
        skip(self, image, rng),
        fields(width = image.width, height = image.height)
    )]
    pub fn synthesize<R: Rng + ?Sized>(&self, image: &Image, rng: &mut R) -> Result<RawBurst> {
        image.ensure_channels(3)?;
        // Rejects degenerate sizes before any randomness is consumed
        let output_size = self.assembler.plan_for(image)?.output_size();
        if output_size < self.pipeline.min_frame_size() {
            return Err(BurstError::InvalidDimensions(output_size, output_size));
        }

        let image = match image.range {
            PixelRange::Normalized => image.clone(),
            PixelRange::EightBit => {
                debug!("Converting 8-bit input to normalized range");
                image.to_normalized()
            }
        };
        let flags = self.flags;

        let rgb2cam = if flags.random_ccm {
            self.pipeline.random_ccm(rng)
        } else {
            ColorMatrix::identity()
        };
        let cam2rgb = rgb2cam.inverse()?;

        let gains = if flags.random_gains {
            self.pipeline.random_gains(rng)
        } else {
            WhiteBalanceGains::neutral()
        };

        let linear_image = {
            let _span = tracing::info_span!("unprocess").entered();
            let mut linear = image;
            if flags.smoothstep {
                linear = self.pipeline.invert_smoothstep(&linear)?;
            }
            if flags.gamma {
                linear = self.pipeline.gamma_expansion(&linear)?;
            }
            linear = self.pipeline.apply_ccm(&linear, &rgb2cam)?;
            linear = self.pipeline.safe_invert_gains(&linear, &gains)?;
            // Clip saturated pixels
            linear.clamp(0.0, 1.0)
        };

        let burst = self.assembler.assemble(&linear_image, rng)?;

        let mosaicked = {
            let _span = tracing::info_span!("mosaic").entered();
            self.pipeline.mosaic(&burst.frames)?
        };

        let (frames, noise) = if flags.add_noise {
            let _span = tracing::info_span!("add_noise").entered();
            let levels = self.pipeline.random_noise_levels(rng);
            (self.pipeline.add_noise(mosaicked, &levels, rng), levels)
        } else {
            (mosaicked, NoiseLevels::none())
        };
        let frames: Vec<Image> = frames.iter().map(|f| f.clamp(0.0, 1.0)).collect();

        let metadata = BurstMetadata {
            rgb2cam,
            cam2rgb,
            rgb_gain: gains.rgb_gain,
            red_gain: gains.red_gain,
            blue_gain: gains.blue_gain,
            smoothstep: flags.smoothstep,
            gamma: flags.gamma,
            shot_noise_level: noise.shot_noise_level,
            read_noise_level: noise.read_noise_level,
            random_ccm: flags.random_ccm,
            random_gains: flags.random_gains,
            add_noise: flags.add_noise,
        };

        info!(
            frames = frames.len(),
            shot_noise = metadata.shot_noise_level,
            read_noise = metadata.read_noise_level,
            "RAW burst synthesized"
        );

        Ok(RawBurst {
            frames,
            linear_image,
            rgb_frames: burst.frames,
            flow: burst.flow,
            metadata,
        })
    }
}

/// One-shot synthesis with the default `Unprocessor`.
pub fn rgb_to_raw_burst<R: Rng + ?Sized>(
    image: &Image,
    config: SynthesisConfig,
    rng: &mut R,
) -> Result<RawBurst> {
    RawBurstSynthesizer::new(config)?.synthesize(image, rng)
}
