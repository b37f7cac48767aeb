use anyhow::Context;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use synthetic_burst_rs::burst_pipeline::{
    random_crop, BurstConfig, Image, PixelRange, RawBurstSynthesizer, SynthesisConfig,
    TransformParams,
};
use synthetic_burst_rs::logger;

use tracing::info;

const SOURCE_SIZE: usize = 320;
const CROP_SIZE: usize = 256;
const SEED: u64 = 42;

/// Smooth colour ramp standing in for a photograph.
fn gradient_image(size: usize) -> anyhow::Result<Image> {
    let span = (size - 1).max(1) as f32;
    let image = Image::from_fn(size, size, 3, PixelRange::EightBit, |row, col, ch| {
        let (y, x) = (row as f32 / span, col as f32 / span);
        let value = match ch {
            0 => x,
            1 => y,
            _ => 0.5 * (1.0 - x) + 0.5 * y * (1.0 - y) * 4.0,
        };
        (value.clamp(0.0, 1.0) * 255.0).round()
    })?;
    Ok(image)
}

fn main() -> anyhow::Result<()> {
    logger::init();

    info!("Starting synthetic_burst...");

    let mut rng = ChaCha8Rng::seed_from_u64(SEED);

    let source = gradient_image(SOURCE_SIZE)?;
    let image = random_crop(&source, CROP_SIZE, &mut rng).context("cropping source image")?;

    let transform = TransformParams {
        max_translation: 24.0,
        max_rotation: 1.0,
        max_shear: 0.0,
        max_ar_factor: 0.0,
        max_scale: 0.0,
        border_crop: Some(24),
    };
    let config = SynthesisConfig::builder()
        .burst(
            BurstConfig::builder()
                .burst_size(14)
                .downsample_factor(4.0)
                .transform(transform)
                .interpolation_type("bilinear")
                .build(),
        )
        .build();
    let synthesizer = RawBurstSynthesizer::new(config)?;

    info!("RAW burst synthesizer initialized");
    info!("Interpolation: {}", synthesizer.assembler().interpolation());
    info!("Processing: {:?}", synthesizer.flags());

    let raw = synthesizer
        .synthesize(&image, &mut rng)
        .context("synthesizing RAW burst")?;

    let first = &raw.frames[0];
    info!(
        "Burst: {} frames of {}x{}x{}",
        raw.frames.len(),
        first.height,
        first.width,
        first.channels
    );
    info!("Flow shape: {:?}", raw.flow.shape());
    for index in 0..raw.flow.burst_size {
        info!("Frame {index} max flow: {:.3} px", raw.flow.max_magnitude(index));
    }
    info!("Metadata: {}", raw.metadata.to_json()?);

    Ok(())
}
