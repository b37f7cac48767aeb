//! Random per-frame transform sampling

use rand::Rng;
use tracing::trace;

use crate::burst_pipeline::transform::params::{FrameTransform, TransformParams};

/// Below this maximum the translation falls back to the centering shift.
const MIN_RANDOM_TRANSLATION: f64 = 0.01;

/// Draws `FrameTransform`s within the bounds of a `TransformParams`.
#[derive(Debug, Clone)]
pub struct TransformSampler {
    params: TransformParams,
    downsample_factor: f64,
}

impl TransformSampler {
    pub fn new(params: TransformParams, downsample_factor: f64) -> Self {
        Self {
            params,
            downsample_factor,
        }
    }

    pub fn params(&self) -> &TransformParams {
        &self.params
    }

    /// Transform of burst frame `index`; frame 0 never consumes randomness.
    pub fn sample_frame<R: Rng + ?Sized>(&self, index: usize, rng: &mut R) -> FrameTransform {
        if index == 0 {
            FrameTransform::reference(self.downsample_factor)
        } else {
            self.sample(rng)
        }
    }

    /// Draws one randomized transform.
    ///
    /// Draw order: translation x, translation y, rotation, shear x, shear y,
    /// aspect ratio, scale.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> FrameTransform {
        let p = &self.params;

        let translation = if p.max_translation <= MIN_RANDOM_TRANSLATION {
            let shift = FrameTransform::centering_shift(self.downsample_factor);
            (shift, shift)
        } else {
            let dx = symmetric_uniform(rng, p.max_translation);
            let dy = symmetric_uniform(rng, p.max_translation);
            (dx, dy)
        };

        let rotation_deg = symmetric_uniform(rng, p.max_rotation);

        let shear_x = symmetric_uniform(rng, p.max_shear);
        let shear_y = symmetric_uniform(rng, p.max_shear);

        // Log-space draws keep both factors strictly positive
        let ar_factor = symmetric_uniform(rng, p.max_ar_factor).exp();
        let scale_factor = symmetric_uniform(rng, p.max_scale).exp();

        let transform = FrameTransform {
            translation,
            rotation_deg,
            shear: (shear_x, shear_y),
            scale: (scale_factor, scale_factor * ar_factor),
        };
        trace!(?transform, "Sampled frame transform");
        transform
    }
}

/// Uniform draw in `[-max, max)`; a zero bound yields exactly zero but still
/// consumes one value from the generator.
fn symmetric_uniform<R: Rng + ?Sized>(rng: &mut R, max: f64) -> f64 {
    let u: f64 = rng.random();
    -max + 2.0 * max * u
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn params() -> TransformParams {
        TransformParams {
            max_translation: 8.0,
            max_rotation: 2.0,
            max_shear: 0.05,
            max_ar_factor: 0.1,
            max_scale: 0.2,
            border_crop: None,
        }
    }

    #[test]
    fn test_samples_within_bounds() {
        let sampler = TransformSampler::new(params(), 4.0);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..500 {
            let t = sampler.sample(&mut rng);
            assert!(t.translation.0.abs() <= 8.0 && t.translation.1.abs() <= 8.0);
            assert!(t.rotation_deg.abs() <= 2.0);
            assert!(t.shear.0.abs() <= 0.05 && t.shear.1.abs() <= 0.05);

            let scale_x = t.scale.0;
            assert!(scale_x >= (-0.2f64).exp() && scale_x <= 0.2f64.exp());
            let ar = t.scale.1 / t.scale.0;
            assert!(ar >= (-0.1f64).exp() - 1e-12 && ar <= 0.1f64.exp() + 1e-12);
        }
    }

    #[test]
    fn test_small_translation_falls_back_to_centering_shift() {
        let sampler = TransformSampler::new(
            TransformParams {
                max_translation: 0.005,
                ..params()
            },
            2.0,
        );
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let t = sampler.sample(&mut rng);
        assert_eq!(t.translation, (0.5, 0.5));
    }

    #[test]
    fn test_zero_maxima_give_identity_motion() {
        let sampler = TransformSampler::new(TransformParams::default(), 1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let t = sampler.sample(&mut rng);
        assert_eq!(t, FrameTransform::reference(1.0));
    }

    #[test]
    fn test_reference_frame_consumes_no_randomness() {
        let sampler = TransformSampler::new(params(), 2.0);
        let mut a = ChaCha8Rng::seed_from_u64(11);
        let mut b = ChaCha8Rng::seed_from_u64(11);

        assert_eq!(sampler.sample_frame(0, &mut a), FrameTransform::reference(2.0));
        assert_eq!(sampler.sample_frame(1, &mut a), sampler.sample(&mut b));
    }

    #[test]
    fn test_same_seed_same_draws() {
        let sampler = TransformSampler::new(params(), 2.0);
        let mut a = ChaCha8Rng::seed_from_u64(99);
        let mut b = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..10 {
            assert_eq!(sampler.sample(&mut a), sampler.sample(&mut b));
        }
    }
}
