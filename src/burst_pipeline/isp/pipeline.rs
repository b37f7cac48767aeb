use rand::Rng;

use crate::burst_pipeline::common::{Image, Result};
use crate::burst_pipeline::isp::types::{ColorMatrix, NoiseLevels, WhiteBalanceGains};

/// Inverse camera processing used to turn sRGB images into sensor data.
///
/// All image operations expect `Normalized` three-channel input except
/// `add_noise`, which works on mosaicked frames.
pub trait CameraPipeline {
    /// Forward RGB -> camera colour matrix
    fn random_ccm<R: Rng + ?Sized>(&self, rng: &mut R) -> ColorMatrix;

    fn random_gains<R: Rng + ?Sized>(&self, rng: &mut R) -> WhiteBalanceGains;

    /// Approximately inverts the global tone curve.
    fn invert_smoothstep(&self, image: &Image) -> Result<Image>;

    /// Inverts gamma compression.
    fn gamma_expansion(&self, image: &Image) -> Result<Image>;

    fn apply_ccm(&self, image: &Image, ccm: &ColorMatrix) -> Result<Image>;

    /// Inverts white balance and brightening without clipping highlights.
    fn safe_invert_gains(&self, image: &Image, gains: &WhiteBalanceGains) -> Result<Image>;

    /// Smallest frame side `mosaic` accepts.
    fn min_frame_size(&self) -> usize {
        1
    }

    /// Applies the colour filter array to every frame.
    fn mosaic(&self, burst: &[Image]) -> Result<Vec<Image>>;

    fn random_noise_levels<R: Rng + ?Sized>(&self, rng: &mut R) -> NoiseLevels;

    fn add_noise<R: Rng + ?Sized>(
        &self,
        burst: Vec<Image>,
        levels: &NoiseLevels,
        rng: &mut R,
    ) -> Vec<Image>;
}
