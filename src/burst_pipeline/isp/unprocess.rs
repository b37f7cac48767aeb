//! Default inverse camera pipeline.
//!
//! Statistically plausible inversion of a generic camera: random colour
//! matrices interpolated between a handful of real sensors, log-normal-ish
//! white balance gains, and a shot/read noise model whose read level grows
//! log-linearly with the shot level.

use bayer::CFA;
use rand::Rng;
use rand_distr::{Distribution, Normal, StandardNormal};
use tracing::debug;

use crate::burst_pipeline::common::{BurstError, Image, PixelRange, Result};
use crate::burst_pipeline::isp::{
    pipeline::CameraPipeline,
    types::{ColorMatrix, NoiseLevels, WhiteBalanceGains},
};

/// XYZ -> camera matrices the random CCM interpolates between.
const XYZ_TO_CAMS: [[[f64; 3]; 3]; 4] = [
    [
        [1.0234, -0.2969, -0.2266],
        [-0.5625, 1.6328, -0.0469],
        [-0.0703, 0.2188, 0.6406],
    ],
    [
        [0.4913, -0.0541, -0.0202],
        [-0.613, 1.3513, 0.2906],
        [-0.1564, 0.2151, 0.7183],
    ],
    [
        [0.838, -0.263, -0.0639],
        [-0.2887, 1.0725, 0.2496],
        [-0.0627, 0.1427, 0.5438],
    ],
    [
        [0.6596, -0.2079, -0.0562],
        [-0.4782, 1.3016, 0.1933],
        [-0.097, 0.1581, 0.5181],
    ],
];

/// Linear sRGB -> XYZ (D65)
const RGB_TO_XYZ: [[f64; 3]; 3] = [
    [0.4124564, 0.3575761, 0.1804375],
    [0.2126729, 0.7151522, 0.0721750],
    [0.0193339, 0.1191920, 0.9503041],
];

const GAMMA: f32 = 2.2;
const GAMMA_FLOOR: f32 = 1e-8;
const HIGHLIGHT_INFLECTION: f32 = 0.9;

const MIN_SHOT_NOISE: f64 = 0.0001;
const MAX_SHOT_NOISE: f64 = 0.012;
const READ_NOISE_SLOPE: f64 = 2.18;
const READ_NOISE_INTERCEPT: f64 = 1.20;
const READ_NOISE_STDDEV: f64 = 0.26;

/// Inverse brightness gain `1 / rgb_gain` is drawn from N(0.8, 0.1).
const INVERSE_RGB_GAIN_MEAN: f64 = 0.8;
const INVERSE_RGB_GAIN_STDDEV: f64 = 0.1;

/// Side of one CFA cell; mosaicked frames are this many times smaller.
const CFA_CELL: usize = 2;

/// Default `CameraPipeline` implementation.
#[derive(Debug, Clone, Copy)]
pub struct Unprocessor {
    cfa: CFA,
    inverse_rgb_gain: Normal<f64>,
    read_noise_residual: Normal<f64>,
}

impl Unprocessor {
    pub fn new(cfa: CFA) -> Result<Self> {
        Ok(Self {
            cfa,
            inverse_rgb_gain: Normal::new(INVERSE_RGB_GAIN_MEAN, INVERSE_RGB_GAIN_STDDEV)?,
            read_noise_residual: Normal::new(0.0, READ_NOISE_STDDEV)?,
        })
    }

    /// RGGB sensor, the layout of the cameras the colour matrices come from.
    pub fn rggb() -> Result<Self> {
        Self::new(CFA::RGGB)
    }

    pub fn cfa(&self) -> CFA {
        self.cfa
    }

    /// `(row, col)` offsets inside the 2x2 cell for the packed channels
    /// R, G (red row), G (blue row), B.
    fn cell_offsets(&self) -> [(usize, usize); 4] {
        match self.cfa {
            CFA::RGGB => [(0, 0), (0, 1), (1, 0), (1, 1)],
            CFA::BGGR => [(1, 1), (1, 0), (0, 1), (0, 0)],
            CFA::GRBG => [(0, 1), (0, 0), (1, 1), (1, 0)],
            CFA::GBRG => [(1, 0), (1, 1), (0, 0), (0, 1)],
        }
    }

    fn mosaic_frame(&self, frame: &Image) -> Result<Image> {
        frame.ensure_channels(3)?;
        let (width, height) = (frame.width / CFA_CELL, frame.height / CFA_CELL);
        if width == 0 || height == 0 {
            return Err(BurstError::InvalidDimensions(frame.width, frame.height));
        }

        const SOURCE_CHANNEL: [usize; 4] = [0, 1, 1, 2];
        let offsets = self.cell_offsets();
        Image::from_fn(width, height, 4, frame.range, |row, col, ch| {
            let (dr, dc) = offsets[ch];
            frame.get(CFA_CELL * row + dr, CFA_CELL * col + dc, SOURCE_CHANNEL[ch])
        })
    }
}

fn require_rgb(image: &Image) -> Result<()> {
    image.ensure_channels(3)?;
    if image.range != PixelRange::Normalized {
        return Err(BurstError::RangeMismatch {
            expected: PixelRange::Normalized,
            actual: image.range,
        });
    }
    Ok(())
}

impl CameraPipeline for Unprocessor {
    fn random_ccm<R: Rng + ?Sized>(&self, rng: &mut R) -> ColorMatrix {
        let weights: Vec<f64> = XYZ_TO_CAMS
            .iter()
            .map(|_| rng.random_range(1e-8..1e8))
            .collect();
        let total: f64 = weights.iter().sum();

        let mut xyz_to_cam = [[0.0; 3]; 3];
        for (matrix, weight) in XYZ_TO_CAMS.iter().zip(&weights) {
            for r in 0..3 {
                for c in 0..3 {
                    xyz_to_cam[r][c] += matrix[r][c] * weight / total;
                }
            }
        }

        ColorMatrix(xyz_to_cam)
            .multiply(&ColorMatrix(RGB_TO_XYZ))
            .normalize_rows()
    }

    fn random_gains<R: Rng + ?Sized>(&self, rng: &mut R) -> WhiteBalanceGains {
        let rgb_gain = 1.0 / self.inverse_rgb_gain.sample(rng);
        let red_gain = rng.random_range(1.9..2.4);
        let blue_gain = rng.random_range(1.5..1.9);
        WhiteBalanceGains {
            rgb_gain,
            red_gain,
            blue_gain,
        }
    }

    fn invert_smoothstep(&self, image: &Image) -> Result<Image> {
        require_rgb(image)?;
        Ok(image.map(|v| {
            let v = v.clamp(0.0, 1.0);
            0.5 - ((1.0 - 2.0 * v).asin() / 3.0).sin()
        }))
    }

    fn gamma_expansion(&self, image: &Image) -> Result<Image> {
        require_rgb(image)?;
        Ok(image.map(|v| v.max(GAMMA_FLOOR).powf(GAMMA)))
    }

    fn apply_ccm(&self, image: &Image, ccm: &ColorMatrix) -> Result<Image> {
        require_rgb(image)?;
        let mut out = image.clone();
        for px in out.data.chunks_exact_mut(3) {
            let mapped = ccm.apply([px[0], px[1], px[2]]);
            px.copy_from_slice(&mapped);
        }
        Ok(out)
    }

    fn safe_invert_gains(&self, image: &Image, gains: &WhiteBalanceGains) -> Result<Image> {
        require_rgb(image)?;
        let inverse = [
            (1.0 / gains.red_gain / gains.rgb_gain) as f32,
            (1.0 / gains.rgb_gain) as f32,
            (1.0 / gains.blue_gain / gains.rgb_gain) as f32,
        ];

        let mut out = image.clone();
        for px in out.data.chunks_exact_mut(3) {
            let gray = (px[0] + px[1] + px[2]) / 3.0;
            // Fade towards unit gain for bright pixels so highlights are not darkened
            let mask = ((gray - HIGHLIGHT_INFLECTION).max(0.0) / (1.0 - HIGHLIGHT_INFLECTION)).powi(2);
            for (v, &g) in px.iter_mut().zip(&inverse) {
                let safe = (mask + (1.0 - mask) * g).max(g);
                *v *= safe;
            }
        }
        Ok(out)
    }

    fn min_frame_size(&self) -> usize {
        CFA_CELL
    }

    fn mosaic(&self, burst: &[Image]) -> Result<Vec<Image>> {
        debug!(frames = burst.len(), cfa = ?self.cfa, "Mosaicking burst");
        burst.iter().map(|frame| self.mosaic_frame(frame)).collect()
    }

    fn random_noise_levels<R: Rng + ?Sized>(&self, rng: &mut R) -> NoiseLevels {
        let log_shot = rng.random_range(MIN_SHOT_NOISE.ln()..MAX_SHOT_NOISE.ln());
        let log_read = READ_NOISE_SLOPE * log_shot
            + READ_NOISE_INTERCEPT
            + self.read_noise_residual.sample(rng);
        NoiseLevels {
            shot_noise_level: log_shot.exp(),
            read_noise_level: log_read.exp(),
        }
    }

    fn add_noise<R: Rng + ?Sized>(
        &self,
        mut burst: Vec<Image>,
        levels: &NoiseLevels,
        rng: &mut R,
    ) -> Vec<Image> {
        for frame in &mut burst {
            for v in &mut frame.data {
                let variance =
                    (*v as f64 * levels.shot_noise_level + levels.read_noise_level).max(0.0);
                let z: f64 = rng.sample(StandardNormal);
                *v += (z * variance.sqrt()) as f32;
            }
        }
        burst
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn unprocessor() -> Unprocessor {
        Unprocessor::rggb().unwrap()
    }

    fn gray(value: f32) -> Image {
        Image::filled(4, 4, 3, value, PixelRange::Normalized).unwrap()
    }

    #[test]
    fn test_random_ccm_rows_sum_to_one() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for _ in 0..20 {
            let ccm = unprocessor().random_ccm(&mut rng);
            for row in ccm.rows() {
                assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-9);
            }
            assert!(ccm.inverse().is_ok());
        }
    }

    #[test]
    fn test_random_gains_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..100 {
            let gains = unprocessor().random_gains(&mut rng);
            assert!((1.9..2.4).contains(&gains.red_gain));
            assert!((1.5..1.9).contains(&gains.blue_gain));
            assert!(gains.rgb_gain > 0.0);
        }
    }

    fn mean_and_std(values: &[f64]) -> (f64, f64) {
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        (mean, var.sqrt())
    }

    #[test]
    fn test_inverse_rgb_gain_is_normal() {
        let unprocess = unprocessor();
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        let inverse: Vec<f64> = (0..5000)
            .map(|_| 1.0 / unprocess.random_gains(&mut rng).rgb_gain)
            .collect();
        let (mean, std) = mean_and_std(&inverse);
        assert!((mean - INVERSE_RGB_GAIN_MEAN).abs() < 0.01, "mean {mean}");
        assert!((std - INVERSE_RGB_GAIN_STDDEV).abs() < 0.01, "std {std}");
    }

    #[test]
    fn test_read_noise_residual_is_normal() {
        let unprocess = unprocessor();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let residuals: Vec<f64> = (0..5000)
            .map(|_| {
                let levels = unprocess.random_noise_levels(&mut rng);
                levels.read_noise_level.ln()
                    - READ_NOISE_SLOPE * levels.shot_noise_level.ln()
                    - READ_NOISE_INTERCEPT
            })
            .collect();
        let (mean, std) = mean_and_std(&residuals);
        assert!(mean.abs() < 0.02, "mean {mean}");
        assert!((std - READ_NOISE_STDDEV).abs() < 0.02, "std {std}");
    }

    #[test]
    fn test_min_frame_size_is_one_cfa_cell() {
        let unprocess = unprocessor();
        assert_eq!(unprocess.min_frame_size(), 2);
        let smallest = Image::filled(2, 2, 3, 0.5, PixelRange::Normalized).unwrap();
        assert!(unprocess.mosaic(&[smallest]).is_ok());
    }

    #[test]
    fn test_invert_smoothstep_inverts_forward_curve() {
        let unprocess = unprocessor();
        for &x in &[0.0f32, 0.1, 0.5, 0.8, 1.0] {
            let y = 3.0 * x * x - 2.0 * x * x * x;
            let inverted = unprocess.invert_smoothstep(&gray(y)).unwrap();
            assert!((inverted.get(0, 0, 0) - x).abs() < 1e-4);
        }
    }

    #[test]
    fn test_gamma_expansion() {
        let expanded = unprocessor().gamma_expansion(&gray(0.5)).unwrap();
        assert!((expanded.get(1, 1, 1) - 0.5f32.powf(2.2)).abs() < 1e-6);
    }

    #[test]
    fn test_identity_ccm_is_noop() {
        let image = Image::from_fn(3, 3, 3, PixelRange::Normalized, |r, c, ch| {
            (r + c + ch) as f32 / 10.0
        })
        .unwrap();
        let out = unprocessor()
            .apply_ccm(&image, &ColorMatrix::identity())
            .unwrap();
        assert_eq!(out, image);
    }

    #[test]
    fn test_safe_invert_gains() {
        let gains = WhiteBalanceGains {
            rgb_gain: 2.0,
            red_gain: 2.0,
            blue_gain: 1.6,
        };
        let unprocess = unprocessor();

        let dark = unprocess.safe_invert_gains(&gray(0.4), &gains).unwrap();
        assert!((dark.get(0, 0, 0) - 0.1).abs() < 1e-6);
        assert!((dark.get(0, 0, 1) - 0.2).abs() < 1e-6);
        assert!((dark.get(0, 0, 2) - 0.4 / 3.2).abs() < 1e-6);

        // Saturated pixels keep unit gain
        let bright = unprocess.safe_invert_gains(&gray(1.0), &gains).unwrap();
        assert!(bright.data.iter().all(|&v| (v - 1.0).abs() < 1e-6));

        let neutral = unprocess
            .safe_invert_gains(&gray(0.4), &WhiteBalanceGains::neutral())
            .unwrap();
        assert_eq!(neutral, gray(0.4));
    }

    #[test]
    fn test_mosaic_rggb_layout() {
        let frame = Image::from_fn(4, 4, 3, PixelRange::Normalized, |r, c, ch| {
            (ch * 100 + r * 10 + c) as f32
        })
        .unwrap();
        let raw = unprocessor().mosaic(&[frame]).unwrap();
        let raw = &raw[0];
        assert_eq!((raw.width, raw.height, raw.channels), (2, 2, 4));
        // Cell at (1, 1) starts at pixel (2, 2)
        assert_eq!(raw.pixel(1, 1), &[22.0, 123.0, 132.0, 233.0]);
    }

    #[test]
    fn test_mosaic_bggr_layout() {
        let frame = Image::from_fn(2, 2, 3, PixelRange::Normalized, |r, c, ch| {
            (ch * 100 + r * 10 + c) as f32
        })
        .unwrap();
        let raw = Unprocessor::new(CFA::BGGR).unwrap().mosaic(&[frame]).unwrap();
        assert_eq!(raw[0].pixel(0, 0), &[11.0, 110.0, 101.0, 200.0]);
    }

    #[test]
    fn test_mosaic_rejects_single_pixel_rows() {
        let frame = Image::filled(1, 4, 3, 0.5, PixelRange::Normalized).unwrap();
        assert!(unprocessor().mosaic(&[frame]).is_err());
    }

    #[test]
    fn test_noise_levels_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..100 {
            let levels = unprocessor().random_noise_levels(&mut rng);
            assert!(levels.shot_noise_level >= MIN_SHOT_NOISE);
            assert!(levels.shot_noise_level <= MAX_SHOT_NOISE);
            assert!(levels.read_noise_level > 0.0);
        }
    }

    #[test]
    fn test_zero_noise_is_noop() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let burst = vec![gray(0.3)];
        let noisy = unprocessor().add_noise(burst.clone(), &NoiseLevels::none(), &mut rng);
        assert_eq!(noisy, burst);
    }

    #[test]
    fn test_rejects_non_rgb() {
        let image = Image::filled(2, 2, 4, 0.5, PixelRange::Normalized).unwrap();
        assert!(matches!(
            unprocessor().gamma_expansion(&image),
            Err(BurstError::ChannelMismatch { expected: 3, actual: 4 })
        ));
    }
}
