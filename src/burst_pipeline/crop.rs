//! Random fixed-size cropping

use rand::Rng;
use tracing::{debug, instrument};

use crate::burst_pipeline::common::{BurstError, Image, Result};
use crate::burst_pipeline::resample::Raster;

/// Requested crop size as `(height, width)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropSize {
    pub height: usize,
    pub width: usize,
}

impl From<usize> for CropSize {
    fn from(size: usize) -> Self {
        Self {
            height: size,
            width: size,
        }
    }
}

impl From<(usize, usize)> for CropSize {
    fn from((height, width): (usize, usize)) -> Self {
        Self { height, width }
    }
}

/// Extracts a random `crop_size` crop from `frames`.
///
/// When the source is smaller than the request in either dimension, the
/// largest crop with the requested aspect ratio is taken instead and
/// upsampled (bilinear, corner-aligned) to `crop_size`.
#[instrument(skip_all, fields(width = frames.width, height = frames.height))]
pub fn random_crop<R: Rng + ?Sized>(
    frames: &Image,
    crop_size: impl Into<CropSize>,
    rng: &mut R,
) -> Result<Image> {
    let crop_size = crop_size.into();
    let mut cropped = random_crop_frames(std::slice::from_ref(frames), crop_size, rng)?;
    Ok(cropped.remove(0))
}

/// Crops every frame at one shared random offset.
///
/// All frames must have the same dimensions.
pub fn random_crop_frames<R: Rng + ?Sized>(
    frames: &[Image],
    crop_size: impl Into<CropSize>,
    rng: &mut R,
) -> Result<Vec<Image>> {
    let crop_size = crop_size.into();
    if crop_size.height == 0 || crop_size.width == 0 {
        return Err(BurstError::InvalidCropSize(crop_size.height, crop_size.width));
    }
    let first = frames.first().ok_or(BurstError::InvalidBurstSize(0))?;
    let (height, width) = (first.height, first.width);
    if let Some(other) = frames
        .iter()
        .find(|f| f.height != height || f.width != width)
    {
        return Err(BurstError::InvalidDimensions(other.width, other.height));
    }

    // Largest scale at which a crop of the requested aspect ratio fits
    let max_scale = (height as f64 / crop_size.height as f64)
        .min(width as f64 / crop_size.width as f64);
    let scale = max_scale.min(1.0);

    let source_height = (crop_size.height as f64 * scale).floor() as usize;
    let source_width = (crop_size.width as f64 * scale).floor() as usize;
    assert!(
        source_height <= height && source_width <= width,
        "crop of {source_height}x{source_width} does not fit in {height}x{width}"
    );
    if source_height == 0 || source_width == 0 {
        return Err(BurstError::InvalidCropSize(crop_size.height, crop_size.width));
    }

    let top = rng.random_range(0..=height - source_height);
    let left = rng.random_range(0..=width - source_width);
    debug!(top, left, source_height, source_width, scale, "Crop window");

    frames
        .iter()
        .map(|frame| {
            let window = Raster::from_image(frame).crop(top, left, source_height, source_width)?;
            let window = if scale < 1.0 {
                resize_align_corners(&window, crop_size.height, crop_size.width)
            } else {
                window
            };
            let mut out = window.into_image(frame.range)?;
            out.quantize();
            Ok(out)
        })
        .collect()
}

/// Bilinear resize mapping the corner pixels of `src` onto the corner pixels
/// of the output.
fn resize_align_corners(src: &Raster, height: usize, width: usize) -> Raster {
    let position = |i: usize, src_len: usize, dst_len: usize| {
        if dst_len > 1 {
            (i * (src_len - 1)) as f64 / (dst_len - 1) as f64
        } else {
            0.0
        }
    };
    let channels = src.channels;

    let mut dst = Raster::zeros(width, height, channels);
    for row in 0..height {
        let y = position(row, src.height, height);
        let y0 = (y.floor() as usize).min(src.height - 1);
        let y1 = (y0 + 1).min(src.height - 1);
        let fy = y - y0 as f64;
        for col in 0..width {
            let x = position(col, src.width, width);
            let x0 = (x.floor() as usize).min(src.width - 1);
            let x1 = (x0 + 1).min(src.width - 1);
            let fx = x - x0 as f64;
            for ch in 0..channels {
                let top = src.get(y0, x0, ch) as f64 * (1.0 - fx) + src.get(y0, x1, ch) as f64 * fx;
                let bottom =
                    src.get(y1, x0, ch) as f64 * (1.0 - fx) + src.get(y1, x1, ch) as f64 * fx;
                dst.data[(row * width + col) * channels + ch] =
                    (top * (1.0 - fy) + bottom * fy) as f32;
            }
        }
    }
    dst
}
