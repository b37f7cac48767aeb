//! Untagged sample buffer used while resampling

use crate::burst_pipeline::common::{BurstError, Image, PixelRange, Result};
use crate::burst_pipeline::resample::interpolation::Interpolation;

/// How taps outside the buffer are read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Border {
    /// Every outside tap reads this value
    Constant(f32),
    /// Outside taps read the nearest edge sample
    Replicate,
}

/// Interleaved HWC buffer without a value-range tag.
///
/// Images and coordinate fields both pass through the same crop and resize
/// code as `Raster`s.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub data: Vec<f32>,
}

impl Raster {
    pub fn zeros(width: usize, height: usize, channels: usize) -> Self {
        Self {
            width,
            height,
            channels,
            data: vec![0.0; width * height * channels],
        }
    }

    pub fn from_image(image: &Image) -> Self {
        Self {
            width: image.width,
            height: image.height,
            channels: image.channels,
            data: image.data.clone(),
        }
    }

    pub fn into_image(self, range: PixelRange) -> Result<Image> {
        Image::new(self.width, self.height, self.channels, self.data, range)
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize, channel: usize) -> f32 {
        self.data[(row * self.width + col) * self.channels + channel]
    }

    /// Interpolates all channels at the continuous position `(x, y)` into `out`.
    pub fn sample_into(
        &self,
        x: f64,
        y: f64,
        interpolation: Interpolation,
        border: Border,
        out: &mut [f32],
    ) {
        let tx = interpolation.taps(x);
        let ty = interpolation.taps(y);
        let mut acc = [0.0f64; 4];
        let mut acc_vec;
        let acc: &mut [f64] = if self.channels <= acc.len() {
            &mut acc[..self.channels]
        } else {
            acc_vec = vec![0.0f64; self.channels];
            &mut acc_vec
        };

        for (row, wy) in ty.iter() {
            for (col, wx) in tx.iter() {
                let w = wy * wx;
                match self.resolve(row, col, border) {
                    Some(base) => {
                        for (a, &v) in acc.iter_mut().zip(&self.data[base..base + self.channels]) {
                            *a += w * v as f64;
                        }
                    }
                    None => {
                        if let Border::Constant(value) = border {
                            for a in acc.iter_mut() {
                                *a += w * value as f64;
                            }
                        }
                    }
                }
            }
        }

        for (o, a) in out.iter_mut().zip(acc.iter()) {
            *o = *a as f32;
        }
    }

    /// Buffer offset of the tap at `(row, col)`, or `None` when it falls
    /// outside and the border is constant.
    #[inline]
    fn resolve(&self, row: isize, col: isize, border: Border) -> Option<usize> {
        let inside = row >= 0
            && col >= 0
            && (row as usize) < self.height
            && (col as usize) < self.width;
        let (r, c) = if inside {
            (row as usize, col as usize)
        } else {
            match border {
                Border::Constant(_) => return None,
                Border::Replicate => (
                    row.clamp(0, self.height as isize - 1) as usize,
                    col.clamp(0, self.width as isize - 1) as usize,
                ),
            }
        };
        Some((r * self.width + c) * self.channels)
    }

    /// Removes `border` pixels from every side. Zero returns the raster unchanged.
    pub fn crop_border(self, border: usize) -> Result<Self> {
        if border == 0 {
            return Ok(self);
        }
        let removed = border
            .checked_mul(2)
            .filter(|&removed| removed < self.width && removed < self.height)
            .ok_or(BurstError::InvalidBorderCrop {
                border_crop: border,
                width: self.width,
                height: self.height,
            })?;
        self.crop(border, border, self.height - removed, self.width - removed)
    }

    /// Copies the `height` x `width` block whose top-left pixel is `(top, left)`.
    pub fn crop(&self, top: usize, left: usize, height: usize, width: usize) -> Result<Self> {
        if height == 0 || width == 0 || top + height > self.height || left + width > self.width {
            return Err(BurstError::InvalidDimensions(width, height));
        }
        let mut data = Vec::with_capacity(width * height * self.channels);
        for row in top..top + height {
            let start = (row * self.width + left) * self.channels;
            data.extend_from_slice(&self.data[start..start + width * self.channels]);
        }
        Ok(Self {
            width,
            height,
            channels: self.channels,
            data,
        })
    }
}
