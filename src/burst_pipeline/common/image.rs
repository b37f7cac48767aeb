//! Image buffer types

use crate::burst_pipeline::common::error::{BurstError, Result};

/// Value range carried alongside the pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelRange {
    /// Floating point values in [0, 1]
    Normalized,
    /// Integer-valued samples in [0, 255]
    EightBit,
}

impl PixelRange {
    /// Largest representable value for this range
    pub fn max_value(self) -> f32 {
        match self {
            PixelRange::Normalized => 1.0,
            PixelRange::EightBit => 255.0,
        }
    }
}

/// Multi-channel image with interleaved samples
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Number of interleaved channels per pixel
    pub channels: usize,
    /// Pixel data in row-major HWC order [c0, c1, c2, c0, c1, c2, ...]
    pub data: Vec<f32>,
    /// Which representation `data` is expressed in
    pub range: PixelRange,
}

impl Image {
    pub fn new(
        width: usize,
        height: usize,
        channels: usize,
        data: Vec<f32>,
        range: PixelRange,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(BurstError::InvalidDimensions(width, height));
        }
        if channels == 0 || data.len() != width * height * channels {
            return Err(BurstError::ChannelMismatch {
                expected: width * height * channels.max(1),
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
            range,
        })
    }

    /// Image where every sample holds `value`.
    pub fn filled(
        width: usize,
        height: usize,
        channels: usize,
        value: f32,
        range: PixelRange,
    ) -> Result<Self> {
        Self::new(
            width,
            height,
            channels,
            vec![value; width * height * channels],
            range,
        )
    }

    /// Builds an image by evaluating `f(row, col, channel)` for every sample.
    pub fn from_fn<F>(
        width: usize,
        height: usize,
        channels: usize,
        range: PixelRange,
        mut f: F,
    ) -> Result<Self>
    where
        F: FnMut(usize, usize, usize) -> f32,
    {
        let mut data = Vec::with_capacity(width * height * channels);
        for row in 0..height {
            for col in 0..width {
                for ch in 0..channels {
                    data.push(f(row, col, ch));
                }
            }
        }
        Self::new(width, height, channels, data, range)
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize, channel: usize) -> f32 {
        self.data[(row * self.width + col) * self.channels + channel]
    }

    /// All channels of one pixel
    #[inline]
    pub fn pixel(&self, row: usize, col: usize) -> &[f32] {
        let start = (row * self.width + col) * self.channels;
        &self.data[start..start + self.channels]
    }

    pub fn pixels(&self) -> std::slice::ChunksExact<'_, f32> {
        self.data.chunks_exact(self.channels)
    }

    /// Applies `f` to every sample, keeping shape and range.
    pub fn map<F: Fn(f32) -> f32>(&self, f: F) -> Self {
        Self {
            data: self.data.iter().map(|&v| f(v)).collect(),
            ..self.clone()
        }
    }

    pub fn clamp(&self, min: f32, max: f32) -> Self {
        self.map(|v| v.clamp(min, max))
    }

    pub fn max_value(&self) -> f32 {
        self.data.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    pub fn min_value(&self) -> f32 {
        self.data.iter().copied().fold(f32::INFINITY, f32::min)
    }

    pub fn to_normalized(&self) -> Self {
        match self.range {
            PixelRange::Normalized => self.clone(),
            PixelRange::EightBit => Self {
                data: self.data.iter().map(|&v| v / 255.0).collect(),
                range: PixelRange::Normalized,
                ..self.clone()
            },
        }
    }

    /// Scales to [0, 255], rounding and saturating like an 8-bit buffer.
    pub fn to_eight_bit(&self) -> Self {
        match self.range {
            PixelRange::EightBit => self.clone(),
            PixelRange::Normalized => Self {
                data: self.data.iter().map(|&v| saturate_u8(v * 255.0)).collect(),
                range: PixelRange::EightBit,
                ..self.clone()
            },
        }
    }

    /// Rounds and saturates samples of an `EightBit` image in place; no-op otherwise.
    pub(crate) fn quantize(&mut self) {
        if self.range == PixelRange::EightBit {
            for v in &mut self.data {
                *v = saturate_u8(*v);
            }
        }
    }

    pub(crate) fn ensure_channels(&self, expected: usize) -> Result<()> {
        if self.channels != expected {
            return Err(BurstError::ChannelMismatch {
                expected,
                actual: self.channels,
            });
        }
        Ok(())
    }
}

#[inline]
fn saturate_u8(v: f32) -> f32 {
    v.round().clamp(0.0, 255.0)
}
