//! Burst output types

use crate::burst_pipeline::common::{BurstError, Image, Result};
use crate::burst_pipeline::resample::Raster;

/// Per-pixel correspondence offsets of every burst frame to the reference
/// frame, in output-resolution pixels.
///
/// Stored planar as `(burst_size, 2, height, width)`; channel 0 is the x
/// (column) offset and channel 1 the y (row) offset.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowField {
    pub burst_size: usize,
    pub height: usize,
    pub width: usize,
    pub data: Vec<f32>,
}

impl FlowField {
    /// Flow relative to the first field: `flow[i] = positions[i] - positions[0]`.
    ///
    /// Each position raster is a two-channel `(x, y)` field.
    pub(crate) fn from_positions(positions: &[Raster]) -> Result<Self> {
        let reference = positions.first().ok_or(BurstError::InvalidBurstSize(0))?;
        let (width, height) = (reference.width, reference.height);
        let plane = width * height;

        let mut data = Vec::with_capacity(positions.len() * 2 * plane);
        for field in positions {
            if field.width != width || field.height != height || field.channels != 2 {
                return Err(BurstError::InvalidDimensions(field.width, field.height));
            }
            for channel in 0..2 {
                data.extend(
                    field
                        .data
                        .chunks_exact(2)
                        .zip(reference.data.chunks_exact(2))
                        .map(|(p, p0)| p[channel] - p0[channel]),
                );
            }
        }

        Ok(Self {
            burst_size: positions.len(),
            height,
            width,
            data,
        })
    }

    /// `(N, 2, H, W)`
    pub fn shape(&self) -> [usize; 4] {
        [self.burst_size, 2, self.height, self.width]
    }

    /// Both planes of one frame, x plane first
    pub fn frame(&self, index: usize) -> &[f32] {
        let size = 2 * self.height * self.width;
        &self.data[index * size..(index + 1) * size]
    }

    #[inline]
    pub fn at(&self, frame: usize, channel: usize, row: usize, col: usize) -> f32 {
        self.data[((frame * 2 + channel) * self.height + row) * self.width + col]
    }

    /// `(dx, dy)` at one output pixel
    pub fn vector(&self, frame: usize, row: usize, col: usize) -> (f32, f32) {
        (self.at(frame, 0, row, col), self.at(frame, 1, row, col))
    }

    pub fn max_magnitude(&self, frame: usize) -> f32 {
        let plane = self.height * self.width;
        let frame = self.frame(frame);
        frame[..plane]
            .iter()
            .zip(&frame[plane..])
            .map(|(dx, dy)| dx.hypot(*dy))
            .fold(0.0, f32::max)
    }
}

/// Downsampled burst with its flow to the reference frame (index 0).
#[derive(Debug, Clone)]
pub struct SyntheticBurst {
    pub frames: Vec<Image>,
    pub flow: FlowField,
}

impl SyntheticBurst {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn reference(&self) -> &Image {
        &self.frames[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(width: usize, height: usize, dx: f32, dy: f32) -> Raster {
        let mut raster = Raster::zeros(width, height, 2);
        for (i, p) in raster.data.chunks_exact_mut(2).enumerate() {
            p[0] = (i % width) as f32 + dx;
            p[1] = (i / width) as f32 + dy;
        }
        raster
    }

    #[test]
    fn test_flow_is_relative_to_first_frame() {
        let flow = FlowField::from_positions(&[
            field(3, 2, 0.0, 0.0),
            field(3, 2, 1.5, -0.5),
        ])
        .unwrap();
        assert_eq!(flow.shape(), [2, 2, 2, 3]);
        assert!(flow.frame(0).iter().all(|&v| v == 0.0));
        assert_eq!(flow.vector(1, 1, 2), (1.5, -0.5));
        assert!((flow.max_magnitude(1) - 1.5f32.hypot(0.5)).abs() < 1e-6);
    }

    #[test]
    fn test_mismatched_fields_rejected() {
        let result = FlowField::from_positions(&[field(3, 2, 0.0, 0.0), field(2, 2, 0.0, 0.0)]);
        assert!(result.is_err());
    }
}
