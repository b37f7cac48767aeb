//! Base-image sampling grid

use crate::burst_pipeline::common::Result;
use crate::burst_pipeline::resample::raster::Raster;
use crate::burst_pipeline::transform::Affine2D;

/// Integer `(col, row)` coordinates of every pixel of the base image.
///
/// Built once per base image and reused for the inverse mapping of every
/// burst frame.
#[derive(Debug, Clone)]
pub struct SamplingGrid {
    width: usize,
    height: usize,
    points: Vec<(f64, f64)>,
}

impl SamplingGrid {
    pub fn new(width: usize, height: usize) -> Self {
        let points = (0..height)
            .flat_map(|row| (0..width).map(move |col| (col as f64, row as f64)))
            .collect();
        Self {
            width,
            height,
            points,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// For every grid pixel, the base-image position it is resampled from
    /// under `matrix`. Returns a two-channel `(x, y)` raster.
    pub fn inverse_positions(&self, matrix: &Affine2D) -> Result<Raster> {
        let inverse = matrix.invert()?;
        let data = inverse
            .apply_to_points(&self.points)
            .into_iter()
            .flat_map(|(x, y)| [x as f32, y as f32])
            .collect();
        Ok(Raster {
            width: self.width,
            height: self.height,
            channels: 2,
            data,
        })
    }
}
