//! Affine warping

use crate::burst_pipeline::common::Result;
use crate::burst_pipeline::resample::{
    interpolation::Interpolation,
    raster::{Border, Raster},
};
use crate::burst_pipeline::transform::Affine2D;

/// Warps `src` by `matrix` into a raster of the same size.
///
/// `matrix` maps source coordinates to destination coordinates; each
/// destination pixel is read from the source at the inverse-mapped position.
/// Positions outside the source read zero.
pub fn warp_affine(src: &Raster, matrix: &Affine2D, interpolation: Interpolation) -> Result<Raster> {
    let inverse = matrix.invert()?;
    let mut dst = Raster::zeros(src.width, src.height, src.channels);
    let channels = src.channels;

    for (row, dst_row) in dst.data.chunks_exact_mut(src.width * channels).enumerate() {
        for (col, out) in dst_row.chunks_exact_mut(channels).enumerate() {
            let (x, y) = inverse.apply(col as f64, row as f64);
            src.sample_into(x, y, interpolation, Border::Constant(0.0), out);
        }
    }
    Ok(dst)
}
