//! Spatial resizing

use crate::burst_pipeline::resample::{
    interpolation::Interpolation,
    raster::{Border, Raster},
};

/// Resizes `src` to `width` x `height`, aligning pixel centers.
///
/// Destination pixel `d` samples the source at `(d + 0.5) * src / dst - 0.5`;
/// taps beyond the edge repeat the edge sample.
pub fn resize(src: &Raster, width: usize, height: usize, interpolation: Interpolation) -> Raster {
    if width == src.width && height == src.height {
        return src.clone();
    }
    let scale_x = src.width as f64 / width as f64;
    let scale_y = src.height as f64 / height as f64;
    let channels = src.channels;

    let mut dst = Raster::zeros(width, height, channels);
    for (row, dst_row) in dst.data.chunks_exact_mut(width * channels).enumerate() {
        let y = (row as f64 + 0.5) * scale_y - 0.5;
        for (col, out) in dst_row.chunks_exact_mut(channels).enumerate() {
            let x = (col as f64 + 0.5) * scale_x - 0.5;
            src.sample_into(x, y, interpolation, Border::Replicate, out);
        }
    }
    dst
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(width: usize, height: usize) -> Raster {
        let mut raster = Raster::zeros(width, height, 1);
        for row in 0..height {
            for col in 0..width {
                raster.data[row * width + col] = col as f32;
            }
        }
        raster
    }

    #[test]
    fn test_same_size_is_identity() {
        let src = ramp(5, 4);
        assert_eq!(resize(&src, 5, 4, Interpolation::Lanczos), src);
    }

    #[test]
    fn test_downsample_by_two_bilinear() {
        let src = ramp(8, 8);
        let dst = resize(&src, 4, 4, Interpolation::Bilinear);
        // Output pixel c sits halfway between source columns 2c and 2c + 1
        for col in 0..4 {
            assert!((dst.get(1, col, 0) - (2 * col) as f32 - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_constant_stays_constant() {
        let mut src = Raster::zeros(9, 9, 3);
        src.data.iter_mut().for_each(|v| *v = 0.25);
        for interp in [Interpolation::Bilinear, Interpolation::Lanczos] {
            let dst = resize(&src, 4, 4, interp);
            assert!(dst.data.iter().all(|&v| (v - 0.25).abs() < 1e-6));
        }
    }
}
