//! Shared resampling of burst frames and their coordinate fields

use tracing::debug;

use crate::burst_pipeline::common::{BurstError, Image, Result};
use crate::burst_pipeline::resample::{
    grid::SamplingGrid, interpolation::Interpolation, raster::Raster, resize::resize,
    warp::warp_affine,
};
use crate::burst_pipeline::transform::Affine2D;

/// What a `ResamplePlan` is applied to.
#[derive(Debug, Clone, Copy)]
pub enum Content<'a> {
    /// Warped by the frame matrix
    Image(&'a Image),
    /// Mapped through the inverse of the frame matrix
    Field(&'a SamplingGrid),
}

/// Crop and downsample settings applied identically to a frame and its
/// correspondence field, so pixel `(r, c)` of both always refers to the same
/// spatial location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResamplePlan {
    interpolation: Interpolation,
    border_crop: usize,
    output_size: usize,
}

impl ResamplePlan {
    /// Plan for a `base_width` x `base_height` image.
    ///
    /// The output is square with side `floor((base_height - 2 * border_crop) / downsample_factor)`.
    pub fn new(
        interpolation: Interpolation,
        border_crop: usize,
        downsample_factor: f64,
        base_width: usize,
        base_height: usize,
    ) -> Result<Self> {
        if base_width == 0 || base_height == 0 {
            return Err(BurstError::InvalidDimensions(base_width, base_height));
        }
        if !downsample_factor.is_finite() || downsample_factor <= 0.0 {
            return Err(BurstError::InvalidDownsampleFactor(downsample_factor));
        }
        let invalid_crop = || BurstError::InvalidBorderCrop {
            border_crop,
            width: base_width,
            height: base_height,
        };
        let removed = border_crop.checked_mul(2).ok_or_else(invalid_crop)?;
        if removed >= base_width || removed >= base_height {
            return Err(invalid_crop());
        }

        let cropped_height = base_height - removed;
        let output_size = (cropped_height as f64 / downsample_factor).floor() as usize;
        if output_size == 0 {
            return Err(BurstError::InvalidDownsampleFactor(downsample_factor));
        }

        debug!(
            interpolation = %interpolation,
            border_crop,
            output_size,
            "Resample plan ready"
        );
        Ok(Self {
            interpolation,
            border_crop,
            output_size,
        })
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    pub fn border_crop(&self) -> usize {
        self.border_crop
    }

    /// Side length of the square output
    pub fn output_size(&self) -> usize {
        self.output_size
    }

    /// Warps (image) or inverse-maps (field) at base resolution, then crops
    /// and downsamples with the plan's settings.
    pub fn resample(&self, content: Content<'_>, matrix: &Affine2D) -> Result<Raster> {
        let full = match content {
            Content::Image(image) => {
                let warped = warp_affine(&Raster::from_image(image), matrix, self.interpolation)?;
                quantized(warped, image)?
            }
            Content::Field(grid) => grid.inverse_positions(matrix)?,
        };

        let cropped = full.crop_border(self.border_crop)?;
        let resized = resize(&cropped, self.output_size, self.output_size, self.interpolation);

        match content {
            Content::Image(image) => quantized(resized, image),
            Content::Field(_) => Ok(resized),
        }
    }

    pub fn resample_image(&self, image: &Image, matrix: &Affine2D) -> Result<Image> {
        self.resample(Content::Image(image), matrix)?
            .into_image(image.range)
    }

    pub fn resample_field(&self, grid: &SamplingGrid, matrix: &Affine2D) -> Result<Raster> {
        self.resample(Content::Field(grid), matrix)
    }
}

/// Applies the value representation of `like` to a freshly resampled raster.
fn quantized(raster: Raster, like: &Image) -> Result<Raster> {
    let mut image = raster.into_image(like.range)?;
    image.quantize();
    Ok(Raster::from_image(&image))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::burst_pipeline::common::PixelRange;

    #[test]
    fn test_output_size_floors() {
        let plan = ResamplePlan::new(Interpolation::Bilinear, 2, 4.0, 40, 30).unwrap();
        // (30 - 4) / 4 = 6.5
        assert_eq!(plan.output_size(), 6);
    }

    #[test]
    fn test_rejects_degenerate_settings() {
        assert!(matches!(
            ResamplePlan::new(Interpolation::Bilinear, 0, 0.0, 8, 8),
            Err(BurstError::InvalidDownsampleFactor(_))
        ));
        assert!(matches!(
            ResamplePlan::new(Interpolation::Bilinear, 4, 1.0, 8, 8),
            Err(BurstError::InvalidBorderCrop { .. })
        ));
        assert!(matches!(
            ResamplePlan::new(Interpolation::Bilinear, 0, 16.0, 8, 8),
            Err(BurstError::InvalidDownsampleFactor(_))
        ));
        assert!(matches!(
            ResamplePlan::new(Interpolation::Bilinear, 0, 1.0, 0, 8),
            Err(BurstError::InvalidDimensions(0, 8))
        ));
    }

    #[test]
    fn test_huge_border_crop_rejected() {
        // Doubling this value overflows usize
        let border_crop = usize::MAX / 2 + 1;
        assert!(matches!(
            ResamplePlan::new(Interpolation::Bilinear, border_crop, 1.0, 8, 8),
            Err(BurstError::InvalidBorderCrop { .. })
        ));

        let params = crate::burst_pipeline::transform::TransformParams::from_json(&format!(
            r#"{{"border_crop": {border_crop}}}"#
        ))
        .unwrap();
        assert!(matches!(
            ResamplePlan::new(
                Interpolation::Bilinear,
                params.effective_border_crop(),
                1.0,
                8,
                8
            ),
            Err(BurstError::InvalidBorderCrop { .. })
        ));
    }

    #[test]
    fn test_image_and_field_share_geometry() {
        let image = Image::filled(20, 20, 3, 0.5, PixelRange::Normalized).unwrap();
        let grid = SamplingGrid::new(20, 20);
        let plan = ResamplePlan::new(Interpolation::Lanczos, 2, 2.0, 20, 20).unwrap();
        let matrix = Affine2D::translation(0.5, 0.5);

        let frame = plan.resample_image(&image, &matrix).unwrap();
        let field = plan.resample_field(&grid, &matrix).unwrap();
        assert_eq!((frame.width, frame.height), (8, 8));
        assert_eq!((field.width, field.height, field.channels), (8, 8, 2));
    }

    #[test]
    fn test_field_tracks_downsampled_pixel_centers() {
        // With the centering shift for a factor of 2, output pixel (r, c)
        // covers base pixels 2r..2r+1 and maps back to 2c, 2r.
        let grid = SamplingGrid::new(16, 16);
        let plan = ResamplePlan::new(Interpolation::Bilinear, 0, 2.0, 16, 16).unwrap();
        let field = plan
            .resample_field(&grid, &Affine2D::translation(0.5, 0.5))
            .unwrap();
        for r in 0..8 {
            for c in 0..8 {
                assert!((field.get(r, c, 0) - (2 * c) as f32).abs() < 1e-5);
                assert!((field.get(r, c, 1) - (2 * r) as f32).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_eight_bit_output_is_integral() {
        let image = Image::from_fn(10, 10, 1, PixelRange::EightBit, |r, c, _| (r * 20 + c) as f32)
            .unwrap();
        let plan = ResamplePlan::new(Interpolation::Bilinear, 0, 2.0, 10, 10).unwrap();
        let frame = plan
            .resample_image(&image, &Affine2D::translation(0.3, 0.7))
            .unwrap();
        assert_eq!(frame.range, PixelRange::EightBit);
        assert!(frame.data.iter().all(|v| v.fract() == 0.0 && (0.0..=255.0).contains(v)));
    }
}
