//! Composition of sampled parameters into a single affine matrix

use crate::burst_pipeline::transform::{affine::Affine2D, params::FrameTransform};

/// Builds the matrix mapping base-image coordinates to warped-frame coordinates.
///
/// The product is `scale · rotation · shear · translation`: the translation
/// acts first, then the shear about the image center, the rotation about the
/// image center and finally the anisotropic scale. Reordering changes the
/// generated bursts, so keep it fixed.
pub fn build_transform_matrix(
    image_height: usize,
    image_width: usize,
    transform: &FrameTransform,
) -> Affine2D {
    let (h, w) = (image_height as f64, image_width as f64);

    let translation = Affine2D::translation(transform.translation.0, transform.translation.1);
    let rotation = Affine2D::rotation_about((w * 0.5, h * 0.5), transform.rotation_deg);
    let shear = Affine2D::shear(transform.shear.0, transform.shear.1, w, h);
    let scale = Affine2D::scale(transform.scale.0, transform.scale.1);

    scale
        .compose(&rotation)
        .compose(&shear)
        .compose(&translation)
}
