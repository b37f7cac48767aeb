//! Transformation parameter types

use serde::{Deserialize, Serialize};

use crate::burst_pipeline::common::error::{BurstError, Result};

/// Maximum magnitudes for the random per-frame transforms.
///
/// Field names match the keys of the configuration dictionaries handed over
/// by dataset loaders; absent keys default to zero motion and no border crop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformParams {
    /// Maximum translation in pixels, per axis
    pub max_translation: f64,
    /// Maximum rotation in degrees
    pub max_rotation: f64,
    /// Maximum shear factor, per axis
    pub max_shear: f64,
    /// Maximum log aspect-ratio perturbation
    pub max_ar_factor: f64,
    /// Maximum log scale perturbation
    pub max_scale: f64,
    /// Pixels removed from each side after warping
    pub border_crop: Option<usize>,
}

impl TransformParams {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Border crop actually applied; `Some(0)` behaves like `None`.
    pub fn effective_border_crop(&self) -> usize {
        self.border_crop.unwrap_or(0)
    }

    pub fn validate(&self) -> Result<()> {
        let maxima = [
            ("max_translation", self.max_translation),
            ("max_rotation", self.max_rotation),
            ("max_shear", self.max_shear),
            ("max_ar_factor", self.max_ar_factor),
            ("max_scale", self.max_scale),
        ];
        for (name, value) in maxima {
            if !value.is_finite() || value < 0.0 {
                return Err(BurstError::InvalidTransformParams(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Sampled transform of one burst frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTransform {
    /// (dx, dy) in pixels
    pub translation: (f64, f64),
    /// Rotation about the image center, degrees
    pub rotation_deg: f64,
    /// (x, y) shear factors
    pub shear: (f64, f64),
    /// (x, y) scale factors
    pub scale: (f64, f64),
}

impl FrameTransform {
    /// Offset that centers the sampling grid of a `downsample_factor` reduction.
    pub fn centering_shift(downsample_factor: f64) -> f64 {
        downsample_factor / 2.0 - 0.5
    }

    /// The reference frame: centering shift only.
    pub fn reference(downsample_factor: f64) -> Self {
        let shift = Self::centering_shift(downsample_factor);
        Self {
            translation: (shift, shift),
            rotation_deg: 0.0,
            shear: (0.0, 0.0),
            scale: (1.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_from_partial_dictionary() {
        let params =
            TransformParams::from_json(r#"{"max_translation": 24.0, "border_crop": 24}"#).unwrap();
        assert_eq!(params.max_translation, 24.0);
        assert_eq!(params.max_rotation, 0.0);
        assert_eq!(params.border_crop, Some(24));
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_params_rejects_malformed_json() {
        let result = TransformParams::from_json(r#"{"max_rotation": "a lot"}"#);
        assert!(matches!(result, Err(BurstError::ConfigError(_))));
    }

    #[test]
    fn test_negative_maximum_is_rejected() {
        let params = TransformParams {
            max_shear: -0.1,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(BurstError::InvalidTransformParams(_))
        ));
    }

    #[test]
    fn test_reference_frame() {
        let reference = FrameTransform::reference(4.0);
        assert_eq!(reference.translation, (1.5, 1.5));
        assert_eq!(reference.rotation_deg, 0.0);
        assert_eq!(reference.shear, (0.0, 0.0));
        assert_eq!(reference.scale, (1.0, 1.0));
        assert_eq!(FrameTransform::reference(1.0).translation, (0.0, 0.0));
    }
}
