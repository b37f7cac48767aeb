//! Camera pipeline parameter types

use serde::Serialize;

use crate::burst_pipeline::common::error::{BurstError, Result};

/// 3x3 colour transform acting on RGB column vectors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorMatrix(pub [[f64; 3]; 3]);

impl ColorMatrix {
    pub fn identity() -> Self {
        Self([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
    }

    pub fn rows(&self) -> &[[f64; 3]; 3] {
        &self.0
    }

    pub fn multiply(&self, other: &ColorMatrix) -> Self {
        let mut out = [[0.0; 3]; 3];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, v) in row.iter_mut().enumerate() {
                *v = (0..3).map(|k| self.0[r][k] * other.0[k][c]).sum();
            }
        }
        Self(out)
    }

    /// Scales every row to sum to one.
    pub fn normalize_rows(&self) -> Self {
        let mut out = self.0;
        for row in &mut out {
            let sum: f64 = row.iter().sum();
            row.iter_mut().for_each(|v| *v /= sum);
        }
        Self(out)
    }

    pub fn determinant(&self) -> f64 {
        let m = &self.0;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    pub fn inverse(&self) -> Result<Self> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < 1e-12 {
            return Err(BurstError::SingularMatrix(format!(
                "colour matrix determinant {det:e}"
            )));
        }
        let m = &self.0;
        let cofactor = |r0: usize, r1: usize, c0: usize, c1: usize| {
            m[r0][c0] * m[r1][c1] - m[r0][c1] * m[r1][c0]
        };
        // Adjugate divided by the determinant
        Ok(Self([
            [
                cofactor(1, 2, 1, 2) / det,
                -cofactor(0, 2, 1, 2) / det,
                cofactor(0, 1, 1, 2) / det,
            ],
            [
                -cofactor(1, 2, 0, 2) / det,
                cofactor(0, 2, 0, 2) / det,
                -cofactor(0, 1, 0, 2) / det,
            ],
            [
                cofactor(1, 2, 0, 1) / det,
                -cofactor(0, 2, 0, 1) / det,
                cofactor(0, 1, 0, 1) / det,
            ],
        ]))
    }

    #[inline]
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let mut out = [0.0f32; 3];
        for (o, row) in out.iter_mut().zip(&self.0) {
            *o = (row[0] * rgb[0] as f64 + row[1] * rgb[1] as f64 + row[2] * rgb[2] as f64) as f32;
        }
        out
    }
}

/// White balance and brightness gains of the forward pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WhiteBalanceGains {
    pub rgb_gain: f64,
    pub red_gain: f64,
    pub blue_gain: f64,
}

impl WhiteBalanceGains {
    /// Gains that leave the image unchanged
    pub fn neutral() -> Self {
        Self {
            rgb_gain: 1.0,
            red_gain: 1.0,
            blue_gain: 1.0,
        }
    }
}

/// Sensor noise model: per-sample variance is `x * shot + read`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NoiseLevels {
    pub shot_noise_level: f64,
    pub read_noise_level: f64,
}

impl NoiseLevels {
    pub fn none() -> Self {
        Self {
            shot_noise_level: 0.0,
            read_noise_level: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse() {
        let m = ColorMatrix([[2.0, 0.5, 0.1], [0.2, 1.5, -0.3], [0.0, 0.4, 0.9]]);
        let product = m.multiply(&m.inverse().unwrap());
        for r in 0..3 {
            for c in 0..3 {
                let expected = if r == c { 1.0 } else { 0.0 };
                assert!((product.0[r][c] - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_singular_inverse_rejected() {
        let m = ColorMatrix([[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 1.0, 1.0]]);
        assert!(matches!(m.inverse(), Err(BurstError::SingularMatrix(_))));
    }

    #[test]
    fn test_normalize_rows() {
        let m = ColorMatrix([[2.0, 1.0, 1.0], [0.0, 3.0, 1.0], [1.0, 1.0, 8.0]]).normalize_rows();
        for row in m.rows() {
            assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        }
    }
}
