//! 2D affine transform value type

use crate::burst_pipeline::common::error::{BurstError, Result};

const SINGULAR_EPS: f64 = 1e-12;

/// A 2x3 affine matrix `[[a, b, tx], [c, d, ty]]` acting on column vectors
/// `(x, y, 1)`. The implicit third row is `[0, 0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine2D {
    m: [[f64; 3]; 2],
}

impl Affine2D {
    pub fn from_rows(rows: [[f64; 3]; 2]) -> Self {
        Self { m: rows }
    }

    pub fn identity() -> Self {
        Self::from_rows([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])
    }

    pub fn translation(dx: f64, dy: f64) -> Self {
        Self::from_rows([[1.0, 0.0, dx], [0.0, 1.0, dy]])
    }

    /// Rotation by `degrees` about `center`, positive angles turning
    /// counter-clockwise as seen on screen (y axis pointing down).
    pub fn rotation_about(center: (f64, f64), degrees: f64) -> Self {
        let (cx, cy) = center;
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::from_rows([
            [cos, sin, (1.0 - cos) * cx - sin * cy],
            [-sin, cos, sin * cx + (1.0 - cos) * cy],
        ])
    }

    /// Shear referenced to the half-width / half-height of a `width` x `height` image.
    pub fn shear(sx: f64, sy: f64, width: f64, height: f64) -> Self {
        Self::from_rows([
            [1.0, sx, -sx * 0.5 * width],
            [sy, 1.0, -sy * 0.5 * height],
        ])
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::from_rows([[sx, 0.0, 0.0], [0.0, sy, 0.0]])
    }

    /// Matrix product `self · other`: `other` is applied first.
    pub fn compose(&self, other: &Affine2D) -> Self {
        let a = &self.m;
        let b = &other.m;
        let mut out = [[0.0; 3]; 2];
        for (r, row) in out.iter_mut().enumerate() {
            row[0] = a[r][0] * b[0][0] + a[r][1] * b[1][0];
            row[1] = a[r][0] * b[0][1] + a[r][1] * b[1][1];
            row[2] = a[r][0] * b[0][2] + a[r][1] * b[1][2] + a[r][2];
        }
        Self { m: out }
    }

    pub fn determinant(&self) -> f64 {
        self.m[0][0] * self.m[1][1] - self.m[0][1] * self.m[1][0]
    }

    /// Inverse of the homogeneous 3x3 form, returned as 2x3.
    pub fn invert(&self) -> Result<Self> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < SINGULAR_EPS {
            return Err(BurstError::SingularMatrix(format!(
                "affine determinant {det:e}"
            )));
        }
        let [[a, b, tx], [c, d, ty]] = self.m;
        let ia = d / det;
        let ib = -b / det;
        let ic = -c / det;
        let id = a / det;
        Ok(Self::from_rows([
            [ia, ib, -(ia * tx + ib * ty)],
            [ic, id, -(ic * tx + id * ty)],
        ]))
    }

    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.m[0][0] * x + self.m[0][1] * y + self.m[0][2],
            self.m[1][0] * x + self.m[1][1] * y + self.m[1][2],
        )
    }

    pub fn apply_to_points(&self, points: &[(f64, f64)]) -> Vec<(f64, f64)> {
        points.iter().map(|&(x, y)| self.apply(x, y)).collect()
    }

    pub fn as_rows(&self) -> [[f64; 3]; 2] {
        self.m
    }

    /// Translation column `(tx, ty)`
    pub fn translation_part(&self) -> (f64, f64) {
        (self.m[0][2], self.m[1][2])
    }

    /// Upper-left 2x2 block
    pub fn linear_part(&self) -> [[f64; 2]; 2] {
        [[self.m[0][0], self.m[0][1]], [self.m[1][0], self.m[1][1]]]
    }
}

impl Default for Affine2D {
    fn default() -> Self {
        Self::identity()
    }
}
