//! Interpolation kernels

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::burst_pipeline::common::error::BurstError;

const LANCZOS_A: usize = 4;
const MAX_TAPS: usize = 2 * LANCZOS_A;

/// Interpolation kernel shared by warping and downsampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// 2x2 neighbourhood
    #[default]
    Bilinear,
    /// Lanczos window with a = 4 (8x8 neighbourhood)
    Lanczos,
}

impl Interpolation {
    pub fn name(self) -> &'static str {
        match self {
            Interpolation::Bilinear => "bilinear",
            Interpolation::Lanczos => "lanczos",
        }
    }

    /// Tap positions and weights for sampling at coordinate `t` along one axis.
    pub(crate) fn taps(self, t: f64) -> Taps {
        let base = t.floor();
        let frac = t - base;
        let base = base as isize;

        let mut taps = Taps {
            start: base,
            weights: [0.0; MAX_TAPS],
            len: 1,
        };
        if frac == 0.0 {
            taps.weights[0] = 1.0;
            return taps;
        }

        match self {
            Interpolation::Bilinear => {
                taps.weights[0] = 1.0 - frac;
                taps.weights[1] = frac;
                taps.len = 2;
            }
            Interpolation::Lanczos => {
                taps.start = base - (LANCZOS_A as isize - 1);
                taps.len = MAX_TAPS;
                let mut sum = 0.0;
                for (i, w) in taps.weights.iter_mut().enumerate() {
                    let d = frac + (LANCZOS_A - 1) as f64 - i as f64;
                    *w = lanczos(d);
                    sum += *w;
                }
                for w in &mut taps.weights {
                    *w /= sum;
                }
            }
        }
        taps
    }
}

impl FromStr for Interpolation {
    type Err = BurstError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bilinear" => Ok(Interpolation::Bilinear),
            "lanczos" => Ok(Interpolation::Lanczos),
            other => Err(BurstError::UnknownInterpolation(other.to_string())),
        }
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One-dimensional filter footprint: `weights[i]` applies to index `start + i`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Taps {
    pub start: isize,
    pub weights: [f64; MAX_TAPS],
    pub len: usize,
}

impl Taps {
    pub fn iter(&self) -> impl Iterator<Item = (isize, f64)> + '_ {
        self.weights[..self.len]
            .iter()
            .enumerate()
            .map(move |(i, &w)| (self.start + i as isize, w))
    }
}

fn lanczos(d: f64) -> f64 {
    if d.abs() >= LANCZOS_A as f64 {
        return 0.0;
    }
    sinc(d) * sinc(d / LANCZOS_A as f64)
}

fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        let px = PI * x;
        px.sin() / px
    }
}
