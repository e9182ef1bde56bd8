use crate::prelude::ReconError;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::str::FromStr;

/// Cosine-family apodization tapers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Taper {
    /// Reaches zero at both edges.
    #[default]
    Hann,
    /// Raised to 0.08 at the edges.
    Hamming,
}

impl Taper {
    fn coefficients(&self) -> (f64, f64) {
        match self {
            Taper::Hann => (0.5, 0.5),
            Taper::Hamming => (0.54, 0.46),
        }
    }
}

impl FromStr for Taper {
    type Err = ReconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hann" => Ok(Taper::Hann),
            "hamming" => Ok(Taper::Hamming),
            other => Err(ReconError::InvalidParameter(format!("unknown taper '{}'", other))),
        }
    }
}

/// Symmetric taper of length `n`; shorter than two samples it is all ones.
pub fn taper(kind: Taper, n: usize) -> Array1<f64> {
    if n <= 1 {
        return Array1::ones(n);
    }
    let (a, b) = kind.coefficients();
    let denom = (n - 1) as f64;
    Array1::from_shape_fn(n, |i| a - b * (2.0 * PI * i as f64 / denom).cos())
}
