use crate::prelude::{ReconError, ReconResult};
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Resampling kernel used when rotating images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    Nearest,
    #[default]
    Bilinear,
}

impl FromStr for Interpolation {
    type Err = ReconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" => Ok(Interpolation::Nearest),
            "bilinear" => Ok(Interpolation::Bilinear),
            other => Err(ReconError::InvalidParameter(format!(
                "unknown interpolation '{}'",
                other
            ))),
        }
    }
}

/// Rotates `src` by `degrees` about its center, returning a new array.
pub fn rotate(src: ArrayView2<f64>, degrees: f64, interpolation: Interpolation) -> Array2<f64> {
    let mut dst = Array2::zeros(src.raw_dim());
    resample(src, degrees, interpolation, &mut dst);
    dst
}

/// Rotates `src` into `dst`, which must have the same shape.
///
/// Positive angles turn the content counter-clockwise as displayed, with row
/// indices growing downward. The pivot is `((cols - 1) / 2, (rows - 1) / 2)`
/// and samples falling outside the source read as zero.
pub fn rotate_into(
    src: ArrayView2<f64>,
    degrees: f64,
    interpolation: Interpolation,
    dst: &mut Array2<f64>,
) -> ReconResult<()> {
    if src.dim() != dst.dim() {
        return Err(ReconError::DimensionMismatch(format!(
            "rotation target is {:?}, source is {:?}",
            dst.dim(),
            src.dim()
        )));
    }
    resample(src, degrees, interpolation, dst);
    Ok(())
}

fn resample(
    src: ArrayView2<f64>,
    degrees: f64,
    interpolation: Interpolation,
    dst: &mut Array2<f64>,
) {
    let (rows, cols) = src.dim();
    let cx = (cols as f64 - 1.0) / 2.0;
    let cy = (rows as f64 - 1.0) / 2.0;
    let (sin, cos) = degrees.to_radians().sin_cos();

    for ((row, col), out) in dst.indexed_iter_mut() {
        let dx = col as f64 - cx;
        let dy = row as f64 - cy;
        let sx = cos * dx - sin * dy + cx;
        let sy = sin * dx + cos * dy + cy;
        *out = match interpolation {
            Interpolation::Nearest => sample_nearest(&src, sx, sy),
            Interpolation::Bilinear => sample_bilinear(&src, sx, sy),
        };
    }
}

fn pixel(src: &ArrayView2<f64>, x: isize, y: isize) -> f64 {
    let (rows, cols) = src.dim();
    if x < 0 || y < 0 || x as usize >= cols || y as usize >= rows {
        0.0
    } else {
        src[[y as usize, x as usize]]
    }
}

fn sample_nearest(src: &ArrayView2<f64>, x: f64, y: f64) -> f64 {
    pixel(src, x.round() as isize, y.round() as isize)
}

fn sample_bilinear(src: &ArrayView2<f64>, x: f64, y: f64) -> f64 {
    let x0 = x.floor();
    let y0 = y.floor();
    let tx = x - x0;
    let ty = y - y0;
    let (x0, y0) = (x0 as isize, y0 as isize);

    let v00 = pixel(src, x0, y0);
    let v10 = pixel(src, x0 + 1, y0);
    let v01 = pixel(src, x0, y0 + 1);
    let v11 = pixel(src, x0 + 1, y0 + 1);

    let top = v00 + (v10 - v00) * tx;
    let bottom = v01 + (v11 - v01) * tx;
    top + (bottom - top) * ty
}
