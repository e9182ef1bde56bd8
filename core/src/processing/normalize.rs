use crate::math::stats::StatsHelper;
use crate::prelude::{ReconError, ReconResult};
use ndarray::{Array2, ArrayView2};

/// Linearly maps `min -> 0` and `max -> 255`, rounding to the nearest level.
///
/// Fails with [`ReconError::DegenerateRange`] when the image is constant and
/// with [`ReconError::NonFinite`] when it holds NaN or infinite samples.
pub fn normalize(image: ArrayView2<f64>) -> ReconResult<Array2<u8>> {
    let (min, max) = StatsHelper::value_range(image)?;
    if max <= min {
        return Err(ReconError::DegenerateRange { min, max });
    }
    let scale = 255.0 / (max - min);
    Ok(image.mapv(|v| ((v - min) * scale).round().clamp(0.0, 255.0) as u8))
}
