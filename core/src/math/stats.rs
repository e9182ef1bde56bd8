use crate::prelude::{ReconError, ReconResult};
use ndarray::ArrayView2;

pub struct StatsHelper;

impl StatsHelper {
    /// Minimum and maximum of a finite array.
    pub fn value_range(data: ArrayView2<f64>) -> ReconResult<(f64, f64)> {
        if data.is_empty() {
            return Err(ReconError::DimensionMismatch("empty array has no range".into()));
        }
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &value in data.iter() {
            if !value.is_finite() {
                return Err(ReconError::NonFinite);
            }
            min = min.min(value);
            max = max.max(value);
        }
        Ok((min, max))
    }

    /// Sum of squared samples.
    pub fn energy(data: ArrayView2<f64>) -> f64 {
        data.iter().map(|&v| v * v).sum()
    }

    /// Position of the largest sample, first occurrence wins.
    pub fn argmax(data: ArrayView2<f64>) -> Option<(usize, usize)> {
        data.indexed_iter()
            .fold(None, |best: Option<((usize, usize), f64)>, (idx, &v)| match best {
                Some((_, top)) if top >= v => best,
                _ => Some((idx, v)),
            })
            .map(|(idx, _)| idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn value_range_rejects_nan() {
        let data = array![[1.0, f64::NAN]];
        assert_eq!(StatsHelper::value_range(data.view()), Err(ReconError::NonFinite));
    }

    #[test]
    fn value_range_and_argmax() {
        let data = array![[1.0, -2.0], [7.0, 3.0]];
        assert_eq!(StatsHelper::value_range(data.view()).unwrap(), (-2.0, 7.0));
        assert_eq!(StatsHelper::argmax(data.view()), Some((1, 0)));
        assert_eq!(StatsHelper::energy(data.view()), 63.0);
    }
}
