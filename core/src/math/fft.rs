use crate::prelude::{ReconError, ReconResult};
use num_complex::Complex64;
use rustfft::{num_traits::Zero, Fft, FftPlanner};
use std::sync::Arc;

/// Helper that wraps a `rustfft` forward/inverse plan pair for real rows of a fixed width.
pub struct FftHelper {
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
    buffer: Vec<Complex64>,
    scratch: Vec<Complex64>,
}

impl FftHelper {
    pub fn new(width: usize) -> Self {
        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(width);
        let inverse = planner.plan_fft_inverse(width);
        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());
        Self {
            forward,
            inverse,
            buffer: vec![Complex64::zero(); width],
            scratch: vec![Complex64::zero(); scratch_len],
        }
    }

    pub fn width(&self) -> usize {
        self.buffer.len()
    }

    /// Number of non-redundant bins for a real input row.
    pub fn bins(&self) -> usize {
        self.width() / 2 + 1
    }

    /// Transforms a real row into its half spectrum, bins `0..=width / 2`.
    pub fn forward(&mut self, input: &[f64]) -> ReconResult<Vec<Complex64>> {
        self.check_len("row", input.len(), self.width())?;
        self.buffer
            .iter_mut()
            .zip(input)
            .for_each(|(slot, &value)| *slot = Complex64::new(value, 0.0));
        self.forward
            .process_with_scratch(&mut self.buffer, &mut self.scratch);
        Ok(self.buffer[..self.bins()].to_vec())
    }

    /// Rebuilds a real row of the helper's width from a half spectrum.
    pub fn inverse(&mut self, bins: &[Complex64]) -> ReconResult<Vec<f64>> {
        self.check_len("half spectrum", bins.len(), self.bins())?;
        let width = self.width();

        self.buffer[..bins.len()].copy_from_slice(bins);
        for k in 1..(width + 1) / 2 {
            self.buffer[width - k] = bins[k].conj();
        }
        self.inverse
            .process_with_scratch(&mut self.buffer, &mut self.scratch);

        let scale = 1.0 / width as f64;
        Ok(self.buffer.iter().map(|c| c.re * scale).collect())
    }

    fn check_len(&self, what: &str, got: usize, want: usize) -> ReconResult<()> {
        if got != want {
            return Err(ReconError::DimensionMismatch(format!(
                "{} has {} samples, width {} plan needs {}",
                what,
                got,
                self.width(),
                want
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fft_helper_returns_half_spectrum() {
        let mut helper = FftHelper::new(8);
        let output = helper
            .forward(&[1.0, 0.0, -1.0, 0.0, 1.0, 0.0, -1.0, 0.0])
            .unwrap();
        assert_eq!(output.len(), 5);
        assert!((output[2].re - 4.0).abs() < 1e-9);
        assert!(output[0].norm() < 1e-9);
    }

    #[test]
    fn inverse_restores_odd_width_row() {
        let row = [3.0, -1.0, 0.5, 2.0, 7.0];
        let mut helper = FftHelper::new(row.len());
        let bins = helper.forward(&row).unwrap();
        let restored = helper.inverse(&bins).unwrap();
        for (a, b) in row.iter().zip(&restored) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn wrong_lengths_are_rejected() {
        let mut helper = FftHelper::new(6);
        assert!(matches!(
            helper.forward(&[1.0; 5]),
            Err(ReconError::DimensionMismatch(_))
        ));
        assert!(helper.inverse(&[Complex64::zero(); 3]).is_err());
    }
}
