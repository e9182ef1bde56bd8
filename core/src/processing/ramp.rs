use crate::math::fft::FftHelper;
use crate::prelude::{
    ProcessingStage, ReconError, ReconResult, Sinogram, Spectrum, StageContext, StageKind,
};
use log::debug;
use ndarray::{Array1, Array2, ArrayView2, Axis, Zip};

/// Ramp weights for a row of width `width`, one per half-spectrum bin.
///
/// Built from the floored half-step sequence `0.5, 1.0, ..., width / 2`, which
/// assigns the same weight to the real and imaginary halves of each packed
/// bin. Collapsed onto complex bins this is `weight(k) = k`, so the DC bin is
/// dropped.
pub fn ramp_weights(width: usize) -> Array1<f64> {
    let half = width / 2;
    let packed: Vec<f64> = (1..=2 * half).map(|j| (0.5 * j as f64).floor()).collect();
    Array1::from_shape_fn(half + 1, |k| if k == 0 { packed[0] } else { packed[2 * k - 1] })
}

fn check_width(width: usize) -> ReconResult<()> {
    if width < 2 {
        return Err(ReconError::InvalidParameter(format!(
            "projection width must be at least 2, got {}",
            width
        )));
    }
    Ok(())
}

/// Row-wise half spectrum of a sinogram.
pub fn spectrum(sinogram: ArrayView2<f64>) -> ReconResult<Spectrum> {
    let (rows, width) = sinogram.dim();
    check_width(width)?;

    let mut fft = FftHelper::new(width);
    let mut out = Spectrum::zeros((rows, fft.bins()));
    for (src, mut dst) in sinogram.axis_iter(Axis(0)).zip(out.axis_iter_mut(Axis(0))) {
        let row = src.to_vec();
        dst.assign(&Array1::from(fft.forward(&row)?));
    }
    Ok(out)
}

/// Multiplies every spectrum row by the ramp weights.
pub fn apply_ramp(spectrum: &Spectrum, width: usize) -> ReconResult<Spectrum> {
    let weights = ramp_weights(width);
    if weights.len() != spectrum.ncols() {
        return Err(ReconError::DimensionMismatch(format!(
            "spectrum has {} bins, width {} needs {}",
            spectrum.ncols(),
            width,
            weights.len()
        )));
    }
    let mut filtered = spectrum.clone();
    for mut row in filtered.axis_iter_mut(Axis(0)) {
        Zip::from(&mut row).and(&weights).for_each(|bin, &w| *bin *= w);
    }
    Ok(filtered)
}

/// Inverse of [`spectrum`], returning real rows of `width` samples.
pub fn inverse_spectrum(spectrum: &Spectrum, width: usize) -> ReconResult<Sinogram> {
    check_width(width)?;
    let mut fft = FftHelper::new(width);
    if spectrum.ncols() != fft.bins() {
        return Err(ReconError::DimensionMismatch(format!(
            "spectrum has {} bins, width {} needs {}",
            spectrum.ncols(),
            width,
            fft.bins()
        )));
    }
    let mut out = Sinogram::zeros((spectrum.nrows(), width));
    for (src, mut dst) in spectrum.axis_iter(Axis(0)).zip(out.axis_iter_mut(Axis(0))) {
        let bins = src.to_vec();
        dst.assign(&Array1::from(fft.inverse(&bins)?));
    }
    Ok(out)
}

/// `log(|F| + 1)` of a spectrum, for display of the frequency-domain stages.
pub fn log_magnitude(spectrum: &Spectrum) -> Array2<f64> {
    spectrum.mapv(|c| (c.norm() + 1.0).ln())
}

/// Frequency-domain ramp filter applied independently to each sinogram row.
#[derive(Debug, Default)]
pub struct RampFilter;

impl RampFilter {
    pub fn new() -> Self {
        Self
    }

    pub fn filter(&self, sinogram: ArrayView2<f64>, ctx: &StageContext) -> ReconResult<Sinogram> {
        let width = sinogram.ncols();
        let transformed = spectrum(sinogram)?;
        ctx.publish(StageKind::Spectrum, log_magnitude(&transformed).view());

        let weighted = apply_ramp(&transformed, width)?;
        ctx.publish(StageKind::FilteredSpectrum, log_magnitude(&weighted).view());

        let filtered = inverse_spectrum(&weighted, width)?;
        debug!(
            "ramp filtered {} rows of width {}",
            filtered.nrows(),
            width
        );
        ctx.publish(StageKind::FilteredSinogram, filtered.view());
        Ok(filtered)
    }
}

impl ProcessingStage for RampFilter {
    fn name(&self) -> &'static str {
        "ramp filter"
    }

    fn execute(&mut self, input: ArrayView2<f64>, ctx: &StageContext) -> ReconResult<Array2<f64>> {
        self.filter(input, ctx)
    }
}

/// Ramp-filters every row of `sinogram`, preserving its shape.
pub fn filter(sinogram: ArrayView2<f64>) -> ReconResult<Sinogram> {
    RampFilter::new().filter(sinogram, &StageContext::detached())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_weights_start_at_zero_and_grow_by_bin() {
        let w = ramp_weights(8);
        assert_eq!(w.to_vec(), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(ramp_weights(7).to_vec(), vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn filter_preserves_shape() {
        let sinogram = Sinogram::from_shape_fn((5, 12), |(r, c)| (r * c) as f64 % 7.0);
        let filtered = filter(sinogram.view()).unwrap();
        assert_eq!(filtered.dim(), (5, 12));
    }

    #[test]
    fn constant_rows_filter_to_zero() {
        let sinogram = Sinogram::from_elem((3, 16), 42.0);
        let filtered = filter(sinogram.view()).unwrap();
        assert!(filtered.iter().all(|v| v.abs() < 1e-9));
    }

    #[test]
    fn filtered_rows_have_zero_mean() {
        let sinogram = Sinogram::from_shape_fn((4, 9), |(r, c)| ((r + 1) * (c + 3)) as f64);
        let filtered = filter(sinogram.view()).unwrap();
        for row in filtered.axis_iter(Axis(0)) {
            assert!(row.sum().abs() < 1e-9);
        }
    }

    #[test]
    fn filter_is_zero_phase() {
        // A symmetric row stays symmetric about the same sample.
        let mut sinogram = Sinogram::zeros((1, 16));
        sinogram[[0, 8]] = 1.0;
        let filtered = filter(sinogram.view()).unwrap();
        assert_eq!(filtered_argmax(&filtered), 8);
        for offset in 1..8 {
            assert!((filtered[[0, 8 - offset]] - filtered[[0, 8 + offset]]).abs() < 1e-9);
        }
    }

    fn filtered_argmax(filtered: &Sinogram) -> usize {
        filtered
            .row(0)
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
            .0
    }

    #[test]
    fn rejects_narrow_rows() {
        let sinogram = Sinogram::zeros((3, 1));
        assert!(matches!(
            filter(sinogram.view()),
            Err(ReconError::InvalidParameter(_))
        ));
    }
}
