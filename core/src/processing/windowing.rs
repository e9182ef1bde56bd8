use crate::math::matrix::MatrixHelper;
use crate::math::window::{taper, Taper};
use crate::prelude::{Image, ProcessingStage, ReconResult, StageContext, StageKind};
use log::warn;
use ndarray::{Array2, ArrayView2};

/// Spatial apodization of a reconstructed image.
pub struct Windowing {
    taper: Taper,
}

impl Windowing {
    pub fn new(taper: Taper) -> Self {
        Self { taper }
    }

    /// 2-D window matching `rows x cols`, the outer product of two 1-D tapers.
    pub fn mask(&self, rows: usize, cols: usize) -> Array2<f64> {
        let vertical = taper(self.taper, rows);
        if rows == cols {
            return MatrixHelper::outer(vertical.view(), vertical.view());
        }
        let horizontal = taper(self.taper, cols);
        MatrixHelper::outer(vertical.view(), horizontal.view())
    }

    pub fn apply(&self, image: ArrayView2<f64>, ctx: &StageContext) -> ReconResult<Image> {
        let (rows, cols) = image.dim();
        if rows != cols {
            warn!(
                "windowing non-square {}x{} image with a separable {:?} taper per axis",
                rows, cols, self.taper
            );
        }
        let windowed = &image * &self.mask(rows, cols);
        ctx.publish(StageKind::Windowed, windowed.view());
        Ok(windowed)
    }
}

impl ProcessingStage for Windowing {
    fn name(&self) -> &'static str {
        "windowing"
    }

    fn execute(&mut self, input: ArrayView2<f64>, ctx: &StageContext) -> ReconResult<Array2<f64>> {
        self.apply(input, ctx)
    }
}

/// Multiplies `image` by a separable 2-D taper of its own shape.
pub fn window(image: ArrayView2<f64>, kind: Taper) -> ReconResult<Image> {
    Windowing::new(kind).apply(image, &StageContext::detached())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_window_zeroes_border_and_keeps_center() {
        let image = Image::from_elem((9, 9), 2.0);
        let out = window(image.view(), Taper::Hann).unwrap();
        assert!(out.row(0).iter().all(|v| v.abs() < 1e-12));
        assert!(out.column(8).iter().all(|v| v.abs() < 1e-12));
        assert!((out[[4, 4]] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn hamming_window_matches_outer_product() {
        let image = Image::from_elem((5, 5), 1.0);
        let out = window(image.view(), Taper::Hamming).unwrap();
        assert!((out[[0, 0]] - 0.08 * 0.08).abs() < 1e-12);
        assert!((out[[0, 2]] - 0.08).abs() < 1e-12);
    }

    #[test]
    fn non_square_window_tapers_both_axes() {
        let image = Image::from_elem((5, 9), 1.0);
        let out = window(image.view(), Taper::Hann).unwrap();
        assert_eq!(out.dim(), (5, 9));
        assert!((out[[2, 4]] - 1.0).abs() < 1e-12);
        assert!(out[[2, 0]].abs() < 1e-12);
        assert!(out[[0, 4]].abs() < 1e-12);
    }

    #[test]
    fn empty_image_windows_to_empty_image() {
        let image = Image::zeros((0, 0));
        let out = window(image.view(), Taper::Hann).unwrap();
        assert_eq!(out.dim(), (0, 0));
    }
}
