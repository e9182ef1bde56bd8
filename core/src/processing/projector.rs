use crate::geometry::AngleSequence;
use crate::math::interp::{rotate_into, Interpolation};
use crate::prelude::{
    Image, ProcessingStage, ReconError, ReconResult, Sinogram, StageContext, StageKind,
};
use log::debug;
use ndarray::{Array2, ArrayView2, Axis};

/// Forward projector approximating the Radon transform by rotate-then-sum.
///
/// Used to synthesize test sinograms; it is not on the reconstruction path.
pub struct ForwardProjector {
    steps: usize,
    interpolation: Interpolation,
}

impl ForwardProjector {
    pub fn new(steps: usize, interpolation: Interpolation) -> Self {
        Self {
            steps,
            interpolation,
        }
    }

    pub fn angles(&self) -> AngleSequence {
        AngleSequence::evenly_spaced(self.steps)
    }

    pub fn project(&self, image: ArrayView2<f64>, ctx: &StageContext) -> ReconResult<Sinogram> {
        if self.steps == 0 {
            return Err(ReconError::InvalidParameter(
                "projection steps must be at least 1".into(),
            ));
        }
        let (rows, cols) = image.dim();
        if rows != cols {
            return Err(ReconError::DimensionMismatch(format!(
                "forward projection needs a square image, got {}x{}",
                rows, cols
            )));
        }

        let angles = self.angles();
        let mut sinogram = Sinogram::zeros((self.steps, cols));
        let mut rotated = Image::zeros((rows, cols));

        for (index, degrees) in angles.iter().enumerate() {
            ctx.tick(StageKind::Projection, index, self.steps)?;
            rotate_into(image, -degrees, self.interpolation, &mut rotated)?;
            sinogram.row_mut(index).assign(&rotated.sum_axis(Axis(0)));
        }

        debug!(
            "projected {}x{} image over {} angles (step {:.4} deg)",
            rows,
            cols,
            self.steps,
            angles.step()
        );
        ctx.publish(StageKind::Projection, sinogram.view());
        Ok(sinogram)
    }
}

impl ProcessingStage for ForwardProjector {
    fn name(&self) -> &'static str {
        "forward projection"
    }

    fn execute(&mut self, input: ArrayView2<f64>, ctx: &StageContext) -> ReconResult<Array2<f64>> {
        self.project(input, ctx)
    }
}

/// Projects a square image over `steps` angles evenly spaced in [0°, 180°).
pub fn project(image: ArrayView2<f64>, steps: usize) -> ReconResult<Sinogram> {
    ForwardProjector::new(steps, Interpolation::default()).project(image, &StageContext::detached())
}
