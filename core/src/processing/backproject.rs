use crate::geometry::AngleSequence;
use crate::math::interp::{rotate_into, Interpolation};
use crate::prelude::{Image, ProcessingStage, ReconError, ReconResult, StageContext, StageKind};
use log::debug;
use ndarray::{Array2, ArrayView2, Axis, Zip};

/// Rotate-and-accumulate back-projector.
///
/// Each projection row is smeared uniformly across a square tile, rotated by
/// its acquisition angle and summed into the output. The tile and rotation
/// buffers are allocated once per call and reused for every angle.
pub struct BackProjector {
    interpolation: Interpolation,
    kind: StageKind,
}

impl BackProjector {
    pub fn new(interpolation: Interpolation) -> Self {
        Self {
            interpolation,
            kind: StageKind::Filtered,
        }
    }

    /// Tags progress and published output with `kind`.
    pub fn reporting_as(mut self, kind: StageKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn reconstruct(&self, sinogram: ArrayView2<f64>, ctx: &StageContext) -> ReconResult<Image> {
        let (steps, width) = sinogram.dim();
        if steps == 0 || width == 0 {
            return Err(ReconError::DimensionMismatch(format!(
                "cannot back-project an empty {}x{} sinogram",
                steps, width
            )));
        }

        let angles = AngleSequence::evenly_spaced(steps);
        let mut accumulator = Image::zeros((width, width));
        let mut tile = Image::zeros((width, width));
        let mut rotated = Image::zeros((width, width));

        for (index, (row, degrees)) in sinogram.axis_iter(Axis(0)).zip(angles.iter()).enumerate() {
            ctx.tick(self.kind, index, steps)?;
            for mut tile_row in tile.axis_iter_mut(Axis(0)) {
                tile_row.assign(&row);
            }
            rotate_into(tile.view(), degrees, self.interpolation, &mut rotated)?;
            Zip::from(&mut accumulator)
                .and(&rotated)
                .for_each(|acc, &value| *acc += value);
        }

        debug!(
            "back-projected {} angles into {}x{} ({})",
            steps, width, width, self.kind
        );
        ctx.publish(self.kind, accumulator.view());
        Ok(accumulator)
    }
}

impl ProcessingStage for BackProjector {
    fn name(&self) -> &'static str {
        "back projection"
    }

    fn execute(&mut self, input: ArrayView2<f64>, ctx: &StageContext) -> ReconResult<Array2<f64>> {
        self.reconstruct(input, ctx)
    }
}

/// Back-projects an `S x W` sinogram into a `W x W` image.
pub fn reconstruct(sinogram: ArrayView2<f64>) -> ReconResult<Image> {
    BackProjector::new(Interpolation::default()).reconstruct(sinogram, &StageContext::detached())
}
