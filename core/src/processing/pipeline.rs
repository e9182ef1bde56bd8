use crate::math::interp::Interpolation;
use crate::math::window::Taper;
use crate::prelude::{
    CancelFlag, Image, ProcessingStage, ReconResult, StageContext, StageKind, StageObserver,
};
use crate::processing::backproject::BackProjector;
use crate::processing::normalize::normalize;
use crate::processing::ramp::RampFilter;
use crate::processing::windowing::Windowing;
use log::info;
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Parameters shared by every reconstruction stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub interpolation: Interpolation,
    pub taper: Taper,
}

/// The three reconstructions produced from one sinogram.
#[derive(Debug, Clone)]
pub struct Reconstruction {
    pub unfiltered: Image,
    pub filtered: Image,
    pub windowed: Image,
}

/// 8-bit renditions of a [`Reconstruction`], each normalized on its own range.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSet {
    pub unfiltered: Array2<u8>,
    pub filtered: Array2<u8>,
    pub windowed: Array2<u8>,
}

impl Reconstruction {
    pub fn normalized(&self) -> ReconResult<NormalizedSet> {
        Ok(NormalizedSet {
            unfiltered: normalize(self.unfiltered.view())?,
            filtered: normalize(self.filtered.view())?,
            windowed: normalize(self.windowed.view())?,
        })
    }
}

/// Sinogram -> ramp filter -> back-projection -> windowing.
pub struct Pipeline {
    config: PipelineConfig,
    ctx: StageContext,
    observers: Vec<Arc<dyn StageObserver>>,
    cancel: CancelFlag,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            ctx: StageContext::detached(),
            observers: Vec::new(),
            cancel: CancelFlag::new(),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn StageObserver>) -> Self {
        self.observers.push(observer);
        self.rebuild_context();
        self
    }

    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self.rebuild_context();
        self
    }

    fn rebuild_context(&mut self) {
        self.ctx = StageContext::new(self.cancel.clone(), self.observers.clone());
    }

    pub fn run(&self, sinogram: ArrayView2<f64>) -> ReconResult<Reconstruction> {
        let (steps, width) = sinogram.dim();
        info!(
            "reconstructing {} angles x {} bins ({:?}, {:?} taper)",
            steps, width, self.config.interpolation, self.config.taper
        );
        self.ctx.publish(StageKind::Sinogram, sinogram);

        let mut unfiltered_stage =
            BackProjector::new(self.config.interpolation).reporting_as(StageKind::Unfiltered);
        let unfiltered = self.run_stage(&mut unfiltered_stage, sinogram)?;

        let mut ramp = RampFilter::new();
        let filtered_sinogram = self.run_stage(&mut ramp, sinogram)?;

        let mut filtered_stage =
            BackProjector::new(self.config.interpolation).reporting_as(StageKind::Filtered);
        let filtered = self.run_stage(&mut filtered_stage, filtered_sinogram.view())?;

        let mut windowing = Windowing::new(self.config.taper);
        let windowed = self.run_stage(&mut windowing, filtered.view())?;

        Ok(Reconstruction {
            unfiltered,
            filtered,
            windowed,
        })
    }

    fn run_stage<S: ProcessingStage>(
        &self,
        stage: &mut S,
        input: ArrayView2<f64>,
    ) -> ReconResult<Array2<f64>> {
        let output = stage.execute(input, &self.ctx)?;
        info!("{} complete, output {:?}", stage.name(), output.dim());
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::ReconError;
    use crate::processing::projector::project;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        kinds: Mutex<Vec<StageKind>>,
    }

    impl StageObserver for Recorder {
        fn on_stage(&self, kind: StageKind, _data: ArrayView2<f64>) {
            self.kinds.lock().unwrap().push(kind);
        }
    }

    fn sample_sinogram() -> Array2<f64> {
        let mut phantom = Image::zeros((24, 24));
        phantom.slice_mut(ndarray::s![6..12, 10..16]).fill(1.0);
        project(phantom.view(), 30).unwrap()
    }

    #[test]
    fn run_produces_three_square_images() {
        let sinogram = sample_sinogram();
        let result = Pipeline::new(PipelineConfig::default())
            .run(sinogram.view())
            .unwrap();
        assert_eq!(result.unfiltered.dim(), (24, 24));
        assert_eq!(result.filtered.dim(), (24, 24));
        assert_eq!(result.windowed.dim(), (24, 24));

        let set = result.normalized().unwrap();
        assert_eq!(set.windowed.dim(), (24, 24));
    }

    #[test]
    fn observer_sees_every_intermediate_in_order() {
        let recorder = Arc::new(Recorder::default());
        let pipeline = Pipeline::new(PipelineConfig::default()).with_observer(recorder.clone());
        pipeline.run(sample_sinogram().view()).unwrap();

        assert_eq!(
            *recorder.kinds.lock().unwrap(),
            vec![
                StageKind::Sinogram,
                StageKind::Unfiltered,
                StageKind::Spectrum,
                StageKind::FilteredSpectrum,
                StageKind::FilteredSinogram,
                StageKind::Filtered,
                StageKind::Windowed,
            ]
        );
    }

    #[test]
    fn raised_flag_aborts_without_output() {
        let cancel = CancelFlag::new();
        let pipeline = Pipeline::new(PipelineConfig::default()).with_cancel_flag(cancel.clone());
        cancel.cancel();
        let err = pipeline.run(sample_sinogram().view()).unwrap_err();
        assert!(matches!(
            err,
            ReconError::Cancelled {
                stage: StageKind::Unfiltered,
                ..
            }
        ));
    }
}
