use crate::display::SnapshotObserver;
use crate::io::{load_sinogram, save_gray};
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use fbpcore::telemetry::{LogObserver, MetricsRecorder};
use fbpcore::{CancelFlag, Pipeline};
use log::info;
use ndarray::ArrayView2;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug)]
pub struct WorkflowResult {
    pub sinogram_dim: (usize, usize),
    pub image_dim: (usize, usize),
    pub outputs: Vec<PathBuf>,
    pub snapshots: Vec<PathBuf>,
    pub stages_observed: usize,
    pub angles_processed: usize,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
    cancel: CancelFlag,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self {
            config,
            cancel: CancelFlag::new(),
        }
    }

    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Loads the configured sinogram file and reconstructs it.
    pub fn execute(&self) -> anyhow::Result<WorkflowResult> {
        let sinogram = load_sinogram(&self.config.input, self.config.angles_along_columns)?;
        self.execute_on(sinogram.view())
    }

    /// Reconstructs an in-memory sinogram and writes the three outputs.
    ///
    /// Nothing is written unless all three reconstructions normalize.
    pub fn execute_on(&self, sinogram: ArrayView2<f64>) -> anyhow::Result<WorkflowResult> {
        let metrics = Arc::new(MetricsRecorder::new());
        let mut pipeline = Pipeline::new(self.config.to_pipeline_config())
            .with_cancel_flag(self.cancel.clone())
            .with_observer(Arc::new(LogObserver::new()))
            .with_observer(metrics.clone());

        let snapshots = match &self.config.snapshot_dir {
            Some(dir) => {
                let observer = Arc::new(SnapshotObserver::create(dir)?);
                pipeline = pipeline.with_observer(observer.clone());
                Some(observer)
            }
            None => None,
        };

        let reconstruction = pipeline
            .run(sinogram)
            .context("running reconstruction pipeline")?;
        let normalized = reconstruction
            .normalized()
            .context("normalizing reconstructions")?;

        fs::create_dir_all(&self.config.output_dir).with_context(|| {
            format!(
                "creating output directory {}",
                self.config.output_dir.display()
            )
        })?;
        let [unfiltered_path, filtered_path, windowed_path] = self.config.output_paths();
        save_gray(&unfiltered_path, normalized.unfiltered.view())?;
        save_gray(&filtered_path, normalized.filtered.view())?;
        save_gray(&windowed_path, normalized.windowed.view())?;

        let (stages_observed, angles_processed) = metrics.snapshot();
        info!(
            "wrote {}, {}, {} ({} stages, {} angle passes)",
            unfiltered_path.display(),
            filtered_path.display(),
            windowed_path.display(),
            stages_observed,
            angles_processed
        );

        Ok(WorkflowResult {
            sinogram_dim: sinogram.dim(),
            image_dim: reconstruction.windowed.dim(),
            outputs: vec![unfiltered_path, filtered_path, windowed_path],
            snapshots: snapshots.map(|s| s.written()).unwrap_or_default(),
            stages_observed,
            angles_processed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{build_scan, GeneratorConfig, PhantomKind};
    use crate::io::save_normalized;
    use fbpcore::{ReconError, StageContext};

    fn write_sample_sinogram(dir: &std::path::Path) -> PathBuf {
        let config = GeneratorConfig {
            phantom: PhantomKind::OffsetSquare,
            size: 32,
            steps: 40,
            ..Default::default()
        };
        let scan = build_scan(&config, &StageContext::detached()).unwrap();
        let path = dir.join("sinog.png");
        save_normalized(&path, scan.sinogram.view()).unwrap();
        path
    }

    #[test]
    fn runner_executes_workflow() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample_sinogram(dir.path());
        let cfg = WorkflowConfig {
            input,
            output_dir: dir.path().join("out"),
            snapshot_dir: Some(dir.path().join("stages")),
            ..Default::default()
        };

        let result = Runner::new(cfg).execute().unwrap();
        assert_eq!(result.sinogram_dim, (40, 32));
        assert_eq!(result.image_dim, (32, 32));
        assert!(result.outputs.iter().all(|p| p.exists()));
        assert_eq!(result.snapshots.len(), 7);
        assert_eq!(result.stages_observed, 7);
        assert_eq!(result.angles_processed, 80);
    }

    #[test]
    fn missing_sinogram_aborts_without_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = WorkflowConfig {
            input: dir.path().join("absent.png"),
            output_dir: dir.path().join("out"),
            ..Default::default()
        };

        let err = Runner::new(cfg).execute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ReconError>(),
            Some(ReconError::MissingInput(_))
        ));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn cancelled_runner_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample_sinogram(dir.path());
        let cfg = WorkflowConfig {
            input,
            output_dir: dir.path().join("out"),
            ..Default::default()
        };
        let runner = Runner::new(cfg);
        runner.cancel_flag().cancel();

        let err = runner.execute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ReconError>(),
            Some(ReconError::Cancelled { .. })
        ));
        assert!(!dir.path().join("out").exists());
    }
}
