use ndarray::{Array2, ArrayView2};
use num_complex::Complex64;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Square grid of real-valued density samples.
pub type Image = Array2<f64>;

/// One row per projection angle, one column per spatial bin.
pub type Sinogram = Array2<f64>;

/// Half-spectrum rows produced by a real-input forward transform.
pub type Spectrum = Array2<Complex64>;

/// Common error type for reconstruction stages.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ReconError {
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),
    #[error("degenerate value range: min {min} equals max {max}")]
    DegenerateRange { min: f64, max: f64 },
    #[error("image contains non-finite values")]
    NonFinite,
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("{stage} cancelled after {completed} of {total} angles")]
    Cancelled {
        stage: StageKind,
        completed: usize,
        total: usize,
    },
}

pub type ReconResult<T> = Result<T, ReconError>;

/// Builds a sinogram from individually supplied projection rows.
pub fn stack_rows<R: AsRef<[f64]>>(rows: &[R]) -> ReconResult<Sinogram> {
    let width = rows
        .first()
        .map(|row| row.as_ref().len())
        .ok_or_else(|| ReconError::DimensionMismatch("no projection rows".into()))?;

    let mut sinogram = Sinogram::zeros((rows.len(), width));
    for (index, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        if row.len() != width {
            return Err(ReconError::DimensionMismatch(format!(
                "row {} has width {}, expected {}",
                index,
                row.len(),
                width
            )));
        }
        sinogram
            .row_mut(index)
            .iter_mut()
            .zip(row)
            .for_each(|(dst, &src)| *dst = src);
    }
    Ok(sinogram)
}

/// Identifies each intermediate array produced along the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Projection,
    Sinogram,
    Unfiltered,
    Spectrum,
    FilteredSpectrum,
    FilteredSinogram,
    Filtered,
    Windowed,
}

impl StageKind {
    pub fn label(&self) -> &'static str {
        match self {
            StageKind::Projection => "projection",
            StageKind::Sinogram => "sinogram",
            StageKind::Unfiltered => "unfiltered",
            StageKind::Spectrum => "spectrum",
            StageKind::FilteredSpectrum => "filtered_spectrum",
            StageKind::FilteredSinogram => "filtered_sinogram",
            StageKind::Filtered => "filtered",
            StageKind::Windowed => "windowed",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Hook invoked with every intermediate array and per-angle progress.
///
/// Both methods default to no-ops so implementors only override what they use.
pub trait StageObserver: Send + Sync {
    fn on_stage(&self, _kind: StageKind, _data: ArrayView2<f64>) {}

    fn on_angle(&self, _kind: StageKind, _index: usize, _total: usize) {}
}

/// Shared flag polled between per-angle iterations.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    inner: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.inner.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.load(Ordering::SeqCst)
    }
}

/// Execution context handed to every stage.
#[derive(Clone, Default)]
pub struct StageContext {
    cancel: CancelFlag,
    observers: Vec<Arc<dyn StageObserver>>,
}

impl StageContext {
    pub fn new(cancel: CancelFlag, observers: Vec<Arc<dyn StageObserver>>) -> Self {
        Self { cancel, observers }
    }

    /// Context with no observers and a flag nobody else holds.
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn cancel_flag(&self) -> &CancelFlag {
        &self.cancel
    }

    /// Reports progress for angle `index` and fails if cancellation was requested.
    pub fn tick(&self, kind: StageKind, index: usize, total: usize) -> ReconResult<()> {
        if self.cancel.is_cancelled() {
            return Err(ReconError::Cancelled {
                stage: kind,
                completed: index,
                total,
            });
        }
        for observer in &self.observers {
            observer.on_angle(kind, index, total);
        }
        Ok(())
    }

    pub fn publish(&self, kind: StageKind, data: ArrayView2<f64>) {
        for observer in &self.observers {
            observer.on_stage(kind, data);
        }
    }
}

/// Array-to-array reconstruction stage.
pub trait ProcessingStage {
    fn name(&self) -> &'static str;
    fn execute(&mut self, input: ArrayView2<f64>, ctx: &StageContext) -> ReconResult<Array2<f64>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_rows_rejects_ragged_rows() {
        let rows = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0]];
        let err = stack_rows(&rows).unwrap_err();
        assert!(matches!(err, ReconError::DimensionMismatch(_)));
    }

    #[test]
    fn stack_rows_keeps_angle_order() {
        let rows = vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]];
        let sinogram = stack_rows(&rows).unwrap();
        assert_eq!(sinogram.dim(), (3, 2));
        assert_eq!(sinogram[[2, 0]], 5.0);
    }

    #[test]
    fn stack_rows_rejects_empty_input() {
        let rows: Vec<Vec<f64>> = Vec::new();
        assert!(stack_rows(&rows).is_err());
    }

    #[test]
    fn tick_reports_cancellation() {
        let ctx = StageContext::detached();
        assert!(ctx.tick(StageKind::Unfiltered, 0, 4).is_ok());
        ctx.cancel_flag().cancel();
        let err = ctx.tick(StageKind::Unfiltered, 2, 4).unwrap_err();
        assert_eq!(
            err,
            ReconError::Cancelled {
                stage: StageKind::Unfiltered,
                completed: 2,
                total: 4
            }
        );
    }
}
