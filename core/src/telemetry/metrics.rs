use crate::prelude::{StageKind, StageObserver};
use ndarray::ArrayView2;
use std::sync::Mutex;

/// Counts completed stages and per-angle iterations.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

struct Metrics {
    stages: usize,
    angles: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics {
                stages: 0,
                angles: 0,
            }),
        }
    }

    pub fn snapshot(&self) -> (usize, usize) {
        if let Ok(metrics) = self.inner.lock() {
            (metrics.stages, metrics.angles)
        } else {
            (0, 0)
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl StageObserver for MetricsRecorder {
    fn on_stage(&self, _kind: StageKind, _data: ArrayView2<f64>) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.stages += 1;
        }
    }

    fn on_angle(&self, _kind: StageKind, _index: usize, _total: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.angles += 1;
        }
    }
}
