use crate::math::stats::StatsHelper;
use crate::prelude::{StageKind, StageObserver};
use log::{debug, info, warn};
use ndarray::ArrayView2;

/// Observer that reports every intermediate through the `log` facade.
pub struct LogObserver;

impl LogObserver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl StageObserver for LogObserver {
    fn on_stage(&self, kind: StageKind, data: ArrayView2<f64>) {
        match StatsHelper::value_range(data) {
            Ok((min, max)) => info!(
                "{} {:?} range [{:.4}, {:.4}]",
                kind,
                data.dim(),
                min,
                max
            ),
            Err(err) => warn!("{} {:?}: {}", kind, data.dim(), err),
        }
    }

    fn on_angle(&self, kind: StageKind, index: usize, total: usize) {
        let stride = (total / 10).max(1);
        if index % stride == 0 {
            debug!("{} angle {}/{}", kind, index + 1, total);
        }
    }
}
