use crate::io::save_gray;
use anyhow::Context;
use fbpcore::{normalize, StageKind, StageObserver};
use log::{info, warn};
use ndarray::ArrayView2;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Observer that dumps every intermediate stage as a normalized PNG.
///
/// Files are numbered in arrival order, e.g. `00_sinogram.png`. Stages whose
/// values cannot be normalized are skipped with a warning.
pub struct SnapshotObserver {
    dir: PathBuf,
    written: Mutex<Vec<PathBuf>>,
}

impl SnapshotObserver {
    pub fn create<P: AsRef<Path>>(dir: P) -> anyhow::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating snapshot directory {}", dir.display()))?;
        Ok(Self {
            dir,
            written: Mutex::new(Vec::new()),
        })
    }

    pub fn written(&self) -> Vec<PathBuf> {
        self.written
            .lock()
            .map(|paths| paths.clone())
            .unwrap_or_default()
    }

    fn store(&self, kind: StageKind, data: ArrayView2<f64>) -> anyhow::Result<()> {
        let quantized = normalize(data)?;
        let mut written = self
            .written
            .lock()
            .map_err(|_| anyhow::anyhow!("snapshot registry poisoned"))?;
        let path = self
            .dir
            .join(format!("{:02}_{}.png", written.len(), kind.label()));
        save_gray(&path, quantized.view())?;
        info!("[snapshot] {} -> {}", kind, path.display());
        written.push(path);
        Ok(())
    }
}

impl StageObserver for SnapshotObserver {
    fn on_stage(&self, kind: StageKind, data: ArrayView2<f64>) {
        if let Err(err) = self.store(kind, data) {
            warn!("[snapshot] skipping {}: {:#}", kind, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn writes_numbered_files_and_skips_flat_stages() {
        let dir = tempfile::tempdir().unwrap();
        let observer = SnapshotObserver::create(dir.path().join("stages")).unwrap();

        observer.on_stage(StageKind::Sinogram, array![[0.0, 1.0], [2.0, 3.0]].view());
        observer.on_stage(StageKind::Spectrum, Array2::from_elem((2, 2), 4.0).view());
        observer.on_stage(StageKind::Filtered, array![[1.0, -1.0]].view());

        let written = observer.written();
        assert_eq!(written.len(), 2);
        assert!(written[0].ends_with("00_sinogram.png"));
        assert!(written[1].ends_with("01_filtered.png"));
        assert!(written.iter().all(|p| p.exists()));
    }
}
