//! Grayscale PNG boundary between image files and the numeric core.

use anyhow::Context;
use fbpcore::{ReconError, Sinogram};
use image::GrayImage;
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Reads an 8-bit grayscale sinogram, one projection per row.
///
/// With `angles_along_columns` the file is transposed on load, for sinograms
/// stored with projection angles on the horizontal axis.
pub fn load_sinogram(path: &Path, angles_along_columns: bool) -> anyhow::Result<Sinogram> {
    let decoded = image::open(path)
        .map_err(|err| ReconError::MissingInput(format!("{}: {}", path.display(), err)))
        .with_context(|| format!("loading sinogram {}", path.display()))?
        .into_luma8();

    let (width, height) = decoded.dimensions();
    let samples = decoded.into_raw().into_iter().map(f64::from).collect();
    let sinogram = Array2::from_shape_vec((height as usize, width as usize), samples)
        .with_context(|| format!("shaping sinogram {}", path.display()))?;

    Ok(if angles_along_columns {
        sinogram.reversed_axes().as_standard_layout().into_owned()
    } else {
        sinogram
    })
}

/// Writes an 8-bit image as a grayscale PNG.
pub fn save_gray(path: &Path, image: ArrayView2<u8>) -> anyhow::Result<()> {
    let (rows, cols) = image.dim();
    let raw: Vec<u8> = image.iter().copied().collect();
    let buffer = GrayImage::from_raw(cols as u32, rows as u32, raw)
        .with_context(|| format!("building {}x{} image for {}", rows, cols, path.display()))?;
    buffer
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Normalizes a real-valued array and writes it as a grayscale PNG.
pub fn save_normalized(path: &Path, data: ArrayView2<f64>) -> anyhow::Result<()> {
    let quantized = fbpcore::normalize(data)
        .with_context(|| format!("normalizing data for {}", path.display()))?;
    save_gray(path, quantized.view())
}

/// JSON sidecar describing how a sinogram image was acquired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SinogramSidecar {
    pub angles: fbpcore::AngleSequence,
    pub rows: usize,
    pub cols: usize,
    pub source_size: usize,
}

impl SinogramSidecar {
    pub fn write(&self, path: &Path) -> anyhow::Result<()> {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .with_context(|| format!("writing sidecar {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fbpcore::AngleSequence;
    use ndarray::array;

    #[test]
    fn missing_file_reports_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_sinogram(&dir.path().join("sinog.png"), false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ReconError>(),
            Some(ReconError::MissingInput(_))
        ));
    }

    #[test]
    fn saved_image_loads_back_with_rows_as_angles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sinog.png");
        let data = array![[0u8, 10, 20], [30, 40, 255]];
        save_gray(&path, data.view()).unwrap();

        let loaded = load_sinogram(&path, false).unwrap();
        assert_eq!(loaded.dim(), (2, 3));
        assert_eq!(loaded[[1, 2]], 255.0);

        let transposed = load_sinogram(&path, true).unwrap();
        assert_eq!(transposed.dim(), (3, 2));
        assert_eq!(transposed[[2, 1]], 255.0);
    }

    #[test]
    fn sidecar_survives_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sinog.json");
        let sidecar = SinogramSidecar {
            angles: AngleSequence::evenly_spaced(180),
            rows: 180,
            cols: 64,
            source_size: 64,
        };
        sidecar.write(&path).unwrap();
        let parsed: SinogramSidecar =
            serde_json::from_reader(File::open(&path).unwrap()).unwrap();
        assert_eq!(parsed, sidecar);
    }
}
