use anyhow::Context;
use fbpcore::math::{Interpolation, Taper};
use fbpcore::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File names of the three reconstructions, relative to the output directory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputNames {
    pub unfiltered: String,
    pub filtered: String,
    pub windowed: String,
}

impl Default for OutputNames {
    fn default() -> Self {
        Self {
            unfiltered: "reconstructed_no_filter.png".into(),
            filtered: "reconstructed_with_filter.png".into(),
            windowed: "reconstructed_with_hamming.png".into(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub outputs: OutputNames,
    pub interpolation: Interpolation,
    pub taper: Taper,
    pub angles_along_columns: bool,
    pub snapshot_dir: Option<PathBuf>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("sinog.png"),
            output_dir: PathBuf::from("."),
            outputs: OutputNames::default(),
            interpolation: Interpolation::default(),
            taper: Taper::default(),
            angles_along_columns: false,
            snapshot_dir: None,
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(
        input: PathBuf,
        output_dir: PathBuf,
        taper: Taper,
        interpolation: Interpolation,
        snapshot_dir: Option<PathBuf>,
        angles_along_columns: bool,
    ) -> Self {
        Self {
            input,
            output_dir,
            interpolation,
            taper,
            angles_along_columns,
            snapshot_dir,
            ..Default::default()
        }
    }

    pub fn to_pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            interpolation: self.interpolation,
            taper: self.taper,
        }
    }

    pub fn output_paths(&self) -> [PathBuf; 3] {
        [
            self.output_dir.join(&self.outputs.unfiltered),
            self.output_dir.join(&self.outputs.filtered),
            self.output_dir.join(&self.outputs.windowed),
        ]
    }
}
