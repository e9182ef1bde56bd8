//! Filtered back-projection core for sinogram-based defect inspection.
//!
//! The pipeline runs ramp filtering, rotate-and-accumulate back-projection and
//! spatial windowing over in-memory arrays; file I/O and display live with the
//! caller, which can watch every intermediate through [`StageObserver`].

pub mod geometry;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use geometry::AngleSequence;
pub use prelude::{
    CancelFlag, Image, ProcessingStage, ReconError, ReconResult, Sinogram, StageContext,
    StageKind, StageObserver,
};
pub use processing::{
    filter, normalize, project, reconstruct, window, NormalizedSet, Pipeline, PipelineConfig,
    Reconstruction,
};
