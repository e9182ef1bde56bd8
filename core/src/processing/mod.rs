pub mod backproject;
pub mod normalize;
pub mod pipeline;
pub mod projector;
pub mod ramp;
pub mod windowing;

pub use backproject::{reconstruct, BackProjector};
pub use normalize::normalize;
pub use pipeline::{NormalizedSet, Pipeline, PipelineConfig, Reconstruction};
pub use projector::{project, ForwardProjector};
pub use ramp::{filter, ramp_weights, RampFilter};
pub use windowing::{window, Windowing};
