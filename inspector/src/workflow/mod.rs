pub mod config;
pub mod runner;

pub use config::{OutputNames, WorkflowConfig};
pub use runner::{Runner, WorkflowResult};
