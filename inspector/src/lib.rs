//! File I/O, phantom synthesis and workflow orchestration around `fbpcore`.

pub mod display;
pub mod generator;
pub mod io;
pub mod shutdown;
pub mod workflow;
