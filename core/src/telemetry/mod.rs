pub mod log;
pub mod metrics;

pub use self::log::LogObserver;
pub use metrics::MetricsRecorder;
