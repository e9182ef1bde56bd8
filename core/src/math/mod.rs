pub mod fft;
pub mod interp;
pub mod matrix;
pub mod stats;
pub mod window;

pub use fft::FftHelper;
pub use interp::{rotate, rotate_into, Interpolation};
pub use matrix::MatrixHelper;
pub use stats::StatsHelper;
pub use window::{taper, Taper};
