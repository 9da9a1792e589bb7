//! Chromatogram input and detected peak output.

pub mod peak;
pub mod sample;

pub use peak::DetectedPeak;
pub use sample::{Chromatogram, ChromatogramError, Sample};
