//! Peak detection over a single chromatogram trace.
//!
//! A run goes through these steps:
//!
//! 1. [`profile`]: smoothing, floating baseline and global noise floor.
//! 2. [`derivative`]: first and second derivatives of the smoothed trace.
//! 3. [`noise`]: amplitude, slope and peak-top noise scalars.
//! 4. [`boundary`]: left-to-right boundary scan with curation and height checks.
//! 5. [`shape`]: descriptors of each accepted run.
//! 6. [`finalize`](mod@finalize): amplitude rank and score.

pub mod boundary;
pub mod config;
pub mod derivative;
pub mod detector;
pub mod finalize;
pub mod noise;
pub mod profile;
pub mod shape;

#[cfg(test)]
pub(crate) mod synthetic;

pub use config::DetectionConfig;
pub use detector::{detect_peaks, PeakDetector};
