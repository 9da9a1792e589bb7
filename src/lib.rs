//! Chrompeak - chromatographic peak detection.
//!
//! This crate detects peaks in a single chromatogram trace (intensity over
//! retention time) and describes each of them with:
//!
//! - Left edge, apex and right edge (scan, time and intensity)
//! - Shape descriptors: symmetry, base-peak ratio, ideal slope, Gaussian
//!   similarity, sharpness and a combined purity score
//! - Areas above zero and above the edge-to-edge baseline
//! - Amplitude rank and score relative to the most intense peak
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │     FFI Layer (chrompeak.h)         │
//! │  C-compatible functions & types     │
//! └─────────────────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────┐
//! │           PeakDetector              │
//! │  ┌───────────┐  ┌───────────────┐  │
//! │  │  Profile  │  │  Derivatives  │  │
//! │  │ (baseline)│  │  + Noise      │  │
//! │  └───────────┘  └───────────────┘  │
//! │  ┌───────────┐  ┌───────────────┐  │
//! │  │ Boundary  │  │ Shape, Rank   │  │
//! │  │   scan    │  │               │  │
//! │  └───────────┘  └───────────────┘  │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use chrompeak::{detect_peaks, Sample};
//!
//! let samples: Vec<Sample> = (0..201)
//!     .map(|i| {
//!         let x = (i as f64 - 100.0) / 6.0;
//!         Sample::new(i, i as f64 * 0.01, 10000.0 * (-0.5 * x * x).exp(), 301.14)
//!     })
//!     .collect();
//!
//! let peaks = detect_peaks(&samples, 5, 0.0);
//! assert_eq!(peaks.len(), 1);
//! assert_eq!(peaks[0].scan_at_peak_top, 100);
//! ```
//!
//! # FFI Usage
//!
//! ```c
//! CPeakArray peaks;
//! if (chrom_detect_peaks(samples, len, 5, 0.0, &peaks) == ChromStatus_Ok) {
//!     for (size_t i = 0; i < peaks.len; i++) {
//!         printf("%zu %f\n", peaks.data[i].scan_at_peak_top, peaks.data[i].purity_value);
//!     }
//!     chrom_peaks_free(&peaks);
//! }
//! ```

pub mod data;
pub mod detection;
pub mod ffi;

// Re-export commonly used items
pub use data::{Chromatogram, ChromatogramError, DetectedPeak, Sample};
pub use detection::{detect_peaks, DetectionConfig, PeakDetector};

// Re-export FFI types for cbindgen
pub use ffi::detect::*;
pub use ffi::types::*;
