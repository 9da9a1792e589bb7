//! Chromatogram samples and the validated chromatogram container.

use serde::{Deserialize, Serialize};

/// A single acquisition point of a chromatogram.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Acquisition (scan) index.
    pub index: usize,

    /// Retention time.
    pub time: f64,

    /// Measured intensity.
    pub intensity: f64,

    /// Mass (m/z) the trace was extracted at.
    pub mass: f64,
}

impl Sample {
    /// Create a new sample.
    pub fn new(index: usize, time: f64, intensity: f64, mass: f64) -> Self {
        Self {
            index,
            time,
            intensity,
            mass,
        }
    }
}

/// An ordered chromatogram trace.
///
/// Construction only checks that the columns line up. The ordering and
/// length requirements of peak detection are checked by [`Chromatogram::validate_for`].
#[derive(Clone, Debug)]
pub struct Chromatogram {
    /// Identifier of the trace (e.g. the extracted m/z or a file name).
    pub id: String,

    samples: Vec<Sample>,
}

impl Chromatogram {
    /// Create a chromatogram from already-built samples.
    pub fn new(id: impl Into<String>, samples: Vec<Sample>) -> Self {
        Self {
            id: id.into(),
            samples,
        }
    }

    /// Create a chromatogram from column arrays. Scan indices are assigned
    /// from the position in the arrays.
    pub fn from_columns(
        id: impl Into<String>,
        times: &[f64],
        intensities: &[f64],
        masses: &[f64],
    ) -> Result<Self, ChromatogramError> {
        let len = times.len();
        if intensities.len() != len || masses.len() != len {
            return Err(ChromatogramError::LengthMismatch {
                times: len,
                intensities: intensities.len(),
                masses: masses.len(),
            });
        }

        let samples = times
            .iter()
            .zip(intensities)
            .zip(masses)
            .enumerate()
            .map(|(index, ((&time, &intensity), &mass))| Sample::new(index, time, intensity, mass))
            .collect();

        Ok(Self::new(id, samples))
    }

    /// Get the number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the chromatogram has no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Get the samples.
    #[inline]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Get a sample at a specific position.
    #[inline]
    pub fn get(&self, position: usize) -> Option<&Sample> {
        self.samples.get(position)
    }

    /// Check that the trace can be scanned with `margin` samples on each side,
    /// that every value is finite and that time never decreases.
    pub fn validate_for(&self, margin: usize) -> Result<(), ChromatogramError> {
        let required = margin.saturating_mul(2).saturating_add(1);
        if self.samples.len() < required {
            return Err(ChromatogramError::TooShort {
                len: self.samples.len(),
                required,
            });
        }

        for (position, sample) in self.samples.iter().enumerate() {
            if !sample.time.is_finite() || !sample.intensity.is_finite() {
                return Err(ChromatogramError::NonFinite { index: position });
            }
        }

        if let Some(position) = self
            .samples
            .windows(2)
            .position(|w| w[1].time < w[0].time || w[1].index < w[0].index)
        {
            return Err(ChromatogramError::NonMonotonicTime {
                index: position + 1,
            });
        }

        Ok(())
    }
}

/// Errors raised when a chromatogram breaks the detection input contract.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChromatogramError {
    /// Column arrays have different lengths.
    #[error("column length mismatch: times={times}, intensities={intensities}, masses={masses}")]
    LengthMismatch {
        times: usize,
        intensities: usize,
        masses: usize,
    },

    /// Not enough samples for the scan margin.
    #[error("chromatogram has {len} samples, at least {required} are required")]
    TooShort { len: usize, required: usize },

    /// Samples are not ordered by acquisition.
    #[error("sample {index} is out of acquisition order")]
    NonMonotonicTime { index: usize },

    /// A time or intensity is NaN or infinite.
    #[error("sample {index} has a non-finite time or intensity")]
    NonFinite { index: usize },
}
