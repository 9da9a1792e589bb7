//! Detection entry points.

use log::{debug, warn};

use super::boundary::{BoundaryLocator, ScanStop};
use super::config::DetectionConfig;
use super::derivative::DerivativeTrace;
use super::finalize::finalize;
use super::noise::NoiseModel;
use super::profile::ChromatogramProfile;
use crate::data::{Chromatogram, ChromatogramError, DetectedPeak, Sample};

/// Peak detector holding the tunables of a run.
#[derive(Debug, Clone, Default)]
pub struct PeakDetector {
    config: DetectionConfig,
}

impl PeakDetector {
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    /// Default tunables with the two entry-point thresholds set.
    pub fn with_thresholds(min_datapoints: usize, min_amplitude: f64) -> Self {
        Self::new(DetectionConfig::with_thresholds(min_datapoints, min_amplitude))
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Detect peaks in `samples`, which must be ordered by acquisition.
    ///
    /// Input is not validated: a trace shorter than the scan margins yields
    /// no peaks, other contract violations give unspecified peaks. Use
    /// [`PeakDetector::detect_chromatogram`] for checked input.
    pub fn detect(&self, samples: &[Sample]) -> Vec<DetectedPeak> {
        let config = &self.config;
        if samples.len() < config.min_trace_len() {
            warn!(
                "chromatogram has {} samples, at least {} are required; no peaks detected",
                samples.len(),
                config.min_trace_len()
            );
            return Vec::new();
        }

        let profile = ChromatogramProfile::build(samples, config);
        let derivatives = DerivativeTrace::from_signal(profile.smoothed.view());
        let noise = NoiseModel::estimate(profile.smoothed.view(), &derivatives, config);

        debug!(
            "profile: n={} max={:.3} baseline_median={:.3} high_baseline={} noise={:.3}",
            samples.len(),
            profile.max_intensity,
            profile.baseline_median,
            profile.is_high_baseline,
            profile.noise
        );
        debug!(
            "noise model: amplitude={:.3e} slope={:.3e} peaktop={:.3e}",
            noise.amplitude, noise.slope, noise.peaktop
        );

        let locator = BoundaryLocator::new(samples, &profile, &derivatives, &noise, config);
        let (peaks, stop) = locator.scan_until_stop();
        let peaks = finalize(peaks);

        if stop == ScanStop::Completed {
            debug!("detected {} peaks", peaks.len());
        } else {
            debug!("detected {} peaks before the scan stopped: {:?}", peaks.len(), stop);
        }
        peaks
    }

    /// Validate `chromatogram` and detect its peaks.
    pub fn detect_chromatogram(
        &self,
        chromatogram: &Chromatogram,
    ) -> Result<Vec<DetectedPeak>, ChromatogramError> {
        chromatogram.validate_for(self.config.scan_margin())?;
        debug!("detecting peaks in '{}'", chromatogram.id);
        Ok(self.detect(chromatogram.samples()))
    }
}

/// Detect peaks with default tunables and the given thresholds.
pub fn detect_peaks(samples: &[Sample], min_datapoints: usize, min_amplitude: f64) -> Vec<DetectedPeak> {
    PeakDetector::with_thresholds(min_datapoints, min_amplitude).detect(samples)
}
