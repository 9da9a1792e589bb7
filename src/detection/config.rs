//! Detection configuration.

use serde::{Deserialize, Serialize};

/// Tunables of a peak-detection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Minimum number of samples a run must span.
    pub min_datapoints: usize,
    /// Minimum apex-to-edge height.
    pub min_amplitude: f64,

    /// Half window of the linear-weighted smoothing of the signal trace.
    pub smoothing_half_window: usize,
    /// Half window of the moving average used as the floating baseline.
    pub baseline_half_window: usize,

    /// Samples per bin of the global noise estimate.
    pub noise_bin_size: usize,
    /// Bins with a non-zero span required to trust the global noise estimate.
    pub min_noise_bins: usize,
    /// Global noise used when too few bins qualify.
    pub fallback_noise: f64,
    /// Multiplier applied to the median bin span.
    pub noise_factor: f64,

    /// Fraction of a maximum below which a fluctuation counts as noise.
    pub noise_candidate_fraction: f64,
    /// Value of a noise scalar whose candidate pool is empty.
    pub noise_epsilon: f64,

    pub slope_noise_fold: f64,
    pub amplitude_noise_fold: f64,

    /// Points examined on each side when refining an edge.
    pub edge_search_points: usize,
    /// Points past the apex before the stop condition is tested.
    pub apex_runout_points: usize,
    /// Distance from the apex beyond which tails are curated.
    pub average_peak_width: usize,
    /// Scan positions past an accepted peak during which a rising trace
    /// starts a new peak without the slope test.
    pub continuation_window: usize,
    /// Distance from the trace end inside which a repeated rewind stops the scan.
    pub loop_guard_tail: usize,

    /// Scale applied to trapezoidal areas.
    pub area_time_scale: f64,

    /// Lower bound of the scan margin on each side of the trace.
    pub min_scan_margin: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_datapoints: 5,
            min_amplitude: 0.0,
            smoothing_half_window: 1,
            baseline_half_window: 20,
            noise_bin_size: 50,
            min_noise_bins: 10,
            fallback_noise: 50.0,
            noise_factor: 3.0,
            noise_candidate_fraction: 0.05,
            noise_epsilon: 1e-4,
            slope_noise_fold: 2.0,
            amplitude_noise_fold: 4.0,
            edge_search_points: 5,
            apex_runout_points: 3,
            average_peak_width: 20,
            continuation_window: 2,
            loop_guard_tail: 10,
            area_time_scale: 60.0,
            min_scan_margin: 5,
        }
    }
}

impl DetectionConfig {
    /// Default tunables with the two entry-point thresholds set.
    pub fn with_thresholds(min_datapoints: usize, min_amplitude: f64) -> Self {
        Self {
            min_datapoints,
            min_amplitude,
            ..Default::default()
        }
    }

    /// Samples skipped on each side of the trace by the scan.
    pub fn scan_margin(&self) -> usize {
        self.min_scan_margin.max(self.min_datapoints)
    }

    /// Smallest trace the scan can handle. Saturates at `usize::MAX`.
    pub fn min_trace_len(&self) -> usize {
        self.scan_margin().saturating_mul(2).saturating_add(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_margin() {
        assert_eq!(DetectionConfig::default().scan_margin(), 5);
        assert_eq!(DetectionConfig::with_thresholds(8, 0.0).scan_margin(), 8);
        assert_eq!(DetectionConfig::with_thresholds(8, 0.0).min_trace_len(), 17);
    }

    #[test]
    fn test_oversized_margin_saturates() {
        let config = DetectionConfig::with_thresholds(usize::MAX, 0.0);

        assert_eq!(config.scan_margin(), usize::MAX);
        assert_eq!(config.min_trace_len(), usize::MAX);
    }

    #[test]
    fn test_partial_deserialize() {
        let config: DetectionConfig =
            serde_json::from_str(r#"{"min_datapoints": 7, "average_peak_width": 30}"#).unwrap();

        assert_eq!(config.min_datapoints, 7);
        assert_eq!(config.average_peak_width, 30);
        assert_eq!(config.slope_noise_fold, 2.0);
        assert_eq!(config.fallback_noise, 50.0);
    }
}
