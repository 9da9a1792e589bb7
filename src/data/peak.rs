//! Detected peak record.

use serde::{Deserialize, Serialize};

/// A peak detected in a chromatogram together with its shape descriptors.
///
/// `amplitude_order_value` and `amplitude_score_value` are only meaningful
/// once every peak of the run is known; they are filled in by
/// [`finalize`](crate::detection::finalize::finalize).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectedPeak {
    /// Sequential id in detection order.
    pub peak_id: usize,

    /// 1-based rank by apex intensity (1 = most intense).
    pub amplitude_order_value: usize,

    /// Apex intensity relative to the most intense peak of the run.
    pub amplitude_score_value: f64,

    pub scan_at_left_edge: usize,
    pub scan_at_peak_top: usize,
    pub scan_at_right_edge: usize,

    pub intensity_at_left_edge: f64,
    pub intensity_at_peak_top: f64,
    pub intensity_at_right_edge: f64,

    pub rt_at_left_edge: f64,
    pub rt_at_peak_top: f64,
    pub rt_at_right_edge: f64,

    /// Mass of the apex sample.
    pub mass_at_peak_top: f64,

    pub symmetry_value: f64,
    pub base_peak_value: f64,
    pub ideal_slope_value: f64,
    pub gaussian_similarity_value: f64,
    pub sharpness_value: f64,
    pub purity_value: f64,

    /// Trapezoidal area above zero, time-scaled.
    pub area_above_zero: f64,

    /// Trapezoidal area above the straight edge-to-edge baseline, time-scaled.
    pub area_above_baseline: f64,

    pub estimated_noise: f64,
    pub signal_to_noise: f64,
}

impl DetectedPeak {
    /// Height of the apex above the higher of the two edges.
    pub fn min_edge_height(&self) -> f64 {
        (self.intensity_at_peak_top - self.intensity_at_left_edge)
            .min(self.intensity_at_peak_top - self.intensity_at_right_edge)
    }

    /// Height of the apex above the lower of the two edges.
    pub fn max_edge_height(&self) -> f64 {
        (self.intensity_at_peak_top - self.intensity_at_left_edge)
            .max(self.intensity_at_peak_top - self.intensity_at_right_edge)
    }

    /// Retention-time span between the two edges.
    pub fn width(&self) -> f64 {
        self.rt_at_right_edge - self.rt_at_left_edge
    }
}
