//! C-compatible type definitions for FFI.

use crate::data::{ChromatogramError, DetectedPeak};
use crate::detection::DetectionConfig;

/// Result status codes for FFI functions.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromStatus {
    /// Operation succeeded.
    Ok = 0,
    /// Null pointer was passed.
    NullPointer = 1,
    /// Invalid argument.
    InvalidArgument = 2,
    /// Chromatogram is shorter than the scan margins.
    TooShort = 3,
    /// Samples are not ordered by acquisition.
    NonMonotonic = 4,
    /// A time or intensity is NaN or infinite.
    NonFinite = 5,
}

impl From<&ChromatogramError> for ChromStatus {
    fn from(err: &ChromatogramError) -> Self {
        match err {
            ChromatogramError::LengthMismatch { .. } => ChromStatus::InvalidArgument,
            ChromatogramError::TooShort { .. } => ChromStatus::TooShort,
            ChromatogramError::NonMonotonicTime { .. } => ChromStatus::NonMonotonic,
            ChromatogramError::NonFinite { .. } => ChromStatus::NonFinite,
        }
    }
}

/// C mirror of [`DetectionConfig`].
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CDetectionConfig {
    pub min_datapoints: usize,
    pub min_amplitude: f64,
    pub smoothing_half_window: usize,
    pub baseline_half_window: usize,
    pub noise_bin_size: usize,
    pub min_noise_bins: usize,
    pub fallback_noise: f64,
    pub noise_factor: f64,
    pub noise_candidate_fraction: f64,
    pub noise_epsilon: f64,
    pub slope_noise_fold: f64,
    pub amplitude_noise_fold: f64,
    pub edge_search_points: usize,
    pub apex_runout_points: usize,
    pub average_peak_width: usize,
    pub continuation_window: usize,
    pub loop_guard_tail: usize,
    pub area_time_scale: f64,
    pub min_scan_margin: usize,
}

impl From<&DetectionConfig> for CDetectionConfig {
    fn from(config: &DetectionConfig) -> Self {
        Self {
            min_datapoints: config.min_datapoints,
            min_amplitude: config.min_amplitude,
            smoothing_half_window: config.smoothing_half_window,
            baseline_half_window: config.baseline_half_window,
            noise_bin_size: config.noise_bin_size,
            min_noise_bins: config.min_noise_bins,
            fallback_noise: config.fallback_noise,
            noise_factor: config.noise_factor,
            noise_candidate_fraction: config.noise_candidate_fraction,
            noise_epsilon: config.noise_epsilon,
            slope_noise_fold: config.slope_noise_fold,
            amplitude_noise_fold: config.amplitude_noise_fold,
            edge_search_points: config.edge_search_points,
            apex_runout_points: config.apex_runout_points,
            average_peak_width: config.average_peak_width,
            continuation_window: config.continuation_window,
            loop_guard_tail: config.loop_guard_tail,
            area_time_scale: config.area_time_scale,
            min_scan_margin: config.min_scan_margin,
        }
    }
}

/// Largest window or count accepted from C. No slice holds more elements.
pub const MAX_WINDOW: usize = isize::MAX as usize;

impl CDetectionConfig {
    /// Convert to a [`DetectionConfig`], rejecting values the scan cannot use.
    pub fn to_config(&self) -> Result<DetectionConfig, ChromStatus> {
        let windows = [
            self.min_datapoints,
            self.smoothing_half_window,
            self.baseline_half_window,
            self.noise_bin_size,
            self.min_noise_bins,
            self.edge_search_points,
            self.apex_runout_points,
            self.average_peak_width,
            self.continuation_window,
            self.loop_guard_tail,
            self.min_scan_margin,
        ];
        if windows.iter().any(|&w| w > MAX_WINDOW) {
            return Err(ChromStatus::InvalidArgument);
        }

        let finite = [
            self.min_amplitude,
            self.fallback_noise,
            self.noise_factor,
            self.noise_candidate_fraction,
            self.noise_epsilon,
            self.slope_noise_fold,
            self.amplitude_noise_fold,
            self.area_time_scale,
        ]
        .iter()
        .all(|v| v.is_finite());

        if !finite || self.noise_bin_size == 0 || self.noise_epsilon <= 0.0 {
            return Err(ChromStatus::InvalidArgument);
        }

        Ok(DetectionConfig {
            min_datapoints: self.min_datapoints,
            min_amplitude: self.min_amplitude,
            smoothing_half_window: self.smoothing_half_window,
            baseline_half_window: self.baseline_half_window,
            noise_bin_size: self.noise_bin_size,
            min_noise_bins: self.min_noise_bins,
            fallback_noise: self.fallback_noise,
            noise_factor: self.noise_factor,
            noise_candidate_fraction: self.noise_candidate_fraction,
            noise_epsilon: self.noise_epsilon,
            slope_noise_fold: self.slope_noise_fold,
            amplitude_noise_fold: self.amplitude_noise_fold,
            edge_search_points: self.edge_search_points,
            apex_runout_points: self.apex_runout_points,
            average_peak_width: self.average_peak_width,
            continuation_window: self.continuation_window,
            loop_guard_tail: self.loop_guard_tail,
            area_time_scale: self.area_time_scale,
            min_scan_margin: self.min_scan_margin,
        })
    }
}

/// C-compatible detected peak.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CDetectedPeak {
    pub peak_id: usize,
    pub amplitude_order_value: usize,
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
    pub mass_at_peak_top: f64,
    pub symmetry_value: f64,
    pub base_peak_value: f64,
    pub ideal_slope_value: f64,
    pub gaussian_similarity_value: f64,
    pub sharpness_value: f64,
    pub purity_value: f64,
    pub area_above_zero: f64,
    pub area_above_baseline: f64,
    pub estimated_noise: f64,
    pub signal_to_noise: f64,
}

impl From<&DetectedPeak> for CDetectedPeak {
    fn from(p: &DetectedPeak) -> Self {
        Self {
            peak_id: p.peak_id,
            amplitude_order_value: p.amplitude_order_value,
            amplitude_score_value: p.amplitude_score_value,
            scan_at_left_edge: p.scan_at_left_edge,
            scan_at_peak_top: p.scan_at_peak_top,
            scan_at_right_edge: p.scan_at_right_edge,
            intensity_at_left_edge: p.intensity_at_left_edge,
            intensity_at_peak_top: p.intensity_at_peak_top,
            intensity_at_right_edge: p.intensity_at_right_edge,
            rt_at_left_edge: p.rt_at_left_edge,
            rt_at_peak_top: p.rt_at_peak_top,
            rt_at_right_edge: p.rt_at_right_edge,
            mass_at_peak_top: p.mass_at_peak_top,
            symmetry_value: p.symmetry_value,
            base_peak_value: p.base_peak_value,
            ideal_slope_value: p.ideal_slope_value,
            gaussian_similarity_value: p.gaussian_similarity_value,
            sharpness_value: p.sharpness_value,
            purity_value: p.purity_value,
            area_above_zero: p.area_above_zero,
            area_above_baseline: p.area_above_baseline,
            estimated_noise: p.estimated_noise,
            signal_to_noise: p.signal_to_noise,
        }
    }
}

/// C-compatible peak array result. Release with `chrom_peaks_free`.
#[repr(C)]
pub struct CPeakArray {
    pub data: *mut CDetectedPeak,
    pub len: usize,
    pub capacity: usize,
}

impl CPeakArray {
    /// Create from detected peaks.
    pub fn from_peaks(peaks: &[DetectedPeak]) -> Self {
        let mut results: Vec<CDetectedPeak> = peaks.iter().map(CDetectedPeak::from).collect();

        let len = results.len();
        let capacity = results.capacity();
        let data = results.as_mut_ptr();
        std::mem::forget(results);

        Self { data, len, capacity }
    }

    /// An array owning nothing.
    pub fn empty() -> Self {
        Self {
            data: std::ptr::null_mut(),
            len: 0,
            capacity: 0,
        }
    }
}
