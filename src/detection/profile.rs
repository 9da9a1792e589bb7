//! Global chromatogram properties: smoothed traces, baseline and noise floor.

use ndarray::{s, Array1, ArrayView1, Zip};

use super::config::DetectionConfig;
use crate::data::Sample;

/// Whole-trace properties computed once per detection run.
#[derive(Clone, Debug)]
pub struct ChromatogramProfile {
    /// Lightly smoothed signal trace used by the scan.
    pub smoothed: Array1<f64>,
    /// Heavily smoothed trace used as a floating baseline.
    pub baseline: Array1<f64>,
    /// Smoothed signal minus baseline, clamped at zero.
    pub baseline_corrected: Array1<f64>,
    pub max_intensity: f64,
    pub min_intensity: f64,
    pub baseline_median: f64,
    /// Baseline median sits above half of the intensity range.
    pub is_high_baseline: bool,
    /// Global noise floor.
    pub noise: f64,
}

impl ChromatogramProfile {
    /// Profile the raw intensities of `samples`.
    pub fn build(samples: &[Sample], config: &DetectionConfig) -> Self {
        let raw: Array1<f64> = samples.iter().map(|s| s.intensity).collect();

        let smoothed = linear_weighted_moving_average(raw.view(), config.smoothing_half_window);
        let baseline = simple_moving_average(raw.view(), config.baseline_half_window);
        let baseline_corrected = Zip::from(&smoothed)
            .and(&baseline)
            .map_collect(|&signal, &base| (signal - base).max(0.0));

        let (min_intensity, max_intensity) = raw
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });

        let baseline_median = median(&mut baseline.to_vec()).unwrap_or(0.0);
        let is_high_baseline = baseline_median > (max_intensity - min_intensity) * 0.5;
        let noise = estimate_global_noise(baseline_corrected.view(), config);

        Self {
            smoothed,
            baseline,
            baseline_corrected,
            max_intensity,
            min_intensity,
            baseline_median,
            is_high_baseline,
            noise,
        }
    }
}

/// Linear-weighted moving average. Point `j` of the window around `i`
/// weighs `half_window + 1 - |i - j|`; windows are truncated at the ends.
pub fn linear_weighted_moving_average(raw: ArrayView1<f64>, half_window: usize) -> Array1<f64> {
    let len = raw.len();
    Array1::from_shape_fn(len, |i| {
        let lo = i.saturating_sub(half_window);
        let hi = i.saturating_add(half_window).min(len - 1);
        let (sum, weights) = (lo..=hi).fold((0.0, 0.0), |(sum, weights), j| {
            let weight = (half_window - i.abs_diff(j)) as f64 + 1.0;
            (sum + weight * raw[j], weights + weight)
        });
        sum / weights
    })
}

/// Simple moving average with windows truncated at the ends.
pub fn simple_moving_average(raw: ArrayView1<f64>, half_window: usize) -> Array1<f64> {
    let len = raw.len();
    Array1::from_shape_fn(len, |i| {
        let lo = i.saturating_sub(half_window);
        let hi = i.saturating_add(half_window).min(len - 1);
        raw.slice(s![lo..=hi]).mean().unwrap_or(0.0)
    })
}

/// Noise floor from the spans of fixed-size bins of the baseline-corrected
/// trace. Only full bins with a non-zero span count.
pub fn estimate_global_noise(corrected: ArrayView1<f64>, config: &DetectionConfig) -> f64 {
    let mut spans: Vec<f64> = corrected
        .exact_chunks(config.noise_bin_size.max(1))
        .into_iter()
        .map(|bin| {
            let (lo, hi) = bin
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                });
            hi - lo
        })
        .filter(|&span| span > 0.0)
        .collect();

    if spans.len() < config.min_noise_bins {
        return config.fallback_noise;
    }

    median(&mut spans).map_or(config.fallback_noise, |m| m * config.noise_factor)
}

/// Median of `values`, averaging the two middle values for even lengths.
/// Reorders `values`.
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}
