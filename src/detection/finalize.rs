//! Amplitude ranking of the accepted peaks.

use crate::data::DetectedPeak;

/// Rank peaks by apex intensity and score them against the most intense one.
///
/// Ties keep detection order. The returned list is ordered by `peak_id`.
pub fn finalize(mut peaks: Vec<DetectedPeak>) -> Vec<DetectedPeak> {
    if peaks.is_empty() {
        return peaks;
    }

    peaks.sort_by(|a, b| b.intensity_at_peak_top.total_cmp(&a.intensity_at_peak_top));

    let max_intensity = peaks[0].intensity_at_peak_top;
    for (rank, peak) in peaks.iter_mut().enumerate() {
        peak.amplitude_order_value = rank + 1;
        peak.amplitude_score_value = if max_intensity > 0.0 {
            peak.intensity_at_peak_top / max_intensity
        } else {
            0.0
        };
    }

    peaks.sort_by_key(|peak| peak.peak_id);
    peaks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(peak_id: usize, top: f64) -> DetectedPeak {
        DetectedPeak {
            peak_id,
            amplitude_order_value: 0,
            amplitude_score_value: 0.0,
            scan_at_left_edge: peak_id * 10,
            scan_at_peak_top: peak_id * 10 + 4,
            scan_at_right_edge: peak_id * 10 + 8,
            intensity_at_left_edge: 0.0,
            intensity_at_peak_top: top,
            intensity_at_right_edge: 0.0,
            rt_at_left_edge: 0.0,
            rt_at_peak_top: 0.0,
            rt_at_right_edge: 0.0,
            mass_at_peak_top: 0.0,
            symmetry_value: 0.0,
            base_peak_value: 0.0,
            ideal_slope_value: 0.0,
            gaussian_similarity_value: 0.0,
            sharpness_value: 0.0,
            purity_value: 0.0,
            area_above_zero: 0.0,
            area_above_baseline: 0.0,
            estimated_noise: 1.0,
            signal_to_noise: 0.0,
        }
    }

    #[test]
    fn test_empty() {
        assert!(finalize(Vec::new()).is_empty());
    }

    #[test]
    fn test_rank_and_score() {
        let peaks = finalize(vec![peak(0, 200.0), peak(1, 800.0), peak(2, 400.0)]);

        let ids: Vec<usize> = peaks.iter().map(|p| p.peak_id).collect();
        assert_eq!(ids, vec![0, 1, 2]);

        let ranks: Vec<usize> = peaks.iter().map(|p| p.amplitude_order_value).collect();
        assert_eq!(ranks, vec![3, 1, 2]);

        let scores: Vec<f64> = peaks.iter().map(|p| p.amplitude_score_value).collect();
        assert_eq!(scores, vec![0.25, 1.0, 0.5]);
    }

    #[test]
    fn test_ties_keep_detection_order() {
        let peaks = finalize(vec![peak(0, 500.0), peak(1, 500.0), peak(2, 100.0)]);

        assert_eq!(peaks[0].amplitude_order_value, 1);
        assert_eq!(peaks[1].amplitude_order_value, 2);
        assert_eq!(peaks[2].amplitude_order_value, 3);
        assert_eq!(peaks[1].amplitude_score_value, 1.0);
    }
}
