//! Peak-shape descriptors of an accepted run of samples.

use std::f64::consts::{LN_2, PI};

use crate::data::Sample;

/// Fewest samples a run needs for its shape to be scored.
pub const MIN_SHAPE_POINTS: usize = 4;

/// Fraction of the peak height used for the symmetry reference points.
const FIVE_PERCENT: f64 = 0.05;

/// Shape descriptors of a single peak.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeakShape {
    pub symmetry: f64,
    pub base_peak: f64,
    pub ideal_slope: f64,
    pub gaussian_similarity: f64,
    pub sharpness: f64,
    pub purity: f64,
    pub area_above_zero: f64,
    pub area_above_baseline: f64,
}

/// What one walk from the apex towards an edge observed.
#[derive(Debug)]
struct SideWalk {
    half_height: usize,
    five_percent: usize,
    sharpness: f64,
    /// Intensity climbed towards the apex.
    rising: f64,
    /// Intensity lost towards the apex.
    falling: f64,
}

impl SideWalk {
    /// Walk `positions` (apex first) measuring heights above `floor`.
    fn walk(run: &[Sample], apex: usize, floor: f64, positions: impl Iterator<Item = usize>) -> Self {
        let top = run[apex].intensity;
        let height = top - floor;
        let root_top = top.sqrt();

        let mut walk = Self {
            half_height: apex,
            five_percent: apex,
            sharpness: f64::NEG_INFINITY,
            rising: 0.0,
            falling: 0.0,
        };
        let mut half_diff = f64::MAX;
        let mut five_diff = f64::MAX;
        let mut previous = apex;

        for position in positions {
            let above = run[position].intensity - floor;

            let diff = (height * 0.5 - above).abs();
            if diff < half_diff {
                half_diff = diff;
                walk.half_height = position;
            }
            let diff = (height * FIVE_PERCENT - above).abs();
            if diff < five_diff {
                five_diff = diff;
                walk.five_percent = position;
            }

            if position == apex {
                continue;
            }

            let distance = apex.abs_diff(position) as f64;
            walk.sharpness = walk
                .sharpness
                .max((top - run[position].intensity) / distance / root_top);

            let step = run[previous].intensity - run[position].intensity;
            if step >= 0.0 {
                walk.rising += step;
            } else {
                walk.falling -= step;
            }
            previous = position;
        }

        walk
    }
}

/// Score the run `run` whose most intense sample is `run[apex]`.
///
/// Returns `None` when the run is too short or when the apex does not rise
/// above both edges.
pub fn evaluate(run: &[Sample], apex: usize, area_time_scale: f64) -> Option<PeakShape> {
    if run.len() < MIN_SHAPE_POINTS || apex >= run.len() {
        return None;
    }

    let last = run.len() - 1;
    let top = run[apex].intensity;
    let left = run[0].intensity;
    let right = run[last].intensity;
    if top <= left || top <= right {
        return None;
    }

    // The lower edge is the zero reference for heights and areas.
    let left_is_lower = left <= right;
    let floor = if left_is_lower { left } else { right };
    let height = top - floor;

    let left_walk = SideWalk::walk(run, apex, floor, (0..=apex).rev());
    let right_walk = SideWalk::walk(run, apex, floor, apex..run.len());

    let base_peak = if left_is_lower {
        (top - right).abs() / height
    } else {
        (top - left).abs() / height
    };

    let apex_time = run[apex].time;
    let left_span = (apex_time - run[left_walk.five_percent].time).abs();
    let right_span = (run[right_walk.five_percent].time - apex_time).abs();
    let symmetry = ratio(left_span, right_span);

    let hwhm = (run[right_walk.half_height].time - run[left_walk.half_height].time).abs() / 2.0;
    let sigma = hwhm / (2.0 * LN_2).sqrt();
    let gaussian_area = height * sigma * (2.0 * PI).sqrt() / 2.0;

    let mut area_above_zero = 0.0;
    let mut left_area = 0.0;
    for (position, pair) in run.windows(2).enumerate() {
        let segment = (pair[0].intensity + pair[1].intensity) * (pair[1].time - pair[0].time) * 0.5;
        area_above_zero += segment;
        if position < apex {
            left_area += segment;
        }
    }
    let mut right_area = area_above_zero - left_area;
    let area_above_baseline = area_above_zero - (left + right) * (run[last].time - run[0].time) / 2.0;

    left_area -= floor * (apex_time - run[0].time);
    right_area -= floor * (run[last].time - apex_time);

    let gaussian_similarity =
        (area_ratio(gaussian_area, left_area) + area_ratio(gaussian_area, right_area)) / 2.0;

    let rising = left_walk.rising + right_walk.rising;
    let falling = left_walk.falling + right_walk.falling;
    let ideal_slope = if rising > 0.0 {
        ((rising - falling) / rising).max(0.0)
    } else {
        0.0
    };

    let purity =
        ((gaussian_similarity + 1.2 * base_peak + 0.8 * symmetry + ideal_slope) / 4.0).clamp(0.0, 1.0);

    Some(PeakShape {
        symmetry,
        base_peak,
        ideal_slope,
        gaussian_similarity,
        sharpness: (left_walk.sharpness + right_walk.sharpness) / 2.0,
        purity,
        area_above_zero: area_above_zero * area_time_scale,
        area_above_baseline: area_above_baseline * area_time_scale,
    })
}

/// Smaller over larger of two non-negative values; 0 when both are zero.
fn ratio(a: f64, b: f64) -> f64 {
    let larger = a.max(b);
    if larger > 0.0 {
        a.min(b) / larger
    } else {
        0.0
    }
}

/// Agreement of a modeled and a measured area; 0 unless both are positive.
fn area_ratio(model: f64, real: f64) -> f64 {
    if model > 0.0 && real > 0.0 {
        model.min(real) / model.max(real)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_from(intensities: &[f64], dt: f64) -> Vec<Sample> {
        intensities
            .iter()
            .enumerate()
            .map(|(i, &v)| Sample::new(i, i as f64 * dt, v, 500.0))
            .collect()
    }

    #[test]
    fn test_triangle() {
        let run = run_from(&[0.0, 10.0, 20.0, 10.0, 0.0], 1.0);
        let shape = evaluate(&run, 2, 60.0).unwrap();

        assert_eq!(shape.area_above_zero, 40.0 * 60.0);
        assert_eq!(shape.area_above_baseline, 40.0 * 60.0);
        assert_eq!(shape.base_peak, 1.0);
        assert_eq!(shape.symmetry, 1.0);
        assert_eq!(shape.ideal_slope, 1.0);
        assert!((shape.sharpness - 5.0f64.sqrt()).abs() < 1e-12);

        // HWHM = 1, left/right real area = 20
        let sigma = 1.0 / (2.0 * LN_2).sqrt();
        let modeled = 20.0 * sigma * (2.0 * PI).sqrt() / 2.0;
        assert!((shape.gaussian_similarity - 20.0 / modeled).abs() < 1e-12);
        assert!(shape.purity > 0.95 && shape.purity <= 1.0);
    }

    #[test]
    fn test_gaussian_run() {
        let intensities: Vec<f64> = (0..61)
            .map(|i| {
                let x = (i as f64 - 30.0) / 6.0;
                5000.0 * (-0.5 * x * x).exp()
            })
            .collect();
        let run = run_from(&intensities, 0.01);
        let shape = evaluate(&run, 30, 60.0).unwrap();

        assert!(shape.gaussian_similarity > 0.95, "{}", shape.gaussian_similarity);
        assert!(shape.symmetry > 0.99);
        assert!((shape.base_peak - 1.0).abs() < 1e-9);
        assert_eq!(shape.ideal_slope, 1.0);
        assert!(shape.purity > 0.99);
        assert!(shape.area_above_zero > shape.area_above_baseline);
    }

    #[test]
    fn test_tailing_peak() {
        let run = run_from(&[0.0, 5.0, 10.0, 20.0, 15.0, 10.0, 8.0, 6.0, 4.0, 2.0, 0.0], 1.0);
        let shape = evaluate(&run, 3, 60.0).unwrap();

        assert!((shape.symmetry - 0.5).abs() < 1e-12);
        assert!(shape.purity < 1.0);
    }

    #[test]
    fn test_reversal_lowers_ideal_slope() {
        let run = run_from(&[0.0, 10.0, 5.0, 20.0, 10.0, 0.0], 1.0);
        let shape = evaluate(&run, 3, 60.0).unwrap();

        assert!((shape.ideal_slope - 40.0 / 45.0).abs() < 1e-12);
    }

    #[test]
    fn test_raised_edge_is_reference() {
        // Right edge is lower, so it is the zero reference.
        let run = run_from(&[40.0, 60.0, 100.0, 60.0, 20.0], 1.0);
        let shape = evaluate(&run, 2, 1.0).unwrap();

        assert!((shape.base_peak - 60.0 / 80.0).abs() < 1e-12);
        assert!((shape.area_above_baseline - (250.0 - 120.0)).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_short_run() {
        let run = run_from(&[0.0, 10.0, 0.0], 1.0);
        assert!(evaluate(&run, 1, 60.0).is_none());
    }

    #[test]
    fn test_rejects_ramp() {
        let run = run_from(&[1.0, 2.0, 3.0, 4.0, 5.0], 1.0);
        assert!(evaluate(&run, 4, 60.0).is_none());
    }
}
