//! Boundary search: finds the edges of every peak in one left-to-right scan.
//!
//! For each scan index the locator asks whether a peak starts there. If it
//! does, the run is widened to the left, grown to the right past the apex,
//! and its right edge is corrected against the smoothed trace before the run
//! is curated, height-checked and scored.
//!
//! Runs are kept as index ranges over the sample slice; the scan index is
//! rewound when a right-edge correction trims points.

use log::{trace, warn};
use ndarray::ArrayView1;

use super::config::DetectionConfig;
use super::derivative::DerivativeTrace;
use super::noise::NoiseModel;
use super::profile::ChromatogramProfile;
use super::shape;
use crate::data::{DetectedPeak, Sample};

/// The global noise floor is divided by this to get a peak's estimated noise.
const NOISE_TO_ESTIMATED: f64 = 3.0;

/// Scan iterations allowed per sample before the scan is stopped.
const STEPS_PER_SAMPLE: usize = 8;

/// Inclusive sample range of a candidate peak.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CandidateRun {
    pub start: usize,
    pub end: usize,
}

impl CandidateRun {
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

/// Result of re-examining the grown right edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeCorrection {
    pub end: usize,
    /// Points appended because the trace kept descending.
    pub extended: usize,
    /// Points removed because the trace was already rising again.
    pub trimmed: usize,
}

/// Why a candidate run was not accepted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Rejection {
    TooFewPoints { len: usize },
    BelowNoiseFloor { height: f64 },
    BelowMinAmplitude { height: f64 },
    BelowAmplitudeNoise { height: f64 },
    UnderBaseline { edge: f64 },
    Shape,
}

/// Height thresholds a curated run has to clear.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightCriteria {
    pub noise_floor: f64,
    pub min_amplitude: f64,
    pub amplitude_noise: f64,
    /// Set on high-baseline traces: both edges must sit at or above it.
    pub baseline_floor: Option<f64>,
}

impl HeightCriteria {
    pub fn new(profile: &ChromatogramProfile, noise: &NoiseModel, config: &DetectionConfig) -> Self {
        Self {
            noise_floor: profile.noise,
            min_amplitude: config.min_amplitude,
            amplitude_noise: noise.amplitude_threshold(config),
            baseline_floor: profile.is_high_baseline.then_some(profile.baseline_median),
        }
    }

    /// The apex has to clear every threshold above each of the two edges.
    pub fn check(&self, left: f64, top: f64, right: f64) -> Result<(), Rejection> {
        let height = (top - left).min(top - right);

        if height < self.noise_floor {
            return Err(Rejection::BelowNoiseFloor { height });
        }
        if height < self.min_amplitude {
            return Err(Rejection::BelowMinAmplitude { height });
        }
        if height < self.amplitude_noise {
            return Err(Rejection::BelowAmplitudeNoise { height });
        }
        if let Some(baseline) = self.baseline_floor {
            let edge = left.min(right);
            if edge < baseline {
                return Err(Rejection::UnderBaseline { edge });
            }
        }
        Ok(())
    }
}

/// How a boundary scan ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanStop {
    /// Every scan position was visited.
    Completed,
    /// A right-edge trim rewound to the same index twice near the trace end.
    LoopGuard { index: usize },
    /// The step budget ran out.
    StepBudget { index: usize },
}

/// Rising trace right after an accepted peak may start the next one.
#[derive(Clone, Copy, Debug)]
struct Continuation {
    edge_intensity: f64,
    armed_through: usize,
}

impl Continuation {
    /// Arm continuation after a peak accepted with its right edge at `end`.
    fn after(signal: ArrayView1<f64>, end: usize, window: usize) -> Self {
        Self {
            edge_intensity: signal[end],
            armed_through: end.saturating_add(window),
        }
    }
}

/// Scans one chromatogram for peak boundaries.
pub struct BoundaryLocator<'a> {
    samples: &'a [Sample],
    signal: ArrayView1<'a, f64>,
    derivatives: &'a DerivativeTrace,
    noise: &'a NoiseModel,
    criteria: HeightCriteria,
    estimated_noise: f64,
    config: &'a DetectionConfig,
}

impl<'a> BoundaryLocator<'a> {
    pub fn new(
        samples: &'a [Sample],
        profile: &'a ChromatogramProfile,
        derivatives: &'a DerivativeTrace,
        noise: &'a NoiseModel,
        config: &'a DetectionConfig,
    ) -> Self {
        Self {
            samples,
            signal: profile.smoothed.view(),
            derivatives,
            noise,
            criteria: HeightCriteria::new(profile, noise, config),
            estimated_noise: (profile.noise / NOISE_TO_ESTIMATED).max(1.0),
            config,
        }
    }

    /// Run the scan and return accepted peaks in detection order.
    ///
    /// Amplitude rank and score are left unset.
    pub fn scan(&self) -> Vec<DetectedPeak> {
        self.scan_until_stop().0
    }

    /// Like [`BoundaryLocator::scan`], also reporting how the scan ended.
    /// Peaks accepted before an early stop are kept.
    pub fn scan_until_stop(&self) -> (Vec<DetectedPeak>, ScanStop) {
        let len = self.samples.len();
        let mut peaks = Vec::new();
        if len < self.config.min_trace_len() || self.signal.len() != len {
            return (peaks, ScanStop::Completed);
        }

        let scan_end = len - self.config.scan_margin();
        let step_budget = STEPS_PER_SAMPLE.saturating_mul(len).saturating_add(64);
        let mut steps = 0;
        let mut last_rewind: Option<usize> = None;
        let mut continuation: Option<Continuation> = None;
        let mut i = self.config.scan_margin();

        while i < scan_end {
            steps += 1;
            if steps > step_budget {
                warn!("boundary scan stopped after {} steps at index {}", steps - 1, i);
                return (peaks, ScanStop::StepBudget { index: i });
            }

            if !self.starts_peak(i, continuation) {
                i += 1;
                continue;
            }

            let start = self.extend_left(i);
            let grown = self.grow_right(i);
            let correction = self.correct_right_edge(start, grown);
            i = correction.end;

            if correction.trimmed > 0 {
                if last_rewind == Some(i) && i.saturating_add(self.config.loop_guard_tail) > len {
                    warn!("boundary scan rewound to index {} twice near the trace end, stopping", i);
                    return (peaks, ScanStop::LoopGuard { index: i });
                }
                last_rewind = Some(i);
            }

            let run = CandidateRun { start, end: i };
            match self.accept(run, peaks.len()) {
                Ok(peak) => {
                    continuation = Some(Continuation::after(
                        self.signal,
                        i,
                        self.config.continuation_window,
                    ));
                    peaks.push(peak);
                }
                Err(rejection) => {
                    trace!("rejected run {}..={}: {:?}", run.start, run.end, rejection);
                }
            }

            i += 1;
        }

        (peaks, ScanStop::Completed)
    }

    /// Slope of the trace exceeds the slope threshold at `i` and `i + 1`, or
    /// the trace keeps rising right after an accepted peak.
    fn starts_peak(&self, i: usize, continuation: Option<Continuation>) -> bool {
        let first = &self.derivatives.first;
        let threshold = self.noise.slope_threshold(self.config);
        if first[i] > threshold && first[i + 1] > threshold {
            return true;
        }

        continuation.is_some_and(|c| {
            i <= c.armed_through
                && self.signal[i] > c.edge_intensity
                && self.signal[i + 1] > self.signal[i]
                && self.signal[i + 2] > self.signal[i + 1]
        })
    }

    /// Extend the run start leftwards while the trace keeps descending.
    fn extend_left(&self, mut start: usize) -> usize {
        for _ in 0..self.config.edge_search_points {
            if start == 0 || self.signal[start] <= self.signal[start - 1] {
                break;
            }
            start -= 1;
        }
        start
    }

    /// Grow the run rightwards past the apex until the trailing flank flattens.
    fn grow_right(&self, mut i: usize) -> usize {
        let len = self.signal.len();
        let first = &self.derivatives.first;
        let second = &self.derivatives.second;
        let slope_threshold = self.noise.slope_threshold(self.config);
        let amplitude_noise = self.noise.amplitude;

        let mut apex_seen = false;
        let mut apex_point = i;

        while i + 1 < len - 1 {
            i += 1;

            let falls_here = first[i - 1] > 0.0 && first[i] < 0.0;
            let falls_next = first[i - 1] > 0.0 && first[i + 1] < 0.0;
            // The lagged sign change can move the apex point even after it was set.
            if (!apex_seen && falls_here) || (falls_next && second[i] < -self.noise.peaktop) {
                apex_seen = true;
                apex_point = i;
            }

            if apex_seen && apex_point.saturating_add(self.config.apex_runout_points) < i {
                if first[i] > -slope_threshold {
                    break;
                }
                if (self.signal[i - 2] - self.signal[i - 1]).abs() < amplitude_noise
                    && (self.signal[i - 1] - self.signal[i]).abs() < amplitude_noise
                {
                    break;
                }
            }
        }

        i
    }

    /// Move the grown right edge to where the descent really ends: append
    /// points while the trace still descends, otherwise drop trailing points
    /// that already climb into the next peak.
    fn correct_right_edge(&self, start: usize, end: usize) -> EdgeCorrection {
        let last = self.signal.len() - 1;
        let mut corrected = end;

        let mut extended = 0;
        for _ in 0..self.config.edge_search_points {
            if corrected >= last || self.signal[corrected] <= self.signal[corrected + 1] {
                break;
            }
            corrected += 1;
            extended += 1;
        }

        let mut trimmed = 0;
        if extended == 0 {
            for _ in 0..self.config.edge_search_points {
                if corrected <= start || self.signal[corrected] <= self.signal[corrected - 1] {
                    break;
                }
                corrected -= 1;
                trimmed += 1;
            }
        }

        EdgeCorrection {
            end: corrected,
            extended,
            trimmed,
        }
    }

    /// Position of the first most intense raw sample of `run`.
    fn apex_of(&self, run: CandidateRun) -> usize {
        let mut apex = run.start;
        for position in run.start..=run.end {
            if self.samples[position].intensity > self.samples[apex].intensity {
                apex = position;
            }
        }
        apex
    }

    /// Cut tails further than an average peak width from the apex where the
    /// raw trace stops descending.
    fn curate(&self, mut run: CandidateRun) -> (CandidateRun, usize) {
        let apex = self.apex_of(run);
        let width = self.config.average_peak_width;
        let intensity = |position: usize| self.samples[position].intensity;

        if apex - run.start > width {
            let mut k = apex - width;
            while k > run.start + 1 {
                if intensity(k) <= intensity(k - 1) {
                    run.start = k;
                    break;
                }
                k -= 1;
            }
        }

        if run.end - apex > width {
            // apex + width < run.end here
            let mut k = apex + width;
            while k + 1 < run.end {
                if intensity(k) <= intensity(k + 1) {
                    run.end = k;
                    break;
                }
                k += 1;
            }
        }

        (run, apex)
    }

    fn accept(&self, run: CandidateRun, peak_id: usize) -> Result<DetectedPeak, Rejection> {
        if run.len() < self.config.min_datapoints {
            return Err(Rejection::TooFewPoints { len: run.len() });
        }

        let (run, apex) = self.curate(run);
        let left = &self.samples[run.start];
        let top = &self.samples[apex];
        let right = &self.samples[run.end];

        self.criteria
            .check(left.intensity, top.intensity, right.intensity)?;

        let points = &self.samples[run.start..=run.end];
        let shape = shape::evaluate(points, apex - run.start, self.config.area_time_scale)
            .ok_or(Rejection::Shape)?;

        let mut peak = DetectedPeak {
            peak_id,
            amplitude_order_value: 0,
            amplitude_score_value: 0.0,
            scan_at_left_edge: left.index,
            scan_at_peak_top: top.index,
            scan_at_right_edge: right.index,
            intensity_at_left_edge: left.intensity,
            intensity_at_peak_top: top.intensity,
            intensity_at_right_edge: right.intensity,
            rt_at_left_edge: left.time,
            rt_at_peak_top: top.time,
            rt_at_right_edge: right.time,
            mass_at_peak_top: top.mass,
            symmetry_value: shape.symmetry,
            base_peak_value: shape.base_peak,
            ideal_slope_value: shape.ideal_slope,
            gaussian_similarity_value: shape.gaussian_similarity,
            sharpness_value: shape.sharpness,
            purity_value: shape.purity,
            area_above_zero: shape.area_above_zero,
            area_above_baseline: shape.area_above_baseline,
            estimated_noise: self.estimated_noise,
            signal_to_noise: 0.0,
        };
        peak.signal_to_noise = peak.max_edge_height() / self.estimated_noise;

        Ok(peak)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::synthetic;

    struct Fixture {
        samples: Vec<Sample>,
        profile: ChromatogramProfile,
        derivatives: DerivativeTrace,
        noise: NoiseModel,
        config: DetectionConfig,
    }

    impl Fixture {
        fn new(intensities: &[f64]) -> Self {
            let config = DetectionConfig::default();
            let samples = synthetic::samples(intensities);
            let profile = ChromatogramProfile::build(&samples, &config);
            let derivatives = DerivativeTrace::from_signal(profile.smoothed.view());
            let noise = NoiseModel::estimate(profile.smoothed.view(), &derivatives, &config);
            Self {
                samples,
                profile,
                derivatives,
                noise,
                config,
            }
        }

        fn locator(&self) -> BoundaryLocator<'_> {
            BoundaryLocator::new(
                &self.samples,
                &self.profile,
                &self.derivatives,
                &self.noise,
                &self.config,
            )
        }
    }

    fn criteria() -> HeightCriteria {
        HeightCriteria {
            noise_floor: 50.0,
            min_amplitude: 0.0,
            amplitude_noise: 40.0,
            baseline_floor: None,
        }
    }

    #[test]
    fn test_height_criteria() {
        let criteria = criteria();

        assert!(criteria.check(0.0, 100.0, 10.0).is_ok());
        assert_eq!(
            criteria.check(0.0, 100.0, 60.0),
            Err(Rejection::BelowNoiseFloor { height: 40.0 })
        );
    }

    #[test]
    fn test_amplitude_noise_rejects() {
        let criteria = HeightCriteria {
            noise_floor: 10.0,
            ..criteria()
        };

        assert_eq!(
            criteria.check(0.0, 30.0, 0.0),
            Err(Rejection::BelowAmplitudeNoise { height: 30.0 })
        );
        assert!(criteria.check(0.0, 45.0, 0.0).is_ok());
    }

    #[test]
    fn test_min_amplitude_rejects() {
        let criteria = HeightCriteria {
            min_amplitude: 500.0,
            ..criteria()
        };

        assert_eq!(
            criteria.check(0.0, 300.0, 0.0),
            Err(Rejection::BelowMinAmplitude { height: 300.0 })
        );
    }

    #[test]
    fn test_high_baseline_rejects_low_edge() {
        let criteria = HeightCriteria {
            baseline_floor: Some(1000.0),
            ..criteria()
        };

        assert!(criteria.check(1005.0, 1400.0, 1010.0).is_ok());
        assert_eq!(
            criteria.check(990.0, 1400.0, 1010.0),
            Err(Rejection::UnderBaseline { edge: 990.0 })
        );
    }

    #[test]
    fn test_left_extension_follows_descent() {
        let fixture = Fixture::new(&synthetic::gaussian(120, 60.0, 5.0, 1000.0));
        let locator = fixture.locator();

        // Strictly descending outwards, so the full lookback is used.
        assert_eq!(locator.extend_left(50), 45);
        // Nothing left of the first sample.
        assert_eq!(locator.extend_left(2), 0);
    }

    #[test]
    fn test_right_edge_extends_while_descending() {
        let fixture = Fixture::new(&synthetic::gaussian(120, 60.0, 5.0, 1000.0));
        let locator = fixture.locator();

        let correction = locator.correct_right_edge(50, 70);
        assert_eq!(
            correction,
            EdgeCorrection {
                end: 75,
                extended: 5,
                trimmed: 0
            }
        );
    }

    #[test]
    fn test_right_edge_trims_overshoot() {
        let mut intensities = synthetic::gaussian(160, 50.0, 5.0, 1000.0);
        for (v, w) in intensities
            .iter_mut()
            .zip(synthetic::gaussian(160, 100.0, 5.0, 1000.0))
        {
            *v += w;
        }
        let fixture = Fixture::new(&intensities);
        let locator = fixture.locator();

        // 80 is on the rising flank of the second peak, 75 is the valley.
        let correction = locator.correct_right_edge(40, 80);
        assert_eq!(
            correction,
            EdgeCorrection {
                end: 75,
                extended: 0,
                trimmed: 5
            }
        );
    }

    #[test]
    fn test_continuation_after_accepted_peak() {
        let trace = synthetic::sum(&[
            synthetic::gaussian(200, 60.0, 5.0, 5000.0),
            synthetic::gaussian(200, 90.0, 5.0, 5000.0),
        ]);
        let mut fixture = Fixture::new(&trace);
        // Slope threshold 100: the rise out of the valley is too shallow for the slope test.
        fixture.noise = NoiseModel {
            amplitude: 1.0,
            slope: 50.0,
            peaktop: 1.0,
        };
        let locator = fixture.locator();

        let (peaks, stop) = locator.scan_until_stop();
        assert_eq!(stop, ScanStop::Completed);
        let edges: Vec<(usize, usize, usize)> = peaks
            .iter()
            .map(|p| (p.scan_at_left_edge, p.scan_at_peak_top, p.scan_at_right_edge))
            .collect();
        assert_eq!(edges, vec![(43, 60, 75), (75, 90, 108)]);

        let end = peaks[0].scan_at_right_edge;
        assert!(!locator.starts_peak(end + 1, None));
        assert!(!locator.starts_peak(end + 2, None));

        let armed = Continuation::after(locator.signal, end, fixture.config.continuation_window);
        assert!(locator.starts_peak(end + 1, Some(armed)));
        assert!(locator.starts_peak(end + 2, Some(armed)));

        let single = Continuation::after(locator.signal, end, 1);
        assert!(locator.starts_peak(end + 1, Some(single)));
        assert!(!locator.starts_peak(end + 2, Some(single)));

        // Falling back below the accepted edge never continues.
        let above = Continuation {
            edge_intensity: locator.signal[end + 1] + 1.0,
            armed_through: end + 1,
        };
        assert!(!locator.starts_peak(end + 1, Some(above)));
    }

    #[test]
    fn test_loop_guard_stops_scan() {
        // Steep ramp at the end: the right edge keeps being trimmed back to
        // the same index.
        let mut trace = synthetic::gaussian(200, 60.0, 5.0, 8000.0);
        for (i, v) in trace.iter_mut().enumerate().skip(186) {
            *v += (i - 185) as f64 * 400.0;
        }
        let fixture = Fixture::new(&trace);

        let (peaks, stop) = fixture.locator().scan_until_stop();
        assert_eq!(stop, ScanStop::LoopGuard { index: 193 });
        assert_eq!(peaks.len(), 1);
        assert_eq!(peaks[0].scan_at_peak_top, 60);
        assert_eq!(fixture.locator().scan(), peaks);
    }

    #[test]
    fn test_curate_cuts_rising_tail() {
        // A long run whose left tail climbs again far from the apex.
        let mut intensities = synthetic::gaussian(200, 100.0, 5.0, 1000.0);
        for v in intensities.iter_mut().take(60) {
            *v += 10.0;
        }
        let fixture = Fixture::new(&intensities);
        let locator = fixture.locator();

        let (run, apex) = locator.curate(CandidateRun { start: 40, end: 130 });
        assert_eq!(apex, 100);
        assert_eq!(run.start, 60);
        assert_eq!(run.end, 130);
    }
}
