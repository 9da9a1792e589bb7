//! Noise thresholds from small fluctuations of the signal and its derivatives.

use ndarray::ArrayView1;

use super::config::DetectionConfig;
use super::derivative::{DerivativeTrace, HALF_KERNEL};
use super::profile::median;

/// The three noise scalars driving the boundary search. Always positive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseModel {
    /// Typical step between consecutive signal samples.
    pub amplitude: f64,
    /// Typical |first derivative|.
    pub slope: f64,
    /// Typical concave-down curvature.
    pub peaktop: f64,
}

impl NoiseModel {
    /// Take the median of each pool of fluctuations that lie below a fraction
    /// of the corresponding maximum. Empty pools fall back to the configured
    /// epsilon.
    pub fn estimate(
        signal: ArrayView1<f64>,
        derivatives: &DerivativeTrace,
        config: &DetectionConfig,
    ) -> Self {
        let fraction = config.noise_candidate_fraction;
        let amplitude_limit = derivatives.max_amplitude_step * fraction;
        let slope_limit = derivatives.max_slope * fraction;
        let peaktop_limit = derivatives.max_concavity * fraction;

        let mut amplitude_pool = Vec::new();
        let mut slope_pool = Vec::new();
        let mut peaktop_pool = Vec::new();

        let len = signal.len();
        for i in HALF_KERNEL..len.saturating_sub(HALF_KERNEL) {
            let step = (signal[i + 1] - signal[i]).abs();
            if step > 0.0 && step < amplitude_limit {
                amplitude_pool.push(step);
            }

            let slope = derivatives.first[i].abs();
            if slope > 0.0 && slope < slope_limit {
                slope_pool.push(slope);
            }

            let curvature = derivatives.second[i];
            if curvature < 0.0 && -curvature < peaktop_limit {
                peaktop_pool.push(-curvature);
            }
        }

        let epsilon = config.noise_epsilon;
        Self {
            amplitude: median(&mut amplitude_pool).unwrap_or(epsilon),
            slope: median(&mut slope_pool).unwrap_or(epsilon),
            peaktop: median(&mut peaktop_pool).unwrap_or(epsilon),
        }
    }

    /// Slope a peak flank has to exceed.
    #[inline]
    pub fn slope_threshold(&self, config: &DetectionConfig) -> f64 {
        self.slope * config.slope_noise_fold
    }

    /// Height a peak has to exceed on both sides.
    #[inline]
    pub fn amplitude_threshold(&self, config: &DetectionConfig) -> f64 {
        self.amplitude * config.amplitude_noise_fold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;

    #[test]
    fn test_flat_signal_uses_epsilon() {
        let signal = Array1::from_elem(50, 120.0);
        let derivatives = DerivativeTrace::from_signal(signal.view());
        let noise = NoiseModel::estimate(signal.view(), &derivatives, &DetectionConfig::default());

        assert_eq!(noise.amplitude, 1e-4);
        assert_eq!(noise.slope, 1e-4);
        assert_eq!(noise.peaktop, 1e-4);
    }

    #[test]
    fn test_small_fluctuations_are_pooled() {
        // Alternating wiggle of 0.5 plus one large jump that sets the maxima.
        let mut values: Vec<f64> = (0..60).map(|i| if i % 2 == 0 { 10.0 } else { 10.5 }).collect();
        for v in values.iter_mut().skip(40) {
            *v += 1000.0;
        }
        let signal = Array1::from(values);
        let derivatives = DerivativeTrace::from_signal(signal.view());
        let noise = NoiseModel::estimate(signal.view(), &derivatives, &DetectionConfig::default());

        assert_eq!(noise.amplitude, 0.5);
        assert!(noise.slope > 0.0 && noise.slope < 50.0);
        assert!(noise.peaktop > 0.0);
    }

    #[test]
    fn test_thresholds() {
        let noise = NoiseModel {
            amplitude: 2.0,
            slope: 3.0,
            peaktop: 1.0,
        };
        let config = DetectionConfig::default();

        assert_eq!(noise.slope_threshold(&config), 6.0);
        assert_eq!(noise.amplitude_threshold(&config), 8.0);
    }
}
