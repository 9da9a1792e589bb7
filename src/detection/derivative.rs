//! First and second derivatives of the smoothed trace.

use ndarray::{aview1, Array1, ArrayView1};

/// Number of taps of the derivative kernels.
pub const KERNEL_LEN: usize = 5;

/// Samples at each end of the trace where the kernels cannot be centered.
pub const HALF_KERNEL: usize = KERNEL_LEN / 2;

pub const FIRST_DIFF_KERNEL: [f64; KERNEL_LEN] = [-0.2, -0.1, 0.0, 0.1, 0.2];

pub const SECOND_DIFF_KERNEL: [f64; KERNEL_LEN] =
    [0.14285714, -0.07142857, -0.1428571, -0.07142857, 0.14285714];

/// Derivative traces, index-aligned with the smoothed signal.
///
/// The first and last [`HALF_KERNEL`] entries are zero.
#[derive(Clone, Debug)]
pub struct DerivativeTrace {
    pub first: Array1<f64>,
    pub second: Array1<f64>,
    /// Largest |first derivative|.
    pub max_slope: f64,
    /// Largest magnitude of a negative second derivative.
    pub max_concavity: f64,
    /// Largest |signal[i + 1] - signal[i]| over the kernel-centered positions,
    /// the same steps the amplitude noise is pooled from.
    pub max_amplitude_step: f64,
}

impl DerivativeTrace {
    pub fn from_signal(signal: ArrayView1<f64>) -> Self {
        let len = signal.len();
        let first_kernel = aview1(&FIRST_DIFF_KERNEL);
        let second_kernel = aview1(&SECOND_DIFF_KERNEL);

        let mut first = Array1::zeros(len);
        let mut second = Array1::zeros(len);
        let mut max_slope = 0.0f64;
        let mut max_concavity = 0.0f64;
        let mut max_amplitude_step = 0.0f64;

        if len < KERNEL_LEN {
            return Self {
                first,
                second,
                max_slope,
                max_concavity,
                max_amplitude_step,
            };
        }

        for (offset, window) in signal.windows(KERNEL_LEN).into_iter().enumerate() {
            let i = offset + HALF_KERNEL;
            let slope = window.dot(&first_kernel);
            let curvature = window.dot(&second_kernel);

            first[i] = slope;
            second[i] = curvature;

            max_slope = max_slope.max(slope.abs());
            if curvature < 0.0 {
                max_concavity = max_concavity.max(-curvature);
            }
            max_amplitude_step = max_amplitude_step.max((signal[i + 1] - signal[i]).abs());
        }

        Self {
            first,
            second,
            max_slope,
            max_concavity,
            max_amplitude_step,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.first.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.first.is_empty()
    }
}
