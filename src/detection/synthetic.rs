//! Hand-built chromatograms for tests.

use crate::data::Sample;

/// Scan spacing in minutes.
pub const SCAN_TIME: f64 = 0.01;

pub const TRACE_MASS: f64 = 301.14;

/// Samples with consecutive scan indices and evenly spaced times.
pub fn samples(intensities: &[f64]) -> Vec<Sample> {
    intensities
        .iter()
        .enumerate()
        .map(|(i, &v)| Sample::new(i, i as f64 * SCAN_TIME, v, TRACE_MASS))
        .collect()
}

/// Gaussian bump sampled at `0..len`.
pub fn gaussian(len: usize, center: f64, sigma: f64, height: f64) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let x = (i as f64 - center) / sigma;
            height * (-0.5 * x * x).exp()
        })
        .collect()
}

/// Element-wise sum of equally long traces.
pub fn sum(traces: &[Vec<f64>]) -> Vec<f64> {
    let len = traces.first().map_or(0, Vec::len);
    (0..len).map(|i| traces.iter().map(|t| t[i]).sum()).collect()
}
