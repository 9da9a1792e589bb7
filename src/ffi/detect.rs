//! FFI functions for peak detection.

use log::debug;

use super::types::{CDetectedPeak, CDetectionConfig, CPeakArray, ChromStatus, MAX_WINDOW};
use crate::data::{Chromatogram, Sample};
use crate::detection::{DetectionConfig, PeakDetector};

/// Fill `out_config` with the default tunables.
///
/// # Safety
/// `out_config` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn chrom_default_config(out_config: *mut CDetectionConfig) -> ChromStatus {
    if out_config.is_null() {
        return ChromStatus::NullPointer;
    }

    *out_config = CDetectionConfig::from(&DetectionConfig::default());
    ChromStatus::Ok
}

/// Detect peaks with default tunables.
///
/// The samples are not validated; a trace shorter than the scan margins
/// yields an empty array.
///
/// # Safety
/// `samples` must point to `len` samples and `out_peaks` must be valid for
/// writes. Caller must free the result with `chrom_peaks_free`.
#[no_mangle]
pub unsafe extern "C" fn chrom_detect_peaks(
    samples: *const Sample,
    len: usize,
    min_datapoints: usize,
    min_amplitude: f64,
    out_peaks: *mut CPeakArray,
) -> ChromStatus {
    if samples.is_null() || out_peaks.is_null() {
        return ChromStatus::NullPointer;
    }
    if !min_amplitude.is_finite() {
        return ChromStatus::InvalidArgument;
    }

    let slice = std::slice::from_raw_parts(samples, len);
    let peaks = PeakDetector::with_thresholds(min_datapoints, min_amplitude).detect(slice);
    *out_peaks = CPeakArray::from_peaks(&peaks);

    ChromStatus::Ok
}

/// Validate the samples and detect peaks with the given tunables.
///
/// On failure `out_peaks` holds an empty array.
///
/// # Safety
/// `samples` must point to `len` samples, `config` must be valid for reads
/// and `out_peaks` valid for writes. Caller must free the result with
/// `chrom_peaks_free`.
#[no_mangle]
pub unsafe extern "C" fn chrom_detect_peaks_with_config(
    samples: *const Sample,
    len: usize,
    config: *const CDetectionConfig,
    out_peaks: *mut CPeakArray,
) -> ChromStatus {
    if samples.is_null() || config.is_null() || out_peaks.is_null() {
        return ChromStatus::NullPointer;
    }
    *out_peaks = CPeakArray::empty();

    let config = match (*config).to_config() {
        Ok(config) => config,
        Err(status) => return status,
    };

    let chromatogram = Chromatogram::new("ffi", std::slice::from_raw_parts(samples, len).to_vec());
    match PeakDetector::new(config).detect_chromatogram(&chromatogram) {
        Ok(peaks) => {
            *out_peaks = CPeakArray::from_peaks(&peaks);
            ChromStatus::Ok
        }
        Err(err) => {
            debug!("rejected chromatogram: {}", err);
            ChromStatus::from(&err)
        }
    }
}

/// Free a peak array.
///
/// # Safety
/// Peaks must have been allocated by one of the detection functions or be zeroed.
#[no_mangle]
pub unsafe extern "C" fn chrom_peaks_free(peaks: *mut CPeakArray) {
    if peaks.is_null() {
        return;
    }

    let arr = &*peaks;
    if !arr.data.is_null() && arr.capacity > 0 {
        let _: Vec<CDetectedPeak> = Vec::from_raw_parts(arr.data, arr.len, arr.capacity);
    }

    (*peaks).data = std::ptr::null_mut();
    (*peaks).len = 0;
    (*peaks).capacity = 0;
}
