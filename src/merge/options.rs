use serde::Deserialize;

/// Knobs for cross-segment merging.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct MergeOptions {
    /// Half-width of the window around a segment boundary inside which steps
    /// from adjacent segments are treated as duplicate candidates, metres.
    pub overlap_window_m: f64,
    /// A gap between accepted steps larger than this multiple of the run's
    /// median stride gets one interpolated step.
    pub gap_stride_factor: f64,
    /// Calibration confidence below this raises a low-quality warning.
    pub min_calibration_confidence: f64,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            overlap_window_m: 0.3,
            gap_stride_factor: 3.0,
            min_calibration_confidence: 0.25,
        }
    }
}
