use serde::Deserialize;

/// Knobs for per-segment step validation.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct AnalyzerOptions {
    /// Strides outside `[median / f, median * f]` raise a stride outlier
    /// warning.
    pub stride_outlier_factor: f64,
    /// Minimum completed strides required before a segment analysis is
    /// considered usable downstream.
    pub min_usable_steps: usize,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            stride_outlier_factor: 1.5,
            min_usable_steps: 3,
        }
    }
}
