// File: crates/sextant-core/src/error.rs
// Summary: Configuration errors surfaced by bounds, axes, options and the render pipeline.

use thiserror::Error;

/// Fatal configuration problems. Recoverable data-shape and numeric edge cases
/// never reach this type; they are repaired where they occur.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("axis `{axis}` has no ticks")]
    ZeroTicks { axis: &'static str },

    #[error("option `{option}` is not finite (got {value})")]
    NonFiniteBounds { option: &'static str, value: f64 },

    #[error("option `{option}` produces high ({high}) below low ({low})")]
    InvertedRange { option: &'static str, high: f64, low: f64 },

    #[error("unknown interpolation `{0}` for option `lineSmooth`")]
    UnknownInterpolation(String),

    #[error("unknown axis type `{0}` for option `type`")]
    UnknownAxisType(String),

    #[error("invalid option `{option}`: {reason}")]
    InvalidOption { option: &'static str, reason: String },

    #[error("chart rectangle is not finite or has negative size")]
    InvalidChartRect,

    #[error("invalid options document: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ChartError>;

/// Reject NaN/infinite values for the named option.
pub(crate) fn ensure_finite(option: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ChartError::NonFiniteBounds { option, value })
    }
}
