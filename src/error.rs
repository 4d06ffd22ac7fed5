//! Error taxonomy for report generation.
//!
//! Per-feature failures (an unscoreable feature, a degenerate fold) are
//! isolated by the builder and never surface as errors; the variants here
//! cover whole-run failures and the sentinel cases callers may inspect.

use thiserror::Error;

/// Errors raised while building a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Run-level configuration problem: missing target column, a leaf
    /// fraction outside (0, 1], an out-of-range category threshold.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Input data violates an analysis precondition, e.g. the target
    /// column is not strictly binary or a feature has no usable values.
    #[error("data quality error: {0}")]
    DataQuality(String),

    /// A statistic could not be computed for one feature. The builder
    /// records a NaN score instead of propagating this for scoring
    /// failures; it is surfaced directly only from low-level calls.
    #[error("computation failed for feature '{feature}': {message}")]
    Computation { feature: String, message: String },

    /// Underlying file I/O failure, propagated unmodified.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_display() {
        let err = ReportError::Configuration("target column 'y' not found".to_string());
        assert_eq!(
            err.to_string(),
            "configuration error: target column 'y' not found"
        );
    }

    #[test]
    fn test_computation_display() {
        let err = ReportError::Computation {
            feature: "age".to_string(),
            message: "degenerate fold".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "computation failed for feature 'age': degenerate fold"
        );
    }

    #[test]
    fn test_io_error_passthrough() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: ReportError = io_err.into();
        assert!(err.to_string().contains("no such file"));
    }
}
