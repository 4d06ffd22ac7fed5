//! Binary target validation and extraction
//!
//! The target column must hold exactly the values 0 and 1 (integer or
//! float). Anything else is a whole-run failure.

use polars::prelude::*;

use crate::error::ReportError;

/// Tolerance for floating point comparison when checking binary 0/1 values
const TOLERANCE: f64 = 1e-9;

/// Validate the target column and extract it as a 0/1 vector.
///
/// Fails with `Configuration` when the column is missing and with
/// `DataQuality` when it is empty, holds nulls, or is not strictly binary.
pub fn extract_binary_target(df: &DataFrame, target: &str) -> Result<Vec<i32>, ReportError> {
    let target_col = df.column(target).map_err(|_| {
        ReportError::Configuration(format!("target column '{}' not found in dataset", target))
    })?;

    if target_col.len() == 0 {
        return Err(ReportError::DataQuality(format!(
            "target column '{}' is empty",
            target
        )));
    }

    if target_col.null_count() > 0 {
        return Err(ReportError::DataQuality(format!(
            "target column '{}' contains {} null values",
            target,
            target_col.null_count()
        )));
    }

    let float_col = target_col.cast(&DataType::Float64).map_err(|_| {
        ReportError::DataQuality(format!(
            "target column '{}' is not numeric (dtype {})",
            target,
            target_col.dtype()
        ))
    })?;
    let values = float_col
        .f64()
        .map_err(|err| ReportError::DataQuality(err.to_string()))?;

    let unique = float_col
        .unique()
        .map_err(|err| ReportError::DataQuality(err.to_string()))?;
    let unique_values: Vec<f64> = unique
        .f64()
        .map_err(|err| ReportError::DataQuality(err.to_string()))?
        .into_iter()
        .flatten()
        .collect();

    let valid = unique_values
        .iter()
        .all(|&v| (v - 0.0).abs() < TOLERANCE || (v - 1.0).abs() < TOLERANCE);

    if !valid || unique_values.len() != 2 {
        return Err(ReportError::DataQuality(format!(
            "target column '{}' must be binary (0/1). Found {} unique values: {:?}",
            target,
            unique_values.len(),
            unique_values
        )));
    }

    Ok(values
        .into_iter()
        .map(|v| match v {
            Some(v) if (v - 1.0).abs() < TOLERANCE => 1,
            _ => 0,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_binary_int_target() {
        let df = df! {
            "target" => [0i32, 1, 0, 1, 0, 1],
            "feature" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0],
        }
        .unwrap();

        let targets = extract_binary_target(&df, "target").unwrap();
        assert_eq!(targets, vec![0, 1, 0, 1, 0, 1]);
    }

    #[test]
    fn test_extract_binary_float_target() {
        let df = df! {
            "target" => [0.0f64, 1.0, 0.0, 1.0],
            "feature" => [1.0f64, 2.0, 3.0, 4.0],
        }
        .unwrap();

        let targets = extract_binary_target(&df, "target").unwrap();
        assert_eq!(targets, vec![0, 1, 0, 1]);
    }

    #[test]
    fn test_missing_target_is_configuration_error() {
        let df = df! {
            "other" => [0i32, 1, 0, 1],
        }
        .unwrap();

        let result = extract_binary_target(&df, "target");
        assert!(matches!(result, Err(ReportError::Configuration(_))));
    }

    #[test]
    fn test_non_binary_target_is_data_quality_error() {
        let df = df! {
            "target" => [0i32, 1, 2, 0, 1, 2],
        }
        .unwrap();

        let result = extract_binary_target(&df, "target");
        assert!(matches!(result, Err(ReportError::DataQuality(_))));
        assert!(result.unwrap_err().to_string().contains("must be binary"));
    }

    #[test]
    fn test_constant_target_is_data_quality_error() {
        let df = df! {
            "target" => [1i32, 1, 1, 1],
        }
        .unwrap();

        let result = extract_binary_target(&df, "target");
        assert!(matches!(result, Err(ReportError::DataQuality(_))));
    }

    #[test]
    fn test_null_target_is_data_quality_error() {
        let df = df! {
            "target" => [Some(0i32), Some(1), None, Some(1)],
        }
        .unwrap();

        let result = extract_binary_target(&df, "target");
        assert!(matches!(result, Err(ReportError::DataQuality(_))));
        assert!(result.unwrap_err().to_string().contains("null"));
    }

    #[test]
    fn test_empty_target_is_data_quality_error() {
        let df = df! {
            "target" => Vec::<i32>::new(),
        }
        .unwrap();

        let result = extract_binary_target(&df, "target");
        assert!(matches!(result, Err(ReportError::DataQuality(_))));
    }
}
