//! Binary-column normalization and imputation helpers
//!
//! Feature columns whose non-missing values are exactly {0,1} or
//! {"Y","N"} are rewritten as {"Yes","No"} string columns before any
//! binning or scoring; the imputation helpers here back both the binner
//! and the scorer.

use std::collections::HashMap;

use anyhow::Result;
use polars::prelude::*;

/// Canonical labels for normalized binary features.
pub const YES: &str = "Yes";
pub const NO: &str = "No";

/// Tolerance for matching 0/1 in float-typed columns
const TOLERANCE: f64 = 1e-9;

/// Normalize binary-valued feature columns to {"Yes","No"} in place.
///
/// Missing entries become "No". The target and skipped columns are left
/// untouched. Returns the names of rewritten columns.
pub fn normalize_binary_columns(
    df: &mut DataFrame,
    target: &str,
    skip: &[String],
) -> Result<Vec<String>> {
    let feature_names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .filter(|name| name != target && !skip.contains(name))
        .collect();

    let mut normalized = Vec::new();

    for name in feature_names {
        let col = df.column(&name)?;

        let replacement = if col.dtype().is_primitive_numeric() {
            zero_one_to_yes_no(col)?
        } else if matches!(col.dtype(), DataType::String | DataType::Categorical(_, _)) {
            y_n_to_yes_no(col)?
        } else {
            None
        };

        if let Some(values) = replacement {
            df.with_column(Column::new(name.as_str().into(), values))?;
            normalized.push(name);
        }
    }

    Ok(normalized)
}

/// Map a numeric column to Yes/No when its non-missing values are exactly
/// {0, 1}; `None` otherwise.
fn zero_one_to_yes_no(col: &Column) -> Result<Option<Vec<String>>> {
    let float_col = col.cast(&DataType::Float64)?;
    let values = float_col.f64()?;

    let mut seen_zero = false;
    let mut seen_one = false;
    for v in values.iter().flatten() {
        if (v - 0.0).abs() < TOLERANCE {
            seen_zero = true;
        } else if (v - 1.0).abs() < TOLERANCE {
            seen_one = true;
        } else {
            return Ok(None);
        }
    }
    if !(seen_zero && seen_one) {
        return Ok(None);
    }

    Ok(Some(
        values
            .iter()
            .map(|v| match v {
                Some(v) if (v - 1.0).abs() < TOLERANCE => YES.to_string(),
                _ => NO.to_string(),
            })
            .collect(),
    ))
}

/// Map a string column to Yes/No when its non-missing values are exactly
/// {"Y", "N"}; `None` otherwise.
fn y_n_to_yes_no(col: &Column) -> Result<Option<Vec<String>>> {
    let string_col = col.cast(&DataType::String)?;
    let values = string_col.str()?;

    let mut seen_y = false;
    let mut seen_n = false;
    for v in values.iter().flatten() {
        match v {
            "Y" => seen_y = true,
            "N" => seen_n = true,
            _ => return Ok(None),
        }
    }
    if !(seen_y && seen_n) {
        return Ok(None);
    }

    Ok(Some(
        values
            .iter()
            .map(|v| match v {
                Some("Y") => YES.to_string(),
                _ => NO.to_string(),
            })
            .collect(),
    ))
}

/// Collect a numeric column with nulls imputed by the column median.
///
/// Fails when the column has no non-missing values.
pub fn numeric_values_imputed(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let col = df.column(name)?;
    let float_col = col.cast(&DataType::Float64)?;
    let values = float_col.f64()?;

    let mut non_missing: Vec<f64> = values.iter().flatten().collect();
    if non_missing.is_empty() {
        anyhow::bail!("feature '{}' has no non-missing values", name);
    }
    let median = median_of(&mut non_missing);

    Ok(values.iter().map(|v| v.unwrap_or(median)).collect())
}

/// Collect a string column with nulls imputed by the most frequent value.
/// Frequency ties break toward the lexicographically smallest value.
///
/// Fails when the column has no non-missing values.
pub fn categorical_values_imputed(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let col = df.column(name)?;
    let string_col = col.cast(&DataType::String)?;
    let values = string_col.str()?;

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for v in values.iter().flatten() {
        *counts.entry(v).or_insert(0) += 1;
    }

    let mode = counts
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(value, _)| value.to_string());

    let mode = match mode {
        Some(mode) => mode,
        None => anyhow::bail!("feature '{}' has no non-missing values", name),
    };

    Ok(values
        .iter()
        .map(|v| v.unwrap_or(&mode).to_string())
        .collect())
}

/// Median of a mutable slice; even-length inputs average the two middle
/// values.
fn median_of(values: &mut [f64]) -> f64 {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    }
}
