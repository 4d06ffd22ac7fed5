//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a mixed-type test DataFrame with known characteristics
///
/// This DataFrame includes:
/// - `churn`: Binary target column (0/1), 5 events / 5 non-events
/// - `age`: Numeric feature cleanly separated around 45
/// - `region`: Categorical feature ("south" rows are all events)
/// - `flag`: Binary 0/1 feature, normalized to Yes/No before analysis
/// - `consent`: Binary Y/N feature, normalized to Yes/No before analysis
pub fn create_eda_dataframe() -> DataFrame {
    df! {
        "churn" => [0i32, 1, 0, 1, 0, 1, 0, 1, 0, 1],
        "age" => [22.0f64, 55.0, 25.0, 60.0, 30.0, 62.0, 28.0, 58.0, 35.0, 65.0],
        "region" => ["north", "south", "north", "south", "east", "south", "north", "south", "east", "south"],
        "flag" => [0i32, 1, 0, 1, 0, 1, 0, 1, 0, 1],
        "consent" => ["N", "Y", "N", "Y", "N", "Y", "N", "Y", "N", "Y"],
    }
    .unwrap()
}

/// Five-row numeric scenario: two low-age non-events, three older events
pub fn create_age_dataframe() -> DataFrame {
    df! {
        "churn" => [0i32, 0, 1, 1, 1],
        "age" => [20.0f64, 25.0, 30.0, 40.0, 60.0],
    }
    .unwrap()
}

/// Categorical scenario with a rare category: "C" holds 20% of rows
pub fn create_region_dataframe() -> DataFrame {
    df! {
        "churn" => [0i32, 1, 0, 1, 1],
        "region" => ["A", "A", "B", "B", "C"],
    }
    .unwrap()
}

/// DataFrame with missing values in both numeric and categorical features
pub fn create_missing_dataframe() -> DataFrame {
    df! {
        "churn" => [0i32, 1, 0, 1, 0, 1, 0, 1],
        "income" => [Some(10.0f64), Some(80.0), None, Some(70.0), Some(20.0), None, Some(15.0), Some(75.0)],
        "segment" => [Some("a"), Some("b"), Some("a"), None, Some("a"), Some("b"), None, Some("b")],
        "empty" => [None::<f64>, None, None, None, None, None, None, None],
    }
    .unwrap()
}

/// Create a larger random DataFrame for smoke tests
pub fn create_large_dataframe(rows: usize) -> DataFrame {
    use rand::Rng;
    let mut rng = rand::thread_rng();

    let target: Vec<i32> = (0..rows).map(|_| rng.gen_range(0..2)).collect();
    let noise: Vec<f64> = (0..rows).map(|_| rng.gen::<f64>()).collect();
    let segments: Vec<String> = (0..rows)
        .map(|_| ["a", "b", "c"][rng.gen_range(0..3)].to_string())
        .collect();

    df! {
        "churn" => target,
        "noise" => noise,
        "segment" => segments,
    }
    .unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_data.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Collect the contiguous per-feature blocks of a detailed table
pub fn block_features(rows: &[binsight::report::BinRow]) -> Vec<String> {
    let mut features = Vec::new();
    for row in rows {
        if features.last() != Some(&row.feature) {
            features.push(row.feature.clone());
        }
    }
    features
}
