//! JSON run-summary export

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::report::builder::ReportConfig;
use crate::report::tables::ReportTables;

/// Metadata about the report run
#[derive(Serialize)]
pub struct RunMetadata {
    /// Timestamp of the run (ISO 8601 format)
    pub timestamp: String,
    /// Binsight version
    pub binsight_version: String,
    /// Input file path
    pub input_file: String,
    /// Target column name
    pub target_column: String,
    /// Rare-category threshold used during scoring
    pub cat_label_threshold: f64,
    /// Leaf fraction used by the binning and scoring trees
    pub min_leaf_fraction: f64,
    /// Conditional color direction
    pub conditional_color: String,
}

/// One feature's scored summary
#[derive(Serialize)]
pub struct FeatureEntry {
    pub feature: String,
    /// Median cross-validated AUC; null when the feature was unscoreable
    pub roc_auc: Option<f64>,
    /// Number of bins in the detailed table
    pub bin_count: usize,
}

/// Complete run export with metadata
#[derive(Serialize)]
pub struct RunExport {
    pub metadata: RunMetadata,
    pub features: Vec<FeatureEntry>,
}

/// Export the run summary to a JSON file next to the workbook.
pub fn export_run_summary(
    tables: &ReportTables,
    config: &ReportConfig,
    input_file: &str,
    output_path: &Path,
) -> Result<()> {
    let entries: Vec<FeatureEntry> = tables
        .scores
        .iter()
        .map(|score| {
            let bin_count = tables
                .detailed
                .iter()
                .filter(|row| row.feature == score.feature)
                .count();
            FeatureEntry {
                feature: score.feature.clone(),
                roc_auc: if score.auc.is_nan() {
                    None
                } else {
                    Some(score.auc)
                },
                bin_count,
            }
        })
        .collect();

    let export = RunExport {
        metadata: RunMetadata {
            timestamp: Utc::now().to_rfc3339(),
            binsight_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: input_file.to_string(),
            target_column: config.target.clone(),
            cat_label_threshold: config.cat_label_threshold,
            min_leaf_fraction: config.min_leaf_fraction,
            conditional_color: config.color.to_string(),
        },
        features: entries,
    };

    let json =
        serde_json::to_string_pretty(&export).context("Failed to serialize run summary to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write run summary to {}", output_path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tables::{BinRow, ScoreRow};

    #[test]
    fn test_export_writes_json_with_null_for_nan() {
        let tables = ReportTables {
            detailed: vec![BinRow {
                feature: "age".to_string(),
                value: "<= 27.5".to_string(),
                upper: Some(27.5),
                count: 2,
                positives: 0,
                rate: 0.0,
            }],
            scores: vec![
                ScoreRow {
                    feature: "age".to_string(),
                    auc: 0.75,
                },
                ScoreRow {
                    feature: "noise".to_string(),
                    auc: f64::NAN,
                },
            ],
        };
        let config = ReportConfig::new("churn");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        export_run_summary(&tables, &config, "input.csv", &path).unwrap();

        let body = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(parsed["metadata"]["target_column"], "churn");
        assert_eq!(parsed["features"][0]["roc_auc"], 0.75);
        assert!(parsed["features"][1]["roc_auc"].is_null());
        assert_eq!(parsed["features"][0]["bin_count"], 1);
    }
}
