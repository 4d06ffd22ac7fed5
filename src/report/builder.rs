//! Report builder facade
//!
//! One "build full report" operation: validate the run configuration,
//! normalize and classify features, bin and aggregate each one, score
//! each one with cross-validated AUC, then hand both tables to the
//! layout engine and save the workbook to a timestamped path.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;

use crate::error::ReportError;
use crate::pipeline::{
    aggregate, bin_categorical, bin_numeric, categorical_values_imputed, extract_binary_target,
    normalize_binary_columns, numeric_values_imputed, score_categorical, score_numeric,
    ScorerConfig, DEFAULT_FOLDS,
};
use crate::report::layout::{ColorMode, LayoutStyle, WorkbookLayoutEngine};
use crate::report::tables::ReportTables;
use crate::utils::create_progress_bar;

/// Run parameters for one report build.
#[derive(Debug, Clone, Serialize)]
pub struct ReportConfig {
    /// Binary 0/1 target column.
    pub target: String,
    /// Columns excluded from analysis. Unknown names warn and are
    /// skipped, never fatal.
    pub ignore_cols: Vec<String>,
    /// Minimum category share to keep a distinct label id during scoring.
    pub cat_label_threshold: f64,
    /// Minimum leaf size as a fraction of rows for numeric trees.
    pub min_leaf_fraction: f64,
    /// Conditional color direction for the workbook color scales.
    pub color: ColorMode,
    /// Workbook path; the saved file gets a timestamp suffix inserted
    /// before the extension.
    pub report_path: PathBuf,
}

impl ReportConfig {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ignore_cols: Vec::new(),
            cat_label_threshold: 0.05,
            min_leaf_fraction: 0.1,
            color: ColorMode::default(),
            report_path: PathBuf::from("eda_report.xlsx"),
        }
    }

    fn validate(&self) -> Result<(), ReportError> {
        if self.target.trim().is_empty() {
            return Err(ReportError::Configuration(
                "target column name is empty".to_string(),
            ));
        }
        if !(self.min_leaf_fraction > 0.0 && self.min_leaf_fraction <= 1.0) {
            return Err(ReportError::Configuration(format!(
                "min_leaf_fraction must be in (0, 1], got {}",
                self.min_leaf_fraction
            )));
        }
        if !(0.0..=1.0).contains(&self.cat_label_threshold) {
            return Err(ReportError::Configuration(format!(
                "cat_label_threshold must be between 0 and 1, got {}",
                self.cat_label_threshold
            )));
        }
        Ok(())
    }
}

/// Tables plus the non-fatal diagnostics collected while assembling them.
#[derive(Debug, Default)]
pub struct TableBuild {
    pub tables: ReportTables,
    /// Features skipped for data-quality reasons, with the reason text.
    pub skipped: Vec<(String, String)>,
    /// Non-fatal warnings (unknown ignore columns and the like).
    pub warnings: Vec<String>,
}

/// Result of one report build.
#[derive(Debug)]
pub struct ReportOutcome {
    /// Path the workbook was saved to (timestamped).
    pub path: PathBuf,
    pub tables: ReportTables,
    pub skipped: Vec<(String, String)>,
    pub warnings: Vec<String>,
}

enum FeatureValues {
    Numeric(Vec<f64>),
    Categorical(Vec<String>),
}

struct FeatureColumn {
    name: String,
    values: FeatureValues,
}

/// The single entry point for building a full report.
pub struct ReportBuilder {
    config: ReportConfig,
}

impl ReportBuilder {
    pub fn new(config: ReportConfig) -> Result<Self, ReportError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Build the full report: tables, workbook, timestamped save.
    ///
    /// The DataFrame is taken mutably because binary-valued columns are
    /// normalized in place before analysis.
    pub fn build(&self, df: &mut DataFrame) -> Result<ReportOutcome> {
        let build = self.build_tables(df)?;

        let path = timestamped_path(&self.config.report_path);
        let engine = WorkbookLayoutEngine::new(
            self.config.target.clone(),
            LayoutStyle {
                color: self.config.color,
            },
        );
        engine
            .render(&build.tables, &path)
            .with_context(|| format!("Failed to write workbook: {}", path.display()))?;

        Ok(ReportOutcome {
            path,
            tables: build.tables,
            skipped: build.skipped,
            warnings: build.warnings,
        })
    }

    /// Assemble the detailed and score tables without writing a workbook.
    pub fn build_tables(&self, df: &mut DataFrame) -> Result<TableBuild> {
        let targets = extract_binary_target(df, &self.config.target)?;

        let mut build = TableBuild::default();

        // Unknown ignore columns warn and are skipped, never fatal
        let column_names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut ignored: Vec<String> = Vec::new();
        for name in &self.config.ignore_cols {
            if column_names.contains(name) {
                ignored.push(name.clone());
            } else {
                build
                    .warnings
                    .push(format!("ignored column '{}' not found in dataset", name));
            }
        }

        normalize_binary_columns(df, &self.config.target, &ignored)?;

        let features = self.prepare_features(df, &ignored, &mut build)?;

        // Bin and aggregate sequentially; each feature's bins stay
        // contiguous in original column order
        for feature in &features {
            let stats = match &feature.values {
                FeatureValues::Numeric(values) => aggregate(
                    &bin_numeric(values, &targets, self.config.min_leaf_fraction),
                    &targets,
                ),
                FeatureValues::Categorical(values) => {
                    aggregate(&bin_categorical(values), &targets)
                }
            };
            build.tables.push_feature_bins(&feature.name, &stats);
        }

        // Score features in parallel; order-preserving collect keeps the
        // score table aligned with the column order
        let scorer = ScorerConfig {
            folds: DEFAULT_FOLDS,
            cat_label_threshold: self.config.cat_label_threshold,
            min_leaf_fraction: self.config.min_leaf_fraction,
        };

        let pb = create_progress_bar(features.len() as u64, "   Scoring features");
        let scores: Vec<f64> = features
            .par_iter()
            .map(|feature| {
                let auc = match &feature.values {
                    FeatureValues::Numeric(values) => score_numeric(values, &targets, &scorer),
                    FeatureValues::Categorical(values) => {
                        score_categorical(values, &targets, &scorer)
                    }
                };
                pb.inc(1);
                auc
            })
            .collect();
        pb.finish_and_clear();

        for (feature, auc) in features.iter().zip(scores) {
            build.tables.push_score(&feature.name, auc);
        }

        Ok(build)
    }

    /// Classify and impute every analyzable column, preserving column
    /// order. Unusable features are recorded as skipped, not fatal.
    fn prepare_features(
        &self,
        df: &DataFrame,
        ignored: &[String],
        build: &mut TableBuild,
    ) -> Result<Vec<FeatureColumn>> {
        let mut features = Vec::new();

        for column in df.get_columns() {
            let name = column.name().to_string();
            if name == self.config.target || ignored.contains(&name) {
                continue;
            }

            if column.dtype().is_primitive_numeric() {
                match numeric_values_imputed(df, &name) {
                    Ok(values) => features.push(FeatureColumn {
                        name,
                        values: FeatureValues::Numeric(values),
                    }),
                    Err(err) => build.skipped.push((name, err.to_string())),
                }
            } else if matches!(column.dtype(), DataType::String | DataType::Categorical(_, _)) {
                match categorical_values_imputed(df, &name) {
                    Ok(values) => features.push(FeatureColumn {
                        name,
                        values: FeatureValues::Categorical(values),
                    }),
                    Err(err) => build.skipped.push((name, err.to_string())),
                }
            } else {
                build
                    .skipped
                    .push((name, format!("unsupported dtype {}", column.dtype())));
            }
        }

        Ok(features)
    }
}

/// Insert a run timestamp before the extension:
/// `eda_report.xlsx` -> `eda_report_20240131_094502.xlsx`.
pub fn timestamped_path(path: &Path) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("eda_report");
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("xlsx");
    let file_name = format!("{}_{}.{}", stem, timestamp, extension);

    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(file_name),
        _ => PathBuf::from(file_name),
    }
}
