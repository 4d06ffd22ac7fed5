//! Command-line argument definitions using clap

use clap::Parser;
use std::path::PathBuf;

/// Binsight - profile a binary-target dataset into a formatted Excel EDA report
#[derive(Parser, Debug)]
#[command(name = "binsight")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file path (CSV or Parquet)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Target column name (binary 0/1)
    #[arg(short, long)]
    pub target: String,

    /// Columns to exclude from analysis (comma-separated).
    /// Unknown names are skipped with a warning.
    #[arg(long, value_delimiter = ',')]
    pub ignore_cols: Vec<String>,

    /// Minimum category share to keep a distinct label id during scoring.
    /// Rarer categories collapse into a shared "other" bucket.
    #[arg(long, default_value = "0.05", value_parser = validate_unit_interval)]
    pub cat_threshold: f64,

    /// Minimum leaf size as a fraction of rows for numeric binning trees
    #[arg(long, default_value = "0.1", value_parser = validate_leaf_fraction)]
    pub min_leaf_fraction: f64,

    /// Conditional color direction for the workbook color scales.
    /// Options: "red" (high is bad), "green" (high is good), "color" (3-color scale)
    #[arg(long, default_value = "red")]
    pub color: String,

    /// Output workbook path. A run timestamp is inserted before the extension.
    #[arg(short, long, default_value = "eda_report.xlsx")]
    pub output: PathBuf,

    /// Write a JSON run summary next to the workbook
    #[arg(long, default_value = "false")]
    pub summary_json: bool,

    /// Suppress the banner and configuration card
    #[arg(long, default_value = "false")]
    pub quiet: bool,
}

/// Validator for parameters constrained to [0, 1]
fn validate_unit_interval(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("must be between 0.0 and 1.0, got {}", value))
    }
}

/// Validator for the leaf fraction, which must be in (0, 1]
fn validate_leaf_fraction(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value > 0.0 && value <= 1.0 {
        Ok(value)
    } else {
        Err(format!("must be in (0.0, 1.0], got {}", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_invocation() {
        let cli =
            Cli::try_parse_from(["binsight", "-i", "data.csv", "-t", "churn"]).unwrap();

        assert_eq!(cli.input, PathBuf::from("data.csv"));
        assert_eq!(cli.target, "churn");
        assert_eq!(cli.cat_threshold, 0.05);
        assert_eq!(cli.min_leaf_fraction, 0.1);
        assert_eq!(cli.color, "red");
        assert_eq!(cli.output, PathBuf::from("eda_report.xlsx"));
        assert!(!cli.summary_json);
    }

    #[test]
    fn test_ignore_cols_comma_delimited() {
        let cli = Cli::try_parse_from([
            "binsight",
            "-i",
            "data.csv",
            "-t",
            "churn",
            "--ignore-cols",
            "id,snapshot_date",
        ])
        .unwrap();

        assert_eq!(
            cli.ignore_cols,
            vec!["id".to_string(), "snapshot_date".to_string()]
        );
    }

    #[test]
    fn test_leaf_fraction_zero_rejected() {
        let result = Cli::try_parse_from([
            "binsight",
            "-i",
            "data.csv",
            "-t",
            "churn",
            "--min-leaf-fraction",
            "0.0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cat_threshold_above_one_rejected() {
        let result = Cli::try_parse_from([
            "binsight",
            "-i",
            "data.csv",
            "-t",
            "churn",
            "--cat-threshold",
            "1.5",
        ]);
        assert!(result.is_err());
    }
}
