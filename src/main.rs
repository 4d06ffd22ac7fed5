//! Binsight: Supervised Binning EDA CLI Tool
//!
//! Generates a formatted Excel report for a binary-target dataset:
//! per-bin event rates per feature plus cross-validated ROC AUC scores.

mod cli;
mod error;
mod pipeline;
mod report;
mod utils;

use std::time::Instant;

use anyhow::Result;
use clap::Parser;

use cli::Cli;
use pipeline::collect_dataset;
use report::{export_run_summary, ColorMode, ReportBuilder, ReportConfig, RunSummary};
use utils::{
    create_spinner, print_banner, print_completion, print_config, print_info, print_step_header,
    print_success, print_warning,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let color: ColorMode = cli
        .color
        .parse()
        .map_err(|message: String| anyhow::anyhow!(message))?;

    if !cli.quiet {
        print_banner(env!("CARGO_PKG_VERSION"));
        print_config(
            &cli.input,
            &cli.target,
            &cli.output,
            cli.cat_threshold,
            cli.min_leaf_fraction,
            &cli.color,
        );
    }

    // Step 1: Load dataset
    print_step_header(1, "Load Dataset");
    let step_start = Instant::now();
    let spinner = create_spinner("Loading dataset...");
    let (mut df, rows, cols, memory_mb) = collect_dataset(&cli.input)?;
    spinner.finish_and_clear();
    print_success("Dataset loaded");
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);
    println!("      Estimated memory: {:.2} MB", memory_mb);
    let load_time = step_start.elapsed();

    let mut config = ReportConfig::new(&cli.target);
    config.ignore_cols = cli.ignore_cols.clone();
    config.cat_label_threshold = cli.cat_threshold;
    config.min_leaf_fraction = cli.min_leaf_fraction;
    config.color = color;
    config.report_path = cli.output.clone();

    // Step 2: Bin, score, and write the workbook
    print_step_header(2, "Build Report");
    let step_start = Instant::now();
    let builder = ReportBuilder::new(config.clone())?;
    let outcome = builder.build(&mut df)?;
    let analysis_time = step_start.elapsed();

    for warning in &outcome.warnings {
        print_warning(warning);
    }
    for (feature, reason) in &outcome.skipped {
        print_warning(&format!("skipped '{}': {}", feature, reason));
    }
    print_success(&format!("Report written to {}", outcome.path.display()));

    if cli.summary_json {
        let json_path = outcome.path.with_extension("json");
        export_run_summary(
            &outcome.tables,
            &config,
            &cli.input.display().to_string(),
            &json_path,
        )?;
        print_info(&format!("Run summary written to {}", json_path.display()));
    }

    let mut summary = RunSummary::new();
    summary.features_analyzed = outcome.tables.scores.len() + outcome.skipped.len();
    summary.features_scored = outcome
        .tables
        .scores
        .iter()
        .filter(|score| !score.auc.is_nan())
        .count();
    summary.features_skipped = outcome
        .skipped
        .iter()
        .map(|(name, _)| name.clone())
        .collect();
    summary.set_load_time(load_time);
    summary.set_analysis_time(analysis_time);
    summary.display(&outcome.path);

    print_completion();
    Ok(())
}
