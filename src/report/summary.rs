//! Terminal run summary

use std::path::Path;
use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

/// Summary of one report run for terminal display.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub features_analyzed: usize,
    pub features_scored: usize,
    pub features_skipped: Vec<String>,
    pub load_time: Option<Duration>,
    pub analysis_time: Option<Duration>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_load_time(&mut self, elapsed: Duration) {
        self.load_time = Some(elapsed);
    }

    pub fn set_analysis_time(&mut self, elapsed: Duration) {
        self.analysis_time = Some(elapsed);
    }

    pub fn display(&self, report_path: &Path) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("RUN SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📊 Features analyzed"),
            Cell::new(self.features_analyzed),
        ]);

        table.add_row(vec![
            Cell::new("🎯 Features scored"),
            Cell::new(self.features_scored)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("⚠️  Features skipped"),
            Cell::new(self.features_skipped.len()).fg(if self.features_skipped.is_empty() {
                Color::White
            } else {
                Color::Red
            }),
        ]);

        if let Some(elapsed) = self.load_time {
            table.add_row(vec![
                Cell::new("⏱️  Load time"),
                Cell::new(format!("{:.2}s", elapsed.as_secs_f64())),
            ]);
        }

        if let Some(elapsed) = self.analysis_time {
            table.add_row(vec![
                Cell::new("⏱️  Analysis time"),
                Cell::new(format!("{:.2}s", elapsed.as_secs_f64())),
            ]);
        }

        table.add_row(vec![
            Cell::new("💾 Report"),
            Cell::new(report_path.display())
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold),
        ]);

        for line in table.lines() {
            println!("    {}", line);
        }

        if !self.features_skipped.is_empty() {
            println!();
            println!(
                "    {} Skipped: {}",
                style("⚠").yellow(),
                self.features_skipped.join(", ")
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_empty() {
        let summary = RunSummary::new();
        assert_eq!(summary.features_analyzed, 0);
        assert_eq!(summary.features_scored, 0);
        assert!(summary.features_skipped.is_empty());
        assert!(summary.load_time.is_none());
    }

    #[test]
    fn test_timers_recorded() {
        let mut summary = RunSummary::new();
        summary.set_load_time(Duration::from_millis(120));
        summary.set_analysis_time(Duration::from_secs(2));
        assert_eq!(summary.load_time, Some(Duration::from_millis(120)));
        assert_eq!(summary.analysis_time, Some(Duration::from_secs(2)));
    }
}
