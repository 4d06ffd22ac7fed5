//! Report table assembly
//!
//! The two flat result tables handed to the layout engine. Rows carry
//! named semantic fields; nothing downstream relies on positional column
//! indices.

use serde::Serialize;

use crate::pipeline::aggregate::BinStats;

/// One detailed-table row: a (feature, bin) pair with its statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinRow {
    pub feature: String,
    /// Bin label: a range description for numeric bins, the category
    /// value otherwise.
    pub value: String,
    /// Right-inclusive numeric boundary backing `value`; `None` for
    /// categorical bins.
    pub upper: Option<f64>,
    pub count: u32,
    pub positives: u32,
    pub rate: f64,
}

/// One score-table row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRow {
    pub feature: String,
    /// Median cross-validated AUC; NaN when the feature could not be
    /// scored.
    pub auc: f64,
}

/// The detailed table and the score table, features in original column
/// order throughout.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportTables {
    pub detailed: Vec<BinRow>,
    pub scores: Vec<ScoreRow>,
}

impl ReportTables {
    /// Append one feature's bin statistics, keeping its bins contiguous.
    pub fn push_feature_bins(&mut self, feature: &str, stats: &[BinStats]) {
        for stat in stats {
            self.detailed.push(BinRow {
                feature: feature.to_string(),
                value: stat.label.clone(),
                upper: stat.upper,
                count: stat.count,
                positives: stat.positives,
                rate: stat.rate,
            });
        }
    }

    pub fn push_score(&mut self, feature: &str, auc: f64) {
        self.scores.push(ScoreRow {
            feature: feature.to_string(),
            auc,
        });
    }

    /// Contiguous per-feature blocks of the detailed table, in order.
    pub fn feature_blocks(&self) -> Vec<&[BinRow]> {
        let mut blocks = Vec::new();
        let mut start = 0;
        for i in 1..=self.detailed.len() {
            if i == self.detailed.len() || self.detailed[i].feature != self.detailed[start].feature
            {
                blocks.push(&self.detailed[start..i]);
                start = i;
            }
        }
        blocks
    }
}
