//! Per-bin event-rate aggregation

use serde::Serialize;

use crate::pipeline::binner::Bin;

/// Event-rate statistics for one bin.
#[derive(Debug, Clone, Serialize)]
pub struct BinStats {
    /// Bin label carried over from discovery.
    pub label: String,
    /// Right-inclusive numeric boundary; `None` for categorical bins.
    pub upper: Option<f64>,
    /// Rows in the bin.
    pub count: u32,
    /// Rows in the bin with target = 1.
    pub positives: u32,
    /// positives / count.
    pub rate: f64,
}

/// Compute count, positive count, and positive rate per bin, preserving
/// discovery order. Empty bins are dropped.
pub fn aggregate(bins: &[Bin], targets: &[i32]) -> Vec<BinStats> {
    bins.iter()
        .filter(|bin| !bin.rows.is_empty())
        .map(|bin| {
            let count = bin.rows.len() as u32;
            let positives = bin.rows.iter().filter(|&&row| targets[row] == 1).count() as u32;
            let rate = if count > 0 {
                positives as f64 / count as f64
            } else {
                0.0
            };
            BinStats {
                label: bin.label.clone(),
                upper: bin.upper,
                count,
                positives,
                rate,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::binner::{bin_categorical, bin_numeric};

    #[test]
    fn test_counts_and_rates() {
        let values = [20.0, 25.0, 30.0, 40.0, 60.0];
        let targets = [0, 0, 1, 1, 1];

        let bins = bin_numeric(&values, &targets, 0.2);
        let stats = aggregate(&bins, &targets);

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].count, 2);
        assert_eq!(stats[0].positives, 0);
        assert_eq!(stats[0].rate, 0.0);
        assert_eq!(stats[1].count, 3);
        assert_eq!(stats[1].positives, 3);
        assert_eq!(stats[1].rate, 1.0);
    }

    #[test]
    fn test_positive_counts_sum_to_column_total() {
        let values: Vec<String> = ["A", "B", "A", "C", "B", "A"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let targets = [1, 0, 1, 1, 0, 0];

        let stats = aggregate(&bin_categorical(&values), &targets);

        let positives: u32 = stats.iter().map(|s| s.positives).sum();
        let expected: u32 = targets.iter().filter(|t| **t == 1).count() as u32;
        assert_eq!(positives, expected);

        let counts: u32 = stats.iter().map(|s| s.count).sum();
        assert_eq!(counts as usize, targets.len());
    }

    #[test]
    fn test_discovery_order_preserved() {
        let values: Vec<String> = ["west", "east", "west", "north"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let targets = [0, 1, 1, 0];

        let stats = aggregate(&bin_categorical(&values), &targets);

        let labels: Vec<&str> = stats.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["west", "east", "north"]);
    }
}
