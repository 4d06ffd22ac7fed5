//! Cross-validated discriminatory-power scoring
//!
//! Each feature is scored standalone: a class-balanced tree is fitted per
//! stratified fold, held-out rows are scored with the leaf positive-class
//! probability, and the per-fold ROC AUCs aggregate by median. A feature
//! that cannot be scored yields NaN rather than aborting the run.

use std::collections::HashMap;

use crate::pipeline::tree::{BalancedTreeClassifier, TreeParams};

/// Number of cross-validation folds
pub const DEFAULT_FOLDS: usize = 10;

/// Two scores closer than this tie in the AUC ranking
const SCORE_EPS: f64 = 1e-10;

/// Scoring parameters.
#[derive(Debug, Clone, Copy)]
pub struct ScorerConfig {
    /// Requested fold count; clamped down to the minority class size.
    pub folds: usize,
    /// Minimum category share to keep a distinct label id.
    pub cat_label_threshold: f64,
    /// Leaf fraction for numeric scoring trees. Categorical scoring trees
    /// run without a leaf constraint; the asymmetry is an intentional
    /// default (see DESIGN.md).
    pub min_leaf_fraction: f64,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            folds: DEFAULT_FOLDS,
            cat_label_threshold: 0.05,
            min_leaf_fraction: 0.1,
        }
    }
}

/// Median cross-validated AUC for an imputed numeric feature.
pub fn score_numeric(values: &[f64], targets: &[i32], config: &ScorerConfig) -> f64 {
    cross_validated_auc(
        values,
        targets,
        Some(config.min_leaf_fraction),
        config.folds,
    )
}

/// Median cross-validated AUC for an imputed categorical feature after
/// rare-category label encoding.
pub fn score_categorical(values: &[String], targets: &[i32], config: &ScorerConfig) -> f64 {
    let encoded = encode_categories(values, config.cat_label_threshold);
    cross_validated_auc(&encoded, targets, None, config.folds)
}

/// Label ids per category, in first-encountered order.
///
/// Categories whose share of rows meets the threshold get ids 1, 2, ...;
/// rarer categories collapse into the shared id 0.
pub fn category_ids(values: &[String], threshold: f64) -> Vec<(String, u32)> {
    let n = values.len() as f64;

    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for value in values {
        let entry = counts.entry(value.as_str()).or_insert(0);
        if *entry == 0 {
            order.push(value.as_str());
        }
        *entry += 1;
    }

    let mut next_id = 0u32;
    order
        .into_iter()
        .map(|category| {
            let share = counts[category] as f64 / n;
            let id = if share >= threshold {
                next_id += 1;
                next_id
            } else {
                0
            };
            (category.to_string(), id)
        })
        .collect()
}

/// Encode a category column to its integer label ids.
pub fn encode_categories(values: &[String], threshold: f64) -> Vec<f64> {
    let ids: HashMap<String, u32> = category_ids(values, threshold).into_iter().collect();
    values.iter().map(|v| f64::from(ids[v])).collect()
}

/// Deterministic stratified fold assignment.
///
/// Per class, row-ordered samples are dealt into contiguous blocks, the
/// first `n mod k` folds one block larger. Returns sorted test-row index
/// sets per fold; every row appears in exactly one fold.
pub fn stratified_folds(targets: &[i32], k: usize) -> Vec<Vec<usize>> {
    if k == 0 {
        return Vec::new();
    }

    let mut folds: Vec<Vec<usize>> = vec![Vec::new(); k];

    for class in [0, 1] {
        let class_rows: Vec<usize> = targets
            .iter()
            .enumerate()
            .filter(|(_, t)| **t == class)
            .map(|(row, _)| row)
            .collect();

        let base = class_rows.len() / k;
        let extra = class_rows.len() % k;

        let mut start = 0;
        for (fold_idx, fold) in folds.iter_mut().enumerate() {
            let size = base + usize::from(fold_idx < extra);
            fold.extend_from_slice(&class_rows[start..start + size]);
            start += size;
        }
    }

    for fold in &mut folds {
        fold.sort_unstable();
    }

    folds
}

/// Rank-based ROC AUC with midrank tie handling.
///
/// NaN when the inputs hold a single target class.
pub fn auc_score(scores: &[f64], targets: &[i32]) -> f64 {
    let total_pos = targets.iter().filter(|t| **t == 1).count() as f64;
    let total_neg = targets.iter().filter(|t| **t == 0).count() as f64;
    if total_pos == 0.0 || total_neg == 0.0 {
        return f64::NAN;
    }

    let mut pairs: Vec<(f64, i32)> = scores
        .iter()
        .copied()
        .zip(targets.iter().copied())
        .collect();
    pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let n = pairs.len();
    let mut rank_sum_pos = 0.0;
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j < n && (pairs[j].0 - pairs[i].0).abs() < SCORE_EPS {
            j += 1;
        }

        // Midrank of the tie group spanning 1-based ranks i+1 ..= j
        let avg_rank = (i + 1 + j) as f64 / 2.0;
        for pair in &pairs[i..j] {
            if pair.1 == 1 {
                rank_sum_pos += avg_rank;
            }
        }
        i = j;
    }

    let u = rank_sum_pos - total_pos * (total_pos + 1.0) / 2.0;
    (u / (total_pos * total_neg)).clamp(0.0, 1.0)
}

/// Median; even-length inputs average the two middle values.
pub fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    }
}

/// Stratified k-fold AUC over an already-encoded feature column.
///
/// The fold count clamps to the minority class size; below 2 usable folds,
/// or on any degenerate (single-class) fold, the score is NaN.
fn cross_validated_auc(
    values: &[f64],
    targets: &[i32],
    leaf_fraction: Option<f64>,
    folds: usize,
) -> f64 {
    let positives = targets.iter().filter(|t| **t == 1).count();
    let negatives = targets.len() - positives;

    let k = folds.min(positives).min(negatives);
    if k < 2 {
        return f64::NAN;
    }

    let fold_rows = stratified_folds(targets, k);
    let mut results = Vec::with_capacity(k);

    for test_rows in &fold_rows {
        let mut is_test = vec![false; targets.len()];
        for &row in test_rows {
            is_test[row] = true;
        }

        let mut train_values = Vec::with_capacity(targets.len() - test_rows.len());
        let mut train_targets = Vec::with_capacity(targets.len() - test_rows.len());
        for row in 0..targets.len() {
            if !is_test[row] {
                train_values.push(values[row]);
                train_targets.push(targets[row]);
            }
        }

        let tree = BalancedTreeClassifier::fit(
            &train_values,
            &train_targets,
            TreeParams {
                min_leaf_fraction: leaf_fraction,
            },
        );

        let scores: Vec<f64> = test_rows
            .iter()
            .map(|&row| tree.predict_proba(values[row]))
            .collect();
        let test_targets: Vec<i32> = test_rows.iter().map(|&row| targets[row]).collect();

        let auc = auc_score(&scores, &test_targets);
        if auc.is_nan() {
            // Degenerate fold: the whole feature is unscoreable
            return f64::NAN;
        }
        results.push(auc);
    }

    median(&mut results)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rare_categories_collapse_to_zero() {
        // "C" holds 20% of rows, below the 0.3 threshold
        let values = strings(&["A", "A", "B", "B", "C"]);

        let ids = category_ids(&values, 0.3);

        assert_eq!(
            ids,
            vec![
                ("A".to_string(), 1),
                ("B".to_string(), 2),
                ("C".to_string(), 0),
            ]
        );
    }

    #[test]
    fn test_category_ids_first_encountered_order() {
        let values = strings(&["west", "east", "west", "east", "west", "east"]);

        let ids = category_ids(&values, 0.05);

        assert_eq!(
            ids,
            vec![("west".to_string(), 1), ("east".to_string(), 2)]
        );
    }

    #[test]
    fn test_encode_categories_maps_rows() {
        let values = strings(&["A", "A", "B", "B", "C"]);

        let encoded = encode_categories(&values, 0.3);

        assert_eq!(encoded, vec![1.0, 1.0, 2.0, 2.0, 0.0]);
    }

    #[test]
    fn test_stratified_folds_preserve_class_balance() {
        let targets: Vec<i32> = (0..20).map(|i| i % 2).collect();

        let folds = stratified_folds(&targets, 5);

        assert_eq!(folds.len(), 5);
        for fold in &folds {
            assert_eq!(fold.len(), 4);
            let pos = fold.iter().filter(|&&row| targets[row] == 1).count();
            assert_eq!(pos, 2);
        }

        // Every row appears exactly once
        let mut all: Vec<usize> = folds.iter().flatten().copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_stratified_folds_deterministic() {
        let targets = [0, 1, 1, 0, 1, 0, 1, 0, 1, 1, 0, 0];
        assert_eq!(stratified_folds(&targets, 3), stratified_folds(&targets, 3));
    }

    #[test]
    fn test_uneven_counts_front_load_extra_rows() {
        // 5 positives over 2 folds: first fold gets 3, second gets 2
        let targets = [1, 1, 1, 1, 1, 0, 0];
        let folds = stratified_folds(&targets, 2);

        let pos_first = folds[0].iter().filter(|&&row| targets[row] == 1).count();
        let pos_second = folds[1].iter().filter(|&&row| targets[row] == 1).count();
        assert_eq!((pos_first, pos_second), (3, 2));
    }

    #[test]
    fn test_auc_perfect_separation() {
        let scores = [0.1, 0.2, 0.8, 0.9];
        let targets = [0, 0, 1, 1];
        assert!((auc_score(&scores, &targets) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_auc_reversed_separation() {
        let scores = [0.9, 0.8, 0.2, 0.1];
        let targets = [0, 0, 1, 1];
        assert!(auc_score(&scores, &targets).abs() < 1e-9);
    }

    #[test]
    fn test_auc_all_tied_is_half() {
        let scores = [0.5, 0.5, 0.5, 0.5];
        let targets = [0, 1, 0, 1];
        assert!((auc_score(&scores, &targets) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_auc_single_class_is_nan() {
        let scores = [0.1, 0.2, 0.3];
        let targets = [1, 1, 1];
        assert!(auc_score(&scores, &targets).is_nan());
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&mut [3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&mut [4.0, 1.0, 2.0, 3.0]), 2.5);
    }

    #[test]
    fn test_score_numeric_in_unit_interval() {
        let values = [20.0, 25.0, 30.0, 40.0, 60.0];
        let targets = [0, 0, 1, 1, 1];
        let config = ScorerConfig {
            min_leaf_fraction: 0.2,
            ..Default::default()
        };

        let score = score_numeric(&values, &targets, &config);

        assert!(score.is_finite(), "expected a finite score, got {}", score);
        assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn test_score_numeric_deterministic() {
        let values = [5.0, 1.0, 8.0, 2.0, 9.0, 3.0, 7.0, 4.0, 6.0, 0.0];
        let targets = [0, 1, 0, 1, 0, 1, 0, 1, 0, 1];
        let config = ScorerConfig::default();

        let first = score_numeric(&values, &targets, &config);
        let second = score_numeric(&values, &targets, &config);

        assert!(first.is_nan() && second.is_nan() || first == second);
    }

    #[test]
    fn test_tiny_minority_class_scores_nan() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let targets = [0, 1, 1, 1];
        let config = ScorerConfig::default();

        assert!(score_numeric(&values, &targets, &config).is_nan());
    }

    #[test]
    fn test_score_categorical_strong_separator() {
        let values = strings(&[
            "low", "low", "low", "low", "high", "high", "high", "high",
        ]);
        let targets = [0, 0, 0, 0, 1, 1, 1, 1];
        let config = ScorerConfig::default();

        let score = score_categorical(&values, &targets, &config);

        assert!(score.is_finite());
        assert!(
            score > 0.5,
            "a clean separator should beat random, got {}",
            score
        );
    }
}
