//! Single-feature discretization
//!
//! Numeric features get ordinal bins from a supervised tree fit;
//! categorical features use their native values as bins. Values must be
//! imputed before binning so every row falls into exactly one bin.

use std::collections::HashMap;

use crate::pipeline::tree::{BalancedTreeClassifier, TreeParams};

/// One ordinal or categorical partition of a feature's rows.
#[derive(Debug, Clone)]
pub struct Bin {
    /// Boundary description or category value.
    pub label: String,
    /// Right-inclusive numeric boundary; `None` for categorical bins.
    pub upper: Option<f64>,
    /// Indices of the rows assigned to this bin.
    pub rows: Vec<usize>,
}

/// Discover ordinal bins for a numeric feature.
///
/// Fits a class-balanced tree with the given leaf fraction, collects its
/// internal thresholds ascending, appends a +infinity sentinel, and
/// assigns each row to the smallest boundary it is <= to. An unsplittable
/// fit (single distinct value, or an oversized leaf fraction) degrades to
/// one bin covering every row.
pub fn bin_numeric(values: &[f64], targets: &[i32], min_leaf_fraction: f64) -> Vec<Bin> {
    let tree = BalancedTreeClassifier::fit(
        values,
        targets,
        TreeParams {
            min_leaf_fraction: Some(min_leaf_fraction),
        },
    );

    let mut boundaries = tree.thresholds();
    boundaries.push(f64::INFINITY);

    let mut bins: Vec<Bin> = boundaries
        .iter()
        .enumerate()
        .map(|(idx, upper)| Bin {
            label: range_label(idx, &boundaries),
            upper: Some(*upper),
            rows: Vec::new(),
        })
        .collect();

    for (row, value) in values.iter().enumerate() {
        let bucket = boundaries
            .iter()
            .position(|b| *value <= *b)
            .unwrap_or(boundaries.len() - 1);
        bins[bucket].rows.push(row);
    }

    bins
}

/// One bin per distinct category, in first-seen order.
pub fn bin_categorical(values: &[String]) -> Vec<Bin> {
    let mut bins: Vec<Bin> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (row, value) in values.iter().enumerate() {
        let slot = *index.entry(value.clone()).or_insert_with(|| {
            bins.push(Bin {
                label: value.clone(),
                upper: None,
                rows: Vec::new(),
            });
            bins.len() - 1
        });
        bins[slot].rows.push(row);
    }

    bins
}

/// Range label for bin `idx` over ascending boundaries (last is +inf):
/// first bin `"<= t1"`, last bin `"> t_{k-1}"`, interior
/// `"> t_{i-1} & <= t_i"`.
pub fn range_label(idx: usize, boundaries: &[f64]) -> String {
    let last = boundaries.len() - 1;
    if idx == 0 {
        format!("<= {}", boundaries[0])
    } else if idx == last {
        format!("> {}", boundaries[last - 1])
    } else {
        format!("> {} & <= {}", boundaries[idx - 1], boundaries[idx])
    }
}
