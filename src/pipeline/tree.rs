//! Class-balanced decision tree over a single feature
//!
//! A greedy recursive Gini splitter used for both bin-edge discovery and
//! fold scoring. Class weights are balanced at fit time so each class
//! carries half of the total weight, split thresholds sit at the midpoint
//! between adjacent distinct values, and growth stops when no
//! impurity-reducing split satisfies the minimum-leaf constraint.

/// Minimum Gini gain for a split to be accepted
const GAIN_EPS: f64 = 1e-12;

/// Two values closer than this are treated as equal
const VALUE_EPS: f64 = 1e-10;

/// Fit-time parameters.
#[derive(Debug, Clone, Copy)]
pub struct TreeParams {
    /// Minimum leaf size as a fraction of fitted rows; `None` allows
    /// single-sample leaves.
    pub min_leaf_fraction: Option<f64>,
}

#[derive(Debug)]
enum Node {
    Leaf {
        p_event: f64,
    },
    Split {
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// A fitted single-feature classifier.
#[derive(Debug)]
pub struct BalancedTreeClassifier {
    root: Node,
}

impl BalancedTreeClassifier {
    /// Fit on one feature column against a 0/1 target.
    pub fn fit(values: &[f64], targets: &[i32], params: TreeParams) -> Self {
        debug_assert_eq!(values.len(), targets.len());

        let n = values.len();
        let positives = targets.iter().filter(|t| **t == 1).count();
        let negatives = n - positives;

        // Balanced class weights: each class carries half the total weight.
        let w1 = if positives > 0 {
            n as f64 / (2.0 * positives as f64)
        } else {
            0.0
        };
        let w0 = if negatives > 0 {
            n as f64 / (2.0 * negatives as f64)
        } else {
            0.0
        };

        let min_leaf = match params.min_leaf_fraction {
            Some(fraction) => ((fraction * n as f64).ceil() as usize).max(1),
            None => 1,
        };

        let mut pairs: Vec<(f64, i32)> = values
            .iter()
            .copied()
            .zip(targets.iter().copied())
            .collect();
        pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let root = grow(&pairs, min_leaf, w0, w1);
        Self { root }
    }

    /// Internal split thresholds, ascending and deduplicated.
    pub fn thresholds(&self) -> Vec<f64> {
        let mut out = Vec::new();
        collect_thresholds(&self.root, &mut out);
        out.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        out.dedup_by(|a, b| (*a - *b).abs() < VALUE_EPS);
        out
    }

    /// Positive-class probability for one value.
    pub fn predict_proba(&self, value: f64) -> f64 {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { p_event } => return *p_event,
                Node::Split {
                    threshold,
                    left,
                    right,
                } => {
                    node = if value <= *threshold { left } else { right };
                }
            }
        }
    }
}

fn collect_thresholds(node: &Node, out: &mut Vec<f64>) {
    if let Node::Split {
        threshold,
        left,
        right,
    } = node
    {
        out.push(*threshold);
        collect_thresholds(left, out);
        collect_thresholds(right, out);
    }
}

fn grow(pairs: &[(f64, i32)], min_leaf: usize, w0: f64, w1: f64) -> Node {
    if let Some((split_idx, threshold)) = best_split(pairs, min_leaf, w0, w1) {
        let (left, right) = pairs.split_at(split_idx);
        Node::Split {
            threshold,
            left: Box::new(grow(left, min_leaf, w0, w1)),
            right: Box::new(grow(right, min_leaf, w0, w1)),
        }
    } else {
        leaf(pairs, w0, w1)
    }
}

fn leaf(pairs: &[(f64, i32)], w0: f64, w1: f64) -> Node {
    let positives = pairs.iter().filter(|(_, t)| *t == 1).count() as f64;
    let negatives = pairs.len() as f64 - positives;

    let weighted_pos = w1 * positives;
    let weighted_neg = w0 * negatives;
    let total = weighted_pos + weighted_neg;

    let p_event = if total > 0.0 { weighted_pos / total } else { 0.0 };
    Node::Leaf { p_event }
}

/// Gini impurity over weighted class counts: 2 * p * (1 - p)
fn weighted_gini(pos: f64, neg: f64) -> f64 {
    let total = pos + neg;
    if total == 0.0 {
        return 0.0;
    }
    let p = pos / total;
    2.0 * p * (1.0 - p)
}

/// Best midpoint split by weighted Gini gain over value-sorted pairs.
///
/// Returns `(split_index, threshold)` where the left partition is
/// `pairs[..split_index]`, or `None` when no split with positive gain
/// satisfies the minimum-leaf constraint on both sides.
fn best_split(
    pairs: &[(f64, i32)],
    min_leaf: usize,
    w0: f64,
    w1: f64,
) -> Option<(usize, f64)> {
    let n = pairs.len();
    if n < 2 * min_leaf {
        return None;
    }

    let total_pos = pairs.iter().filter(|(_, t)| *t == 1).count() as f64 * w1;
    let total_neg = pairs.iter().filter(|(_, t)| *t == 0).count() as f64 * w0;
    let total_weight = total_pos + total_neg;
    if total_weight == 0.0 {
        return None;
    }

    let parent_gini = weighted_gini(total_pos, total_neg);

    let mut best_gain = GAIN_EPS;
    let mut best = None;

    let mut left_pos = 0.0f64;
    let mut left_neg = 0.0f64;

    for i in 0..n - 1 {
        if pairs[i].1 == 1 {
            left_pos += w1;
        } else {
            left_neg += w0;
        }

        let left_count = i + 1;
        let right_count = n - left_count;
        if left_count < min_leaf || right_count < min_leaf {
            continue;
        }

        // No split inside a run of equal values
        if (pairs[i].0 - pairs[i + 1].0).abs() < VALUE_EPS {
            continue;
        }

        let right_pos = total_pos - left_pos;
        let right_neg = total_neg - left_neg;

        let left_weight = left_pos + left_neg;
        let right_weight = right_pos + right_neg;

        let child_gini = (left_weight / total_weight) * weighted_gini(left_pos, left_neg)
            + (right_weight / total_weight) * weighted_gini(right_pos, right_neg);

        let gain = parent_gini - child_gini;
        if gain > best_gain {
            best_gain = gain;
            best = Some((i + 1, (pairs[i].0 + pairs[i + 1].0) / 2.0));
        }
    }

    best
}
