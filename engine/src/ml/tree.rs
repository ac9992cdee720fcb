//! CART decision tree classifier
//!
//! Gini-impurity splits with midpoint thresholds. Feature and
//! threshold candidates are scanned in a fixed order and only a
//! strictly better split replaces the incumbent, so fitting is fully
//! deterministic for a given sample table.

use std::cmp::Ordering;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Fitting parameters shared by both candidate families.
#[derive(Debug, Clone)]
pub struct TreeParams {
    /// Depth cap; `None` grows until leaves are pure
    pub max_depth: Option<usize>,
    /// Minimum rows a node needs before a split is attempted
    pub min_samples_split: usize,
    /// Restrict splits to these feature columns (random-subspace
    /// trees in the forest); `None` uses every column
    pub feature_subset: Option<Vec<usize>>,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            feature_subset: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum Node {
    Leaf {
        label: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// A fitted decision tree over encoded class labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    root: Node,
}

impl DecisionTree {
    /// Fit a tree on the given rows of the sample matrix.
    pub fn fit(
        x: &Array2<f64>,
        y: &[usize],
        rows: &[usize],
        n_classes: usize,
        params: &TreeParams,
    ) -> Self {
        let root = build_node(x, y, rows.to_vec(), n_classes, params, 0);
        Self { root }
    }

    /// Predict the encoded class for one feature row.
    pub fn predict_row(&self, features: &[f64]) -> usize {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { label } => return *label,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if features[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}

fn class_counts(y: &[usize], rows: &[usize], n_classes: usize) -> Vec<usize> {
    let mut counts = vec![0usize; n_classes];
    for &row in rows {
        counts[y[row]] += 1;
    }
    counts
}

/// Majority class; ties resolve to the smallest encoded label.
fn majority_class(counts: &[usize]) -> usize {
    counts
        .iter()
        .enumerate()
        .max_by(|(class_a, count_a), (class_b, count_b)| {
            count_a.cmp(count_b).then(class_b.cmp(class_a))
        })
        .map(|(class, _)| class)
        .unwrap_or(0)
}

fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let sum_sq: f64 = counts
        .iter()
        .map(|&count| {
            let p = count as f64 / total as f64;
            p * p
        })
        .sum();
    1.0 - sum_sq
}

fn build_node(
    x: &Array2<f64>,
    y: &[usize],
    rows: Vec<usize>,
    n_classes: usize,
    params: &TreeParams,
    depth: usize,
) -> Node {
    let counts = class_counts(y, &rows, n_classes);
    let label = majority_class(&counts);

    let is_pure = counts.iter().filter(|&&count| count > 0).count() <= 1;
    let depth_capped = params.max_depth.is_some_and(|cap| depth >= cap);
    if is_pure || depth_capped || rows.len() < params.min_samples_split {
        return Node::Leaf { label };
    }

    let Some((feature, threshold)) = best_split(x, y, &rows, n_classes, params) else {
        return Node::Leaf { label };
    };

    let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
        .into_iter()
        .partition(|&row| x[[row, feature]] <= threshold);
    if left_rows.is_empty() || right_rows.is_empty() {
        return Node::Leaf { label };
    }

    Node::Split {
        feature,
        threshold,
        left: Box::new(build_node(x, y, left_rows, n_classes, params, depth + 1)),
        right: Box::new(build_node(x, y, right_rows, n_classes, params, depth + 1)),
    }
}

/// Scan candidate splits and return the one with the lowest weighted
/// Gini impurity, or `None` when every candidate feature is constant.
fn best_split(
    x: &Array2<f64>,
    y: &[usize],
    rows: &[usize],
    n_classes: usize,
    params: &TreeParams,
) -> Option<(usize, f64)> {
    let all_features: Vec<usize> = (0..x.ncols()).collect();
    let features = params.feature_subset.as_deref().unwrap_or(&all_features);

    let total = rows.len();
    let parent_impurity = gini(&class_counts(y, rows, n_classes), total);

    let mut best: Option<(f64, usize, f64)> = None;

    for &feature in features {
        let mut values: Vec<f64> = rows.iter().map(|&row| x[[row, feature]]).collect();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        values.dedup();

        for pair in values.windows(2) {
            let threshold = (pair[0] + pair[1]) / 2.0;

            let mut left_counts = vec![0usize; n_classes];
            let mut right_counts = vec![0usize; n_classes];
            for &row in rows {
                if x[[row, feature]] <= threshold {
                    left_counts[y[row]] += 1;
                } else {
                    right_counts[y[row]] += 1;
                }
            }
            let n_left: usize = left_counts.iter().sum();
            let n_right = total - n_left;
            if n_left == 0 || n_right == 0 {
                continue;
            }

            let weighted = (n_left as f64 * gini(&left_counts, n_left)
                + n_right as f64 * gini(&right_counts, n_right))
                / total as f64;

            if best.map_or(true, |(incumbent, _, _)| weighted < incumbent) {
                best = Some((weighted, feature, threshold));
            }
        }
    }

    // A split that does not reduce impurity is not worth taking.
    best.filter(|&(impurity, _, _)| impurity < parent_impurity)
        .map(|(_, feature, threshold)| (feature, threshold))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_matrix() -> (Array2<f64>, Vec<usize>) {
        let x = Array2::from_shape_vec(
            (6, 2),
            vec![
                1.0, 10.0, //
                2.0, 11.0, //
                3.0, 12.0, //
                10.0, 1.0, //
                11.0, 2.0, //
                12.0, 3.0,
            ],
        )
        .unwrap();
        let y = vec![0, 0, 0, 1, 1, 1];
        (x, y)
    }

    #[test]
    fn test_fit_separable_data_perfectly() {
        let (x, y) = toy_matrix();
        let rows: Vec<usize> = (0..6).collect();
        let tree = DecisionTree::fit(&x, &y, &rows, 2, &TreeParams::default());

        for row in 0..6 {
            let features: Vec<f64> = x.row(row).to_vec();
            assert_eq!(tree.predict_row(&features), y[row]);
        }
    }

    #[test]
    fn test_fit_is_deterministic() {
        let (x, y) = toy_matrix();
        let rows: Vec<usize> = (0..6).collect();
        let a = DecisionTree::fit(&x, &y, &rows, 2, &TreeParams::default());
        let b = DecisionTree::fit(&x, &y, &rows, 2, &TreeParams::default());

        for row in 0..6 {
            let features: Vec<f64> = x.row(row).to_vec();
            assert_eq!(a.predict_row(&features), b.predict_row(&features));
        }
    }

    #[test]
    fn test_depth_cap_yields_majority_leaf() {
        let (x, y) = toy_matrix();
        let rows: Vec<usize> = (0..6).collect();
        let params = TreeParams {
            max_depth: Some(0),
            ..TreeParams::default()
        };
        let tree = DecisionTree::fit(&x, &y, &rows, 2, &params);

        // Balanced classes, ties resolve to the smaller label
        assert_eq!(tree.predict_row(&[1.0, 10.0]), 0);
        assert_eq!(tree.predict_row(&[12.0, 3.0]), 0);
    }

    #[test]
    fn test_constant_features_fall_back_to_leaf() {
        let x = Array2::from_elem((4, 2), 5.0);
        let y = vec![0, 1, 1, 1];
        let rows: Vec<usize> = (0..4).collect();
        let tree = DecisionTree::fit(&x, &y, &rows, 2, &TreeParams::default());

        assert_eq!(tree.predict_row(&[5.0, 5.0]), 1);
    }

    #[test]
    fn test_feature_subset_restricts_splits() {
        // Only feature 1 may be used; it still separates the classes
        let (x, y) = toy_matrix();
        let rows: Vec<usize> = (0..6).collect();
        let params = TreeParams {
            feature_subset: Some(vec![1]),
            ..TreeParams::default()
        };
        let tree = DecisionTree::fit(&x, &y, &rows, 2, &params);

        assert_eq!(tree.predict_row(&[0.0, 12.0]), 0);
        assert_eq!(tree.predict_row(&[0.0, 1.0]), 1);
    }
}
