//! Bagged random-forest classifier
//!
//! An ensemble of CART trees, each fitted on a bootstrap sample of
//! the training rows with a random feature subset (random subspace).
//! All randomness comes from one seeded generator, so a given seed
//! always produces the same forest.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::ml::tree::{DecisionTree, TreeParams};

/// A fitted forest over encoded class labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_classes: usize,
}

impl RandomForest {
    /// Fit `n_trees` bagged trees on the given training rows.
    pub fn fit(
        x: &Array2<f64>,
        y: &[usize],
        rows: &[usize],
        n_classes: usize,
        n_trees: usize,
        max_depth: Option<usize>,
        seed: u64,
    ) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let n_features = x.ncols();
        // Classic mtry: floor(sqrt(p)), at least one feature
        let mtry = ((n_features as f64).sqrt().floor() as usize).max(1);
        // An empty ensemble cannot vote; a misconfigured size of 0
        // still yields a usable single-tree forest
        let n_trees = n_trees.max(1);

        let trees = (0..n_trees)
            .map(|_| {
                let sample: Vec<usize> = (0..rows.len())
                    .map(|_| rows[rng.gen_range(0..rows.len())])
                    .collect();

                let mut features: Vec<usize> = (0..n_features).collect();
                features.shuffle(&mut rng);
                features.truncate(mtry);
                features.sort_unstable();

                let params = TreeParams {
                    max_depth,
                    min_samples_split: 2,
                    feature_subset: Some(features),
                };
                DecisionTree::fit(x, y, &sample, n_classes, &params)
            })
            .collect();

        Self { trees, n_classes }
    }

    /// Predict by majority vote; ties resolve to the smallest label.
    pub fn predict_row(&self, features: &[f64]) -> usize {
        self.vote(features).0
    }

    /// Predict with the vote fraction for the winning class, the
    /// forest's per-class probability estimate.
    pub fn predict_row_with_confidence(&self, features: &[f64]) -> (usize, f64) {
        let (label, votes) = self.vote(features);
        (label, votes as f64 / self.trees.len() as f64)
    }

    fn vote(&self, features: &[f64]) -> (usize, usize) {
        let mut votes = vec![0usize; self.n_classes];
        for tree in &self.trees {
            votes[tree.predict_row(features)] += 1;
        }
        votes
            .iter()
            .enumerate()
            .max_by(|(class_a, votes_a), (class_b, votes_b)| {
                votes_a.cmp(votes_b).then(class_b.cmp(class_a))
            })
            .map(|(class, &count)| (class, count))
            .unwrap_or((0, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_matrix() -> (Array2<f64>, Vec<usize>) {
        let mut flat = Vec::new();
        let mut y = Vec::new();
        for i in 0..10 {
            flat.extend_from_slice(&[1.0 + i as f64 * 0.1, 10.0, 5.0]);
            y.push(0);
            flat.extend_from_slice(&[9.0 + i as f64 * 0.1, 2.0, 5.0]);
            y.push(1);
        }
        (Array2::from_shape_vec((20, 3), flat).unwrap(), y)
    }

    #[test]
    fn test_forest_separates_classes() {
        let (x, y) = toy_matrix();
        let rows: Vec<usize> = (0..20).collect();
        let forest = RandomForest::fit(&x, &y, &rows, 2, 25, None, 42);

        assert_eq!(forest.predict_row(&[1.2, 10.0, 5.0]), 0);
        assert_eq!(forest.predict_row(&[9.4, 2.0, 5.0]), 1);
    }

    #[test]
    fn test_forest_is_deterministic_for_fixed_seed() {
        let (x, y) = toy_matrix();
        let rows: Vec<usize> = (0..20).collect();
        let a = RandomForest::fit(&x, &y, &rows, 2, 25, None, 7);
        let b = RandomForest::fit(&x, &y, &rows, 2, 25, None, 7);

        for row in 0..20 {
            let features: Vec<f64> = x.row(row).to_vec();
            assert_eq!(
                a.predict_row_with_confidence(&features),
                b.predict_row_with_confidence(&features)
            );
        }
    }

    #[test]
    fn test_zero_trees_clamps_to_one() {
        let (x, y) = toy_matrix();
        let rows: Vec<usize> = (0..20).collect();
        let forest = RandomForest::fit(&x, &y, &rows, 2, 0, None, 42);

        let (label, confidence) = forest.predict_row_with_confidence(&[1.2, 10.0, 5.0]);
        assert!(label < 2);
        assert!(confidence.is_finite());
        assert_eq!(confidence, 1.0);
    }

    #[test]
    fn test_confidence_is_a_vote_fraction() {
        let (x, y) = toy_matrix();
        let rows: Vec<usize> = (0..20).collect();
        let forest = RandomForest::fit(&x, &y, &rows, 2, 25, None, 42);

        let (_, confidence) = forest.predict_row_with_confidence(&[1.0, 10.0, 5.0]);
        assert!(confidence > 0.0 && confidence <= 1.0);
    }
}
