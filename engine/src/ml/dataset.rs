//! Labeled sample table loading and train/test splitting
//!
//! The CSV column order (N, P, K, ph, rainfall, temperature,
//! humidity, label) matches the positional feature contract in
//! `shared::FeatureVector`. The distinct labels observed at load time
//! become the classifier's entire prediction vocabulary.

use std::collections::BTreeMap;
use std::path::Path;

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Deserialize;
use shared::FeatureVector;

use crate::error::{AppError, AppResult};

/// One row of the labeled sample table.
#[derive(Debug, Deserialize)]
struct SampleRow {
    #[serde(rename = "N")]
    nitrogen: f64,
    #[serde(rename = "P")]
    phosphorus: f64,
    #[serde(rename = "K")]
    potassium: f64,
    ph: f64,
    rainfall: f64,
    temperature: f64,
    humidity: f64,
    label: String,
}

/// The labeled training table in matrix form.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// `n_samples x 7` feature matrix in contract column order
    pub records: Array2<f64>,
    /// Encoded class per row, indexing into `labels`
    pub targets: Vec<usize>,
    /// Distinct crop labels, sorted; the only legal prediction set
    pub labels: Vec<String>,
}

impl Dataset {
    /// Load the labeled sample table from a CSV file.
    pub fn from_csv(path: &Path) -> AppResult<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut rows = Vec::new();
        for record in reader.deserialize() {
            let row: SampleRow = record?;
            rows.push((
                [
                    row.nitrogen,
                    row.phosphorus,
                    row.potassium,
                    row.ph,
                    row.rainfall,
                    row.temperature,
                    row.humidity,
                ],
                row.label,
            ));
        }
        Self::from_rows(rows)
    }

    /// Build a dataset from already-parsed rows.
    ///
    /// Label encoding is alphabetical, so the encoded classes do not
    /// depend on row order.
    pub fn from_rows(rows: Vec<([f64; FeatureVector::LEN], String)>) -> AppResult<Self> {
        let mut label_index: BTreeMap<String, usize> = BTreeMap::new();
        for (_, label) in &rows {
            let next = label_index.len();
            label_index.entry(label.clone()).or_insert(next);
        }
        // BTreeMap iterates sorted; re-number so encoding follows
        // alphabetical order rather than first appearance.
        let labels: Vec<String> = label_index.keys().cloned().collect();
        for (position, index) in label_index.values_mut().enumerate() {
            *index = position;
        }

        let n_samples = rows.len();
        let mut flat = Vec::with_capacity(n_samples * FeatureVector::LEN);
        let mut targets = Vec::with_capacity(n_samples);
        for (features, label) in rows {
            flat.extend_from_slice(&features);
            targets.push(label_index[&label]);
        }

        let records = Array2::from_shape_vec((n_samples, FeatureVector::LEN), flat)
            .map_err(|e| AppError::InvalidInput(format!("malformed sample table: {e}")))?;

        Ok(Self {
            records,
            targets,
            labels,
        })
    }

    pub fn n_samples(&self) -> usize {
        self.targets.len()
    }

    pub fn n_classes(&self) -> usize {
        self.labels.len()
    }

    /// Split row indices into (train, test) partitions.
    ///
    /// Stratified per label when every class has at least 2 samples
    /// and the table has at least `stratify_min_rows` rows; otherwise
    /// falls back to an unstratified shuffle split so small academic
    /// tables never hard-fail. Seeded, so the partition is
    /// reproducible.
    pub fn split(
        &self,
        test_fraction: f64,
        seed: u64,
        stratify_min_rows: usize,
    ) -> (Vec<usize>, Vec<usize>) {
        let mut rng = StdRng::seed_from_u64(seed);
        let n = self.n_samples();

        let mut class_counts = vec![0usize; self.n_classes()];
        for &target in &self.targets {
            class_counts[target] += 1;
        }
        let stratify =
            n >= stratify_min_rows && class_counts.iter().all(|&count| count >= 2);

        if stratify {
            let mut train = Vec::new();
            let mut test = Vec::new();
            for class in 0..self.n_classes() {
                let mut members: Vec<usize> = (0..n)
                    .filter(|&row| self.targets[row] == class)
                    .collect();
                members.shuffle(&mut rng);
                let take = Self::test_count(members.len(), test_fraction);
                test.extend_from_slice(&members[..take]);
                train.extend_from_slice(&members[take..]);
            }
            (train, test)
        } else {
            let mut indices: Vec<usize> = (0..n).collect();
            indices.shuffle(&mut rng);
            let take = Self::test_count(n, test_fraction);
            let test = indices[..take].to_vec();
            let train = indices[take..].to_vec();
            (train, test)
        }
    }

    /// Held-out count: at least one test row, at least one train row.
    fn test_count(n: usize, test_fraction: f64) -> usize {
        if n < 2 {
            return 0;
        }
        let raw = (n as f64 * test_fraction).round() as usize;
        raw.clamp(1, n - 1)
    }
}
