//! Classifier training, persistence and inference

pub mod dataset;
pub mod forest;
pub mod predictor;
pub mod trainer;
pub mod tree;

pub use dataset::Dataset;
pub use forest::RandomForest;
pub use predictor::CropPredictor;
pub use trainer::{ModelArtifact, ModelFamily, ModelTrainer, TrainedModel};
pub use tree::{DecisionTree, TreeParams};
