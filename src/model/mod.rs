//! Model module - the tree-ensemble classifier and its evaluation

pub mod forest;
pub mod metrics;
pub mod tree;

pub use forest::RandomForestClassifier;
pub use metrics::*;
pub use tree::{DecisionTree, TreeParams};
