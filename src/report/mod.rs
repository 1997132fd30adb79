//! Report module - console summary and JSON export

pub mod export;
pub mod summary;

pub use export::export_analysis;
pub use summary::AnalysisSummary;
