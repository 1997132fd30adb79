//! Pipeline module - the table transformations, in execution order

pub mod correlation;
pub mod error;
pub mod features;
pub mod label;
pub mod loader;
pub mod prune;
pub mod split;

pub use correlation::*;
pub use error::PipelineError;
pub use features::*;
pub use label::*;
pub use loader::*;
pub use prune::*;
pub use split::*;
