pub mod differentiator;
pub mod evaluator;
pub mod traits;
