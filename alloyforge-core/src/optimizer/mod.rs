pub mod builder;
pub mod engine;
pub mod state;

pub use builder::OptimizerBuilder;
pub use engine::GeneticOptimizer;
pub use state::{GenerationSummary, OptimizationOutcome};
