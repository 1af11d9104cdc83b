use alloyforge_schemas::composition::Composition;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    /// One value per gene, in gene-space order.
    pub genes: Vec<f64>,
    pub fitness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub generation: usize,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    pub best_so_far_fitness: f64,
    pub best_composition: Composition,
}

/// Result of one optimization run.
///
/// Best effort: the composition is the fittest one seen within the
/// generation budget and is not guaranteed to meet any target.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationOutcome {
    pub composition: Composition,
    pub fitness: f64,
    pub generations: usize,
    pub evaluations: usize,
    pub history: Vec<GenerationSummary>,
}
