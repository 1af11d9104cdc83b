use crate::composition::{element, Composition};
use crate::properties::PropertyVector;
use serde::{Deserialize, Serialize};

/// Search interval for one composition variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneBounds {
    pub element: String,
    pub low: f64,
    pub high: f64,
}

impl GeneBounds {
    pub fn new(element: impl Into<String>, low: f64, high: f64) -> Self {
        Self { element: element.into(), low, high }
    }

    pub fn span(&self) -> f64 {
        self.high - self.low
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.low, self.high)
    }
}

/// The default four-gene space: C, Cr, Ni, Mn.
pub fn default_gene_space() -> Vec<GeneBounds> {
    vec![
        GeneBounds::new(element::CARBON, 0.05, 1.0),
        GeneBounds::new(element::CHROMIUM, 0.0, 5.0),
        GeneBounds::new(element::NICKEL, 0.0, 5.0),
        GeneBounds::new(element::MANGANESE, 0.0, 2.0),
    ]
}

/// Genetic algorithm hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerSettings {
    pub population_size: usize,
    pub generations: usize,
    pub parents_mating: usize,
    /// Per-gene probability that a child gene is perturbed.
    pub mutation_probability: f64,
    /// Maximum perturbation as a fraction of the gene's span.
    pub mutation_scale: f64,
    /// Best individuals carried unchanged into the next generation.
    pub elitism: usize,
    pub seed: Option<u64>,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            population_size: 20,
            generations: 50,
            parents_mating: 5,
            mutation_probability: 0.25,
            mutation_scale: 0.1,
            elitism: 1,
            seed: None,
        }
    }
}

/// Best composition found by an optimization run, with its predicted properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlloyRecommendation {
    pub composition: Composition,
    pub fitness: f64,
    pub generations: usize,
    pub evaluations: usize,
    pub predicted_properties: PropertyVector,
}
