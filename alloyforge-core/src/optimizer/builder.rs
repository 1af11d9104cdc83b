use crate::{
    cost::PriceTable,
    error::AlloyforgeError,
    fitness::FitnessEvaluator,
    optimizer::engine::GeneticOptimizer,
    properties::{PropertyModel, SurrogatePropertyModel},
};
use alloyforge_schemas::optimizer::{default_gene_space, GeneBounds, OptimizerSettings};
use std::collections::HashSet;

/// A fluent builder for constructing a `GeneticOptimizer`.
///
/// Starts from the surrogate property model, the default price table, the
/// four-gene C/Cr/Ni/Mn space and default hyperparameters; each can be replaced.
pub struct OptimizerBuilder<M = SurrogatePropertyModel> {
    model: M,
    prices: PriceTable,
    gene_space: Vec<GeneBounds>,
    settings: OptimizerSettings,
}

impl OptimizerBuilder {
    pub fn new() -> Self {
        Self {
            model: SurrogatePropertyModel::default(),
            prices: PriceTable::default(),
            gene_space: default_gene_space(),
            settings: OptimizerSettings::default(),
        }
    }
}

impl Default for OptimizerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: PropertyModel> OptimizerBuilder<M> {
    /// Swaps in another property model.
    pub fn with_model<N: PropertyModel>(self, model: N) -> OptimizerBuilder<N> {
        OptimizerBuilder {
            model,
            prices: self.prices,
            gene_space: self.gene_space,
            settings: self.settings,
        }
    }

    pub fn with_prices(mut self, prices: PriceTable) -> Self {
        self.prices = prices;
        self
    }

    pub fn with_gene_space(mut self, gene_space: Vec<GeneBounds>) -> Self {
        self.gene_space = gene_space;
        self
    }

    pub fn with_settings(mut self, settings: OptimizerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Fixes the random seed so every run of the built optimizer is reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.settings.seed = Some(seed);
        self
    }

    /// Consumes the builder and returns a validated `GeneticOptimizer`.
    ///
    /// # Errors
    ///
    /// Returns `AlloyforgeError::ConfigError` for an empty or malformed gene
    /// space and for hyperparameters the algorithm cannot run with.
    pub fn build(self) -> Result<GeneticOptimizer<M>, AlloyforgeError> {
        validate_gene_space(&self.gene_space)?;
        validate_settings(&self.settings)?;

        Ok(GeneticOptimizer {
            evaluator: FitnessEvaluator::new(self.model, self.prices),
            gene_space: self.gene_space,
            settings: self.settings,
        })
    }
}

fn validate_gene_space(gene_space: &[GeneBounds]) -> Result<(), AlloyforgeError> {
    if gene_space.is_empty() {
        return Err(AlloyforgeError::ConfigError("gene space is empty".to_string()));
    }

    let mut seen = HashSet::new();
    for gene in gene_space {
        if !seen.insert(gene.element.as_str()) {
            return Err(AlloyforgeError::ConfigError(format!(
                "element '{}' appears twice in the gene space",
                gene.element
            )));
        }
        if !gene.low.is_finite() || !gene.high.is_finite() {
            return Err(AlloyforgeError::ConfigError(format!(
                "bounds for '{}' must be finite",
                gene.element
            )));
        }
        if gene.low < 0.0 || gene.low > gene.high {
            return Err(AlloyforgeError::ConfigError(format!(
                "bounds for '{}' must satisfy 0 <= low <= high, got [{}, {}]",
                gene.element, gene.low, gene.high
            )));
        }
    }
    Ok(())
}

fn validate_settings(settings: &OptimizerSettings) -> Result<(), AlloyforgeError> {
    let fail = |msg: String| Err(AlloyforgeError::ConfigError(msg));

    if settings.population_size < 2 {
        return fail(format!("population_size must be at least 2, got {}", settings.population_size));
    }
    if settings.generations == 0 {
        return fail("generations must be at least 1".to_string());
    }
    if settings.parents_mating == 0 || settings.parents_mating > settings.population_size {
        return fail(format!(
            "parents_mating must be within 1..={}, got {}",
            settings.population_size, settings.parents_mating
        ));
    }
    if settings.elitism == 0 || settings.elitism >= settings.population_size {
        return fail(format!(
            "elitism must be within 1..{}, got {}",
            settings.population_size, settings.elitism
        ));
    }
    if !(0.0..=1.0).contains(&settings.mutation_probability) {
        return fail(format!(
            "mutation_probability must be within [0, 1], got {}",
            settings.mutation_probability
        ));
    }
    if !settings.mutation_scale.is_finite() || settings.mutation_scale <= 0.0 {
        return fail(format!("mutation_scale must be positive, got {}", settings.mutation_scale));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_build() {
        let optimizer = OptimizerBuilder::new().build().unwrap();
        assert_eq!(optimizer.gene_space().len(), 4);
        assert_eq!(optimizer.settings().population_size, 20);
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let result = OptimizerBuilder::new()
            .with_gene_space(vec![GeneBounds::new("C", 1.0, 0.5)])
            .build();
        assert!(matches!(result, Err(AlloyforgeError::ConfigError(_))));
    }

    #[test]
    fn negative_lower_bound_is_rejected() {
        let result = OptimizerBuilder::new()
            .with_gene_space(vec![GeneBounds::new("Ni", -0.1, 1.0)])
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn duplicate_genes_and_empty_space_are_rejected() {
        assert!(OptimizerBuilder::new().with_gene_space(vec![]).build().is_err());
        let duplicated = vec![GeneBounds::new("Cr", 0.0, 1.0), GeneBounds::new("Cr", 0.0, 2.0)];
        assert!(OptimizerBuilder::new().with_gene_space(duplicated).build().is_err());
    }

    #[test]
    fn mating_pool_cannot_exceed_population() {
        let settings = OptimizerSettings { population_size: 4, parents_mating: 5, ..Default::default() };
        assert!(OptimizerBuilder::new().with_settings(settings).build().is_err());
    }

    #[test]
    fn seed_is_recorded_in_settings() {
        let optimizer = OptimizerBuilder::new().with_seed(42).build().unwrap();
        assert_eq!(optimizer.settings().seed, Some(42));
    }
}
