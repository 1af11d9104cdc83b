use super::state::{GenerationSummary, Individual, OptimizationOutcome};
use crate::{
    error::AlloyforgeError,
    fitness::{FitnessEvaluator, ObjectiveContext},
    logger::GenerationLogger,
    properties::PropertyModel,
};
use alloyforge_schemas::{
    composition::Composition,
    optimizer::{GeneBounds, OptimizerSettings},
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info};

/// Genetic algorithm over a bounded continuous composition space.
///
/// Holds no per-run state: every call to [`GeneticOptimizer::optimize`]
/// creates its own population and RNG and reads objectives only from the
/// context it is given, so one optimizer can serve concurrent runs.
pub struct GeneticOptimizer<M> {
    pub(super) evaluator: FitnessEvaluator<M>,
    pub(super) gene_space: Vec<GeneBounds>,
    pub(super) settings: OptimizerSettings,
}

impl<M: PropertyModel> GeneticOptimizer<M> {
    pub fn evaluator(&self) -> &FitnessEvaluator<M> {
        &self.evaluator
    }

    pub fn gene_space(&self) -> &[GeneBounds] {
        &self.gene_space
    }

    pub fn settings(&self) -> &OptimizerSettings {
        &self.settings
    }

    /// Runs the full generation budget and returns the fittest individual ever seen.
    ///
    /// Generation 0 is the random initial population; each of the
    /// `generations` that follow is bred from the previous one.
    pub fn optimize(&self, context: &ObjectiveContext) -> Result<OptimizationOutcome, AlloyforgeError> {
        self.run(context, None)
    }

    /// Same as [`GeneticOptimizer::optimize`], writing one CSV row per generation to `log_path`.
    ///
    /// The file belongs to this call only; concurrent runs need distinct paths.
    pub fn optimize_logged(
        &self,
        context: &ObjectiveContext,
        log_path: &str,
    ) -> Result<OptimizationOutcome, AlloyforgeError> {
        let mut logger =
            GenerationLogger::new(log_path).map_err(|e| AlloyforgeError::FileIO(log_path.to_string(), e))?;
        self.run(context, Some(&mut logger))
    }

    fn run(
        &self,
        context: &ObjectiveContext,
        mut logger: Option<&mut GenerationLogger>,
    ) -> Result<OptimizationOutcome, AlloyforgeError> {
        let mut rng = match self.settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        info!(
            population = self.settings.population_size,
            generations = self.settings.generations,
            genes = self.gene_space.len(),
            "starting composition search"
        );

        let mut population: Vec<Vec<f64>> = (0..self.settings.population_size)
            .map(|_| self.random_genes(&mut rng))
            .collect();
        let mut best: Option<Individual> = None;
        let mut history = Vec::with_capacity(self.settings.generations + 1);
        let mut evaluations = 0;

        for generation in 0..=self.settings.generations {
            let mut scored = self.evaluate(population, context)?;
            evaluations += scored.len();
            scored.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));

            let leader = &scored[0];
            if best.as_ref().map_or(true, |b| leader.fitness > b.fitness) {
                best = Some(leader.clone());
            }
            let best_so_far = best.as_ref().unwrap_or(leader);

            let summary = GenerationSummary {
                generation,
                best_fitness: leader.fitness,
                mean_fitness: scored.iter().map(|i| i.fitness).sum::<f64>() / scored.len() as f64,
                best_so_far_fitness: best_so_far.fitness,
                best_composition: self.compose(&best_so_far.genes)?,
            };
            debug!(
                generation,
                best = summary.best_fitness,
                mean = summary.mean_fitness,
                best_so_far = summary.best_so_far_fitness,
                "generation evaluated"
            );
            if let Some(logger) = logger.as_deref_mut() {
                logger.log_generation(&summary)?;
            }
            history.push(summary);

            population = if generation < self.settings.generations {
                self.next_generation(&scored, &mut rng)
            } else {
                Vec::new()
            };
        }

        let best = best.ok_or_else(|| {
            AlloyforgeError::ConfigError("optimizer finished without evaluating any individual".to_string())
        })?;
        info!(fitness = best.fitness, evaluations, "composition search finished");

        Ok(OptimizationOutcome {
            composition: self.compose(&best.genes)?,
            fitness: best.fitness,
            generations: self.settings.generations,
            evaluations,
            history,
        })
    }

    fn compose(&self, genes: &[f64]) -> Result<Composition, AlloyforgeError> {
        let pairs = self
            .gene_space
            .iter()
            .zip(genes)
            .map(|(gene, value)| (gene.element.clone(), *value));
        Ok(Composition::from_pairs(pairs)?)
    }

    fn evaluate(
        &self,
        population: Vec<Vec<f64>>,
        context: &ObjectiveContext,
    ) -> Result<Vec<Individual>, AlloyforgeError> {
        population
            .into_par_iter()
            .map(|genes| {
                let composition = self.compose(&genes)?;
                let fitness = self.evaluator.score(&composition, context);
                Ok(Individual { genes, fitness })
            })
            .collect()
    }

    fn random_genes(&self, rng: &mut StdRng) -> Vec<f64> {
        self.gene_space
            .iter()
            .map(|gene| rng.random_range(gene.low..=gene.high))
            .collect()
    }

    /// Elites carry over unchanged; the rest are children of the mating pool.
    ///
    /// `ranked` must be sorted by fitness, best first.
    fn next_generation(&self, ranked: &[Individual], rng: &mut StdRng) -> Vec<Vec<f64>> {
        let size = self.settings.population_size;
        let pool = &ranked[..self.settings.parents_mating.min(ranked.len())];

        let mut next: Vec<Vec<f64>> = ranked
            .iter()
            .take(self.settings.elitism)
            .map(|i| i.genes.clone())
            .collect();

        let mut k = 0;
        while next.len() < size {
            let first = &pool[k % pool.len()];
            let second = &pool[(k + 1) % pool.len()];
            let mut child = self.crossover(&first.genes, &second.genes, rng);
            self.mutate(&mut child, rng);
            next.push(child);
            k += 1;
        }
        next
    }

    /// Single-point crossover: head from `first`, tail from `second`.
    fn crossover(&self, first: &[f64], second: &[f64], rng: &mut StdRng) -> Vec<f64> {
        let len = first.len();
        if len < 2 {
            return first.to_vec();
        }
        let point = rng.random_range(1..len);
        first[..point].iter().chain(&second[point..]).copied().collect()
    }

    /// Perturbs genes within their bounds; at least one gene always moves.
    fn mutate(&self, genes: &mut [f64], rng: &mut StdRng) {
        let mut mutated = false;
        for (value, gene) in genes.iter_mut().zip(&self.gene_space) {
            if rng.random_bool(self.settings.mutation_probability) {
                *value = self.perturb(*value, gene, rng);
                mutated = true;
            }
        }
        if !mutated {
            let index = rng.random_range(0..genes.len());
            genes[index] = self.perturb(genes[index], &self.gene_space[index], rng);
        }
    }

    fn perturb(&self, value: f64, gene: &GeneBounds, rng: &mut StdRng) -> f64 {
        let reach = gene.span() * self.settings.mutation_scale;
        if reach <= 0.0 {
            return gene.clamp(value);
        }
        gene.clamp(value + rng.random_range(-reach..=reach))
    }
}
