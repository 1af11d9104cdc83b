use crate::{
    cost::{composition_basis_cost, PriceTable},
    error::AlloyforgeError,
    properties::{PropertyModel, SurrogatePropertyModel},
};
use alloyforge_schemas::{
    composition::Composition,
    objective::{Objective, TargetSpec, WeightSpec},
};

const STRENGTH_SCALE: f64 = 1_000.0;
const COST_SCALE: f64 = 10_000.0;
const CORROSION_SCALE: f64 = 1.0;
// Division guards; a perfect match or a free alloy must not divide by zero.
const STRENGTH_GUARD: f64 = 1.0;
const COST_GUARD: f64 = 1.0;
const CORROSION_GUARD: f64 = 0.001;

/// Targets and weights for a single optimization run.
///
/// Owned by the run and passed by reference into every evaluation, so
/// concurrent runs never observe each other's objectives.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveContext {
    targets: TargetSpec,
    weights: WeightSpec,
}

impl ObjectiveContext {
    pub fn new(targets: TargetSpec, weights: WeightSpec) -> Result<Self, AlloyforgeError> {
        for (objective, weight) in weights.iter() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(AlloyforgeError::InvalidInput(format!(
                    "weight for {:?} must be a non-negative number, got {}",
                    objective, weight
                )));
            }
        }
        for (objective, target) in targets.iter() {
            if !target.is_finite() {
                return Err(AlloyforgeError::InvalidInput(format!(
                    "target for {:?} must be finite",
                    objective
                )));
            }
        }
        Ok(Self { targets, weights })
    }

    pub fn targets(&self) -> &TargetSpec {
        &self.targets
    }

    pub fn weights(&self) -> &WeightSpec {
        &self.weights
    }
}

/// Scores compositions against an [`ObjectiveContext`]; higher is better.
///
/// Each objective is shaped as an inverse distance, which keeps every term
/// bounded and strictly increasing as the match improves. Cost is always
/// scored, even when neither targets nor weights mention it.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator<M = SurrogatePropertyModel> {
    model: M,
    prices: PriceTable,
}

impl<M: PropertyModel> FitnessEvaluator<M> {
    pub fn new(model: M, prices: PriceTable) -> Self {
        Self { model, prices }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn prices(&self) -> &PriceTable {
        &self.prices
    }

    pub fn score(&self, composition: &Composition, context: &ObjectiveContext) -> f64 {
        let props = self.model.predict(composition);
        let weights = context.weights();
        let mut score = 0.0;

        if let Some(target) = context.targets().get(Objective::Strength) {
            let miss = (props.tensile_strength - target).abs();
            score += weights.weight(Objective::Strength) * STRENGTH_SCALE / (miss + STRENGTH_GUARD);
        }

        let cost = composition_basis_cost(composition, &self.prices);
        score += weights.weight(Objective::Cost) * COST_SCALE / (cost + COST_GUARD);

        if context.targets().contains(Objective::Corrosion) {
            score += weights.weight(Objective::Corrosion) * CORROSION_SCALE
                / (props.corrosion_rate + CORROSION_GUARD);
        }

        score
    }
}

impl Default for FitnessEvaluator {
    fn default() -> Self {
        Self::new(SurrogatePropertyModel::default(), PriceTable::default())
    }
}
