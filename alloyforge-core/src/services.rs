//! Entry points called by hosts: property prediction, dosing plans and alloy optimization.

use crate::{
    cost::{self, PriceTable},
    dosing::{self, RecoveryTable},
    energy,
    error::AlloyforgeError,
    fitness::ObjectiveContext,
    inventory::InventoryResolver,
    optimizer::{GeneticOptimizer, OptimizationOutcome},
    properties::PropertyModel,
};
use alloyforge_schemas::{
    composition::Composition,
    dosing::{DosingLineItem, DosingPlan, HeatingProfile},
    material::MaterialRecord,
    objective::{TargetSpec, WeightSpec},
    optimizer::AlloyRecommendation,
    properties::PropertyVector,
};
use tracing::{info, warn};

/// Decimal places kept on recommended compositions.
pub const COMPOSITION_PLACES: u32 = 3;

/// Predicted properties rounded for display.
pub fn predict_properties<M: PropertyModel + ?Sized>(model: &M, composition: &Composition) -> PropertyVector {
    model.predict(composition).rounded()
}

/// Turns target compositions into stock-aware dosing plans.
#[derive(Debug, Clone, Copy)]
pub struct DosingService<'a> {
    recovery: &'a RecoveryTable,
    prices: &'a PriceTable,
    resolver: InventoryResolver<'a>,
}

impl<'a> DosingService<'a> {
    pub fn new(recovery: &'a RecoveryTable, prices: &'a PriceTable, stock: &'a [MaterialRecord]) -> Self {
        Self {
            recovery,
            prices,
            resolver: InventoryResolver::new(stock),
        }
    }

    /// One line item per element with a positive percentage, in element order.
    ///
    /// Sourcing shortfalls are reported inside the line items and never fail the call.
    pub fn compute_dosing_plan(
        &self,
        melt_mass_kg: f64,
        composition: &Composition,
        heating: Option<&HeatingProfile>,
    ) -> Result<DosingPlan, AlloyforgeError> {
        if !melt_mass_kg.is_finite() || melt_mass_kg <= 0.0 {
            return Err(AlloyforgeError::InvalidInput(format!(
                "melt mass must be a positive number of kg, got {}",
                melt_mass_kg
            )));
        }

        let line_items: Vec<DosingLineItem> = composition
            .present()
            .map(|(element, percent)| {
                let target_mass_kg = dosing::target_mass_kg(melt_mass_kg, percent);
                let recovery_rate = self.recovery.rate_for(element);
                let required_feedstock_kg = dosing::compensate_recovery(target_mass_kg, recovery_rate);
                let sourcing = self.resolver.resolve(element, required_feedstock_kg);

                DosingLineItem {
                    element: element.to_string(),
                    target_percent: percent,
                    target_mass_kg,
                    recovery_rate,
                    required_feedstock_kg,
                    sourcing,
                }
            })
            .collect();

        let cost = cost::cost(
            line_items
                .iter()
                .map(|item| (item.element.as_str(), item.required_feedstock_kg)),
            self.prices,
        );

        let melt_energy = heating
            .map(|profile| energy::estimate_melt_energy(melt_mass_kg, profile))
            .transpose()?;

        let plan = DosingPlan {
            melt_mass_kg,
            line_items,
            cost,
            melt_energy,
        };

        let shortages = plan.shortages().count();
        if shortages > 0 {
            warn!(shortages, "dosing plan has elements that cannot be sourced");
        }
        info!(
            melt_mass_kg,
            elements = plan.line_items.len(),
            total_cost = plan.cost.total,
            "dosing plan computed"
        );
        Ok(plan)
    }
}

/// Runs the optimizer for one request and reports the winner's properties.
///
/// Best effort: the recommendation is the fittest composition found and may
/// still miss the targets.
pub fn optimize_alloy<M: PropertyModel>(
    optimizer: &GeneticOptimizer<M>,
    targets: TargetSpec,
    weights: WeightSpec,
) -> Result<AlloyRecommendation, AlloyforgeError> {
    let context = ObjectiveContext::new(targets, weights)?;
    let outcome = optimizer.optimize(&context)?;
    Ok(recommend(optimizer, outcome))
}

/// [`optimize_alloy`] with the generation history written to `log_path`.
pub fn optimize_alloy_logged<M: PropertyModel>(
    optimizer: &GeneticOptimizer<M>,
    targets: TargetSpec,
    weights: WeightSpec,
    log_path: &str,
) -> Result<AlloyRecommendation, AlloyforgeError> {
    let context = ObjectiveContext::new(targets, weights)?;
    let outcome = optimizer.optimize_logged(&context, log_path)?;
    Ok(recommend(optimizer, outcome))
}

fn recommend<M: PropertyModel>(optimizer: &GeneticOptimizer<M>, outcome: OptimizationOutcome) -> AlloyRecommendation {
    let composition = outcome.composition.rounded(COMPOSITION_PLACES);
    let predicted_properties = predict_properties(optimizer.evaluator().model(), &composition);

    AlloyRecommendation {
        composition,
        fitness: outcome.fitness,
        generations: outcome.generations,
        evaluations: outcome.evaluations,
        predicted_properties,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::SurrogatePropertyModel;
    use alloyforge_schemas::{composition::element, dosing::SourcingDecision, objective::Objective};

    fn stock() -> Vec<MaterialRecord> {
        vec![MaterialRecord {
            material_id: "MAT001".to_string(),
            material_name: "Ferro-Carbon High Purity".to_string(),
            main_element: element::CARBON.to_string(),
            purity: 0.99,
            stock_kg: 5_000.0,
            recovery: 0.98,
        }]
    }

    #[test]
    fn zero_percent_elements_are_skipped() {
        let (recovery, prices, stock) = (RecoveryTable::default(), PriceTable::default(), stock());
        let service = DosingService::new(&recovery, &prices, &stock);
        let composition =
            Composition::from_pairs([(element::CARBON, 0.3), (element::NICKEL, 0.0)]).unwrap();

        let plan = service.compute_dosing_plan(1_000.0, &composition, None).unwrap();
        assert_eq!(plan.line_items.len(), 1);
        assert_eq!(plan.line_items[0].element, element::CARBON);
        assert!(matches!(plan.line_items[0].sourcing, SourcingDecision::Available { .. }));
        assert!(plan.melt_energy.is_none());
    }

    #[test]
    fn plan_cost_prices_required_feedstock() {
        let (recovery, prices, stock) = (RecoveryTable::default(), PriceTable::default(), stock());
        let service = DosingService::new(&recovery, &prices, &stock);
        let composition = Composition::from_pairs([(element::CARBON, 0.49)]).unwrap();

        let plan = service.compute_dosing_plan(1_000.0, &composition, None).unwrap();
        // 4.9 kg target / 0.98 recovery = 5 kg at 25 per kg.
        assert!((plan.cost.total - 125.0).abs() < 1e-9);
    }

    #[test]
    fn non_positive_melt_mass_is_rejected() {
        let (recovery, prices, stock) = (RecoveryTable::default(), PriceTable::default(), stock());
        let service = DosingService::new(&recovery, &prices, &stock);
        let result = service.compute_dosing_plan(0.0, &Composition::new(), None);
        assert!(matches!(result, Err(AlloyforgeError::InvalidInput(_))));
    }

    #[test]
    fn logged_recommendation_matches_unlogged() {
        let optimizer = crate::optimizer::OptimizerBuilder::new().with_seed(6).build().unwrap();
        let targets = TargetSpec::new().with(Objective::Strength, 800.0);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");

        let logged =
            optimize_alloy_logged(&optimizer, targets.clone(), WeightSpec::new(), path.to_str().unwrap()).unwrap();
        let plain = optimize_alloy(&optimizer, targets, WeightSpec::new()).unwrap();
        assert_eq!(logged, plain);
        assert!(path.exists());
    }

    #[test]
    fn prediction_is_rounded_for_display() {
        let model = SurrogatePropertyModel::default();
        let composition = Composition::from_pairs([(element::CARBON, 0.123456)]).unwrap();
        let props = predict_properties(&model, &composition);
        assert_eq!(props.tensile_strength, 398.76);
    }
}
