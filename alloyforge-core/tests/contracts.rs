use alloyforge_core::{
    optimize_alloy, predict_properties, DosingService, FitnessEvaluator, ObjectiveContext,
    OptimizerBuilder, PriceTable, RecoveryTable, SurrogatePropertyModel,
};
use alloyforge_schemas::{
    composition::{element, Composition},
    dosing::{HeatingProfile, ShortageKind, SourcingDecision},
    material::MaterialRecord,
    objective::{Objective, TargetSpec, WeightSpec},
    optimizer::OptimizerSettings,
};

fn material(id: &str, name: &str, element: &str, purity: f64, stock_kg: f64, recovery: f64) -> MaterialRecord {
    MaterialRecord {
        material_id: id.to_string(),
        material_name: name.to_string(),
        main_element: element.to_string(),
        purity,
        stock_kg,
        recovery,
    }
}

fn plant_inventory() -> Vec<MaterialRecord> {
    vec![
        material("MAT001", "Ferro-Carbon High Purity", "C", 0.99, 5_000.0, 0.98),
        material("MAT002", "Ferro-Chrome Low Carbon", "Cr", 0.65, 2_000.0, 0.92),
        material("MAT003", "Ferro-Nickel Briquettes", "Ni", 0.95, 1_500.0, 0.96),
        material("MAT004", "Ferro-Manganese Std", "Mn", 0.78, 3_000.0, 0.90),
        material("MAT005", "Ferro-Chrome High Carbon", "Cr", 0.60, 100.0, 0.88),
    ]
}

fn composition(pairs: &[(&str, f64)]) -> Composition {
    Composition::from_pairs(pairs.iter().copied()).unwrap()
}

#[test]
fn ten_tonne_heat_is_dosed_and_sourced_from_plant_stock() {
    let (recovery, prices, stock) = (RecoveryTable::default(), PriceTable::default(), plant_inventory());
    let service = DosingService::new(&recovery, &prices, &stock);

    let plan = service
        .compute_dosing_plan(10_000.0, &composition(&[(element::CARBON, 0.5), (element::CHROMIUM, 1.0)]), None)
        .unwrap();

    assert_eq!(plan.line_items.len(), 2);
    let carbon = &plan.line_items[0];
    let chromium = &plan.line_items[1];
    assert_eq!(carbon.element, "C");
    assert_eq!(chromium.element, "Cr");

    assert!((carbon.target_mass_kg - 50.0).abs() < 1e-9);
    assert!((chromium.target_mass_kg - 100.0).abs() < 1e-9);
    assert!((carbon.required_feedstock_kg - 51.02).abs() < 0.01);
    assert!((chromium.required_feedstock_kg - 108.70).abs() < 0.01);

    assert_eq!(carbon.sourcing.sourced_material().unwrap().material_id, "MAT001");
    assert_eq!(chromium.sourcing.sourced_material().unwrap().material_id, "MAT002");
    let chromium_raw = chromium.sourcing.raw_mass_needed_kg().unwrap();
    assert!((chromium_raw - chromium.required_feedstock_kg / 0.65).abs() < 1e-9);

    let expected_cost = carbon.required_feedstock_kg * 25.0 + chromium.required_feedstock_kg * 120.0;
    assert!((plan.cost.total - expected_cost).abs() < 1e-9);
    assert_eq!(plan.shortages().count(), 0);
}

#[test]
fn shortages_are_reported_without_failing_the_plan() {
    let (recovery, prices, stock) = (RecoveryTable::default(), PriceTable::default(), plant_inventory());
    let service = DosingService::new(&recovery, &prices, &stock);

    // 15 % Cr in 10 t needs about 2508 kg of the 65 % grade; only 2000 kg are on hand.
    let plan = service
        .compute_dosing_plan(
            10_000.0,
            &composition(&[(element::CHROMIUM, 15.0), ("Mo", 0.2), (element::NICKEL, 5.0)]),
            None,
        )
        .unwrap();

    let by_element = |symbol: &str| plan.line_items.iter().find(|item| item.element == symbol).unwrap();

    assert!(matches!(
        by_element("Cr").sourcing,
        SourcingDecision::Unavailable { shortage: ShortageKind::InsufficientStock, .. }
    ));
    let molybdenum = by_element("Mo");
    assert!(matches!(
        molybdenum.sourcing,
        SourcingDecision::Unavailable { shortage: ShortageKind::NoMaterialFound, .. }
    ));
    // Untracked elements assume full recovery and cost nothing.
    assert_eq!(molybdenum.recovery_rate, 1.0);
    assert_eq!(plan.cost.per_element["Mo"], 0.0);

    assert!(matches!(by_element("Ni").sourcing, SourcingDecision::Available { .. }));
    assert_eq!(plan.shortages().count(), 2);
}

#[test]
fn short_high_grade_falls_back_to_substitute() {
    let mut stock = plant_inventory();
    stock[1].stock_kg = 50.0;
    stock[4].stock_kg = 1_000.0;
    let (recovery, prices) = (RecoveryTable::default(), PriceTable::default());
    let service = DosingService::new(&recovery, &prices, &stock);

    let plan = service
        .compute_dosing_plan(10_000.0, &composition(&[(element::CHROMIUM, 1.0)]), None)
        .unwrap();

    match &plan.line_items[0].sourcing {
        SourcingDecision::Substituted { original, substitute, reason, .. } => {
            assert_eq!(original.material_id, "MAT002");
            assert_eq!(substitute.material_id, "MAT005");
            assert_eq!(
                reason,
                "Insufficient stock of Ferro-Chrome Low Carbon. Switched to Ferro-Chrome High Carbon."
            );
        }
        other => panic!("expected a substitution, got {:?}", other),
    }
}

#[test]
fn heating_profile_adds_melt_energy() {
    let (recovery, prices, stock) = (RecoveryTable::default(), PriceTable::default(), plant_inventory());
    let service = DosingService::new(&recovery, &prices, &stock);
    let heating = HeatingProfile {
        specific_heat: 0.46,
        delta_t: 1_500.0,
        efficiency: 0.7,
        grid_factor: 0.82,
    };

    let plan = service
        .compute_dosing_plan(10_000.0, &composition(&[(element::CARBON, 0.2)]), Some(&heating))
        .unwrap();
    let energy = plan.melt_energy.unwrap();
    assert!((energy.energy_kwh - 2_738.095).abs() < 0.01);
    assert!((energy.co2_tonnes - 2.2452).abs() < 0.0001);
}

#[test]
fn strength_target_is_reached_in_most_seeded_runs() {
    let targets = TargetSpec::new().with(Objective::Strength, 900.0);
    let weights = WeightSpec::new().with(Objective::Strength, 100.0).with(Objective::Cost, 1.0);
    let model = SurrogatePropertyModel::default();

    let hits = (0..10u64)
        .filter(|seed| {
            let optimizer = OptimizerBuilder::new().with_seed(*seed).build().unwrap();
            let recommendation = optimize_alloy(&optimizer, targets.clone(), weights.clone()).unwrap();
            let strength = predict_properties(&model, &recommendation.composition).tensile_strength;
            (strength - 900.0).abs() <= 45.0
        })
        .count();

    assert!(hits >= 8, "only {} of 10 runs landed within 5 % of 900 MPa", hits);
}

#[test]
fn recommendation_is_rounded_and_reports_its_own_properties() {
    let optimizer = OptimizerBuilder::new().with_seed(4).build().unwrap();
    let recommendation = optimize_alloy(
        &optimizer,
        TargetSpec::new().with(Objective::Strength, 1_000.0),
        WeightSpec::new().with(Objective::Strength, 50.0),
    )
    .unwrap();

    for (_, percent) in recommendation.composition.iter() {
        assert_eq!(percent, (percent * 1_000.0).round() / 1_000.0);
    }
    let expected = predict_properties(&SurrogatePropertyModel::default(), &recommendation.composition);
    assert_eq!(recommendation.predicted_properties, expected);
    assert_eq!(recommendation.evaluations, 20 * 51);
}

#[test]
fn cost_is_scored_even_without_a_cost_target_or_weight() {
    let evaluator = FitnessEvaluator::new(SurrogatePropertyModel::default(), PriceTable::default());
    let context = ObjectiveContext::new(TargetSpec::new(), WeightSpec::new()).unwrap();

    let lean = composition(&[(element::CARBON, 0.1)]);
    let nickel_rich = composition(&[(element::CARBON, 0.1), (element::NICKEL, 3.0)]);
    assert!(evaluator.score(&lean, &context) > evaluator.score(&nickel_rich, &context));

    // With nothing else to chase, the search heads for the cheapest corner of the box.
    let optimizer = OptimizerBuilder::new().with_seed(2).build().unwrap();
    let recommendation = optimize_alloy(&optimizer, TargetSpec::new(), WeightSpec::new()).unwrap();
    assert!(recommendation.composition.get(element::NICKEL) < 0.5);
}

#[test]
fn concurrent_runs_do_not_share_objectives() {
    let settings = OptimizerSettings { generations: 20, seed: Some(17), ..Default::default() };
    let optimizer = OptimizerBuilder::new().with_settings(settings).build().unwrap();

    let strong = ObjectiveContext::new(
        TargetSpec::new().with(Objective::Strength, 1_200.0),
        WeightSpec::new().with(Objective::Strength, 100.0),
    )
    .unwrap();
    let mild = ObjectiveContext::new(
        TargetSpec::new().with(Objective::Strength, 500.0),
        WeightSpec::new().with(Objective::Strength, 100.0),
    )
    .unwrap();

    let sequential = (optimizer.optimize(&strong).unwrap(), optimizer.optimize(&mild).unwrap());
    let concurrent = std::thread::scope(|scope| {
        let a = scope.spawn(|| optimizer.optimize(&strong).unwrap());
        let b = scope.spawn(|| optimizer.optimize(&mild).unwrap());
        (a.join().unwrap(), b.join().unwrap())
    });

    assert_eq!(sequential, concurrent);
}
