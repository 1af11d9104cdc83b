use crate::config::KnowledgeBase;
use crate::plotting;
use crate::requests::KG_PER_TONNE;
use alloyforge_core::{
    inventory::InventoryResolver, optimize_alloy_logged, predict_properties, DosingService,
    SurrogatePropertyModel,
};
use alloyforge_schemas::{
    composition::Composition,
    dosing::{DosingPlan, HeatingProfile, SourcingDecision},
    objective::{TargetSpec, WeightSpec},
    optimizer::AlloyRecommendation,
    properties::PropertyVector,
    request::EngineRequest,
};
use anyhow::{Context, Result};
use serde::Serialize;
use std::{fs, path::Path};
use tracing::info;

/// One row of the dosing CSV report.
#[derive(Debug, Serialize)]
struct DosingRow<'a> {
    element: &'a str,
    target_percent: f64,
    target_mass_kg: f64,
    recovery_rate: f64,
    required_feedstock_kg: f64,
    status: &'static str,
    material_id: &'a str,
    raw_mass_kg: Option<f64>,
    cost: f64,
    note: &'a str,
}

/// Runs every request of a request file, writing reports and plots into `output_dir`.
pub fn run_requests(requests: &[EngineRequest], kb: &KnowledgeBase, output_dir: &str) -> Result<()> {
    for (index, request) in requests.iter().enumerate() {
        let stem = format!("{:02}_{}", index + 1, request.kind());
        println!("\n--- [Workflow] Request {}: {} ---", index + 1, request.kind());
        info!(index = index + 1, kind = request.kind(), "running request");

        match request {
            EngineRequest::PredictProperties { composition } => {
                let props = predict_properties(&SurrogatePropertyModel::default(), composition);
                write_json(output_dir, &stem, &props)?;
                print_properties_report(composition, &props);
            }
            EngineRequest::ComputeDosing { melt_mass_tons, composition, heating } => {
                dose_and_report(kb, output_dir, &stem, *melt_mass_tons, composition, heating.as_ref())?;
            }
            EngineRequest::OptimizeAlloy { targets, weights } => {
                optimize_and_report(kb, output_dir, &stem, targets, weights)?;
            }
            EngineRequest::DesignAndDose { targets, weights, melt_mass_tons, heating } => {
                let recommendation = optimize_and_report(kb, output_dir, &stem, targets, weights)?;
                dose_and_report(
                    kb,
                    output_dir,
                    &format!("{}_dosing", stem),
                    *melt_mass_tons,
                    &recommendation.composition,
                    heating.as_ref(),
                )?;
            }
        }
    }
    Ok(())
}

fn optimize_and_report(
    kb: &KnowledgeBase,
    output_dir: &str,
    stem: &str,
    targets: &TargetSpec,
    weights: &WeightSpec,
) -> Result<AlloyRecommendation> {
    let log_path = Path::new(output_dir).join(format!("{}_generations.csv", stem));
    let log_path = log_path.to_str().context("Output path is not valid UTF-8")?;

    let optimizer = kb.optimizer_builder().build().context("Failed to build the optimizer")?;
    let recommendation = optimize_alloy_logged(&optimizer, targets.clone(), weights.clone(), log_path)?;

    write_json(output_dir, stem, &recommendation)?;
    plotting::plot_convergence(&format!("{}/{}_convergence.png", output_dir, stem), log_path)?;
    print_recommendation_report(&recommendation);
    Ok(recommendation)
}

fn dose_and_report(
    kb: &KnowledgeBase,
    output_dir: &str,
    stem: &str,
    melt_mass_tons: f64,
    composition: &Composition,
    heating: Option<&HeatingProfile>,
) -> Result<DosingPlan> {
    let service = DosingService::new(&kb.recovery, &kb.prices, &kb.materials);
    let plan = service.compute_dosing_plan(melt_mass_tons * KG_PER_TONNE, composition, heating)?;

    write_json(output_dir, stem, &plan)?;
    write_dosing_csv(&Path::new(output_dir).join(format!("{}.csv", stem)), &plan)?;
    if !plan.line_items.is_empty() {
        plotting::plot_dosing_plan(&format!("{}/{}_feedstock.png", output_dir, stem), &plan)?;
    }
    print_dosing_report(&plan);
    Ok(plan)
}

fn write_json<T: Serialize>(output_dir: &str, stem: &str, value: &T) -> Result<()> {
    let path = Path::new(output_dir).join(format!("{}.json", stem));
    let body = serde_json::to_string_pretty(value)?;
    fs::write(&path, body).with_context(|| format!("Failed to write {:?}", path))
}

pub fn write_dosing_csv(path: &Path, plan: &DosingPlan) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("Failed to create {:?}", path))?;

    for item in &plan.line_items {
        let note = match &item.sourcing {
            SourcingDecision::Substituted { reason, .. }
            | SourcingDecision::Unavailable { reason, .. } => reason.as_str(),
            SourcingDecision::Available { .. } => "",
        };
        writer.serialize(DosingRow {
            element: &item.element,
            target_percent: item.target_percent,
            target_mass_kg: item.target_mass_kg,
            recovery_rate: item.recovery_rate,
            required_feedstock_kg: item.required_feedstock_kg,
            status: item.sourcing.status_label(),
            material_id: item
                .sourcing
                .sourced_material()
                .map_or("", |m| m.material_id.as_str()),
            raw_mass_kg: item.sourcing.raw_mass_needed_kg(),
            cost: plan.cost.per_element.get(&item.element).copied().unwrap_or(0.0),
            note,
        })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn print_properties_report(composition: &Composition, props: &PropertyVector) {
    println!("========================================");
    println!("Composition:");
    for (element, percent) in composition.iter() {
        println!("  - {:<3} {:>7.3} %", element, percent);
    }
    println!("\nPredicted Properties:");
    println!("  - Tensile Strength:  {:>10.2} MPa", props.tensile_strength);
    println!("  - Hardness:          {:>10.2} HV", props.hardness);
    println!("  - Density:           {:>10.2} g/cm³", props.density);
    println!("  - Corrosion Rate:    {:>10.4} mm/year", props.corrosion_rate);
    println!("========================================");
}

pub fn print_recommendation_report(recommendation: &AlloyRecommendation) {
    println!("\n--- [Optimizer Recommendation] ---");
    println!(
        "Fitness {:.3} after {} generations ({} evaluations)",
        recommendation.fitness, recommendation.generations, recommendation.evaluations
    );
    print_properties_report(&recommendation.composition, &recommendation.predicted_properties);
}

pub fn print_dosing_report(plan: &DosingPlan) {
    println!("\n--- [Dosing Plan] ---");
    println!("========================================");
    println!("Melt Mass: {:.1} kg", plan.melt_mass_kg);
    println!("----------------------------------------");
    for item in &plan.line_items {
        println!(
            "  - {:<3} target {:>6.3} % = {:>9.2} kg | recovery {:.2} | feedstock {:>9.2} kg",
            item.element, item.target_percent, item.target_mass_kg, item.recovery_rate, item.required_feedstock_kg
        );
        match (item.sourcing.sourced_material(), item.sourcing.raw_mass_needed_kg()) {
            (Some(material), Some(raw)) => println!(
                "      [{}] {} ({}): {:.2} kg raw",
                item.sourcing.status_label(),
                material.material_name,
                material.material_id,
                raw
            ),
            _ => println!("      [{}]", item.sourcing.status_label()),
        }
        if let SourcingDecision::Substituted { reason, .. }
        | SourcingDecision::Unavailable { reason, .. } = &item.sourcing
        {
            println!("      {}", reason);
        }
    }

    println!("\nFeedstock Cost:");
    for (element, cost) in &plan.cost.per_element {
        println!("  - {:<3} ${:>12.2}", element, cost);
    }
    println!("  --------------------------------------");
    println!("  - Total ${:>12.2}", plan.cost.total);

    if let Some(energy) = &plan.melt_energy {
        println!("\nMelt Energy:");
        println!("  - Electrical Energy: {:.2} kWh", energy.energy_kwh);
        println!("  - Grid Emissions:    {:.3} t CO₂", energy.co2_tonnes);
    }

    let shortages = plan.shortages().count();
    if shortages > 0 {
        println!("\nWARNING: {} element(s) cannot be sourced from stock.", shortages);
    }
    println!("========================================");
}

pub fn print_inventory_report(kb: &KnowledgeBase) {
    println!("\n--- [Inventory] ---");
    println!("========================================");
    for stock in InventoryResolver::new(&kb.materials).stock_summary() {
        println!("{} ({:.1} kg on hand):", stock.element, stock.total_stock_kg);
        for material in stock.materials {
            println!(
                "  - {} {:<28} purity {:.2} | stock {:>8.1} kg | recovery {:.2}",
                material.material_id, material.material_name, material.purity, material.stock_kg, material.recovery
            );
        }
    }
    println!("========================================");
}
