use alloyforge_core::{optimize_alloy, predict_properties, DosingService, SurrogatePropertyModel};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use requests::{HeatingArgs, ObjectiveArgs, KG_PER_TONNE};
use std::fs;
use std::path::Path;

mod config;
mod logging;
mod plotting;
mod requests;
mod workflow;

#[derive(Parser)]
#[command(name = "alloyforge", version, about = "Alloy composition search and feedstock sourcing")]
struct Cli {
    /// Knowledge base directory (materials, prices, recovery, optimizer)
    #[arg(long, global = true, default_value = "./data/knowledge_base")]
    knowledge_base: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Predict properties of a composition, e.g. `predict C=0.4 Cr=1.0`
    Predict {
        #[arg(required = true, value_parser = requests::parse_element_entry)]
        composition: Vec<(String, f64)>,
    },
    /// Dose a melt to a target composition and source it from stock
    Dose {
        /// Melt mass in metric tons
        #[arg(long)]
        melt_tons: f64,
        #[arg(required = true, value_parser = requests::parse_element_entry)]
        composition: Vec<(String, f64)>,
        #[command(flatten)]
        heating: HeatingArgs,
    },
    /// Search for a composition matching the given targets
    Optimize {
        #[command(flatten)]
        objectives: ObjectiveArgs,
        /// Fix the random seed for a reproducible search
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List stock per element
    Inventory,
    /// Run every request of a request file and write reports
    Run {
        request: String,
        /// Parent directory of the timestamped run directory
        #[arg(long, default_value = "./data/runs")]
        output_dir: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init();

    println!("--- Alloyforge ---");

    match cli.command {
        Command::Predict { composition } => {
            let composition = requests::composition_from_entries(&composition)?;
            let props = predict_properties(&SurrogatePropertyModel::default(), &composition);
            workflow::print_properties_report(&composition, &props);
        }
        Command::Dose { melt_tons, composition, heating } => {
            let kb = config::KnowledgeBase::load(&cli.knowledge_base)?;
            let composition = requests::composition_from_entries(&composition)?;
            let service = DosingService::new(&kb.recovery, &kb.prices, &kb.materials);
            let plan = service.compute_dosing_plan(
                melt_tons * KG_PER_TONNE,
                &composition,
                heating.profile().as_ref(),
            )?;
            workflow::print_dosing_report(&plan);
        }
        Command::Optimize { objectives, seed } => {
            let kb = config::KnowledgeBase::load(&cli.knowledge_base)?;
            let mut builder = kb.optimizer_builder();
            if let Some(seed) = seed {
                builder = builder.with_seed(seed);
            }
            let optimizer = builder.build().context("Failed to build the optimizer")?;
            let recommendation = optimize_alloy(&optimizer, objectives.targets(), objectives.weights())?;
            workflow::print_recommendation_report(&recommendation);
        }
        Command::Inventory => {
            let kb = config::KnowledgeBase::load(&cli.knowledge_base)?;
            workflow::print_inventory_report(&kb);
        }
        Command::Run { request, output_dir } => {
            let request_file = requests::load_request_file(&request)?;
            let kb = config::KnowledgeBase::load(&cli.knowledge_base)?;

            let output_dir = format!("{}/run_{}", output_dir, chrono::Utc::now().format("%Y%m%d_%H%M%S"));
            fs::create_dir_all(&output_dir)
                .with_context(|| format!("Failed to create output directory: {}", output_dir))?;

            // Copy the request file to the output directory for traceability
            fs::copy(&request, Path::new(&output_dir).join("request.yaml"))
                .with_context(|| format!("Failed to copy {} into {}", request, output_dir))?;

            workflow::run_requests(&request_file.requests, &kb, &output_dir)?;
            println!("\nAll requests complete. Results are in '{}'", output_dir);
        }
    }

    Ok(())
}
