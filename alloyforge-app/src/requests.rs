use alloyforge_schemas::{
    composition::Composition,
    dosing::HeatingProfile,
    file_formats::RequestFile,
    objective::{Objective, TargetSpec, WeightSpec},
};
use anyhow::{bail, Context, Result};
use std::fs;

pub const KG_PER_TONNE: f64 = 1_000.0;

/// Reads and checks a request file.
pub fn load_request_file(path: &str) -> Result<RequestFile> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    let file: RequestFile =
        serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {}", path))?;

    if file.requests.is_empty() {
        bail!("Request file '{}' does not contain any requests", path);
    }
    Ok(file)
}

/// Parses one `SYMBOL=PERCENT` command line entry.
pub fn parse_element_entry(entry: &str) -> Result<(String, f64), String> {
    let (symbol, percent) = entry
        .split_once('=')
        .ok_or_else(|| format!("expected SYMBOL=PERCENT, got '{}'", entry))?;
    let percent: f64 = percent
        .trim()
        .parse()
        .map_err(|e| format!("invalid percentage for '{}': {}", symbol, e))?;
    Ok((symbol.trim().to_string(), percent))
}

pub fn composition_from_entries(entries: &[(String, f64)]) -> Result<Composition> {
    Composition::from_pairs(entries.iter().cloned()).context("Invalid composition")
}

/// Target and weight flags as given on the command line.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ObjectiveArgs {
    /// Target tensile strength in MPa
    #[arg(long)]
    pub strength: Option<f64>,
    /// Target corrosion rate in mm/year
    #[arg(long)]
    pub corrosion: Option<f64>,
    #[arg(long)]
    pub strength_weight: Option<f64>,
    #[arg(long)]
    pub cost_weight: Option<f64>,
    #[arg(long)]
    pub corrosion_weight: Option<f64>,
}

impl ObjectiveArgs {
    pub fn targets(&self) -> TargetSpec {
        let mut targets = TargetSpec::new();
        if let Some(strength) = self.strength {
            targets = targets.with(Objective::Strength, strength);
        }
        if let Some(corrosion) = self.corrosion {
            targets = targets.with(Objective::Corrosion, corrosion);
        }
        targets
    }

    pub fn weights(&self) -> WeightSpec {
        [
            (Objective::Strength, self.strength_weight),
            (Objective::Cost, self.cost_weight),
            (Objective::Corrosion, self.corrosion_weight),
        ]
        .into_iter()
        .filter_map(|(objective, weight)| weight.map(|w| (objective, w)))
        .fold(WeightSpec::new(), |weights, (objective, w)| weights.with(objective, w))
    }
}

/// Heating flags; a profile is only built when both required values are given.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct HeatingArgs {
    /// Specific heat in kJ/(kg·°C)
    #[arg(long, requires = "delta_t")]
    pub specific_heat: Option<f64>,
    /// Temperature rise in °C
    #[arg(long, requires = "specific_heat")]
    pub delta_t: Option<f64>,
    #[arg(long, default_value_t = HeatingProfile::default_efficiency())]
    pub efficiency: f64,
    /// kg CO2 per kWh
    #[arg(long, default_value_t = HeatingProfile::default_grid_factor())]
    pub grid_factor: f64,
}

impl HeatingArgs {
    pub fn profile(&self) -> Option<HeatingProfile> {
        Some(HeatingProfile {
            specific_heat: self.specific_heat?,
            delta_t: self.delta_t?,
            efficiency: self.efficiency,
            grid_factor: self.grid_factor,
        })
    }
}
