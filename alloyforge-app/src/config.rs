use alloyforge_core::{OptimizerBuilder, PriceTable, RecoveryTable};
use alloyforge_schemas::{
    file_formats::{MaterialFile, OptimizerFile, PriceFile, RecoveryFile},
    material::MaterialRecord,
    optimizer::{default_gene_space, GeneBounds, OptimizerSettings},
};
use anyhow::{bail, Context, Result};
use std::{
    collections::{BTreeMap, HashSet},
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// All static data loaded from YAML files: the plant inventory plus the
/// price, recovery and optimizer tables the engine runs with.
pub struct KnowledgeBase {
    pub materials: Vec<MaterialRecord>,
    pub prices: PriceTable,
    pub recovery: RecoveryTable,
    pub optimizer: OptimizerSettings,
    pub gene_space: Vec<GeneBounds>,
}

impl KnowledgeBase {
    /// Loads all data from the specified base directory.
    ///
    /// `1_materials` is required. `2_prices`, `3_recovery` and `4_optimizer`
    /// are optional and overlay the built-in defaults when present.
    pub fn load(base_path: &str) -> Result<Self> {
        println!("Loading knowledge base from '{}'...", base_path);
        let base = Path::new(base_path);

        let materials = load_yaml_files(base.join("1_materials"), |file: MaterialFile| file.materials)?;
        check_unique_ids(&materials)?;
        check_material_invariants(&materials)?;

        let prices = load_optional_yaml_files(base.join("2_prices"), |file: PriceFile| file.prices)?;
        let recovery =
            load_optional_yaml_files(base.join("3_recovery"), |file: RecoveryFile| file.recovery_rates)?;
        let optimizer_files = load_optional_yaml_files(base.join("4_optimizer"), |file: OptimizerFile| vec![file])?;

        check_prices(&prices)?;
        check_recovery_rates(&recovery)?;

        let (optimizer, gene_space) = match optimizer_files.len() {
            0 => (OptimizerSettings::default(), default_gene_space()),
            1 => {
                let file = optimizer_files.into_iter().next().context("optimizer file vanished")?;
                (file.optimizer, file.gene_space.unwrap_or_else(default_gene_space))
            }
            n => bail!("Expected at most one optimizer file in 4_optimizer, found {}", n),
        };

        let kb = Self {
            materials,
            prices: PriceTable::default().merged_with(into_map(prices)),
            recovery: RecoveryTable::default().merged_with(into_map(recovery)),
            optimizer,
            gene_space,
        };
        info!(
            materials = kb.materials.len(),
            genes = kb.gene_space.len(),
            "knowledge base loaded"
        );
        println!("Knowledge base loaded successfully.");
        Ok(kb)
    }

    /// An optimizer builder primed with this knowledge base's prices, gene space and settings.
    pub fn optimizer_builder(&self) -> OptimizerBuilder {
        OptimizerBuilder::new()
            .with_prices(self.prices.clone())
            .with_gene_space(self.gene_space.clone())
            .with_settings(self.optimizer.clone())
    }
}

fn into_map(entries: Vec<(String, f64)>) -> BTreeMap<String, f64> {
    entries.into_iter().collect()
}

fn check_unique_ids(materials: &[MaterialRecord]) -> Result<()> {
    let mut seen = HashSet::new();
    for material in materials {
        if !seen.insert(material.material_id.as_str()) {
            bail!("Material '{}' is defined more than once", material.material_id);
        }
    }
    Ok(())
}

/// Purity and recovery in (0, 1], stock finite and non-negative.
fn check_material_invariants(materials: &[MaterialRecord]) -> Result<()> {
    let unit_fraction = |v: f64| v.is_finite() && v > 0.0 && v <= 1.0;
    for m in materials {
        if !unit_fraction(m.purity) {
            bail!("Material '{}' has purity {} outside (0, 1]", m.material_id, m.purity);
        }
        if !unit_fraction(m.recovery) {
            bail!("Material '{}' has recovery {} outside (0, 1]", m.material_id, m.recovery);
        }
        if !m.stock_kg.is_finite() || m.stock_kg < 0.0 {
            bail!("Material '{}' has negative or non-finite stock_kg {}", m.material_id, m.stock_kg);
        }
    }
    Ok(())
}

fn check_prices(prices: &[(String, f64)]) -> Result<()> {
    for (element, price) in prices {
        if !price.is_finite() || *price < 0.0 {
            bail!("Price for '{}' must be a non-negative number, got {}", element, price);
        }
    }
    Ok(())
}

/// Rates above 1 would dose less than the target mass. Non-positive rates
/// are accepted; dosing treats them as lossless and warns.
fn check_recovery_rates(rates: &[(String, f64)]) -> Result<()> {
    for (element, rate) in rates {
        if !rate.is_finite() || *rate > 1.0 {
            bail!("Recovery rate for '{}' must be at most 1, got {}", element, rate);
        }
    }
    Ok(())
}

fn load_optional_yaml_files<P, F, E, C, T>(dir_path: P, extract: E) -> Result<Vec<T>>
where
    P: AsRef<Path>,
    F: for<'de> serde::Deserialize<'de>,
    E: Fn(F) -> C,
    C: IntoIterator<Item = T>,
{
    if !dir_path.as_ref().is_dir() {
        debug!(dir = ?dir_path.as_ref(), "optional knowledge base directory missing, using defaults");
        return Ok(Vec::new());
    }
    load_yaml_files(dir_path, extract)
}

/// Generic helper to load every YAML file in a directory, in file name order.
///
/// Order matters: the inventory resolver breaks purity ties by record order,
/// and later price or recovery files override earlier ones.
fn load_yaml_files<P, F, E, C, T>(dir_path: P, extract: E) -> Result<Vec<T>>
where
    P: AsRef<Path>,
    F: for<'de> serde::Deserialize<'de>, // The file wrapper struct (e.g., MaterialFile)
    E: Fn(F) -> C,                       // Pulls the items out of the wrapper
    C: IntoIterator<Item = T>,
{
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir_path.as_ref())
        .with_context(|| format!("Failed to read directory: {:?}", dir_path.as_ref()))?
    {
        let path = entry?.path();
        if path.is_file() && path.extension().map_or(false, |s| s == "yaml" || s == "yml") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut items = Vec::new();
    for path in paths {
        let content = fs::read_to_string(&path).with_context(|| format!("Failed to read {:?}", path))?;
        let file_wrapper: F =
            serde_yaml::from_str(&content).with_context(|| format!("Failed to parse YAML from {:?}", path))?;
        items.extend(extract(file_wrapper));
    }
    Ok(items)
}
