use crate::{
    material::MaterialRecord,
    optimizer::{GeneBounds, OptimizerSettings},
    request::EngineRequest,
};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
pub struct MaterialFile {
    pub schema_version: String,
    pub materials: Vec<MaterialRecord>,
}

#[derive(Debug, Deserialize)]
pub struct PriceFile {
    pub schema_version: String,
    /// Element symbol to unit price per kg.
    pub prices: BTreeMap<String, f64>,
}

#[derive(Debug, Deserialize)]
pub struct RecoveryFile {
    pub schema_version: String,
    pub recovery_rates: BTreeMap<String, f64>,
}

#[derive(Debug, Deserialize)]
pub struct OptimizerFile {
    pub schema_version: String,
    #[serde(default)]
    pub optimizer: OptimizerSettings,
    pub gene_space: Option<Vec<GeneBounds>>,
}

#[derive(Debug, Deserialize)]
pub struct RequestFile {
    pub schema_version: String,
    pub requests: Vec<EngineRequest>,
}
