use crate::{
    composition::Composition,
    dosing::HeatingProfile,
    objective::{TargetSpec, WeightSpec},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineRequest {
    PredictProperties {
        composition: Composition,
    },
    ComputeDosing {
        melt_mass_tons: f64,
        composition: Composition,
        #[serde(default)]
        heating: Option<HeatingProfile>,
    },
    OptimizeAlloy {
        targets: TargetSpec,
        weights: WeightSpec,
    },
    /// Optimize a composition, then dose and source it for the given melt.
    DesignAndDose {
        targets: TargetSpec,
        weights: WeightSpec,
        melt_mass_tons: f64,
        #[serde(default)]
        heating: Option<HeatingProfile>,
    },
}

impl EngineRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            EngineRequest::PredictProperties { .. } => "predict_properties",
            EngineRequest::ComputeDosing { .. } => "compute_dosing",
            EngineRequest::OptimizeAlloy { .. } => "optimize_alloy",
            EngineRequest::DesignAndDose { .. } => "design_and_dose",
        }
    }
}
