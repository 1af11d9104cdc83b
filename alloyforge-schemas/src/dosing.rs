use crate::material::MaterialRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortageKind {
    /// No stock record supplies the element at all.
    NoMaterialFound,
    /// Records exist, but none holds enough stock on its own.
    InsufficientStock,
}

/// Outcome of sourcing one element from stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourcingDecision {
    Available {
        material: MaterialRecord,
        raw_mass_needed_kg: f64,
    },
    Substituted {
        original: MaterialRecord,
        substitute: MaterialRecord,
        raw_mass_needed_kg: f64,
        reason: String,
    },
    Unavailable {
        shortage: ShortageKind,
        reason: String,
    },
}

impl SourcingDecision {
    /// The material that will actually be charged, if any.
    pub fn sourced_material(&self) -> Option<&MaterialRecord> {
        match self {
            SourcingDecision::Available { material, .. } => Some(material),
            SourcingDecision::Substituted { substitute, .. } => Some(substitute),
            SourcingDecision::Unavailable { .. } => None,
        }
    }

    pub fn raw_mass_needed_kg(&self) -> Option<f64> {
        match self {
            SourcingDecision::Available { raw_mass_needed_kg, .. }
            | SourcingDecision::Substituted { raw_mass_needed_kg, .. } => Some(*raw_mass_needed_kg),
            SourcingDecision::Unavailable { .. } => None,
        }
    }

    pub fn status_label(&self) -> &'static str {
        match self {
            SourcingDecision::Available { .. } => "available",
            SourcingDecision::Substituted { .. } => "substituted",
            SourcingDecision::Unavailable { .. } => "unavailable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DosingLineItem {
    pub element: String,
    pub target_percent: f64,
    pub target_mass_kg: f64,
    pub recovery_rate: f64,
    pub required_feedstock_kg: f64,
    pub sourcing: SourcingDecision,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub total: f64,
    pub per_element: BTreeMap<String, f64>,
}

/// Heating parameters for estimating melt energy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatingProfile {
    /// kJ/(kg·°C)
    pub specific_heat: f64,
    /// °C
    pub delta_t: f64,
    #[serde(default = "HeatingProfile::default_efficiency")]
    pub efficiency: f64,
    /// kg CO2 per kWh
    #[serde(default = "HeatingProfile::default_grid_factor")]
    pub grid_factor: f64,
}

impl HeatingProfile {
    pub fn default_efficiency() -> f64 {
        0.7
    }

    pub fn default_grid_factor() -> f64 {
        0.82
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeltEnergy {
    pub energy_kwh: f64,
    pub co2_tonnes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DosingPlan {
    pub melt_mass_kg: f64,
    pub line_items: Vec<DosingLineItem>,
    /// Cost of the required feedstock masses at unit prices.
    pub cost: CostBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub melt_energy: Option<MeltEnergy>,
}

impl DosingPlan {
    pub fn shortages(&self) -> impl Iterator<Item = &DosingLineItem> {
        self.line_items
            .iter()
            .filter(|item| matches!(item.sourcing, SourcingDecision::Unavailable { .. }))
    }
}
