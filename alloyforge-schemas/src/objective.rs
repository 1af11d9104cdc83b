use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    Strength,
    Cost,
    Corrosion,
}

/// Target value per objective. Objectives without an entry are not optimized for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetSpec(BTreeMap<Objective, f64>);

impl TargetSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, objective: Objective, target: f64) -> Self {
        self.0.insert(objective, target);
        self
    }

    pub fn get(&self, objective: Objective) -> Option<f64> {
        self.0.get(&objective).copied()
    }

    pub fn contains(&self, objective: Objective) -> bool {
        self.0.contains_key(&objective)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Objective, f64)> + '_ {
        self.0.iter().map(|(o, v)| (*o, *v))
    }
}

/// Importance weight per objective; unlisted objectives weigh 1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightSpec(BTreeMap<Objective, f64>);

impl WeightSpec {
    pub const DEFAULT_WEIGHT: f64 = 1.0;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, objective: Objective, weight: f64) -> Self {
        self.0.insert(objective, weight);
        self
    }

    pub fn weight(&self, objective: Objective) -> f64 {
        self.0.get(&objective).copied().unwrap_or(Self::DEFAULT_WEIGHT)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Objective, f64)> + '_ {
        self.0.iter().map(|(o, v)| (*o, *v))
    }
}
