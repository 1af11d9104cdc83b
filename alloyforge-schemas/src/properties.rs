use serde::{Deserialize, Serialize};

/// Predicted mechanical and physical properties of a composition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PropertyVector {
    /// MPa
    pub tensile_strength: f64,
    /// HV
    pub hardness: f64,
    /// g/cm³
    pub density: f64,
    /// mm/year
    pub corrosion_rate: f64,
}

impl PropertyVector {
    /// Display precision: two places for strength, hardness and density, four for corrosion.
    pub fn rounded(&self) -> Self {
        Self {
            tensile_strength: round_to(self.tensile_strength, 2),
            hardness: round_to(self.hardness, 2),
            density: round_to(self.density, 2),
            corrosion_rate: round_to(self.corrosion_rate, 4),
        }
    }
}

pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}
