use serde::{Deserialize, Serialize};

/// A stock material as held by the inventory store. Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRecord {
    pub material_id: String,
    pub material_name: String,
    /// Element symbol this material supplies.
    pub main_element: String,
    /// Fraction of the material's mass that is `main_element`, in (0, 1].
    pub purity: f64,
    pub stock_kg: f64,
    /// Fraction of added mass that ends up in the melt, in (0, 1].
    pub recovery: f64,
}

impl MaterialRecord {
    /// Raw material mass carrying `pure_mass_kg` of the main element.
    pub fn raw_mass_for(&self, pure_mass_kg: f64) -> f64 {
        pure_mass_kg / self.purity
    }

    pub fn covers(&self, raw_mass_kg: f64) -> bool {
        self.stock_kg >= raw_mass_kg
    }
}
