use alloyforge_schemas::{
    composition::{element, Composition},
    properties::PropertyVector,
};

/// Maps a composition to predicted properties.
///
/// Implementations must be pure: the optimizer calls `predict` from many
/// threads at once and expects identical output for identical input.
pub trait PropertyModel: Send + Sync {
    fn predict(&self, composition: &Composition) -> PropertyVector;
}

/// Linear analytic surrogate around a plain iron baseline.
///
/// Coefficients are per mass percent. Not a metallurgical simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurrogatePropertyModel {
    pub base_strength: f64,
    pub base_hardness: f64,
    pub base_density: f64,
    pub base_corrosion: f64,
}

impl SurrogatePropertyModel {
    pub const CORROSION_FLOOR: f64 = 0.01;
}

impl Default for SurrogatePropertyModel {
    fn default() -> Self {
        Self {
            base_strength: 300.0,
            base_hardness: 100.0,
            base_density: 7.87,
            base_corrosion: 0.5,
        }
    }
}

impl PropertyModel for SurrogatePropertyModel {
    fn predict(&self, composition: &Composition) -> PropertyVector {
        let c = composition.get(element::CARBON);
        let cr = composition.get(element::CHROMIUM);
        let ni = composition.get(element::NICKEL);
        let mn = composition.get(element::MANGANESE);

        PropertyVector {
            tensile_strength: self.base_strength + 800.0 * c + 100.0 * mn + 50.0 * ni + 60.0 * cr,
            hardness: self.base_hardness + 300.0 * c + 40.0 * cr + 30.0 * mn,
            density: self.base_density - 0.05 * c + 0.01 * ni,
            corrosion_rate: (self.base_corrosion - 0.05 * cr - 0.02 * ni).max(Self::CORROSION_FLOOR),
        }
    }
}
