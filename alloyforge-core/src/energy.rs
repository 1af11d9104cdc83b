//! Heating energy and grid emissions for bringing a melt up to temperature.

use crate::error::AlloyforgeError;
use alloyforge_schemas::dosing::{HeatingProfile, MeltEnergy};

const JOULES_PER_KWH: f64 = 3.6e6;

/// Electrical energy in kWh to heat `mass_kg` by `delta_t_c`.
///
/// `specific_heat` is in kJ/(kg·°C); `efficiency` is the furnace's
/// electrical-to-thermal efficiency and must be in (0, 1]. Mass, specific
/// heat and temperature rise must be finite and non-negative.
pub fn melting_energy_kwh(
    mass_kg: f64,
    specific_heat: f64,
    delta_t_c: f64,
    efficiency: f64,
) -> Result<f64, AlloyforgeError> {
    for (name, value) in [("mass", mass_kg), ("specific heat", specific_heat), ("temperature rise", delta_t_c)] {
        if !value.is_finite() || value < 0.0 {
            return Err(AlloyforgeError::InvalidInput(format!(
                "{} must be a non-negative number, got {}",
                name, value
            )));
        }
    }
    if !(efficiency > 0.0 && efficiency <= 1.0) {
        return Err(AlloyforgeError::InvalidInput(format!(
            "furnace efficiency must be within (0, 1], got {}",
            efficiency
        )));
    }
    let joules = mass_kg * specific_heat * 1_000.0 * delta_t_c;
    Ok(joules / JOULES_PER_KWH / efficiency)
}

/// Tonnes of CO2 for `energy_kwh` at `grid_factor` kg CO2 per kWh.
pub fn co2_emissions_tonnes(energy_kwh: f64, grid_factor: f64) -> f64 {
    energy_kwh * grid_factor / 1_000.0
}

pub fn estimate_melt_energy(
    mass_kg: f64,
    profile: &HeatingProfile,
) -> Result<MeltEnergy, AlloyforgeError> {
    let energy_kwh = melting_energy_kwh(
        mass_kg,
        profile.specific_heat,
        profile.delta_t,
        profile.efficiency,
    )?;
    Ok(MeltEnergy {
        energy_kwh,
        co2_tonnes: co2_emissions_tonnes(energy_kwh, profile.grid_factor),
    })
}
