use alloyforge_schemas::composition::element;
use std::collections::BTreeMap;
use tracing::warn;

/// Recovery (yield) rate assumed for elements missing from a table.
pub const NO_LOSS_RECOVERY: f64 = 1.0;

/// Per-element recovery rates used when a request does not name one.
#[derive(Debug, Clone, PartialEq)]
pub struct RecoveryTable {
    rates: BTreeMap<String, f64>,
}

impl RecoveryTable {
    pub fn new(rates: BTreeMap<String, f64>) -> Self {
        Self { rates }
    }

    pub fn rate_for(&self, element: &str) -> f64 {
        self.rates.get(element).copied().unwrap_or(NO_LOSS_RECOVERY)
    }

    /// Overlays `overrides` on top of this table.
    pub fn merged_with(mut self, overrides: BTreeMap<String, f64>) -> Self {
        self.rates.extend(overrides);
        self
    }
}

impl Default for RecoveryTable {
    fn default() -> Self {
        Self::new(BTreeMap::from([
            (element::CARBON.to_string(), 0.98),
            (element::CHROMIUM.to_string(), 0.92),
            (element::NICKEL.to_string(), 0.96),
            (element::MANGANESE.to_string(), 0.90),
        ]))
    }
}

/// Mass of an element that must end up in the melt, in kg.
pub fn target_mass_kg(melt_mass_kg: f64, percent: f64) -> f64 {
    melt_mass_kg * percent / 100.0
}

/// Feedstock mass that leaves `target_mass_kg` in the melt after recovery loss.
///
/// A recovery rate that is not strictly positive cannot be inverted; the
/// target mass is returned unchanged (no loss assumed) and a warning is logged.
pub fn compensate_recovery(target_mass_kg: f64, recovery_rate: f64) -> f64 {
    if !(recovery_rate > 0.0) || !recovery_rate.is_finite() {
        warn!(
            recovery_rate,
            target_mass_kg, "non-positive recovery rate, dosing target mass without compensation"
        );
        return target_mass_kg;
    }
    target_mass_kg / recovery_rate
}

/// Required feedstock kg to bring `percent` of `melt_mass_kg` into the melt.
pub fn dose_for(melt_mass_kg: f64, percent: f64, recovery_rate: f64) -> f64 {
    compensate_recovery(target_mass_kg(melt_mass_kg, percent), recovery_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rates_and_unknown_fallback() {
        let table = RecoveryTable::default();
        assert_eq!(table.rate_for(element::CARBON), 0.98);
        assert_eq!(table.rate_for(element::CHROMIUM), 0.92);
        assert_eq!(table.rate_for(element::NICKEL), 0.96);
        assert_eq!(table.rate_for(element::MANGANESE), 0.90);
        assert_eq!(table.rate_for("V"), 1.0);
    }

    #[test]
    fn overrides_replace_only_named_elements() {
        let table = RecoveryTable::default()
            .merged_with(BTreeMap::from([(element::CARBON.to_string(), 0.85)]));
        assert_eq!(table.rate_for(element::CARBON), 0.85);
        assert_eq!(table.rate_for(element::NICKEL), 0.96);
    }

    #[test]
    fn full_recovery_doses_the_target_mass() {
        let target = target_mass_kg(10_000.0, 0.5);
        assert_eq!(target, 50.0);
        assert_eq!(dose_for(10_000.0, 0.5, 1.0), target);
    }

    #[test]
    fn higher_recovery_never_needs_more_feedstock() {
        let rates = [0.05, 0.3, 0.5, 0.75, 0.9, 0.98, 1.0];
        for pair in rates.windows(2) {
            let low = dose_for(2_500.0, 1.3, pair[0]);
            let high = dose_for(2_500.0, 1.3, pair[1]);
            assert!(high <= low, "recovery {} -> {}, {} > {}", pair[0], pair[1], high, low);
        }
    }

    #[test]
    fn non_positive_recovery_degrades_to_target_mass() {
        assert_eq!(dose_for(1_000.0, 2.0, 0.0), 20.0);
        assert_eq!(dose_for(1_000.0, 2.0, -0.4), 20.0);
        assert_eq!(dose_for(1_000.0, 2.0, f64::NAN), 20.0);
    }

    #[test]
    fn default_recovery_compensation_for_reference_melt() {
        let table = RecoveryTable::default();
        let carbon = dose_for(10_000.0, 0.5, table.rate_for(element::CARBON));
        let chromium = dose_for(10_000.0, 1.0, table.rate_for(element::CHROMIUM));
        assert!((carbon - 51.02).abs() < 0.01);
        assert!((chromium - 108.70).abs() < 0.01);
    }
}
