use alloyforge_schemas::{
    dosing::{ShortageKind, SourcingDecision},
    material::MaterialRecord,
};
use std::collections::BTreeSet;
use tracing::debug;

/// Stock on hand for one element across all records supplying it.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementStock<'a> {
    pub element: String,
    pub total_stock_kg: f64,
    /// Records ordered by purity, highest first.
    pub materials: Vec<&'a MaterialRecord>,
}

/// Picks stock materials for elemental requirements.
///
/// Greedy, single pass: the purest material wins if its stock covers the
/// requirement, otherwise the first lower-purity material that covers it on
/// its own. Cost and total raw mass are not considered. The records are only
/// read; callers decrementing stock concurrently must synchronize externally.
#[derive(Debug, Clone, Copy)]
pub struct InventoryResolver<'a> {
    records: &'a [MaterialRecord],
}

impl<'a> InventoryResolver<'a> {
    pub fn new(records: &'a [MaterialRecord]) -> Self {
        Self { records }
    }

    /// Records supplying `element`, purest first. Equal purities keep inventory order.
    pub fn candidates(&self, element: &str) -> Vec<&'a MaterialRecord> {
        let mut candidates: Vec<&MaterialRecord> = self
            .records
            .iter()
            .filter(|m| m.main_element == element)
            .collect();
        candidates.sort_by(|a, b| b.purity.total_cmp(&a.purity));
        candidates
    }

    pub fn resolve(&self, element: &str, required_pure_mass_kg: f64) -> SourcingDecision {
        let candidates = self.candidates(element);

        let Some((best, fallbacks)) = candidates.split_first() else {
            debug!(element, "no stock record supplies element");
            return SourcingDecision::Unavailable {
                shortage: ShortageKind::NoMaterialFound,
                reason: format!("No material found for element '{}'.", element),
            };
        };

        let raw_needed = best.raw_mass_for(required_pure_mass_kg);
        if best.covers(raw_needed) {
            return SourcingDecision::Available {
                material: (*best).clone(),
                raw_mass_needed_kg: raw_needed,
            };
        }

        for substitute in fallbacks {
            let raw_needed = substitute.raw_mass_for(required_pure_mass_kg);
            if substitute.covers(raw_needed) {
                debug!(
                    element,
                    original = %best.material_id,
                    substitute = %substitute.material_id,
                    raw_needed,
                    "substituting lower-purity material"
                );
                return SourcingDecision::Substituted {
                    original: (*best).clone(),
                    substitute: (*substitute).clone(),
                    raw_mass_needed_kg: raw_needed,
                    reason: format!(
                        "Insufficient stock of {}. Switched to {}.",
                        best.material_name, substitute.material_name
                    ),
                };
            }
        }

        SourcingDecision::Unavailable {
            shortage: ShortageKind::InsufficientStock,
            reason: format!("Critical shortage: not enough {} in any form.", element),
        }
    }

    /// Stock grouped per element, elements in alphabetical order.
    pub fn stock_summary(&self) -> Vec<ElementStock<'a>> {
        let elements: BTreeSet<&str> = self
            .records
            .iter()
            .map(|m| m.main_element.as_str())
            .collect();

        elements
            .into_iter()
            .map(|element| {
                let materials = self.candidates(element);
                ElementStock {
                    element: element.to_string(),
                    total_stock_kg: materials.iter().map(|m| m.stock_kg).sum(),
                    materials,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, element: &str, purity: f64, stock_kg: f64) -> MaterialRecord {
        MaterialRecord {
            material_id: id.to_string(),
            material_name: format!("{} stock", id),
            main_element: element.to_string(),
            purity,
            stock_kg,
            recovery: 0.9,
        }
    }

    fn chromium_stock() -> Vec<MaterialRecord> {
        vec![
            record("MAT-CR-HC", "Cr", 0.60, 100.0),
            record("MAT-C", "C", 0.99, 5_000.0),
            record("MAT-CR-LC", "Cr", 0.65, 2_000.0),
        ]
    }

    #[test]
    fn purest_candidate_is_used_when_it_covers_the_requirement() {
        let records = chromium_stock();
        let resolver = InventoryResolver::new(&records);

        match resolver.resolve("Cr", 108.7) {
            SourcingDecision::Available { material, raw_mass_needed_kg } => {
                assert_eq!(material.material_id, "MAT-CR-LC");
                assert!((raw_mass_needed_kg - 108.7 / 0.65).abs() < 1e-9);
            }
            other => panic!("expected Available, got {:?}", other),
        }
    }

    #[test]
    fn lower_purity_substitute_when_best_is_short() {
        let records = vec![
            record("MAT-NI-95", "Ni", 0.95, 10.0),
            record("MAT-NI-80", "Ni", 0.80, 40.0),
            record("MAT-NI-70", "Ni", 0.70, 500.0),
        ];
        let resolver = InventoryResolver::new(&records);

        match resolver.resolve("Ni", 30.0) {
            SourcingDecision::Substituted { original, substitute, raw_mass_needed_kg, reason } => {
                assert_eq!(original.material_id, "MAT-NI-95");
                assert_eq!(substitute.material_id, "MAT-NI-80");
                assert!((raw_mass_needed_kg - 37.5).abs() < 1e-9);
                assert!(reason.contains("MAT-NI-95 stock"));
            }
            other => panic!("expected Substituted, got {:?}", other),
        }
    }

    #[test]
    fn shortage_when_no_candidate_covers_alone() {
        let records = chromium_stock();
        let resolver = InventoryResolver::new(&records);

        // Combined stock would cover it, but no single record does.
        let decision = resolver.resolve("Cr", 1_350.0);
        assert!(matches!(
            decision,
            SourcingDecision::Unavailable { shortage: ShortageKind::InsufficientStock, .. }
        ));
    }

    #[test]
    fn missing_element_is_reported_as_no_material() {
        let records = chromium_stock();
        let resolver = InventoryResolver::new(&records);
        let decision = resolver.resolve("Mo", 1.0);
        assert!(matches!(
            decision,
            SourcingDecision::Unavailable { shortage: ShortageKind::NoMaterialFound, .. }
        ));
        assert!(decision.sourced_material().is_none());
    }

    #[test]
    fn equal_purity_keeps_inventory_order() {
        let records = vec![
            record("FIRST", "Mn", 0.78, 1.0),
            record("SECOND", "Mn", 0.78, 1.0),
        ];
        let resolver = InventoryResolver::new(&records);
        let ids: Vec<_> = resolver.candidates("Mn").iter().map(|m| m.material_id.as_str()).collect();
        assert_eq!(ids, vec!["FIRST", "SECOND"]);
    }

    #[test]
    fn stock_summary_groups_by_element() {
        let records = chromium_stock();
        let resolver = InventoryResolver::new(&records);
        let summary = resolver.stock_summary();

        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].element, "C");
        assert_eq!(summary[1].element, "Cr");
        assert_eq!(summary[1].total_stock_kg, 2_100.0);
        assert_eq!(summary[1].materials[0].material_id, "MAT-CR-LC");
    }
}
