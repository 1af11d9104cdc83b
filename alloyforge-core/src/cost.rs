use alloyforge_schemas::{
    composition::{element, Composition},
    dosing::CostBreakdown,
};
use std::collections::BTreeMap;

/// Unit price per kg of each element.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    prices: BTreeMap<String, f64>,
}

impl PriceTable {
    pub fn new(prices: BTreeMap<String, f64>) -> Self {
        Self { prices }
    }

    /// Untracked elements are priced at zero.
    pub fn price_of(&self, element: &str) -> f64 {
        self.prices.get(element).copied().unwrap_or(0.0)
    }

    pub fn merged_with(mut self, overrides: BTreeMap<String, f64>) -> Self {
        self.prices.extend(overrides);
        self
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::new(BTreeMap::from([
            (element::CARBON.to_string(), 25.0),
            (element::CHROMIUM.to_string(), 120.0),
            (element::NICKEL.to_string(), 450.0),
            (element::MANGANESE.to_string(), 100.0),
        ]))
    }
}

/// Linear cost of an element → mass plan.
pub fn cost<'a, I>(plan: I, prices: &PriceTable) -> CostBreakdown
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut breakdown = CostBreakdown::default();
    for (element, mass) in plan {
        let line_cost = mass * prices.price_of(element);
        breakdown.total += line_cost;
        *breakdown.per_element.entry(element.to_string()).or_insert(0.0) += line_cost;
    }
    breakdown
}

/// Cost of a composition when each percentage point is priced as one unit of mass.
///
/// This is the basis the fitness evaluator ranks candidates on.
pub fn composition_basis_cost(composition: &Composition, prices: &PriceTable) -> f64 {
    composition
        .iter()
        .map(|(element, percent)| percent * prices.price_of(element))
        .sum()
}
