use crate::properties::round_to;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Element symbols understood by the built-in property model and default tables.
pub mod element {
    pub const CARBON: &str = "C";
    pub const CHROMIUM: &str = "Cr";
    pub const NICKEL: &str = "Ni";
    pub const MANGANESE: &str = "Mn";
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompositionError {
    #[error("Element '{element}' has a negative percentage ({value})")]
    Negative { element: String, value: f64 },

    #[error("Element '{element}' has a non-finite percentage")]
    NonFinite { element: String },

    #[error("Element symbol must not be empty")]
    EmptySymbol,
}

/// Element symbol to mass percentage of the alloy.
///
/// Entries are never negative. A zero entry is equivalent to the element
/// being absent, and lookups of missing elements return `0.0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct Composition {
    percentages: BTreeMap<String, f64>,
}

impl Composition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a composition from `(element, percent)` pairs, rejecting invalid entries.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, CompositionError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut composition = Self::new();
        for (element, percent) in pairs {
            composition.set(element, percent)?;
        }
        Ok(composition)
    }

    pub fn set(&mut self, element: impl Into<String>, percent: f64) -> Result<(), CompositionError> {
        let element = element.into();
        if element.trim().is_empty() {
            return Err(CompositionError::EmptySymbol);
        }
        if !percent.is_finite() {
            return Err(CompositionError::NonFinite { element });
        }
        if percent < 0.0 {
            return Err(CompositionError::Negative { element, value: percent });
        }
        self.percentages.insert(element, percent);
        Ok(())
    }

    pub fn get(&self, element: &str) -> f64 {
        self.percentages.get(element).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.percentages.iter().map(|(e, p)| (e.as_str(), *p))
    }

    /// Elements with a strictly positive percentage.
    pub fn present(&self) -> impl Iterator<Item = (&str, f64)> {
        self.iter().filter(|(_, p)| *p > 0.0)
    }

    pub fn len(&self) -> usize {
        self.percentages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.percentages.is_empty()
    }

    pub fn rounded(&self, places: u32) -> Self {
        Self {
            percentages: self
                .percentages
                .iter()
                .map(|(e, p)| (e.clone(), round_to(*p, places)))
                .collect(),
        }
    }
}

impl TryFrom<BTreeMap<String, f64>> for Composition {
    type Error = CompositionError;

    fn try_from(map: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        Self::from_pairs(map)
    }
}

impl From<Composition> for BTreeMap<String, f64> {
    fn from(composition: Composition) -> Self {
        composition.percentages
    }
}
