//! Price vectors: one price per product for a single simulation run.

use crate::{
    catalog::Offer,
    error::{PricingError, PricingResult},
    types::ProductId,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceVector(BTreeMap<ProductId, f64>);

impl PriceVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, product_id: &str) -> Option<f64> {
        self.0.get(product_id).copied()
    }

    pub fn insert(&mut self, product_id: impl Into<ProductId>, price: f64) {
        self.0.insert(product_id.into(), price);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(id, p)| (id.as_str(), *p))
    }

    /// Look up each offer's price in evaluation order.
    /// Fails on the first offer with no entry.
    pub fn resolve(&self, offers: &[Offer]) -> PricingResult<Vec<f64>> {
        offers
            .iter()
            .map(|o| {
                self.get(&o.product_id).ok_or_else(|| PricingError::MissingPrice {
                    product_id: o.product_id.clone(),
                })
            })
            .collect()
    }

    /// Apply per-product multipliers. Products without a multiplier keep
    /// their price; multipliers for unknown products are ignored.
    pub fn scaled(&self, multipliers: &HashMap<String, f64>) -> PricingResult<Self> {
        let mut unknown: Vec<&String> = multipliers
            .keys()
            .filter(|id| !self.0.contains_key(id.as_str()))
            .collect();
        unknown.sort();
        for id in unknown {
            log::warn!("pricing: ignoring multiplier for unknown product '{id}'");
        }

        let mut out = BTreeMap::new();
        for (id, &price) in &self.0 {
            let factor = match multipliers.get(id) {
                Some(&m) if !m.is_finite() || m < 0.0 => {
                    return Err(PricingError::InvalidMultiplier {
                        product_id: id.clone(),
                        value: m,
                    });
                }
                Some(&m) => m,
                None => 1.0,
            };
            out.insert(id.clone(), price * factor);
        }
        Ok(Self(out))
    }
}

impl FromIterator<(ProductId, f64)> for PriceVector {
    fn from_iter<I: IntoIterator<Item = (ProductId, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
