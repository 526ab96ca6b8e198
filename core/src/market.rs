//! Market simulation: one price configuration, many customers.
//!
//! Customers are independent of each other: each one is run through the
//! choice model with its own budget, and the results are folded into a
//! single SimulationResult.

use crate::{
    catalog::{Catalog, Offer},
    choice::choose_offers,
    config::SegmentCatalog,
    error::PricingResult,
    population::{generate_population, Customer},
    prices::PriceVector,
    rng::SimRng,
    types::{DishId, ProductId},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub total_profit: f64,
    /// Units sold per product; every catalog product is present.
    pub total_demand: BTreeMap<ProductId, u32>,
    /// Dishes each customer left with, combos expanded to members.
    pub purchased_item_sets: Vec<BTreeSet<DishId>>,
}

impl SimulationResult {
    pub fn demand_of(&self, product_id: &str) -> u32 {
        self.total_demand.get(product_id).copied().unwrap_or(0)
    }
}

pub struct MarketSimulator {
    offers: Vec<Offer>,
}

impl MarketSimulator {
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            offers: catalog.offers(),
        }
    }

    /// Build from an explicit offer list. The list order is the
    /// evaluation order every customer sees.
    pub fn from_offers(offers: Vec<Offer>) -> Self {
        Self { offers }
    }

    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }

    /// Run every customer through the choice model at `prices`.
    ///
    /// Fails before simulating anyone if `prices` misses a product.
    pub fn simulate(
        &self,
        customers: &mut [Customer],
        prices: &PriceVector,
        rng: &mut SimRng,
    ) -> PricingResult<SimulationResult> {
        let resolved = prices.resolve(&self.offers)?;

        let mut total_demand: BTreeMap<ProductId, u32> = self
            .offers
            .iter()
            .map(|o| (o.product_id.clone(), 0))
            .collect();
        let mut total_profit = 0.0;
        let mut purchased_item_sets = Vec::with_capacity(customers.len());

        for customer in customers.iter_mut() {
            let purchases = choose_offers(customer, &self.offers, &resolved, rng);
            let mut bag = BTreeSet::new();

            for (offer, &price) in self.offers.iter().zip(&resolved) {
                let Some(&quantity) = purchases.get(offer.product_id.as_str()) else {
                    continue;
                };
                total_profit += (price - offer.unit_cost) * f64::from(quantity);
                if let Some(d) = total_demand.get_mut(&offer.product_id) {
                    *d += quantity;
                }
                bag.extend(offer.dish_ids().iter().cloned());
            }

            purchased_item_sets.push(bag);
        }

        log::debug!(
            "market[{}]: {} customers, profit={:.2}",
            rng.name,
            purchased_item_sets.len(),
            total_profit
        );

        Ok(SimulationResult {
            total_profit,
            total_demand,
            purchased_item_sets,
        })
    }

    /// Draw a fresh population from `segments` and simulate it.
    pub fn simulate_fresh(
        &self,
        segments: &SegmentCatalog,
        prices: &PriceVector,
        rng: &mut SimRng,
    ) -> PricingResult<SimulationResult> {
        // Validate before drawing anyone.
        prices.resolve(&self.offers)?;
        let mut customers = generate_population(segments, rng);
        self.simulate(&mut customers, prices, rng)
    }
}
