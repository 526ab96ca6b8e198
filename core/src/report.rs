//! Caller-facing result payloads. Money is rounded to cents here and
//! nowhere else; the simulation itself works on unrounded prices.

use crate::{
    catalog::{Catalog, Offer},
    co_occurrence::{best_co_purchased_pair, ComboPopularity, CoPurchasePair},
    elasticity::{point_elasticity, ElasticityClass},
    market::SimulationResult,
    optimizer::{OptimizationOutcome, TrialRecord},
    prices::PriceVector,
    types::ProductId,
};
use serde::{Deserialize, Serialize};

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    Item,
    Combo,
}

impl ProductKind {
    fn of(offer: &Offer) -> Self {
        if offer.is_combo() { Self::Combo } else { Self::Item }
    }
}

// ── Optimization ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductOptimization {
    pub product_id: ProductId,
    pub name: String,
    pub kind: ProductKind,
    pub current_price: f64,
    pub optimal_price: f64,
    pub expected_profit: f64,
    pub expected_demand: u32,
    pub baseline_demand: u32,
    pub elasticity: Option<f64>,
    pub elasticity_class: ElasticityClass,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationReport {
    pub baseline_profit: f64,
    pub optimized_profit: f64,
    pub products: Vec<ProductOptimization>,
    pub best_pair: Option<CoPurchasePair>,
    /// Unrounded winning prices.
    pub optimal_prices: PriceVector,
    pub best_trial: TrialRecord,
    pub trials: Vec<TrialRecord>,
}

impl OptimizationReport {
    pub fn from_outcome(outcome: &OptimizationOutcome, catalog: &Catalog) -> Self {
        let products = catalog
            .offers()
            .iter()
            .map(|offer| {
                let id = offer.product_id.as_str();
                let current = outcome.baseline_prices.get(id).unwrap_or(0.0);
                let optimal = outcome.best_prices.get(id).unwrap_or(current);
                let demand = outcome.final_result.demand_of(id);
                let baseline_demand = outcome.baseline.demand_of(id);
                let elasticity = point_elasticity(
                    f64::from(baseline_demand),
                    f64::from(demand),
                    current,
                    optimal,
                );

                ProductOptimization {
                    product_id: offer.product_id.clone(),
                    name: display_name(offer, catalog),
                    kind: ProductKind::of(offer),
                    current_price: round_cents(current),
                    optimal_price: round_cents(optimal),
                    expected_profit: round_cents((optimal - offer.unit_cost) * f64::from(demand)),
                    expected_demand: demand,
                    baseline_demand,
                    elasticity,
                    elasticity_class: ElasticityClass::classify(elasticity),
                }
            })
            .collect();

        Self {
            baseline_profit: round_cents(outcome.baseline.total_profit),
            optimized_profit: round_cents(outcome.final_result.total_profit),
            products,
            best_pair: best_co_purchased_pair(&outcome.final_result.purchased_item_sets, catalog),
            optimal_prices: outcome.best_prices.clone(),
            best_trial: outcome.best_trial,
            trials: outcome.trials.clone(),
        }
    }
}

// ── Scenario ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioProduct {
    pub product_id: ProductId,
    pub kind: ProductKind,
    pub scenario_price: f64,
    pub demand: u32,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub scenario_profit: f64,
    pub products: Vec<ScenarioProduct>,
}

impl ScenarioReport {
    pub fn new(result: &SimulationResult, prices: &PriceVector, catalog: &Catalog) -> Self {
        let products = catalog
            .offers()
            .iter()
            .map(|offer| {
                let price = prices.get(&offer.product_id).unwrap_or(0.0);
                let demand = result.demand_of(&offer.product_id);
                ScenarioProduct {
                    product_id: offer.product_id.clone(),
                    kind: ProductKind::of(offer),
                    scenario_price: round_cents(price),
                    demand,
                    revenue: round_cents(price * f64::from(demand)),
                }
            })
            .collect();

        Self {
            scenario_profit: round_cents(result.total_profit),
            products,
        }
    }
}

// ── Combo popularity ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboPopularityReport {
    pub top_combos: Vec<ComboPopularity>,
    pub min_size: usize,
    pub max_size: usize,
    pub top_k: usize,
}

fn display_name(offer: &Offer, catalog: &Catalog) -> String {
    if offer.is_combo() {
        offer.product_id.clone()
    } else {
        catalog.dish_name(&offer.product_id).to_string()
    }
}
