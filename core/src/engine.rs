//! The pricing engine: one instance per request.
//!
//! RULES:
//!   - Everything an operation needs arrives through the constructor;
//!     there is no process-wide catalog or order log.
//!   - All randomness flows through the RngBank, one stream per run.
//!   - Operations take &self, so the same engine answers repeated calls
//!     with identical results.

use crate::{
    catalog::Catalog,
    co_occurrence::combo_popularity,
    config::PricingConfig,
    error::PricingResult,
    heat::{heat_scores, HeatScores},
    market::MarketSimulator,
    optimizer::PriceOptimizer,
    orders::Order,
    report::{ComboPopularityReport, OptimizationReport, ScenarioReport},
    rng::{RngBank, RunSlot},
    types::Seed,
};
use std::collections::HashMap;

pub struct PricingEngine {
    pub rng_bank: RngBank,
    config: PricingConfig,
    catalog: Catalog,
    orders: Vec<Order>,
}

impl PricingEngine {
    /// Validate the catalog and assign baseline utilities.
    pub fn new(config: PricingConfig, orders: Vec<Order>) -> PricingResult<Self> {
        let mut catalog = config.catalog()?;
        catalog.assign_baseline_utilities();
        log::info!(
            "engine: seed={} products={} customers/run={} orders={}",
            config.seed,
            catalog.menu().len() + catalog.combos().len(),
            config.segments.population_size(),
            orders.len()
        );
        Ok(Self {
            rng_bank: RngBank::new(config.seed),
            config,
            catalog,
            orders,
        })
    }

    /// Engine over the in-code test fixture, with no order history.
    pub fn build_test(seed: Seed) -> PricingResult<Self> {
        let config = PricingConfig {
            seed,
            ..PricingConfig::default_test()
        };
        Self::new(config, Vec::new())
    }

    pub fn with_orders(mut self, orders: Vec<Order>) -> Self {
        self.orders = orders;
        self
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Search `trials` random price configurations around the listed prices.
    pub fn optimize(&self, trials: u32) -> PricingResult<OptimizationReport> {
        let mut settings = self.config.optimizer.clone();
        settings.trials = trials;
        let optimizer = PriceOptimizer::new(
            self.catalog.clone(),
            self.config.segments.clone(),
            settings,
        );
        let outcome = optimizer.optimize(&self.catalog.base_prices(), &self.rng_bank)?;
        Ok(OptimizationReport::from_outcome(&outcome, optimizer.catalog()))
    }

    /// Simulate listed prices scaled by per-product multipliers.
    pub fn scenario(&self, multipliers: &HashMap<String, f64>) -> PricingResult<ScenarioReport> {
        let prices = self.catalog.base_prices().scaled(multipliers)?;
        let market = MarketSimulator::new(&self.catalog);
        let mut rng = self.rng_bank.for_run(RunSlot::Scenario);
        let result = market.simulate_fresh(&self.config.segments, &prices, &mut rng)?;
        log::info!(
            "engine: scenario with {} multipliers, profit={:.2}",
            multipliers.len(),
            result.total_profit
        );
        Ok(ScenarioReport::new(&result, &prices, &self.catalog))
    }

    pub fn heat_scores(&self, dish_id: &str) -> HeatScores {
        heat_scores(dish_id, &self.orders)
    }

    pub fn combo_popularity(
        &self,
        min_size: usize,
        max_size: usize,
        top_k: usize,
    ) -> PricingResult<ComboPopularityReport> {
        let top_combos = combo_popularity(&self.orders, &self.catalog, min_size, max_size, top_k)?;
        Ok(ComboPopularityReport {
            top_combos,
            min_size,
            max_size,
            top_k,
        })
    }
}
