//! Randomized price search.
//!
//! SEQUENCE (fixed):
//!   1. Baseline utilities from historical sales.
//!   2. Baseline run at the listed prices.
//!   3. N trials: every price scaled by its own Uniform(lo, hi) draw,
//!      each trial scored on a fresh population.
//!   4. Final run at the winning prices on yet another population.
//!
//! The final run, not the winning trial, is what gets reported.

use crate::{
    catalog::Catalog,
    config::{OptimizerConfig, SegmentCatalog},
    error::{PricingError, PricingResult},
    market::{MarketSimulator, SimulationResult},
    prices::PriceVector,
    rng::{RngBank, RunSlot, SimRng},
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TRIALS: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub trial: u32,
    pub profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationOutcome {
    pub baseline_prices: PriceVector,
    pub baseline: SimulationResult,
    pub best_trial: TrialRecord,
    pub best_prices: PriceVector,
    /// Authoritative numbers at `best_prices`.
    pub final_result: SimulationResult,
    /// Every trial's score, in trial order.
    pub trials: Vec<TrialRecord>,
}

pub struct PriceOptimizer {
    catalog: Catalog,
    segments: SegmentCatalog,
    settings: OptimizerConfig,
    market: MarketSimulator,
}

impl PriceOptimizer {
    /// Takes its own copy of the catalog and assigns baseline utilities.
    pub fn new(mut catalog: Catalog, segments: SegmentCatalog, settings: OptimizerConfig) -> Self {
        catalog.assign_baseline_utilities();
        let market = MarketSimulator::new(&catalog);
        Self {
            catalog,
            segments,
            settings,
            market,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn optimize(
        &self,
        baseline_prices: &PriceVector,
        bank: &RngBank,
    ) -> PricingResult<OptimizationOutcome> {
        let trials = self.settings.trials;
        if trials == 0 || self.catalog.is_empty() {
            log::warn!(
                "optimizer: nothing to search (trials={trials}, products={})",
                self.market.offers().len()
            );
            return Err(PricingError::NoOptimumFound { trials });
        }

        let mut rng = bank.for_run(RunSlot::Baseline);
        let baseline = self.market.simulate_fresh(&self.segments, baseline_prices, &mut rng)?;
        log::info!("optimizer: baseline profit={:.2}", baseline.total_profit);

        let mut price_rng = bank.for_run(RunSlot::PriceDraw);
        let mut records = Vec::with_capacity(trials as usize);
        let mut best: Option<(TrialRecord, PriceVector)> = None;

        for trial in 0..trials {
            let trial_prices = self.draw_trial_prices(baseline_prices, &mut price_rng)?;
            let mut rng = bank.for_run(RunSlot::Trial(trial));
            let result = self.market.simulate_fresh(&self.segments, &trial_prices, &mut rng)?;

            let record = TrialRecord {
                trial,
                profit: result.total_profit,
            };
            records.push(record);

            let improved = match &best {
                Some((b, _)) => record.profit > b.profit,
                None => !record.profit.is_nan(),
            };
            log::debug!(
                "optimizer: trial {trial} profit={:.2}{}",
                record.profit,
                if improved { " (best so far)" } else { "" }
            );
            if improved {
                best = Some((record, trial_prices));
            }
        }

        let (best_trial, best_prices) = best.ok_or(PricingError::NoOptimumFound { trials })?;

        let mut rng = bank.for_run(RunSlot::Final);
        let final_result = self.market.simulate_fresh(&self.segments, &best_prices, &mut rng)?;

        log::info!(
            "optimizer: best trial {} profit={:.2}, final run profit={:.2}",
            best_trial.trial,
            best_trial.profit,
            final_result.total_profit
        );

        Ok(OptimizationOutcome {
            baseline_prices: baseline_prices.clone(),
            baseline,
            best_trial,
            best_prices,
            final_result,
            trials: records,
        })
    }

    /// One independent multiplier per product, drawn in catalog order.
    fn draw_trial_prices(
        &self,
        baseline: &PriceVector,
        rng: &mut SimRng,
    ) -> PricingResult<PriceVector> {
        let (lo, hi) = (self.settings.multiplier_low, self.settings.multiplier_high);
        let mut prices = PriceVector::new();
        for offer in self.market.offers() {
            let base = baseline
                .get(&offer.product_id)
                .ok_or_else(|| PricingError::MissingPrice {
                    product_id: offer.product_id.clone(),
                })?;
            prices.insert(offer.product_id.clone(), base * rng.uniform(lo, hi));
        }
        Ok(prices)
    }
}
