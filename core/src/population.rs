use crate::{config::SegmentCatalog, rng::SimRng};
use serde::{Deserialize, Serialize};

/// No simulated diner walks in with less than this.
pub const BUDGET_FLOOR: f64 = 5.0;

/// A simulated diner. Lives for one simulation run only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub segment: String,
    /// Remaining spend; decremented as the customer buys.
    pub budget: f64,
    pub price_sensitivity: f64,
}

impl Customer {
    pub fn new(segment: impl Into<String>, budget: f64, price_sensitivity: f64) -> Self {
        Self {
            segment: segment.into(),
            budget,
            price_sensitivity,
        }
    }
}

/// Draw `count` customers per segment, in segment order.
///
/// budget = max(BUDGET_FLOOR, N(budget_mean, budget_std));
/// price_sensitivity = N(mean, std), left unclamped so a rare diner can
/// even like higher prices.
pub fn generate_population(segments: &SegmentCatalog, rng: &mut SimRng) -> Vec<Customer> {
    let mut customers = Vec::with_capacity(segments.population_size());

    for seg in segments.segments() {
        for _ in 0..seg.count {
            let budget = rng.gaussian(seg.budget_mean, seg.budget_std).max(BUDGET_FLOOR);
            let price_sensitivity =
                rng.gaussian(seg.price_sensitivity_mean, seg.price_sensitivity_std);
            customers.push(Customer::new(seg.name.clone(), budget, price_sensitivity));
        }
    }

    log::debug!(
        "population[{}]: drew {} customers from {} segments",
        rng.name,
        customers.len(),
        segments.segments().len()
    );
    customers
}
