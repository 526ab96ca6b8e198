//! Per-customer discrete-choice purchase model.
//!
//! Offers are evaluated strictly in the order given (items, then combos)
//! against a single budget that shrinks as the customer buys. Changing the
//! order changes who can still afford what, so the order is part of the
//! model's contract.

use crate::{catalog::Offer, population::Customer, rng::SimRng};
use std::collections::BTreeMap;

/// Most units of one offer a customer takes in a single visit.
pub const MAX_UNITS_PER_OFFER: u32 = 3;

/// Logistic purchase probability, flattened by a factor of two.
pub fn purchase_probability(utility: f64) -> f64 {
    1.0 / (1.0 + (-utility / 2.0).exp())
}

/// Simulate one customer's visit.
///
/// `prices[i]` is the price of `offers[i]`. Returns purchased quantities
/// keyed by product id; offers not bought are absent.
pub fn choose_offers<'a>(
    customer: &mut Customer,
    offers: &'a [Offer],
    prices: &[f64],
    rng: &mut SimRng,
) -> BTreeMap<&'a str, u32> {
    debug_assert_eq!(offers.len(), prices.len(), "one price per offer");
    let mut purchases = BTreeMap::new();

    for (offer, &price) in offers.iter().zip(prices) {
        let utility = offer.baseline_utility + customer.price_sensitivity * price;
        let p_buy = purchase_probability(utility);

        // The roll is always drawn so stream usage does not depend on budget.
        let roll = rng.next_f64();
        if roll >= p_buy || customer.budget < price {
            continue;
        }

        let max_units = max_affordable_units(customer.budget, price);
        if max_units == 0 {
            continue;
        }

        let mut quantity = rng.int_inclusive(1, max_units);
        let total = f64::from(quantity) * price;
        if total <= customer.budget {
            customer.budget -= total;
        } else {
            // Float rounding fallback; floor(budget / price) normally rules this out.
            quantity = 1;
            customer.budget -= price;
        }

        *purchases.entry(offer.product_id.as_str()).or_insert(0) += quantity;
    }

    purchases
}

fn max_affordable_units(budget: f64, price: f64) -> u32 {
    if price <= 0.0 {
        return MAX_UNITS_PER_OFFER;
    }
    let affordable = (budget / price).floor();
    if affordable >= f64::from(MAX_UNITS_PER_OFFER) {
        MAX_UNITS_PER_OFFER
    } else {
        affordable.max(0.0) as u32
    }
}
