//! Item co-occurrence analytics.
//!
//! Two views of "what sells together":
//!   - `combo_popularity` counts dish combinations across historical orders.
//!   - `best_co_purchased_pair` finds the pair most often bought by the
//!     same simulated customer.

use crate::{
    catalog::Catalog,
    error::{PricingError, PricingResult},
    orders::Order,
    types::DishId,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedDish {
    pub id: DishId,
    pub name: String,
}

impl NamedDish {
    fn resolve(id: &str, catalog: &Catalog) -> Self {
        Self {
            id: id.to_string(),
            name: catalog.dish_name(id).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboPopularity {
    pub combo_items: Vec<NamedDish>,
    #[serde(rename = "popularityScore")]
    pub popularity_score: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoPurchasePair {
    pub first: NamedDish,
    pub second: NamedDish,
    pub count: u64,
}

/// Orders with more dish units than this are logged before enumeration.
pub const LARGE_ORDER_UNITS: usize = 64;

/// Every dish unit in an order: item lines repeated by quantity, then each
/// ordered combo's members repeated by the combo quantity. Combos missing
/// from the catalog contribute nothing.
///
/// The result grows with the quantities, not the number of lines, and
/// `combo_popularity` enumerates combinations over all of its positions.
pub fn order_dish_multiset<'a>(order: &'a Order, catalog: &'a Catalog) -> Vec<&'a str> {
    let mut dishes = Vec::new();
    for line in &order.items {
        for _ in 0..line.quantity {
            dishes.push(line.dish_id.as_str());
        }
    }
    for line in order.combos() {
        let Some(combo) = catalog.combo(&line.combo_name) else {
            log::debug!(
                "co_occurrence: order {} references unknown combo '{}'",
                order.order_id,
                line.combo_name
            );
            continue;
        };
        for _ in 0..line.quantity {
            dishes.extend(combo.items.iter().map(String::as_str));
        }
    }
    dishes
}

/// Count dish combinations of every size in [min_size, max_size] across
/// `orders` and return the `top_k` most frequent.
///
/// Combinations are taken over positions of the sorted multiset and keyed
/// by the distinct dishes they contain, so two units of the same dish
/// form the single-dish key. Ties rank by first appearance.
pub fn combo_popularity(
    orders: &[Order],
    catalog: &Catalog,
    min_size: usize,
    max_size: usize,
    top_k: usize,
) -> PricingResult<Vec<ComboPopularity>> {
    if min_size == 0 || max_size < min_size {
        return Err(PricingError::InvalidComboSize { min_size, max_size });
    }

    let mut index: HashMap<BTreeSet<&str>, usize> = HashMap::new();
    let mut counts: Vec<(BTreeSet<&str>, u64)> = Vec::new();

    for order in orders {
        let mut dishes = order_dish_multiset(order, catalog);
        if dishes.len() < min_size {
            continue;
        }
        if dishes.len() > LARGE_ORDER_UNITS {
            log::debug!(
                "co_occurrence: order {} expands to {} dish units",
                order.order_id,
                dishes.len()
            );
        }
        dishes.sort_unstable();

        for size in min_size..=max_size.min(dishes.len()) {
            for_each_combination(dishes.len(), size, |positions| {
                let key: BTreeSet<&str> = positions.iter().map(|&p| dishes[p]).collect();
                match index.get(&key) {
                    Some(&slot) => counts[slot].1 += 1,
                    None => {
                        index.insert(key.clone(), counts.len());
                        counts.push((key, 1));
                    }
                }
            });
        }
    }

    // Stable sort keeps first-appearance order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(top_k);

    log::debug!(
        "co_occurrence: {} orders, sizes {min_size}..={max_size}, returning {} combos",
        orders.len(),
        counts.len()
    );

    Ok(counts
        .into_iter()
        .map(|(key, count)| ComboPopularity {
            combo_items: key.into_iter().map(|id| NamedDish::resolve(id, catalog)).collect(),
            popularity_score: count,
        })
        .collect())
}

/// The pair of menu dishes bought together by the most customers.
///
/// Pairs are scanned in menu order and only a strictly greater count
/// replaces the current best, so with no co-purchases at all the first two
/// dishes are returned with a count of zero. None when the menu has fewer
/// than two dishes.
pub fn best_co_purchased_pair(
    purchased_item_sets: &[BTreeSet<DishId>],
    catalog: &Catalog,
) -> Option<CoPurchasePair> {
    let menu = catalog.menu();
    let n = menu.len();
    if n < 2 {
        return None;
    }

    let position: HashMap<&str, usize> = menu
        .iter()
        .enumerate()
        .map(|(i, m)| (m.dish_id.as_str(), i))
        .collect();
    let mut counts = vec![0u64; n * n];

    for bag in purchased_item_sets {
        let mut idx: Vec<usize> = bag
            .iter()
            .filter_map(|id| position.get(id.as_str()).copied())
            .collect();
        idx.sort_unstable();
        for (k, &i) in idx.iter().enumerate() {
            for &j in &idx[k + 1..] {
                counts[i * n + j] += 1;
            }
        }
    }

    let mut best: Option<(usize, usize, u64)> = None;
    for i in 0..n {
        for j in i + 1..n {
            let c = counts[i * n + j];
            if best.map_or(true, |(_, _, b)| c > b) {
                best = Some((i, j, c));
            }
        }
    }

    best.map(|(i, j, count)| CoPurchasePair {
        first: NamedDish::resolve(&menu[i].dish_id, catalog),
        second: NamedDish::resolve(&menu[j].dish_id, catalog),
        count,
    })
}

/// Call `f` with every k-subset of 0..n as ascending positions,
/// in lexicographic order.
fn for_each_combination(n: usize, k: usize, mut f: impl FnMut(&[usize])) {
    if k > n {
        return;
    }
    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        f(&idx);
        let mut i = k;
        while i > 0 && idx[i - 1] == i - 1 + n - k {
            i -= 1;
        }
        if i == 0 {
            return;
        }
        idx[i - 1] += 1;
        for j in i..k {
            idx[j] = idx[j - 1] + 1;
        }
    }
}
