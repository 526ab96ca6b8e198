//! Menu and combo catalog.
//!
//! The catalog is request-scoped configuration: it is validated once on
//! construction and never mutated by a simulation run. `offers()` flattens
//! it into the uniform offer list the choice model evaluates, items first
//! and combos second, each in catalog order.

use crate::{
    error::{PricingError, PricingResult},
    prices::PriceVector,
    types::{DishId, ProductId},
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub dish_id: DishId,
    pub name: String,
    pub price: f64,
    pub cost: f64,
    pub quantity_sold: u32,
    #[serde(default)]
    pub portion_size: u32,
    /// Derived from quantity_sold; None until assigned.
    #[serde(default)]
    pub baseline_utility: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combo {
    pub combo_name: String,
    /// Member dish_ids, in menu order of presentation.
    pub items: Vec<DishId>,
    pub price: f64,
    pub quantity_sold: u32,
    #[serde(default)]
    pub baseline_utility: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferKind {
    Item,
    Combo { members: Vec<DishId> },
}

/// A sellable product as the choice model sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct Offer {
    pub product_id: ProductId,
    pub kind: OfferKind,
    pub baseline_utility: f64,
    /// Item cost, or the summed cost of a combo's members.
    pub unit_cost: f64,
}

impl Offer {
    /// Dish ids a purchase of this offer puts in the customer's bag.
    pub fn dish_ids(&self) -> &[DishId] {
        match &self.kind {
            OfferKind::Item => std::slice::from_ref(&self.product_id),
            OfferKind::Combo { members } => members,
        }
    }

    pub fn is_combo(&self) -> bool {
        matches!(self.kind, OfferKind::Combo { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    menu: Vec<MenuItem>,
    combos: Vec<Combo>,
}

impl Catalog {
    /// Validate and wrap a menu and combo list.
    pub fn new(menu: Vec<MenuItem>, combos: Vec<Combo>) -> PricingResult<Self> {
        let mut dish_ids = HashSet::new();
        for item in &menu {
            if !dish_ids.insert(item.dish_id.as_str()) {
                return Err(invalid(format!("duplicate dish_id '{}'", item.dish_id)));
            }
            check_amount(&item.dish_id, "price", item.price)?;
            check_amount(&item.dish_id, "cost", item.cost)?;
        }

        let mut combo_names = HashSet::new();
        for combo in &combos {
            if !combo_names.insert(combo.combo_name.as_str()) {
                return Err(invalid(format!("duplicate combo_name '{}'", combo.combo_name)));
            }
            if dish_ids.contains(combo.combo_name.as_str()) {
                return Err(invalid(format!(
                    "combo_name '{}' collides with a dish_id",
                    combo.combo_name
                )));
            }
            check_amount(&combo.combo_name, "price", combo.price)?;
            for member in &combo.items {
                if !dish_ids.contains(member.as_str()) {
                    return Err(invalid(format!(
                        "combo '{}' references unknown dish_id '{member}'",
                        combo.combo_name
                    )));
                }
            }
        }

        Ok(Self { menu, combos })
    }

    pub fn menu(&self) -> &[MenuItem] {
        &self.menu
    }

    pub fn combos(&self) -> &[Combo] {
        &self.combos
    }

    pub fn is_empty(&self) -> bool {
        self.menu.is_empty() && self.combos.is_empty()
    }

    pub fn item(&self, dish_id: &str) -> Option<&MenuItem> {
        self.menu.iter().find(|m| m.dish_id == dish_id)
    }

    pub fn combo(&self, combo_name: &str) -> Option<&Combo> {
        self.combos.iter().find(|c| c.combo_name == combo_name)
    }

    /// Display name of a dish, "Unknown" when it is not on the menu.
    pub fn dish_name(&self, dish_id: &str) -> &str {
        self.item(dish_id).map_or("Unknown", |m| m.name.as_str())
    }

    /// Every product id, items then combos.
    pub fn product_ids(&self) -> impl Iterator<Item = &str> {
        self.menu
            .iter()
            .map(|m| m.dish_id.as_str())
            .chain(self.combos.iter().map(|c| c.combo_name.as_str()))
    }

    /// The catalog's listed prices as a complete PriceVector.
    pub fn base_prices(&self) -> PriceVector {
        self.menu
            .iter()
            .map(|m| (m.dish_id.clone(), m.price))
            .chain(self.combos.iter().map(|c| (c.combo_name.clone(), c.price)))
            .collect()
    }

    /// Summed cost of a combo's member dishes.
    pub fn combo_cost(&self, combo: &Combo) -> f64 {
        combo
            .items
            .iter()
            .filter_map(|id| self.item(id))
            .map(|m| m.cost)
            .sum()
    }

    /// Derive baseline utilities from historical sales: ln(1 + sold),
    /// mean-centered separately within items and within combos.
    pub fn assign_baseline_utilities(&mut self) {
        let item_sales: Vec<u32> = self.menu.iter().map(|m| m.quantity_sold).collect();
        for (item, u) in self.menu.iter_mut().zip(baseline_utilities(&item_sales)) {
            item.baseline_utility = Some(u);
        }

        let combo_sales: Vec<u32> = self.combos.iter().map(|c| c.quantity_sold).collect();
        for (combo, u) in self.combos.iter_mut().zip(baseline_utilities(&combo_sales)) {
            combo.baseline_utility = Some(u);
        }
    }

    /// Flatten into offers in evaluation order. Unassigned utilities
    /// count as 0.0.
    pub fn offers(&self) -> Vec<Offer> {
        let items = self.menu.iter().map(|m| Offer {
            product_id: m.dish_id.clone(),
            kind: OfferKind::Item,
            baseline_utility: m.baseline_utility.unwrap_or(0.0),
            unit_cost: m.cost,
        });
        let combos = self.combos.iter().map(|c| Offer {
            product_id: c.combo_name.clone(),
            kind: OfferKind::Combo { members: c.items.clone() },
            baseline_utility: c.baseline_utility.unwrap_or(0.0),
            unit_cost: self.combo_cost(c),
        });
        items.chain(combos).collect()
    }
}

/// Mean-centered log popularity. Empty input yields an empty vec.
pub fn baseline_utilities(quantities: &[u32]) -> Vec<f64> {
    if quantities.is_empty() {
        return Vec::new();
    }
    let logs: Vec<f64> = quantities.iter().map(|&q| (f64::from(q) + 1.0).ln()).collect();
    let mean = logs.iter().sum::<f64>() / logs.len() as f64;
    logs.into_iter().map(|l| l - mean).collect()
}

fn check_amount(id: &str, field: &str, value: f64) -> PricingResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(format!("{id}.{field} must be a non-negative number, got {value}")));
    }
    Ok(())
}

fn invalid(reason: String) -> PricingError {
    PricingError::InvalidCatalog { reason }
}
