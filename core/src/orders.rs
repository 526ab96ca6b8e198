//! Historical point-of-sale orders. Read-only input to the analytics.

use crate::{error::PricingResult, types::DishId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub dish_id: DishId,
    pub quantity: u32,
    #[serde(default)]
    pub special_instructions: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCombo {
    pub combo_name: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    /// dine-in | takeout | delivery
    pub dining_option: String,
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub combos: Option<Vec<OrderCombo>>,
    #[serde(default)]
    pub guest_name: Option<String>,
    #[serde(default)]
    pub delivery_address: Option<String>,
    /// ISO-8601, with or without offset.
    #[serde(default)]
    pub order_timestamp: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
    /// Weekday name; overrides the weekday derived from the timestamp.
    #[serde(default)]
    pub day: Option<String>,
}

impl Order {
    pub fn combos(&self) -> &[OrderCombo] {
        self.combos.as_deref().unwrap_or(&[])
    }

    /// Units of `dish_id` ordered as individual item lines.
    pub fn item_quantity(&self, dish_id: &str) -> u64 {
        self.items
            .iter()
            .filter(|i| i.dish_id == dish_id)
            .map(|i| u64::from(i.quantity))
            .sum()
    }
}

#[derive(Debug, Clone, Deserialize)]
struct OrdersFile {
    orders: Vec<Order>,
}

/// Load `{data_dir}/orders/orders.json`.
pub fn load_orders(data_dir: &str) -> PricingResult<Vec<Order>> {
    let file: OrdersFile = crate::config::read_json(&format!("{data_dir}/orders/orders.json"))?;
    log::info!("orders: loaded {} historical orders", file.orders.len());
    Ok(file.orders)
}
