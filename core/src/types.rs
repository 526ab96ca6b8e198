//! Shared primitive types used across the pricing engine.

/// A sellable product id: either a menu dish_id or a combo_name.
pub type ProductId = String;

/// A menu dish identifier, e.g. "AP001".
pub type DishId = String;

/// The master seed a request's random streams are derived from.
pub type Seed = u64;
