//! Data directory loading.

use menu_pricing_core::{
    config::PricingConfig,
    engine::PricingEngine,
    error::PricingError,
    orders::load_orders,
};
use std::fs;

const DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../data");

#[test]
fn bundled_data_directory_loads() {
    let config = PricingConfig::load(DATA_DIR, 42).expect("config");
    assert_eq!(config.seed, 42);
    assert_eq!(config.segments.segments().len(), 3);
    assert_eq!(config.segments.population_size(), 240);
    assert!(!config.menu.is_empty());

    let orders = load_orders(DATA_DIR).expect("orders");
    assert!(!orders.is_empty());

    let engine = PricingEngine::new(config, orders).expect("engine");
    assert!(engine.catalog().combos().len() >= 2);
}

#[test]
fn missing_files_surface_as_io_errors() {
    let missing = concat!(env!("CARGO_MANIFEST_DIR"), "/no-such-data-dir");

    let err = PricingConfig::load(missing, 1).unwrap_err();
    assert!(matches!(err, PricingError::Io(_)), "got {err:?}");

    let err = load_orders(missing).unwrap_err();
    assert!(matches!(err, PricingError::Io(_)), "got {err:?}");
}

#[test]
fn malformed_json_surfaces_as_serialization_error() {
    let dir = std::env::temp_dir().join(format!("menu-pricing-bad-orders-{}", std::process::id()));
    fs::create_dir_all(dir.join("orders")).unwrap();
    fs::write(dir.join("orders/orders.json"), "{ \"orders\": [ { \"order_id\": 7 ").unwrap();

    let result = load_orders(dir.to_str().unwrap());
    fs::remove_dir_all(&dir).ok();

    let err = result.unwrap_err();
    assert!(matches!(err, PricingError::Serialization(_)), "got {err:?}");
}
