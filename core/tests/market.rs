//! Market aggregation tests: demand, profit and purchase sets.

use menu_pricing_core::{
    catalog::{Catalog, Combo, MenuItem},
    config::{PricingConfig, SegmentCatalog},
    error::PricingError,
    market::MarketSimulator,
    population::Customer,
    prices::PriceVector,
    rng::SimRng,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn dish(id: &str, price: f64, cost: f64, sold: u32) -> MenuItem {
    MenuItem {
        dish_id: id.into(),
        name: format!("Dish {id}"),
        price,
        cost,
        quantity_sold: sold,
        portion_size: 200,
        baseline_utility: None,
    }
}

/// Two dishes and one combo of both. Utilities are pinned so the choice
/// outcome is fully determined by prices and budgets.
fn pinned_catalog(item_utility: f64, combo_utility: f64) -> Catalog {
    let mut a = dish("A", 10.0, 4.0, 10);
    let mut b = dish("B", 8.0, 3.0, 10);
    a.baseline_utility = Some(item_utility);
    b.baseline_utility = Some(item_utility);
    let combo = Combo {
        combo_name: "A+B".into(),
        items: vec!["A".into(), "B".into()],
        price: 15.0,
        quantity_sold: 10,
        baseline_utility: Some(combo_utility),
    };
    Catalog::new(vec![a, b], vec![combo]).unwrap()
}

fn test_market() -> (Catalog, MarketSimulator) {
    let config = PricingConfig::default_test();
    let mut catalog = config.catalog().unwrap();
    catalog.assign_baseline_utilities();
    let market = MarketSimulator::new(&catalog);
    (catalog, market)
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// Every product has a demand entry, even when nobody buys it.
#[test]
fn total_demand_covers_every_product() {
    let (catalog, market) = test_market();

    // Price everything out of reach: demand is all zeros but still present.
    let mut prices = PriceVector::new();
    for id in catalog.product_ids() {
        prices.insert(id, 10_000.0);
    }
    let result = market
        .simulate_fresh(&SegmentCatalog::standard(), &prices, &mut SimRng::from_seed(1))
        .unwrap();

    assert_eq!(result.total_demand.len(), catalog.product_ids().count());
    for id in catalog.product_ids() {
        assert_eq!(result.total_demand.get(id), Some(&0), "missing or non-zero demand for {id}");
    }
    assert_eq!(result.total_profit, 0.0);
    assert!(result.purchased_item_sets.iter().all(|s| s.is_empty()));
}

#[test]
fn one_purchase_set_per_customer() {
    let (catalog, market) = test_market();
    let result = market
        .simulate_fresh(&SegmentCatalog::standard(), &catalog.base_prices(), &mut SimRng::from_seed(2))
        .unwrap();

    assert_eq!(result.purchased_item_sets.len(), 240);
    assert!(result.total_demand.values().sum::<u32>() > 0, "Nobody bought anything at list prices");
}

#[test]
fn missing_price_is_a_configuration_error() {
    let (catalog, market) = test_market();
    let mut prices = PriceVector::new();
    for id in catalog.product_ids().filter(|id| *id != "EN002") {
        prices.insert(id, 5.0);
    }

    let err = market
        .simulate_fresh(&SegmentCatalog::standard(), &prices, &mut SimRng::from_seed(3))
        .unwrap_err();
    match err {
        PricingError::MissingPrice { product_id } => assert_eq!(product_id, "EN002"),
        other => panic!("expected MissingPrice, got {other:?}"),
    }
}

/// Item profit is (price - cost) × quantity.
#[test]
fn item_profit_uses_item_cost() {
    let catalog = pinned_catalog(100.0, -100.0);
    let market = MarketSimulator::new(&catalog);
    // Budget 10 affords exactly one A and nothing else.
    let mut customers = vec![Customer::new("test", 10.0, 0.0)];

    let result = market
        .simulate(&mut customers, &catalog.base_prices(), &mut SimRng::from_seed(4))
        .unwrap();

    assert_eq!(result.demand_of("A"), 1);
    assert_eq!(result.demand_of("B"), 0);
    assert_eq!(result.demand_of("A+B"), 0);
    assert!((result.total_profit - 6.0).abs() < 1e-9, "profit {}", result.total_profit);
}

/// Combo profit is (price - Σ member cost) × quantity, and the purchase
/// set holds the combo's member dishes.
#[test]
fn combo_profit_and_expansion() {
    let catalog = pinned_catalog(-100.0, 100.0);
    let market = MarketSimulator::new(&catalog);
    let mut customers = vec![Customer::new("test", 15.0, 0.0)];

    let result = market
        .simulate(&mut customers, &catalog.base_prices(), &mut SimRng::from_seed(5))
        .unwrap();

    assert_eq!(result.demand_of("A+B"), 1);
    assert!((result.total_profit - 8.0).abs() < 1e-9, "profit {}", result.total_profit);
    let bag: Vec<&str> = result.purchased_item_sets[0].iter().map(String::as_str).collect();
    assert_eq!(bag, vec!["A", "B"]);
    assert_eq!(customers[0].budget, 0.0);
}

#[test]
fn fixed_customers_and_stream_are_deterministic() {
    let (catalog, market) = test_market();
    let customers: Vec<Customer> = (0..50)
        .map(|i| Customer::new("fixed", 20.0 + i as f64, -0.05))
        .collect();

    let run = || {
        let mut cs = customers.clone();
        market
            .simulate(&mut cs, &catalog.base_prices(), &mut SimRng::from_seed(6))
            .unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn invalid_catalogs_are_rejected() {
    let unknown_member = Catalog::new(
        vec![dish("A", 5.0, 1.0, 1)],
        vec![Combo {
            combo_name: "A+Z".into(),
            items: vec!["A".into(), "Z".into()],
            price: 9.0,
            quantity_sold: 1,
            baseline_utility: None,
        }],
    );
    assert!(matches!(unknown_member, Err(PricingError::InvalidCatalog { .. })));

    let duplicate = Catalog::new(vec![dish("A", 5.0, 1.0, 1), dish("A", 6.0, 1.0, 1)], vec![]);
    assert!(matches!(duplicate, Err(PricingError::InvalidCatalog { .. })));

    let negative = Catalog::new(vec![dish("A", -5.0, 1.0, 1)], vec![]);
    assert!(matches!(negative, Err(PricingError::InvalidCatalog { .. })));
}

#[test]
fn baseline_utilities_are_mean_centered_per_group() {
    let (catalog, _) = test_market();

    let item_sum: f64 = catalog.menu().iter().map(|m| m.baseline_utility.unwrap()).sum();
    let combo_sum: f64 = catalog.combos().iter().map(|c| c.baseline_utility.unwrap()).sum();
    assert!(item_sum.abs() < 1e-9, "item utilities sum to {item_sum}");
    assert!(combo_sum.abs() < 1e-9, "combo utilities sum to {combo_sum}");

    // Best seller gets the highest utility.
    let best = catalog.menu().iter().max_by_key(|m| m.quantity_sold).unwrap();
    assert!(catalog
        .menu()
        .iter()
        .all(|m| m.baseline_utility.unwrap() <= best.baseline_utility.unwrap()));
}
