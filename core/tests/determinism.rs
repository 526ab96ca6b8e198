//! THE MOST IMPORTANT TEST IN THE PROJECT.
//!
//! Two engines, same seed, same request.
//! They must produce byte-identical reports.
//! Any divergence is a blocker. Do not merge until fixed.

use menu_pricing_core::{
    config::PricingConfig,
    engine::PricingEngine,
    market::MarketSimulator,
    population::generate_population,
    rng::SimRng,
};
use std::collections::HashMap;

fn build_engine(seed: u64) -> PricingEngine {
    PricingEngine::build_test(seed).expect("test engine")
}

#[test]
fn same_seed_produces_identical_optimization_reports() {
    const SEED: u64 = 0xDEAD_BEEF_CAFE_1234;

    let report_a = build_engine(SEED).optimize(20).expect("engine_a optimize");
    let report_b = build_engine(SEED).optimize(20).expect("engine_b optimize");

    let json_a = serde_json::to_string(&report_a).unwrap();
    let json_b = serde_json::to_string(&report_b).unwrap();
    assert_eq!(json_a, json_b, "Reports diverged for identical seeds");
}

#[test]
fn repeated_calls_on_one_engine_are_identical() {
    let engine = build_engine(77);

    let first = engine.optimize(10).unwrap();
    let second = engine.optimize(10).unwrap();
    assert_eq!(first, second, "Engine state leaked between optimize() calls");

    let multipliers = HashMap::from([("EN001".to_string(), 1.1)]);
    assert_eq!(
        engine.scenario(&multipliers).unwrap(),
        engine.scenario(&multipliers).unwrap(),
        "Scenario results differ between calls"
    );
}

#[test]
fn different_seeds_produce_different_reports() {
    let report_a = build_engine(42).optimize(10).unwrap();
    let report_b = build_engine(99).optimize(10).unwrap();

    assert_ne!(
        report_a.trials, report_b.trials,
        "Different seeds produced identical trial scores; seed is not being used"
    );
}

/// Population generation + choice + aggregation, driven by hand with a
/// fixed stream, is bit-identical across repetitions.
#[test]
fn fixed_stream_runs_are_bit_identical() {
    let config = PricingConfig::default_test();
    let mut catalog = config.catalog().unwrap();
    catalog.assign_baseline_utilities();
    let market = MarketSimulator::new(&catalog);
    let prices = catalog.base_prices();

    let run = || {
        let mut rng = SimRng::from_seed(2024);
        let mut customers = generate_population(&config.segments, &mut rng);
        market.simulate(&mut customers, &prices, &mut rng).unwrap()
    };

    let a = run();
    let b = run();
    assert_eq!(a.total_profit.to_bits(), b.total_profit.to_bits());
    assert_eq!(a.total_demand, b.total_demand);
    assert_eq!(a.purchased_item_sets, b.purchased_item_sets);
}
