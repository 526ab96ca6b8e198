//! Randomized price search tests.

use menu_pricing_core::{
    catalog::Catalog,
    config::{OptimizerConfig, PricingConfig, SegmentCatalog},
    engine::PricingEngine,
    error::PricingError,
    optimizer::PriceOptimizer,
    report::{OptimizationReport, ProductKind},
    rng::RngBank,
};

fn build_optimizer(segments: SegmentCatalog, trials: u32) -> (PriceOptimizer, Catalog) {
    let config = PricingConfig::default_test();
    let catalog = config.catalog().unwrap();
    let settings = OptimizerConfig {
        trials,
        ..OptimizerConfig::default()
    };
    (PriceOptimizer::new(catalog.clone(), segments, settings), catalog)
}

#[test]
fn best_trial_beats_or_ties_every_trial() {
    let report = PricingEngine::build_test(42).unwrap().optimize(25).unwrap();

    assert_eq!(report.trials.len(), 25);
    for (i, t) in report.trials.iter().enumerate() {
        assert_eq!(t.trial as usize, i, "Trials out of order");
        assert!(t.profit <= report.best_trial.profit, "Trial {i} beat the reported best");
    }
    assert_eq!(report.trials[report.best_trial.trial as usize], report.best_trial);
}

#[test]
fn zero_trials_finds_no_optimum() {
    let err = PricingEngine::build_test(1).unwrap().optimize(0).unwrap_err();
    assert!(matches!(err, PricingError::NoOptimumFound { trials: 0 }), "got {err:?}");
}

#[test]
fn empty_catalog_finds_no_optimum() {
    let settings = OptimizerConfig::default();
    let empty = Catalog::new(vec![], vec![]).unwrap();
    let optimizer = PriceOptimizer::new(empty.clone(), SegmentCatalog::standard(), settings);

    let err = optimizer.optimize(&empty.base_prices(), &RngBank::new(9)).unwrap_err();
    assert!(matches!(err, PricingError::NoOptimumFound { .. }), "got {err:?}");
}

#[test]
fn optimal_prices_stay_inside_multiplier_band() {
    let engine = PricingEngine::build_test(7).unwrap();
    let report = engine.optimize(30).unwrap();
    let base = engine.catalog().base_prices();

    assert_eq!(report.optimal_prices.len(), base.len());
    for (id, price) in report.optimal_prices.iter() {
        let listed = base.get(id).unwrap();
        let ratio = price / listed;
        assert!(
            (0.7 - 1e-9..=1.3 + 1e-9).contains(&ratio),
            "{id}: {price:.4} is {ratio:.4}x the listed {listed:.2}"
        );
    }
}

/// With nobody in the market every trial scores zero, and ties keep the
/// earliest trial.
#[test]
fn ties_keep_the_first_trial() {
    let (optimizer, catalog) = build_optimizer(SegmentCatalog::new(vec![]), 10);
    let outcome = optimizer.optimize(&catalog.base_prices(), &RngBank::new(3)).unwrap();

    assert!(outcome.trials.iter().all(|t| t.profit == 0.0));
    assert_eq!(outcome.best_trial.trial, 0);
    assert_eq!(outcome.final_result.total_profit, 0.0);
}

#[test]
fn final_run_is_reported_not_the_winning_trial() {
    let (optimizer, catalog) = build_optimizer(SegmentCatalog::standard(), 15);
    let outcome = optimizer.optimize(&catalog.base_prices(), &RngBank::new(2024)).unwrap();

    let report = OptimizationReport::from_outcome(&outcome, optimizer.catalog());
    let rounded = (outcome.final_result.total_profit * 100.0).round() / 100.0;
    assert_eq!(report.optimized_profit, rounded);
    assert_eq!(report.best_trial, outcome.best_trial);
}

#[test]
fn report_lists_items_then_combos() {
    let engine = PricingEngine::build_test(11).unwrap();
    let report = engine.optimize(5).unwrap();

    let kinds: Vec<ProductKind> = report.products.iter().map(|p| p.kind).collect();
    let first_combo = kinds.iter().position(|k| *k == ProductKind::Combo).unwrap();
    assert_eq!(first_combo, engine.catalog().menu().len());
    assert!(kinds[first_combo..].iter().all(|k| *k == ProductKind::Combo));

    let spring_rolls = report.products.iter().find(|p| p.product_id == "AP001").unwrap();
    assert_eq!(spring_rolls.name, "Spring Rolls");
    assert_eq!(spring_rolls.current_price, 5.0);
    assert!(report.best_pair.is_some());
}
