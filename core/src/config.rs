use crate::{
    catalog::{Catalog, Combo, MenuItem},
    error::{PricingError, PricingResult},
    optimizer::DEFAULT_TRIALS,
    types::Seed,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

// ── Customer segments ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentConfig {
    pub name: String,
    /// Customers drawn from this segment per simulation run.
    pub count: usize,
    pub budget_mean: f64,
    pub budget_std: f64,
    /// Typically negative: higher prices lower purchase utility.
    pub price_sensitivity_mean: f64,
    pub price_sensitivity_std: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentCatalog {
    segments: Vec<SegmentConfig>,
}

impl SegmentCatalog {
    pub fn new(segments: Vec<SegmentConfig>) -> Self {
        Self { segments }
    }

    /// The three standard diner segments.
    pub fn standard() -> Self {
        Self::new(vec![
            SegmentConfig {
                name: "frequent".into(),
                count: 100,
                budget_mean: 80.0,
                budget_std: 20.0,
                price_sensitivity_mean: -0.04,
                price_sensitivity_std: 0.01,
            },
            SegmentConfig {
                name: "occasional".into(),
                count: 80,
                budget_mean: 50.0,
                budget_std: 15.0,
                price_sensitivity_mean: -0.06,
                price_sensitivity_std: 0.01,
            },
            SegmentConfig {
                name: "rare".into(),
                count: 60,
                budget_mean: 30.0,
                budget_std: 10.0,
                price_sensitivity_mean: -0.08,
                price_sensitivity_std: 0.02,
            },
        ])
    }

    pub fn segments(&self) -> &[SegmentConfig] {
        &self.segments
    }

    pub fn population_size(&self) -> usize {
        self.segments.iter().map(|s| s.count).sum()
    }
}

// ── Optimizer settings ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    pub trials: u32,
    /// Trial prices are baseline × Uniform(multiplier_low, multiplier_high).
    pub multiplier_low: f64,
    pub multiplier_high: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            multiplier_low: 0.7,
            multiplier_high: 1.3,
        }
    }
}

// ── Files ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
struct SegmentsFile {
    segments: Vec<SegmentConfig>,
}

#[derive(Debug, Clone, Deserialize)]
struct MenuFile {
    items: Vec<MenuItem>,
}

#[derive(Debug, Clone, Deserialize)]
struct CombosFile {
    combos: Vec<Combo>,
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &str) -> PricingResult<T> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        log::error!("config: cannot read {path}: {e}");
        e
    })?;
    serde_json::from_str(&content).map_err(|e| {
        log::error!("config: cannot parse {path}: {e}");
        PricingError::from(e)
    })
}

// ── Request configuration ──────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct PricingConfig {
    pub seed: Seed,
    pub segments: SegmentCatalog,
    pub menu: Vec<MenuItem>,
    pub combos: Vec<Combo>,
    pub optimizer: OptimizerConfig,
}

impl PricingConfig {
    /// Load from the data/ directory.
    /// In tests, use PricingConfig::default_test().
    pub fn load(data_dir: &str, seed: Seed) -> PricingResult<Self> {
        let segments: SegmentsFile = read_json(&format!("{data_dir}/segments/segments.json"))?;
        let menu: MenuFile = read_json(&format!("{data_dir}/menu/menu_items.json"))?;
        let combos: CombosFile = read_json(&format!("{data_dir}/menu/combos.json"))?;

        log::info!(
            "config: loaded {} segments, {} menu items, {} combos from {data_dir}",
            segments.segments.len(),
            menu.items.len(),
            combos.combos.len()
        );

        Ok(Self {
            seed,
            segments: SegmentCatalog::new(segments.segments),
            menu: menu.items,
            combos: combos.combos,
            optimizer: OptimizerConfig::default(),
        })
    }

    /// Validated catalog view of the menu and combos.
    pub fn catalog(&self) -> PricingResult<Catalog> {
        Catalog::new(self.menu.clone(), self.combos.clone())
    }

    /// Small in-code fixture: standard segments, six dishes, two combos.
    pub fn default_test() -> Self {
        let dish = |dish_id: &str, name: &str, price: f64, cost: f64, sold: u32| MenuItem {
            dish_id: dish_id.into(),
            name: name.into(),
            price,
            cost,
            quantity_sold: sold,
            portion_size: 250,
            baseline_utility: None,
        };

        let menu = vec![
            dish("AP001", "Spring Rolls", 5.00, 2.50, 120),
            dish("AP002", "Crab Rangoon", 6.50, 3.00, 110),
            dish("EN001", "Kung Pao Chicken", 12.00, 6.00, 140),
            dish("EN002", "Mongolian Beef", 13.50, 7.00, 120),
            dish("SO001", "Hot and Sour Soup", 4.50, 1.50, 150),
            dish("DR001", "Green Tea", 2.50, 0.80, 200),
        ];

        let combos = vec![
            Combo {
                combo_name: "Appetizer + Entree".into(),
                items: vec!["AP001".into(), "EN001".into()],
                price: 15.00,
                quantity_sold: 60,
                baseline_utility: None,
            },
            Combo {
                combo_name: "Soup + Entree".into(),
                items: vec!["SO001".into(), "EN002".into()],
                price: 16.00,
                quantity_sold: 55,
                baseline_utility: None,
            },
        ];

        Self {
            seed: 42,
            segments: SegmentCatalog::standard(),
            menu,
            combos,
            optimizer: OptimizerConfig::default(),
        }
    }
}
