use serde::{Deserialize, Serialize};

/// Point price elasticity of demand between a baseline and a new state:
/// ((Q2 - Q1) / Q1) / ((P2 - P1) / P1).
///
/// None when the baseline demand or price is zero, or the price did not
/// move.
pub fn point_elasticity(
    baseline_demand: f64,
    new_demand: f64,
    baseline_price: f64,
    new_price: f64,
) -> Option<f64> {
    if baseline_demand == 0.0 || baseline_price == 0.0 {
        return None;
    }
    let pct_change_demand = (new_demand - baseline_demand) / baseline_demand;
    let pct_change_price = (new_price - baseline_price) / baseline_price;
    if pct_change_price == 0.0 {
        return None;
    }
    Some(pct_change_demand / pct_change_price)
}

/// Coarse demand classification. Sign is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElasticityClass {
    Inelastic,
    Elastic,
    InsufficientData,
}

impl ElasticityClass {
    pub fn classify(elasticity: Option<f64>) -> Self {
        match elasticity {
            Some(e) if e.abs() < 1.0 => Self::Inelastic,
            Some(_) => Self::Elastic,
            None => Self::InsufficientData,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Inelastic        => "Inelastic demand",
            Self::Elastic          => "Elastic demand",
            Self::InsufficientData => "Not enough data / N/A",
        }
    }
}
