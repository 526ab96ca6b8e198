use thiserror::Error;

#[derive(Error, Debug)]
pub enum PricingError {
    #[error("Price vector has no entry for product '{product_id}'")]
    MissingPrice { product_id: String },

    #[error("Invalid catalog: {reason}")]
    InvalidCatalog { reason: String },

    #[error("Invalid price multiplier {value} for product '{product_id}'")]
    InvalidMultiplier { product_id: String, value: f64 },

    #[error("Invalid combination size range: min_size={min_size}, max_size={max_size}")]
    InvalidComboSize { min_size: usize, max_size: usize },

    #[error("No optimum found after {trials} trials")]
    NoOptimumFound { trials: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type PricingResult<T> = Result<T, PricingError>;
