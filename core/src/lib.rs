pub mod catalog;
pub mod choice;
pub mod co_occurrence;
pub mod config;
pub mod elasticity;
pub mod engine;
pub mod error;
pub mod heat;
pub mod market;
pub mod optimizer;
pub mod orders;
pub mod population;
pub mod prices;
pub mod report;
pub mod rng;
pub mod types;
