pub mod aggregator;
pub mod config;
pub mod fallback;
pub mod fetch;
pub mod model;
pub mod normalizer;
pub mod price;
pub mod probe;
pub mod report;
pub mod utils;

pub use aggregator::Aggregator;
pub use config::{AppConfig, load_config};
pub use model::{AggregateResult, ListingRecord};
