pub mod api;
pub mod config;
pub mod document;
pub mod domain;
pub mod observability;
pub mod pricing;
pub mod quote;

pub use config::Config;
pub use domain::{QuoteRequest, QuoteResult, SurchargeLine};
pub use pricing::{load_rules, ConfigError, PricingRules};
pub use quote::{calculate_quote, convert_volume, validate_surcharges, QuoteError};
