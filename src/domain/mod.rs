pub mod definition;
pub mod quote;
pub mod request;

pub use definition::{RuleDefinition, SurchargeDef};
pub use quote::{QuoteResult, SurchargeLine, SurchargeLines};
pub use request::{QuoteRequest, DEFAULT_VOLUME_UNIT};
