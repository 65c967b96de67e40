//! Structured logging and Prometheus counters.

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, LogFormat};
pub use metrics::MetricsRegistry;
