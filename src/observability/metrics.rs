use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::quote::QuoteError;

/// Metrics registry for the application.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Quote requests processed
    pub quotes_total: AtomicU64,
    pub quotes_issued: AtomicU64,

    /// Rejected quote requests by error kind
    pub rejected_unknown_unit: AtomicU64,
    pub rejected_unknown_language_pair: AtomicU64,
    pub rejected_unknown_domain: AtomicU64,
    pub rejected_unknown_surcharge: AtomicU64,
    pub rejected_duplicate_surcharge: AtomicU64,
    pub rejected_exclusive_conflict: AtomicU64,
    pub rejected_invalid_volume: AtomicU64,
    pub rejected_overflow: AtomicU64,

    /// Quote latency buckets
    pub latency_under_100us: AtomicU64,
    pub latency_100us_1ms: AtomicU64,
    pub latency_1_10ms: AtomicU64,
    pub latency_over_10ms: AtomicU64,

    /// Documents rendered
    pub documents_total: AtomicU64,

    /// Rule reloads
    pub rules_reloads_total: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry.
    pub fn new() -> Self {
        MetricsRegistry::default()
    }

    /// Record a successfully issued quote.
    pub fn record_quote(&self) {
        self.quotes_total.fetch_add(1, Ordering::Relaxed);
        self.quotes_issued.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a rejected quote request.
    pub fn record_rejection(&self, error: &QuoteError) {
        self.quotes_total.fetch_add(1, Ordering::Relaxed);

        let counter = match error {
            QuoteError::UnknownUnit { .. } => &self.rejected_unknown_unit,
            QuoteError::UnknownLanguagePair { .. } => &self.rejected_unknown_language_pair,
            QuoteError::UnknownDomain { .. } => &self.rejected_unknown_domain,
            QuoteError::UnknownSurcharge { .. } => &self.rejected_unknown_surcharge,
            QuoteError::DuplicateSurcharge { .. } => &self.rejected_duplicate_surcharge,
            QuoteError::ExclusiveSurchargeConflict { .. } => &self.rejected_exclusive_conflict,
            QuoteError::InvalidVolume { .. } => &self.rejected_invalid_volume,
            QuoteError::AmountOverflow { .. } => &self.rejected_overflow,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record quote latency.
    pub fn record_latency(&self, start: Instant) {
        let micros = start.elapsed().as_micros() as u64;

        if micros < 100 {
            self.latency_under_100us.fetch_add(1, Ordering::Relaxed);
        } else if micros < 1000 {
            self.latency_100us_1ms.fetch_add(1, Ordering::Relaxed);
        } else if micros < 10000 {
            self.latency_1_10ms.fetch_add(1, Ordering::Relaxed);
        } else {
            self.latency_over_10ms.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a rendered quote document.
    pub fn record_document(&self) {
        self.documents_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an observed rule set change.
    pub fn record_rules_reload(&self) {
        self.rules_reloads_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Export metrics in Prometheus format.
    pub fn to_prometheus(&self) -> String {
        let load = |c: &AtomicU64| c.load(Ordering::Relaxed);

        format!(
            r#"# HELP transquote_quotes_total Total number of quote requests
# TYPE transquote_quotes_total counter
transquote_quotes_total {}

# HELP transquote_quotes_issued_total Quotes successfully calculated
# TYPE transquote_quotes_issued_total counter
transquote_quotes_issued_total {}

# HELP transquote_quotes_rejected Quote requests rejected by validation
# TYPE transquote_quotes_rejected counter
transquote_quotes_rejected{{code="UNKNOWN_UNIT"}} {}
transquote_quotes_rejected{{code="UNKNOWN_LANGUAGE_PAIR"}} {}
transquote_quotes_rejected{{code="UNKNOWN_DOMAIN"}} {}
transquote_quotes_rejected{{code="UNKNOWN_SURCHARGE"}} {}
transquote_quotes_rejected{{code="DUPLICATE_SURCHARGE"}} {}
transquote_quotes_rejected{{code="EXCLUSIVE_SURCHARGE_CONFLICT"}} {}
transquote_quotes_rejected{{code="INVALID_VOLUME"}} {}
transquote_quotes_rejected{{code="AMOUNT_OVERFLOW"}} {}

# HELP transquote_quote_latency_bucket Quote latency histogram
# TYPE transquote_quote_latency_bucket counter
transquote_quote_latency_bucket{{le="0.0001"}} {}
transquote_quote_latency_bucket{{le="0.001"}} {}
transquote_quote_latency_bucket{{le="0.01"}} {}
transquote_quote_latency_bucket{{le="+Inf"}} {}

# HELP transquote_documents_total Quote documents rendered
# TYPE transquote_documents_total counter
transquote_documents_total {}

# HELP transquote_rules_reloads_total Pricing rule set changes observed
# TYPE transquote_rules_reloads_total counter
transquote_rules_reloads_total {}
"#,
            load(&self.quotes_total),
            load(&self.quotes_issued),
            load(&self.rejected_unknown_unit),
            load(&self.rejected_unknown_language_pair),
            load(&self.rejected_unknown_domain),
            load(&self.rejected_unknown_surcharge),
            load(&self.rejected_duplicate_surcharge),
            load(&self.rejected_exclusive_conflict),
            load(&self.rejected_invalid_volume),
            load(&self.rejected_overflow),
            load(&self.latency_under_100us),
            load(&self.latency_100us_1ms),
            load(&self.latency_1_10ms),
            load(&self.latency_over_10ms),
            load(&self.documents_total),
            load(&self.rules_reloads_total),
        )
    }
}

/// Guard for timing operations.
pub struct TimingGuard<'a> {
    registry: &'a MetricsRegistry,
    start: Instant,
}

impl<'a> TimingGuard<'a> {
    pub fn new(registry: &'a MetricsRegistry) -> Self {
        TimingGuard {
            registry,
            start: Instant::now(),
        }
    }
}

impl<'a> Drop for TimingGuard<'a> {
    fn drop(&mut self) {
        self.registry.record_latency(self.start);
    }
}
