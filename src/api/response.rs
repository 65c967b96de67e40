use rust_decimal::Decimal;
use serde::Serialize;

use crate::document::{ledger_header, QuoteDocument};
use crate::pricing::PricingRules;
use crate::quote::QuoteError;

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        ErrorResponse {
            error: error.into(),
            code: code.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ErrorResponse::new(message, "BAD_REQUEST")
    }
}

impl From<&QuoteError> for ErrorResponse {
    fn from(err: &QuoteError) -> Self {
        ErrorResponse::new(err.to_string(), err.code())
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub rules_fingerprint: String,
    pub uptime_secs: u64,
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub rules_fingerprint: String,
    pub language_pairs: usize,
    pub surcharges: usize,
}

/// Ledger export of an issued document: column headers and one row.
#[derive(Debug, Serialize)]
pub struct LedgerResponse {
    pub header: &'static [&'static str],
    pub row: Vec<String>,
}

impl From<&QuoteDocument> for LedgerResponse {
    fn from(document: &QuoteDocument) -> Self {
        LedgerResponse {
            header: ledger_header(),
            row: document.ledger_row(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DomainEntry {
    pub key: String,
    pub label: String,
    pub unit_price: u64,
}

#[derive(Debug, Serialize)]
pub struct LanguagePairEntry {
    pub key: String,
    pub label: String,
    pub domains: Vec<DomainEntry>,
}

#[derive(Debug, Serialize)]
pub struct UnitEntry {
    pub key: String,
    pub label: String,
    pub multiplier: Decimal,
}

#[derive(Debug, Serialize)]
pub struct SurchargeEntry {
    pub key: String,
    pub label: String,
    pub rate: Decimal,
}

/// Rule catalog used to populate the quote form.
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub rules_fingerprint: String,
    pub language_pairs: Vec<LanguagePairEntry>,
    pub volume_units: Vec<UnitEntry>,
    pub surcharges: Vec<SurchargeEntry>,
    pub exclusive_groups: Vec<Vec<String>>,
    pub vat_rate: Decimal,
}

impl CatalogResponse {
    pub fn from_rules(rules: &PricingRules) -> Self {
        let language_pairs = rules
            .language_pairs()
            .map(|pair| LanguagePairEntry {
                key: pair.to_string(),
                label: rules.language_pair_label(pair).to_string(),
                domains: rules
                    .pair_prices(pair)
                    .into_iter()
                    .flatten()
                    .map(|(domain, price)| DomainEntry {
                        key: domain.clone(),
                        label: rules.domain_label(domain).to_string(),
                        unit_price: *price,
                    })
                    .collect(),
            })
            .collect();

        let volume_units = rules
            .units()
            .filter_map(|unit| {
                rules.conversion(unit).map(|multiplier| UnitEntry {
                    key: unit.to_string(),
                    label: rules.unit_label(unit).to_string(),
                    multiplier,
                })
            })
            .collect();

        let surcharges = rules
            .surcharges()
            .iter()
            .map(|(key, def)| SurchargeEntry {
                key: key.clone(),
                label: def.label.clone(),
                rate: def.rate,
            })
            .collect();

        CatalogResponse {
            rules_fingerprint: rules.fingerprint().to_string(),
            language_pairs,
            volume_units,
            surcharges,
            exclusive_groups: rules.exclusive_groups().to_vec(),
            vat_rate: rules.vat_rate(),
        }
    }
}
