use rust_decimal::Decimal;
use serde::Serialize;
use smallvec::SmallVec;

/// One itemised surcharge on a quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurchargeLine {
    pub key: String,
    pub label: String,
    pub rate: Decimal,
    pub amount: u64,
}

/// Surcharge lines in caller-supplied order. Quotes rarely carry more than a few.
pub type SurchargeLines = SmallVec<[SurchargeLine; 4]>;

/// Fully itemised result of a quote calculation.
///
/// Built once by [`crate::quote::calculate_quote`] and read-only afterwards.
/// Fields are private so renderers and loggers can read every amount but
/// never rewrite one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteResult {
    language_pair: String,
    domain: String,
    original_volume: Decimal,
    volume_unit: String,
    converted_units: u64,
    unit_price: u64,
    base_amount: u64,
    surcharges: SurchargeLines,
    surcharge_total: u64,
    subtotal: u64,
    vat: u64,
    total: u64,
}

/// Field bundle used by the engine to assemble a [`QuoteResult`].
#[derive(Debug)]
pub(crate) struct QuoteParts {
    pub language_pair: String,
    pub domain: String,
    pub original_volume: Decimal,
    pub volume_unit: String,
    pub converted_units: u64,
    pub unit_price: u64,
    pub base_amount: u64,
    pub surcharges: SurchargeLines,
    pub surcharge_total: u64,
    pub subtotal: u64,
    pub vat: u64,
    pub total: u64,
}

impl QuoteResult {
    pub(crate) fn from_parts(parts: QuoteParts) -> Self {
        QuoteResult {
            language_pair: parts.language_pair,
            domain: parts.domain,
            original_volume: parts.original_volume,
            volume_unit: parts.volume_unit,
            converted_units: parts.converted_units,
            unit_price: parts.unit_price,
            base_amount: parts.base_amount,
            surcharges: parts.surcharges,
            surcharge_total: parts.surcharge_total,
            subtotal: parts.subtotal,
            vat: parts.vat,
            total: parts.total,
        }
    }

    pub fn language_pair(&self) -> &str {
        &self.language_pair
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Volume as supplied, before conversion.
    pub fn original_volume(&self) -> Decimal {
        self.original_volume
    }

    pub fn volume_unit(&self) -> &str {
        &self.volume_unit
    }

    /// Volume in canonical characters.
    pub fn converted_units(&self) -> u64 {
        self.converted_units
    }

    pub fn unit_price(&self) -> u64 {
        self.unit_price
    }

    pub fn base_amount(&self) -> u64 {
        self.base_amount
    }

    pub fn surcharges(&self) -> &[SurchargeLine] {
        &self.surcharges
    }

    pub fn surcharge_total(&self) -> u64 {
        self.surcharge_total
    }

    pub fn subtotal(&self) -> u64 {
        self.subtotal
    }

    pub fn vat(&self) -> u64 {
        self.vat
    }

    pub fn total(&self) -> u64 {
        self.total
    }
}
