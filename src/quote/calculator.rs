use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

use super::{convert_volume, validate_surcharges, QuoteError};
use crate::domain::quote::QuoteParts;
use crate::domain::{QuoteRequest, QuoteResult, SurchargeLine, SurchargeLines};
use crate::pricing::PricingRules;

/// Calculate a fully itemised quote.
///
/// Validation runs in a fixed order: language pair, domain, surcharges,
/// volume. Every intermediate monetary amount is truncated to an integer:
///
/// - `base = converted_units * unit_price`
/// - each surcharge is `floor(base * rate)`, taken from the base only
/// - `vat = floor(subtotal * vat_rate)`
pub fn calculate_quote(request: &QuoteRequest, rules: &PricingRules) -> Result<QuoteResult, QuoteError> {
    let pair_prices = rules.pair_prices(&request.language_pair).ok_or_else(|| {
        QuoteError::UnknownLanguagePair {
            language_pair: request.language_pair.clone(),
            valid: rules.language_pairs().map(str::to_string).collect(),
        }
    })?;

    let unit_price = *pair_prices
        .get(&request.domain)
        .ok_or_else(|| QuoteError::UnknownDomain {
            language_pair: request.language_pair.clone(),
            domain: request.domain.clone(),
            valid: pair_prices.keys().cloned().collect(),
        })?;

    let selected_surcharges = validate_surcharges(&request.surcharges, rules)?;

    if request.volume <= Decimal::ZERO {
        return Err(QuoteError::InvalidVolume {
            volume: request.volume,
        });
    }

    let converted_units = convert_volume(request.volume, &request.volume_unit, rules)?;

    let base_amount = converted_units
        .checked_mul(unit_price)
        .ok_or(QuoteError::AmountOverflow {
            stage: "base amount",
        })?;

    let mut surcharges = SurchargeLines::new();
    let mut surcharge_total: u64 = 0;

    for (key, def) in selected_surcharges {
        let amount = apply_rate(base_amount, def.rate, "surcharge amount")?;

        surcharge_total = surcharge_total
            .checked_add(amount)
            .ok_or(QuoteError::AmountOverflow {
                stage: "surcharge total",
            })?;

        surcharges.push(SurchargeLine {
            key: key.to_string(),
            label: def.label.clone(),
            rate: def.rate,
            amount,
        });
    }

    let subtotal = base_amount
        .checked_add(surcharge_total)
        .ok_or(QuoteError::AmountOverflow { stage: "subtotal" })?;
    let vat = apply_rate(subtotal, rules.vat_rate(), "vat")?;
    let total = subtotal
        .checked_add(vat)
        .ok_or(QuoteError::AmountOverflow { stage: "total" })?;

    debug!(
        language_pair = %request.language_pair,
        domain = %request.domain,
        converted_units,
        base_amount,
        surcharge_total,
        total,
        "Quote calculated"
    );

    Ok(QuoteResult::from_parts(QuoteParts {
        language_pair: request.language_pair.clone(),
        domain: request.domain.clone(),
        original_volume: request.volume,
        volume_unit: request.volume_unit.clone(),
        converted_units,
        unit_price,
        base_amount,
        surcharges,
        surcharge_total,
        subtotal,
        vat,
        total,
    }))
}

/// `floor(amount * rate)` in exact decimal arithmetic.
fn apply_rate(amount: u64, rate: Decimal, stage: &'static str) -> Result<u64, QuoteError> {
    Decimal::from(amount)
        .checked_mul(rate)
        .and_then(|v| v.floor().to_u64())
        .ok_or(QuoteError::AmountOverflow { stage })
}
