use rust_decimal::Decimal;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Raw pricing rule definition as it appears in the rules file.
///
/// This is the unvalidated shape. It becomes usable for pricing only after
/// [`crate::pricing::PricingRules::from_definition`] has checked it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDefinition {
    /// Multiplier from each volume unit into canonical characters
    #[serde(deserialize_with = "number_map")]
    pub volume_conversion: BTreeMap<String, Decimal>,

    /// Price per canonical unit, keyed by language pair then domain
    pub unit_prices: BTreeMap<String, BTreeMap<String, u64>>,

    /// Named surcharges
    #[serde(default)]
    pub surcharges: BTreeMap<String, SurchargeDef>,

    /// Groups of surcharge keys of which at most one may be selected
    #[serde(default)]
    pub surcharge_exclusive_groups: Vec<Vec<String>>,

    /// Flat VAT rate applied to the subtotal
    #[serde(deserialize_with = "number")]
    pub vat_rate: Decimal,

    /// Display labels for language pairs
    #[serde(default)]
    pub language_pairs: BTreeMap<String, String>,

    /// Display labels for domains
    #[serde(default)]
    pub domains: BTreeMap<String, String>,

    /// Display labels for volume units
    #[serde(default)]
    pub volume_units: BTreeMap<String, String>,
}

/// A single surcharge entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurchargeDef {
    /// Human-readable label shown on quotes
    pub label: String,

    /// Fraction of the base amount, e.g. 0.5 for +50%
    #[serde(deserialize_with = "number")]
    pub rate: Decimal,
}

/// A rule-file decimal that must be written as a number, never a string.
struct Numeric(Decimal);

struct NumericVisitor;

impl<'de> Visitor<'de> for NumericVisitor {
    type Value = Numeric;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a number")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Numeric, E> {
        Ok(Numeric(Decimal::from(value)))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Numeric, E> {
        Ok(Numeric(Decimal::from(value)))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Numeric, E> {
        // Shortest round-trip text keeps 0.1 as exactly 0.1.
        Decimal::from_str(&value.to_string())
            .map(Numeric)
            .map_err(|_| E::invalid_value(de::Unexpected::Float(value), &self))
    }
}

impl<'de> Deserialize<'de> for Numeric {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NumericVisitor)
    }
}

fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    Numeric::deserialize(deserializer).map(|n| n.0)
}

fn number_map<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, Decimal>, D::Error> {
    let raw = BTreeMap::<String, Numeric>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|(key, n)| (key, n.0)).collect())
}
