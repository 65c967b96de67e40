pub mod hot_reload;
pub mod loader;

pub use hot_reload::RulesWatcher;
pub use loader::{load_rules, parse_json, parse_yaml, ConfigError, RulesLoader};

use ahash::AHasher;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

use crate::domain::{RuleDefinition, SurchargeDef};

/// Validated, immutable pricing rule set.
///
/// Constructed only through [`PricingRules::from_definition`] (or the loader
/// functions that call it), so every instance satisfies the cross-reference
/// invariants. There are no mutating methods; to price against different
/// rules, load another instance.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingRules {
    volume_conversion: BTreeMap<String, Decimal>,
    unit_prices: BTreeMap<String, BTreeMap<String, u64>>,
    surcharges: BTreeMap<String, SurchargeDef>,
    exclusive_groups: Vec<Vec<String>>,
    vat_rate: Decimal,
    language_pair_labels: BTreeMap<String, String>,
    domain_labels: BTreeMap<String, String>,
    unit_labels: BTreeMap<String, String>,
    fingerprint: String,
}

impl PricingRules {
    /// Validate a raw definition and build the rule set from it.
    pub fn from_definition(def: RuleDefinition) -> Result<Self, ConfigError> {
        validate_definition(&def)?;

        let fingerprint = compute_fingerprint(&def)?;

        Ok(PricingRules {
            volume_conversion: def.volume_conversion,
            unit_prices: def.unit_prices,
            surcharges: def.surcharges,
            exclusive_groups: def.surcharge_exclusive_groups,
            vat_rate: def.vat_rate,
            language_pair_labels: def.language_pairs,
            domain_labels: def.domains,
            unit_labels: def.volume_units,
            fingerprint,
        })
    }

    /// Multiplier from `unit` into canonical characters.
    pub fn conversion(&self, unit: &str) -> Option<Decimal> {
        self.volume_conversion.get(unit).copied()
    }

    pub fn units(&self) -> impl Iterator<Item = &str> {
        self.volume_conversion.keys().map(String::as_str)
    }

    /// Domain price table for a language pair.
    pub fn pair_prices(&self, language_pair: &str) -> Option<&BTreeMap<String, u64>> {
        self.unit_prices.get(language_pair)
    }

    pub fn language_pairs(&self) -> impl Iterator<Item = &str> {
        self.unit_prices.keys().map(String::as_str)
    }

    /// All domains priced under at least one language pair.
    pub fn domains(&self) -> BTreeSet<&str> {
        self.unit_prices
            .values()
            .flat_map(|table| table.keys().map(String::as_str))
            .collect()
    }

    pub fn surcharge(&self, key: &str) -> Option<&SurchargeDef> {
        self.surcharges.get(key)
    }

    pub fn surcharges(&self) -> &BTreeMap<String, SurchargeDef> {
        &self.surcharges
    }

    pub fn exclusive_groups(&self) -> &[Vec<String>] {
        &self.exclusive_groups
    }

    pub fn vat_rate(&self) -> Decimal {
        self.vat_rate
    }

    /// Display label for a language pair, falling back to the key.
    pub fn language_pair_label<'a>(&'a self, key: &'a str) -> &'a str {
        self.language_pair_labels.get(key).map_or(key, String::as_str)
    }

    /// Display label for a domain, falling back to the key.
    pub fn domain_label<'a>(&'a self, key: &'a str) -> &'a str {
        self.domain_labels.get(key).map_or(key, String::as_str)
    }

    /// Display label for a volume unit, falling back to the key.
    pub fn unit_label<'a>(&'a self, key: &'a str) -> &'a str {
        self.unit_labels.get(key).map_or(key, String::as_str)
    }

    /// Content hash of the rule set, used to detect rule file changes.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

fn compute_fingerprint(def: &RuleDefinition) -> Result<String, ConfigError> {
    // BTreeMap ordering makes the serialized form canonical.
    let canonical = serde_json::to_string(def)?;

    let mut hasher = AHasher::default();
    canonical.hash(&mut hasher);
    Ok(format!("{:016x}", hasher.finish()))
}

/// Check the cross-reference and range invariants of a rule definition.
fn validate_definition(def: &RuleDefinition) -> Result<(), ConfigError> {
    if def.volume_conversion.is_empty() {
        return Err(ConfigError::Validation(
            "volume_conversion must define at least one unit".to_string(),
        ));
    }

    for (unit, multiplier) in &def.volume_conversion {
        if *multiplier <= Decimal::ZERO {
            return Err(ConfigError::Validation(format!(
                "Volume multiplier for '{unit}' must be positive, got {multiplier}"
            )));
        }
    }

    if def.unit_prices.is_empty() {
        return Err(ConfigError::Validation(
            "unit_prices must define at least one language pair".to_string(),
        ));
    }

    for (pair, table) in &def.unit_prices {
        if table.is_empty() {
            return Err(ConfigError::Validation(format!(
                "Language pair '{pair}' has an empty domain price table"
            )));
        }
        for (domain, price) in table {
            if *price == 0 {
                return Err(ConfigError::Validation(format!(
                    "Unit price for '{pair}'/'{domain}' must be positive"
                )));
            }
        }
    }

    for (key, surcharge) in &def.surcharges {
        if surcharge.label.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "Surcharge '{key}' has an empty label"
            )));
        }
        check_fraction(&format!("Surcharge rate for '{key}'"), surcharge.rate)?;
    }

    for (index, group) in def.surcharge_exclusive_groups.iter().enumerate() {
        for key in group {
            if !def.surcharges.contains_key(key) {
                return Err(ConfigError::Validation(format!(
                    "Exclusive group {index} references unknown surcharge '{key}'"
                )));
            }
        }
    }

    check_fraction("vat_rate", def.vat_rate)?;

    for pair in def.language_pairs.keys() {
        if !def.unit_prices.contains_key(pair) {
            return Err(ConfigError::Validation(format!(
                "Label given for unknown language pair '{pair}'"
            )));
        }
    }

    for domain in def.domains.keys() {
        if !def.unit_prices.values().any(|t| t.contains_key(domain)) {
            return Err(ConfigError::Validation(format!(
                "Label given for unknown domain '{domain}'"
            )));
        }
    }

    for unit in def.volume_units.keys() {
        if !def.volume_conversion.contains_key(unit) {
            return Err(ConfigError::Validation(format!(
                "Label given for unknown volume unit '{unit}'"
            )));
        }
    }

    Ok(())
}

fn check_fraction(what: &str, value: Decimal) -> Result<(), ConfigError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(ConfigError::Validation(format!(
            "{what} must be between 0 and 1, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Canonical rule set shipped with the service.
    pub const CANONICAL_RULES: &str = include_str!("../../pricing.json");

    pub fn canonical_rules() -> PricingRules {
        parse_json(CANONICAL_RULES).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::canonical_rules;
    use super::*;

    fn minimal_definition() -> RuleDefinition {
        serde_json::from_str(
            r#"{
                "volume_conversion": {"chars": 1, "pages": 300},
                "unit_prices": {"ko-en": {"general": 120}},
                "surcharges": {
                    "urgent": {"label": "Urgent", "rate": 0.5},
                    "semi_urgent": {"label": "Semi-urgent", "rate": 0.3}
                },
                "surcharge_exclusive_groups": [["urgent", "semi_urgent"]],
                "vat_rate": 0.1
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_from_valid_definition() {
        let rules = PricingRules::from_definition(minimal_definition()).unwrap();

        assert_eq!(rules.conversion("pages"), Some(Decimal::new(300, 0)));
        assert_eq!(rules.pair_prices("ko-en").unwrap()["general"], 120);
        assert_eq!(rules.vat_rate(), Decimal::new(1, 1));
        assert_eq!(rules.exclusive_groups().len(), 1);
    }

    #[test]
    fn test_empty_domain_table_rejected() {
        let mut def = minimal_definition();
        def.unit_prices.insert("ko-fr".to_string(), BTreeMap::new());

        let err = PricingRules::from_definition(def).unwrap_err();
        assert!(err.to_string().contains("ko-fr"));
    }

    #[test]
    fn test_group_with_unknown_surcharge_rejected() {
        let mut def = minimal_definition();
        def.surcharge_exclusive_groups
            .push(vec!["dtp".to_string(), "urgent".to_string()]);

        let err = PricingRules::from_definition(def).unwrap_err();
        assert!(err.to_string().contains("unknown surcharge 'dtp'"));
    }

    #[test]
    fn test_negative_rate_rejected() {
        let mut def = minimal_definition();
        def.surcharges.get_mut("urgent").unwrap().rate = Decimal::new(-5, 1);

        assert!(PricingRules::from_definition(def).is_err());
    }

    #[test]
    fn test_vat_above_one_rejected() {
        let mut def = minimal_definition();
        def.vat_rate = Decimal::new(15, 1);

        let err = PricingRules::from_definition(def).unwrap_err();
        assert!(err.to_string().contains("vat_rate"));
    }

    #[test]
    fn test_zero_multiplier_rejected() {
        let mut def = minimal_definition();
        def.volume_conversion.insert("words".to_string(), Decimal::ZERO);

        assert!(PricingRules::from_definition(def).is_err());
    }

    #[test]
    fn test_zero_price_rejected() {
        let mut def = minimal_definition();
        def.unit_prices
            .get_mut("ko-en")
            .unwrap()
            .insert("legal".to_string(), 0);

        assert!(PricingRules::from_definition(def).is_err());
    }

    #[test]
    fn test_label_for_unknown_pair_rejected() {
        let mut def = minimal_definition();
        def.language_pairs
            .insert("ko-fr".to_string(), "Korean to French".to_string());

        assert!(PricingRules::from_definition(def).is_err());
    }

    #[test]
    fn test_labels_fall_back_to_key() {
        let rules = PricingRules::from_definition(minimal_definition()).unwrap();

        assert_eq!(rules.language_pair_label("ko-en"), "ko-en");
        assert_eq!(rules.unit_label("pages"), "pages");
    }

    #[test]
    fn test_fingerprint_stable_and_content_sensitive() {
        let a = PricingRules::from_definition(minimal_definition()).unwrap();
        let b = PricingRules::from_definition(minimal_definition()).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());

        let mut def = minimal_definition();
        def.vat_rate = Decimal::new(8, 2);
        let c = PricingRules::from_definition(def).unwrap();
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn test_canonical_rules_load() {
        let rules = canonical_rules();

        assert_eq!(rules.conversion("words"), Some(Decimal::new(25, 1)));
        assert_eq!(rules.pair_prices("ko-ja").unwrap()["technical"], 180);
        assert_eq!(rules.language_pair_label("ko-en"), "한→영");
        assert!(rules.domains().contains("legal"));
    }
}
