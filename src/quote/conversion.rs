use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::QuoteError;
use crate::pricing::PricingRules;

/// Convert a volume into canonical characters.
///
/// The result is `floor(value * multiplier)`. Fractional characters are
/// truncated, never rounded, so 101 words at 2.5 bills 252 characters.
pub fn convert_volume(value: Decimal, unit: &str, rules: &PricingRules) -> Result<u64, QuoteError> {
    let multiplier = rules.conversion(unit).ok_or_else(|| QuoteError::UnknownUnit {
        unit: unit.to_string(),
        valid: rules.units().map(str::to_string).collect(),
    })?;

    if value < Decimal::ZERO {
        return Err(QuoteError::InvalidVolume { volume: value });
    }

    value
        .checked_mul(multiplier)
        .and_then(|v| v.floor().to_u64())
        .ok_or(QuoteError::AmountOverflow {
            stage: "volume conversion",
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::fixtures::canonical_rules;

    #[test]
    fn test_chars() {
        let rules = canonical_rules();
        assert_eq!(convert_volume(Decimal::new(4500, 0), "chars", &rules), Ok(4500));
    }

    #[test]
    fn test_words() {
        let rules = canonical_rules();
        assert_eq!(convert_volume(Decimal::new(100, 0), "words", &rules), Ok(250));
    }

    #[test]
    fn test_pages() {
        let rules = canonical_rules();
        assert_eq!(convert_volume(Decimal::new(8, 0), "pages", &rules), Ok(2400));
    }

    #[test]
    fn test_truncates_fractional_characters() {
        let rules = canonical_rules();

        // 101 * 2.5 = 252.5
        assert_eq!(convert_volume(Decimal::new(101, 0), "words", &rules), Ok(252));
        // 1.5 pages * 300 = 450
        assert_eq!(convert_volume(Decimal::new(15, 1), "pages", &rules), Ok(450));
        // 0.7 chars
        assert_eq!(convert_volume(Decimal::new(7, 1), "chars", &rules), Ok(0));
    }

    #[test]
    fn test_matches_floor_for_every_unit() {
        let rules = canonical_rules();
        let volumes = [Decimal::new(1, 0), Decimal::new(333, 1), Decimal::new(12345, 2)];

        for unit in rules.units() {
            let multiplier = rules.conversion(unit).unwrap();
            for volume in volumes {
                let expected = (volume * multiplier).floor().to_u64().unwrap();
                assert_eq!(convert_volume(volume, unit, &rules), Ok(expected));
            }
        }
    }

    #[test]
    fn test_unknown_unit() {
        let rules = canonical_rules();

        let err = convert_volume(Decimal::new(100, 0), "lines", &rules).unwrap_err();
        match err {
            QuoteError::UnknownUnit { unit, valid } => {
                assert_eq!(unit, "lines");
                assert!(valid.contains(&"pages".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_negative_volume() {
        let rules = canonical_rules();
        assert!(matches!(
            convert_volume(Decimal::new(-1, 0), "chars", &rules),
            Err(QuoteError::InvalidVolume { .. })
        ));
    }
}
