use rust_decimal::Decimal;
use thiserror::Error;

/// Validation failures raised by the quote engine.
///
/// Every variant is deterministic for a given input and rule set, so none
/// of them is retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    #[error("Unknown volume unit: {unit}. Use one of: {}", .valid.join(", "))]
    UnknownUnit { unit: String, valid: Vec<String> },

    #[error("Unknown language pair: {language_pair}. Use one of: {}", .valid.join(", "))]
    UnknownLanguagePair {
        language_pair: String,
        valid: Vec<String>,
    },

    #[error("Unknown domain: {domain} for {language_pair}. Use one of: {}", .valid.join(", "))]
    UnknownDomain {
        language_pair: String,
        domain: String,
        valid: Vec<String>,
    },

    #[error("Unknown surcharge: {key}. Use one of: {}", .valid.join(", "))]
    UnknownSurcharge { key: String, valid: Vec<String> },

    #[error("Surcharge selected more than once: {key}")]
    DuplicateSurcharge { key: String },

    #[error("Surcharges {} are mutually exclusive. Pick one.", .keys.join(", "))]
    ExclusiveSurchargeConflict { keys: Vec<String> },

    #[error("Volume must be greater than zero, got {volume}")]
    InvalidVolume { volume: Decimal },

    #[error("Amount overflow while computing {stage}")]
    AmountOverflow { stage: &'static str },
}

impl QuoteError {
    /// Stable machine-readable code for API responses and metrics.
    pub fn code(&self) -> &'static str {
        match self {
            QuoteError::UnknownUnit { .. } => "UNKNOWN_UNIT",
            QuoteError::UnknownLanguagePair { .. } => "UNKNOWN_LANGUAGE_PAIR",
            QuoteError::UnknownDomain { .. } => "UNKNOWN_DOMAIN",
            QuoteError::UnknownSurcharge { .. } => "UNKNOWN_SURCHARGE",
            QuoteError::DuplicateSurcharge { .. } => "DUPLICATE_SURCHARGE",
            QuoteError::ExclusiveSurchargeConflict { .. } => "EXCLUSIVE_SURCHARGE_CONFLICT",
            QuoteError::InvalidVolume { .. } => "INVALID_VOLUME",
            QuoteError::AmountOverflow { .. } => "AMOUNT_OVERFLOW",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_valid_alternatives() {
        let err = QuoteError::UnknownUnit {
            unit: "lines".to_string(),
            valid: vec!["chars".to_string(), "pages".to_string()],
        };

        assert_eq!(
            err.to_string(),
            "Unknown volume unit: lines. Use one of: chars, pages"
        );
        assert_eq!(err.code(), "UNKNOWN_UNIT");
    }

    #[test]
    fn test_conflict_message() {
        let err = QuoteError::ExclusiveSurchargeConflict {
            keys: vec!["urgent".to_string(), "semi_urgent".to_string()],
        };

        assert!(err.to_string().contains("urgent, semi_urgent"));
        assert!(err.to_string().contains("mutually exclusive"));
    }
}
