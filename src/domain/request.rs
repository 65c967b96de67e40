use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Volume unit assumed when the caller does not name one.
pub const DEFAULT_VOLUME_UNIT: &str = "chars";

/// A single quote calculation request.
///
/// Every field is caller-supplied and untrusted; the engine re-validates all
/// of it against the active rule set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub language_pair: String,
    pub domain: String,
    pub volume: Decimal,
    #[serde(default = "default_volume_unit")]
    pub volume_unit: String,
    #[serde(default)]
    pub surcharges: Vec<String>,
}

fn default_volume_unit() -> String {
    DEFAULT_VOLUME_UNIT.to_string()
}

impl QuoteRequest {
    /// Create a request in characters with no surcharges.
    pub fn new(
        language_pair: impl Into<String>,
        domain: impl Into<String>,
        volume: impl Into<Decimal>,
    ) -> Self {
        QuoteRequest {
            language_pair: language_pair.into(),
            domain: domain.into(),
            volume: volume.into(),
            volume_unit: default_volume_unit(),
            surcharges: Vec::new(),
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.volume_unit = unit.into();
        self
    }

    /// Set the selected surcharge keys, in the order they should be itemised.
    pub fn with_surcharges<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.surcharges = keys.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let json = r#"{"language_pair": "ko-en", "domain": "general", "volume": 4500}"#;

        let req: QuoteRequest = serde_json::from_str(json).unwrap();

        assert_eq!(req.volume_unit, "chars");
        assert!(req.surcharges.is_empty());
        assert_eq!(req.volume, Decimal::new(4500, 0));
    }

    #[test]
    fn test_builder() {
        let req = QuoteRequest::new("ko-en", "legal", 8)
            .with_unit("pages")
            .with_surcharges(["urgent", "dtp"]);

        assert_eq!(req.volume_unit, "pages");
        assert_eq!(req.surcharges, vec!["urgent".to_string(), "dtp".to_string()]);
    }
}
