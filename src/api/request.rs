use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::document::ClientInfo;
use crate::domain::QuoteRequest;

/// Request for a printable quote document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRequest {
    /// Quote inputs, same shape as `POST /v1/quote`
    #[serde(flatten)]
    pub quote: QuoteRequest,

    pub client_name: String,
    pub client_email: String,

    /// Requested delivery date
    pub deadline: NaiveDate,

    #[serde(default)]
    pub notes: String,

    /// Quote sequence number for the day (assigned by the server if absent)
    #[serde(default)]
    pub sequence: Option<u32>,
}

impl DocumentRequest {
    /// Client details for the document header.
    pub fn client(&self) -> ClientInfo {
        ClientInfo {
            name: self.client_name.clone(),
            email: self.client_email.clone(),
            deadline: self.deadline,
            notes: self.notes.clone(),
        }
    }
}

/// Output format of the document endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Text,
    Ledger,
}

/// Query parameters for the document endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct DocumentQuery {
    /// `text`, `ledger`, anything else for JSON
    #[serde(default)]
    pub format: Option<String>,
}

impl DocumentQuery {
    pub fn format(&self) -> DocumentFormat {
        match self.format.as_deref() {
            Some(f) if f.eq_ignore_ascii_case("text") => DocumentFormat::Text,
            Some(f) if f.eq_ignore_ascii_case("ledger") => DocumentFormat::Ledger,
            _ => DocumentFormat::Json,
        }
    }
}
