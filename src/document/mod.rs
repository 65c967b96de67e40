//! Printable quote documents.
//!
//! A [`QuoteDocument`] wraps an already computed [`QuoteResult`] with client
//! details, dates and display labels. It never recomputes an amount.

use chrono::{Days, NaiveDate};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::domain::QuoteResult;
use crate::pricing::PricingRules;

/// Payment terms printed on every quote.
pub const PAYMENT_TERMS: &str = "Net 30 days after delivery";

/// Default number of days a quote stays valid.
pub const DEFAULT_VALIDITY_DAYS: u32 = 7;

const LEDGER_COLUMNS: [&str; 18] = [
    "quote_number",
    "issued_on",
    "client_name",
    "client_email",
    "language_pair",
    "domain",
    "volume",
    "unit",
    "converted_chars",
    "unit_price",
    "base_amount",
    "surcharges",
    "surcharge_total",
    "subtotal",
    "vat",
    "total",
    "deadline",
    "notes",
];

/// Column headers of the quote ledger row.
pub fn ledger_header() -> &'static [&'static str] {
    &LEDGER_COLUMNS
}

/// Per-day quote sequence allocator.
///
/// Numbers start at 1 on each issue date and count up while that date lasts.
/// The counter lives in process memory only: a restart begins again at 1, so
/// numbers can repeat within a day across restarts. Past 999 the `NNN` field
/// widens instead of wrapping.
#[derive(Debug)]
pub struct QuoteSequence {
    state: Mutex<Option<(NaiveDate, u32)>>,
}

impl QuoteSequence {
    pub fn new() -> Self {
        QuoteSequence {
            state: Mutex::new(None),
        }
    }

    /// Allocate the next sequence number for `issued_on`.
    pub fn next(&self, issued_on: NaiveDate) -> u32 {
        let mut state = self.state.lock();
        let next = match *state {
            Some((day, last)) if day == issued_on => last.saturating_add(1),
            _ => 1,
        };
        *state = Some((issued_on, next));
        next
    }
}

impl Default for QuoteSequence {
    fn default() -> Self {
        Self::new()
    }
}

/// Client-facing details collected by the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub email: String,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub notes: String,
}

/// A single printed line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentLine {
    pub description: String,
    pub amount: u64,
}

/// Printable quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteDocument {
    pub quote_number: String,
    pub issued_on: NaiveDate,
    pub valid_until: NaiveDate,
    pub payment_terms: &'static str,
    pub client: ClientInfo,
    pub language_pair_label: String,
    pub domain_label: String,
    pub unit_label: String,
    pub lines: Vec<DocumentLine>,
    pub quote: QuoteResult,
}

/// Quote number in the form `Q-YYYYMMDD-NNN`.
pub fn quote_number(issued_on: NaiveDate, sequence: u32) -> String {
    format!("Q-{}-{:03}", issued_on.format("%Y%m%d"), sequence)
}

/// Format an amount with thousands separators, e.g. `712,800`.
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a fractional rate as a percentage, e.g. `0.5` as `50%`.
pub fn format_rate(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}

impl QuoteDocument {
    /// Assemble a document around a computed quote.
    pub fn build(
        quote: &QuoteResult,
        rules: &PricingRules,
        client: ClientInfo,
        issued_on: NaiveDate,
        validity_days: u32,
        sequence: u32,
    ) -> Self {
        let language_pair_label = rules.language_pair_label(quote.language_pair()).to_string();
        let domain_label = rules.domain_label(quote.domain()).to_string();
        let unit_label = rules.unit_label(quote.volume_unit()).to_string();

        let mut lines = Vec::with_capacity(1 + quote.surcharges().len());
        lines.push(DocumentLine {
            description: format!("{language_pair_label} {domain_label} translation"),
            amount: quote.base_amount(),
        });
        for surcharge in quote.surcharges() {
            lines.push(DocumentLine {
                description: format!("{} (+{})", surcharge.label, format_rate(surcharge.rate)),
                amount: surcharge.amount,
            });
        }

        let valid_until = issued_on
            .checked_add_days(Days::new(u64::from(validity_days)))
            .unwrap_or(NaiveDate::MAX);

        QuoteDocument {
            quote_number: quote_number(issued_on, sequence),
            issued_on,
            valid_until,
            payment_terms: PAYMENT_TERMS,
            client,
            language_pair_label,
            domain_label,
            unit_label,
            lines,
            quote: quote.clone(),
        }
    }

    /// Render the document as plain text.
    pub fn render_text(&self, vat_rate: Decimal) -> String {
        let q = &self.quote;
        let mut out = String::new();

        // Writing to a String cannot fail.
        let _ = writeln!(out, "QUOTATION {}", self.quote_number);
        let _ = writeln!(out, "Issued:      {}", self.issued_on);
        let _ = writeln!(out, "Valid until: {}", self.valid_until);
        let _ = writeln!(out, "Client:      {} <{}>", self.client.name, self.client.email);
        let _ = writeln!(out, "Deadline:    {}", self.client.deadline);
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{} / {}: {} {} ({} chars) x {}/char",
            self.language_pair_label,
            self.domain_label,
            q.original_volume().normalize(),
            self.unit_label,
            format_amount(q.converted_units()),
            format_amount(q.unit_price()),
        );
        let _ = writeln!(out);
        for line in &self.lines {
            let _ = writeln!(out, "{:<40} {:>15}", line.description, format_amount(line.amount));
        }
        let _ = writeln!(out, "{:<40} {:>15}", "Subtotal", format_amount(q.subtotal()));
        let _ = writeln!(
            out,
            "{:<40} {:>15}",
            format!("VAT ({})", format_rate(vat_rate)),
            format_amount(q.vat())
        );
        let _ = writeln!(out, "{:<40} {:>15}", "TOTAL", format_amount(q.total()));
        let _ = writeln!(out);
        if !self.client.notes.is_empty() {
            let _ = writeln!(out, "Notes: {}", self.client.notes);
        }
        let _ = writeln!(out, "Payment terms: {}", self.payment_terms);

        out
    }

    /// Flat row for spreadsheet logging, matching [`ledger_header`].
    pub fn ledger_row(&self) -> Vec<String> {
        let q = &self.quote;

        let surcharges = if q.surcharges().is_empty() {
            "-".to_string()
        } else {
            q.surcharges()
                .iter()
                .map(|s| format!("{}(+{})", s.label, format_rate(s.rate)))
                .collect::<Vec<_>>()
                .join(", ")
        };

        let notes = if self.client.notes.is_empty() {
            "-".to_string()
        } else {
            self.client.notes.clone()
        };

        vec![
            self.quote_number.clone(),
            self.issued_on.to_string(),
            self.client.name.clone(),
            self.client.email.clone(),
            self.language_pair_label.clone(),
            self.domain_label.clone(),
            q.original_volume().normalize().to_string(),
            q.volume_unit().to_string(),
            q.converted_units().to_string(),
            q.unit_price().to_string(),
            q.base_amount().to_string(),
            surcharges,
            q.surcharge_total().to_string(),
            q.subtotal().to_string(),
            q.vat().to_string(),
            q.total().to_string(),
            self.client.deadline.to_string(),
            notes,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::QuoteRequest;
    use crate::pricing::fixtures::canonical_rules;
    use crate::quote::calculate_quote;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn client() -> ClientInfo {
        ClientInfo {
            name: "ABC Trading".to_string(),
            email: "client@example.com".to_string(),
            deadline: date(2025, 3, 10),
            notes: String::new(),
        }
    }

    fn sample_document() -> (QuoteDocument, PricingRules) {
        let rules = canonical_rules();
        let req = QuoteRequest::new("ko-en", "general", 4500).with_surcharges(["dtp"]);
        let quote = calculate_quote(&req, &rules).unwrap();
        let doc = QuoteDocument::build(&quote, &rules, client(), date(2025, 3, 3), 7, 1);
        (doc, rules)
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0), "0");
        assert_eq!(format_amount(999), "999");
        assert_eq!(format_amount(1000), "1,000");
        assert_eq!(format_amount(712_800), "712,800");
        assert_eq!(format_amount(1_234_567), "1,234,567");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(Decimal::new(5, 1)), "50%");
        assert_eq!(format_rate(Decimal::new(125, 3)), "12.5%");
    }

    #[test]
    fn test_quote_number() {
        assert_eq!(quote_number(date(2025, 3, 3), 1), "Q-20250303-001");
        assert_eq!(quote_number(date(2025, 12, 31), 42), "Q-20251231-042");
    }

    #[test]
    fn test_build_document() {
        let (doc, _) = sample_document();

        assert_eq!(doc.quote_number, "Q-20250303-001");
        assert_eq!(doc.valid_until, date(2025, 3, 10));
        assert_eq!(doc.language_pair_label, "한→영");
        assert_eq!(doc.lines.len(), 2);
        assert_eq!(doc.lines[0].amount, 540_000);
        assert_eq!(doc.lines[1].description, "DTP 편집 (+20%)");
        assert_eq!(doc.lines[1].amount, 108_000);
        assert_eq!(doc.quote.total(), 712_800);
    }

    #[test]
    fn test_render_text() {
        let (doc, rules) = sample_document();

        let text = doc.render_text(rules.vat_rate());

        assert!(text.contains("QUOTATION Q-20250303-001"));
        assert!(text.contains("4,500 chars"));
        assert!(text.contains("VAT (10%)"));
        assert!(text.contains("712,800"));
        assert!(text.contains(PAYMENT_TERMS));
        assert!(!text.contains("Notes:"));
    }

    #[test]
    fn test_ledger_row() {
        let (doc, _) = sample_document();

        let row = doc.ledger_row();

        assert_eq!(row.len(), ledger_header().len());
        assert_eq!(ledger_header()[11], "surcharges");
        assert_eq!(row[0], "Q-20250303-001");
        assert_eq!(row[6], "4500");
        assert_eq!(row[11], "DTP 편집(+20%)");
        assert_eq!(row[15], "712800");
        assert_eq!(row[17], "-");
    }

    #[test]
    fn test_sequence_counts_within_a_day() {
        let sequence = QuoteSequence::new();
        let day = date(2025, 3, 3);

        assert_eq!(sequence.next(day), 1);
        assert_eq!(sequence.next(day), 2);
        assert_eq!(sequence.next(day), 3);
    }

    #[test]
    fn test_sequence_resets_on_new_day() {
        let sequence = QuoteSequence::new();

        assert_eq!(sequence.next(date(2025, 3, 3)), 1);
        assert_eq!(sequence.next(date(2025, 3, 3)), 2);
        assert_eq!(sequence.next(date(2025, 3, 4)), 1);
        assert_eq!(quote_number(date(2025, 3, 4), sequence.next(date(2025, 3, 4))), "Q-20250304-002");
    }

    #[test]
    fn test_quote_number_widens_past_999() {
        assert_eq!(quote_number(date(2025, 3, 3), 1000), "Q-20250303-1000");
    }
}
