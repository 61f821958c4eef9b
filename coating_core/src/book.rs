//! # Quote Book
//!
//! The `QuoteBook` struct is the root container for one user's quotes.
//! Books serialize to `.hzq` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! QuoteBook
//! ├── meta: BookMetadata (version, owner, organization, timestamps)
//! ├── settings: EstimatorSettings (default markups, PPN, labor rate)
//! └── quotes: HashMap<Uuid, Quote>
//! ```
//!
//! ## Example
//!
//! ```rust
//! use coating_core::book::QuoteBook;
//!
//! let book = QuoteBook::new("user-7", "Dewi Lestari");
//! assert_eq!(book.settings.default_tax_percentage, 11.0);
//!
//! let json = serde_json::to_string_pretty(&book).unwrap();
//! assert!(json.contains("Dewi Lestari"));
//! ```

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::CoatingCostInput;
use crate::quote::{format_quote_number, Quote, QuoteStatus};

/// Current schema version for .hzq files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root quote container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteBook {
    pub meta: BookMetadata,

    pub settings: EstimatorSettings,

    /// All quotes, keyed by UUID
    pub quotes: HashMap<Uuid, Quote>,
}

impl QuoteBook {
    /// Create an empty book for a user.
    pub fn new(owner_id: impl Into<String>, owner_name: impl Into<String>) -> Self {
        let now = Utc::now();
        QuoteBook {
            meta: BookMetadata {
                version: SCHEMA_VERSION.to_string(),
                owner_id: owner_id.into(),
                owner_name: owner_name.into(),
                organization_id: None,
                created: now,
                modified: now,
            },
            settings: EstimatorSettings::default(),
            quotes: HashMap::new(),
        }
    }

    /// Add a quote. Returns its id.
    pub fn add_quote(&mut self, quote: Quote) -> Uuid {
        let id = quote.id;
        self.quotes.insert(id, quote);
        self.touch();
        id
    }

    /// Hard-delete a quote. Returns it if it existed.
    pub fn remove_quote(&mut self, id: &Uuid) -> Option<Quote> {
        let quote = self.quotes.remove(id);
        if quote.is_some() {
            self.touch();
        }
        quote
    }

    pub fn get_quote(&self, id: &Uuid) -> Option<&Quote> {
        self.quotes.get(id)
    }

    /// Get a mutable reference to a quote.
    ///
    /// Marks the book as modified when the quote exists.
    pub fn get_quote_mut(&mut self, id: &Uuid) -> Option<&mut Quote> {
        if self.quotes.contains_key(id) {
            self.meta.modified = Utc::now();
            self.quotes.get_mut(id)
        } else {
            None
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn quote_count(&self) -> usize {
        self.quotes.len()
    }

    /// Quotes with a given status, newest first
    pub fn quotes_by_status(&self, status: QuoteStatus) -> Vec<&Quote> {
        let mut quotes: Vec<&Quote> = self.quotes.values().filter(|q| q.status == status).collect();
        quotes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        quotes
    }

    /// The `limit` most recently created quotes
    pub fn recent_quotes(&self, limit: usize) -> Vec<&Quote> {
        let mut quotes: Vec<&Quote> = self.quotes.values().collect();
        quotes.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.quote_number.cmp(&a.quote_number))
        });
        quotes.truncate(limit);
        quotes
    }

    /// Next free quote number for `date`
    pub fn next_quote_number(&self, date: NaiveDate) -> String {
        let prefix = format_quote_number(date, 0);
        let prefix = &prefix[..prefix.len() - 4];
        let max_seq = self
            .quotes
            .values()
            .filter_map(|q| q.quote_number.strip_prefix(prefix))
            .filter_map(|seq| seq.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        format_quote_number(date, max_seq.saturating_add(1))
    }

    /// Dashboard figures over all quotes
    pub fn summary(&self) -> BookSummary {
        let mut summary = BookSummary::default();
        for quote in self.quotes.values() {
            *summary.count_by_status.entry(quote.status).or_insert(0) += 1;
            summary.total_quotes += 1;
            summary.total_area += quote.total_area;
            match quote.status {
                QuoteStatus::Draft | QuoteStatus::Sent => summary.pipeline_value += quote.total_cost,
                QuoteStatus::Accepted | QuoteStatus::Completed => summary.won_value += quote.total_cost,
                QuoteStatus::Rejected => {}
            }
        }
        summary
    }
}

impl Default for QuoteBook {
    fn default() -> Self {
        QuoteBook::new("", "")
    }
}

/// Book metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    pub owner_id: String,

    pub owner_name: String,

    /// Tenant the book belongs to, if any
    #[serde(default)]
    pub organization_id: Option<Uuid>,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

/// Estimator defaults used to prefill new quotes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorSettings {
    /// ISO currency code for display
    pub currency: String,

    /// 0-100
    pub default_overhead_percentage: f64,

    /// 0-100
    pub default_profit_margin: f64,

    /// PPN, 0-100
    pub default_tax_percentage: f64,

    /// Labor per m² per coat (IDR)
    pub default_labor_rate: f64,

    /// Days a sent quote stays valid
    pub quote_validity_days: u32,
}

impl Default for EstimatorSettings {
    fn default() -> Self {
        EstimatorSettings {
            currency: "IDR".to_string(),
            default_overhead_percentage: 10.0,
            default_profit_margin: 15.0,
            default_tax_percentage: 11.0,
            default_labor_rate: 25_000.0,
            quote_validity_days: 30,
        }
    }
}

impl EstimatorSettings {
    /// A calculator form with markups, tax and labor rate prefilled
    pub fn prefill(&self) -> CoatingCostInput {
        CoatingCostInput {
            labor_cost_per_unit: self.default_labor_rate,
            overhead_percentage: self.default_overhead_percentage,
            profit_margin: self.default_profit_margin,
            tax_percentage: Some(self.default_tax_percentage),
            ..CoatingCostInput::default()
        }
    }
}

/// Aggregates for the reporting dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookSummary {
    pub total_quotes: usize,
    pub count_by_status: HashMap<QuoteStatus, usize>,
    /// m² across all quotes
    pub total_area: f64,
    /// Value of drafts and sent quotes
    pub pipeline_value: f64,
    /// Value of accepted and completed quotes
    pub won_value: f64,
}

impl BookSummary {
    pub fn count(&self, status: QuoteStatus) -> usize {
        self.count_by_status.get(&status).copied().unwrap_or(0)
    }

    /// Accepted / (accepted + rejected), as 0-100. `None` before any decision.
    pub fn win_rate(&self) -> Option<f64> {
        let accepted = self.count(QuoteStatus::Accepted);
        let decided = accepted + self.count(QuoteStatus::Rejected);
        (decided > 0).then(|| accepted as f64 / decided as f64 * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::CalculationItem;
    use crate::quote::CustomerRef;

    fn quote(number: &str, area: f64) -> Quote {
        let input = CoatingCostInput {
            customer_id: Some("C-1".to_string()),
            project_name: "Gudang".to_string(),
            surface_area: area,
            coating_thickness: 100.0,
            number_of_coats: 1,
            material_cost_per_unit: 10_000.0,
            labor_cost_per_unit: 10_000.0,
            ..CoatingCostInput::default()
        };
        Quote::new(
            number,
            "user-1",
            CustomerRef::new("C-1", "PT Sinar"),
            "Gudang",
            CalculationItem::Quick(input),
        )
        .unwrap()
    }

    #[test]
    fn test_book_creation() {
        let book = QuoteBook::new("user-1", "Dewi");
        assert_eq!(book.meta.owner_id, "user-1");
        assert_eq!(book.meta.version, SCHEMA_VERSION);
        assert_eq!(book.quote_count(), 0);
    }

    #[test]
    fn test_add_remove_quote() {
        let mut book = QuoteBook::new("user-1", "Dewi");
        let id = book.add_quote(quote("QT-20261017-0001", 10.0));
        assert!(book.get_quote(&id).is_some());
        assert!(book.remove_quote(&id).is_some());
        assert!(book.remove_quote(&id).is_none());
        assert_eq!(book.quote_count(), 0);
    }

    #[test]
    fn test_next_quote_number() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let mut book = QuoteBook::new("user-1", "Dewi");
        assert_eq!(book.next_quote_number(date), "QT-20261017-0001");

        book.add_quote(quote("QT-20261017-0001", 10.0));
        book.add_quote(quote("QT-20261017-0007", 10.0));
        book.add_quote(quote("QT-20261016-0099", 10.0));
        assert_eq!(book.next_quote_number(date), "QT-20261017-0008");
    }

    #[test]
    fn test_next_quote_number_at_sequence_limit() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let mut book = QuoteBook::new("user-1", "Dewi");
        book.add_quote(quote("QT-20261017-4294967295", 10.0));
        assert_eq!(book.next_quote_number(date), "QT-20261017-4294967295");
    }

    #[test]
    fn test_summary() {
        let mut book = QuoteBook::new("user-1", "Dewi");
        book.add_quote(quote("QT-1", 10.0)); // 200,000
        let sent = book.add_quote(quote("QT-2", 20.0)); // 400,000
        let won = book.add_quote(quote("QT-3", 30.0)); // 600,000

        book.get_quote_mut(&sent).unwrap().advance(QuoteStatus::Sent).unwrap();
        let q = book.get_quote_mut(&won).unwrap();
        q.advance(QuoteStatus::Sent).unwrap();
        q.advance(QuoteStatus::Accepted).unwrap();

        let summary = book.summary();
        assert_eq!(summary.total_quotes, 3);
        assert_eq!(summary.count(QuoteStatus::Draft), 1);
        assert_eq!(summary.count(QuoteStatus::Sent), 1);
        assert_eq!(summary.total_area, 60.0);
        assert_eq!(summary.pipeline_value, 600_000.0);
        assert_eq!(summary.won_value, 600_000.0);
        assert_eq!(summary.win_rate(), Some(100.0));
    }

    #[test]
    fn test_quotes_by_status() {
        let mut book = QuoteBook::new("user-1", "Dewi");
        book.add_quote(quote("QT-1", 10.0));
        assert_eq!(book.quotes_by_status(QuoteStatus::Draft).len(), 1);
        assert!(book.quotes_by_status(QuoteStatus::Sent).is_empty());
        assert_eq!(book.recent_quotes(5).len(), 1);
    }

    #[test]
    fn test_settings_prefill() {
        let input = EstimatorSettings::default().prefill();
        assert_eq!(input.overhead_percentage, 10.0);
        assert_eq!(input.tax_percentage, Some(11.0));
        assert_eq!(input.number_of_coats, 1);
    }

    #[test]
    fn test_book_serialization_roundtrip() {
        let mut book = QuoteBook::new("user-1", "Dewi");
        book.add_quote(quote("QT-1", 10.0));
        let json = serde_json::to_string_pretty(&book).unwrap();
        let roundtrip: QuoteBook = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.quote_count(), 1);
        assert_eq!(roundtrip.settings, book.settings);
    }
}
