//! # Quotes
//!
//! A quote is the persisted form of a calculation: the calculator inputs as
//! they were when saved, denormalized totals for listing, and a status.
//!
//! ## Status Lifecycle
//!
//! ```text
//! Draft ──> Sent ──> Accepted
//!   │         └────> Rejected
//!   └─────> Completed
//! ```
//!
//! Statuses only move forward. [`Quote::reopen`] is the one explicit user
//! action that sends a quote back to `Draft`. Calculation data can only be
//! edited while the quote is a draft.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::{CalculationItem, EstimateTotals, TaxSummary};
use crate::errors::{CalcError, CalcResult};

/// Quote status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    #[default]
    Draft,
    Sent,
    Accepted,
    Rejected,
    Completed,
}

impl QuoteStatus {
    pub const ALL: [QuoteStatus; 5] = [
        QuoteStatus::Draft,
        QuoteStatus::Sent,
        QuoteStatus::Accepted,
        QuoteStatus::Rejected,
        QuoteStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Draft => "draft",
            QuoteStatus::Sent => "sent",
            QuoteStatus::Accepted => "accepted",
            QuoteStatus::Rejected => "rejected",
            QuoteStatus::Completed => "completed",
        }
    }

    /// Whether `self -> next` is a forward step of the lifecycle
    pub fn can_advance_to(self, next: QuoteStatus) -> bool {
        matches!(
            (self, next),
            (QuoteStatus::Draft, QuoteStatus::Sent)
                | (QuoteStatus::Draft, QuoteStatus::Completed)
                | (QuoteStatus::Sent, QuoteStatus::Accepted)
                | (QuoteStatus::Sent, QuoteStatus::Rejected)
        )
    }

    /// No further forward moves
    pub fn is_final(self) -> bool {
        matches!(
            self,
            QuoteStatus::Accepted | QuoteStatus::Rejected | QuoteStatus::Completed
        )
    }
}

impl std::fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Customer the quote is addressed to
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CustomerRef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl CustomerRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        CustomerRef {
            id: id.into(),
            name: name.into(),
            email: None,
            phone: None,
        }
    }
}

/// A saved quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub id: Uuid,
    /// Human-facing number, `QT-YYYYMMDD-NNNN`
    pub quote_number: String,
    #[serde(default)]
    pub organization_id: Option<Uuid>,
    /// User who created and owns the quote
    pub owner_id: String,
    pub customer: CustomerRef,
    pub project_name: String,
    /// Calculator inputs as saved
    pub calculation_data: CalculationItem,
    pub status: QuoteStatus,
    /// m², denormalized for listing
    pub total_area: f64,
    /// IDR, denormalized for listing
    pub total_cost: f64,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Quote {
    /// Create a draft quote, computing its totals.
    ///
    /// # Errors
    ///
    /// Whatever the calculator returns for `calculation_data`.
    pub fn new(
        quote_number: impl Into<String>,
        owner_id: impl Into<String>,
        customer: CustomerRef,
        project_name: impl Into<String>,
        calculation_data: CalculationItem,
    ) -> CalcResult<Self> {
        let totals = calculation_data.evaluate()?;
        let now = Utc::now();
        Ok(Quote {
            id: Uuid::new_v4(),
            quote_number: quote_number.into(),
            organization_id: None,
            owner_id: owner_id.into(),
            customer,
            project_name: project_name.into(),
            calculation_data,
            status: QuoteStatus::Draft,
            total_area: totals.total_area,
            total_cost: totals.total_cost,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace the calculation data and refresh totals and project name.
    /// Drafts only.
    pub fn update_calculation(&mut self, calculation_data: CalculationItem) -> CalcResult<EstimateTotals> {
        if self.status != QuoteStatus::Draft {
            return Err(CalcError::invalid_input(
                "status",
                self.status.as_str(),
                "Only draft quotes can be edited; reopen the quote first",
            ));
        }
        let totals = calculation_data.evaluate()?;
        self.project_name = calculation_data.project_name().to_string();
        self.calculation_data = calculation_data;
        self.total_area = totals.total_area;
        self.total_cost = totals.total_cost;
        self.touch();
        Ok(totals)
    }

    /// Move the status forward.
    pub fn advance(&mut self, next: QuoteStatus) -> CalcResult<()> {
        if !self.status.can_advance_to(next) {
            return Err(CalcError::invalid_transition(self.id, self.status, next));
        }
        self.status = next;
        self.touch();
        Ok(())
    }

    /// Send a non-draft quote back to `Draft` for editing.
    pub fn reopen(&mut self) -> CalcResult<()> {
        if self.status == QuoteStatus::Draft {
            return Err(CalcError::invalid_transition(self.id, self.status, QuoteStatus::Draft));
        }
        self.status = QuoteStatus::Draft;
        self.touch();
        Ok(())
    }

    /// Tax figures for display, using the PPN rate saved with the inputs.
    ///
    /// `None` for system estimates (their total already includes tax) and for
    /// quick quotes saved without a rate.
    pub fn tax_summary(&self) -> CalcResult<Option<TaxSummary>> {
        match &self.calculation_data {
            CalculationItem::Quick(input) => match input.tax_percentage {
                Some(rate) => {
                    let result = crate::calculations::calculate(input)?;
                    Ok(Some(TaxSummary::from_result(&result, rate)))
                }
                None => Ok(None),
            },
            CalculationItem::System(_) => Ok(None),
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Format a quote number: `QT-20261017-0042`
pub fn format_quote_number(date: NaiveDate, sequence: u32) -> String {
    format!("QT-{}-{:04}", date.format("%Y%m%d"), sequence)
}
