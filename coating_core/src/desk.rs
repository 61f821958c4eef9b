//! # Quote Desk
//!
//! User-facing quote operations over a [`QuoteBook`]: create, recalculate,
//! change status, delete. Every outcome is reported to the injected
//! [`EventSink`]; failures are reported before they are returned.
//!
//! ## Example
//!
//! ```rust
//! use coating_core::book::QuoteBook;
//! use coating_core::calculations::{CalculationItem, CoatingCostInput};
//! use coating_core::desk::QuoteDesk;
//! use coating_core::events::RecordingSink;
//! use coating_core::permissions::{Role, User};
//! use coating_core::quote::{CustomerRef, QuoteStatus};
//!
//! let sink = RecordingSink::new();
//! let mut desk = QuoteDesk::new(QuoteBook::new("user-7", "Dewi"), &sink);
//! let estimator = User::new("user-9", "Rina", Role::Estimator);
//!
//! let mut form = desk.book().settings.prefill();
//! form.customer_id = Some("C-12".to_string());
//! form.project_name = "Tangki Cilegon".to_string();
//! form.surface_area = 320.0;
//! form.coating_thickness = 125.0;
//! form.number_of_coats = 3;
//! form.material_cost_per_unit = 42_000.0;
//!
//! let id = desk
//!     .create_quote(&estimator, CustomerRef::new("C-12", "PT Baja"), CalculationItem::Quick(form))
//!     .unwrap();
//! assert_eq!(desk.book().get_quote(&id).unwrap().owner_id, "user-9");
//! desk.advance_status(id, QuoteStatus::Sent).unwrap();
//! assert_eq!(sink.len(), 2);
//! ```

use chrono::Utc;
use uuid::Uuid;

use crate::book::QuoteBook;
use crate::calculations::{CalculationItem, EstimateTotals};
use crate::errors::{CalcError, CalcResult};
use crate::events::{EventSink, QuoteEvent};
use crate::permissions::User;
use crate::quote::{CustomerRef, Quote, QuoteStatus};

/// Quote operations bound to a book and an event sink
pub struct QuoteDesk<S: EventSink> {
    book: QuoteBook,
    sink: S,
}

impl<S: EventSink> QuoteDesk<S> {
    pub fn new(book: QuoteBook, sink: S) -> Self {
        QuoteDesk { book, sink }
    }

    pub fn book(&self) -> &QuoteBook {
        &self.book
    }

    /// Give the book back (e.g. to save it)
    pub fn into_book(self) -> QuoteBook {
        self.book
    }

    /// Save a new draft quote owned by `owner`.
    ///
    /// The form must pass validation and name the same customer as
    /// `customer`. The project name is taken from the form for quick quotes
    /// and from the coating system name otherwise.
    pub fn create_quote(
        &mut self,
        owner: &User,
        customer: CustomerRef,
        calculation: CalculationItem,
    ) -> CalcResult<Uuid> {
        let result = self.build_quote(owner, customer, calculation);
        let quote = self.report("create_quote", result)?;

        let event = QuoteEvent::Created {
            quote_id: quote.id,
            quote_number: quote.quote_number.clone(),
            total_cost: quote.total_cost,
        };
        let id = self.book.add_quote(quote);
        self.sink.emit(event);
        Ok(id)
    }

    fn build_quote(&self, owner: &User, customer: CustomerRef, calculation: CalculationItem) -> CalcResult<Quote> {
        check_form(&customer, &calculation)?;

        let project_name = calculation.project_name().to_string();
        let number = self.book.next_quote_number(Utc::now().date_naive());

        let mut quote = Quote::new(number, owner.id.clone(), customer, project_name, calculation)?;
        quote.organization_id = owner.organization_id.or(self.book.meta.organization_id);
        Ok(quote)
    }

    /// Replace a draft's calculation data and refresh its totals.
    ///
    /// The new form goes through the same checks as [`create_quote`](Self::create_quote)
    /// against the quote's customer.
    pub fn edit_calculation(&mut self, id: Uuid, calculation: CalculationItem) -> CalcResult<EstimateTotals> {
        let result = match self.book.get_quote_mut(&id) {
            Some(quote) => {
                check_form(&quote.customer, &calculation).and_then(|_| quote.update_calculation(calculation))
            }
            None => Err(CalcError::quote_not_found(id)),
        };
        let totals = self.report("edit_calculation", result)?;
        self.sink.emit(QuoteEvent::Recalculated {
            quote_id: id,
            total_cost: totals.total_cost,
        });
        Ok(totals)
    }

    /// Move a quote forward in its lifecycle.
    pub fn advance_status(&mut self, id: Uuid, next: QuoteStatus) -> CalcResult<()> {
        let result = match self.book.get_quote_mut(&id) {
            Some(quote) => {
                let from = quote.status;
                quote.advance(next).map(|_| from)
            }
            None => Err(CalcError::quote_not_found(id)),
        };
        let from = self.report("advance_status", result)?;
        self.sink.emit(QuoteEvent::StatusChanged {
            quote_id: id,
            from,
            to: next,
        });
        Ok(())
    }

    /// Return a quote to draft for editing.
    pub fn reopen(&mut self, id: Uuid) -> CalcResult<()> {
        let result = match self.book.get_quote_mut(&id) {
            Some(quote) => {
                let from = quote.status;
                quote.reopen().map(|_| from)
            }
            None => Err(CalcError::quote_not_found(id)),
        };
        let from = self.report("reopen", result)?;
        self.sink.emit(QuoteEvent::StatusChanged {
            quote_id: id,
            from,
            to: QuoteStatus::Draft,
        });
        Ok(())
    }

    /// Permanently delete a quote.
    pub fn delete_quote(&mut self, id: Uuid) -> CalcResult<Quote> {
        let result = self
            .book
            .remove_quote(&id)
            .ok_or_else(|| CalcError::quote_not_found(id));
        let quote = self.report("delete_quote", result)?;
        self.sink.emit(QuoteEvent::Deleted { quote_id: id });
        Ok(quote)
    }

    fn report<T>(&self, operation: &str, result: CalcResult<T>) -> CalcResult<T> {
        if let Err(error) = &result {
            self.sink.emit(QuoteEvent::Failed {
                operation: operation.to_string(),
                error: error.clone(),
            });
        }
        result
    }
}

/// Form validation plus the customer named on the form matching the quote's.
fn check_form(customer: &CustomerRef, calculation: &CalculationItem) -> CalcResult<()> {
    let errors = calculation.validate();
    if !errors.is_empty() {
        return Err(CalcError::Validation { errors });
    }
    match calculation.customer_id() {
        Some(form_customer) if form_customer.trim() != customer.id.trim() => Err(CalcError::invalid_input(
            "customer_id",
            form_customer,
            format!("Form is for a different customer than the quote ({})", customer.id),
        )),
        _ => Ok(()),
    }
}
