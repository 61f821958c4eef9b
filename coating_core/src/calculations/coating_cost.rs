//! # Coating Cost Calculation
//!
//! Turns a quote form (area, coats, unit rates, markups) into a price.
//!
//! ## Order of Operations
//!
//! ```text
//! material_total      = surface_area × material_cost_per_unit × number_of_coats
//! labor_total         = surface_area × labor_cost_per_unit × number_of_coats
//! subtotal            = material_total + labor_total
//! overhead_amount     = subtotal × (overhead_percentage / 100)
//! total_with_overhead = subtotal + overhead_amount
//! profit_amount       = total_with_overhead × (profit_margin / 100)
//! final_quote         = total_with_overhead + profit_amount
//! cost_per_sqm        = final_quote / surface_area
//! cost_per_coat       = final_quote / number_of_coats
//! ```
//!
//! The order is fixed: quotes saved by earlier releases must reproduce to the
//! last bit. Percentages are plain numbers in [0, 100], never fractions.
//!
//! ## Example
//!
//! ```rust
//! use coating_core::calculations::coating_cost::{calculate, CoatingCostInput};
//!
//! let input = CoatingCostInput {
//!     customer_id: Some("CUST-001".to_string()),
//!     project_name: "Gudang Cikarang".to_string(),
//!     surface_area: 100.0,
//!     coating_thickness: 150.0,
//!     number_of_coats: 2,
//!     material_cost_per_unit: 50_000.0,
//!     labor_cost_per_unit: 30_000.0,
//!     overhead_percentage: 10.0,
//!     profit_margin: 15.0,
//!     tax_percentage: Some(11.0),
//! };
//!
//! assert!(input.validate().is_empty());
//! let result = calculate(&input).unwrap();
//! assert_eq!(result.final_quote, 20_240_000.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Quote form inputs for the coating cost calculator.
///
/// ## JSON Example
///
/// ```json
/// {
///   "customer_id": "CUST-001",
///   "project_name": "Gudang Cikarang",
///   "surface_area": 100.0,
///   "coating_thickness": 150.0,
///   "number_of_coats": 2,
///   "material_cost_per_unit": 50000.0,
///   "labor_cost_per_unit": 30000.0,
///   "overhead_percentage": 10.0,
///   "profit_margin": 15.0,
///   "tax_percentage": 11.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoatingCostInput {
    /// Customer reference the quote is for
    #[serde(default)]
    pub customer_id: Option<String>,

    /// Project name shown on the quote
    #[serde(default)]
    pub project_name: String,

    /// Area to coat in m²
    pub surface_area: f64,

    /// Dry film thickness per coat in microns
    pub coating_thickness: f64,

    /// Number of coats applied
    pub number_of_coats: u32,

    /// Material cost per m² per coat (IDR)
    pub material_cost_per_unit: f64,

    /// Labor cost per m² per coat (IDR)
    pub labor_cost_per_unit: f64,

    /// Overhead markup, 0-100
    pub overhead_percentage: f64,

    /// Profit markup applied after overhead, 0-100
    pub profit_margin: f64,

    /// PPN rate, 0-100. Display only, never part of `final_quote`.
    #[serde(default)]
    pub tax_percentage: Option<f64>,
}

impl CoatingCostInput {
    /// Check the form and return one message per violated rule.
    ///
    /// An empty list means the form is complete. The caller decides whether to
    /// block submission; [`calculate`] never calls this.
    ///
    /// # Example
    ///
    /// ```rust
    /// use coating_core::calculations::coating_cost::CoatingCostInput;
    ///
    /// let mut input = CoatingCostInput::default();
    /// input.number_of_coats = 0;
    /// let errors = input.validate();
    /// assert!(errors.contains(&"Number of coats must be at least 1".to_string()));
    /// ```
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self
            .customer_id
            .as_deref()
            .map_or(true, |id| id.trim().is_empty())
        {
            errors.push("Customer is required".to_string());
        }
        if self.project_name.trim().is_empty() {
            errors.push("Project name is required".to_string());
        }
        // Negated comparisons so NaN is rejected as well
        if !(self.surface_area > 0.0) {
            errors.push("Surface area must be greater than 0".to_string());
        }
        if !(self.coating_thickness > 0.0) {
            errors.push("Coating thickness must be greater than 0".to_string());
        }
        if self.number_of_coats < 1 {
            errors.push("Number of coats must be at least 1".to_string());
        }
        if !(self.material_cost_per_unit >= 0.0) {
            errors.push("Material cost per unit cannot be negative".to_string());
        }
        if !(self.labor_cost_per_unit >= 0.0) {
            errors.push("Labor cost per unit cannot be negative".to_string());
        }
        if !is_percentage(self.overhead_percentage) {
            errors.push("Overhead percentage must be between 0 and 100".to_string());
        }
        if !is_percentage(self.profit_margin) {
            errors.push("Profit margin must be between 0 and 100".to_string());
        }
        if let Some(tax) = self.tax_percentage {
            if !is_percentage(tax) {
                errors.push("Tax percentage must be between 0 and 100".to_string());
            }
        }

        errors
    }

    /// True when [`validate`](Self::validate) reports nothing
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

impl Default for CoatingCostInput {
    fn default() -> Self {
        CoatingCostInput {
            customer_id: None,
            project_name: String::new(),
            surface_area: 0.0,
            coating_thickness: 0.0,
            number_of_coats: 1,
            material_cost_per_unit: 0.0,
            labor_cost_per_unit: 0.0,
            overhead_percentage: 0.0,
            profit_margin: 0.0,
            tax_percentage: None,
        }
    }
}

pub(crate) fn is_percentage(value: f64) -> bool {
    (0.0..=100.0).contains(&value)
}

/// Output of the coating cost calculator. All amounts in IDR.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoatingCostResult {
    pub material_total: f64,
    pub labor_total: f64,
    pub subtotal: f64,
    pub overhead_amount: f64,
    pub total_with_overhead: f64,
    pub profit_amount: f64,
    pub final_quote: f64,
    /// `final_quote / surface_area`
    pub cost_per_sqm: f64,
    /// `final_quote / number_of_coats`
    pub cost_per_coat: f64,
}

/// Price a coating job.
///
/// Range checks are left to [`CoatingCostInput::validate`]; negative rates or
/// percentages above 100 flow through the arithmetic unchanged. The two
/// denominators are guarded.
///
/// # Returns
///
/// * `Ok(CoatingCostResult)` - the breakdown
/// * `Err(CalcError::DivisionByZero)` - `surface_area` or `number_of_coats` is zero
pub fn calculate(input: &CoatingCostInput) -> CalcResult<CoatingCostResult> {
    if input.surface_area == 0.0 {
        tracing::warn!(project = %input.project_name, "coating cost requested for zero surface area");
        return Err(CalcError::division_by_zero("surface_area"));
    }
    if input.number_of_coats == 0 {
        tracing::warn!(project = %input.project_name, "coating cost requested for zero coats");
        return Err(CalcError::division_by_zero("number_of_coats"));
    }

    let coats = f64::from(input.number_of_coats);

    let material_total = input.surface_area * input.material_cost_per_unit * coats;
    let labor_total = input.surface_area * input.labor_cost_per_unit * coats;
    let subtotal = material_total + labor_total;

    let overhead_amount = subtotal * (input.overhead_percentage / 100.0);
    let total_with_overhead = subtotal + overhead_amount;

    let profit_amount = total_with_overhead * (input.profit_margin / 100.0);
    let final_quote = total_with_overhead + profit_amount;

    let result = CoatingCostResult {
        material_total,
        labor_total,
        subtotal,
        overhead_amount,
        total_with_overhead,
        profit_amount,
        final_quote,
        cost_per_sqm: final_quote / input.surface_area,
        cost_per_coat: final_quote / coats,
    };

    tracing::debug!(
        project = %input.project_name,
        area = input.surface_area,
        coats = input.number_of_coats,
        final_quote = result.final_quote,
        "coating cost calculated"
    );

    Ok(result)
}

/// Validate first, then price.
///
/// Returns `CalcError::Validation` carrying every message when the form is
/// incomplete.
pub fn calculate_validated(input: &CoatingCostInput) -> CalcResult<CoatingCostResult> {
    let errors = input.validate();
    if !errors.is_empty() {
        return Err(CalcError::Validation { errors });
    }
    calculate(input)
}

/// PPN figures shown next to a quote.
///
/// Tax is charged on `total_with_overhead` and added on top of `final_quote`
/// for display. The stored quote total stays `final_quote`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxSummary {
    /// Rate used, 0-100
    pub tax_percentage: f64,
    /// Amount the rate is applied to
    pub tax_base: f64,
    pub tax_amount: f64,
    /// `final_quote + tax_amount`
    pub total_with_tax: f64,
}

impl TaxSummary {
    /// Compute tax figures for a calculated quote.
    pub fn from_result(result: &CoatingCostResult, tax_percentage: f64) -> Self {
        let tax_base = result.total_with_overhead;
        let tax_amount = tax_base * (tax_percentage / 100.0);
        TaxSummary {
            tax_percentage,
            tax_base,
            tax_amount,
            total_with_tax: result.final_quote + tax_amount,
        }
    }
}
