//! # Estimating Calculations
//!
//! Each calculation follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` / breakdown - Calculation results (JSON-serializable)
//! - a pure function from input to `CalcResult<result>`
//!
//! ## Available Calculations
//!
//! - [`coating_cost`] - Quick per-m² quote from unit rates and markups
//! - [`material_usage`] - Units of product to order, with waste
//! - [`breakdown`] - Full estimate from a takeoff and a coating system

pub mod breakdown;
pub mod coating_cost;
pub mod material_usage;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use breakdown::{estimate_system, AdditionalCost, CostBreakdown, MaterialLine, SystemEstimateInput};
pub use coating_cost::{calculate, calculate_validated, CoatingCostInput, CoatingCostResult, TaxSummary};
pub use material_usage::{estimate_units, MaterialUsage, MaterialUsageInput, WASTE_FACTOR};

use crate::errors::CalcResult;

/// Calculator inputs snapshotted into a quote.
///
/// Tagged so a quote file shows which calculator produced it:
///
/// ```json
/// { "type": "Quick", "surface_area": 100.0, "number_of_coats": 2, ... }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationItem {
    /// Coating cost calculator form
    Quick(CoatingCostInput),
    /// Takeoff plus coating system
    System(SystemEstimateInput),
}

/// Denormalized figures kept on a quote for listing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimateTotals {
    /// m²
    pub total_area: f64,
    /// IDR. `final_quote` for quick quotes (tax excluded), breakdown `total`
    /// for system estimates (tax included).
    pub total_cost: f64,
}

impl CalculationItem {
    /// Get the calculation type as a string
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationItem::Quick(_) => "Quick",
            CalculationItem::System(_) => "System",
        }
    }

    /// Form-level messages from the underlying calculator form
    pub fn validate(&self) -> Vec<String> {
        match self {
            CalculationItem::Quick(input) => input.validate(),
            CalculationItem::System(input) => input.validate(),
        }
    }

    /// Name shown on the quote: the project for quick quotes, the coating
    /// system for system estimates
    pub fn project_name(&self) -> &str {
        match self {
            CalculationItem::Quick(input) => &input.project_name,
            CalculationItem::System(input) => &input.system.name,
        }
    }

    /// Customer named on the form, if the form carries one
    pub fn customer_id(&self) -> Option<&str> {
        match self {
            CalculationItem::Quick(input) => input.customer_id.as_deref(),
            CalculationItem::System(_) => None,
        }
    }

    /// Run the calculator and reduce to listing totals
    pub fn evaluate(&self) -> CalcResult<EstimateTotals> {
        match self {
            CalculationItem::Quick(input) => {
                let result = calculate(input)?;
                Ok(EstimateTotals {
                    total_area: input.surface_area,
                    total_cost: result.final_quote,
                })
            }
            CalculationItem::System(input) => {
                let breakdown = estimate_system(input)?;
                Ok(EstimateTotals {
                    total_area: breakdown.total_area_m2,
                    total_cost: breakdown.total,
                })
            }
        }
    }

    /// PPN rate attached to the inputs, if any
    pub fn tax_percentage(&self) -> Option<f64> {
        match self {
            CalculationItem::Quick(input) => input.tax_percentage,
            CalculationItem::System(input) => Some(input.tax_percentage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_item_serializes_with_tag() {
        let item = CalculationItem::Quick(CoatingCostInput {
            surface_area: 10.0,
            coating_thickness: 100.0,
            ..Default::default()
        });
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"type\":\"Quick\""));
        let roundtrip: CalculationItem = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, item);
    }

    #[test]
    fn test_quick_item_totals() {
        let item = CalculationItem::Quick(CoatingCostInput {
            surface_area: 100.0,
            coating_thickness: 100.0,
            number_of_coats: 2,
            material_cost_per_unit: 50_000.0,
            labor_cost_per_unit: 30_000.0,
            ..Default::default()
        });
        let totals = item.evaluate().unwrap();
        assert_eq!(totals.total_area, 100.0);
        assert_eq!(totals.total_cost, 16_000_000.0);
        assert_eq!(item.calc_type(), "Quick");
    }

    #[test]
    fn test_form_accessors() {
        let item = CalculationItem::Quick(CoatingCostInput {
            customer_id: Some("C-7".to_string()),
            project_name: "Dermaga".to_string(),
            ..Default::default()
        });
        assert_eq!(item.project_name(), "Dermaga");
        assert_eq!(item.customer_id(), Some("C-7"));
        assert!(!item.validate().is_empty());
    }
}
