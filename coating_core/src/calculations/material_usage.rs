//! # Material Usage Estimate
//!
//! Sizes the bill of materials: how many purchasable units of a product a job
//! needs. Not used for pricing in the quick calculator.
//!
//! ```text
//! total_volume = surface_area × thickness_mm × number_of_coats
//! units_needed = ceil(total_volume / coverage_per_unit × 1.1)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use coating_core::calculations::material_usage::{estimate_units, MaterialUsageInput};
//!
//! let usage = estimate_units(&MaterialUsageInput {
//!     surface_area: 100.0,
//!     thickness_mm: 0.15,
//!     number_of_coats: 2,
//!     coverage_per_unit: 8.0,
//! })
//! .unwrap();
//!
//! // 30 L of film / 8 × 1.1 = 4.125 -> 5 units
//! assert_eq!(usage.units_needed, 5);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::units::{Microns, Millimeters};

/// Fixed waste allowance applied to every material estimate
pub const WASTE_FACTOR: f64 = 1.1;

/// Inputs for a single-product usage estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialUsageInput {
    /// Area in m²
    pub surface_area: f64,
    /// Target thickness per coat in millimetres
    pub thickness_mm: f64,
    pub number_of_coats: u32,
    /// Product coverage per purchasable unit
    pub coverage_per_unit: f64,
}

/// Usage estimate result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialUsage {
    /// Film volume before waste (L)
    pub total_volume: f64,
    /// Whole units to order, waste included
    pub units_needed: u32,
}

/// Estimate the number of units to order.
///
/// # Returns
///
/// * `Err(CalcError::InvalidInput)` - coverage is zero or negative
pub fn estimate_units(input: &MaterialUsageInput) -> CalcResult<MaterialUsage> {
    if !(input.coverage_per_unit > 0.0) {
        return Err(CalcError::invalid_input(
            "coverage_per_unit",
            input.coverage_per_unit.to_string(),
            "Coverage must be positive",
        ));
    }

    let total_volume = input.surface_area * input.thickness_mm * f64::from(input.number_of_coats);
    let raw_units = (total_volume / input.coverage_per_unit * WASTE_FACTOR).ceil();

    // Negative areas produce negative volumes; nothing to order
    let units_needed = if raw_units > 0.0 { raw_units as u32 } else { 0 };

    Ok(MaterialUsage {
        total_volume,
        units_needed,
    })
}

/// Convert a dry film thickness in microns to millimetres
pub fn microns_to_mm(microns: f64) -> f64 {
    Millimeters::from(Microns(microns)).value()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waste_rounds_up() {
        let usage = estimate_units(&MaterialUsageInput {
            surface_area: 100.0,
            thickness_mm: 0.1,
            number_of_coats: 1,
            coverage_per_unit: 10.0,
        })
        .unwrap();
        // 10 / 10 × 1.1 = 1.1 -> 2
        assert!((usage.total_volume - 10.0).abs() < 1e-9);
        assert_eq!(usage.units_needed, 2);
    }

    #[test]
    fn test_zero_coats_needs_nothing() {
        let usage = estimate_units(&MaterialUsageInput {
            surface_area: 100.0,
            thickness_mm: 0.1,
            number_of_coats: 0,
            coverage_per_unit: 10.0,
        })
        .unwrap();
        assert_eq!(usage.units_needed, 0);
    }

    #[test]
    fn test_zero_coverage_rejected() {
        let err = estimate_units(&MaterialUsageInput {
            surface_area: 100.0,
            thickness_mm: 0.1,
            number_of_coats: 2,
            coverage_per_unit: 0.0,
        })
        .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_microns_to_mm() {
        assert_eq!(microns_to_mm(250.0), 0.25);
    }
}
