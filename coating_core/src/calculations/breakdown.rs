//! # System Estimate
//!
//! Full cost breakdown for a job priced from a surface takeoff and a coating
//! system, as printed on a formal quote: materials per layer, labor,
//! equipment, itemized extras, markups and PPN.
//!
//! Materials are sized with [`estimate_units`](super::material_usage::estimate_units)
//! and charged per whole unit. Overhead and profit use the same order of
//! operations as the quick calculator. Unlike the quick calculator, the
//! breakdown `total` includes tax; `tax_amount` is charged on
//! `total_with_overhead`.
//!
//! ## Example
//!
//! ```rust
//! use coating_core::calculations::breakdown::{estimate_system, SystemEstimateInput};
//! use coating_core::materials::{find_product, CoatLayer, CoatingSystem};
//! use coating_core::takeoff::{Surface, SurfaceType, UnitSystem};
//!
//! let system = CoatingSystem::new(
//!     "Interior wall",
//!     vec![CoatLayer::new(find_product("AC-SLR-01").unwrap().clone(), 2, 50.0)],
//!     2,
//! );
//! let input = SystemEstimateInput {
//!     surfaces: vec![Surface::new("Hall", 20.0, 4.0, 2, UnitSystem::Metric, SurfaceType::Wall)],
//!     system,
//!     labor_rate_per_sqm: 15_000.0,
//!     equipment_cost: 500_000.0,
//!     additional_costs: vec![],
//!     overhead_percentage: 10.0,
//!     profit_margin: 20.0,
//!     tax_percentage: 11.0,
//! };
//!
//! let breakdown = estimate_system(&input).unwrap();
//! assert_eq!(breakdown.total_area_m2, 160.0);
//! assert!(breakdown.total > breakdown.subtotal);
//! ```

use serde::{Deserialize, Serialize};

use super::coating_cost::is_percentage;
use super::material_usage::{estimate_units, microns_to_mm, MaterialUsageInput};
use crate::errors::{CalcError, CalcResult};
use crate::materials::CoatingSystem;
use crate::takeoff::{total_area_m2, Surface};

/// Extra line item (mobilization, scaffolding, permits, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalCost {
    pub description: String,
    pub amount: f64,
}

impl AdditionalCost {
    pub fn new(description: impl Into<String>, amount: f64) -> Self {
        AdditionalCost {
            description: description.into(),
            amount,
        }
    }
}

/// Inputs for a system estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemEstimateInput {
    pub surfaces: Vec<Surface>,
    pub system: CoatingSystem,
    /// Labor per m² per coat (IDR)
    pub labor_rate_per_sqm: f64,
    #[serde(default)]
    pub equipment_cost: f64,
    #[serde(default)]
    pub additional_costs: Vec<AdditionalCost>,
    /// 0-100
    pub overhead_percentage: f64,
    /// 0-100
    pub profit_margin: f64,
    /// PPN, 0-100
    #[serde(default)]
    pub tax_percentage: f64,
}

impl SystemEstimateInput {
    /// Check the estimate form and return one message per violated rule.
    ///
    /// Markups use the same 0-100 rules and wording as the quick calculator.
    /// Like [`calculate`](super::coating_cost::calculate), [`estimate_system`]
    /// does not call this; callers gate on it before saving.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.surfaces.is_empty() {
            errors.push("At least one surface is required".to_string());
        }
        errors.extend(self.surfaces.iter().flat_map(Surface::validate));

        match self.system.validate() {
            Ok(()) => {}
            Err(CalcError::InvalidInput { reason, .. }) => errors.push(format!("Coating system: {}", reason)),
            Err(other) => errors.push(other.to_string()),
        }

        if !(self.labor_rate_per_sqm >= 0.0) {
            errors.push("Labor rate per m² cannot be negative".to_string());
        }
        if !(self.equipment_cost >= 0.0) {
            errors.push("Equipment cost cannot be negative".to_string());
        }
        for cost in &self.additional_costs {
            if !(cost.amount >= 0.0) {
                errors.push(format!("Additional cost '{}' cannot be negative", cost.description));
            }
        }
        if !is_percentage(self.overhead_percentage) {
            errors.push("Overhead percentage must be between 0 and 100".to_string());
        }
        if !is_percentage(self.profit_margin) {
            errors.push("Profit margin must be between 0 and 100".to_string());
        }
        if !is_percentage(self.tax_percentage) {
            errors.push("Tax percentage must be between 0 and 100".to_string());
        }

        errors
    }
}

/// Material requirement for one layer of the system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialLine {
    pub product_id: String,
    pub product_name: String,
    pub coats: u32,
    /// Film volume before waste
    pub total_volume: f64,
    /// Whole units ordered (waste included)
    pub units: u32,
    pub unit_price: f64,
    /// `units × unit_price`
    pub cost: f64,
}

/// Cost breakdown of a system estimate. All amounts in IDR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub total_area_m2: f64,
    pub materials: Vec<MaterialLine>,
    pub materials_subtotal: f64,
    pub labor_subtotal: f64,
    pub equipment_subtotal: f64,
    pub additional_costs: Vec<AdditionalCost>,
    pub additional_subtotal: f64,
    pub subtotal: f64,
    pub overhead_amount: f64,
    pub total_with_overhead: f64,
    pub profit_amount: f64,
    pub tax_amount: f64,
    /// `total_with_overhead + profit_amount + tax_amount`
    pub total: f64,
}

impl CostBreakdown {
    /// Total divided by area; `None` when the area is zero
    pub fn cost_per_sqm(&self) -> Option<f64> {
        (self.total_area_m2 > 0.0).then(|| self.total / self.total_area_m2)
    }
}

/// Price a job from its takeoff and coating system.
///
/// # Returns
///
/// * `Err(CalcError::InvalidInput)` - no measurable area, a bad surface, or an
///   inconsistent coating system
pub fn estimate_system(input: &SystemEstimateInput) -> CalcResult<CostBreakdown> {
    for surface in &input.surfaces {
        let errors = surface.validate();
        if !errors.is_empty() {
            return Err(CalcError::Validation { errors });
        }
    }
    input.system.validate()?;

    let total_area = total_area_m2(&input.surfaces);
    if !(total_area > 0.0) {
        return Err(CalcError::invalid_input(
            "surfaces",
            total_area.to_string(),
            "Takeoff has no measurable area",
        ));
    }

    let mut materials = Vec::with_capacity(input.system.layers.len());
    for layer in &input.system.layers {
        let usage = estimate_units(&MaterialUsageInput {
            surface_area: total_area,
            thickness_mm: microns_to_mm(layer.thickness_per_coat_microns),
            number_of_coats: layer.coats,
            coverage_per_unit: layer.product.coverage_per_unit,
        })?;
        materials.push(MaterialLine {
            product_id: layer.product.id.clone(),
            product_name: layer.product.name.clone(),
            coats: layer.coats,
            total_volume: usage.total_volume,
            units: usage.units_needed,
            unit_price: layer.product.price_per_unit,
            cost: f64::from(usage.units_needed) * layer.product.price_per_unit,
        });
    }

    let materials_subtotal: f64 = materials.iter().map(|m| m.cost).sum();
    let labor_subtotal = total_area * input.labor_rate_per_sqm * f64::from(input.system.total_coats());
    let equipment_subtotal = input.equipment_cost;
    let additional_subtotal: f64 = input.additional_costs.iter().map(|c| c.amount).sum();

    let subtotal = materials_subtotal + labor_subtotal + equipment_subtotal + additional_subtotal;
    let overhead_amount = subtotal * (input.overhead_percentage / 100.0);
    let total_with_overhead = subtotal + overhead_amount;
    let profit_amount = total_with_overhead * (input.profit_margin / 100.0);
    let tax_amount = total_with_overhead * (input.tax_percentage / 100.0);
    let total = total_with_overhead + profit_amount + tax_amount;

    tracing::debug!(
        system = %input.system.name,
        area = total_area,
        layers = materials.len(),
        total,
        "system estimate calculated"
    );

    Ok(CostBreakdown {
        total_area_m2: total_area,
        materials,
        materials_subtotal,
        labor_subtotal,
        equipment_subtotal,
        additional_costs: input.additional_costs.clone(),
        additional_subtotal,
        subtotal,
        overhead_amount,
        total_with_overhead,
        profit_amount,
        tax_amount,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{CoatLayer, Product, ProductCategory};
    use crate::takeoff::{SurfaceType, UnitSystem};

    fn test_product(coverage: f64, price: f64) -> Product {
        Product {
            id: "T-1".to_string(),
            name: "Test Coat".to_string(),
            brand: String::new(),
            category: ProductCategory::Topcoat,
            unit: "L".to_string(),
            price_per_unit: price,
            coverage_per_unit: coverage,
            volume_solids_percent: 50.0,
        }
    }

    fn test_input() -> SystemEstimateInput {
        SystemEstimateInput {
            surfaces: vec![Surface::new("Floor", 10.0, 10.0, 1, UnitSystem::Metric, SurfaceType::Floor)],
            // 100 m² × 0.1 mm × 2 coats = 20 L; 20 / 4 × 1.1 = 5.5 -> 6 units
            system: CoatingSystem::new("Test", vec![CoatLayer::new(test_product(4.0, 100_000.0), 2, 100.0)], 1),
            labor_rate_per_sqm: 10_000.0,
            equipment_cost: 400_000.0,
            additional_costs: vec![AdditionalCost::new("Mobilization", 600_000.0)],
            overhead_percentage: 10.0,
            profit_margin: 20.0,
            tax_percentage: 11.0,
        }
    }

    #[test]
    fn test_breakdown_lines() {
        let b = estimate_system(&test_input()).unwrap();
        assert_eq!(b.total_area_m2, 100.0);
        assert_eq!(b.materials.len(), 1);
        assert_eq!(b.materials[0].units, 6);
        assert_eq!(b.materials_subtotal, 600_000.0);
        assert_eq!(b.labor_subtotal, 2_000_000.0);
        assert_eq!(b.equipment_subtotal, 400_000.0);
        assert_eq!(b.additional_subtotal, 600_000.0);
        assert_eq!(b.subtotal, 3_600_000.0);
    }

    #[test]
    fn test_breakdown_markups_and_tax() {
        let b = estimate_system(&test_input()).unwrap();
        assert!((b.overhead_amount - 360_000.0).abs() < 1e-6);
        assert!((b.total_with_overhead - 3_960_000.0).abs() < 1e-6);
        assert!((b.profit_amount - 792_000.0).abs() < 1e-6);
        assert!((b.tax_amount - 435_600.0).abs() < 1e-6);
        assert!((b.total - 5_187_600.0).abs() < 1e-6);
        assert!((b.cost_per_sqm().unwrap() - 51_876.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_takeoff_rejected() {
        let mut input = test_input();
        input.surfaces.clear();
        assert_eq!(estimate_system(&input).unwrap_err().error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_bad_surface_rejected() {
        let mut input = test_input();
        input.surfaces[0].quantity = 0;
        assert_eq!(estimate_system(&input).unwrap_err().error_code(), "VALIDATION_FAILED");
    }

    #[test]
    fn test_valid_estimate_has_no_messages() {
        assert!(test_input().validate().is_empty());
    }

    #[test]
    fn test_validation_covers_costs_and_markups() {
        let mut input = test_input();
        input.overhead_percentage = 400.0;
        input.profit_margin = -150.0;
        input.tax_percentage = 250.0;
        input.labor_rate_per_sqm = -12_000.0;
        input.equipment_cost = -5_000_000.0;
        input.additional_costs.push(AdditionalCost::new("Scaffolding", -1.0));

        assert_eq!(
            input.validate(),
            vec![
                "Labor rate per m² cannot be negative".to_string(),
                "Equipment cost cannot be negative".to_string(),
                "Additional cost 'Scaffolding' cannot be negative".to_string(),
                "Overhead percentage must be between 0 and 100".to_string(),
                "Profit margin must be between 0 and 100".to_string(),
                "Tax percentage must be between 0 and 100".to_string(),
            ]
        );
    }

    #[test]
    fn test_validation_reports_takeoff_and_system() {
        let mut input = test_input();
        input.surfaces.clear();
        input.system.layers[0].coats = 0;

        let errors = input.validate();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0], "At least one surface is required");
        assert!(errors[1].starts_with("Coating system:"));
    }

    #[test]
    fn test_inconsistent_system_rejected() {
        let mut input = test_input();
        input.system.total_thickness_microns = 50.0;
        assert!(estimate_system(&input).is_err());
    }
}
