//! Purchasable coating products.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Role a product plays in a coating system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Primer,
    Intermediate,
    Topcoat,
    Sealer,
    Thinner,
    Other,
}

impl ProductCategory {
    /// All categories for UI selection
    pub const ALL: [ProductCategory; 6] = [
        ProductCategory::Primer,
        ProductCategory::Intermediate,
        ProductCategory::Topcoat,
        ProductCategory::Sealer,
        ProductCategory::Thinner,
        ProductCategory::Other,
    ];

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "primer" => Ok(ProductCategory::Primer),
            "intermediate" | "mid_coat" | "midcoat" => Ok(ProductCategory::Intermediate),
            "topcoat" | "top_coat" | "finish" => Ok(ProductCategory::Topcoat),
            "sealer" => Ok(ProductCategory::Sealer),
            "thinner" | "solvent" => Ok(ProductCategory::Thinner),
            "other" => Ok(ProductCategory::Other),
            _ => Err(CalcError::invalid_input("category", s, "Unknown product category")),
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            ProductCategory::Primer => "Primer",
            ProductCategory::Intermediate => "Intermediate",
            ProductCategory::Topcoat => "Topcoat",
            ProductCategory::Sealer => "Sealer",
            ProductCategory::Thinner => "Thinner",
            ProductCategory::Other => "Other",
        }
    }
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A coating product from the materials catalog.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": "EP-PRM-01",
///   "name": "Epoxy Zinc Phosphate Primer",
///   "brand": "Horizon",
///   "category": "primer",
///   "unit": "L",
///   "price_per_unit": 145000.0,
///   "coverage_per_unit": 6.5,
///   "volume_solids_percent": 65.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub brand: String,
    pub category: ProductCategory,
    /// Purchasable unit, usually litres
    pub unit: String,
    /// Price per unit in IDR
    pub price_per_unit: f64,
    /// m² covered per unit at the recommended film thickness
    pub coverage_per_unit: f64,
    /// Volume solids, 0-100
    #[serde(default)]
    pub volume_solids_percent: f64,
}

impl Product {
    /// Check catalog data before it is used for estimating
    pub fn validate(&self) -> CalcResult<()> {
        if self.id.trim().is_empty() {
            return Err(CalcError::invalid_input("id", "", "Product id is required"));
        }
        if self.price_per_unit < 0.0 {
            return Err(CalcError::invalid_input(
                "price_per_unit",
                self.price_per_unit.to_string(),
                "Price cannot be negative",
            ));
        }
        if self.coverage_per_unit <= 0.0 {
            return Err(CalcError::invalid_input(
                "coverage_per_unit",
                self.coverage_per_unit.to_string(),
                "Coverage must be positive",
            ));
        }
        if !(0.0..=100.0).contains(&self.volume_solids_percent) {
            return Err(CalcError::invalid_input(
                "volume_solids_percent",
                self.volume_solids_percent.to_string(),
                "Volume solids must be between 0 and 100",
            ));
        }
        Ok(())
    }

    /// Material price per m² for one coat, from price and coverage
    pub fn cost_per_sqm(&self) -> f64 {
        self.price_per_unit / self.coverage_per_unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primer() -> Product {
        Product {
            id: "P-1".to_string(),
            name: "Primer".to_string(),
            brand: String::new(),
            category: ProductCategory::Primer,
            unit: "L".to_string(),
            price_per_unit: 100_000.0,
            coverage_per_unit: 8.0,
            volume_solids_percent: 60.0,
        }
    }

    #[test]
    fn test_cost_per_sqm() {
        assert_eq!(primer().cost_per_sqm(), 12_500.0);
    }

    #[test]
    fn test_validate_rejects_zero_coverage() {
        let mut p = primer();
        assert!(p.validate().is_ok());
        p.coverage_per_unit = 0.0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!(ProductCategory::from_str_flexible("Top Coat").unwrap(), ProductCategory::Topcoat);
        assert_eq!(ProductCategory::from_str_flexible("mid-coat").unwrap(), ProductCategory::Intermediate);
        assert!(ProductCategory::from_str_flexible("glitter").is_err());
    }
}
