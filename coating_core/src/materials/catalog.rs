//! Built-in reference catalog.
//!
//! Prices are list prices in IDR per litre and are only defaults; contractor
//! catalogs loaded from JSON replace them.

use once_cell::sync::Lazy;

use super::product::{Product, ProductCategory};
use crate::errors::{CalcError, CalcResult};

static CATALOG: Lazy<Vec<Product>> = Lazy::new(|| {
    vec![
        product("EP-PRM-01", "Epoxy Zinc Phosphate Primer", ProductCategory::Primer, 145_000.0, 6.5, 65.0),
        product("EP-ZR-02", "Epoxy Zinc Rich Primer", ProductCategory::Primer, 310_000.0, 5.0, 58.0),
        product("EP-MIO-01", "Epoxy MIO Intermediate", ProductCategory::Intermediate, 165_000.0, 5.5, 72.0),
        product("PU-TOP-01", "Polyurethane Topcoat", ProductCategory::Topcoat, 210_000.0, 9.0, 55.0),
        product("EP-FLR-01", "Epoxy Self-Leveling Floor", ProductCategory::Topcoat, 265_000.0, 1.0, 100.0),
        product("AC-SLR-01", "Acrylic Water-Based Sealer", ProductCategory::Sealer, 85_000.0, 10.0, 35.0),
        product("TH-EP-01", "Epoxy Thinner", ProductCategory::Thinner, 60_000.0, 1.0, 0.0),
    ]
});

fn product(
    id: &str,
    name: &str,
    category: ProductCategory,
    price_per_unit: f64,
    coverage_per_unit: f64,
    volume_solids_percent: f64,
) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        brand: "Horizon".to_string(),
        category,
        unit: "L".to_string(),
        price_per_unit,
        coverage_per_unit,
        volume_solids_percent,
    }
}

/// All built-in products
pub fn catalog() -> &'static [Product] {
    &CATALOG
}

/// Look up a built-in product by id (case-insensitive)
pub fn find_product(id: &str) -> CalcResult<&'static Product> {
    CATALOG
        .iter()
        .find(|p| p.id.eq_ignore_ascii_case(id.trim()))
        .ok_or_else(|| CalcError::product_not_found(id))
}

/// Built-in products of one category
pub fn products_in(category: ProductCategory) -> impl Iterator<Item = &'static Product> {
    CATALOG.iter().filter(move |p| p.category == category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_entries_are_valid() {
        for p in catalog() {
            assert!(p.validate().is_ok(), "{} failed validation", p.id);
        }
    }

    #[test]
    fn test_find_product() {
        assert_eq!(find_product("pu-top-01").unwrap().category, ProductCategory::Topcoat);
        assert_eq!(
            find_product("NOPE").unwrap_err(),
            CalcError::product_not_found("NOPE")
        );
    }

    #[test]
    fn test_products_in_category() {
        assert_eq!(products_in(ProductCategory::Primer).count(), 2);
    }
}
