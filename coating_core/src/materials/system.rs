//! Coating systems: ordered product layers with a total dry film thickness.
//!
//! `total_thickness_microns` is stored alongside the layers so saved quotes
//! show the figure the customer was given. [`CoatingSystem::new`] always derives
//! it from the layers; [`CoatingSystem::validate`] catches stored values that
//! drifted (hand-edited or imported data).

use serde::{Deserialize, Serialize};

use super::product::Product;
use crate::errors::{CalcError, CalcResult};

/// Largest gap tolerated between stored and layer-derived thickness (µm)
pub const THICKNESS_TOLERANCE_MICRONS: f64 = 0.5;

/// One product applied one or more times
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoatLayer {
    pub product: Product,
    pub coats: u32,
    /// Dry film thickness of each coat (µm)
    pub thickness_per_coat_microns: f64,
}

impl CoatLayer {
    pub fn new(product: Product, coats: u32, thickness_per_coat_microns: f64) -> Self {
        CoatLayer {
            product,
            coats,
            thickness_per_coat_microns,
        }
    }

    /// Film this layer contributes (µm)
    pub fn thickness_microns(&self) -> f64 {
        f64::from(self.coats) * self.thickness_per_coat_microns
    }
}

/// A specified coating system.
///
/// ## Example
///
/// ```rust
/// use coating_core::materials::{find_product, CoatLayer, CoatingSystem};
///
/// let system = CoatingSystem::new(
///     "Industrial steel C4",
///     vec![
///         CoatLayer::new(find_product("EP-ZR-02").unwrap().clone(), 1, 60.0),
///         CoatLayer::new(find_product("EP-MIO-01").unwrap().clone(), 1, 120.0),
///         CoatLayer::new(find_product("PU-TOP-01").unwrap().clone(), 1, 60.0),
///     ],
///     10,
/// );
/// assert_eq!(system.total_thickness_microns, 240.0);
/// assert!(system.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoatingSystem {
    pub name: String,
    pub layers: Vec<CoatLayer>,
    /// Declared total dry film thickness (µm)
    pub total_thickness_microns: f64,
    pub warranty_years: u32,
}

impl CoatingSystem {
    /// Build a system; the total thickness is summed from the layers.
    pub fn new(name: impl Into<String>, layers: Vec<CoatLayer>, warranty_years: u32) -> Self {
        let total_thickness_microns = layers.iter().map(CoatLayer::thickness_microns).sum();
        CoatingSystem {
            name: name.into(),
            layers,
            total_thickness_microns,
            warranty_years,
        }
    }

    /// Thickness implied by the layers (µm)
    pub fn computed_thickness_microns(&self) -> f64 {
        self.layers.iter().map(CoatLayer::thickness_microns).sum()
    }

    /// Coats across all layers
    pub fn total_coats(&self) -> u32 {
        self.layers.iter().map(|l| l.coats).sum()
    }

    /// Check layers and the thickness invariant.
    pub fn validate(&self) -> CalcResult<()> {
        if self.layers.is_empty() {
            return Err(CalcError::invalid_input("layers", "[]", "Coating system has no layers"));
        }
        for (i, layer) in self.layers.iter().enumerate() {
            layer.product.validate()?;
            if layer.coats == 0 {
                return Err(CalcError::invalid_input(
                    format!("layers[{}].coats", i),
                    "0",
                    "Each layer needs at least one coat",
                ));
            }
            if !(layer.thickness_per_coat_microns > 0.0) {
                return Err(CalcError::invalid_input(
                    format!("layers[{}].thickness_per_coat_microns", i),
                    layer.thickness_per_coat_microns.to_string(),
                    "Coat thickness must be positive",
                ));
            }
        }

        let computed = self.computed_thickness_microns();
        if (computed - self.total_thickness_microns).abs() > THICKNESS_TOLERANCE_MICRONS {
            return Err(CalcError::invalid_input(
                "total_thickness_microns",
                self.total_thickness_microns.to_string(),
                format!("Layers add up to {} µm", computed),
            ));
        }
        Ok(())
    }

    /// Re-derive the stored total from the layers
    pub fn recompute_thickness(&mut self) {
        self.total_thickness_microns = self.computed_thickness_microns();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::catalog::find_product;

    fn floor_system() -> CoatingSystem {
        CoatingSystem::new(
            "Epoxy floor",
            vec![
                CoatLayer::new(find_product("AC-SLR-01").unwrap().clone(), 1, 40.0),
                CoatLayer::new(find_product("EP-FLR-01").unwrap().clone(), 2, 500.0),
            ],
            3,
        )
    }

    #[test]
    fn test_thickness_derived_from_layers() {
        let system = floor_system();
        assert_eq!(system.total_thickness_microns, 1040.0);
        assert_eq!(system.total_coats(), 3);
        assert!(system.validate().is_ok());
    }

    #[test]
    fn test_drifted_thickness_rejected() {
        let json = serde_json::to_string(&floor_system()).unwrap();
        let mut loaded: CoatingSystem = serde_json::from_str(&json).unwrap();
        loaded.total_thickness_microns = 1000.0;

        let err = loaded.validate().unwrap_err();
        match err {
            CalcError::InvalidInput { field, .. } => assert_eq!(field, "total_thickness_microns"),
            other => panic!("unexpected error {:?}", other),
        }

        loaded.recompute_thickness();
        assert!(loaded.validate().is_ok());
    }

    #[test]
    fn test_empty_system_rejected() {
        let system = CoatingSystem::new("Empty", vec![], 0);
        assert!(system.validate().is_err());
    }

    #[test]
    fn test_zero_coat_layer_rejected() {
        let mut system = floor_system();
        system.layers[1].coats = 0;
        system.recompute_thickness();
        assert!(system.validate().is_err());
    }
}
