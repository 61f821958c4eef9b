//! # Unit Types
//!
//! Type-safe wrappers for the quantities a coating estimate deals with.
//! Newtypes over f64 that serialize as bare numbers.
//!
//! ## Metric (Primary)
//!
//! Estimates are computed in metric units, matching Indonesian practice:
//! - Length: metres (m)
//! - Area: square metres (m²)
//! - Film thickness: microns (µm), millimetres (mm)
//! - Volume: litres (L)
//!
//! Imperial takeoffs (feet, ft², mils) are converted on entry.
//!
//! ## Example
//!
//! ```rust
//! use coating_core::units::{Microns, Millimeters, SqFt, SqM};
//!
//! let dft = Microns(125.0);
//! let mm: Millimeters = dft.into();
//! assert_eq!(mm.0, 0.125);
//!
//! let area: SqM = SqFt(100.0).into();
//! assert!((area.0 - 9.290304).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Square metres in one square foot (exact)
pub const SQM_PER_SQFT: f64 = 0.09290304;

/// Metres in one foot (exact)
pub const M_PER_FT: f64 = 0.3048;

/// Microns in one mil (exact)
pub const MICRONS_PER_MIL: f64 = 25.4;

// ============================================================================
// Length Units
// ============================================================================

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feet(pub f64);

impl From<Feet> for Meters {
    fn from(ft: Feet) -> Self {
        Meters(ft.0 * M_PER_FT)
    }
}

impl From<Meters> for Feet {
    fn from(m: Meters) -> Self {
        Feet(m.0 / M_PER_FT)
    }
}

// ============================================================================
// Area Units
// ============================================================================

/// Area in square metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqM(pub f64);

/// Area in square feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqFt(pub f64);

impl From<SqFt> for SqM {
    fn from(sqft: SqFt) -> Self {
        SqM(sqft.0 * SQM_PER_SQFT)
    }
}

impl From<SqM> for SqFt {
    fn from(sqm: SqM) -> Self {
        SqFt(sqm.0 / SQM_PER_SQFT)
    }
}

// ============================================================================
// Film Thickness Units
// ============================================================================

/// Dry film thickness in microns (µm)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Microns(pub f64);

/// Thickness in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

/// Thickness in mils (thousandths of an inch)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mils(pub f64);

impl From<Microns> for Millimeters {
    fn from(um: Microns) -> Self {
        Millimeters(um.0 / 1000.0)
    }
}

impl From<Millimeters> for Microns {
    fn from(mm: Millimeters) -> Self {
        Microns(mm.0 * 1000.0)
    }
}

impl From<Mils> for Microns {
    fn from(mils: Mils) -> Self {
        Microns(mils.0 * MICRONS_PER_MIL)
    }
}

impl From<Microns> for Mils {
    fn from(um: Microns) -> Self {
        Mils(um.0 / MICRONS_PER_MIL)
    }
}

// ============================================================================
// Volume Units
// ============================================================================

/// Volume in litres. One m² covered at 1 mm is one litre.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Liters(pub f64);

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Meters);
impl_arithmetic!(Feet);
impl_arithmetic!(SqM);
impl_arithmetic!(SqFt);
impl_arithmetic!(Microns);
impl_arithmetic!(Millimeters);
impl_arithmetic!(Mils);
impl_arithmetic!(Liters);

impl std::iter::Sum for SqM {
    fn sum<I: Iterator<Item = SqM>>(iter: I) -> Self {
        SqM(iter.map(|a| a.0).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feet_to_meters() {
        let m: Meters = Feet(10.0).into();
        assert!((m.0 - 3.048).abs() < 1e-12);
    }

    #[test]
    fn test_sqft_to_sqm() {
        let sqm: SqM = SqFt(1000.0).into();
        assert!((sqm.0 - 92.90304).abs() < 1e-9);
    }

    #[test]
    fn test_mils_to_microns() {
        let um: Microns = Mils(5.0).into();
        assert!((um.0 - 127.0).abs() < 1e-12);
    }

    #[test]
    fn test_arithmetic() {
        let a = SqM(10.0);
        let b = SqM(5.0);
        assert_eq!((a + b).0, 15.0);
        assert_eq!((a - b).0, 5.0);
        assert_eq!((a * 2.0).0, 20.0);
        assert_eq!((a / 2.0).0, 5.0);
        assert_eq!(vec![a, b].into_iter().sum::<SqM>().0, 15.0);
    }

    #[test]
    fn test_serialization() {
        let dft = Microns(75.0);
        let json = serde_json::to_string(&dft).unwrap();
        assert_eq!(json, "75.0");
    }
}
