//! # Surface Takeoff
//!
//! Paintable areas measured on site. Each [`Surface`] is a rectangle repeated
//! `quantity` times; areas are normalized to m² whatever unit system the
//! measurement was taken in.
//!
//! ## Example
//!
//! ```rust
//! use coating_core::takeoff::{Surface, SurfaceType, UnitSystem, total_area_m2};
//!
//! let walls = Surface::new("North wall", 10.0, 3.0, 2, UnitSystem::Metric, SurfaceType::Wall);
//! let floor = Surface::new("Mezzanine", 20.0, 10.0, 1, UnitSystem::Imperial, SurfaceType::Floor);
//!
//! assert_eq!(walls.area_m2(), 60.0);
//! let total = total_area_m2(&[walls, floor]);
//! assert!((total - (60.0 + 200.0 * 0.09290304)).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::units::{SqFt, SqM};

/// Measurement system a surface was taken off in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Lengths in metres
    #[default]
    Metric,
    /// Lengths in feet
    Imperial,
}

/// What kind of element is being coated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceType {
    #[default]
    Wall,
    Floor,
    Ceiling,
    Roof,
    Column,
    Beam,
    Tank,
    Pipe,
    Other,
}

/// Condition of the substrate before preparation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceCondition {
    New,
    #[default]
    Good,
    Fair,
    Poor,
    Corroded,
}

/// Surface preparation grade (ISO 8501-1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PreparationLevel {
    /// No preparation beyond cleaning
    #[default]
    None,
    /// Hand tool cleaning
    St2,
    /// Power tool cleaning
    St3,
    /// Light blast
    Sa1,
    /// Thorough blast
    Sa2,
    /// Very thorough blast
    #[serde(rename = "Sa2.5")]
    Sa2_5,
    /// Blast to visually clean steel
    Sa3,
}

impl PreparationLevel {
    /// Grade label as written on specifications
    pub fn code(&self) -> &'static str {
        match self {
            PreparationLevel::None => "None",
            PreparationLevel::St2 => "St 2",
            PreparationLevel::St3 => "St 3",
            PreparationLevel::Sa1 => "Sa 1",
            PreparationLevel::Sa2 => "Sa 2",
            PreparationLevel::Sa2_5 => "Sa 2.5",
            PreparationLevel::Sa3 => "Sa 3",
        }
    }

    /// Whether the grade requires abrasive blasting
    pub fn is_blast(&self) -> bool {
        matches!(
            self,
            PreparationLevel::Sa1 | PreparationLevel::Sa2 | PreparationLevel::Sa2_5 | PreparationLevel::Sa3
        )
    }
}

/// One paintable area.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": "5b1f0c2e-8f0a-4a53-9d59-6d8b5e3f2a10",
///   "name": "North wall",
///   "length": 10.0,
///   "width": 3.0,
///   "quantity": 2,
///   "unit_system": "metric",
///   "surface_type": "wall",
///   "condition": "good",
///   "preparation": "St3"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub id: Uuid,
    pub name: String,
    /// Length in the surface's unit system
    pub length: f64,
    /// Width (or height) in the surface's unit system
    pub width: f64,
    /// Number of identical repetitions
    pub quantity: u32,
    #[serde(default)]
    pub unit_system: UnitSystem,
    #[serde(default)]
    pub surface_type: SurfaceType,
    #[serde(default)]
    pub condition: SurfaceCondition,
    #[serde(default)]
    pub preparation: PreparationLevel,
}

impl Surface {
    /// Create a surface with default condition and no preparation
    pub fn new(
        name: impl Into<String>,
        length: f64,
        width: f64,
        quantity: u32,
        unit_system: UnitSystem,
        surface_type: SurfaceType,
    ) -> Self {
        Surface {
            id: Uuid::new_v4(),
            name: name.into(),
            length,
            width,
            quantity,
            unit_system,
            surface_type,
            condition: SurfaceCondition::default(),
            preparation: PreparationLevel::default(),
        }
    }

    /// Set condition and preparation grade (builder pattern)
    pub fn with_preparation(mut self, condition: SurfaceCondition, preparation: PreparationLevel) -> Self {
        self.condition = condition;
        self.preparation = preparation;
        self
    }

    /// Area in the surface's own unit system (m² or ft²)
    pub fn raw_area(&self) -> f64 {
        self.length * self.width * f64::from(self.quantity)
    }

    /// Area normalized to m²
    pub fn area(&self) -> SqM {
        match self.unit_system {
            UnitSystem::Metric => SqM(self.raw_area()),
            UnitSystem::Imperial => SqFt(self.raw_area()).into(),
        }
    }

    /// Area normalized to m², as a bare number
    pub fn area_m2(&self) -> f64 {
        self.area().value()
    }

    /// Check the measurement; one message per problem.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let label = if self.name.trim().is_empty() {
            errors.push("Surface name is required".to_string());
            "surface".to_string()
        } else {
            format!("'{}'", self.name)
        };
        if !(self.length > 0.0) {
            errors.push(format!("Length of {} must be greater than 0", label));
        }
        if !(self.width > 0.0) {
            errors.push(format!("Width of {} must be greater than 0", label));
        }
        if self.quantity < 1 {
            errors.push(format!("Quantity of {} must be at least 1", label));
        }
        errors
    }
}

/// Sum of normalized areas in m²
pub fn total_area_m2(surfaces: &[Surface]) -> f64 {
    surfaces.iter().map(Surface::area).sum::<SqM>().value()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_area() {
        let s = Surface::new("Tank shell", 12.0, 4.5, 3, UnitSystem::Metric, SurfaceType::Tank);
        assert_eq!(s.area_m2(), 162.0);
    }

    #[test]
    fn test_imperial_area_normalized() {
        let s = Surface::new("Deck", 10.0, 10.0, 1, UnitSystem::Imperial, SurfaceType::Floor);
        assert!((s.area_m2() - 9.290304).abs() < 1e-9);
        assert_eq!(s.raw_area(), 100.0);
    }

    #[test]
    fn test_total_area_empty() {
        assert_eq!(total_area_m2(&[]), 0.0);
    }

    #[test]
    fn test_validate_reports_bad_measurements() {
        let mut s = Surface::new("Beam B2", 0.0, 2.0, 0, UnitSystem::Metric, SurfaceType::Beam);
        s.width = -1.0;
        let errors = s.validate();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("'Beam B2'"));
    }

    #[test]
    fn test_preparation_serialization() {
        let json = serde_json::to_string(&PreparationLevel::Sa2_5).unwrap();
        assert_eq!(json, "\"Sa2.5\"");
        assert!(PreparationLevel::Sa2_5.is_blast());
        assert!(!PreparationLevel::St3.is_blast());
    }

    #[test]
    fn test_surface_defaults_on_deserialize() {
        let json = r#"{
            "id": "5b1f0c2e-8f0a-4a53-9d59-6d8b5e3f2a10",
            "name": "Wall",
            "length": 2.0,
            "width": 3.0,
            "quantity": 1
        }"#;
        let s: Surface = serde_json::from_str(json).unwrap();
        assert_eq!(s.unit_system, UnitSystem::Metric);
        assert_eq!(s.preparation, PreparationLevel::None);
        assert_eq!(s.area_m2(), 6.0);
    }
}
