//! # Materials
//!
//! Coating products, the built-in catalog and coating systems.
//!
//! ## Example
//!
//! ```rust
//! use coating_core::materials::{find_product, ProductCategory};
//!
//! let primer = find_product("EP-PRM-01").unwrap();
//! assert_eq!(primer.category, ProductCategory::Primer);
//! println!("{} costs {} per m² per coat", primer.name, primer.cost_per_sqm());
//! ```

pub mod catalog;
pub mod product;
pub mod system;

pub use catalog::{catalog, find_product, products_in};
pub use product::{Product, ProductCategory};
pub use system::{CoatLayer, CoatingSystem, THICKNESS_TOLERANCE_MICRONS};
