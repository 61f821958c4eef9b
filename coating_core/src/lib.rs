//! # coating_core - Coating Estimation Engine
//!
//! `coating_core` is the computational heart of Horizon Suite, the CRM for
//! coating and painting contractors. It prices coating jobs, sizes material
//! orders, keeps quotes and formats figures the way Indonesian customers read
//! them. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless calculations**: pure functions from input to result
//! - **JSON-First**: all records implement Serialize/Deserialize
//! - **Rich Errors**: structured error types, form messages as plain lists
//! - **Explicit sinks**: components report activity to the sink they are given
//!
//! ## Quick Start
//!
//! ```rust
//! use coating_core::calculations::{calculate, CoatingCostInput};
//! use coating_core::formatting::format_rupiah;
//!
//! let input = CoatingCostInput {
//!     customer_id: Some("C-1".to_string()),
//!     project_name: "Gudang".to_string(),
//!     surface_area: 100.0,
//!     coating_thickness: 150.0,
//!     number_of_coats: 2,
//!     material_cost_per_unit: 50_000.0,
//!     labor_cost_per_unit: 30_000.0,
//!     overhead_percentage: 10.0,
//!     profit_margin: 15.0,
//!     tax_percentage: None,
//! };
//!
//! let result = calculate(&input).unwrap();
//! assert_eq!(format_rupiah(result.final_quote), "Rp 20.240.000");
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Coating cost, material usage and system estimates
//! - [`takeoff`] - Surfaces and area normalization
//! - [`materials`] - Products, catalog and coating systems
//! - [`quote`] - Quote records and status lifecycle
//! - [`book`] - Quote book container and estimator settings
//! - [`desk`] - Quote operations with event reporting
//! - [`events`] - Event sink trait and implementations
//! - [`formatting`] - Rupiah, number, percentage and area formatting
//! - [`permissions`] - Role to permission lookup for UI gating
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//! - [`file_io`] - Atomic saves and locking for quote books

pub mod book;
pub mod calculations;
pub mod desk;
pub mod errors;
pub mod events;
pub mod file_io;
pub mod formatting;
pub mod materials;
pub mod permissions;
pub mod quote;
pub mod takeoff;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use book::{EstimatorSettings, QuoteBook};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_book, save_book, FileLock};
pub use quote::{Quote, QuoteStatus};
