//! # tank_core - Storage Tank Design Engine
//!
//! `tank_core` sizes and checks vertical, cylindrical, flat-bottom welded steel
//! storage tanks to API 650. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Never panics on bad data**: Calculations return a complete result plus
//!   structured [`DesignWarning`]s instead of failing
//! - **Injected tables**: Material and site-coefficient tables are parameters,
//!   with process-wide defaults
//!
//! ## Quick Start
//!
//! ```rust
//! use tank_core::calculations::shell::{calculate, CourseInput, ShellDesignInput, TankGeometry};
//! use tank_core::materials::MaterialTable;
//!
//! let input = ShellDesignInput {
//!     geometry: TankGeometry::new(24.0, 14.4),
//!     courses: (0..6).map(|_| CourseInput::new("A 516 70", 2.4)).collect(),
//!     specific_gravity: 0.9,
//!     corrosion_allowance_mm: 1.5,
//!     ..Default::default()
//! };
//!
//! let result = calculate(&input, MaterialTable::api650());
//! for course in &result.courses {
//!     println!("Course {}: {} mm", course.index + 1, course.t_recommended_mm);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`project`] - Project container, metadata, and settings
//! - [`calculations`] - Shell sizing, seismic demand, hoop stress, design pipeline
//! - [`materials`] - Plate material table and temperature derating
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error and warning types

pub mod calculations;
pub mod errors;
pub mod materials;
pub mod project;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use errors::{CalcError, CalcResult, DesignWarning};
pub use materials::{MaterialTable, ResolvedMaterial};
pub use project::{DesignSettings, ProjectMetadata, TankProject};
