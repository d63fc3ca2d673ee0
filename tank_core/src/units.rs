//! # Unit Types
//!
//! Type-safe wrappers for the SI units used in tank design. These are plain
//! `f64` newtypes that serialize as bare numbers.
//!
//! ## SI Units (Primary)
//!
//! Tank design follows the metric edition of the code:
//! - Length: metres (m) for geometry, millimetres (mm) for plate thickness
//! - Mass: kilograms (kg)
//! - Force: newtons (N), kilonewtons (kN)
//! - Moment: newton-metres (N·m), kilonewton-metres (kN·m)
//! - Pressure: millimetres of water column (mmH2O) for internal pressure,
//!   kilopascals (kPa) for liquid pressure
//! - Stress: megapascals (MPa)
//!
//! ## Example
//!
//! ```rust
//! use tank_core::units::{Meters, Millimeters, Kilograms, Newtons};
//!
//! let plate = Millimeters(12.0);
//! let plate_m: Meters = plate.into();
//! assert_eq!(plate_m.0, 0.012);
//!
//! let weight: Newtons = Kilograms(1000.0).into();
//! assert_eq!(weight.0, 9810.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Gravitational acceleration used for weight conversion (m/s²)
pub const GRAVITY: f64 = 9.81;

/// Standard gravity used for hydrostatic pressure (m/s²)
pub const STANDARD_GRAVITY: f64 = 9.80665;

/// Carbon steel density (kg/m³)
pub const STEEL_DENSITY_KG_M3: f64 = 7850.0;

/// Water density (kg/m³)
pub const WATER_DENSITY_KG_M3: f64 = 1000.0;

// ============================================================================
// Length Units
// ============================================================================

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

// ============================================================================
// Pressure Head
// ============================================================================

/// Internal pressure expressed as millimetres of water column
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MillimetersOfWater(pub f64);

impl MillimetersOfWater {
    /// Equivalent liquid head for a liquid of the given specific gravity.
    ///
    /// A non-positive specific gravity is treated as water.
    pub fn liquid_head(self, specific_gravity: f64) -> Meters {
        let g = if specific_gravity > 0.0 { specific_gravity } else { 1.0 };
        Meters(self.0 / 1000.0 / g)
    }
}

// ============================================================================
// Mass and Force Units
// ============================================================================

/// Mass in kilograms
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilograms(pub f64);

/// Force in newtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Newtons(pub f64);

/// Force in kilonewtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloNewtons(pub f64);

impl From<Kilograms> for Newtons {
    fn from(kg: Kilograms) -> Self {
        Newtons(kg.0 * GRAVITY)
    }
}

impl From<Newtons> for KiloNewtons {
    fn from(n: Newtons) -> Self {
        KiloNewtons(n.0 / 1000.0)
    }
}

impl From<KiloNewtons> for Newtons {
    fn from(kn: KiloNewtons) -> Self {
        Newtons(kn.0 * 1000.0)
    }
}

// ============================================================================
// Moment Units
// ============================================================================

/// Moment in newton-metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NewtonMeters(pub f64);

/// Moment in kilonewton-metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloNewtonMeters(pub f64);

impl From<NewtonMeters> for KiloNewtonMeters {
    fn from(nm: NewtonMeters) -> Self {
        KiloNewtonMeters(nm.0 / 1000.0)
    }
}

impl From<KiloNewtonMeters> for NewtonMeters {
    fn from(knm: KiloNewtonMeters) -> Self {
        NewtonMeters(knm.0 * 1000.0)
    }
}

// ============================================================================
// Pressure Units
// ============================================================================

/// Pressure in kilopascals (kN/m²)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilopascals(pub f64);

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
impl_arithmetic!(Millimeters);
impl_arithmetic!(MillimetersOfWater);
impl_arithmetic!(Kilograms);
impl_arithmetic!(Newtons);
impl_arithmetic!(KiloNewtons);
impl_arithmetic!(NewtonMeters);
impl_arithmetic!(KiloNewtonMeters);
impl_arithmetic!(Kilopascals);
