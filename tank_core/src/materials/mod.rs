//! # Materials Database
//!
//! Shell plate materials and allowable-stress lookups per API 650 Table 5-2a (SI).
//!
//! ## Material Families
//!
//! - **Carbon steel**: A 283, A 285, A 36, A 516, A 573, A 537, ...
//! - **Stainless steel**: 304, 304L, 316, 316L, 317, 317L (Annex S)
//!
//! ## Temperature Derating
//!
//! Above 40 °C the allowable design stress Sd is interpolated linearly
//! between the breakpoints of the material's derating table and clamped to
//! the first/last breakpoint outside the tabulated range. The hydrotest
//! stress St is an ambient value and is never derated.
//!
//! ## Example
//!
//! ```rust
//! use tank_core::materials::MaterialTable;
//!
//! let table = MaterialTable::api650();
//!
//! let ambient = table.resolve("A 283 C", 20.0);
//! assert_eq!(ambient.sd_mpa, 137.0);
//!
//! let hot = table.resolve("A 283 C", 150.0);
//! assert!(hot.sd_mpa < ambient.sd_mpa);
//! ```

pub mod api650;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Temperature at or below which base allowable stresses apply (°C)
pub const DERATING_THRESHOLD_C: f64 = 40.0;

/// Material family, used for Annex S detection and name matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialFamily {
    /// Carbon and low-alloy plate
    CarbonSteel,
    /// Austenitic stainless plate (Annex S)
    StainlessSteel,
}

/// One (temperature, Sd) breakpoint of a derating table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeratingPoint {
    /// Design metal temperature (°C)
    pub temperature_c: f64,
    /// Allowable design stress at this temperature (MPa)
    pub sd_mpa: f64,
}

/// Shell plate material reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Designation, e.g. "A 516 70"
    pub name: String,
    /// Material family
    pub family: MaterialFamily,
    /// Minimum yield strength Fy (MPa)
    pub yield_mpa: f64,
    /// Minimum tensile strength Fu (MPa)
    pub tensile_mpa: f64,
    /// Allowable design stress Sd at ambient (MPa)
    pub sd_mpa: f64,
    /// Allowable hydrostatic test stress St (MPa)
    pub st_mpa: f64,
    /// Derating breakpoints sorted by temperature; empty if none are tabulated
    #[serde(default)]
    pub derating: Vec<DeratingPoint>,
}

impl Material {
    /// Create a material without a derating table
    pub fn new(
        name: impl Into<String>,
        family: MaterialFamily,
        yield_mpa: f64,
        tensile_mpa: f64,
        sd_mpa: f64,
        st_mpa: f64,
    ) -> Self {
        Material {
            name: name.into(),
            family,
            yield_mpa,
            tensile_mpa,
            sd_mpa,
            st_mpa,
            derating: Vec::new(),
        }
    }

    /// Attach a derating table given as (temperature °C, Sd MPa) pairs.
    ///
    /// Pairs are sorted by temperature.
    pub fn with_derating(mut self, points: &[(f64, f64)]) -> Self {
        let mut derating: Vec<DeratingPoint> = points
            .iter()
            .map(|&(temperature_c, sd_mpa)| DeratingPoint { temperature_c, sd_mpa })
            .collect();
        derating.sort_by(|a, b| a.temperature_c.total_cmp(&b.temperature_c));
        self.derating = derating;
        self
    }

    /// Allowable design stress Sd at the given design temperature.
    pub fn sd_at(&self, temperature_c: f64) -> f64 {
        if temperature_c <= DERATING_THRESHOLD_C || self.derating.is_empty() {
            return self.sd_mpa;
        }

        let first = self.derating[0];
        let last = self.derating[self.derating.len() - 1];
        if temperature_c <= first.temperature_c {
            return first.sd_mpa;
        }
        if temperature_c >= last.temperature_c {
            return last.sd_mpa;
        }

        self.derating
            .windows(2)
            .find(|pair| {
                pair[0].temperature_c <= temperature_c && temperature_c <= pair[1].temperature_c
            })
            .map(|pair| interpolate(temperature_c, pair[0], pair[1]))
            .unwrap_or(last.sd_mpa)
    }

    /// Check if this is an Annex S (stainless) material
    pub fn is_stainless(&self) -> bool {
        self.family == MaterialFamily::StainlessSteel
    }
}

fn interpolate(t: f64, lo: DeratingPoint, hi: DeratingPoint) -> f64 {
    let span = hi.temperature_c - lo.temperature_c;
    if span == 0.0 {
        return lo.sd_mpa;
    }
    lo.sd_mpa + (t - lo.temperature_c) * (hi.sd_mpa - lo.sd_mpa) / span
}

/// Material properties resolved for one design temperature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedMaterial {
    /// Name of the material actually used
    pub name: String,
    /// Minimum yield strength Fy (MPa)
    pub yield_mpa: f64,
    /// Minimum tensile strength Fu (MPa)
    pub tensile_mpa: f64,
    /// Allowable design stress Sd at design temperature (MPa)
    pub sd_mpa: f64,
    /// Allowable hydrostatic test stress St (MPa)
    pub st_mpa: f64,
    /// True if the requested name was unknown and the fallback was used
    pub is_fallback: bool,
    /// True for Annex S materials
    pub is_stainless: bool,
}

/// Immutable material reference table.
///
/// The table is injected into every sizing run so that an alternate
/// code-year or regional table can be substituted without touching
/// calculation logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialTable {
    materials: HashMap<String, Material>,
    fallback: Material,
}

impl MaterialTable {
    /// Build a table from a list of materials and a fallback material.
    pub fn new(materials: impl IntoIterator<Item = Material>, fallback: Material) -> Self {
        let materials = materials
            .into_iter()
            .map(|m| (m.name.clone(), m))
            .collect();
        MaterialTable { materials, fallback }
    }

    /// The process-wide API 650 default table.
    pub fn api650() -> &'static MaterialTable {
        &*api650::API650_MATERIALS
    }

    /// Number of named materials (fallback excluded if not also named)
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// True if the table holds no named materials
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// The conservative fallback material
    pub fn fallback(&self) -> &Material {
        &self.fallback
    }

    /// All material names, sorted (for UI selection)
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.materials.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Look up a material by name.
    ///
    /// Exact (trimmed) match first. Stainless grades also match when the
    /// designation appears inside the name (e.g. "SS 316L"); the longest
    /// matching designation wins.
    pub fn get(&self, name: &str) -> Option<&Material> {
        let clean = name.trim();
        if let Some(material) = self.materials.get(clean) {
            return Some(material);
        }

        let upper = clean.to_uppercase();
        self.materials
            .values()
            .filter(|m| m.is_stainless() && upper.contains(&m.name.to_uppercase()))
            .max_by_key(|m| m.name.len())
    }

    /// Strict lookup, for callers that want an error on unknown names.
    pub fn lookup(&self, name: &str) -> CalcResult<&Material> {
        self.get(name).ok_or_else(|| CalcError::material_not_found(name))
    }

    /// Resolve material properties at a design temperature.
    ///
    /// Never fails: unknown names resolve to the fallback material with
    /// `is_fallback = true`.
    pub fn resolve(&self, name: &str, temperature_c: f64) -> ResolvedMaterial {
        let (material, is_fallback) = match self.get(name) {
            Some(material) => (material, false),
            None => (&self.fallback, true),
        };

        ResolvedMaterial {
            name: material.name.clone(),
            yield_mpa: material.yield_mpa,
            tensile_mpa: material.tensile_mpa,
            sd_mpa: material.sd_at(temperature_c),
            st_mpa: material.st_mpa,
            is_fallback,
            is_stainless: material.is_stainless(),
        }
    }

    /// Check whether a material name designates an Annex S stainless grade.
    pub fn is_stainless(&self, name: &str) -> bool {
        if let Some(material) = self.get(name) {
            return material.is_stainless();
        }
        let upper = name.to_uppercase();
        ["304", "316", "317"].iter().any(|grade| upper.contains(grade))
    }
}
