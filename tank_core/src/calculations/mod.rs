//! # Tank Calculations
//!
//! This module contains the tank design calculations. Each calculation
//! follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - `calculate(...) -> *Result` - Pure calculation function that never fails;
//!   abnormal conditions are reported as [`DesignWarning`](crate::errors::DesignWarning)s
//!
//! ## Available Calculations
//!
//! - [`shell`] - Course-by-course shell thickness sizing (one-foot and variable-design-point)
//! - [`site_coefficients`] - Design spectral accelerations from site data (API 650 and KDS)
//! - [`seismic`] - Annex E seismic demand: base shear, overturning, sloshing, sliding, anchorage
//! - [`hoop_stress`] - Combined hydrostatic + hydrodynamic hoop stress per course
//! - [`tank_design`] - End-to-end pipeline tying the above together

pub mod hoop_stress;
pub mod seismic;
pub mod shell;
pub mod site_coefficients;
pub mod tank_design;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use hoop_stress::{HoopStressCheck, HoopStressInput, HydrodynamicModel};
pub use seismic::{
    AnchorageClass, AnchorageType, KdsSeismicAnalyzer, SeismicDemandAnalyzer, SeismicParameters,
    SeismicResult, SeismicTank, SpectralAccelerations, StandardSeismicAnalyzer,
};
pub use shell::{
    CourseInput, CourseResult, DesignMethodSelection, ShellDesignInput, ShellDesignResult,
    TankGeometry,
};
pub use site_coefficients::{
    Api650SiteCoefficients, DesignSpectrum, GroundMotion, KdsSite, KdsSiteCoefficients, SiteClass,
    SiteCoefficientProvider,
};
pub use tank_design::{TankDesignInput, TankDesignResult};

/// API 650 clause references for traceable reporting.
pub mod api_ref {
    /// Minimum nominal shell thickness
    pub const MIN_SHELL_THICKNESS: &str = "API 650 5.6.1.1";
    /// One-foot method
    pub const ONE_FOOT_METHOD: &str = "API 650 5.6.3";
    /// Variable-design-point method
    pub const VARIABLE_DESIGN_POINT: &str = "API 650 5.6.4";
    /// Stainless steel tanks
    pub const ANNEX_S: &str = "API 650 Annex S";
    /// Site coefficients Fa / Fv
    pub const SITE_COEFFICIENTS: &str = "API 650 Tables E-1, E-2";
    /// Effective impulsive/convective weights
    pub const EFFECTIVE_WEIGHTS: &str = "API 650 E.6.1.1";
    /// Design base shear
    pub const BASE_SHEAR: &str = "API 650 E.6.1";
    /// Ringwall and slab overturning moments
    pub const OVERTURNING: &str = "API 650 E.6.1.5";
    /// Freeboard / sloshing wave height
    pub const SLOSHING: &str = "API 650 E.7.2";
    /// Sliding resistance
    pub const SLIDING: &str = "API 650 E.7.6";
    /// Anchorage ratio J
    pub const ANCHORAGE_RATIO: &str = "API 650 E.6.2.1.1";
    /// Dynamic hoop stress
    pub const HOOP_STRESS: &str = "API 650 E.6.1.4";
    /// Korean regional seismic design spectrum
    pub const KDS_SPECTRUM: &str = "KDS 41 17 00 4.2";
}

/// Outcome of a single design check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CheckStatus {
    /// Demand within capacity
    #[serde(rename = "OK")]
    Ok,
    /// Demand exceeds capacity
    #[serde(rename = "FAIL")]
    Fail,
    /// No calculation performed (degenerate input)
    #[default]
    NotApplicable,
}

impl CheckStatus {
    /// Build from a pass/fail predicate
    pub fn from_pass(pass: bool) -> Self {
        if pass {
            CheckStatus::Ok
        } else {
            CheckStatus::Fail
        }
    }

    /// True only for an explicit pass
    pub fn is_ok(&self) -> bool {
        matches!(self, CheckStatus::Ok)
    }

    /// True only for an explicit failure
    pub fn is_fail(&self) -> bool {
        matches!(self, CheckStatus::Fail)
    }

    /// Short label for reports
    pub fn label(&self) -> &'static str {
        match self {
            CheckStatus::Ok => "OK",
            CheckStatus::Fail => "FAIL",
            CheckStatus::NotApplicable => "N/A",
        }
    }
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Square root of the sum of squares of independent load effects.
pub fn srss(components: &[f64]) -> f64 {
    components.iter().map(|c| c * c).sum::<f64>().sqrt()
}
