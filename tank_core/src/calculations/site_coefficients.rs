//! # Site Coefficients and Design Spectrum
//!
//! Converts site ground-motion data into the design spectral accelerations
//! SDS and SD1 consumed by the seismic analysis.
//!
//! Two providers implement [`SiteCoefficientProvider`]:
//!
//! - [`Api650SiteCoefficients`] - API 650 Tables E-1/E-2 (Fa, Fv by site class)
//! - [`KdsSiteCoefficients`] - Korean regional spectrum (zone factor S and soil profile)
//!
//! Both borrow an immutable coefficient table so that alternate editions can
//! be injected without touching the analysis.
//!
//! ## Example
//!
//! ```rust
//! use tank_core::calculations::site_coefficients::{
//!     Api650SiteCoefficients, GroundMotion, SiteClass, SiteCoefficientProvider,
//! };
//!
//! let provider = Api650SiteCoefficients::default();
//! let spectrum = provider.design_spectrum(&GroundMotion::Mapped {
//!     ss: 0.5,
//!     s1: 0.2,
//!     site_class: SiteClass::D,
//! });
//! // Fa = 1.4, Fv = 2.0
//! assert!((spectrum.sds - 2.0 / 3.0 * 1.4 * 0.5).abs() < 1e-12);
//! ```

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::api_ref;
use crate::errors::{CalcError, CalcResult};

/// Ratio of design to maximum-considered spectral acceleration
const DESIGN_FRACTION: f64 = 2.0 / 3.0;

/// Short-period amplification of the KDS design spectrum
const KDS_AMPLIFICATION: f64 = 2.5;

/// Ratio SDS / SD1 assumed for single-parameter input
const SINGLE_PARAMETER_RATIO: f64 = 2.5;

// ============================================================================
// Design Spectrum
// ============================================================================

/// Design spectral accelerations for one site.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DesignSpectrum {
    /// Design spectral acceleration, short period (g)
    pub sds: f64,
    /// Design spectral acceleration, 1 second (g)
    pub sd1: f64,
    /// Short-period site coefficient applied (1.0 when not applicable)
    pub fa: f64,
    /// Long-period site coefficient applied (1.0 when not applicable)
    pub fv: f64,
}

impl DesignSpectrum {
    /// Spectrum given directly, no site amplification
    pub fn direct(sds: f64, sd1: f64) -> Self {
        DesignSpectrum { sds, sd1, fa: 1.0, fv: 1.0 }
    }
}

/// Source of design spectral accelerations.
///
/// Implementations are pure lookups over an immutable table.
pub trait SiteCoefficientProvider {
    /// Site description accepted by this provider
    type Site;

    /// Design spectrum for a site
    fn design_spectrum(&self, site: &Self::Site) -> DesignSpectrum;

    /// Code clause for reports
    fn code_reference(&self) -> &'static str;
}

// ============================================================================
// API 650 Tables E-1 / E-2
// ============================================================================

/// Site class per API 650 Table E-1/E-2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SiteClass {
    /// Hard rock
    A,
    /// Rock
    B,
    /// Very dense soil and soft rock
    C,
    /// Stiff soil
    #[default]
    D,
    /// Soft soil
    E,
    /// Site-specific evaluation required; not tabulated
    F,
}

impl SiteClass {
    /// All site classes for UI
    pub const ALL: [SiteClass; 6] = [
        SiteClass::A,
        SiteClass::B,
        SiteClass::C,
        SiteClass::D,
        SiteClass::E,
        SiteClass::F,
    ];

    /// Parse from common string representations ("D", "site class d", ...)
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let clean = s.trim().to_uppercase();
        let letter = clean.strip_prefix("SITE CLASS").unwrap_or(&clean).trim();
        match letter {
            "A" => Ok(SiteClass::A),
            "B" => Ok(SiteClass::B),
            "C" => Ok(SiteClass::C),
            "D" => Ok(SiteClass::D),
            "E" => Ok(SiteClass::E),
            "F" => Ok(SiteClass::F),
            _ => Err(CalcError::invalid_input("site_class", s, "Expected site class A-F")),
        }
    }
}

impl std::fmt::Display for SiteClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Site ground-motion input, in one of three forms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method")]
pub enum GroundMotion {
    /// Mapped MCE accelerations with site class
    Mapped {
        /// Short-period MCE spectral acceleration (g)
        ss: f64,
        /// 1-second MCE spectral acceleration (g)
        s1: f64,
        /// Site class
        site_class: SiteClass,
    },
    /// Single peak parameter; SDS = Sp and SD1 = Sp / 2.5
    SingleParameter {
        /// Peak design spectral acceleration (g)
        sp: f64,
    },
    /// Design accelerations given directly
    Design {
        /// Design spectral acceleration, short period (g)
        sds: f64,
        /// Design spectral acceleration, 1 second (g)
        sd1: f64,
    },
}

/// Fa/Fv tables by site class over Ss and S1 breakpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteCoefficientTable {
    /// Ss breakpoints (g), ascending
    pub ss_breakpoints: Vec<f64>,
    /// S1 breakpoints (g), ascending
    pub s1_breakpoints: Vec<f64>,
    /// Fa rows, one value per Ss breakpoint
    pub fa: HashMap<SiteClass, Vec<f64>>,
    /// Fv rows, one value per S1 breakpoint
    pub fv: HashMap<SiteClass, Vec<f64>>,
}

/// API 650 13th edition Tables E-1 and E-2
pub static API650_SITE_COEFFICIENTS: Lazy<SiteCoefficientTable> =
    Lazy::new(|| SiteCoefficientTable {
        ss_breakpoints: vec![0.25, 0.5, 0.75, 1.0, 1.25],
        s1_breakpoints: vec![0.1, 0.2, 0.3, 0.4, 0.5],
        fa: HashMap::from([
            (SiteClass::A, vec![0.8, 0.8, 0.8, 0.8, 0.8]),
            (SiteClass::B, vec![1.0, 1.0, 1.0, 1.0, 1.0]),
            (SiteClass::C, vec![1.2, 1.2, 1.1, 1.0, 1.0]),
            (SiteClass::D, vec![1.6, 1.4, 1.2, 1.1, 1.0]),
            (SiteClass::E, vec![2.5, 1.7, 1.2, 0.9, 0.9]),
        ]),
        fv: HashMap::from([
            (SiteClass::A, vec![0.8, 0.8, 0.8, 0.8, 0.8]),
            (SiteClass::B, vec![1.0, 1.0, 1.0, 1.0, 1.0]),
            (SiteClass::C, vec![1.7, 1.6, 1.5, 1.4, 1.3]),
            (SiteClass::D, vec![2.4, 2.0, 1.8, 1.6, 1.5]),
            (SiteClass::E, vec![3.5, 3.2, 2.8, 2.4, 2.4]),
        ]),
    });

impl SiteCoefficientTable {
    /// The process-wide API 650 default table
    pub fn api650() -> &'static SiteCoefficientTable {
        &*API650_SITE_COEFFICIENTS
    }

    /// Short-period coefficient Fa; 1.0 for untabulated classes
    pub fn fa(&self, site_class: SiteClass, ss: f64) -> f64 {
        self.fa
            .get(&site_class)
            .map(|row| interpolate_clamped(&self.ss_breakpoints, row, ss))
            .unwrap_or(1.0)
    }

    /// Long-period coefficient Fv; 1.0 for untabulated classes
    pub fn fv(&self, site_class: SiteClass, s1: f64) -> f64 {
        self.fv
            .get(&site_class)
            .map(|row| interpolate_clamped(&self.s1_breakpoints, row, s1))
            .unwrap_or(1.0)
    }
}

/// Piecewise-linear lookup, clamped to the end values.
fn interpolate_clamped(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return 1.0;
    }
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[n - 1] {
        return ys[n - 1];
    }
    (0..n - 1)
        .find(|&i| xs[i] <= x && x < xs[i + 1])
        .map(|i| {
            let span = xs[i + 1] - xs[i];
            if span == 0.0 {
                ys[i]
            } else {
                ys[i] + (x - xs[i]) / span * (ys[i + 1] - ys[i])
            }
        })
        .unwrap_or(ys[0])
}

/// API 650 Annex E site coefficient provider.
#[derive(Debug, Clone, Copy)]
pub struct Api650SiteCoefficients<'t> {
    table: &'t SiteCoefficientTable,
}

impl<'t> Api650SiteCoefficients<'t> {
    /// Provider over a specific table
    pub fn new(table: &'t SiteCoefficientTable) -> Self {
        Api650SiteCoefficients { table }
    }
}

impl Default for Api650SiteCoefficients<'static> {
    fn default() -> Self {
        Api650SiteCoefficients::new(SiteCoefficientTable::api650())
    }
}

impl SiteCoefficientProvider for Api650SiteCoefficients<'_> {
    type Site = GroundMotion;

    fn design_spectrum(&self, site: &GroundMotion) -> DesignSpectrum {
        match *site {
            GroundMotion::Mapped { ss, s1, site_class } => {
                let fa = self.table.fa(site_class, ss);
                let fv = self.table.fv(site_class, s1);
                DesignSpectrum {
                    sds: DESIGN_FRACTION * fa * ss,
                    sd1: DESIGN_FRACTION * fv * s1,
                    fa,
                    fv,
                }
            }
            GroundMotion::SingleParameter { sp } => {
                DesignSpectrum::direct(sp, sp / SINGLE_PARAMETER_RATIO)
            }
            GroundMotion::Design { sds, sd1 } => DesignSpectrum::direct(sds, sd1),
        }
    }

    fn code_reference(&self) -> &'static str {
        api_ref::SITE_COEFFICIENTS
    }
}

// ============================================================================
// KDS Regional Spectrum
// ============================================================================

/// Korean seismic zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum KdsZone {
    /// Zone I (S = 0.22)
    #[default]
    I,
    /// Zone II (S = 0.14)
    II,
}

impl KdsZone {
    /// Zone factor S (g)
    pub fn zone_factor(&self) -> f64 {
        match self {
            KdsZone::I => 0.22,
            KdsZone::II => 0.14,
        }
    }
}

/// KDS soil profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SoilProfile {
    /// Hard rock
    SA,
    /// Rock
    SB,
    /// Very dense soil and soft rock
    SC,
    /// Stiff soil
    #[default]
    SD,
    /// Soft soil
    SE,
    /// Site-specific evaluation required; not tabulated
    SF,
}

impl SoilProfile {
    /// Parse from common string representations ("SD", "SD (Stiff Soil)", "d")
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let head = s.split_whitespace().next().unwrap_or("").to_uppercase();
        let code = head.strip_prefix('S').filter(|rest| !rest.is_empty()).unwrap_or(&head);
        match code {
            "A" => Ok(SoilProfile::SA),
            "B" => Ok(SoilProfile::SB),
            "C" => Ok(SoilProfile::SC),
            "D" => Ok(SoilProfile::SD),
            "E" => Ok(SoilProfile::SE),
            "F" => Ok(SoilProfile::SF),
            _ => Err(CalcError::invalid_input("soil_profile", s, "Expected soil profile SA-SF")),
        }
    }
}

/// Site description for the KDS spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct KdsSite {
    /// Seismic zone
    pub zone: KdsZone,
    /// Explicit zone factor S (g), overriding the zone default
    #[serde(default)]
    pub zone_factor: Option<f64>,
    /// Soil profile
    pub soil: SoilProfile,
}

impl KdsSite {
    /// Effective zone factor S (g)
    pub fn effective_zone_factor(&self) -> f64 {
        self.zone_factor.unwrap_or_else(|| self.zone.zone_factor())
    }
}

/// KDS Fa/Fv by soil profile, in two columns: low S and high S.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KdsFactorTable {
    /// Zone factor below which the low-S column applies (g)
    pub low_s_threshold: f64,
    /// Fa as (low S, high S)
    pub fa: HashMap<SoilProfile, (f64, f64)>,
    /// Fv as (low S, high S)
    pub fv: HashMap<SoilProfile, (f64, f64)>,
}

/// KDS 41 17 00 Tables 4.2-1 and 4.2-2 (simplified two-column form)
pub static KDS_FACTORS: Lazy<KdsFactorTable> = Lazy::new(|| KdsFactorTable {
    low_s_threshold: 0.2,
    fa: HashMap::from([
        (SoilProfile::SA, (0.8, 0.8)),
        (SoilProfile::SB, (1.0, 1.0)),
        (SoilProfile::SC, (1.2, 1.2)),
        (SoilProfile::SD, (1.6, 1.5)),
        (SoilProfile::SE, (2.5, 2.0)),
    ]),
    fv: HashMap::from([
        (SoilProfile::SA, (0.8, 0.8)),
        (SoilProfile::SB, (1.0, 1.0)),
        (SoilProfile::SC, (1.7, 1.6)),
        (SoilProfile::SD, (2.4, 2.0)),
        (SoilProfile::SE, (3.5, 3.2)),
    ]),
});

impl KdsFactorTable {
    /// The process-wide default table
    pub fn kds() -> &'static KdsFactorTable {
        &*KDS_FACTORS
    }

    fn pick(&self, column: Option<&(f64, f64)>, s: f64) -> f64 {
        match column {
            Some(&(low, _)) if s < self.low_s_threshold => low,
            Some(&(_, high)) => high,
            None => 1.0,
        }
    }

    /// Fa for a soil profile at zone factor S
    pub fn fa(&self, soil: SoilProfile, s: f64) -> f64 {
        self.pick(self.fa.get(&soil), s)
    }

    /// Fv for a soil profile at zone factor S
    pub fn fv(&self, soil: SoilProfile, s: f64) -> f64 {
        self.pick(self.fv.get(&soil), s)
    }
}

/// KDS regional site coefficient provider.
#[derive(Debug, Clone, Copy)]
pub struct KdsSiteCoefficients<'t> {
    table: &'t KdsFactorTable,
}

impl<'t> KdsSiteCoefficients<'t> {
    /// Provider over a specific table
    pub fn new(table: &'t KdsFactorTable) -> Self {
        KdsSiteCoefficients { table }
    }
}

impl Default for KdsSiteCoefficients<'static> {
    fn default() -> Self {
        KdsSiteCoefficients::new(KdsFactorTable::kds())
    }
}

impl SiteCoefficientProvider for KdsSiteCoefficients<'_> {
    type Site = KdsSite;

    fn design_spectrum(&self, site: &KdsSite) -> DesignSpectrum {
        let s = site.effective_zone_factor();
        let fa = self.table.fa(site.soil, s);
        let fv = self.table.fv(site.soil, s);
        DesignSpectrum {
            sds: DESIGN_FRACTION * s * KDS_AMPLIFICATION * fa,
            sd1: DESIGN_FRACTION * s * fv,
            fa,
            fv,
        }
    }

    fn code_reference(&self) -> &'static str {
        api_ref::KDS_SPECTRUM
    }
}
