//! # Seismic Demand (API 650 Annex E)
//!
//! Base shear, overturning moments, sloshing wave height, sliding
//! resistance and anchorage ratio for a liquid-filled tank.
//!
//! The liquid is split into an impulsive part that moves with the shell
//! and a convective (sloshing) part. Each part gets its own spectral
//! acceleration; the two responses are combined by SRSS.
//!
//! The analysis is generic over the [`SiteCoefficientProvider`] that
//! turns site data into SDS/SD1, so the API 650 tables and the KDS regional
//! spectrum share one pipeline:
//!
//! ```rust
//! use tank_core::calculations::seismic::{SeismicParameters, SeismicTank, StandardSeismicAnalyzer};
//! use tank_core::calculations::site_coefficients::GroundMotion;
//!
//! let analyzer = StandardSeismicAnalyzer::default();
//! let tank = SeismicTank::new(20.0, 12.0, 11.0);
//! let params = SeismicParameters {
//!     shell_mass_kg: 40_000.0,
//!     roof_mass_kg: 15_000.0,
//!     liquid_mass_kg: 3.0e6,
//!     ..Default::default()
//! };
//! let result = analyzer.analyze(&tank, &params, &GroundMotion::Design { sds: 0.5, sd1: 0.2 });
//! assert!(result.base_shear_kn > 0.0);
//! ```

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::site_coefficients::{
    Api650SiteCoefficients, DesignSpectrum, KdsSiteCoefficients, SiteCoefficientProvider,
};
use super::{api_ref, srss, CheckStatus};
use crate::units::{KiloNewtonMeters, KiloNewtons, Kilograms, NewtonMeters, Newtons};

/// Aspect ratio D/H separating broad from slender tanks
pub const SLENDERNESS_THRESHOLD: f64 = 1.333;

/// Lower bound on the impulsive spectral acceleration (g)
pub const MIN_IMPULSIVE_ACCELERATION: f64 = 0.001;

/// Base friction coefficient for sliding
pub const FRICTION_COEFFICIENT: f64 = 0.4;

/// Anchorage ratio below which a self-anchored tank is stable
pub const J_STABLE: f64 = 0.785;

/// Anchorage ratio above which mechanical anchorage is required
pub const J_ANCHORS: f64 = 1.54;

/// Convective spectrum scaling factor K
const CONVECTIVE_SCALING: f64 = 1.5;

/// Vertical acceleration as a fraction of SDS for sliding and anchorage
const VERTICAL_FRACTION: f64 = 0.47;

/// Roof centroid offset above the top of shell (m)
const ROOF_CENTROID_OFFSET_M: f64 = 0.1;

// ============================================================================
// Input
// ============================================================================

/// Tank dimensions seen by the seismic analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeismicTank {
    /// Nominal diameter D (m)
    pub diameter_m: f64,
    /// Shell height (m), locates the shell and roof centroids
    pub shell_height_m: f64,
    /// Design liquid height H (m), sets D/H and the liquid centroids
    pub liquid_height_m: f64,
}

impl SeismicTank {
    /// Create from diameter, shell height and liquid height
    pub fn new(diameter_m: f64, shell_height_m: f64, liquid_height_m: f64) -> Self {
        SeismicTank {
            diameter_m,
            shell_height_m,
            liquid_height_m,
        }
    }

    /// True if the analysis is meaningful
    pub fn is_valid(&self) -> bool {
        self.diameter_m > 0.0 && self.shell_height_m > 0.0 && self.liquid_height_m > 0.0
    }

    /// Aspect ratio D/H on liquid height
    pub fn aspect_ratio(&self) -> f64 {
        self.diameter_m / self.liquid_height_m
    }
}

/// How the tank is held down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnchorageType {
    /// Resists overturning by shell and bottom plate weight
    #[default]
    SelfAnchored,
    /// Anchor bolts or straps
    MechanicallyAnchored,
}

impl AnchorageType {
    /// Default response modification factors (Table E-4)
    pub fn response_factors(&self) -> ResponseFactors {
        match self {
            AnchorageType::SelfAnchored => ResponseFactors { rwi: 3.5, rwc: 1.5 },
            AnchorageType::MechanicallyAnchored => ResponseFactors { rwi: 4.0, rwc: 2.0 },
        }
    }
}

/// Response modification factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResponseFactors {
    /// Impulsive Rwi
    pub rwi: f64,
    /// Convective Rwc
    pub rwc: f64,
}

/// Load and importance data for the seismic analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeismicParameters {
    /// Importance factor I
    pub importance_factor: f64,
    /// Anchorage type
    #[serde(default)]
    pub anchorage: AnchorageType,
    /// Override of the anchorage type's response factors
    #[serde(default)]
    pub response: Option<ResponseFactors>,
    /// Shell mass Ws (kg)
    pub shell_mass_kg: f64,
    /// Roof mass Wr (kg)
    pub roof_mass_kg: f64,
    /// Contained liquid mass (kg)
    pub liquid_mass_kg: f64,
}

impl Default for SeismicParameters {
    fn default() -> Self {
        SeismicParameters {
            importance_factor: 1.0,
            anchorage: AnchorageType::SelfAnchored,
            response: None,
            shell_mass_kg: 0.0,
            roof_mass_kg: 0.0,
            liquid_mass_kg: 0.0,
        }
    }
}

impl SeismicParameters {
    /// Response factors in effect; non-positive overrides fall back to the defaults
    pub fn response_factors(&self) -> ResponseFactors {
        let defaults = self.anchorage.response_factors();
        match self.response {
            Some(r) if r.rwi > 0.0 && r.rwc > 0.0 => r,
            _ => defaults,
        }
    }
}

// ============================================================================
// Result
// ============================================================================

/// Spectral accelerations used by the analysis (g).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpectralAccelerations {
    /// Impulsive Ai
    pub ai: f64,
    /// Convective Ac
    pub ac: f64,
    /// Design short-period SDS
    pub sds: f64,
    /// Design 1-second SD1
    pub sd1: f64,
    /// Vertical Av = 0.47·SDS
    pub av: f64,
}

/// Anchorage classification from the ratio J.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnchorageClass {
    /// J < 0.785: no uplift, self-anchored tank is stable
    SelfAnchoredStable,
    /// 0.785 ≤ J ≤ 1.54: uplift, stable if annular plate checks pass
    AnnularPlateRequired,
    /// J > 1.54: mechanical anchorage required
    AnchorsRequired,
}

impl AnchorageClass {
    /// Classify an anchorage ratio
    pub fn classify(j: f64) -> Self {
        if j < J_STABLE {
            AnchorageClass::SelfAnchoredStable
        } else if j <= J_ANCHORS {
            AnchorageClass::AnnularPlateRequired
        } else {
            AnchorageClass::AnchorsRequired
        }
    }

    /// Status text for reports
    pub fn label(&self) -> &'static str {
        match self {
            AnchorageClass::SelfAnchoredStable => "Self-Anchored (Stable)",
            AnchorageClass::AnnularPlateRequired => "Self-Anchored (J > 0.785)",
            AnchorageClass::AnchorsRequired => "Anchors Required (J > 1.54)",
        }
    }

    /// Annular plate check text for reports
    pub fn annular_check(&self) -> &'static str {
        match self {
            AnchorageClass::SelfAnchoredStable => "Not Required",
            AnchorageClass::AnnularPlateRequired => "Required (See Table E-6)",
            AnchorageClass::AnchorsRequired => "Required",
        }
    }
}

/// Results of the seismic demand analysis.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeismicResult {
    /// Source of the design spectrum
    pub code_reference: String,
    /// Spectral accelerations
    pub spectral: SpectralAccelerations,
    /// Site coefficients applied
    pub fa: f64,
    /// Site coefficients applied
    pub fv: f64,
    /// Aspect ratio D/H
    pub aspect_ratio: f64,
    /// Convective period Tc (s)
    pub convective_period_s: f64,

    /// Effective impulsive liquid mass Wi (kg)
    pub impulsive_mass_kg: f64,
    /// Effective convective liquid mass Wc (kg)
    pub convective_mass_kg: f64,

    /// Impulsive centroid height for ringwall moment (m)
    pub xi_m: f64,
    /// Convective centroid height for ringwall moment (m)
    pub xc_m: f64,
    /// Impulsive centroid height for slab moment (m)
    pub xis_m: f64,
    /// Convective centroid height for slab moment (m)
    pub xcs_m: f64,
    /// Shell centroid height (m)
    pub xs_m: f64,
    /// Roof centroid height (m)
    pub xr_m: f64,

    /// Impulsive base shear Vi (kN)
    pub impulsive_shear_kn: f64,
    /// Convective base shear Vc (kN)
    pub convective_shear_kn: f64,
    /// SRSS base shear V (kN)
    pub base_shear_kn: f64,
    /// Ringwall overturning moment Mrw (kN·m)
    pub ringwall_moment_knm: f64,
    /// Slab overturning moment Ms (kN·m)
    pub slab_moment_knm: f64,

    /// Sloshing wave height d_max (m)
    pub sloshing_height_m: f64,

    /// Friction resistance to sliding (kN)
    pub sliding_resistance_kn: f64,
    /// V ≤ resistance
    pub sliding_status: CheckStatus,

    /// Anchorage ratio J
    pub anchorage_ratio: f64,
    /// Classification of J; None when not applicable
    pub anchorage_class: Option<AnchorageClass>,
    /// Design uplift on the anchorage, 4·Mrw/D (kN)
    pub uplift_kn: f64,
}

impl SeismicResult {
    /// All-zero result for degenerate geometry
    pub fn not_applicable() -> Self {
        SeismicResult {
            sliding_status: CheckStatus::NotApplicable,
            anchorage_class: None,
            ..Default::default()
        }
    }

    /// True if the analysis was carried out
    pub fn is_applicable(&self) -> bool {
        self.anchorage_class.is_some()
    }

    /// True if J calls for anchor bolts
    pub fn requires_anchors(&self) -> bool {
        matches!(self.anchorage_class, Some(AnchorageClass::AnchorsRequired))
    }
}

// ============================================================================
// Analysis
// ============================================================================

/// Effective impulsive and convective liquid masses (kg).
pub fn effective_masses(aspect_ratio: f64, liquid_mass_kg: f64) -> (f64, f64) {
    let r = aspect_ratio;
    let impulsive = if r >= SLENDERNESS_THRESHOLD {
        let arg = 0.866 * r;
        arg.tanh() / arg * liquid_mass_kg
    } else {
        (1.0 - 0.218 * r) * liquid_mass_kg
    };
    let convective = 0.230 * r * (3.67 / r).tanh() * liquid_mass_kg;
    (impulsive, convective)
}

/// Convective (first sloshing mode) period Tc (s).
pub fn convective_period_s(diameter_m: f64, aspect_ratio: f64) -> f64 {
    let ks = 0.576 / (3.67 / aspect_ratio).tanh().sqrt();
    1.8 * ks * diameter_m.sqrt()
}

/// Liquid centroid heights (Xi, Xc, Xis, Xcs) for liquid height H (m).
pub fn liquid_centroids(aspect_ratio: f64, liquid_height_m: f64) -> (f64, f64, f64, f64) {
    let r = aspect_ratio;
    let h = liquid_height_m;
    let (xi, xis) = if r >= SLENDERNESS_THRESHOLD {
        (0.375 * h, 0.375 * h)
    } else {
        ((0.5 - 0.094 * r) * h, (0.5 + 0.06 * r) * h)
    };
    // Overflow-free forms of (cosh a − 1)/(a·sinh a) and (cosh a − 1.937)/(a·sinh a)
    let arg = 3.67 / r;
    let xc = (1.0 - (arg / 2.0).tanh() / arg) * h;
    let xcs = (1.0 - (1.0 / arg.tanh() - 1.937 / arg.sinh()) / arg) * h;
    (xi, xc, xis, xcs)
}

/// Run the analysis for a known design spectrum.
pub fn analyze_spectrum(
    tank: &SeismicTank,
    params: &SeismicParameters,
    spectrum: &DesignSpectrum,
    code_reference: &str,
) -> SeismicResult {
    if !tank.is_valid() {
        return SeismicResult::not_applicable();
    }

    let d = tank.diameter_m;
    let r = tank.aspect_ratio();
    let importance = params.importance_factor;
    let response = params.response_factors();

    // Mass partition
    let (wi_kg, wc_kg) = effective_masses(r, params.liquid_mass_kg);

    // Spectral accelerations
    let ai = (spectrum.sds * importance / response.rwi).max(MIN_IMPULSIVE_ACCELERATION);
    let av = VERTICAL_FRACTION * spectrum.sds;
    let tc = convective_period_s(d, r);
    let ac = if tc > 0.0 {
        CONVECTIVE_SCALING * (spectrum.sd1 / tc) * (importance / response.rwc)
    } else {
        ai
    };

    let ws = Newtons::from(Kilograms(params.shell_mass_kg)).value();
    let wr = Newtons::from(Kilograms(params.roof_mass_kg)).value();
    let wi = Newtons::from(Kilograms(wi_kg)).value();
    let wc = Newtons::from(Kilograms(wc_kg)).value();
    let w_liquid = Newtons::from(Kilograms(params.liquid_mass_kg)).value();

    // Base shear
    let vi = ai * (ws + wr + wi);
    let vc = ac * wc;
    let v = srss(&[vi, vc]);

    // Overturning
    let xs = tank.shell_height_m / 2.0;
    let xr = tank.shell_height_m + ROOF_CENTROID_OFFSET_M;
    let (xi, xc, xis, xcs) = liquid_centroids(r, tank.liquid_height_m);

    let mrw = NewtonMeters(srss(&[ai * (wi * xi + ws * xs + wr * xr), ac * wc * xc]));
    let ms = NewtonMeters(srss(&[ai * (wi * xis + ws * xs + wr * xr), ac * wc * xcs]));

    // Sliding
    let v_resist = FRICTION_COEFFICIENT * (ws + wr + w_liquid) * (1.0 - 0.4 * av);

    // Anchorage ratio
    let wt = ws / (PI * d);
    let wa = wr / (PI * d);
    let denominator = d * d * (wt * (1.0 - 0.4 * av) + wa);
    let j = if denominator > 0.0 { mrw.value() / denominator } else { 0.0 };

    let mrw_knm = KiloNewtonMeters::from(mrw).value();

    SeismicResult {
        code_reference: code_reference.to_string(),
        spectral: SpectralAccelerations {
            ai,
            ac,
            sds: spectrum.sds,
            sd1: spectrum.sd1,
            av,
        },
        fa: spectrum.fa,
        fv: spectrum.fv,
        aspect_ratio: r,
        convective_period_s: tc,
        impulsive_mass_kg: wi_kg,
        convective_mass_kg: wc_kg,
        xi_m: xi,
        xc_m: xc,
        xis_m: xis,
        xcs_m: xcs,
        xs_m: xs,
        xr_m: xr,
        impulsive_shear_kn: KiloNewtons::from(Newtons(vi)).value(),
        convective_shear_kn: KiloNewtons::from(Newtons(vc)).value(),
        base_shear_kn: KiloNewtons::from(Newtons(v)).value(),
        ringwall_moment_knm: mrw_knm,
        slab_moment_knm: KiloNewtonMeters::from(ms).value(),
        sloshing_height_m: 0.5 * d * ac,
        sliding_resistance_kn: KiloNewtons::from(Newtons(v_resist)).value(),
        sliding_status: CheckStatus::from_pass(v <= v_resist),
        anchorage_ratio: j,
        anchorage_class: Some(AnchorageClass::classify(j)),
        uplift_kn: 4.0 * mrw_knm / d,
    }
}

/// Seismic demand analysis over a site coefficient provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeismicDemandAnalyzer<P: SiteCoefficientProvider> {
    provider: P,
}

/// Analysis using API 650 Tables E-1/E-2
pub type StandardSeismicAnalyzer<'t> = SeismicDemandAnalyzer<Api650SiteCoefficients<'t>>;

/// Analysis using the KDS regional spectrum
pub type KdsSeismicAnalyzer<'t> = SeismicDemandAnalyzer<KdsSiteCoefficients<'t>>;

impl<P: SiteCoefficientProvider> SeismicDemandAnalyzer<P> {
    /// Create an analyzer over a provider
    pub fn new(provider: P) -> Self {
        SeismicDemandAnalyzer { provider }
    }

    /// The site coefficient provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Analyze a tank at a site.
    ///
    /// Never fails. Degenerate geometry gives [`SeismicResult::not_applicable`].
    pub fn analyze(
        &self,
        tank: &SeismicTank,
        params: &SeismicParameters,
        site: &P::Site,
    ) -> SeismicResult {
        let spectrum = self.provider.design_spectrum(site);
        let reference = format!("{}, {}", api_ref::BASE_SHEAR, self.provider.code_reference());
        analyze_spectrum(tank, params, &spectrum, &reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::site_coefficients::{GroundMotion, KdsSite, KdsZone, SoilProfile};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn broad_tank() -> (SeismicTank, SeismicParameters) {
        let tank = SeismicTank::new(30.0, 15.0, 14.0);
        let liquid = PI * 15.0 * 15.0 * 14.0 * 0.9 * 1000.0;
        let params = SeismicParameters {
            shell_mass_kg: 120_000.0,
            roof_mass_kg: 40_000.0,
            liquid_mass_kg: liquid,
            ..Default::default()
        };
        (tank, params)
    }

    fn design(sds: f64, sd1: f64) -> GroundMotion {
        GroundMotion::Design { sds, sd1 }
    }

    #[test]
    fn test_anchorage_classification() {
        assert_eq!(AnchorageClass::classify(0.5), AnchorageClass::SelfAnchoredStable);
        assert_eq!(AnchorageClass::classify(1.0), AnchorageClass::AnnularPlateRequired);
        assert_eq!(AnchorageClass::classify(2.0), AnchorageClass::AnchorsRequired);
        assert_eq!(AnchorageClass::classify(J_STABLE), AnchorageClass::AnnularPlateRequired);
        assert_eq!(AnchorageClass::classify(J_ANCHORS), AnchorageClass::AnnularPlateRequired);
    }

    #[test]
    fn test_base_shear_combination_bounds() {
        let (tank, params) = broad_tank();
        let result = StandardSeismicAnalyzer::default().analyze(&tank, &params, &design(0.6, 0.3));
        let vi = result.impulsive_shear_kn;
        let vc = result.convective_shear_kn;
        assert!(result.base_shear_kn <= vi + vc + 1e-9);
        assert!(result.base_shear_kn >= vi.max(vc));
        assert_relative_eq!(result.base_shear_kn, (vi * vi + vc * vc).sqrt(), max_relative = 1e-12);
    }

    #[test]
    fn test_broad_tank_centroids() {
        let (tank, params) = broad_tank();
        let result = StandardSeismicAnalyzer::default().analyze(&tank, &params, &design(0.6, 0.3));
        assert!(result.aspect_ratio >= SLENDERNESS_THRESHOLD);
        assert_abs_diff_eq!(result.xi_m, 0.375 * 14.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.xis_m, 0.375 * 14.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.xs_m, 7.5, epsilon = 1e-12);
        assert_abs_diff_eq!(result.xr_m, 15.1, epsilon = 1e-12);
        assert!(result.slab_moment_knm > result.ringwall_moment_knm);
    }

    #[test]
    fn test_slender_tank_centroids() {
        let (xi, _, xis, _) = liquid_centroids(1.0, 20.0);
        assert_abs_diff_eq!(xi, (0.5 - 0.094) * 20.0, epsilon = 1e-12);
        assert_abs_diff_eq!(xis, (0.5 + 0.06) * 20.0, epsilon = 1e-12);

        let (wi, wc) = effective_masses(1.0, 1000.0);
        assert_abs_diff_eq!(wi, 782.0, epsilon = 1e-9);
        assert!(wc > 0.0 && wc < 1000.0);
    }

    #[test]
    fn test_spectral_accelerations() {
        let (tank, params) = broad_tank();
        let result = StandardSeismicAnalyzer::default().analyze(&tank, &params, &design(0.7, 0.35));
        assert_abs_diff_eq!(result.spectral.ai, 0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(result.spectral.av, 0.47 * 0.7, epsilon = 1e-12);

        let tc = convective_period_s(30.0, 30.0 / 14.0);
        assert_abs_diff_eq!(result.convective_period_s, tc, epsilon = 1e-12);
        assert_abs_diff_eq!(result.spectral.ac, 1.5 * 0.35 / tc / 1.5, epsilon = 1e-12);
        let expected_slosh = 0.5 * 30.0 * result.spectral.ac;
        assert_abs_diff_eq!(result.sloshing_height_m, expected_slosh, epsilon = 1e-12);
    }

    #[test]
    fn test_impulsive_acceleration_floor() {
        let (tank, params) = broad_tank();
        let result = StandardSeismicAnalyzer::default().analyze(&tank, &params, &design(0.0, 0.0));
        assert_eq!(result.spectral.ai, MIN_IMPULSIVE_ACCELERATION);
        assert_eq!(result.spectral.ac, 0.0);
        assert!(result.base_shear_kn > 0.0);
    }

    #[test]
    fn test_mechanical_anchorage_reduces_demand() {
        let (tank, params) = broad_tank();
        let anchored = SeismicParameters {
            anchorage: AnchorageType::MechanicallyAnchored,
            ..params
        };
        let analyzer = StandardSeismicAnalyzer::default();
        let self_anchored = analyzer.analyze(&tank, &params, &design(0.6, 0.3));
        let bolted = analyzer.analyze(&tank, &anchored, &design(0.6, 0.3));
        assert!(bolted.base_shear_kn < self_anchored.base_shear_kn);
        assert_abs_diff_eq!(bolted.spectral.ai, 0.15, epsilon = 1e-12);
    }

    #[test]
    fn test_response_override() {
        let params = SeismicParameters {
            response: Some(ResponseFactors { rwi: 2.0, rwc: 1.0 }),
            ..Default::default()
        };
        assert_eq!(params.response_factors().rwi, 2.0);

        let bad = SeismicParameters {
            response: Some(ResponseFactors { rwi: 0.0, rwc: 1.0 }),
            ..Default::default()
        };
        assert_eq!(bad.response_factors().rwi, 3.5);
    }

    #[test]
    fn test_uplift_and_sliding() {
        let (tank, params) = broad_tank();
        let result = StandardSeismicAnalyzer::default().analyze(&tank, &params, &design(0.6, 0.3));
        let expected_uplift = 4.0 * result.ringwall_moment_knm / 30.0;
        assert_abs_diff_eq!(result.uplift_kn, expected_uplift, epsilon = 1e-9);
        assert!(result.sliding_resistance_kn > 0.0);
        assert_eq!(
            result.sliding_status,
            CheckStatus::from_pass(result.base_shear_kn <= result.sliding_resistance_kn)
        );
    }

    #[test]
    fn test_massless_shell_gives_zero_ratio() {
        let (tank, params) = broad_tank();
        let params = SeismicParameters {
            shell_mass_kg: 0.0,
            roof_mass_kg: 0.0,
            ..params
        };
        let result = StandardSeismicAnalyzer::default().analyze(&tank, &params, &design(0.6, 0.3));
        assert_eq!(result.anchorage_ratio, 0.0);
        assert_eq!(result.anchorage_class, Some(AnchorageClass::SelfAnchoredStable));
    }

    #[test]
    fn test_degenerate_geometry_not_applicable() {
        let (_, params) = broad_tank();
        let analyzer = StandardSeismicAnalyzer::default();
        for tank in [
            SeismicTank::new(0.0, 10.0, 9.0),
            SeismicTank::new(10.0, 0.0, 9.0),
            SeismicTank::new(10.0, 10.0, 0.0),
        ] {
            let result = analyzer.analyze(&tank, &params, &design(0.6, 0.3));
            assert!(!result.is_applicable());
            assert_eq!(result.base_shear_kn, 0.0);
            assert_eq!(result.sliding_status, CheckStatus::NotApplicable);
        }
    }

    #[test]
    fn test_kds_analyzer_uses_regional_spectrum() {
        let (tank, params) = broad_tank();
        let site = KdsSite {
            zone: KdsZone::I,
            zone_factor: None,
            soil: SoilProfile::SD,
        };
        let result = KdsSeismicAnalyzer::default().analyze(&tank, &params, &site);
        assert_abs_diff_eq!(result.spectral.sds, 2.0 / 3.0 * 0.22 * 2.5 * 1.5, epsilon = 1e-12);
        assert!(result.code_reference.contains("KDS"));
    }

    #[test]
    fn test_slender_tank_stays_finite() {
        // 3.67/R is far beyond the range of cosh and sinh here
        let tank = SeismicTank::new(0.05, 10.0, 10.0);
        let params = SeismicParameters {
            shell_mass_kg: 100.0,
            liquid_mass_kg: PI * 0.025 * 0.025 * 10.0 * 1000.0,
            ..Default::default()
        };
        let result = analyze_spectrum(&tank, &params, &DesignSpectrum::direct(0.6, 0.3), "E.6");
        for value in [
            result.xc_m,
            result.xcs_m,
            result.ringwall_moment_knm,
            result.slab_moment_knm,
            result.anchorage_ratio,
        ] {
            assert!(value.is_finite());
        }
        let arg = 3.67 / 0.005;
        assert_relative_eq!(result.xc_m, (1.0 - 1.0 / arg) * 10.0, max_relative = 1e-12);
        assert_relative_eq!(result.xcs_m, result.xc_m, max_relative = 1e-12);
        assert_eq!(result.anchorage_class, Some(AnchorageClass::classify(result.anchorage_ratio)));
    }

    #[test]
    fn test_centroids_match_hyperbolic_form() {
        let (_, xc, _, xcs) = liquid_centroids(30.0 / 14.0, 14.0);
        let arg: f64 = 3.67 / (30.0 / 14.0);
        let (cosh, sinh) = (arg.cosh(), arg.sinh());
        let expected_xc = (1.0 - (cosh - 1.0) / (arg * sinh)) * 14.0;
        let expected_xcs = (1.0 - (cosh - 1.937) / (arg * sinh)) * 14.0;
        assert_relative_eq!(xc, expected_xc, max_relative = 1e-12);
        assert_relative_eq!(xcs, expected_xcs, max_relative = 1e-12);
    }

    #[test]
    fn test_all_fields_finite() {
        let tank = SeismicTank::new(0.5, 0.2, 0.01);
        let params = SeismicParameters {
            liquid_mass_kg: 1.0,
            ..Default::default()
        };
        let result = StandardSeismicAnalyzer::default().analyze(&tank, &params, &design(1.5, 0.6));
        // Non-finite floats serialize as null
        let json = serde_json::to_value(&result).unwrap();
        for (field, value) in json.as_object().unwrap() {
            assert!(!value.is_null(), "{} is not finite", field);
        }
    }
}
