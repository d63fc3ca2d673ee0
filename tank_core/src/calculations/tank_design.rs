//! # Tank Design Pipeline
//!
//! Runs the full design of one tank: shell sizing, seismic demand and
//! the seismic hoop stress check on every course.
//!
//! ## Example
//!
//! ```rust
//! use tank_core::calculations::shell::{CourseInput, ShellDesignInput, TankGeometry};
//! use tank_core::calculations::site_coefficients::GroundMotion;
//! use tank_core::calculations::tank_design::{
//!     run_default, SiteDefinition, TankDesignInput, TankSeismicInput,
//! };
//!
//! let input = TankDesignInput {
//!     label: "T-101".to_string(),
//!     shell: ShellDesignInput {
//!         geometry: TankGeometry::new(12.0, 9.0),
//!         courses: (0..3).map(|_| CourseInput::new("A 36", 3.0)).collect(),
//!         specific_gravity: 0.85,
//!         corrosion_allowance_mm: 1.5,
//!         ..Default::default()
//!     },
//!     roof_mass_kg: 6_000.0,
//!     seismic: Some(TankSeismicInput::new(SiteDefinition::Api650(GroundMotion::Design {
//!         sds: 0.3,
//!         sd1: 0.1,
//!     }))),
//! };
//!
//! let result = run_default(&input);
//! assert_eq!(result.shell.courses.len(), 3);
//! assert!(result.seismic.is_some());
//! ```

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::hoop_stress::{check_shell_courses, HoopStressCheck, HydrodynamicModel};
use super::seismic::{
    AnchorageType, ResponseFactors, SeismicDemandAnalyzer, SeismicParameters, SeismicResult,
    SeismicTank,
};
use super::shell::{self, ShellDesignInput, ShellDesignResult, TankGeometry};
use super::site_coefficients::{
    Api650SiteCoefficients, GroundMotion, KdsFactorTable, KdsSite, KdsSiteCoefficients,
    SiteCoefficientTable,
};
use crate::errors::DesignWarning;
use crate::materials::MaterialTable;
use crate::units::WATER_DENSITY_KG_M3;

/// Which seismic spectrum applies to the site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SiteDefinition {
    /// API 650 Annex E ground motion
    Api650(GroundMotion),
    /// Korean regional spectrum
    Kds(KdsSite),
}

/// Liquid height used for the seismic mass partition and D/H.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LiquidHeightBasis {
    /// Tank full to the top of shell
    #[default]
    ShellHeight,
    /// Design liquid level HD
    DesignLiquidLevel,
}

impl LiquidHeightBasis {
    /// Liquid height for this basis (m)
    pub fn height_m(self, geometry: &TankGeometry) -> f64 {
        match self {
            LiquidHeightBasis::ShellHeight => geometry.height_m,
            LiquidHeightBasis::DesignLiquidLevel => geometry.design_liquid_level_m,
        }
    }
}

/// Seismic part of a tank design.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TankSeismicInput {
    /// Site and spectrum
    pub site: SiteDefinition,
    /// Importance factor I
    pub importance_factor: f64,
    /// Anchorage type
    #[serde(default)]
    pub anchorage: AnchorageType,
    /// Override of the default response factors
    #[serde(default)]
    pub response: Option<ResponseFactors>,
    /// Hydrodynamic model for the hoop stress check
    #[serde(default)]
    pub hydrodynamic_model: HydrodynamicModel,
    /// Liquid height behind the seismic masses
    #[serde(default)]
    pub liquid_basis: LiquidHeightBasis,
}

impl TankSeismicInput {
    /// Seismic input with I = 1.0, self-anchored, conservative hoop model,
    /// liquid to the top of shell
    pub fn new(site: SiteDefinition) -> Self {
        TankSeismicInput {
            site,
            importance_factor: 1.0,
            anchorage: AnchorageType::SelfAnchored,
            response: None,
            hydrodynamic_model: HydrodynamicModel::ConservativeUniform,
            liquid_basis: LiquidHeightBasis::ShellHeight,
        }
    }
}

/// Full design input for one tank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankDesignInput {
    /// User label (e.g. "T-101")
    #[serde(default)]
    pub label: String,
    /// Shell sizing input
    pub shell: ShellDesignInput,
    /// Roof mass including structure (kg)
    #[serde(default)]
    pub roof_mass_kg: f64,
    /// Seismic design data; None skips the seismic checks
    #[serde(default)]
    pub seismic: Option<TankSeismicInput>,
}

/// Full design result for one tank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankDesignResult {
    /// User label
    pub label: String,
    /// Shell sizing
    pub shell: ShellDesignResult,
    /// Liquid mass on the seismic liquid height basis (kg)
    pub liquid_mass_kg: f64,
    /// Seismic demand, if requested
    pub seismic: Option<SeismicResult>,
    /// Seismic hoop stress per course
    pub hoop_checks: Vec<HoopStressCheck>,
    /// All warnings raised during the run
    pub warnings: Vec<DesignWarning>,
}

impl TankDesignResult {
    /// True when every course, sliding and every hoop check passes and
    /// mechanical anchorage is not required.
    pub fn passes(&self) -> bool {
        let seismic_ok = match &self.seismic {
            Some(seismic) => {
                seismic.is_applicable()
                    && seismic.sliding_status.is_ok()
                    && !seismic.requires_anchors()
            }
            None => true,
        };
        self.shell.passes() && seismic_ok && self.hoop_checks.iter().all(|c| c.status.is_ok())
    }

    /// Hoop check with the highest utilization
    pub fn governing_hoop_check(&self) -> Option<&HoopStressCheck> {
        self.hoop_checks
            .iter()
            .max_by(|a, b| a.utilization().total_cmp(&b.utilization()))
    }
}

/// Liquid mass π·(D/2)²·H·G·ρw (kg).
pub fn liquid_mass_kg(diameter_m: f64, liquid_height_m: f64, specific_gravity: f64) -> f64 {
    let radius = diameter_m.max(0.0) / 2.0;
    let volume = PI * radius * radius * liquid_height_m.max(0.0);
    volume * specific_gravity.max(0.0) * WATER_DENSITY_KG_M3
}

fn analyze_site(
    site: &SiteDefinition,
    tank: &SeismicTank,
    params: &SeismicParameters,
    site_table: &SiteCoefficientTable,
    kds_table: &KdsFactorTable,
) -> SeismicResult {
    match site {
        SiteDefinition::Api650(motion) => {
            let provider = Api650SiteCoefficients::new(site_table);
            SeismicDemandAnalyzer::new(provider).analyze(tank, params, motion)
        }
        SiteDefinition::Kds(kds) => {
            let provider = KdsSiteCoefficients::new(kds_table);
            SeismicDemandAnalyzer::new(provider).analyze(tank, params, kds)
        }
    }
}

/// Run the full design of one tank against the given reference tables.
pub fn run(
    input: &TankDesignInput,
    materials: &MaterialTable,
    site_table: &SiteCoefficientTable,
    kds_table: &KdsFactorTable,
) -> TankDesignResult {
    let shell_input = &input.shell;
    let geometry = shell_input.geometry;
    let shell = shell::calculate(shell_input, materials);
    let liquid_height = input
        .seismic
        .map(|s| s.liquid_basis)
        .unwrap_or_default()
        .height_m(&geometry);
    let liquid_mass =
        liquid_mass_kg(geometry.diameter_m, liquid_height, shell_input.specific_gravity);
    let mut warnings = shell.warnings.clone();

    let (seismic, hoop_checks) = match &input.seismic {
        Some(seismic_input) => {
            let tank = SeismicTank::new(geometry.diameter_m, geometry.height_m, liquid_height);
            let params = SeismicParameters {
                importance_factor: seismic_input.importance_factor,
                anchorage: seismic_input.anchorage,
                response: seismic_input.response,
                shell_mass_kg: shell.total_mass_kg,
                roof_mass_kg: input.roof_mass_kg,
                liquid_mass_kg: liquid_mass,
            };
            let result = analyze_site(&seismic_input.site, &tank, &params, site_table, kds_table);
            let shell_invalid = shell
                .warnings
                .iter()
                .any(|w| matches!(w, DesignWarning::InvalidGeometry { .. }));
            if !result.is_applicable() && !shell_invalid {
                warnings.push(DesignWarning::InvalidGeometry {
                    diameter_m: geometry.diameter_m,
                    height_m: liquid_height,
                });
            }
            let checks = if result.is_applicable() {
                check_shell_courses(
                    &result.spectral,
                    &shell,
                    &geometry,
                    shell_input.specific_gravity,
                    shell_input.joint_efficiency,
                    seismic_input.hydrodynamic_model,
                )
            } else {
                Vec::new()
            };
            (Some(result), checks)
        }
        None => (None, Vec::new()),
    };

    TankDesignResult {
        label: input.label.clone(),
        shell,
        liquid_mass_kg: liquid_mass,
        seismic,
        hoop_checks,
        warnings,
    }
}

/// Run the full design against the built-in API 650 and KDS tables.
pub fn run_default(input: &TankDesignInput) -> TankDesignResult {
    run(
        input,
        MaterialTable::api650(),
        SiteCoefficientTable::api650(),
        KdsFactorTable::kds(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::seismic::{AnchorageClass, J_ANCHORS};
    use crate::calculations::shell::CourseInput;
    use crate::calculations::site_coefficients::{KdsZone, SiteClass, SoilProfile};
    use approx::assert_relative_eq;

    fn tank(seismic: Option<TankSeismicInput>) -> TankDesignInput {
        TankDesignInput {
            label: "T-101".to_string(),
            shell: ShellDesignInput {
                geometry: TankGeometry::new(20.0, 12.0).with_liquid_levels(11.5, 12.0),
                courses: (0..5).map(|_| CourseInput::new("A 516 70", 2.4)).collect(),
                specific_gravity: 0.9,
                corrosion_allowance_mm: 1.5,
                design_pressure_mmh2o: 50.0,
                test_pressure_mmh2o: 50.0,
                ..Default::default()
            },
            roof_mass_kg: 25_000.0,
            seismic,
        }
    }

    fn mapped(ss: f64, s1: f64) -> Option<TankSeismicInput> {
        Some(TankSeismicInput::new(SiteDefinition::Api650(GroundMotion::Mapped {
            ss,
            s1,
            site_class: SiteClass::D,
        })))
    }

    #[test]
    fn test_liquid_mass() {
        let expected = PI * 25.0 * 7.0 * 0.8 * 1000.0;
        assert_relative_eq!(liquid_mass_kg(10.0, 7.0, 0.8), expected, max_relative = 1e-12);
        assert_eq!(liquid_mass_kg(10.0, -1.0, 0.8), 0.0);
    }

    #[test]
    fn test_full_shell_masses_and_vertical_acceleration() {
        // D = 20, H = 12, G = 0.9 with the tank full to the top of shell
        let input = tank(Some(TankSeismicInput::new(SiteDefinition::Api650(GroundMotion::Design {
            sds: 0.3,
            sd1: 0.12,
        }))));
        let result = run_default(&input);
        let seismic = result.seismic.as_ref().unwrap();
        assert_relative_eq!(result.liquid_mass_kg, 3_392_920.066, max_relative = 1e-9);
        assert_relative_eq!(seismic.aspect_ratio, 20.0 / 12.0, max_relative = 1e-12);
        assert_relative_eq!(seismic.impulsive_mass_kg, 2_102_435.252, max_relative = 1e-9);
        assert_relative_eq!(seismic.convective_mass_kg, 1_269_194.826, max_relative = 1e-9);
        assert_relative_eq!(seismic.spectral.av, 0.141, max_relative = 1e-12);
    }

    #[test]
    fn test_design_level_basis() {
        let motion = GroundMotion::Design { sds: 0.3, sd1: 0.12 };
        let mut seismic = TankSeismicInput::new(SiteDefinition::Api650(motion));
        seismic.liquid_basis = LiquidHeightBasis::DesignLiquidLevel;
        let result = run_default(&tank(Some(seismic)));
        let analysis = result.seismic.as_ref().unwrap();
        let expected_mass = PI * 100.0 * 11.5 * 0.9 * 1000.0;
        assert_relative_eq!(result.liquid_mass_kg, expected_mass, max_relative = 1e-12);
        assert_relative_eq!(analysis.aspect_ratio, 20.0 / 11.5, max_relative = 1e-12);
    }

    #[test]
    fn test_shell_only_run() {
        let result = run_default(&tank(None));
        assert_eq!(result.label, "T-101");
        assert!(result.seismic.is_none());
        assert!(result.hoop_checks.is_empty());
        assert!(result.passes());
    }

    #[test]
    fn test_low_seismicity_passes() {
        let input = tank(Some(TankSeismicInput::new(SiteDefinition::Api650(GroundMotion::Design {
            sds: 0.05,
            sd1: 0.02,
        }))));
        let result = run_default(&input);
        let seismic = result.seismic.as_ref().unwrap();
        assert!(seismic.is_applicable());
        assert_eq!(result.hoop_checks.len(), 5);
        assert_eq!(seismic.anchorage_class, Some(AnchorageClass::SelfAnchoredStable));
        assert!(seismic.sliding_status.is_ok());
        assert!(result.passes());
    }

    #[test]
    fn test_seismic_uses_sized_shell_and_liquid_mass() {
        let result = run_default(&tank(mapped(0.5, 0.2)));
        let seismic = result.seismic.as_ref().unwrap();
        let (wi, wc) =
            crate::calculations::seismic::effective_masses(20.0 / 12.0, result.liquid_mass_kg);
        assert_relative_eq!(seismic.impulsive_mass_kg, wi, max_relative = 1e-12);
        assert_relative_eq!(seismic.convective_mass_kg, wc, max_relative = 1e-12);
    }

    #[test]
    fn test_kds_site() {
        let input = tank(Some(TankSeismicInput::new(SiteDefinition::Kds(KdsSite {
            zone: KdsZone::II,
            zone_factor: None,
            soil: SoilProfile::SC,
        }))));
        let result = run_default(&input);
        let seismic = result.seismic.unwrap();
        assert!(seismic.code_reference.contains("KDS"));
        let expected_sds = 2.0 / 3.0 * 0.14 * 2.5 * 1.2;
        assert_relative_eq!(seismic.spectral.sds, expected_sds, max_relative = 1e-12);
    }

    #[test]
    fn test_moderate_site_requires_anchors() {
        let result = run_default(&tank(mapped(0.5, 0.2)));
        let seismic = result.seismic.as_ref().unwrap();
        assert!(seismic.anchorage_ratio > J_ANCHORS);
        assert!(seismic.requires_anchors());
        assert!(result.shell.passes());
        assert!(!result.passes());
    }

    #[test]
    fn test_warnings_aggregated() {
        let mut input = tank(mapped(0.5, 0.2));
        input.shell.courses[0].material = "Unknown".to_string();
        let result = run_default(&input);
        assert_eq!(result.warnings, result.shell.warnings);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_invalid_geometry_skips_seismic_checks() {
        let mut input = tank(mapped(0.5, 0.2));
        input.shell.geometry.diameter_m = -1.0;
        let result = run_default(&input);
        assert!(!result.seismic.as_ref().unwrap().is_applicable());
        assert!(result.hoop_checks.is_empty());
        assert!(!result.passes());
        let invalid = result.warnings.iter().filter(|w| w.code() == "INVALID_GEOMETRY").count();
        assert_eq!(invalid, 1);
    }

    #[test]
    fn test_empty_tank_warns_on_seismic() {
        let mut seismic = mapped(0.5, 0.2);
        if let Some(s) = seismic.as_mut() {
            s.liquid_basis = LiquidHeightBasis::DesignLiquidLevel;
        }
        let mut input = tank(seismic);
        input.shell.geometry.design_liquid_level_m = 0.0;
        let result = run_default(&input);
        assert!(!result.seismic.as_ref().unwrap().is_applicable());
        assert!(result.hoop_checks.is_empty());
        assert!(result.warnings.iter().any(|w| w.code() == "INVALID_GEOMETRY"));
    }

    #[test]
    fn test_input_json_roundtrip() {
        let input = tank(mapped(0.5, 0.2));
        let json = serde_json::to_string(&input).unwrap();
        let roundtrip: TankDesignInput = serde_json::from_str(&json).unwrap();
        assert_eq!(input, roundtrip);
    }
}
