//! # Shell Course Sizing
//!
//! Sizes the cylindrical shell of a vertical, flat-bottom storage tank course
//! by course, bottom to top, per API 650 5.6.
//!
//! ## Methods
//!
//! - **One-foot method** (5.6.3): closed form, design point 0.3 m above the
//!   bottom of each course.
//! - **Variable-design-point method** (5.6.4): the bottom course uses the
//!   closed-form 1.06 correction factor; each upper course starts from a
//!   design point 0.61·√(D·t) taken from the course below, then refines it
//!   with the 5.6.4.7 design point, which depends on the ratio of the lower
//!   to the upper thickness, in a bounded fixed-point iteration.
//!
//! `Auto` selection uses the one-foot method up to 61 m diameter.
//!
//! ## Example
//!
//! ```rust
//! use tank_core::calculations::shell::{calculate, CourseInput, ShellDesignInput, TankGeometry};
//! use tank_core::materials::MaterialTable;
//!
//! let input = ShellDesignInput {
//!     geometry: TankGeometry::new(8.0, 6.0),
//!     courses: vec![
//!         CourseInput::new("A 283 C", 3.0),
//!         CourseInput::new("A 283 C", 3.0),
//!     ],
//!     specific_gravity: 0.87,
//!     corrosion_allowance_mm: 1.5,
//!     design_pressure_mmh2o: 76.5,
//!     test_pressure_mmh2o: 76.5,
//!     ..Default::default()
//! };
//!
//! let result = calculate(&input, MaterialTable::api650());
//! assert_eq!(result.courses.len(), 2);
//! assert!(result.passes());
//! println!("Shell weight: {:.0} kg", result.total_mass_kg);
//! ```

use serde::{Deserialize, Serialize};

use super::{api_ref, CheckStatus};
use crate::errors::{CalcError, CalcResult, DesignWarning};
use crate::materials::MaterialTable;
use crate::units::{
    Kilograms, Meters, Millimeters, MillimetersOfWater, Newtons, STEEL_DENSITY_KG_M3,
};

/// Diameter above which `Auto` selects the variable-design-point method (m)
pub const VDM_DIAMETER_THRESHOLD_M: f64 = 61.0;

/// Iteration cap for the design-point refinement of one course
pub const MAX_DESIGN_POINT_ITERATIONS: usize = 10;

/// Convergence tolerance for the design-point refinement (mm)
pub const DESIGN_POINT_TOLERANCE_MM: f64 = 0.01;

/// Allowed mismatch between summed course widths and shell height (m)
pub const HEIGHT_TOLERANCE_M: f64 = 0.01;

/// Used thickness may fall short of required thickness by this much (mm)
const STATUS_TOLERANCE_MM: f64 = 0.01;

/// Half of water's specific weight in the code's mixed units (D in m, H in m, t in mm)
const HOOP_COEFFICIENT: f64 = 4.9;

/// One-foot method design point height above the course bottom (m)
const ONE_FOOT_OFFSET_M: f64 = 0.3;

// ============================================================================
// Geometry and Input
// ============================================================================

/// Overall tank geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TankGeometry {
    /// Nominal tank diameter D (m)
    pub diameter_m: f64,
    /// Shell height H (m)
    pub height_m: f64,
    /// Design liquid level HD (m)
    pub design_liquid_level_m: f64,
    /// Hydrostatic test liquid level HT (m)
    pub test_liquid_level_m: f64,
}

impl TankGeometry {
    /// Geometry with both liquid levels at the top of the shell
    pub fn new(diameter_m: f64, height_m: f64) -> Self {
        TankGeometry {
            diameter_m,
            height_m,
            design_liquid_level_m: height_m,
            test_liquid_level_m: height_m,
        }
    }

    /// Set design and test liquid levels
    pub fn with_liquid_levels(mut self, design_m: f64, test_m: f64) -> Self {
        self.design_liquid_level_m = design_m;
        self.test_liquid_level_m = test_m;
        self
    }

    /// True if a sizing run is meaningful (D > 0, H > 0)
    pub fn is_valid(&self) -> bool {
        self.diameter_m > 0.0 && self.height_m > 0.0
    }
}

impl Default for TankGeometry {
    fn default() -> Self {
        TankGeometry::new(10.0, 10.0)
    }
}

/// Caller's choice of shell design method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DesignMethodSelection {
    /// One-foot method up to 61 m diameter, variable-design-point above
    #[default]
    Auto,
    /// Force the one-foot method
    OneFoot,
    /// Force the variable-design-point method
    VariableDesignPoint,
}

impl DesignMethodSelection {
    /// All selections for UI
    pub const ALL: [DesignMethodSelection; 3] = [
        DesignMethodSelection::Auto,
        DesignMethodSelection::OneFoot,
        DesignMethodSelection::VariableDesignPoint,
    ];

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().replace([' ', '_', '-'], "").as_str() {
            "auto" => Ok(DesignMethodSelection::Auto),
            "1ft" | "onefoot" | "1foot" => Ok(DesignMethodSelection::OneFoot),
            "vdm" | "vdpm" | "variabledesignpoint" => {
                Ok(DesignMethodSelection::VariableDesignPoint)
            }
            _ => Err(CalcError::invalid_input(
                "method",
                s,
                "Expected 'auto', '1ft' or 'vdm'",
            )),
        }
    }

    /// Resolve to a concrete method for the given diameter
    pub fn resolve(self, diameter_m: f64) -> ShellDesignMethod {
        match self {
            DesignMethodSelection::OneFoot => ShellDesignMethod::OneFoot,
            DesignMethodSelection::VariableDesignPoint => ShellDesignMethod::VariableDesignPoint,
            DesignMethodSelection::Auto => {
                if diameter_m <= VDM_DIAMETER_THRESHOLD_M {
                    ShellDesignMethod::OneFoot
                } else {
                    ShellDesignMethod::VariableDesignPoint
                }
            }
        }
    }
}

/// Shell design method actually applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShellDesignMethod {
    /// API 650 5.6.3
    OneFoot,
    /// API 650 5.6.4
    VariableDesignPoint,
}

impl ShellDesignMethod {
    /// Display name for reports
    pub fn display_name(&self) -> &'static str {
        match self {
            ShellDesignMethod::OneFoot => "1-Foot Method",
            ShellDesignMethod::VariableDesignPoint => "Variable Design Point Method (VDM)",
        }
    }

    /// Governing formula, as printed in reports
    pub fn formula(&self) -> &'static str {
        match self {
            ShellDesignMethod::OneFoot => "t_d = (4.9*D*(H-0.3)*G)/(Sd*E) + CA",
            ShellDesignMethod::VariableDesignPoint => {
                "t = VDM Iteration [t_min = (4.9*D*(H-x)*G)/(S*E) + CA]"
            }
        }
    }

    /// Code clause
    pub fn code_ref(&self) -> &'static str {
        match self {
            ShellDesignMethod::OneFoot => api_ref::ONE_FOOT_METHOD,
            ShellDesignMethod::VariableDesignPoint => api_ref::VARIABLE_DESIGN_POINT,
        }
    }
}

/// One shell course as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseInput {
    /// Plate material designation (e.g. "A 516 70")
    pub material: String,
    /// Course width, i.e. vertical extent (m)
    pub width_m: f64,
    /// Thickness actually used (mm); zero means "use the recommended thickness"
    #[serde(default)]
    pub thickness_used_mm: f64,
}

impl CourseInput {
    /// Course with no used thickness specified
    pub fn new(material: impl Into<String>, width_m: f64) -> Self {
        CourseInput {
            material: material.into(),
            width_m,
            thickness_used_mm: 0.0,
        }
    }

    /// Set the used thickness (mm)
    pub fn with_thickness(mut self, thickness_used_mm: f64) -> Self {
        self.thickness_used_mm = thickness_used_mm;
        self
    }
}

/// Input parameters for shell sizing.
///
/// ## JSON Example
///
/// ```json
/// {
///   "geometry": { "diameter_m": 8.0, "height_m": 6.0,
///                 "design_liquid_level_m": 6.0, "test_liquid_level_m": 6.0 },
///   "courses": [
///     { "material": "A 283 C", "width_m": 3.0 },
///     { "material": "A 283 C", "width_m": 3.0 }
///   ],
///   "specific_gravity": 0.87,
///   "corrosion_allowance_mm": 1.5,
///   "design_pressure_mmh2o": 76.5,
///   "test_pressure_mmh2o": 76.5,
///   "joint_efficiency": 1.0,
///   "design_temperature_c": 40.0,
///   "method": "Auto"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShellDesignInput {
    /// Tank geometry
    pub geometry: TankGeometry,
    /// Courses, bottom (index 0) to top
    pub courses: Vec<CourseInput>,
    /// Specific gravity G of the stored liquid
    pub specific_gravity: f64,
    /// Corrosion allowance CA (mm)
    pub corrosion_allowance_mm: f64,
    /// Internal design pressure (mmH2O)
    #[serde(default)]
    pub design_pressure_mmh2o: f64,
    /// Internal test pressure (mmH2O)
    #[serde(default)]
    pub test_pressure_mmh2o: f64,
    /// Joint efficiency E (0 < E ≤ 1)
    pub joint_efficiency: f64,
    /// Design metal temperature for Sd derating (°C)
    pub design_temperature_c: f64,
    /// Design method selection
    #[serde(default)]
    pub method: DesignMethodSelection,
}

impl Default for ShellDesignInput {
    fn default() -> Self {
        ShellDesignInput {
            geometry: TankGeometry::default(),
            courses: Vec::new(),
            specific_gravity: 1.0,
            corrosion_allowance_mm: 0.0,
            design_pressure_mmh2o: 0.0,
            test_pressure_mmh2o: 0.0,
            joint_efficiency: 1.0,
            design_temperature_c: 40.0,
            method: DesignMethodSelection::Auto,
        }
    }
}

impl ShellDesignInput {
    /// Strict validation for input-acquisition layers.
    ///
    /// `calculate` never requires this: it degrades invalid input to warnings.
    pub fn validate(&self) -> CalcResult<()> {
        if self.geometry.diameter_m <= 0.0 {
            return Err(CalcError::invalid_input(
                "diameter_m",
                self.geometry.diameter_m.to_string(),
                "Diameter must be positive",
            ));
        }
        if self.geometry.height_m <= 0.0 {
            return Err(CalcError::invalid_input(
                "height_m",
                self.geometry.height_m.to_string(),
                "Shell height must be positive",
            ));
        }
        if self.specific_gravity <= 0.0 {
            return Err(CalcError::invalid_input(
                "specific_gravity",
                self.specific_gravity.to_string(),
                "Specific gravity must be positive",
            ));
        }
        if self.corrosion_allowance_mm < 0.0 {
            return Err(CalcError::invalid_input(
                "corrosion_allowance_mm",
                self.corrosion_allowance_mm.to_string(),
                "Corrosion allowance cannot be negative",
            ));
        }
        if self.joint_efficiency <= 0.0 || self.joint_efficiency > 1.0 {
            return Err(CalcError::invalid_input(
                "joint_efficiency",
                self.joint_efficiency.to_string(),
                "Joint efficiency must be in (0, 1]",
            ));
        }
        if self.courses.is_empty() {
            return Err(CalcError::missing_field("courses"));
        }
        if let Some((i, course)) = self.courses.iter().enumerate().find(|(_, c)| c.width_m <= 0.0) {
            return Err(CalcError::invalid_input(
                format!("courses[{}].width_m", i),
                course.width_m.to_string(),
                "Course width must be positive",
            ));
        }
        Ok(())
    }

    /// Total design head at the tank bottom: HD plus pressure head (m)
    pub fn design_head_m(&self) -> f64 {
        let pressure =
            MillimetersOfWater(self.design_pressure_mmh2o).liquid_head(self.specific_gravity);
        self.geometry.design_liquid_level_m + pressure.value()
    }

    /// Total test head at the tank bottom: HT plus pressure head in water (m)
    pub fn test_head_m(&self) -> f64 {
        let pressure = MillimetersOfWater(self.test_pressure_mmh2o).liquid_head(1.0);
        self.geometry.test_liquid_level_m + pressure.value()
    }

    /// Sum of course widths (m)
    pub fn total_course_width_m(&self) -> f64 {
        self.courses.iter().map(|c| c.width_m).sum()
    }

    fn effective_joint_efficiency(&self) -> f64 {
        if self.joint_efficiency > 0.0 && self.joint_efficiency <= 1.0 {
            self.joint_efficiency
        } else {
            1.0
        }
    }

    fn effective_specific_gravity(&self) -> f64 {
        if self.specific_gravity > 0.0 {
            self.specific_gravity
        } else {
            1.0
        }
    }
}

// ============================================================================
// Results
// ============================================================================

/// Sizing result for one course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseResult {
    /// Position, 0 = bottom course
    pub index: usize,
    /// Material actually used (fallback name if the requested one was unknown)
    pub material: String,
    /// Allowable design stress at design temperature (MPa)
    pub sd_mpa: f64,
    /// Allowable test stress (MPa)
    pub st_mpa: f64,
    /// Course width (m)
    pub width_m: f64,
    /// Elevation of the course bottom above the tank bottom (m)
    pub bottom_elevation_m: f64,
    /// Design liquid head above the course bottom (m)
    pub head_design_m: f64,
    /// Test liquid head above the course bottom (m)
    pub head_test_m: f64,
    /// Design thickness td (mm)
    pub td_mm: f64,
    /// Hydrostatic test thickness tt (mm)
    pub tt_mm: f64,
    /// Code minimum thickness (mm)
    pub t_min_mm: f64,
    /// Required thickness max(td, tt, t_min) (mm)
    pub t_required_mm: f64,
    /// Recommended thickness, required rounded up to a whole millimetre
    pub t_recommended_mm: f64,
    /// Thickness used (input, or recommended if none given) (mm)
    pub t_used_mm: f64,
    /// Pass/fail of used vs required
    pub status: CheckStatus,
    /// Design-point refinement iterations (zero for closed-form courses)
    pub iterations: usize,
    /// False if the refinement hit its cap
    pub converged: bool,
}

impl CourseResult {
    /// Mass of this course's plates (kg)
    pub fn mass_kg(&self, diameter_m: f64) -> f64 {
        course_mass_kg(diameter_m, self.width_m, self.t_used_mm)
    }
}

/// Method information for the reporting layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShellDesignInfo {
    /// Method applied
    pub method: ShellDesignMethod,
    /// Display name, with Annex S noted for stainless shells
    pub method_name: String,
    /// Governing formula
    pub formula: String,
    /// True if the bottom course material is stainless (Annex S)
    pub is_stainless: bool,
    /// Code clause
    pub code_reference: String,
}

impl ShellDesignInfo {
    fn new(method: ShellDesignMethod, is_stainless: bool) -> Self {
        let mut method_name = method.display_name().to_string();
        let mut code_reference = method.code_ref().to_string();
        if is_stainless {
            method_name.push_str(" (Annex S/X Applied)");
            code_reference = format!("{}, {}", code_reference, api_ref::ANNEX_S);
        }
        ShellDesignInfo {
            method,
            method_name,
            formula: method.formula().to_string(),
            is_stainless,
            code_reference,
        }
    }
}

/// Results from shell sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShellDesignResult {
    /// Method information
    pub info: ShellDesignInfo,
    /// Per-course results, bottom to top
    pub courses: Vec<CourseResult>,
    /// Total shell plate mass (kg)
    pub total_mass_kg: f64,
    /// Total shell plate weight (N)
    pub total_weight_n: f64,
    /// Non-fatal conditions encountered
    pub warnings: Vec<DesignWarning>,
}

impl ShellDesignResult {
    /// Result for a run that could not be performed
    pub fn not_applicable(method: ShellDesignMethod, warning: DesignWarning) -> Self {
        ShellDesignResult {
            info: ShellDesignInfo::new(method, false),
            courses: Vec::new(),
            total_mass_kg: 0.0,
            total_weight_n: 0.0,
            warnings: vec![warning],
        }
    }

    /// True if sizing was actually carried out
    pub fn is_applicable(&self) -> bool {
        !self
            .warnings
            .iter()
            .any(|w| matches!(w, DesignWarning::InvalidGeometry { .. }))
    }

    /// Check if every course passes
    pub fn passes(&self) -> bool {
        self.is_applicable() && self.courses.iter().all(|c| c.status.is_ok())
    }

    /// Bottom course, if any
    pub fn bottom_course(&self) -> Option<&CourseResult> {
        self.courses.first()
    }

    /// Course with the largest required thickness
    pub fn governing_course(&self) -> Option<&CourseResult> {
        self.courses
            .iter()
            .max_by(|a, b| a.t_required_mm.total_cmp(&b.t_required_mm))
    }
}

// ============================================================================
// Thickness Formulas
// ============================================================================

/// Code minimum nominal shell thickness for a tank diameter (mm).
pub fn minimum_thickness_mm(diameter_m: f64) -> f64 {
    if diameter_m >= 60.0 {
        10.0
    } else if diameter_m >= 36.0 {
        8.0
    } else if diameter_m >= 15.0 {
        6.0
    } else {
        5.0
    }
}

/// Membrane thickness 4.9·D·H·G/(S·E) without corrosion allowance (mm).
fn membrane_thickness_mm(
    diameter_m: f64,
    head_m: f64,
    specific_gravity: f64,
    stress_mpa: f64,
    efficiency: f64,
) -> f64 {
    let capacity = stress_mpa * efficiency;
    if capacity <= 0.0 || head_m <= 0.0 {
        return 0.0;
    }
    HOOP_COEFFICIENT * diameter_m * head_m * specific_gravity / capacity
}

/// One-foot method thickness at a course whose bottom sees `head_m` of liquid (mm).
pub fn one_foot_thickness_mm(
    diameter_m: f64,
    head_m: f64,
    specific_gravity: f64,
    stress_mpa: f64,
    efficiency: f64,
    corrosion_allowance_mm: f64,
) -> f64 {
    let design_head = (head_m - ONE_FOOT_OFFSET_M).max(0.0);
    membrane_thickness_mm(diameter_m, design_head, specific_gravity, stress_mpa, efficiency)
        + corrosion_allowance_mm
}

/// Variable-design-point bottom course thickness (mm).
///
/// t1 = [1.06 − (0.0696·D/H)·√(H/S)] · 4.9·H·D·G/(S·E) + CA
pub fn vdm_bottom_thickness_mm(
    diameter_m: f64,
    head_m: f64,
    specific_gravity: f64,
    stress_mpa: f64,
    efficiency: f64,
    corrosion_allowance_mm: f64,
) -> f64 {
    if head_m <= 0.0 || stress_mpa <= 0.0 {
        return corrosion_allowance_mm;
    }
    let factor = 1.06 - (0.0696 * diameter_m / head_m) * (head_m / stress_mpa).sqrt();
    let membrane =
        membrane_thickness_mm(diameter_m, head_m, specific_gravity, stress_mpa, efficiency);
    factor.max(0.0) * membrane + corrosion_allowance_mm
}

/// First estimate of the design point height, x = 0.61·√(D·t) with t from the course below (m).
pub fn design_point_offset_m(diameter_m: f64, thickness_mm: f64) -> f64 {
    let t: Meters = Millimeters(thickness_mm.max(0.0)).into();
    0.61 * (diameter_m.max(0.0) * t.value()).sqrt()
}

/// Design point height above the bottom of an upper course (m), API 650 5.6.4.7.
///
/// With K = tL/tu and C = √K·(K − 1)/(1 + K^1.5), x is the least of
/// x1 = 0.61·√(r·tu) + 320·C·H, x2 = 1000·C·H and x3 = 1.22·√(r·tu),
/// in mm with r in mm and H in m. Thicknesses are net of corrosion allowance.
pub fn design_point_height_m(diameter_m: f64, head_m: f64, lower_mm: f64, upper_mm: f64) -> f64 {
    if upper_mm <= 0.0 || lower_mm <= 0.0 || diameter_m <= 0.0 || head_m <= 0.0 {
        return 0.0;
    }
    let r_mm = diameter_m * 1000.0 / 2.0;
    let k = lower_mm / upper_mm;
    let c = (k.sqrt() * (k - 1.0) / (1.0 + k.powf(1.5))).max(0.0);
    let root = (r_mm * upper_mm).sqrt();

    let x1 = 0.61 * root + 320.0 * c * head_m;
    let x2 = 1000.0 * c * head_m;
    let x3 = 1.22 * root;
    Meters::from(Millimeters(x1.min(x2).min(x3))).value()
}

/// Outcome of the design-point fixed-point refinement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedPoint {
    /// Final (or last) thickness iterate (mm)
    pub thickness_mm: f64,
    /// Iterations performed
    pub iterations: usize,
    /// True if successive iterates came within tolerance
    pub converged: bool,
    /// Change between the last two iterates (mm)
    pub last_change_mm: f64,
}

/// Refine an upper course thickness against the course below.
///
/// Starting from `seed_mm`, locates the design point from the lower course
/// thickness and the latest iterate (both less `allowance_mm`) and
/// recomputes the thickness from the reduced head via `thickness_at`.
/// Stops when the change is below [`DESIGN_POINT_TOLERANCE_MM`] or after
/// [`MAX_DESIGN_POINT_ITERATIONS`]; in the latter case the last iterate is
/// returned with `converged = false`.
pub fn refine_design_point(
    diameter_m: f64,
    head_m: f64,
    lower_mm: f64,
    seed_mm: f64,
    allowance_mm: f64,
    thickness_at: impl Fn(f64) -> f64,
) -> FixedPoint {
    let mut thickness = seed_mm;
    let mut last_change = f64::INFINITY;

    for iteration in 1..=MAX_DESIGN_POINT_ITERATIONS {
        let x = design_point_height_m(
            diameter_m,
            head_m,
            lower_mm - allowance_mm,
            thickness - allowance_mm,
        );
        let next = thickness_at((head_m - x).max(0.0));
        last_change = (next - thickness).abs();
        thickness = next;
        if last_change < DESIGN_POINT_TOLERANCE_MM {
            return FixedPoint {
                thickness_mm: thickness,
                iterations: iteration,
                converged: true,
                last_change_mm: last_change,
            };
        }
    }

    FixedPoint {
        thickness_mm: thickness,
        iterations: MAX_DESIGN_POINT_ITERATIONS,
        converged: false,
        last_change_mm: last_change,
    }
}

/// Mass of one course (kg): π·(D + t)·w·t·ρ, with t in metres.
pub fn course_mass_kg(diameter_m: f64, width_m: f64, thickness_mm: f64) -> f64 {
    let t: Meters = Millimeters(thickness_mm).into();
    std::f64::consts::PI * (diameter_m + t.value()) * width_m * t.value() * STEEL_DENSITY_KG_M3
}

// ============================================================================
// Sizing Pass
// ============================================================================

/// Values carried from one course to the next.
#[derive(Debug, Clone, Copy, Default)]
struct SizingState {
    /// Bottom elevation of the next course (m)
    elevation_m: f64,
    /// Solved design/test thickness of the course below (mm)
    previous: Option<(f64, f64)>,
}

/// Per-run constants shared by every course.
struct SizingContext<'a> {
    input: &'a ShellDesignInput,
    materials: &'a MaterialTable,
    method: ShellDesignMethod,
    design_head_m: f64,
    test_head_m: f64,
    t_min_mm: f64,
}

/// Thicknesses for one load case plus refinement bookkeeping.
struct CaseThickness {
    thickness_mm: f64,
    refinement: Option<FixedPoint>,
}

impl SizingContext<'_> {
    /// Thickness for one load case of one course.
    fn case_thickness(
        &self,
        head_m: f64,
        specific_gravity: f64,
        stress_mpa: f64,
        ca_mm: f64,
        previous_mm: Option<f64>,
    ) -> CaseThickness {
        let d = self.input.geometry.diameter_m;
        let e = self.input.effective_joint_efficiency();

        match (self.method, previous_mm) {
            (ShellDesignMethod::OneFoot, _) => CaseThickness {
                thickness_mm: one_foot_thickness_mm(
                    d,
                    head_m,
                    specific_gravity,
                    stress_mpa,
                    e,
                    ca_mm,
                ),
                refinement: None,
            },
            (ShellDesignMethod::VariableDesignPoint, None) => CaseThickness {
                thickness_mm: vdm_bottom_thickness_mm(
                    d,
                    head_m,
                    specific_gravity,
                    stress_mpa,
                    e,
                    ca_mm,
                ),
                refinement: None,
            },
            (ShellDesignMethod::VariableDesignPoint, Some(previous)) => {
                let thickness_at = |reduced_head: f64| {
                    membrane_thickness_mm(d, reduced_head, specific_gravity, stress_mpa, e) + ca_mm
                };
                // First design point comes from the course below
                let x = design_point_offset_m(d, previous);
                let seed = thickness_at((head_m - x).max(0.0));
                let refined = refine_design_point(d, head_m, previous, seed, ca_mm, thickness_at);
                CaseThickness {
                    thickness_mm: refined.thickness_mm,
                    refinement: Some(refined),
                }
            }
        }
    }

    /// Size one course. Pure in (course, state); returns the next state.
    fn size_course(
        &self,
        index: usize,
        course: &CourseInput,
        state: SizingState,
    ) -> (CourseResult, Vec<DesignWarning>, SizingState) {
        let mut warnings = Vec::new();
        let resolved = self
            .materials
            .resolve(&course.material, self.input.design_temperature_c);
        if resolved.is_fallback {
            warnings.push(DesignWarning::UnknownMaterial {
                course: index,
                requested: course.material.clone(),
                used: resolved.name.clone(),
            });
        }

        let head_design = (self.design_head_m - state.elevation_m).max(0.0);
        let head_test = (self.test_head_m - state.elevation_m).max(0.0);

        let design = self.case_thickness(
            head_design,
            self.input.effective_specific_gravity(),
            resolved.sd_mpa,
            self.input.corrosion_allowance_mm,
            state.previous.map(|(td, _)| td),
        );
        let test = self.case_thickness(
            head_test,
            1.0,
            resolved.st_mpa,
            0.0,
            state.previous.map(|(_, tt)| tt),
        );

        let mut iterations = 0;
        let mut converged = true;
        for refinement in [design.refinement, test.refinement].into_iter().flatten() {
            iterations = iterations.max(refinement.iterations);
            if !refinement.converged {
                converged = false;
                warnings.push(DesignWarning::ConvergenceNotReached {
                    course: index,
                    iterations: refinement.iterations,
                    last_change_mm: refinement.last_change_mm,
                });
            }
        }

        let td = design.thickness_mm;
        let tt = test.thickness_mm;
        let t_required = td.max(tt).max(self.t_min_mm);
        let t_recommended = t_required.ceil();
        let t_used = if course.thickness_used_mm > 0.0 {
            course.thickness_used_mm
        } else {
            t_recommended
        };

        let result = CourseResult {
            index,
            material: resolved.name,
            sd_mpa: resolved.sd_mpa,
            st_mpa: resolved.st_mpa,
            width_m: course.width_m,
            bottom_elevation_m: state.elevation_m,
            head_design_m: head_design,
            head_test_m: head_test,
            td_mm: td,
            tt_mm: tt,
            t_min_mm: self.t_min_mm,
            t_required_mm: t_required,
            t_recommended_mm: t_recommended,
            t_used_mm: t_used,
            status: CheckStatus::from_pass(t_used >= t_required - STATUS_TOLERANCE_MM),
            iterations,
            converged,
        };

        let next = SizingState {
            elevation_m: state.elevation_m + course.width_m,
            previous: Some((td, tt)),
        };

        (result, warnings, next)
    }
}

/// Total shell mass of sized courses (kg).
pub fn shell_mass_kg(diameter_m: f64, courses: &[CourseResult]) -> f64 {
    courses.iter().map(|c| c.mass_kg(diameter_m)).sum()
}

/// Size every course of the shell, bottom to top.
///
/// Never fails. Non-positive diameter or height yields a not-applicable
/// result; unknown materials, width/height mismatch and unconverged
/// design points are reported in `warnings`.
pub fn calculate(input: &ShellDesignInput, materials: &MaterialTable) -> ShellDesignResult {
    let geometry = input.geometry;
    let method = input.method.resolve(geometry.diameter_m);

    if !geometry.is_valid() {
        return ShellDesignResult::not_applicable(
            method,
            DesignWarning::InvalidGeometry {
                diameter_m: geometry.diameter_m,
                height_m: geometry.height_m,
            },
        );
    }

    let mut warnings = Vec::new();
    let total_width = input.total_course_width_m();
    if (total_width - geometry.height_m).abs() > HEIGHT_TOLERANCE_M {
        warnings.push(DesignWarning::GeometryMismatch {
            total_width_m: total_width,
            shell_height_m: geometry.height_m,
        });
    }

    let context = SizingContext {
        input,
        materials,
        method,
        design_head_m: input.design_head_m(),
        test_head_m: input.test_head_m(),
        t_min_mm: minimum_thickness_mm(geometry.diameter_m),
    };

    let (courses, _) = input.courses.iter().enumerate().fold(
        (Vec::with_capacity(input.courses.len()), SizingState::default()),
        |(mut results, state), (index, course)| {
            let (result, course_warnings, next) = context.size_course(index, course, state);
            warnings.extend(course_warnings);
            results.push(result);
            (results, next)
        },
    );

    let is_stainless = input
        .courses
        .first()
        .map(|c| materials.is_stainless(&c.material))
        .unwrap_or(false);

    let total_mass_kg = shell_mass_kg(geometry.diameter_m, &courses);
    let total_weight: Newtons = Kilograms(total_mass_kg).into();

    ShellDesignResult {
        info: ShellDesignInfo::new(method, is_stainless),
        courses,
        total_mass_kg,
        total_weight_n: total_weight.value(),
        warnings,
    }
}
