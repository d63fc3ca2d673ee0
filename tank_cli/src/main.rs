//! # Tankcalc CLI Application
//!
//! Command-line front end for the tank design engine. Builds a tank design
//! from arguments, runs the full pipeline and prints a summary followed by
//! the JSON result.
//!
//! ```text
//! tank_cli --diameter 20 --height 12 --courses 5 --material "A 516 70" --sg 0.9 \
//!          --ss 0.5 --s1 0.2 --site-class D
//! ```

use std::process::ExitCode;

use clap::Parser;

use tank_core::calculations::hoop_stress::HydrodynamicModel;
use tank_core::calculations::seismic::AnchorageType;
use tank_core::calculations::shell::{DesignMethodSelection, TankGeometry};
use tank_core::calculations::site_coefficients::{
    GroundMotion, KdsSite, KdsZone, SiteClass, SoilProfile,
};
use tank_core::calculations::tank_design::{
    self, LiquidHeightBasis, SiteDefinition, TankDesignInput, TankDesignResult, TankSeismicInput,
};
use tank_core::{CalcError, CalcResult, DesignSettings};

#[derive(Parser, Debug)]
#[command(name = "tank_cli", version, about = "API 650 storage tank shell and seismic design")]
struct Args {
    /// Tank label
    #[arg(long, default_value = "T-1")]
    label: String,

    /// Nominal diameter (m)
    #[arg(long, default_value_t = 8.0)]
    diameter: f64,

    /// Shell height (m)
    #[arg(long, default_value_t = 6.0)]
    height: f64,

    /// Design liquid level (m); defaults to the shell height
    #[arg(long)]
    liquid_level: Option<f64>,

    /// Number of equal-width courses
    #[arg(long, default_value_t = 2)]
    courses: usize,

    /// Shell plate material
    #[arg(long, default_value = "A 283 C")]
    material: String,

    /// Specific gravity of the stored liquid
    #[arg(long, default_value_t = 0.87)]
    sg: f64,

    /// Corrosion allowance (mm)
    #[arg(long, default_value_t = 1.5)]
    ca: f64,

    /// Internal design and test pressure (mmH2O)
    #[arg(long, default_value_t = 76.5)]
    pressure: f64,

    /// Joint efficiency
    #[arg(long, default_value_t = 1.0)]
    joint_efficiency: f64,

    /// Design metal temperature (°C)
    #[arg(long, default_value_t = 40.0)]
    temperature: f64,

    /// Shell design method: auto, 1ft or vdm
    #[arg(long, default_value = "auto")]
    method: String,

    /// Roof mass (kg)
    #[arg(long, default_value_t = 0.0)]
    roof_mass: f64,

    /// Mapped short-period acceleration Ss (g)
    #[arg(long, requires = "s1")]
    ss: Option<f64>,

    /// Mapped 1-second acceleration S1 (g)
    #[arg(long, requires = "ss")]
    s1: Option<f64>,

    /// Site class A-F for mapped accelerations
    #[arg(long, default_value = "D")]
    site_class: String,

    /// Single peak design parameter Sp (g)
    #[arg(long)]
    sp: Option<f64>,

    /// Design short-period acceleration SDS (g)
    #[arg(long, requires = "sd1")]
    sds: Option<f64>,

    /// Design 1-second acceleration SD1 (g)
    #[arg(long, requires = "sds")]
    sd1: Option<f64>,

    /// KDS seismic zone (1 or 2); selects the KDS spectrum
    #[arg(long)]
    kds_zone: Option<u8>,

    /// KDS soil profile SA-SF
    #[arg(long, default_value = "SD")]
    kds_soil: String,

    /// Seismic importance factor
    #[arg(long, default_value_t = 1.0)]
    importance: f64,

    /// Mechanically anchored tank
    #[arg(long)]
    anchored: bool,

    /// Use the Annex E hydrodynamic distribution for hoop stress
    #[arg(long)]
    code_distribution: bool,

    /// Seismic liquid mass at the design liquid level instead of a full shell
    #[arg(long)]
    seismic_design_level: bool,

    /// Print only the JSON result
    #[arg(long)]
    json: bool,
}

impl Args {
    fn site(&self) -> CalcResult<Option<SiteDefinition>> {
        if let Some(zone) = self.kds_zone {
            let zone = match zone {
                1 => KdsZone::I,
                2 => KdsZone::II,
                other => {
                    return Err(CalcError::invalid_input(
                        "kds_zone",
                        other.to_string(),
                        "Expected 1 or 2",
                    ));
                }
            };
            let soil = SoilProfile::from_str_flexible(&self.kds_soil)?;
            return Ok(Some(SiteDefinition::Kds(KdsSite {
                zone,
                zone_factor: None,
                soil,
            })));
        }

        let motion = match (self.ss, self.s1, self.sp, self.sds, self.sd1) {
            (Some(ss), Some(s1), _, _, _) => Some(GroundMotion::Mapped {
                ss,
                s1,
                site_class: SiteClass::from_str_flexible(&self.site_class)?,
            }),
            (_, _, Some(sp), _, _) => Some(GroundMotion::SingleParameter { sp }),
            (_, _, _, Some(sds), Some(sd1)) => Some(GroundMotion::Design { sds, sd1 }),
            _ => None,
        };
        Ok(motion.map(SiteDefinition::Api650))
    }

    fn to_input(&self) -> CalcResult<TankDesignInput> {
        if self.courses == 0 {
            return Err(CalcError::invalid_input("courses", "0", "At least one course is required"));
        }

        let settings = DesignSettings {
            default_material: self.material.clone(),
            corrosion_allowance_mm: self.ca,
            design_temperature_c: self.temperature,
            method: DesignMethodSelection::from_str_flexible(&self.method)?,
            hydrodynamic_model: if self.code_distribution {
                HydrodynamicModel::CodeDistribution
            } else {
                HydrodynamicModel::ConservativeUniform
            },
            ..Default::default()
        };

        let liquid_level = self.liquid_level.unwrap_or(self.height);
        let geometry = TankGeometry::new(self.diameter, self.height)
            .with_liquid_levels(liquid_level, liquid_level);
        let widths = vec![self.height / self.courses as f64; self.courses];

        let mut input = settings.new_design(self.label.clone(), geometry, &widths, self.sg);
        input.shell.design_pressure_mmh2o = self.pressure;
        input.shell.test_pressure_mmh2o = self.pressure;
        input.shell.joint_efficiency = self.joint_efficiency;
        input.roof_mass_kg = self.roof_mass;
        input.seismic = self.site()?.map(|site| TankSeismicInput {
            importance_factor: self.importance,
            anchorage: if self.anchored {
                AnchorageType::MechanicallyAnchored
            } else {
                AnchorageType::SelfAnchored
            },
            liquid_basis: if self.seismic_design_level {
                LiquidHeightBasis::DesignLiquidLevel
            } else {
                LiquidHeightBasis::ShellHeight
            },
            ..settings.seismic_input(site)
        });

        input.shell.validate()?;
        Ok(input)
    }
}

fn status_icon(pass: bool) -> &'static str {
    if pass {
        "[OK]"
    } else {
        "[FAIL]"
    }
}

fn print_summary(input: &TankDesignInput, result: &TankDesignResult) {
    let geometry = &input.shell.geometry;

    println!("═══════════════════════════════════════");
    println!("  TANK {} SHELL DESIGN", result.label);
    println!("═══════════════════════════════════════");
    println!();
    println!("Input:");
    println!(
        "  D = {:.2} m, H = {:.2} m, HD = {:.2} m",
        geometry.diameter_m, geometry.height_m, geometry.design_liquid_level_m
    );
    println!(
        "  G = {:.3}, CA = {:.1} mm, E = {:.2}",
        input.shell.specific_gravity,
        input.shell.corrosion_allowance_mm,
        input.shell.joint_efficiency
    );
    println!("  Method: {} ({})", result.shell.info.method_name, result.shell.info.code_reference);
    println!();
    println!("Courses:");
    for course in &result.shell.courses {
        println!(
            "  {:>2}  {:<10} td={:>6.2} tt={:>6.2} tmin={:>4.1} -> t={:>4.1} mm {}",
            course.index + 1,
            course.material,
            course.td_mm,
            course.tt_mm,
            course.t_min_mm,
            course.t_used_mm,
            status_icon(course.status.is_ok())
        );
    }
    println!("  Shell weight: {:.0} kg", result.shell.total_mass_kg);

    if let Some(seismic) = &result.seismic {
        println!();
        println!("Seismic ({}):", seismic.code_reference);
        println!(
            "  SDS = {:.3} g, SD1 = {:.3} g, Ai = {:.4}, Ac = {:.4}",
            seismic.spectral.sds, seismic.spectral.sd1, seismic.spectral.ai, seismic.spectral.ac
        );
        println!("  V   = {:.1} kN", seismic.base_shear_kn);
        println!(
            "  Mrw = {:.1} kN·m, Ms = {:.1} kN·m",
            seismic.ringwall_moment_knm, seismic.slab_moment_knm
        );
        println!("  Sloshing height = {:.3} m", seismic.sloshing_height_m);
        println!(
            "  Sliding: {:.1} / {:.1} kN {}",
            seismic.base_shear_kn,
            seismic.sliding_resistance_kn,
            status_icon(seismic.sliding_status.is_ok())
        );
        if let Some(class) = seismic.anchorage_class {
            println!(
                "  Anchorage: J = {:.3} {} {}",
                seismic.anchorage_ratio,
                class.label(),
                status_icon(!seismic.requires_anchors())
            );
        }
        for check in &result.hoop_checks {
            println!(
                "  Hoop course {}: {:.1} / {:.1} MPa {}",
                check.course.map(|c| c + 1).unwrap_or(0),
                check.stress_mpa,
                check.allowable_mpa,
                status_icon(check.status.is_ok())
            );
        }
    }

    if !result.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &result.warnings {
            println!("  [{}] {}", warning.code(), warning);
        }
    }

    println!();
    println!("═══════════════════════════════════════");
    println!("  RESULT: {}", if result.passes() { "PASS" } else { "FAIL" });
    println!("═══════════════════════════════════════");
}

fn main() -> ExitCode {
    let args = Args::parse();

    let input = match args.to_input() {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            return ExitCode::FAILURE;
        }
    };

    let result = tank_design::run_default(&input);

    if !args.json {
        print_summary(&input, &result);
        println!();
        println!("JSON Output:");
    }
    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: {}", CalcError::from(e));
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
