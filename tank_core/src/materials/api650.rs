//! API 650 Plate Materials (Table 5-2a, SI)
//!
//! Typical minimum yield/tensile strengths and allowable design/test
//! stresses at ambient temperature, plus temperature derating breakpoints
//! for the common carbon steel grades.
//!
//! The table is built once per process and shared read-only.

use once_cell::sync::Lazy;

use super::{Material, MaterialFamily, MaterialTable};

/// Designation of the conservative fallback material
pub const FALLBACK_MATERIAL: &str = "A 283 C";

/// (name, Fy, Fu, Sd, St) in MPa
const CARBON_STEEL: &[(&str, f64, f64, f64, f64)] = &[
    ("A 283 C", 205.0, 380.0, 137.0, 154.0),
    ("A 283 D", 225.0, 415.0, 137.0, 154.0),
    ("A 285 C", 205.0, 380.0, 137.0, 154.0),
    ("A 36", 250.0, 400.0, 160.0, 171.0),
    ("A 573 58", 220.0, 400.0, 160.0, 171.0),
    ("A 573 65", 240.0, 450.0, 180.0, 193.0),
    ("A 573 70", 290.0, 485.0, 193.0, 208.0),
    ("A 516 55", 205.0, 380.0, 137.0, 154.0),
    ("A 516 60", 220.0, 415.0, 138.0, 155.0),
    ("A 516 65", 240.0, 450.0, 180.0, 193.0),
    ("A 516 70", 260.0, 485.0, 173.0, 194.0),
    ("A 537 1", 345.0, 485.0, 193.0, 215.0),
    ("A 537 2", 415.0, 550.0, 220.0, 246.0),
    ("A 553 Type 1", 585.0, 690.0, 193.0, 208.0),
    ("A 645", 450.0, 655.0, 183.0, 196.0),
    ("A 131 A", 235.0, 400.0, 137.0, 154.0),
    ("A 131 B", 235.0, 400.0, 137.0, 154.0),
    ("A 131 CS", 235.0, 400.0, 137.0, 154.0),
    ("A 131 EH 36", 355.0, 490.0, 196.0, 218.0),
];

/// (name, Fy, Fu, Sd, St) in MPa
const STAINLESS_STEEL: &[(&str, f64, f64, f64, f64)] = &[
    ("304", 205.0, 515.0, 155.0, 186.0),
    ("304L", 170.0, 485.0, 145.0, 153.0),
    ("316", 205.0, 515.0, 155.0, 186.0),
    ("316L", 170.0, 485.0, 145.0, 153.0),
    ("317", 205.0, 515.0, 155.0, 186.0),
    ("317L", 205.0, 515.0, 155.0, 186.0),
];

/// Sd derating breakpoints (°C, MPa)
const A283_DERATING: &[(f64, f64)] = &[
    (40.0, 137.0),
    (90.0, 137.0),
    (150.0, 120.3),
    (200.0, 115.0),
    (260.0, 110.0),
];
const A36_DERATING: &[(f64, f64)] = &[
    (40.0, 160.0),
    (90.0, 160.0),
    (150.0, 148.0),
    (200.0, 130.0),
    (260.0, 120.0),
];
const A516_70_DERATING: &[(f64, f64)] = &[
    (40.0, 173.0),
    (90.0, 173.0),
    (150.0, 173.0),
    (200.0, 165.0),
    (260.0, 155.0),
];

fn derating_for(name: &str) -> Option<&'static [(f64, f64)]> {
    match name {
        "A 283 C" | "A 283 D" | "A 285 C" => Some(A283_DERATING),
        "A 36" => Some(A36_DERATING),
        "A 516 70" => Some(A516_70_DERATING),
        _ => None,
    }
}

fn build(family: MaterialFamily, rows: &[(&str, f64, f64, f64, f64)]) -> Vec<Material> {
    rows.iter()
        .map(|&(name, fy, fu, sd, st)| {
            let material = Material::new(name, family, fy, fu, sd, st);
            match derating_for(name) {
                Some(points) => material.with_derating(points),
                None => material,
            }
        })
        .collect()
}

/// Default API 650 material table
pub static API650_MATERIALS: Lazy<MaterialTable> = Lazy::new(|| {
    let mut materials = build(MaterialFamily::CarbonSteel, CARBON_STEEL);
    materials.extend(build(MaterialFamily::StainlessSteel, STAINLESS_STEEL));

    let fallback = materials
        .iter()
        .find(|m| m.name == FALLBACK_MATERIAL)
        .cloned()
        .unwrap_or_else(|| {
            let family = MaterialFamily::CarbonSteel;
            Material::new(FALLBACK_MATERIAL, family, 205.0, 380.0, 137.0, 154.0)
                .with_derating(A283_DERATING)
        });

    MaterialTable::new(materials, fallback)
});
