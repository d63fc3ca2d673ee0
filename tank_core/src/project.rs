//! # Project Data Structures
//!
//! The `TankProject` struct is the root container for a set of tank designs.
//! Projects convert to and from human-readable JSON; persistence is left to
//! the caller.
//!
//! ## Structure
//!
//! ```text
//! TankProject
//! ├── meta: ProjectMetadata (version, engineer, job info, timestamps)
//! ├── settings: DesignSettings (code edition, defaults for new tanks)
//! └── items: HashMap<Uuid, TankDesignInput> (one entry per tank)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use tank_core::project::TankProject;
//!
//! let project = TankProject::new("Jane Engineer", "26-042", "ACME Terminals");
//! let json = project.to_json().unwrap();
//! let loaded = TankProject::from_json(&json).unwrap();
//! assert_eq!(loaded.meta.job_id, "26-042");
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::hoop_stress::HydrodynamicModel;
use crate::calculations::shell::{
    CourseInput, DesignMethodSelection, ShellDesignInput, TankGeometry,
};
use crate::calculations::tank_design::{
    self, SiteDefinition, TankDesignInput, TankDesignResult, TankSeismicInput,
};
use crate::errors::{CalcError, CalcResult};
use crate::materials::api650::FALLBACK_MATERIAL;

/// Current schema version for project JSON
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container.
///
/// Items are stored in a flat UUID-keyed map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TankProject {
    /// Project metadata (version, engineer, job info)
    pub meta: ProjectMetadata,

    /// Project-wide design settings
    pub settings: DesignSettings,

    /// All tank designs, keyed by UUID
    pub items: HashMap<Uuid, TankDesignInput>,
}

impl TankProject {
    /// Create a new empty project.
    ///
    /// # Arguments
    ///
    /// * `engineer` - Name of the responsible engineer
    /// * `job_id` - Job/project number (e.g., "26-001")
    /// * `client` - Client name
    pub fn new(
        engineer: impl Into<String>,
        job_id: impl Into<String>,
        client: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        TankProject {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            settings: DesignSettings::default(),
            items: HashMap::new(),
        }
    }

    /// Add a tank design. Returns the UUID assigned to it.
    pub fn add_item(&mut self, item: TankDesignInput) -> Uuid {
        let id = Uuid::new_v4();
        self.items.insert(id, item);
        self.touch();
        id
    }

    /// Remove a tank design by UUID.
    pub fn remove_item(&mut self, id: &Uuid) -> Option<TankDesignInput> {
        let item = self.items.remove(id);
        if item.is_some() {
            self.touch();
        }
        item
    }

    /// Get a tank design by UUID.
    pub fn get_item(&self, id: &Uuid) -> Option<&TankDesignInput> {
        self.items.get(id)
    }

    /// Get a mutable reference to a tank design; marks the project modified.
    pub fn get_item_mut(&mut self, id: &Uuid) -> Option<&mut TankDesignInput> {
        if self.items.contains_key(id) {
            self.meta.modified = Utc::now();
            self.items.get_mut(id)
        } else {
            None
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Number of tank designs
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Run every tank design against the built-in tables.
    ///
    /// Results are ordered by label, then UUID.
    pub fn run_all(&self) -> Vec<(Uuid, TankDesignResult)> {
        let mut ids: Vec<(&Uuid, &TankDesignInput)> = self.items.iter().collect();
        ids.sort_by(|a, b| a.1.label.cmp(&b.1.label).then(a.0.cmp(b.0)));
        ids.into_iter()
            .map(|(id, input)| (*id, tank_design::run_default(input)))
            .collect()
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> CalcResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON, rejecting incompatible schema versions.
    pub fn from_json(json: &str) -> CalcResult<Self> {
        let project: TankProject = serde_json::from_str(json)?;
        validate_version(&project.meta.version)?;
        Ok(project)
    }
}

impl Default for TankProject {
    fn default() -> Self {
        TankProject::new("", "", "")
    }
}

/// Validate that a project version is compatible with the current schema.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let parse = |version: &str| -> Vec<u32> {
        version.split('.').filter_map(|p| p.parse().ok()).collect()
    };
    let file_parts = parse(file_version);
    let current_parts = parse(SCHEMA_VERSION);

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    // For 0.x versions, a newer minor version is not readable
    if current_parts[0] == 0
        && file_parts.len() > 1
        && current_parts.len() > 1
        && file_parts[1] > current_parts[1]
    {
        return Err(mismatch());
    }

    Ok(())
}

/// Project metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    /// Client name
    pub client: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}

/// Project-wide design settings, used as defaults for new tanks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignSettings {
    /// Design code edition (e.g., "API 650 13th Ed.")
    pub code: String,

    /// Default shell design method
    #[serde(default)]
    pub method: DesignMethodSelection,

    /// Default hydrodynamic model for the hoop stress check
    #[serde(default)]
    pub hydrodynamic_model: HydrodynamicModel,

    /// Default shell plate material
    pub default_material: String,

    /// Default corrosion allowance (mm)
    pub corrosion_allowance_mm: f64,

    /// Default design metal temperature (°C)
    pub design_temperature_c: f64,
}

impl Default for DesignSettings {
    fn default() -> Self {
        DesignSettings {
            code: "API 650 13th Ed.".to_string(),
            method: DesignMethodSelection::Auto,
            hydrodynamic_model: HydrodynamicModel::ConservativeUniform,
            default_material: FALLBACK_MATERIAL.to_string(),
            corrosion_allowance_mm: 0.0,
            design_temperature_c: 40.0,
        }
    }
}

impl DesignSettings {
    /// New tank design populated from these defaults.
    ///
    /// Every course uses the default material; seismic data is left empty.
    pub fn new_design(
        &self,
        label: impl Into<String>,
        geometry: TankGeometry,
        course_widths_m: &[f64],
        specific_gravity: f64,
    ) -> TankDesignInput {
        TankDesignInput {
            label: label.into(),
            shell: ShellDesignInput {
                geometry,
                courses: course_widths_m
                    .iter()
                    .map(|&w| CourseInput::new(self.default_material.clone(), w))
                    .collect(),
                specific_gravity,
                corrosion_allowance_mm: self.corrosion_allowance_mm,
                design_temperature_c: self.design_temperature_c,
                method: self.method,
                ..Default::default()
            },
            roof_mass_kg: 0.0,
            seismic: None,
        }
    }

    /// Seismic input for a site using the default hydrodynamic model.
    pub fn seismic_input(&self, site: SiteDefinition) -> TankSeismicInput {
        TankSeismicInput {
            hydrodynamic_model: self.hydrodynamic_model,
            ..TankSeismicInput::new(site)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project_with_tanks() -> TankProject {
        let mut project = TankProject::new("Engineer", "26-001", "Client");
        let settings = project.settings.clone();
        let second = TankGeometry::new(10.0, 6.0);
        let first = TankGeometry::new(8.0, 4.0);
        project.add_item(settings.new_design("T-2", second, &[3.0, 3.0], 0.9));
        project.add_item(settings.new_design("T-1", first, &[2.0, 2.0], 1.0));
        project
    }

    #[test]
    fn test_project_creation() {
        let project = TankProject::new("John Doe", "26-001", "Acme Corp");
        assert_eq!(project.meta.engineer, "John Doe");
        assert_eq!(project.meta.version, SCHEMA_VERSION);
        assert_eq!(project.item_count(), 0);
    }

    #[test]
    fn test_add_remove_item() {
        let mut project = TankProject::default();
        let input = project
            .settings
            .new_design("T-1", TankGeometry::new(8.0, 6.0), &[3.0, 3.0], 0.87);
        let id = project.add_item(input);
        assert!(project.get_item(&id).is_some());

        project.get_item_mut(&id).unwrap().roof_mass_kg = 2_000.0;
        assert_eq!(project.get_item(&id).unwrap().roof_mass_kg, 2_000.0);

        assert!(project.remove_item(&id).is_some());
        assert!(project.remove_item(&id).is_none());
        assert_eq!(project.item_count(), 0);
    }

    #[test]
    fn test_new_design_uses_settings() {
        let settings = DesignSettings {
            default_material: "A 516 70".to_string(),
            corrosion_allowance_mm: 3.0,
            method: DesignMethodSelection::VariableDesignPoint,
            ..Default::default()
        };
        let input = settings.new_design("T-9", TankGeometry::new(30.0, 12.0), &[2.4; 5], 1.0);
        assert_eq!(input.shell.courses.len(), 5);
        assert!(input.shell.courses.iter().all(|c| c.material == "A 516 70"));
        assert_eq!(input.shell.corrosion_allowance_mm, 3.0);
        assert_eq!(input.shell.method, DesignMethodSelection::VariableDesignPoint);
    }

    #[test]
    fn test_seismic_input_uses_settings() {
        use crate::calculations::site_coefficients::GroundMotion;

        let settings = DesignSettings {
            hydrodynamic_model: HydrodynamicModel::CodeDistribution,
            ..Default::default()
        };
        let mut input = settings.new_design("T-3", TankGeometry::new(20.0, 12.0), &[2.4; 5], 0.9);
        input.seismic = Some(settings.seismic_input(SiteDefinition::Api650(GroundMotion::Design {
            sds: 0.3,
            sd1: 0.12,
        })));

        let result = tank_design::run_default(&input);
        assert_eq!(result.hoop_checks.len(), 5);
        assert!(result
            .hoop_checks
            .iter()
            .all(|c| c.model == HydrodynamicModel::CodeDistribution));
    }

    #[test]
    fn test_run_all_is_ordered_by_label() {
        let project = project_with_tanks();
        let results = project.run_all();
        let labels: Vec<&str> = results.iter().map(|(_, r)| r.label.as_str()).collect();
        assert_eq!(labels, vec!["T-1", "T-2"]);
        assert!(results.iter().all(|(_, r)| r.shell.passes()));
    }

    #[test]
    fn test_json_roundtrip() {
        let project = project_with_tanks();
        let json = project.to_json().unwrap();
        assert!(json.contains("API 650 13th Ed."));

        let loaded = TankProject::from_json(&json).unwrap();
        assert_eq!(loaded.item_count(), 2);
        assert_eq!(loaded.settings, project.settings);
        for (id, item) in &project.items {
            assert_eq!(loaded.get_item(id), Some(item));
        }
    }

    #[test]
    fn test_version_mismatch() {
        let mut project = TankProject::default();
        project.meta.version = "0.9.0".to_string();
        let json = serde_json::to_string(&project).unwrap();
        let err = TankProject::from_json(&json).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");

        project.meta.version = "garbage".to_string();
        let json = serde_json::to_string(&project).unwrap();
        assert!(TankProject::from_json(&json).is_err());
    }

    #[test]
    fn test_invalid_json() {
        let err = TankProject::from_json("{ not json").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version("0.1.0").is_ok());
        assert!(validate_version("0.0.5").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
    }
}
