//! # Error Types
//!
//! Structured error and warning types for tank_core.
//!
//! Calculations in this crate never fail: every abnormal condition degrades to a
//! [`DesignWarning`] attached to an otherwise complete result. [`CalcError`] is
//! reserved for the edges of the crate - strict input validation, flexible parsing
//! of enum names, and project JSON conversion.
//!
//! ## Example
//!
//! ```rust
//! use tank_core::calculations::shell::{CourseInput, ShellDesignInput, TankGeometry};
//!
//! let input = ShellDesignInput {
//!     geometry: TankGeometry::new(12.0, 9.0),
//!     courses: vec![CourseInput::new("A 36", 9.0)],
//!     joint_efficiency: 1.2,
//!     ..Default::default()
//! };
//! let err = input.validate().unwrap_err();
//! assert_eq!(err.error_code(), "INVALID_INPUT");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result of validation, parsing and project conversion
pub type CalcResult<T> = Result<T, CalcError>;

/// Hard failure at the crate boundary.
///
/// Serialized as `{"type": ..., "details": {...}}` so front ends can branch on
/// the variant without parsing the message.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// A field holds a value the tank design cannot use
    #[error("Invalid {field} = {value}: {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required list or value is empty
    #[error("Missing {field}")]
    MissingField { field: String },

    /// Strict lookup of a plate material that is not tabulated
    #[error("Plate material '{material_name}' is not in the material table")]
    MaterialNotFound { material_name: String },

    /// Project or result JSON could not be read or written
    #[error("JSON error: {reason}")]
    SerializationError { reason: String },

    /// Project written by an incompatible schema version
    #[error("Project schema {file_version} cannot be read (this build reads {expected_version})")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl CalcError {
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField { field: field.into() }
    }

    pub fn material_not_found(material_name: impl Into<String>) -> Self {
        CalcError::MaterialNotFound {
            material_name: material_name.into(),
        }
    }

    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::SerializationError { reason: reason.into() }
    }

    /// Stable code for front ends
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::serialization(err.to_string())
    }
}

/// Non-fatal condition attached to a calculation result.
///
/// Every warning accompanies a finite, best-effort numeric result. Consumers
/// decide whether to surface, log or ignore them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum DesignWarning {
    /// Non-positive diameter or height; no calculation was performed
    InvalidGeometry { diameter_m: f64, height_m: f64 },

    /// Course widths do not add up to the shell height
    GeometryMismatch {
        total_width_m: f64,
        shell_height_m: f64,
    },

    /// Material name not in the table; the fallback material was used
    UnknownMaterial { course: usize, requested: String, used: String },

    /// Design-point iteration hit its cap; the last iterate was kept
    ConvergenceNotReached {
        course: usize,
        iterations: usize,
        last_change_mm: f64,
    },
}

impl DesignWarning {
    /// Short code for programmatic handling
    pub fn code(&self) -> &'static str {
        match self {
            DesignWarning::InvalidGeometry { .. } => "INVALID_GEOMETRY",
            DesignWarning::GeometryMismatch { .. } => "GEOMETRY_MISMATCH",
            DesignWarning::UnknownMaterial { .. } => "UNKNOWN_MATERIAL",
            DesignWarning::ConvergenceNotReached { .. } => "CONVERGENCE_NOT_REACHED",
        }
    }
}

impl std::fmt::Display for DesignWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DesignWarning::InvalidGeometry { diameter_m, height_m } => write!(
                f,
                "Invalid geometry (D = {} m, H = {} m): calculation not applicable",
                diameter_m, height_m
            ),
            DesignWarning::GeometryMismatch { total_width_m, shell_height_m } => write!(
                f,
                "Course widths sum to {:.3} m but shell height is {:.3} m",
                total_width_m, shell_height_m
            ),
            DesignWarning::UnknownMaterial { course, requested, used } => write!(
                f,
                "Course {}: material '{}' not found, using '{}'",
                course + 1,
                requested,
                used
            ),
            DesignWarning::ConvergenceNotReached { course, iterations, last_change_mm } => write!(
                f,
                "Course {}: design point not converged after {} iterations (last change {:.4} mm)",
                course + 1,
                iterations,
                last_change_mm
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("diameter_m", "-5.0", "Diameter must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes_and_messages() {
        assert_eq!(CalcError::missing_field("courses").error_code(), "MISSING_FIELD");
        let err = CalcError::material_not_found("A 999");
        assert_eq!(err.error_code(), "MATERIAL_NOT_FOUND");
        assert_eq!(err.to_string(), "Plate material 'A 999' is not in the material table");
    }

    #[test]
    fn test_error_json_shape() {
        let err = CalcError::missing_field("courses");
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["type"], "MissingField");
        assert_eq!(value["details"]["field"], "courses");
    }

    #[test]
    fn test_json_error_conversion() {
        let err: CalcError = serde_json::from_str::<f64>("not a number").unwrap_err().into();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_warning_display_uses_one_based_course() {
        let warning = DesignWarning::UnknownMaterial {
            course: 0,
            requested: "A 999".to_string(),
            used: "A 283 C".to_string(),
        };
        assert_eq!(warning.code(), "UNKNOWN_MATERIAL");
        assert!(warning.to_string().starts_with("Course 1:"));
    }
}
