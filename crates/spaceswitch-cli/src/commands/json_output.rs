//! JSON output types for machine-readable CLI output.
//!
//! Printed by `validate`, `plan` and `switch` when `--json` is given.

use serde::Serialize;
use spaceswitch_bake::{Advisory, BakeError, TransitionPlan};
use spaceswitch_spec::{ReportableError, ValidationError, ValidationWarning};

/// Error codes for CLI-level failures. Bake and validation errors pass their
/// own codes through.
pub mod error_codes {
    /// Preset, scene, settings or window could not be loaded
    pub const INPUT_LOAD: &str = "CLI_001";
    /// Scene snapshot could not be written
    pub const SCENE_WRITE: &str = "CLI_002";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001", "E001", "BAKE_002")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Preset field the error refers to (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
        }
    }
}

impl From<&ValidationError> for JsonError {
    fn from(error: &ValidationError) -> Self {
        Self {
            code: error.code.code().to_string(),
            message: error.message.clone(),
            path: error.path.clone(),
        }
    }
}

impl From<&BakeError> for JsonError {
    fn from(error: &BakeError) -> Self {
        Self::new(error.code(), error.message())
    }
}

/// A structured warning in JSON output.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct JsonWarning {
    /// Stable warning code (e.g., "W001", "ROTATE_ORDER")
    pub code: String,
    /// Human-readable warning message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl From<&ValidationWarning> for JsonWarning {
    fn from(warning: &ValidationWarning) -> Self {
        Self {
            code: warning.code.code().to_string(),
            message: warning.message.clone(),
            path: warning.path.clone(),
        }
    }
}

impl From<&Advisory> for JsonWarning {
    fn from(advisory: &Advisory) -> Self {
        let code = match advisory {
            Advisory::RotateOrderMismatch { .. } => "ROTATE_ORDER",
            Advisory::Validation { code, .. } => *code,
        };
        Self {
            code: code.to_string(),
            message: advisory.to_string(),
            path: None,
        }
    }
}

/// Output of `validate --json`.
#[derive(Debug, Clone, Serialize)]
pub struct ValidateOutput {
    pub success: bool,
    /// Mode of the preset, when it parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    pub errors: Vec<JsonError>,
    pub warnings: Vec<JsonWarning>,
}

/// Output of `plan --json` and `switch --json`.
#[derive(Debug, Clone, Serialize)]
pub struct PlanOutput {
    pub success: bool,
    /// Whether the plan was executed and the scene written.
    pub executed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<TransitionPlan>,
    pub errors: Vec<JsonError>,
    pub warnings: Vec<JsonWarning>,
}

impl PlanOutput {
    /// A failed plan or switch.
    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            executed: false,
            plan: None,
            errors,
            warnings: Vec::new(),
        }
    }
}

/// Prints `value` as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
