//! Error types for switch spec validation and preset handling.

use std::path::PathBuf;

use thiserror::Error;

/// Error codes for switch spec validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// E001: A control or joint reference is empty
    EmptyControl,
    /// E002: An attribute reference is not a `node.attribute` path
    InvalidAttributePath,
    /// E003: An attribute reference carries a non-finite value
    NonFiniteValue,
    /// E004: Frame window start is after its end
    InvalidFrameWindow,
    /// E005: A tunable setting is out of range
    InvalidSetting,
    /// E006: An every-frame bake would visit too many frames
    TooManyFrames,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::EmptyControl => "E001",
            ErrorCode::InvalidAttributePath => "E002",
            ErrorCode::NonFiniteValue => "E003",
            ErrorCode::InvalidFrameWindow => "E004",
            ErrorCode::InvalidSetting => "E005",
            ErrorCode::TooManyFrames => "E006",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Warning codes for switch spec validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCode {
    /// W001: Source and target drivers are identical, the switch is a no-op
    SourceEqualsTarget,
    /// W002: The same control is used in more than one role
    DuplicateControl,
    /// W003: Probe iteration count differs from the verified default
    UnverifiedProbeIterations,
}

impl WarningCode {
    /// Returns the warning code string (e.g., "W001").
    pub fn code(&self) -> &'static str {
        match self {
            WarningCode::SourceEqualsTarget => "W001",
            WarningCode::DuplicateControl => "W002",
            WarningCode::UnverifiedProbeIterations => "W003",
        }
    }
}

impl std::fmt::Display for WarningCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A validation error with code, message, and optional field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// Preset field that caused the error (e.g., "ik switch").
    pub path: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Creates a new validation error with a field path.
    pub fn with_path(
        code: ErrorCode,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// A validation warning with code, message, and optional field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The warning code.
    pub code: WarningCode,
    /// Human-readable warning message.
    pub message: String,
    /// Preset field the warning refers to.
    pub path: Option<String>,
}

impl ValidationWarning {
    /// Creates a new validation warning.
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Creates a new validation warning with a field path.
    pub fn with_path(
        code: WarningCode,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

/// Result of switch spec validation.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether validation passed (no errors).
    pub ok: bool,
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of validation warnings.
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// Creates a successful validation result.
    pub fn success() -> Self {
        Self {
            ok: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Adds an error to the result.
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
        self.ok = false;
    }

    /// Adds a warning to the result.
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Folds another result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        self.ok &= other.ok;
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Returns true if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.ok
    }

    /// Converts to a Result, returning Err if there are errors.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, Vec<ValidationError>> {
        if self.ok {
            Ok(self.warnings)
        } else {
            Err(self.errors)
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::success()
    }
}

/// Errors raised while reading or writing preset files.
#[derive(Debug, Error)]
pub enum PresetError {
    /// JSON parsing or serialization error.
    #[error("preset JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to read a preset file.
    #[error("failed to read preset {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a preset file.
    #[error("failed to write preset {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error raised when an attribute path cannot be split into node and attribute.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("attribute path '{path}' must have the form 'node.attribute'")]
pub struct AttributePathError {
    /// The rejected path.
    pub path: String,
}

/// Common trait for errors surfaced to the user with a stable code.
///
/// Implemented by the bake crate's error types so that front ends can report
/// failures uniformly without matching on every variant.
pub trait ReportableError: std::error::Error {
    /// Stable error code (e.g. "BAKE_003").
    fn code(&self) -> &'static str;

    /// Human-readable message; defaults to the `Display` output.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Error category used for grouping (e.g. "validation", "scene").
    fn category(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ErrorCode::EmptyControl.code(), "E001");
        assert_eq!(ErrorCode::InvalidSetting.to_string(), "E005");
        assert_eq!(ErrorCode::TooManyFrames.code(), "E006");
        assert_eq!(WarningCode::DuplicateControl.code(), "W002");
    }

    #[test]
    fn test_validation_error_display_with_path() {
        let err = ValidationError::with_path(
            ErrorCode::InvalidAttributePath,
            "missing attribute name",
            "source space",
        );
        assert_eq!(
            err.to_string(),
            "E002: missing attribute name (at source space)"
        );
    }

    #[test]
    fn test_merge_keeps_failure() {
        let mut a = ValidationResult::success();
        let mut b = ValidationResult::success();
        b.add_error(ValidationError::new(ErrorCode::EmptyControl, "empty"));
        a.merge(b);
        assert!(!a.is_ok());
        assert_eq!(a.errors.len(), 1);
    }
}
