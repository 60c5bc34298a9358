//! Switch spec validation logic.
//!
//! Validation is purely structural: it checks what can be checked without a
//! scene. Whether names still resolve is decided by the planner right before a
//! switch runs.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::bake::{BakeMode, BakeRequest, FrameWindow, MAX_BAKE_FRAMES};
use crate::error::{ErrorCode, ValidationError, ValidationResult, ValidationWarning, WarningCode};
use crate::refs::AttributeRef;
use crate::settings::{SwitchSettings, DEFAULT_PROBE_ITERATIONS};
use crate::switch::SwitchSpec;

/// Attribute names: a leading letter or underscore, then word characters,
/// optionally followed by array indices (e.g. `blendWeights[2]`).
const ATTRIBUTE_NAME_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*(\[[0-9]+\])?$";

static ATTRIBUTE_NAME_REGEX: OnceLock<Regex> = OnceLock::new();

fn attribute_name_regex() -> &'static Regex {
    ATTRIBUTE_NAME_REGEX
        .get_or_init(|| Regex::new(ATTRIBUTE_NAME_PATTERN).expect("invalid regex pattern"))
}

/// Validates a switch spec.
///
/// # Example
/// ```
/// use spaceswitch_spec::{AttributeRef, SpaceSwitchSpec, SwitchSpec};
/// use spaceswitch_spec::validation::validate_switch;
///
/// let spec = SwitchSpec::Space(SpaceSwitchSpec::new(
///     "hand_l_ctl",
///     AttributeRef::new("hand_l_ctl", "space", 0.0),
///     AttributeRef::new("hand_l_ctl", "space", 1.0),
/// ));
/// assert!(validate_switch(&spec).is_ok());
/// ```
pub fn validate_switch(spec: &SwitchSpec) -> ValidationResult {
    let mut result = ValidationResult::default();

    validate_controls(spec, &mut result);
    for (field, attr) in spec.attributes() {
        validate_attribute(field, attr, &mut result);
    }
    check_warnings(spec, &mut result);

    result
}

/// Validates a bake request. Windows must not be inverted, and every-frame
/// windows must fit in [`MAX_BAKE_FRAMES`].
pub fn validate_request(request: &BakeRequest) -> ValidationResult {
    let mut result = ValidationResult::default();

    if let Some(window) = request.window {
        if !window.start.is_finite() || !window.end.is_finite() {
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidFrameWindow,
                format!(
                    "frame window bounds must be finite, got {}..{}",
                    window.start, window.end
                ),
                "window",
            ));
        } else if window.start > window.end {
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidFrameWindow,
                format!(
                    "frame window start {} is after end {}",
                    window.start, window.end
                ),
                "window",
            ));
        } else if request.mode == BakeMode::BakeEveryFrame {
            if let Some(error) = check_frame_count(&window, "window") {
                result.add_error(error);
            }
        }
    }

    result
}

/// Rejects windows holding more than [`MAX_BAKE_FRAMES`] integer frames.
pub fn check_frame_count(window: &FrameWindow, path: &str) -> Option<ValidationError> {
    let count = window.frame_count();
    if count <= MAX_BAKE_FRAMES {
        return None;
    }
    Some(ValidationError::with_path(
        ErrorCode::TooManyFrames,
        format!(
            "{}..{} spans {} frames; at most {} can be baked",
            window.start, window.end, count, MAX_BAKE_FRAMES
        ),
        path,
    ))
}

/// Validates tunable settings.
pub fn validate_settings(settings: &SwitchSettings) -> ValidationResult {
    let mut result = ValidationResult::default();

    if !settings.pole_distance.is_finite() || settings.pole_distance <= 0.0 {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidSetting,
            format!(
                "pole_distance must be a positive number, got {}",
                settings.pole_distance
            ),
            "pole_distance",
        ));
    }

    if settings.probe_iterations == 0 {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidSetting,
            "probe_iterations must be at least 1",
            "probe_iterations",
        ));
    } else if settings.probe_iterations != DEFAULT_PROBE_ITERATIONS {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::UnverifiedProbeIterations,
            format!(
                "probe_iterations is {}; only {} has been verified to settle the IK wrist",
                settings.probe_iterations, DEFAULT_PROBE_ITERATIONS
            ),
            "probe_iterations",
        ));
    }

    result
}

fn validate_controls(spec: &SwitchSpec, result: &mut ValidationResult) {
    for (field, control) in spec.controls() {
        if control.is_empty() {
            result.add_error(ValidationError::with_path(
                ErrorCode::EmptyControl,
                "control name must not be empty",
                field,
            ));
        }
    }
}

fn validate_attribute(field: &str, attr: &AttributeRef, result: &mut ValidationResult) {
    if attr.node.trim().is_empty() || attr.node.chars().any(char::is_whitespace) {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidAttributePath,
            format!("'{}' does not name a node", attr.path()),
            field,
        ));
    } else if !attribute_name_regex().is_match(&attr.attribute) {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidAttributePath,
            format!(
                "attribute name '{}' must match pattern '{}'",
                attr.attribute, ATTRIBUTE_NAME_PATTERN
            ),
            field,
        ));
    }

    if !attr.value.is_finite() {
        result.add_error(ValidationError::with_path(
            ErrorCode::NonFiniteValue,
            format!("'{}' has non-finite value {}", attr.path(), attr.value),
            field,
        ));
    }
}

fn check_warnings(spec: &SwitchSpec, result: &mut ValidationResult) {
    let source = spec.source();
    let target = spec.target();
    if source.same_attribute(target) && source.value == target.value {
        result.add_warning(ValidationWarning::new(
            WarningCode::SourceEqualsTarget,
            format!(
                "source and target both set '{}' to {}; the switch changes nothing",
                source.path(),
                source.value
            ),
        ));
    }

    let mut seen: HashMap<&str, &str> = HashMap::new();
    for (field, control) in spec.controls() {
        if control.is_empty() {
            continue;
        }
        if let Some(first) = seen.insert(control.name(), field) {
            result.add_warning(ValidationWarning::with_path(
                WarningCode::DuplicateControl,
                format!("'{}' is also used as {}", control, first),
                field,
            ));
        }
    }
}
