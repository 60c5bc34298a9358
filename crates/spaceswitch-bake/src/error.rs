//! Error types for planning and executing switches.

use spaceswitch_spec::{BakeMode, FrameWindow, ReportableError, RotateOrder, ValidationError};
use thiserror::Error;

use crate::scene::NodeType;

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Result type for bake operations.
pub type BakeResult<T> = Result<T, BakeError>;

/// Errors raised by an [`AnimatedScene`](crate::scene::AnimatedScene) implementation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    /// No node with this name exists.
    #[error("node '{name}' not found")]
    NodeNotFound { name: String },

    /// The node exists but has no such attribute.
    #[error("attribute '{node}.{attribute}' not found")]
    AttributeNotFound { node: String, attribute: String },

    /// A transform operation was attempted on a node without a transform.
    #[error("node '{node}' is not a transform")]
    NotTransform { node: String },

    /// Any other failure reported by the host.
    #[error("scene operation failed: {message}")]
    Failed { message: String },
}

impl SceneError {
    /// Creates a new generic failure.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}

/// Errors that abort a switch.
#[derive(Debug, Error)]
pub enum BakeError {
    /// The switch spec, request or settings failed structural validation.
    #[error("invalid switch: {}", format_errors(.errors))]
    InvalidSpec { errors: Vec<ValidationError> },

    /// A referenced node or attribute no longer exists in the scene.
    #[error("stale reference in '{field}': '{reference}' no longer exists")]
    StaleReference { field: String, reference: String },

    /// A referenced node exists but has the wrong type for its role.
    #[error("'{node}' in '{field}' is a {actual} node, expected {expected}")]
    NotTransform {
        field: String,
        node: String,
        actual: NodeType,
        expected: &'static str,
    },

    /// A bake mode selected no frames.
    #[error("no frames to bake for {mode}{}", format_window(.window))]
    EmptySampleSet {
        mode: BakeMode,
        window: Option<FrameWindow>,
    },

    /// Joint and FK control rotate orders differ and strict checking is on.
    #[error("rotate order of '{control}' ({control_order}) differs from '{joint}' ({joint_order})")]
    RotateOrderMismatch {
        joint: String,
        joint_order: RotateOrder,
        control: String,
        control_order: RotateOrder,
    },

    /// The scene failed once mutation had started. Earlier steps stay applied.
    #[error("scene mutation failed at frame {time}: {source}")]
    Mutation {
        time: f64,
        #[source]
        source: SceneError,
    },
}

impl BakeError {
    /// Creates a new stale reference error.
    pub fn stale(field: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::StaleReference {
            field: field.into(),
            reference: reference.into(),
        }
    }

    /// Returns true if the error was raised before any scene mutation.
    pub fn is_pre_mutation(&self) -> bool {
        !matches!(self, BakeError::Mutation { .. })
    }
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn format_window(window: &Option<FrameWindow>) -> String {
    match window {
        Some(window) => format!(" in window {}..{}", window.start, window.end),
        None => String::new(),
    }
}

impl ReportableError for BakeError {
    fn code(&self) -> &'static str {
        match self {
            BakeError::InvalidSpec { .. } => "BAKE_001",
            BakeError::StaleReference { .. } => "BAKE_002",
            BakeError::NotTransform { .. } => "BAKE_003",
            BakeError::EmptySampleSet { .. } => "BAKE_004",
            BakeError::RotateOrderMismatch { .. } => "BAKE_005",
            BakeError::Mutation { .. } => "BAKE_006",
        }
    }

    fn category(&self) -> &'static str {
        match self {
            BakeError::InvalidSpec { .. } => "validation",
            BakeError::StaleReference { .. } | BakeError::NotTransform { .. } => "reference",
            BakeError::EmptySampleSet { .. } | BakeError::RotateOrderMismatch { .. } => "plan",
            BakeError::Mutation { .. } => "scene",
        }
    }
}
