//! Transition steps: the planner's output and the executor's input.

use serde::Serialize;
use spaceswitch_spec::{AttributeRef, BakeMode, ChannelMask, ControlRef, Pose};

/// Why a step exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepRole {
    /// Frame before a boundary: freezes the old configuration.
    HoldBefore,
    /// Boundary frame: flips to the target and restores the pose.
    Switch,
    /// Interior frame of a bake: re-keyed under the target.
    Rekey,
    /// Last frame of a truncated window: flips back to the source.
    Close,
    /// Frame before the close: still under the target.
    CloseBefore,
}

impl StepRole {
    /// Returns the role as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepRole::HoldBefore => "hold_before",
            StepRole::Switch => "switch",
            StepRole::Rekey => "rekey",
            StepRole::Close => "close",
            StepRole::CloseBefore => "close_before",
        }
    }
}

impl std::fmt::Display for StepRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do to a control before its channels are keyed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PoseAction {
    /// Leave it where it is.
    Hold,
    /// Force the world pose, translation first.
    Apply { pose: Pose },
    /// Force the world position only.
    Translate { position: [f64; 3] },
    /// Force the world rotation only.
    Rotate { rotation: [f64; 3] },
    /// Apply `seed`, then re-probe the pose through a temporary constraint
    /// from `driver` and re-apply, `iterations` passes in total.
    Probe {
        driver: ControlRef,
        seed: Pose,
        iterations: u32,
    },
}

/// A control, the action applied to it, and the channels keyed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoseTarget {
    pub control: ControlRef,
    #[serde(flatten)]
    pub action: PoseAction,
    pub channels: ChannelMask,
}

impl PoseTarget {
    /// Creates a new pose target.
    pub fn new(control: &ControlRef, action: PoseAction, channels: ChannelMask) -> Self {
        Self {
            control: control.clone(),
            action,
            channels,
        }
    }

    /// Keys `channels` of `control` without moving it.
    pub fn hold(control: &ControlRef, channels: ChannelMask) -> Self {
        Self::new(control, PoseAction::Hold, channels)
    }
}

/// One instruction of a plan.
///
/// Executed in field order: move the time cursor, set and key
/// `set_drivers`, key `key_drivers` at whatever value they hold, then act on
/// and key every target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionStep {
    pub time: f64,
    pub role: StepRole,
    pub set_drivers: Vec<AttributeRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub key_drivers: Vec<AttributeRef>,
    pub targets: Vec<PoseTarget>,
}

impl TransitionStep {
    /// Creates a step with no drivers or targets.
    pub fn new(time: f64, role: StepRole) -> Self {
        Self {
            time,
            role,
            set_drivers: Vec::new(),
            key_drivers: Vec::new(),
            targets: Vec::new(),
        }
    }

    /// Adds drivers to set and key.
    pub fn with_set_drivers(mut self, drivers: Vec<AttributeRef>) -> Self {
        self.set_drivers = drivers;
        self
    }

    /// Adds drivers to key as they are.
    pub fn with_key_drivers(mut self, drivers: Vec<AttributeRef>) -> Self {
        self.key_drivers = drivers;
        self
    }

    /// Adds pose targets.
    pub fn with_targets(mut self, targets: Vec<PoseTarget>) -> Self {
        self.targets = targets;
        self
    }
}

/// The ordered steps of one switch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionPlan {
    pub mode: BakeMode,
    pub steps: Vec<TransitionStep>,
}

impl TransitionPlan {
    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if the plan has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step times in execution order.
    pub fn times(&self) -> Vec<f64> {
        self.steps.iter().map(|step| step.time).collect()
    }

    /// Steps with the given role.
    pub fn steps_with_role(&self, role: StepRole) -> impl Iterator<Item = &TransitionStep> {
        self.steps.iter().filter(move |step| step.role == role)
    }
}
