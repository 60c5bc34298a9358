//! The animated scene a switch reads from and writes to.
//!
//! The host application owns nodes, keyframes, the time cursor and the
//! viewport. Everything the planner and executor need from it goes through
//! [`AnimatedScene`].

use serde::{Deserialize, Serialize};
use spaceswitch_spec::{Pose, RotateOrder};

use crate::error::SceneResult;

/// Type tag of a scene node, used to gate transform and joint operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// A plain transform (controls, groups, locators).
    #[default]
    Transform,
    /// A skeleton joint.
    Joint,
    /// Any node without a transform (settings nodes, utilities).
    Other,
}

impl NodeType {
    /// Returns the type as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Transform => "transform",
            NodeType::Joint => "joint",
            NodeType::Other => "other",
        }
    }

    /// Returns true if the node carries a world transform.
    pub fn is_transform(&self) -> bool {
        matches!(self, NodeType::Transform | NodeType::Joint)
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of temporary constraint used by [`AnimatedScene::probe_via_constraint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    /// Translation and rotation follow the driver, no offset.
    Parent,
    /// Translation only.
    Point,
    /// Rotation only.
    Orient,
}

/// Interface to the host scene.
///
/// Reads take `&self`; anything that changes the scene, the time cursor or
/// host state takes `&mut self`. Implementations are single-threaded.
pub trait AnimatedScene {
    /// Host handle for a resolved node.
    type Node: Clone + std::fmt::Debug;

    /// Looks up a node by name.
    fn resolve_node(&self, name: &str) -> SceneResult<Self::Node>;

    /// Returns the node's type tag.
    fn node_type(&self, node: &Self::Node) -> NodeType;

    /// Returns the node's rotate order.
    fn rotate_order(&self, node: &Self::Node) -> RotateOrder;

    /// Returns true if the node has the attribute.
    fn attribute_exists(&self, node: &Self::Node, attribute: &str) -> bool;

    /// Reads an attribute at the current time.
    fn get_attr(&self, node: &Self::Node, attribute: &str) -> SceneResult<f64>;

    /// Writes an attribute at the current time. The value is not keyed.
    fn set_attr(&mut self, node: &Self::Node, attribute: &str, value: f64) -> SceneResult<()>;

    /// Keys the attribute's current value at `time`, or at the current time.
    fn set_keyframe(
        &mut self,
        node: &Self::Node,
        attribute: &str,
        time: Option<f64>,
    ) -> SceneResult<()>;

    /// Reads the node's world-space pose at the current time. Rotation is in
    /// the node's own rotate order.
    fn world_transform(&self, node: &Self::Node) -> SceneResult<Pose>;

    /// Moves the node so its world position is `position`.
    fn set_world_translation(&mut self, node: &Self::Node, position: [f64; 3]) -> SceneResult<()>;

    /// Rotates the node so its world rotation is `rotation`, in the node's
    /// rotate order.
    fn set_world_rotation(&mut self, node: &Self::Node, rotation: [f64; 3]) -> SceneResult<()>;

    /// Writes a full world pose. Translation is applied before rotation.
    fn set_world_transform(&mut self, node: &Self::Node, pose: &Pose) -> SceneResult<()> {
        self.set_world_translation(node, pose.position)?;
        self.set_world_rotation(node, pose.rotation)
    }

    /// Returns the time cursor.
    fn current_time(&self) -> f64;

    /// Moves the time cursor.
    fn set_current_time(&mut self, time: f64) -> SceneResult<()>;

    /// Sorted, deduplicated key times across all channels of `nodes`.
    fn existing_key_times(&self, nodes: &[Self::Node]) -> Vec<f64>;

    /// Inclusive playback range.
    fn playback_range(&self) -> (f64, f64);

    /// Opens an undo chunk. Calls nest.
    fn begin_undo_chunk(&mut self);

    /// Closes the innermost undo chunk.
    fn end_undo_chunk(&mut self);

    /// Stops viewport redraws. Calls nest.
    fn suppress_viewport(&mut self);

    /// Resumes viewport redraws.
    fn restore_viewport(&mut self);

    /// Creates a temporary constraint from `driver` onto `driven`, reads the
    /// pose it produces on `driven`, and deletes the constraint. Rotation is
    /// in the driven node's rotate order. The scene is left unchanged.
    fn probe_via_constraint(
        &mut self,
        driver: &Self::Node,
        driven: &Self::Node,
        kind: ConstraintKind,
    ) -> SceneResult<Pose>;
}
