//! Shared fixtures for bake integration tests.

#![allow(dead_code)]

use spaceswitch_bake::memory::{AnimCurve, MemoryNode, MemoryScene, ParentBinding, SpaceOption};
use spaceswitch_bake::{AnimatedScene, ConstraintKind, NodeType, SceneError, SceneResult};
use spaceswitch_spec::{
    AttributeRef, IkFkDirection, IkFkSwitchSpec, Pose, RotateOrder, SpaceSwitchSpec, SwitchSpec,
};

pub const TOLERANCE: f64 = 1e-5;

// ============================================================================
// Recording scene
// ============================================================================

/// Wraps a [`MemoryScene`], counting calls and optionally failing the N-th
/// (1-based) attribute or transform write, time move or constraint read.
#[derive(Debug, Clone, Default)]
pub struct RecordingScene {
    pub inner: MemoryScene,
    pub mutations: usize,
    pub time_moves: usize,
    pub undo_begins: usize,
    pub undo_ends: usize,
    pub viewport_suppressions: usize,
    pub viewport_restores: usize,
    pub probes: usize,
    pub fail_on_mutation: Option<usize>,
    pub fail_on_time_move: Option<usize>,
    pub fail_on_constraint: Option<usize>,
}

impl RecordingScene {
    pub fn new(inner: MemoryScene) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    pub fn failing_on(inner: MemoryScene, mutation: usize) -> Self {
        Self {
            fail_on_mutation: Some(mutation),
            ..Self::new(inner)
        }
    }

    pub fn failing_on_time_move(inner: MemoryScene, time_move: usize) -> Self {
        Self {
            fail_on_time_move: Some(time_move),
            ..Self::new(inner)
        }
    }

    pub fn failing_on_constraint(inner: MemoryScene, read: usize) -> Self {
        Self {
            fail_on_constraint: Some(read),
            ..Self::new(inner)
        }
    }

    fn mutate(&mut self) -> SceneResult<()> {
        self.mutations += 1;
        injected("mutation", self.mutations, self.fail_on_mutation)
    }
}

fn injected(what: &str, count: usize, fail_on: Option<usize>) -> SceneResult<()> {
    if fail_on == Some(count) {
        let message = format!("injected failure on {} {}", what, count);
        return Err(SceneError::failed(message));
    }
    Ok(())
}

impl AnimatedScene for RecordingScene {
    type Node = String;

    fn resolve_node(&self, name: &str) -> SceneResult<String> {
        self.inner.resolve_node(name)
    }

    fn node_type(&self, node: &String) -> NodeType {
        self.inner.node_type(node)
    }

    fn rotate_order(&self, node: &String) -> RotateOrder {
        self.inner.rotate_order(node)
    }

    fn attribute_exists(&self, node: &String, attribute: &str) -> bool {
        self.inner.attribute_exists(node, attribute)
    }

    fn get_attr(&self, node: &String, attribute: &str) -> SceneResult<f64> {
        self.inner.get_attr(node, attribute)
    }

    fn set_attr(&mut self, node: &String, attribute: &str, value: f64) -> SceneResult<()> {
        self.mutate()?;
        self.inner.set_attr(node, attribute, value)
    }

    fn set_keyframe(
        &mut self,
        node: &String,
        attribute: &str,
        time: Option<f64>,
    ) -> SceneResult<()> {
        self.mutate()?;
        self.inner.set_keyframe(node, attribute, time)
    }

    fn world_transform(&self, node: &String) -> SceneResult<Pose> {
        self.inner.world_transform(node)
    }

    fn set_world_translation(&mut self, node: &String, position: [f64; 3]) -> SceneResult<()> {
        self.mutate()?;
        self.inner.set_world_translation(node, position)
    }

    fn set_world_rotation(&mut self, node: &String, rotation: [f64; 3]) -> SceneResult<()> {
        self.mutate()?;
        self.inner.set_world_rotation(node, rotation)
    }

    fn current_time(&self) -> f64 {
        self.inner.current_time()
    }

    fn set_current_time(&mut self, time: f64) -> SceneResult<()> {
        self.time_moves += 1;
        injected("time move", self.time_moves, self.fail_on_time_move)?;
        self.inner.set_current_time(time)
    }

    fn existing_key_times(&self, nodes: &[String]) -> Vec<f64> {
        self.inner.existing_key_times(nodes)
    }

    fn playback_range(&self) -> (f64, f64) {
        self.inner.playback_range()
    }

    fn begin_undo_chunk(&mut self) {
        self.undo_begins += 1;
        self.inner.begin_undo_chunk();
    }

    fn end_undo_chunk(&mut self) {
        self.undo_ends += 1;
        self.inner.end_undo_chunk();
    }

    fn suppress_viewport(&mut self) {
        self.viewport_suppressions += 1;
        self.inner.suppress_viewport();
    }

    fn restore_viewport(&mut self) {
        self.viewport_restores += 1;
        self.inner.restore_viewport();
    }

    fn probe_via_constraint(
        &mut self,
        driver: &String,
        driven: &String,
        kind: ConstraintKind,
    ) -> SceneResult<Pose> {
        self.probes += 1;
        injected("constraint", self.probes, self.fail_on_constraint)?;
        self.inner.probe_via_constraint(driver, driven, kind)
    }
}

// ============================================================================
// Space switch rig
// ============================================================================

/// A hand control that can live in world space (0) or under a rotated,
/// offset chest (1), keyed at 0, 10, 20 and 30.
pub fn space_scene() -> MemoryScene {
    space_scene_keyed(&[0.0, 10.0, 20.0, 30.0])
}

/// The space switch rig with hand keys at `times`.
pub fn space_scene_keyed(times: &[f64]) -> MemoryScene {
    let curve = |f: fn(f64) -> f64| {
        AnimCurve::keyed(&times.iter().map(|&t| (t, f(t))).collect::<Vec<_>>())
    };
    MemoryScene::new()
        .with_playback_range(0.0, 30.0)
        .with_current_time(15.0)
        .with_node(
            "chest",
            MemoryNode::transform()
                .with_translation([0.0, 12.0, 1.0])
                .with_rotation([0.0, 0.0, 35.0]),
        )
        .with_node(
            "settings",
            MemoryNode::other().with_channel("space", AnimCurve::constant(0.0)),
        )
        .with_node(
            "hand",
            MemoryNode::transform()
                .with_channel("translateX", curve(|t| t * 0.2))
                .with_channel("translateY", curve(|t| 5.0 - (t - 12.0).abs() * 0.25))
                .with_channel("rotateY", curve(|t| t * 1.5))
                .with_channel("rotateX", curve(|t| 10.0 - t * 0.5))
                .with_parent(ParentBinding::Space {
                    node: "settings".to_string(),
                    attribute: "space".to_string(),
                    spaces: vec![
                        SpaceOption::new(0.0, None),
                        SpaceOption::new(1.0, Some("chest")),
                    ],
                }),
        )
}

pub fn space_spec() -> SwitchSpec {
    SwitchSpec::Space(SpaceSwitchSpec::new(
        "hand",
        AttributeRef::new("settings", "space", 0.0),
        AttributeRef::new("settings", "space", 1.0),
    ))
}

/// World pose of `node` at `time`, leaving the time cursor there.
pub fn pose_at<S: AnimatedScene<Node = String>>(scene: &mut S, node: &str, time: f64) -> Pose {
    scene.set_current_time(time).unwrap();
    scene.world_transform(&node.to_string()).unwrap()
}

/// World poses of `node` at each time.
pub fn poses_at<S: AnimatedScene<Node = String>>(
    scene: &mut S,
    node: &str,
    times: &[f64],
) -> Vec<Pose> {
    times.iter().map(|&t| pose_at(scene, node, t)).collect()
}

pub fn assert_pose_eq(actual: &Pose, expected: &Pose) {
    assert!(
        actual.approx_eq(expected, TOLERANCE),
        "pose mismatch:\n  actual:   {:?}\n  expected: {:?}",
        actual,
        expected
    );
}

// ============================================================================
// IK/FK arm rig
// ============================================================================

/// A three-joint arm with FK and IK control chains and one settings node.
/// Shoulder and elbow joints animate over 0..10; the IK hand is keyed at 0
/// and 10, which gives bake modes their reference range.
pub fn arm_scene() -> MemoryScene {
    MemoryScene::new()
        .with_playback_range(0.0, 10.0)
        .with_current_time(5.0)
        .with_node(
            "arm_settings",
            MemoryNode::other()
                .with_channel("ikfk", AnimCurve::constant(0.0))
                .with_channel("fkVis", AnimCurve::constant(0.0))
                .with_channel("ikVis", AnimCurve::constant(1.0)),
        )
        .with_node(
            "shoulder",
            MemoryNode::joint()
                .with_translation([0.0, 15.0, 0.0])
                .with_channel("rotateX", AnimCurve::keyed(&[(0.0, 10.0), (10.0, 30.0)]))
                .with_channel("rotateZ", AnimCurve::constant(-20.0)),
        )
        .with_node(
            "elbow",
            MemoryNode::joint()
                .with_parent_node("shoulder")
                .with_translation([4.0, 0.0, 0.0])
                .with_channel("rotateY", AnimCurve::keyed(&[(0.0, -40.0), (10.0, -70.0)])),
        )
        .with_node(
            "wrist",
            MemoryNode::joint()
                .with_parent_node("elbow")
                .with_translation([4.0, 0.0, 0.0])
                .with_rotation([5.0, 10.0, 15.0]),
        )
        .with_node("fk_shoulder", MemoryNode::transform())
        .with_node("fk_elbow", MemoryNode::transform())
        .with_node("fk_wrist", MemoryNode::transform())
        .with_node(
            "ik_hand",
            MemoryNode::transform()
                .with_channel("translateX", AnimCurve::keyed(&[(0.0, 1.0), (10.0, 2.0)])),
        )
        .with_node("ik_pole", MemoryNode::transform())
}

pub fn arm_spec(direction: IkFkDirection) -> IkFkSwitchSpec {
    IkFkSwitchSpec {
        shoulder_joint: "shoulder".into(),
        elbow_joint: "elbow".into(),
        wrist_joint: "wrist".into(),
        fk_shoulder: "fk_shoulder".into(),
        fk_elbow: "fk_elbow".into(),
        fk_wrist: "fk_wrist".into(),
        fk_switch: AttributeRef::new("arm_settings", "ikfk", 1.0),
        fk_visibility: AttributeRef::new("arm_settings", "fkVis", 1.0),
        ik_elbow: "ik_pole".into(),
        ik_wrist: "ik_hand".into(),
        ik_switch: AttributeRef::new("arm_settings", "ikfk", 0.0),
        ik_visibility: AttributeRef::new("arm_settings", "ikVis", 1.0),
        direction,
    }
}
