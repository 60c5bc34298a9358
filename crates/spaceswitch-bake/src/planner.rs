//! Transition planning.
//!
//! Planning runs in two phases. [`TransitionPlanner::prepare`] validates the
//! request, re-resolves every reference and picks the sample times without
//! touching the scene, so every user-facing rejection happens before any
//! mutation. [`TransitionPlanner::build`] then captures all poses (which moves
//! the time cursor and keys the source driver in bake modes) and lays out the
//! ordered steps.
//!
//! Step layout for a sample set `t0 < ... < tn`:
//!
//! - head boundary at `t0`: `HoldBefore(t0 - 1)` under the source, then
//!   `Switch(t0)` under the target with the captured pose
//! - tail boundary at `tn`: `Close(tn)` back under the source, then
//!   `CloseBefore(tn - 1)` under the target with the pose captured at `tn - 1`
//! - every other sample: `Rekey(t)` under the target

use serde::Serialize;
use spaceswitch_spec::{
    check_frame_count, validate_request, validate_settings, validate_switch, AttributeRef,
    BakeMode, BakeRequest, FrameWindow, IkFkSwitchSpec, RotateOrder, SwitchSettings, SwitchSpec,
    ValidationWarning,
};

use crate::error::{BakeError, BakeResult, SceneError, SceneResult};
use crate::rig::{self, Side};
use crate::scene::{AnimatedScene, NodeType};
use crate::step::{PoseTarget, StepRole, TransitionPlan, TransitionStep};

/// A non-fatal finding reported alongside a switch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// A joint and its FK control use different rotate orders, so matched
    /// rotations may be off.
    RotateOrderMismatch {
        joint: String,
        joint_order: RotateOrder,
        control: String,
        control_order: RotateOrder,
    },
    /// A structural validation warning.
    Validation { code: &'static str, message: String },
}

impl From<ValidationWarning> for Advisory {
    fn from(warning: ValidationWarning) -> Self {
        Advisory::Validation {
            code: warning.code.code(),
            message: warning.to_string(),
        }
    }
}

impl std::fmt::Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Advisory::RotateOrderMismatch {
                joint,
                joint_order,
                control,
                control_order,
            } => write!(
                f,
                "rotate order of '{}' ({}) differs from '{}' ({}); matched rotations may be wrong",
                control, control_order, joint, joint_order
            ),
            Advisory::Validation { message, .. } => f.write_str(message),
        }
    }
}

/// Sample times of one switch and where boundaries go.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sampling {
    pub times: Vec<f64>,
    pub head_boundary: bool,
    pub tail_boundary: bool,
}

/// Everything `prepare` established about a switch.
#[derive(Debug, Clone, PartialEq)]
pub struct Prepared {
    pub mode: BakeMode,
    pub sampling: Sampling,
    pub advisories: Vec<Advisory>,
}

/// Turns a switch preset and bake request into ordered transition steps.
#[derive(Debug, Clone, Default)]
pub struct TransitionPlanner {
    settings: SwitchSettings,
}

impl TransitionPlanner {
    /// Creates a planner.
    pub fn new(settings: SwitchSettings) -> Self {
        Self { settings }
    }

    /// Returns the planner's settings.
    pub fn settings(&self) -> &SwitchSettings {
        &self.settings
    }

    /// Structural validation of spec, request and settings.
    pub fn validate(
        &self,
        spec: &SwitchSpec,
        request: &BakeRequest,
    ) -> BakeResult<Vec<ValidationWarning>> {
        let mut result = validate_switch(spec);
        result.merge(validate_request(request));
        result.merge(validate_settings(&self.settings));
        result
            .into_result()
            .map_err(|errors| BakeError::InvalidSpec { errors })
    }

    /// Checks the request against the scene and picks sample times. Reads
    /// only.
    pub fn prepare<S: AnimatedScene + ?Sized>(
        &self,
        scene: &S,
        spec: &SwitchSpec,
        request: &BakeRequest,
    ) -> BakeResult<Prepared> {
        let warnings = self.validate(spec, request)?;
        check_references(scene, spec)?;

        let mut advisories: Vec<Advisory> = warnings.into_iter().map(Advisory::from).collect();
        if let SwitchSpec::IkFk(ikfk) = spec {
            advisories.extend(self.check_rotate_orders(scene, ikfk)?);
        }

        let sampling = sample(scene, spec, request)?;
        log::debug!(
            "{} samples for {} ({} head, {} tail)",
            sampling.times.len(),
            request.mode,
            sampling.head_boundary,
            sampling.tail_boundary
        );

        Ok(Prepared {
            mode: request.mode,
            sampling,
            advisories,
        })
    }

    /// Prepares and builds a plan. Capturing moves the time cursor and, in
    /// bake modes, keys the source driver at every sample.
    pub fn plan<S: AnimatedScene + ?Sized>(
        &self,
        scene: &mut S,
        spec: &SwitchSpec,
        request: &BakeRequest,
    ) -> BakeResult<TransitionPlan> {
        let prepared = self.prepare(scene, spec, request)?;
        self.build(scene, spec, &prepared)
    }

    /// Captures every pose the plan restores, then lays out the steps.
    pub fn build<S: AnimatedScene + ?Sized>(
        &self,
        scene: &mut S,
        spec: &SwitchSpec,
        prepared: &Prepared,
    ) -> BakeResult<TransitionPlan> {
        let sampling = &prepared.sampling;
        let pin_source = prepared.mode.is_bake();

        let mut captures = Vec::with_capacity(sampling.times.len());
        for &time in &sampling.times {
            captures.push(self.capture_sample(scene, spec, time, pin_source)?);
        }
        let close_before = match sampling.times.last() {
            Some(&last) if sampling.tail_boundary => {
                Some(self.capture_sample(scene, spec, last - 1.0, pin_source)?)
            }
            _ => None,
        };

        let mut samples: Vec<(f64, Vec<PoseTarget>)> =
            sampling.times.iter().copied().zip(captures).collect();
        let mut steps = Vec::with_capacity(samples.len() + 2);

        if sampling.head_boundary && !samples.is_empty() {
            let (time, targets) = samples.remove(0);
            steps.push(
                TransitionStep::new(time - 1.0, StepRole::HoldBefore)
                    .with_set_drivers(vec![spec.source().clone()])
                    .with_key_drivers(rig::held_drivers(spec))
                    .with_targets(rig::hold_targets(spec, Side::Target)),
            );
            steps.push(self.target_step(spec, time, StepRole::Switch, targets));
        }

        if let Some(before) = close_before {
            if let Some((time, end)) = samples.pop() {
                steps.push(
                    TransitionStep::new(time, StepRole::Close)
                        .with_set_drivers(rig::side_drivers(spec, &self.settings, Side::Source))
                        .with_targets(rig::close_targets(spec, end)),
                );
                let step = self.target_step(spec, time - 1.0, StepRole::CloseBefore, before);
                steps.push(step);
            }
        }

        for (time, targets) in samples {
            steps.push(self.target_step(spec, time, StepRole::Rekey, targets));
        }

        for step in &steps {
            log::debug!("planned {} at {}", step.role, step.time);
        }
        Ok(TransitionPlan {
            mode: prepared.mode,
            steps,
        })
    }

    fn target_step(
        &self,
        spec: &SwitchSpec,
        time: f64,
        role: StepRole,
        targets: Vec<PoseTarget>,
    ) -> TransitionStep {
        TransitionStep::new(time, role)
            .with_set_drivers(rig::side_drivers(spec, &self.settings, Side::Target))
            .with_targets(targets)
    }

    /// Reads one sample. With `pin_source`, the source driver is set and keyed
    /// first so every sample sees the pre-switch configuration.
    fn capture_sample<S: AnimatedScene + ?Sized>(
        &self,
        scene: &mut S,
        spec: &SwitchSpec,
        time: f64,
        pin_source: bool,
    ) -> BakeResult<Vec<PoseTarget>> {
        if pin_source {
            pin_driver(scene, spec.source(), time)
                .map_err(|source| BakeError::Mutation { time, source })?;
        }
        rig::capture_at(scene, spec, &self.settings, time)
            .map_err(|source| BakeError::Mutation { time, source })
    }

    fn check_rotate_orders<S: AnimatedScene + ?Sized>(
        &self,
        scene: &S,
        ikfk: &IkFkSwitchSpec,
    ) -> BakeResult<Vec<Advisory>> {
        let mut advisories = Vec::new();
        for (joint, control) in ikfk.joints().into_iter().zip(ikfk.fk_controls()) {
            let joint_order = scene.rotate_order(&resolve(scene, "joint", joint.name())?);
            let control_order = scene.rotate_order(&resolve(scene, "fk control", control.name())?);
            if joint_order == control_order {
                continue;
            }
            if self.settings.strict_rotate_order {
                return Err(BakeError::RotateOrderMismatch {
                    joint: joint.to_string(),
                    joint_order,
                    control: control.to_string(),
                    control_order,
                });
            }
            let advisory = Advisory::RotateOrderMismatch {
                joint: joint.to_string(),
                joint_order,
                control: control.to_string(),
                control_order,
            };
            log::warn!("{}", advisory);
            advisories.push(advisory);
        }
        Ok(advisories)
    }
}

fn pin_driver<S: AnimatedScene + ?Sized>(
    scene: &mut S,
    driver: &AttributeRef,
    time: f64,
) -> SceneResult<()> {
    scene.set_current_time(time)?;
    let node = scene.resolve_node(&driver.node)?;
    scene.set_attr(&node, &driver.attribute, driver.value)?;
    scene.set_keyframe(&node, &driver.attribute, None)
}

fn resolve<S: AnimatedScene + ?Sized>(scene: &S, field: &str, name: &str) -> BakeResult<S::Node> {
    scene.resolve_node(name).map_err(|err| match err {
        SceneError::NodeNotFound { .. } => BakeError::stale(field, name),
        other => BakeError::stale(field, format!("{name} ({other})")),
    })
}

/// Re-resolves every reference and gates node types.
fn check_references<S: AnimatedScene + ?Sized>(scene: &S, spec: &SwitchSpec) -> BakeResult<()> {
    for (field, control) in spec.controls() {
        let node = resolve(scene, field, control.name())?;
        let actual = scene.node_type(&node);
        let (ok, expected) = if field.ends_with("joint") {
            (actual == NodeType::Joint, "a joint")
        } else {
            (actual.is_transform(), "a transform or joint")
        };
        if !ok {
            log::warn!("'{}' in '{}' is a {} node", control, field, actual);
            return Err(BakeError::NotTransform {
                field: field.to_string(),
                node: control.to_string(),
                actual,
                expected,
            });
        }
    }

    for (field, attr) in spec.attributes() {
        let node = resolve(scene, field, &attr.node)?;
        if !scene.attribute_exists(&node, &attr.attribute) {
            return Err(BakeError::stale(field, attr.path()));
        }
    }
    Ok(())
}

/// Picks sample times and boundary flags for the request.
fn sample<S: AnimatedScene + ?Sized>(
    scene: &S,
    spec: &SwitchSpec,
    request: &BakeRequest,
) -> BakeResult<Sampling> {
    if request.mode == BakeMode::CurrentFrame {
        return Ok(Sampling {
            times: vec![scene.current_time()],
            head_boundary: true,
            tail_boundary: false,
        });
    }

    let reference_nodes = spec
        .key_reference_controls()
        .into_iter()
        .map(|control| resolve(scene, "key reference", control.name()))
        .collect::<BakeResult<Vec<_>>>()?;
    let keys = scene.existing_key_times(&reference_nodes);
    let empty = || BakeError::EmptySampleSet {
        mode: request.mode,
        window: request.window,
    };

    match request.mode {
        BakeMode::BakeAtExistingKeyframes => {
            let times: Vec<f64> = match request.window {
                Some(window) => keys
                    .iter()
                    .copied()
                    .filter(|&t| window.contains(t))
                    .collect(),
                None => keys.clone(),
            };
            let (first, last) = match (times.first(), times.last()) {
                (Some(&first), Some(&last)) => (first, last),
                _ => return Err(empty()),
            };
            let head_boundary = keys.first().is_some_and(|&k| first > k);
            let tail_boundary = times.len() > 1 && keys.last().is_some_and(|&k| last < k);
            Ok(Sampling {
                times,
                head_boundary,
                tail_boundary,
            })
        }
        _ => {
            let window = match request.window {
                Some(window) => window,
                None => {
                    let (start, end) = scene.playback_range();
                    let range = FrameWindow::new(start, end);
                    if let Some(error) = check_frame_count(&range, "playback range") {
                        return Err(BakeError::InvalidSpec {
                            errors: vec![error],
                        });
                    }
                    range
                }
            };
            let times = window.integer_frames();
            let (first, last) = match (times.first(), times.last()) {
                (Some(&first), Some(&last)) => (first, last),
                _ => return Err(empty()),
            };
            let head_boundary = keys.first().is_some_and(|&k| k < first);
            let tail_boundary = times.len() > 1 && keys.last().is_some_and(|&k| k > last);
            Ok(Sampling {
                times,
                head_boundary,
                tail_boundary,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{AnimCurve, MemoryNode, MemoryScene};
    use spaceswitch_spec::SpaceSwitchSpec;

    fn hand_scene(keys: &[(f64, f64)]) -> MemoryScene {
        MemoryScene::new()
            .with_playback_range(1.0, 5.0)
            .with_node(
                "hand",
                MemoryNode::transform()
                    .with_channel("translateX", AnimCurve::keyed(keys))
                    .with_channel("space", AnimCurve::constant(0.0)),
            )
    }

    fn hand_spec() -> SwitchSpec {
        SwitchSpec::Space(SpaceSwitchSpec::new(
            "hand",
            AttributeRef::new("hand", "space", 0.0),
            AttributeRef::new("hand", "space", 1.0),
        ))
    }

    #[test]
    fn test_current_frame_sampling() {
        let scene = hand_scene(&[(0.0, 0.0)]).with_current_time(7.0);
        let prepared = TransitionPlanner::default()
            .prepare(&scene, &hand_spec(), &BakeRequest::current_frame())
            .unwrap();
        assert_eq!(prepared.sampling.times, vec![7.0]);
        assert!(prepared.sampling.head_boundary);
        assert!(!prepared.sampling.tail_boundary);
    }

    #[test]
    fn test_keyframe_window_flags() {
        let scene = hand_scene(&[(0.0, 0.0), (10.0, 1.0), (20.0, 2.0), (30.0, 3.0)]);
        let planner = TransitionPlanner::default();

        let full = planner
            .prepare(&scene, &hand_spec(), &BakeRequest::existing_keyframes())
            .unwrap();
        assert_eq!(full.sampling.times, vec![0.0, 10.0, 20.0, 30.0]);
        assert!(!full.sampling.head_boundary);
        assert!(!full.sampling.tail_boundary);

        let inner = planner
            .prepare(
                &scene,
                &hand_spec(),
                &BakeRequest::existing_keyframes().with_window(5.0, 25.0),
            )
            .unwrap();
        assert_eq!(inner.sampling.times, vec![10.0, 20.0]);
        assert!(inner.sampling.head_boundary);
        assert!(inner.sampling.tail_boundary);

        let single = planner
            .prepare(
                &scene,
                &hand_spec(),
                &BakeRequest::existing_keyframes().with_window(15.0, 25.0),
            )
            .unwrap();
        assert_eq!(single.sampling.times, vec![20.0]);
        assert!(single.sampling.head_boundary);
        assert!(!single.sampling.tail_boundary);
    }

    #[test]
    fn test_every_frame_uses_playback_range() {
        let scene = hand_scene(&[(0.0, 0.0), (10.0, 1.0)]);
        let prepared = TransitionPlanner::default()
            .prepare(&scene, &hand_spec(), &BakeRequest::every_frame())
            .unwrap();
        assert_eq!(prepared.sampling.times, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!(prepared.sampling.head_boundary);
        assert!(prepared.sampling.tail_boundary);
    }

    #[test]
    fn test_every_frame_without_keys_has_no_boundaries() {
        let scene = MemoryScene::new()
            .with_playback_range(1.0, 3.0)
            .with_node(
                "hand",
                MemoryNode::transform().with_channel("space", AnimCurve::constant(0.0)),
            );
        let prepared = TransitionPlanner::default()
            .prepare(&scene, &hand_spec(), &BakeRequest::every_frame())
            .unwrap();
        assert_eq!(prepared.sampling.times.len(), 3);
        assert!(!prepared.sampling.head_boundary);
        assert!(!prepared.sampling.tail_boundary);
    }

    #[test]
    fn test_empty_window_is_rejected() {
        let scene = hand_scene(&[(0.0, 0.0), (10.0, 1.0)]);
        let err = TransitionPlanner::default()
            .prepare(
                &scene,
                &hand_spec(),
                &BakeRequest::existing_keyframes().with_window(3.0, 7.0),
            )
            .unwrap_err();
        assert!(matches!(err, BakeError::EmptySampleSet { .. }));

        let err = TransitionPlanner::default()
            .prepare(
                &scene,
                &hand_spec(),
                &BakeRequest::every_frame().with_window(3.2, 3.8),
            )
            .unwrap_err();
        assert!(matches!(err, BakeError::EmptySampleSet { .. }));
    }

    #[test]
    fn test_oversized_playback_range_is_rejected() {
        let scene = hand_scene(&[(0.0, 0.0)]).with_playback_range(0.0, 1e13);
        let err = TransitionPlanner::default()
            .prepare(&scene, &hand_spec(), &BakeRequest::every_frame())
            .unwrap_err();
        match err {
            BakeError::InvalidSpec { errors } => {
                assert_eq!(errors[0].code, spaceswitch_spec::ErrorCode::TooManyFrames);
                assert_eq!(errors[0].path.as_deref(), Some("playback range"));
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = TransitionPlanner::default()
            .prepare(
                &hand_scene(&[(0.0, 0.0)]),
                &hand_spec(),
                &BakeRequest::every_frame().with_window(0.0, 1e13),
            )
            .unwrap_err();
        assert!(matches!(err, BakeError::InvalidSpec { .. }));
    }

    #[test]
    fn test_missing_attribute_is_stale() {
        let scene = hand_scene(&[(0.0, 0.0)]);
        let spec = SwitchSpec::Space(SpaceSwitchSpec::new(
            "hand",
            AttributeRef::new("hand", "space", 0.0),
            AttributeRef::new("hand", "parentSpace", 1.0),
        ));
        let err = TransitionPlanner::default()
            .prepare(&scene, &spec, &BakeRequest::current_frame())
            .unwrap_err();
        match err {
            BakeError::StaleReference { field, reference } => {
                assert_eq!(field, "target space");
                assert_eq!(reference, "hand.parentSpace");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_transform_control_is_rejected() {
        let scene = MemoryScene::new().with_node(
            "hand",
            MemoryNode::other().with_channel("space", AnimCurve::constant(0.0)),
        );
        let err = TransitionPlanner::default()
            .prepare(&scene, &hand_spec(), &BakeRequest::current_frame())
            .unwrap_err();
        assert!(matches!(err, BakeError::NotTransform { .. }));
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let scene = hand_scene(&[(0.0, 0.0)]);
        let planner = TransitionPlanner::new(SwitchSettings::new().with_probe_iterations(0));
        let err = planner
            .prepare(&scene, &hand_spec(), &BakeRequest::current_frame())
            .unwrap_err();
        assert!(matches!(err, BakeError::InvalidSpec { .. }));
    }
}
