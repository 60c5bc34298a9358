//! Per-switch-kind capture and step contents.
//!
//! A space switch drives one control through its full transform. An IK/FK
//! switch drives either the three FK controls (rotation only) or the IK wrist
//! and pole controls, depending on direction.

use spaceswitch_spec::{
    AttributeRef, ChannelMask, ControlRef, IkFkDirection, IkFkSwitchSpec, Pose, SwitchSettings,
    SwitchSpec,
};

use crate::capture::capture;
use crate::error::SceneResult;
use crate::ikfk::{FkMatch, IkFkReconstructor, IkMatch};
use crate::scene::AnimatedScene;
use crate::step::{PoseAction, PoseTarget};

/// Which configuration a step leaves the rig in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Source,
    Target,
}

/// Reads whatever the switch needs to restore at `time`, as the targets that
/// restore it on the target side.
pub(crate) fn capture_at<S: AnimatedScene + ?Sized>(
    scene: &mut S,
    spec: &SwitchSpec,
    settings: &SwitchSettings,
    time: f64,
) -> SceneResult<Vec<PoseTarget>> {
    match spec {
        SwitchSpec::Space(space) => {
            let node = scene.resolve_node(space.control.name())?;
            let pose = capture(scene, &node, time)?;
            Ok(vec![apply_pose(&space.control, pose)])
        }
        SwitchSpec::IkFk(ikfk) => {
            if scene.current_time() != time {
                scene.set_current_time(time)?;
            }
            let reconstructor = IkFkReconstructor::from_settings(settings);
            match ikfk.direction {
                IkFkDirection::IkToFk => {
                    let matched = reconstructor.ik_to_fk(scene, ikfk)?;
                    Ok(fk_targets(ikfk, &matched))
                }
                IkFkDirection::FkToIk => {
                    let matched = reconstructor.fk_to_ik(scene, ikfk)?;
                    Ok(ik_targets(ikfk, settings, &matched))
                }
            }
        }
    }
}

fn apply_pose(control: &ControlRef, pose: Pose) -> PoseTarget {
    PoseTarget::new(control, PoseAction::Apply { pose }, ChannelMask::TRANSFORM)
}

fn fk_targets(ikfk: &IkFkSwitchSpec, matched: &FkMatch) -> Vec<PoseTarget> {
    ikfk.fk_controls()
        .into_iter()
        .zip(matched.rotations)
        .map(|(control, rotation)| {
            PoseTarget::new(
                control,
                PoseAction::Rotate { rotation },
                ChannelMask::ROTATE,
            )
        })
        .collect()
}

fn ik_targets(
    ikfk: &IkFkSwitchSpec,
    settings: &SwitchSettings,
    matched: &IkMatch,
) -> Vec<PoseTarget> {
    vec![
        PoseTarget::new(
            &ikfk.ik_wrist,
            PoseAction::Probe {
                driver: ikfk.wrist_joint.clone(),
                seed: matched.wrist,
                iterations: settings.probe_iterations,
            },
            ChannelMask::TRANSFORM,
        ),
        PoseTarget::new(
            &ikfk.ik_elbow,
            PoseAction::Translate {
                position: matched.pole,
            },
            ChannelMask::TRANSLATE,
        ),
    ]
}

/// Drivers set and keyed to put the rig on `side`.
///
/// With `drive_visibility`, the IK/FK visibility attribute of `side` is set to
/// its stored value and the other one to the opposite (0 for a non-zero
/// value, else 1).
pub(crate) fn side_drivers(
    spec: &SwitchSpec,
    settings: &SwitchSettings,
    side: Side,
) -> Vec<AttributeRef> {
    let driver = match side {
        Side::Source => spec.source(),
        Side::Target => spec.target(),
    };
    let mut drivers = vec![driver.clone()];

    if let SwitchSpec::IkFk(ikfk) = spec {
        if settings.drive_visibility {
            let (shown, hidden) = match side {
                Side::Source => (ikfk.source_visibility(), ikfk.target_visibility()),
                Side::Target => (ikfk.target_visibility(), ikfk.source_visibility()),
            };
            drivers.push(shown.clone());
            drivers.push(hidden.with_value(opposite(hidden.value)));
        }
    }
    drivers
}

fn opposite(value: f64) -> f64 {
    if value != 0.0 {
        0.0
    } else {
        1.0
    }
}

/// Drivers keyed, at their current value, on the frame before a boundary.
pub(crate) fn held_drivers(spec: &SwitchSpec) -> Vec<AttributeRef> {
    match spec {
        SwitchSpec::Space(_) => Vec::new(),
        SwitchSpec::IkFk(ikfk) => vec![ikfk.fk_visibility.clone(), ikfk.ik_visibility.clone()],
    }
}

/// Controls driven on `side`, keyed without moving.
pub(crate) fn hold_targets(spec: &SwitchSpec, side: Side) -> Vec<PoseTarget> {
    match spec {
        SwitchSpec::Space(space) => vec![PoseTarget::hold(&space.control, ChannelMask::TRANSFORM)],
        SwitchSpec::IkFk(ikfk) => {
            let fk_side = match side {
                Side::Target => ikfk.direction == IkFkDirection::IkToFk,
                Side::Source => ikfk.direction == IkFkDirection::FkToIk,
            };
            if fk_side {
                fk_hold(ikfk)
            } else {
                ik_hold(ikfk)
            }
        }
    }
}

fn fk_hold(ikfk: &IkFkSwitchSpec) -> Vec<PoseTarget> {
    ikfk.fk_controls()
        .into_iter()
        .map(|control| PoseTarget::hold(control, ChannelMask::ROTATE))
        .collect()
}

fn ik_hold(ikfk: &IkFkSwitchSpec) -> Vec<PoseTarget> {
    vec![
        PoseTarget::hold(&ikfk.ik_wrist, ChannelMask::TRANSFORM),
        PoseTarget::hold(&ikfk.ik_elbow, ChannelMask::TRANSLATE),
    ]
}

/// Targets on the last frame of a truncated window, back on the source side.
///
/// A space switch restores the pose captured there. IK/FK source controls were
/// never moved, so they are only keyed.
pub(crate) fn close_targets(spec: &SwitchSpec, end: Vec<PoseTarget>) -> Vec<PoseTarget> {
    match spec {
        SwitchSpec::Space(_) => end,
        SwitchSpec::IkFk(_) => hold_targets(spec, Side::Source),
    }
}
