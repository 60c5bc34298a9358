//! End-to-end tests for the plan and switch commands on scene snapshots.

use pretty_assertions::assert_eq;
use spaceswitch_bake::memory::{AnimCurve, MemoryNode, MemoryScene, ParentBinding, SpaceOption};
use spaceswitch_bake::AnimatedScene;
use spaceswitch_cli::commands::{plan, switch};
use spaceswitch_cli::input::{load_inputs, load_scene, save_scene, BakeOptions};
use spaceswitch_cli::session::SessionContext;
use spaceswitch_spec::{save_preset, AttributeRef, FrameWindow, SpaceSwitchSpec, SwitchSpec};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn shot() -> MemoryScene {
    let hand_x = AnimCurve::keyed(&[(0.0, 1.0), (10.0, 3.0), (20.0, 2.0)]);
    MemoryScene::new()
        .with_playback_range(0.0, 20.0)
        .with_current_time(8.0)
        .with_node(
            "chest",
            MemoryNode::transform()
                .with_translation([0.0, 10.0, 0.0])
                .with_rotation([0.0, 0.0, 20.0]),
        )
        .with_node(
            "settings",
            MemoryNode::other().with_channel("space", AnimCurve::constant(0.0)),
        )
        .with_node(
            "hand",
            MemoryNode::transform()
                .with_channel("translateX", hand_x)
                .with_channel("rotateZ", AnimCurve::keyed(&[(0.0, 0.0), (20.0, 40.0)]))
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

fn setup() -> (TempDir, PathBuf, PathBuf) {
    let tmp = tempfile::tempdir().unwrap();
    let preset = tmp.path().join("hand_space.json");
    let spec = SwitchSpec::Space(SpaceSwitchSpec::new(
        "hand",
        AttributeRef::new("settings", "space", 0.0),
        AttributeRef::new("settings", "space", 1.0),
    ));
    save_preset(&spec, &preset).unwrap();

    let scene = tmp.path().join("shot.json");
    save_scene(&shot(), &scene).unwrap();
    (tmp, preset, scene)
}

fn options(preset: Option<&Path>, scene: &Path, mode: &str) -> BakeOptions {
    BakeOptions {
        preset: preset.map(|p| p.display().to_string()),
        scene: scene.display().to_string(),
        mode: mode.to_string(),
        ..BakeOptions::default()
    }
}

fn hand_pose(scene: &mut MemoryScene, time: f64) -> spaceswitch_spec::Pose {
    scene.set_current_time(time).unwrap();
    scene.world_transform(&"hand".to_string()).unwrap()
}

#[test]
fn test_switch_writes_scene_and_preserves_pose() {
    let (tmp, preset, scene_path) = setup();
    let out = tmp.path().join("switched.json");
    let mut session = SessionContext::default();

    let mut original = shot();
    let before: Vec<_> = [0.0, 7.0, 8.0]
        .iter()
        .map(|&t| hand_pose(&mut original, t))
        .collect();

    switch::run(
        &options(Some(&preset), &scene_path, "current"),
        Some(out.to_str().unwrap()),
        true,
        &mut session,
    )
    .unwrap();

    let mut switched = load_scene(&out).unwrap();
    assert_eq!(switched.current_time(), 8.0);
    assert_eq!(switched.key_times("settings", "space"), vec![7.0, 8.0]);
    for (time, expected) in [0.0, 7.0, 8.0].iter().zip(&before) {
        let pose = hand_pose(&mut switched, *time);
        assert!(
            pose.approx_eq(expected, 1e-6),
            "frame {time}: {pose:?} != {expected:?}"
        );
    }

    // the input snapshot is untouched when --output is given
    assert_eq!(load_scene(&scene_path).unwrap(), shot());
    assert_eq!(session.last_preset, Some(preset));
}

#[test]
fn test_plan_does_not_write_scene() {
    let (_tmp, preset, scene_path) = setup();
    let mut session = SessionContext::default();

    let mut opts = options(Some(&preset), &scene_path, "every");
    opts.start = Some(5.0);
    opts.end = Some(12.0);
    plan::run(&opts, true, &mut session).unwrap();

    assert_eq!(load_scene(&scene_path).unwrap(), shot());
    assert_eq!(session.last_window, Some(FrameWindow::new(5.0, 12.0)));
}

#[test]
fn test_plan_switch_lays_out_truncated_bake() {
    let (_tmp, preset, scene_path) = setup();
    let mut session = SessionContext::default();

    let mut opts = options(Some(&preset), &scene_path, "keys");
    opts.start = Some(5.0);
    opts.end = Some(15.0);
    let mut inputs = load_inputs(&opts, &mut session).unwrap();
    let (plan, advisories) = plan::plan_switch(&mut inputs).unwrap();

    // the only key inside 5..15 is 10: head boundary only
    assert_eq!(plan.times(), vec![9.0, 10.0]);
    assert!(advisories.is_empty());
}

#[test]
fn test_session_supplies_preset_and_window() {
    let (_tmp, preset, scene_path) = setup();
    let mut session = SessionContext::default();
    session.remember_preset(&preset);
    session.last_window = Some(FrameWindow::new(2.0, 4.0));

    let mut opts = options(None, &scene_path, "every");
    opts.last_window = true;
    let inputs = load_inputs(&opts, &mut session).unwrap();

    assert_eq!(inputs.preset_path, preset);
    assert_eq!(inputs.request.window, Some(FrameWindow::new(2.0, 4.0)));
}

#[test]
fn test_stale_preset_leaves_scene_alone() {
    let (tmp, _preset, scene_path) = setup();
    let stale = tmp.path().join("stale.json");
    let spec = SwitchSpec::Space(SpaceSwitchSpec::new(
        "hand_old",
        AttributeRef::new("settings", "space", 0.0),
        AttributeRef::new("settings", "space", 1.0),
    ));
    save_preset(&spec, &stale).unwrap();

    let mut session = SessionContext::default();
    let stale_options = options(Some(&stale), &scene_path, "current");
    let mut inputs = load_inputs(&stale_options, &mut session).unwrap();
    let err = switch::switch_scene(&mut inputs).unwrap_err();
    assert!(err.is_pre_mutation());
    assert_eq!(inputs.scene, shot());

    switch::run(&stale_options, None, true, &mut session).unwrap();
    assert_eq!(load_scene(&scene_path).unwrap(), shot());
}
